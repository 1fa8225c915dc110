//! `carlot-listings` — vehicle listing and review domain model.

pub mod listing;
pub mod review;

pub use listing::{Listing, ListingPatch, ListingStatus, NewListing};
pub use review::Review;
