//! `carlot-store` — storage seams consumed by the API layer.
//!
//! Each store is a small trait with an in-memory implementation. The
//! underlying map gives per-document atomic read/write; no further
//! synchronization is needed by callers.

pub mod listings;
pub mod revocation;
pub mod users;

pub use listings::{
    InMemoryListingStore, ListingFilter, ListingStore, ListingsSummary, PagedListings,
    PriceSummary, TypeAverage, TypeCount,
};
pub use revocation::{ExpiryIndexedRevocationStore, InMemoryRevocationStore, RevocationStore};
pub use users::{InMemoryUserStore, UserStore};
