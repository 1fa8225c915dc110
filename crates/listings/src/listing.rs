use core::str::FromStr;

use serde::{Deserialize, Serialize};

use carlot_core::{DomainError, DomainResult, ListingId, UserId};

use crate::Review;

/// Lifecycle state of a listing.
///
/// Listings are born `Active`; owners mark them `Sold`; any authenticated
/// user can flag one `Reported`. Admin moderation may only delete listings
/// that are no longer active.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Active,
    Sold,
    Reported,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Active => "active",
            ListingStatus::Sold => "sold",
            ListingStatus::Reported => "reported",
        }
    }

    /// Whether admin moderation may delete a listing in this state.
    pub fn admin_deletable(&self) -> bool {
        matches!(self, ListingStatus::Sold | ListingStatus::Reported)
    }
}

impl core::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ListingStatus::Active),
            "sold" => Ok(ListingStatus::Sold),
            "reported" => Ok(ListingStatus::Reported),
            other => Err(DomainError::validation(format!(
                "status must be one of: active, sold, reported (got '{other}')"
            ))),
        }
    }
}

/// Fields a seller supplies when creating a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewListing {
    pub vehicle_model: String,
    pub price: f64,
    pub mileage: f64,
    pub location: String,
    pub car_type: String,
    pub listing_age: i64,
}

impl NewListing {
    pub fn validate(&self) -> DomainResult<()> {
        if self.vehicle_model.trim().is_empty() {
            return Err(DomainError::validation("vehicle_model must not be empty"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(DomainError::validation("price must be a non-negative number"));
        }
        if !self.mileage.is_finite() || self.mileage < 0.0 {
            return Err(DomainError::validation("mileage must be a non-negative number"));
        }
        Ok(())
    }
}

/// Partial update applied by the listing owner.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingPatch {
    pub vehicle_model: Option<String>,
    pub price: Option<f64>,
    pub mileage: Option<f64>,
    pub location: Option<String>,
    pub car_type: Option<String>,
    pub listing_age: Option<i64>,
}

impl ListingPatch {
    pub fn is_empty(&self) -> bool {
        self.vehicle_model.is_none()
            && self.price.is_none()
            && self.mileage.is_none()
            && self.location.is_none()
            && self.car_type.is_none()
            && self.listing_age.is_none()
    }
}

/// A vehicle listing with its embedded reviews.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    /// Owning seller; every mutating operation compares this against the
    /// resolved caller identity.
    pub user_id: UserId,
    pub vehicle_model: String,
    pub price: f64,
    pub mileage: f64,
    pub location: String,
    pub car_type: String,
    pub listing_age: i64,
    pub views: u64,
    pub status: ListingStatus,
    pub reported_by: Option<UserId>,
    pub reviews: Vec<Review>,
}

impl Listing {
    /// Create an active listing owned by `owner` with zero views and no reviews.
    pub fn create(owner: UserId, new: NewListing) -> DomainResult<Self> {
        new.validate()?;
        Ok(Self {
            id: ListingId::new(),
            user_id: owner,
            vehicle_model: new.vehicle_model,
            price: new.price,
            mileage: new.mileage,
            location: new.location,
            car_type: new.car_type,
            listing_age: new.listing_age,
            views: 0,
            status: ListingStatus::Active,
            reported_by: None,
            reviews: Vec::new(),
        })
    }

    pub fn apply(&mut self, patch: ListingPatch) {
        if let Some(v) = patch.vehicle_model {
            self.vehicle_model = v;
        }
        if let Some(v) = patch.price {
            self.price = v;
        }
        if let Some(v) = patch.mileage {
            self.mileage = v;
        }
        if let Some(v) = patch.location {
            self.location = v;
        }
        if let Some(v) = patch.car_type {
            self.car_type = v;
        }
        if let Some(v) = patch.listing_age {
            self.listing_age = v;
        }
    }

    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.user_id == user
    }
}
