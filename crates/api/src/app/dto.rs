//! Request/response DTOs and JSON mapping helpers.

use serde::Deserialize;
use serde_json::{json, Value};

use carlot_auth::User;
use carlot_listings::{Listing, Review};
use carlot_store::{ListingsSummary, TypeAverage, TypeCount};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    /// Defaults to "buyer" when omitted.
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub review_text: String,
    /// Integer 1..=5; non-integers fail deserialization.
    pub rating: u8,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

// -------------------------
// Response mapping
// -------------------------

pub fn review_to_json(review: &Review) -> Value {
    json!({
        "id": review.id.to_string(),
        "user": review.user,
        "review_text": review.review_text,
        "rating": review.rating,
        "created_at": review.created_at,
    })
}

pub fn listing_to_json(listing: &Listing) -> Value {
    json!({
        "id": listing.id.to_string(),
        "user_id": listing.user_id.to_string(),
        "vehicle_model": listing.vehicle_model,
        "price": listing.price,
        "mileage": listing.mileage,
        "location": listing.location,
        "car_type": listing.car_type,
        "listing_age": listing.listing_age,
        "views": listing.views,
        "status": listing.status.as_str(),
        "reported_by": listing.reported_by.map(|id| id.to_string()),
        "reviews": listing.reviews.iter().map(review_to_json).collect::<Vec<_>>(),
    })
}

/// Moderation queue projection: model, status and the seller reference.
pub fn moderated_listing_to_json(listing: &Listing) -> Value {
    json!({
        "id": listing.id.to_string(),
        "vehicle_model": listing.vehicle_model,
        "status": listing.status.as_str(),
        "seller_id": listing.user_id.to_string(),
    })
}

/// Admin user projection: never includes the password hash.
pub fn user_to_json(user: &User) -> Value {
    json!({
        "id": user.id.to_string(),
        "username": user.username,
        "role": user.role.as_str(),
    })
}

pub fn type_average_to_json(stat: &TypeAverage) -> Value {
    json!({
        "car_type": stat.car_type,
        "average_price": stat.average_price,
    })
}

pub fn type_count_to_json(stat: &TypeCount) -> Value {
    json!({
        "car_type": stat.car_type,
        "count": stat.count,
    })
}

pub fn summary_to_json(summary: &ListingsSummary) -> Value {
    let prices = match &summary.prices {
        Some(p) => json!({
            "total_listings": p.total_listings,
            "average_price": p.average_price,
            "max_price": p.max_price,
            "min_price": p.min_price,
        }),
        None => json!({}),
    };

    json!({
        "summary": prices,
        "counts_by_type": summary
            .counts_by_type
            .iter()
            .map(type_count_to_json)
            .collect::<Vec<_>>(),
    })
}
