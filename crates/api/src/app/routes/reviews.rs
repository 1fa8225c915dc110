//! Review routes, nested under a listing.
//!
//! Updates require review authorship (not listing ownership); deletion is an
//! admin-only moderation action.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};

use carlot_core::{ListingId, ReviewId};
use carlot_listings::{review::validate_review, Review};

use crate::app::{dto, errors, services::AppState};
use crate::context::{AdminOnly, Authenticated};
use crate::gate::ensure_review_author;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:id/reviews", get(get_reviews).post(add_review))
        .route("/:id/reviews/:rid", put(update_review).delete(delete_review))
}

fn parse_ids(
    listing: &str,
    review: &str,
) -> Result<(ListingId, ReviewId), axum::response::Response> {
    let listing = listing.parse::<ListingId>().map_err(errors::domain_error)?;
    let review = review.parse::<ReviewId>().map_err(errors::domain_error)?;
    Ok((listing, review))
}

/// GET /listings/:id/reviews — public.
pub async fn get_reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match id.parse::<ListingId>() {
        Ok(v) => v,
        Err(e) => return errors::domain_error(e),
    };

    match state.listings.get(id) {
        Some(listing) => (
            StatusCode::OK,
            Json(
                listing
                    .reviews
                    .iter()
                    .map(dto::review_to_json)
                    .collect::<Vec<_>>(),
            ),
        )
            .into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "listing not found"),
    }
}

/// POST /listings/:id/reviews — authenticated; author recorded by username.
pub async fn add_review(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
    body: Result<Json<dto::ReviewRequest>, JsonRejection>,
) -> axum::response::Response {
    let id = match id.parse::<ListingId>() {
        Ok(v) => v,
        Err(e) => return errors::domain_error(e),
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(rej) => return errors::body_error(rej),
    };

    let review = match Review::new(auth.user.username.clone(), body.review_text, body.rating) {
        Ok(r) => r,
        Err(e) => return errors::domain_error(e),
    };
    let review_id = review.id;

    if !state.listings.push_review(id, review) {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "listing not found");
    }

    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "review added successfully",
            "review_id": review_id.to_string(),
        })),
    )
        .into_response()
}

/// PUT /listings/:id/reviews/:rid — only the review's author may update it.
pub async fn update_review(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((id, rid)): Path<(String, String)>,
    body: Result<Json<dto::ReviewRequest>, JsonRejection>,
) -> axum::response::Response {
    let (id, rid) = match parse_ids(&id, &rid) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(rej) => return errors::body_error(rej),
    };

    let Some(listing) = state.listings.get(id) else {
        return errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            "listing or review not found",
        );
    };
    let Some(review) = listing.reviews.iter().find(|r| r.id == rid) else {
        return errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            "listing or review not found",
        );
    };

    if let Err(e) = ensure_review_author(review, &auth.user) {
        return errors::auth_error(e);
    }
    if let Err(e) = validate_review(&body.review_text, body.rating) {
        return errors::domain_error(e);
    }

    if !state
        .listings
        .update_review(id, rid, body.review_text, body.rating)
    {
        return errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            "listing or review not found",
        );
    }
    (
        StatusCode::OK,
        Json(serde_json::json!({ "message": "review updated successfully" })),
    )
        .into_response()
}

/// DELETE /listings/:id/reviews/:rid — admin-only moderation.
pub async fn delete_review(
    State(state): State<AppState>,
    admin: AdminOnly,
    Path((id, rid)): Path<(String, String)>,
) -> axum::response::Response {
    let (id, rid) = match parse_ids(&id, &rid) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let Some(listing) = state.listings.get(id) else {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "listing not found");
    };
    if !listing.reviews.iter().any(|r| r.id == rid) {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "review not found");
    }

    if !state.listings.pull_review(id, rid) {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "review not found");
    }

    tracing::info!(listing_id = %id, review_id = %rid, admin = %admin.user.username, "review removed");
    (
        StatusCode::OK,
        Json(serde_json::json!({ "message": "review deleted successfully" })),
    )
        .into_response()
}
