//! Listing routes: CRUD, lifecycle transitions, public search and stats.
//!
//! Reads are public; every mutation runs the gate and then its own ownership
//! check against the resolved identity.

use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};

use carlot_core::ListingId;
use carlot_listings::{Listing, ListingPatch, ListingStatus, NewListing};
use carlot_store::ListingFilter;

use crate::app::{dto, errors, services::AppState};
use crate::context::Authenticated;
use crate::gate::ensure_listing_owner;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_listing).get(list_listings))
        .route("/stats/average_price_by_type", get(average_price_by_type))
        .route("/stats/summary", get(stats_summary))
        .route(
            "/:id",
            get(get_listing).put(update_listing).delete(delete_listing),
        )
        .route("/:id/mark_sold", put(mark_sold))
        .route("/:id/report", post(report_listing))
}

fn parse_listing_id(raw: &str) -> Result<ListingId, axum::response::Response> {
    raw.parse::<ListingId>().map_err(errors::domain_error)
}

/// POST /listings — create an active listing owned by the caller.
pub async fn create_listing(
    State(state): State<AppState>,
    auth: Authenticated,
    body: Result<Json<NewListing>, JsonRejection>,
) -> axum::response::Response {
    let Json(new) = match body {
        Ok(b) => b,
        Err(rej) => return errors::body_error(rej),
    };

    let listing = match Listing::create(auth.user.id, new) {
        Ok(l) => l,
        Err(e) => return errors::domain_error(e),
    };
    let id = listing.id;
    state.listings.insert(listing);

    tracing::info!(listing_id = %id, seller = %auth.user.username, "listing created");
    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "listing created",
            "listing_id": id.to_string(),
        })),
    )
        .into_response()
}

/// GET /listings — public search with exact-match filters and pagination.
pub async fn list_listings(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> axum::response::Response {
    let mut filter = ListingFilter {
        vehicle_model: params.get("vehicle_model").cloned(),
        location: params.get("location").cloned(),
        car_type: params.get("car_type").cloned(),
        ..Default::default()
    };
    for (key, slot) in [
        ("price", &mut filter.price),
        ("mileage", &mut filter.mileage),
    ] {
        if let Some(raw) = params.get(key) {
            match raw.parse::<f64>() {
                Ok(v) => *slot = Some(v),
                Err(_) => {
                    return errors::json_error(
                        StatusCode::BAD_REQUEST,
                        "validation_error",
                        format!("{key} must be a number"),
                    )
                }
            }
        }
    }

    let (page, page_size) = match pagination(&params) {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    let paged = state.listings.find_page(&filter, page, page_size);
    let total_pages = paged.total_count.div_ceil(page_size);

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "listings": paged.items.iter().map(dto::listing_to_json).collect::<Vec<_>>(),
            "page": page,
            "page_size": page_size,
            "total_count": paged.total_count,
            "total_pages": total_pages,
        })),
    )
        .into_response()
}

fn pagination(params: &HashMap<String, String>) -> Result<(u64, u64), axum::response::Response> {
    let parse = |key: &str, default: u64| -> Result<u64, axum::response::Response> {
        match params.get(key) {
            None => Ok(default),
            Some(raw) => raw.parse::<u64>().ok().filter(|v| *v >= 1).ok_or_else(|| {
                errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "validation_error",
                    "invalid pagination parameters",
                )
            }),
        }
    };
    Ok((parse("page", 1)?, parse("page_size", 10)?))
}

/// GET /listings/:id — public read; bumps the view counter.
pub async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_listing_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match state.listings.increment_views(id) {
        Some(listing) => (StatusCode::OK, Json(dto::listing_to_json(&listing))).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "listing not found"),
    }
}

/// PUT /listings/:id — owner-only partial update.
pub async fn update_listing(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
    body: Result<Json<ListingPatch>, JsonRejection>,
) -> axum::response::Response {
    let id = match parse_listing_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Json(patch) = match body {
        Ok(b) => b,
        Err(rej) => return errors::body_error(rej),
    };

    let Some(listing) = state.listings.get(id) else {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "listing not found");
    };
    if let Err(e) = ensure_listing_owner(&listing, &auth.user) {
        return errors::auth_error(e);
    }

    if patch.is_empty() {
        return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", "no updates made");
    }

    if !state.listings.update(id, patch) {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "listing not found");
    }
    (
        StatusCode::OK,
        Json(serde_json::json!({ "message": "listing updated" })),
    )
        .into_response()
}

/// PUT /listings/:id/mark_sold — owner-only status transition.
pub async fn mark_sold(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_listing_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let Some(listing) = state.listings.get(id) else {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "listing not found");
    };
    if let Err(e) = ensure_listing_owner(&listing, &auth.user) {
        return errors::auth_error(e);
    }

    if listing.status == ListingStatus::Sold {
        return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", "no changes made");
    }

    state.listings.set_status(id, ListingStatus::Sold, None);
    (
        StatusCode::OK,
        Json(serde_json::json!({ "message": "listing marked as sold" })),
    )
        .into_response()
}

/// DELETE /listings/:id — owner-only delete.
pub async fn delete_listing(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_listing_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let Some(listing) = state.listings.get(id) else {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "listing not found");
    };
    if let Err(e) = ensure_listing_owner(&listing, &auth.user) {
        return errors::auth_error(e);
    }

    state.listings.delete(id);
    (
        StatusCode::OK,
        Json(serde_json::json!({ "message": "listing deleted" })),
    )
        .into_response()
}

/// POST /listings/:id/report — any authenticated user may flag a listing.
pub async fn report_listing(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_listing_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    if !state
        .listings
        .set_status(id, ListingStatus::Reported, Some(auth.user.id))
    {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "listing not found");
    }

    tracing::info!(listing_id = %id, reporter = %auth.user.username, "listing reported");
    (
        StatusCode::OK,
        Json(serde_json::json!({ "message": "listing reported successfully" })),
    )
        .into_response()
}

/// GET /listings/stats/average_price_by_type — active listings only.
pub async fn average_price_by_type(State(state): State<AppState>) -> impl IntoResponse {
    let stats = state.listings.average_price_by_type();
    Json(serde_json::json!({
        "stats": stats.iter().map(dto::type_average_to_json).collect::<Vec<_>>(),
    }))
}

/// GET /listings/stats/summary — price aggregates plus counts per car type.
pub async fn stats_summary(State(state): State<AppState>) -> impl IntoResponse {
    Json(dto::summary_to_json(&state.listings.summary()))
}
