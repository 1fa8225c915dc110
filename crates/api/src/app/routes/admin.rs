//! Admin moderation routes.
//!
//! Every handler runs the admin gate via the `AdminOnly` extractor; the role
//! check uses the freshly resolved record, so revoking admin rights blocks
//! these routes on the very next request.

use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, put},
    Json, Router,
};

use carlot_auth::Role;
use carlot_core::{ListingId, UserId};
use carlot_listings::ListingStatus;

use crate::app::{dto, errors, services::AppState};
use crate::context::AdminOnly;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/listings", get(moderation_queue))
        .route("/listings/:id", delete(delete_listing))
        .route("/users", get(list_users))
        .route("/users/:id", delete(delete_user))
        .route("/users/:id/role", put(update_user_role))
}

/// GET /admin/listings — reported and sold listings, optionally one seller's.
pub async fn moderation_queue(
    State(state): State<AppState>,
    _admin: AdminOnly,
    Query(params): Query<HashMap<String, String>>,
) -> axum::response::Response {
    let seller = match params.get("seller_id") {
        None => None,
        Some(raw) => match raw.parse::<UserId>() {
            Ok(id) => Some(id),
            Err(e) => return errors::domain_error(e),
        },
    };

    let items = state
        .listings
        .find_by_status(&[ListingStatus::Reported, ListingStatus::Sold], seller);

    (
        StatusCode::OK,
        Json(
            items
                .iter()
                .map(dto::moderated_listing_to_json)
                .collect::<Vec<_>>(),
        ),
    )
        .into_response()
}

/// DELETE /admin/listings/:id — only reported or sold listings are deletable.
pub async fn delete_listing(
    State(state): State<AppState>,
    admin: AdminOnly,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match id.parse::<ListingId>() {
        Ok(v) => v,
        Err(e) => return errors::domain_error(e),
    };

    let Some(listing) = state.listings.get(id) else {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "listing not found");
    };
    if !listing.status.admin_deletable() {
        return errors::json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "only reported or sold listings can be deleted",
        );
    }

    state.listings.delete(id);
    tracing::info!(listing_id = %id, admin = %admin.user.username, "listing removed by moderation");
    (
        StatusCode::OK,
        Json(serde_json::json!({ "message": "listing deleted successfully" })),
    )
        .into_response()
}

/// GET /admin/users — id/username/role projection of all accounts.
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminOnly,
) -> axum::response::Response {
    let users = state.users.list();
    (
        StatusCode::OK,
        Json(users.iter().map(dto::user_to_json).collect::<Vec<_>>()),
    )
        .into_response()
}

/// DELETE /admin/users/:id — remove an account.
pub async fn delete_user(
    State(state): State<AppState>,
    _admin: AdminOnly,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match id.parse::<UserId>() {
        Ok(v) => v,
        Err(e) => return errors::domain_error(e),
    };

    if !state.users.delete(id) {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "user not found");
    }
    (
        StatusCode::OK,
        Json(serde_json::json!({ "message": "user deleted" })),
    )
        .into_response()
}

/// PUT /admin/users/:id/role — change an account's role (e.g. promote to
/// admin). Takes effect on the target's next request.
pub async fn update_user_role(
    State(state): State<AppState>,
    _admin: AdminOnly,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateRoleRequest>, JsonRejection>,
) -> axum::response::Response {
    let id = match id.parse::<UserId>() {
        Ok(v) => v,
        Err(e) => return errors::domain_error(e),
    };
    let Json(body) = match body {
        Ok(b) => b,
        Err(rej) => return errors::body_error(rej),
    };

    let role = match body.role.parse::<Role>() {
        Ok(r) => r,
        Err(e) => return errors::domain_error(e),
    };

    if !state.users.update_role(id, role) {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "user not found");
    }
    (
        StatusCode::OK,
        Json(serde_json::json!({ "message": "user role updated" })),
    )
        .into_response()
}
