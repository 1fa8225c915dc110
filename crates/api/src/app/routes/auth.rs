//! Account routes: registration, login, profile, logout, self-delete.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use carlot_auth::{hash_password, verify_password, Role, User};

use crate::app::{dto, errors, services::AppState};
use crate::context::Authenticated;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", get(login))
        .route("/profile", get(profile))
        .route("/logout", get(logout))
        .route("/delete", delete(delete_account))
}

/// POST /auth/register — create an account; role defaults to buyer.
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<dto::RegisterRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rej) => return errors::body_error(rej),
    };

    if body.username.trim().is_empty() || body.password.is_empty() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "username and password are required",
        );
    }

    let role = match body.role.as_deref() {
        None => Role::Buyer,
        Some(raw) => match raw.parse::<Role>() {
            Ok(r) => r,
            Err(e) => return errors::domain_error(e),
        },
    };

    let hash = match hash_password(&body.password) {
        Ok(h) => h,
        Err(e) => return errors::internal_error(e),
    };

    if let Err(e) = state.users.insert(User::new(body.username.clone(), hash, role)) {
        return errors::domain_error(e);
    }

    tracing::info!(username = %body.username, role = %role, "user registered");
    (
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "user registered successfully" })),
    )
        .into_response()
}

/// GET /auth/login — HTTP Basic credentials in, session token out.
pub async fn login(State(state): State<AppState>, headers: HeaderMap) -> axum::response::Response {
    let Some((username, password)) = basic_credentials(&headers) else {
        return errors::json_error(
            StatusCode::UNAUTHORIZED,
            "missing_credentials",
            "missing authentication credentials",
        );
    };

    let Some(user) = state.users.find_by_username(&username) else {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "user not found");
    };

    if !verify_password(&user.password_hash, &password) {
        return errors::json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_password",
            "invalid password",
        );
    }

    match state.tokens.issue(&user.username, user.role) {
        Ok(token) => (StatusCode::OK, Json(serde_json::json!({ "token": token }))).into_response(),
        Err(e) => errors::internal_error(e),
    }
}

/// GET /auth/profile — username plus the live role.
pub async fn profile(auth: Authenticated) -> impl IntoResponse {
    Json(serde_json::json!({
        "username": auth.user.username,
        "role": auth.user.role.as_str(),
    }))
}

/// GET /auth/logout — revoke the literal token string.
pub async fn logout(State(state): State<AppState>, auth: Authenticated) -> axum::response::Response {
    state.revoked.insert(&auth.token);
    tracing::info!(username = %auth.user.username, "session revoked");
    (
        StatusCode::OK,
        Json(serde_json::json!({ "message": "logged out successfully" })),
    )
        .into_response()
}

/// DELETE /auth/delete — delete the calling account.
pub async fn delete_account(
    State(state): State<AppState>,
    auth: Authenticated,
) -> axum::response::Response {
    state.users.delete(auth.user.id);
    (
        StatusCode::OK,
        Json(serde_json::json!({ "message": "user account deleted" })),
    )
        .into_response()
}

fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?;
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    if user.is_empty() {
        return None;
    }
    Some((user.to_string(), pass.to_string()))
}
