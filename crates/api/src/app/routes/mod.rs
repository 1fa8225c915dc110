use axum::{routing::get, Router};

use crate::app::services::AppState;

pub mod admin;
pub mod auth;
pub mod listings;
pub mod reviews;
pub mod system;

/// Full application router. Protection is declared per handler: routes that
/// need the gate take an `Authenticated`/`AdminOnly` extractor.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(system::health))
        .nest("/auth", auth::router())
        .nest("/listings", listings::router().merge(reviews::router()))
        .nest("/admin", admin::router())
}
