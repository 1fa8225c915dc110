//! Request context: extractors that run the authorization gate.
//!
//! Handlers declare what they need — `Authenticated` for the plain gate,
//! `AdminOnly` for the admin gate — and the failing checks short-circuit to
//! an error response before the handler body executes.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts, response::Response};

use carlot_auth::User;

use crate::app::{errors, services::AppState};

fn header_token<'a>(parts: &'a Parts, state: &AppState) -> Option<&'a str> {
    parts
        .headers
        .get(&state.token_header)
        .and_then(|v| v.to_str().ok())
}

/// The acting identity behind a protected request, plus the literal token
/// string it arrived with (logout revokes exactly that string).
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub user: User,
    pub token: String,
}

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = header_token(parts, state);
        let user = state.gate.authenticate(token).map_err(errors::auth_error)?;
        // authenticate() only succeeds when a token was present.
        let token = token.unwrap_or_default().to_string();
        Ok(Authenticated { user, token })
    }
}

/// Admin gate: authenticated-only gate plus a live role check.
#[derive(Debug, Clone)]
pub struct AdminOnly {
    pub user: User,
}

#[async_trait]
impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = header_token(parts, state);
        let user = state.gate.require_admin(token).map_err(errors::auth_error)?;
        Ok(AdminOnly { user })
    }
}
