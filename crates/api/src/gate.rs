//! Authorization gate: the composed checks every protected request must pass
//! before its handler runs.
//!
//! The chain is linear and performs no writes: extract token, verify
//! signature/expiry, check the revocation registry, resolve the live user.
//! The admin variant re-checks the role on the freshly resolved record, never
//! the token claim, so a demotion bites on the very next request.

use std::sync::Arc;

use carlot_auth::{AuthError, TokenService, User};
use carlot_listings::{Listing, Review};
use carlot_store::{RevocationStore, UserStore};

pub struct AuthGate {
    tokens: Arc<TokenService>,
    revoked: Arc<dyn RevocationStore>,
    users: Arc<dyn UserStore>,
}

impl AuthGate {
    pub fn new(
        tokens: Arc<TokenService>,
        revoked: Arc<dyn RevocationStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            tokens,
            revoked,
            users,
        }
    }

    /// Authenticated-only gate. At most two store reads, both before any
    /// business logic.
    pub fn authenticate(&self, token: Option<&str>) -> Result<User, AuthError> {
        let token = token.ok_or(AuthError::MissingToken)?;
        let claims = self.tokens.verify(token)?;

        if self.revoked.exists(token) {
            return Err(AuthError::RevokedToken);
        }

        // Live record, not the token's role snapshot. A missing user is an
        // authentication failure, indistinguishable from a bad token.
        self.users
            .find_by_username(&claims.user)
            .ok_or(AuthError::UnknownUser)
    }

    /// Admin-only gate: the authenticated gate plus a live role check.
    pub fn require_admin(&self, token: Option<&str>) -> Result<User, AuthError> {
        let user = self.authenticate(token)?;
        if !user.is_admin() {
            return Err(AuthError::Forbidden);
        }
        Ok(user)
    }
}

/// Ownership check for mutating listing operations: resolved caller must be
/// the listing's owner.
pub fn ensure_listing_owner(listing: &Listing, user: &User) -> Result<(), AuthError> {
    if listing.is_owned_by(user.id) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

/// Ownership check for review updates: the caller must be the review's
/// author, regardless of who owns the listing.
pub fn ensure_review_author(review: &Review, user: &User) -> Result<(), AuthError> {
    if review.is_authored_by(&user.username) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}
