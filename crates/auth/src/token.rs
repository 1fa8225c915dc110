//! Session token issuance and verification (HS256).
//!
//! Verification is pure: it checks signature and expiry only. Revocation and
//! live-user resolution are separate store-backed checks at the API boundary.

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use crate::{AuthError, Claims, Role};

/// Fixed session lifetime: one hour from issuance.
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

/// Issues and verifies signed session tokens.
///
/// Holds the process-wide secret, injected once at startup and never rotated
/// at runtime.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // No leeway: a token whose exp has passed is expired, full stop.
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token for `username` carrying the login-time `role` snapshot,
    /// expiring `TOKEN_TTL_SECS` from now.
    pub fn issue(&self, username: &str, role: Role) -> anyhow::Result<String> {
        let claims = Claims {
            user: username.to_string(),
            role,
            exp: Utc::now().timestamp() + TOKEN_TTL_SECS,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(token)
    }

    /// Verify signature and expiry, returning the embedded claims.
    ///
    /// Stateless: does not consult the revocation registry or user store.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        match decode::<Claims>(token, &self.decoding, &self.validation) {
            Ok(data) => Ok(data.claims),
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
                Err(AuthError::ExpiredToken)
            }
            Err(_) => Err(AuthError::MalformedToken),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mint_with_exp(secret: &[u8], username: &str, role: Role, exp: i64) -> String {
        let claims = Claims {
            user: username.to_string(),
            role,
            exp,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    #[test]
    fn issue_then_verify_roundtrips_claims() {
        let svc = TokenService::new(b"test-secret");
        let token = svc.issue("alice", Role::Seller).unwrap();

        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims.user, "alice");
        assert_eq!(claims.role, Role::Seller);

        // Expiry lands at now + 1h (small tolerance for test runtime).
        let expected = Utc::now().timestamp() + TOKEN_TTL_SECS;
        assert!((claims.exp - expected).abs() <= 2);
    }

    #[test]
    fn expired_token_fails_with_expired() {
        let secret = b"test-secret";
        let svc = TokenService::new(secret);
        let stale = mint_with_exp(secret, "alice", Role::Buyer, Utc::now().timestamp() - 120);

        assert_eq!(svc.verify(&stale).unwrap_err(), AuthError::ExpiredToken);
    }

    #[test]
    fn token_signed_with_other_secret_is_malformed() {
        let svc = TokenService::new(b"right-secret");
        let forged = mint_with_exp(
            b"wrong-secret",
            "alice",
            Role::Admin,
            Utc::now().timestamp() + 600,
        );

        assert_eq!(svc.verify(&forged).unwrap_err(), AuthError::MalformedToken);
    }

    #[test]
    fn structurally_broken_token_is_malformed() {
        let svc = TokenService::new(b"test-secret");
        assert_eq!(
            svc.verify("definitely.not.a.jwt").unwrap_err(),
            AuthError::MalformedToken
        );
    }

    #[test]
    fn fresh_tokens_are_distinct_across_logins() {
        // The exp timestamp moves, so two logins a tick apart differ; the
        // service itself is stateless either way.
        let svc = TokenService::new(b"test-secret");
        let a = svc.issue("alice", Role::Seller).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(1100));
        let b = svc.issue("alice", Role::Seller).unwrap();
        assert_ne!(a, b);
    }
}
