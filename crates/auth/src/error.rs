use thiserror::Error;

/// Failures produced by the authentication/authorization chain.
///
/// Everything except `Forbidden` means "unauthenticated" (HTTP 401);
/// `Forbidden` is an authorization failure for a valid identity (HTTP 403).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("token is missing")]
    MissingToken,

    #[error("token is invalid")]
    MalformedToken,

    #[error("token has expired")]
    ExpiredToken,

    #[error("token has been revoked")]
    RevokedToken,

    #[error("user not found")]
    UnknownUser,

    #[error("forbidden")]
    Forbidden,
}

impl AuthError {
    /// Stable machine-readable code used in error responses.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::MalformedToken => "token_malformed",
            AuthError::ExpiredToken => "token_expired",
            AuthError::RevokedToken => "token_revoked",
            AuthError::UnknownUser => "unknown_user",
            AuthError::Forbidden => "forbidden",
        }
    }
}
