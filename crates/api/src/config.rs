//! Environment-driven API configuration.
//!
//! The JWT secret is read once at startup and never rotated at runtime.

/// Runtime configuration for the API process.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HMAC secret for session tokens.
    pub jwt_secret: String,
    /// Request header carrying the session token.
    pub token_header: String,
    /// Listen address for the HTTP server.
    pub bind_addr: String,
}

pub const DEFAULT_TOKEN_HEADER: &str = "x-access-token";

impl ApiConfig {
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });
        let token_header =
            std::env::var("TOKEN_HEADER").unwrap_or_else(|_| DEFAULT_TOKEN_HEADER.to_string());
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        Self {
            jwt_secret,
            token_header,
            bind_addr,
        }
    }

    /// Config with defaults and an explicit secret (tests, embedded use).
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_header: DEFAULT_TOKEN_HEADER.to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
        }
    }
}
