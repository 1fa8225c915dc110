//! `carlot-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it covers
//! token issuance/verification, the role model, password hashing and the
//! shared auth error taxonomy. Revocation checks and live-user resolution
//! happen at the API boundary where the stores live.

pub mod claims;
pub mod error;
pub mod password;
pub mod roles;
pub mod token;
pub mod user;

pub use claims::Claims;
pub use error::AuthError;
pub use password::{hash_password, verify_password};
pub use roles::Role;
pub use token::{TokenService, TOKEN_TTL_SECS};
pub use user::User;
