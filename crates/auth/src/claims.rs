use serde::{Deserialize, Serialize};

use crate::Role;

/// Session token claims (transport-agnostic).
///
/// Wire format: `{ "user": <username>, "role": <role>, "exp": <unix ts> }`.
/// `role` is a snapshot taken at login; authorization always re-reads the
/// live user record instead of trusting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username the session was issued for.
    pub user: String,

    /// Role at the time of login (informational only).
    pub role: Role,

    /// Expiry as a unix timestamp (seconds).
    pub exp: i64,
}
