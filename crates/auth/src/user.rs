use serde::{Deserialize, Serialize};

use carlot_core::UserId;

use crate::Role;

/// Persisted user record (the credential store's unit of storage).
///
/// `username` is the unique login key; uniqueness is enforced at creation by
/// the store. Lookups are case-sensitive exact matches everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

impl User {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>, role: Role) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
            password_hash: password_hash.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
