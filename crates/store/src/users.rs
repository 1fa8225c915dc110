//! Credential store: persisted user records keyed by username.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use carlot_auth::{Role, User};
use carlot_core::{DomainError, DomainResult, UserId};

/// Persisted user records.
///
/// Usernames are unique (enforced at insert) and looked up with
/// case-sensitive exact matches.
pub trait UserStore: Send + Sync {
    fn find_by_username(&self, username: &str) -> Option<User>;
    fn find_by_id(&self, id: UserId) -> Option<User>;
    /// Insert a new user; fails with `Conflict` when the username is taken.
    fn insert(&self, user: User) -> DomainResult<()>;
    /// Replace the role on a live record. Returns false when the user is gone.
    fn update_role(&self, id: UserId, role: Role) -> bool;
    fn delete(&self, id: UserId) -> bool;
    fn list(&self) -> Vec<User>;
}

impl<S> UserStore for Arc<S>
where
    S: UserStore + ?Sized,
{
    fn find_by_username(&self, username: &str) -> Option<User> {
        (**self).find_by_username(username)
    }

    fn find_by_id(&self, id: UserId) -> Option<User> {
        (**self).find_by_id(id)
    }

    fn insert(&self, user: User) -> DomainResult<()> {
        (**self).insert(user)
    }

    fn update_role(&self, id: UserId, role: Role) -> bool {
        (**self).update_role(id, role)
    }

    fn delete(&self, id: UserId) -> bool {
        (**self).delete(id)
    }

    fn list(&self) -> Vec<User> {
        (**self).list()
    }
}

/// In-memory credential store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    inner: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for InMemoryUserStore {
    fn find_by_username(&self, username: &str) -> Option<User> {
        let map = self.inner.read().ok()?;
        map.values().find(|u| u.username == username).cloned()
    }

    fn find_by_id(&self, id: UserId) -> Option<User> {
        let map = self.inner.read().ok()?;
        map.get(&id).cloned()
    }

    fn insert(&self, user: User) -> DomainResult<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::conflict("user store poisoned"))?;
        if map.values().any(|u| u.username == user.username) {
            return Err(DomainError::conflict(format!(
                "username '{}' already exists",
                user.username
            )));
        }
        map.insert(user.id, user);
        Ok(())
    }

    fn update_role(&self, id: UserId, role: Role) -> bool {
        match self.inner.write() {
            Ok(mut map) => match map.get_mut(&id) {
                Some(user) => {
                    user.role = role;
                    true
                }
                None => false,
            },
            Err(_) => false,
        }
    }

    fn delete(&self, id: UserId) -> bool {
        match self.inner.write() {
            Ok(mut map) => map.remove(&id).is_some(),
            Err(_) => false,
        }
    }

    fn list(&self) -> Vec<User> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };
        let mut users: Vec<User> = map.values().cloned().collect();
        users.sort_by_key(|u| *u.id.as_uuid());
        users
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, role: Role) -> User {
        User::new(name, "hash", role)
    }

    #[test]
    fn duplicate_username_is_a_conflict() {
        let store = InMemoryUserStore::new();
        store.insert(user("alice", Role::Buyer)).unwrap();
        let err = store.insert(user("alice", Role::Seller)).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn username_lookup_is_case_sensitive() {
        let store = InMemoryUserStore::new();
        store.insert(user("Alice", Role::Buyer)).unwrap();
        assert!(store.find_by_username("Alice").is_some());
        assert!(store.find_by_username("alice").is_none());
    }

    #[test]
    fn role_update_hits_the_live_record() {
        let store = InMemoryUserStore::new();
        let u = user("alice", Role::Admin);
        let id = u.id;
        store.insert(u).unwrap();

        assert!(store.update_role(id, Role::Buyer));
        assert_eq!(store.find_by_id(id).unwrap().role, Role::Buyer);
        assert!(!store.update_role(UserId::new(), Role::Admin));
    }

    #[test]
    fn delete_removes_the_record() {
        let store = InMemoryUserStore::new();
        let u = user("alice", Role::Buyer);
        let id = u.id;
        store.insert(u).unwrap();

        assert!(store.delete(id));
        assert!(!store.delete(id));
        assert!(store.find_by_id(id).is_none());
    }
}
