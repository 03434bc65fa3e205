use crate::domain::user::User;
use crate::error::{AppError, Result};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::{Arc, PoisonError, RwLock};

/// Known accounts, keyed by username, remembering the order they registered in.
#[derive(Clone, Debug, Default)]
pub struct UserRegistry {
    users: Arc<DashMap<String, User>>,
    order: Arc<RwLock<Vec<String>>>,
}

impl UserRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `user` unless the username is taken.
    ///
    /// `on_insert` runs while the username's entry is still locked, so anything it sets
    /// up is in place before another caller can observe the new account.
    ///
    /// # Errors
    /// Returns `AppError::AlreadyExists` if the username is already registered.
    pub fn register(&self, user: User, on_insert: impl FnOnce(&str)) -> Result<()> {
        match self.users.entry(user.username.clone()) {
            Entry::Occupied(_) => Err(AppError::AlreadyExists),
            Entry::Vacant(slot) => {
                on_insert(&user.username);
                self.order.write().unwrap_or_else(PoisonError::into_inner).push(user.username.clone());
                slot.insert(user);
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn exists(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    /// Usernames in registration order.
    #[must_use]
    pub fn list(&self) -> Vec<String> {
        self.order.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.users.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> User {
        User::new(name.to_string(), "hash".to_string())
    }

    #[test]
    fn test_register_then_exists() {
        let registry = UserRegistry::new();
        assert!(!registry.exists("alice"));
        registry.register(user("alice"), |_| {}).unwrap();
        assert!(registry.exists("alice"));
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_duplicate_register_fails_and_keeps_size() {
        let registry = UserRegistry::new();
        registry.register(user("alice"), |_| {}).unwrap();

        let mut called = false;
        let err = registry.register(user("alice"), |_| called = true).unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists));
        assert!(!called, "setup hook must not run for a rejected registration");
        assert_eq!(registry.count(), 1);
        assert_eq!(registry.list(), vec!["alice"]);
    }

    #[test]
    fn test_list_keeps_registration_order() {
        let registry = UserRegistry::new();
        for name in ["zed", "amy", "mia"] {
            registry.register(user(name), |_| {}).unwrap();
        }
        assert_eq!(registry.list(), vec!["zed", "amy", "mia"]);
    }

    #[test]
    fn test_hook_sees_username() {
        let registry = UserRegistry::new();
        let mut seen = String::new();
        registry.register(user("bob"), |name| seen = name.to_string()).unwrap();
        assert_eq!(seen, "bob");
    }
}
