use crate::domain::user::User;
use crate::error::{AppError, Result};
use crate::storage::Store;
use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString},
};
use opentelemetry::{global, metrics::Counter};
use rand::rngs::OsRng;

#[derive(Clone, Debug)]
struct Metrics {
    users_registered_total: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("ingest-server");
        Self {
            users_registered_total: meter
                .u64_counter("ingest_users_registered_total")
                .with_description("Total number of successful user registrations")
                .build(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AccountService {
    store: Store,
    metrics: Metrics,
}

impl AccountService {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self { store, metrics: Metrics::new() }
    }

    /// Registers a new account with an empty row collection.
    ///
    /// # Errors
    /// Returns `AppError::InvalidRequest` for an empty username,
    /// `AppError::AlreadyExists` if the username is taken.
    #[tracing::instrument(skip(self, password), fields(username = %username), err(level = "warn"))]
    pub async fn register(&self, username: String, password: String) -> Result<()> {
        if username.is_empty() {
            return Err(AppError::InvalidRequest("username must not be empty".into()));
        }
        // Cheap early exit; the store re-checks under its lock.
        if self.store.user_exists(&username) {
            return Err(AppError::AlreadyExists);
        }

        let password_hash = hash_password(password).await?;
        self.store.register(User::new(username, password_hash))?;

        tracing::info!("User registered successfully");
        self.metrics.users_registered_total.add(1, &[]);

        Ok(())
    }

    /// Usernames in the order they registered.
    #[must_use]
    pub fn list_users(&self) -> Vec<String> {
        self.store.usernames()
    }
}

async fn hash_password(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|_| AppError::Internal)
            .map(|h| h.to_string())
    })
    .await
    .map_err(|_| AppError::Internal)?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_and_list() {
        let service = AccountService::new(Store::new());
        service.register("u1".into(), "p".into()).await.unwrap();
        service.register("u2".into(), "p".into()).await.unwrap();
        assert_eq!(service.list_users(), vec!["u1", "u2"]);
    }

    #[tokio::test]
    async fn test_register_twice_fails() {
        let service = AccountService::new(Store::new());
        service.register("u1".into(), "p".into()).await.unwrap();
        let err = service.register("u1".into(), "other".into()).await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists));
        assert_eq!(service.list_users().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_username_rejected() {
        let service = AccountService::new(Store::new());
        let err = service.register(String::new(), "p".into()).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
        assert!(service.list_users().is_empty());
    }

    #[tokio::test]
    async fn test_password_is_stored_hashed() {
        let hash = hash_password("secret".into()).await.unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(!hash.contains("secret"));
    }
}
