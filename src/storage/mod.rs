use crate::domain::table::Row;
use crate::domain::user::User;
use crate::error::Result;

pub mod file_store;
pub mod user_registry;

use file_store::FileStore;
use user_registry::UserRegistry;

/// Process-lifetime state shared by every request handler.
///
/// Cloning is cheap and every clone sees the same data. Nothing is persisted: dropping
/// the last handle discards all accounts and rows.
#[derive(Clone, Debug, Default)]
pub struct Store {
    users: UserRegistry,
    files: FileStore,
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `user` and gives them an empty row collection in one step.
    ///
    /// # Errors
    /// Returns `AppError::AlreadyExists` if the username is taken.
    pub fn register(&self, user: User) -> Result<()> {
        self.users.register(user, |username| self.files.initialize(username))
    }

    #[must_use]
    pub fn user_exists(&self, username: &str) -> bool {
        self.users.exists(username)
    }

    #[must_use]
    pub fn usernames(&self) -> Vec<String> {
        self.users.list()
    }

    #[must_use]
    pub fn user_count(&self) -> usize {
        self.users.count()
    }

    /// # Errors
    /// Returns `AppError::UserNotFound` if the user is not registered.
    pub fn append_rows(&self, username: &str, rows: Vec<Row>) -> Result<usize> {
        self.files.append(username, rows)
    }

    /// # Errors
    /// Returns `AppError::UserNotFound` if the user is not registered.
    pub fn rows(&self, username: &str) -> Result<Vec<Row>> {
        self.files.get(username)
    }
}
