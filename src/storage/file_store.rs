use crate::domain::table::Row;
use crate::error::{AppError, Result};
use dashmap::DashMap;
use std::sync::Arc;

/// Rows uploaded by each user, accumulated across uploads in arrival order.
#[derive(Clone, Debug, Default)]
pub struct FileStore {
    files: Arc<DashMap<String, Vec<Row>>>,
}

impl FileStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty collection for a newly registered user.
    pub(crate) fn initialize(&self, username: &str) {
        self.files.entry(username.to_string()).or_default();
    }

    /// Appends `rows` after whatever the user already has and returns the new total.
    ///
    /// # Errors
    /// Returns `AppError::UserNotFound` if the user has no collection.
    pub fn append(&self, username: &str, rows: Vec<Row>) -> Result<usize> {
        let mut existing = self.files.get_mut(username).ok_or(AppError::UserNotFound)?;
        existing.extend(rows);
        Ok(existing.len())
    }

    /// Returns a snapshot of everything the user has uploaded.
    ///
    /// # Errors
    /// Returns `AppError::UserNotFound` if the user has no collection.
    pub fn get(&self, username: &str) -> Result<Vec<Row>> {
        self.files.get(username).map(|rows| rows.clone()).ok_or(AppError::UserNotFound)
    }
}
