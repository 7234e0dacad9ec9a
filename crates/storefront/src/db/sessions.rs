//! Session token persistence.

use super::{KeyValueStore, RepositoryError};
use crate::models::storage_keys;

/// Repository for the single stored session token.
pub struct SessionRepository<'a> {
    store: &'a mut dyn KeyValueStore,
}

impl<'a> SessionRepository<'a> {
    #[must_use]
    pub fn new(store: &'a mut dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// The stored encoded token, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read.
    pub fn token(&self) -> Result<Option<String>, RepositoryError> {
        self.store.get(storage_keys::JWT_TOKEN)
    }

    /// Replace the stored token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be written.
    pub fn save_token(&mut self, token: String) -> Result<(), RepositoryError> {
        self.store.set(storage_keys::JWT_TOKEN, token)
    }

    /// Discard the stored token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be written.
    pub fn clear_token(&mut self) -> Result<(), RepositoryError> {
        self.store.remove(storage_keys::JWT_TOKEN)
    }
}
