//! User repository over the local store.
//!
//! Credential records live as one JSON array under `mock_users`, appended in
//! signup order.

use eshop_pro_core::Email;

use super::{KeyValueStore, RepositoryError};
use crate::models::CredentialRecord;
use crate::models::storage_keys;

/// Repository for credential records.
pub struct UserRepository<'a> {
    store: &'a mut dyn KeyValueStore,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub fn new(store: &'a mut dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Write an empty record list if none exists yet.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read or written.
    pub fn ensure_initialized(&mut self) -> Result<(), RepositoryError> {
        if self.store.get(storage_keys::MOCK_USERS)?.is_none() {
            self.store.set(storage_keys::MOCK_USERS, "[]".to_owned())?;
        }
        Ok(())
    }

    /// Load every credential record in signup order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if the stored value is not a
    /// JSON array of records.
    pub fn all(&self) -> Result<Vec<CredentialRecord>, RepositoryError> {
        let Some(raw) = self.store.get(storage_keys::MOCK_USERS)? else {
            return Ok(Vec::new());
        };

        serde_json::from_str(&raw).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid {}: {e}", storage_keys::MOCK_USERS))
        })
    }

    /// Find the record registered under `email` (exact match).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the records cannot be loaded.
    pub fn get_by_email(&self, email: &Email) -> Result<Option<CredentialRecord>, RepositoryError> {
        Ok(self.all()?.into_iter().find(|record| &record.email == email))
    }

    /// Append a new record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    pub fn create(&mut self, record: CredentialRecord) -> Result<CredentialRecord, RepositoryError> {
        let mut records = self.all()?;

        if records.iter().any(|existing| existing.email == record.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        records.push(record.clone());
        self.store
            .set(storage_keys::MOCK_USERS, serde_json::to_string(&records)?)?;

        Ok(record)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use eshop_pro_core::UserId;

    use super::*;
    use crate::db::MemoryStore;

    fn record(email: &str) -> CredentialRecord {
        CredentialRecord {
            user_id: UserId::generate(),
            email: Email::parse(email).unwrap(),
            password: "pw".to_owned(),
            hashed: false,
        }
    }

    #[test]
    fn test_ensure_initialized_writes_empty_array_once() {
        let mut store = MemoryStore::new();
        UserRepository::new(&mut store).ensure_initialized().unwrap();
        assert_eq!(store.get(storage_keys::MOCK_USERS).unwrap().as_deref(), Some("[]"));

        UserRepository::new(&mut store).create(record("a@x.com")).unwrap();
        UserRepository::new(&mut store).ensure_initialized().unwrap();
        assert_eq!(UserRepository::new(&mut store).all().unwrap().len(), 1);
    }

    #[test]
    fn test_create_rejects_duplicate_email() {
        let mut store = MemoryStore::new();
        let mut users = UserRepository::new(&mut store);

        users.create(record("a@x.com")).unwrap();
        assert!(matches!(
            users.create(record("a@x.com")),
            Err(RepositoryError::Conflict(_))
        ));
        users.create(record("A@x.com")).unwrap();
        assert_eq!(users.all().unwrap().len(), 2);
    }

    #[test]
    fn test_records_use_camel_case_layout() {
        let mut store = MemoryStore::new();
        let created = UserRepository::new(&mut store).create(record("a@x.com")).unwrap();

        let raw = store.get(storage_keys::MOCK_USERS).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json[0]["userId"], created.user_id.to_string());
        assert_eq!(json[0]["email"], "a@x.com");
        assert_eq!(json[0]["password"], "pw");
        assert!(json[0].get("hashed").is_none());
    }

    #[test]
    fn test_corrupt_records_are_reported() {
        let mut store = MemoryStore::new();
        store.set(storage_keys::MOCK_USERS, "{".to_owned()).unwrap();

        assert!(matches!(
            UserRepository::new(&mut store).all(),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
