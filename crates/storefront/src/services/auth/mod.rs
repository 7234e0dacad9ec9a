//! Authentication service.
//!
//! The [`SessionStore`] owns the local store, the credential records in it and
//! the session of the signed-in account. Credentials are checked locally and
//! sessions are carried by the mock token from [`token`].

mod error;
pub mod password;
pub mod token;

pub use error::{AuthError, TokenError};
pub use password::PasswordScheme;

use std::sync::Arc;
use std::time::Duration;

use tracing::instrument;

use eshop_pro_core::{Email, UserId};

use crate::clock::Clock;
use crate::db::{KeyValueStore, RepositoryError, SessionRepository, UserRepository};
use crate::models::{CredentialRecord, Identity, Session, SessionClaims};

/// Default session lifetime: one hour from issuance.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

/// Tunables for the session store.
#[derive(Debug, Clone, Copy)]
pub struct AuthSettings {
    /// How long an issued token stays valid.
    pub session_ttl: Duration,
    /// How new passwords are stored.
    pub password_scheme: PasswordScheme,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            session_ttl: DEFAULT_SESSION_TTL,
            password_scheme: PasswordScheme::default(),
        }
    }
}

/// Session store.
///
/// Handles signup, login, logout and restoring a persisted session.
pub struct SessionStore {
    store: Box<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    settings: AuthSettings,
    active: Option<SessionClaims>,
}

impl SessionStore {
    /// Create a signed-out session store over `store`.
    ///
    /// Call [`restore_session`](Self::restore_session) to pick up a persisted
    /// session.
    #[must_use]
    pub fn new(store: Box<dyn KeyValueStore>, clock: Arc<dyn Clock>, settings: AuthSettings) -> Self {
        Self {
            store,
            clock,
            settings,
            active: None,
        }
    }

    /// The current session.
    #[must_use]
    pub fn session(&self) -> Session {
        self.active
            .as_ref()
            .map_or_else(Session::anonymous, |claims| {
                Session::authenticated(claims.identity())
            })
    }

    /// Claims of the active session, if signed in.
    #[must_use]
    pub const fn active_claims(&self) -> Option<&SessionClaims> {
        self.active.as_ref()
    }

    fn ttl_ms(&self) -> i64 {
        i64::try_from(self.settings.session_ttl.as_millis()).unwrap_or(i64::MAX)
    }

    // =========================================================================
    // Password Authentication
    // =========================================================================

    /// Register a new account and sign in as it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::EmptyPassword` if the password is empty.
    /// Returns `AuthError::DuplicateEmail` if the email is already registered.
    #[instrument(skip(self, password))]
    pub fn signup(&mut self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let email = Email::parse(email)?;

        if password.is_empty() {
            return Err(AuthError::EmptyPassword);
        }

        let record = CredentialRecord {
            user_id: UserId::generate(),
            email,
            password: self.settings.password_scheme.store(password)?,
            hashed: self.settings.password_scheme.is_hashed(),
        };

        let record = UserRepository::new(self.store.as_mut())
            .create(record)
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::DuplicateEmail,
                other => AuthError::Repository(other),
            })?;

        let identity = record.identity();
        self.start_session(&identity)?;
        tracing::info!(user_id = %identity.user_id, "Account created");

        Ok(identity)
    }

    /// Sign in with an exact email and password match.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if no record matches.
    #[instrument(skip(self, password))]
    pub fn login(&mut self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let Ok(email) = Email::parse(email) else {
            return Err(AuthError::InvalidCredentials);
        };

        let record = UserRepository::new(self.store.as_mut())
            .get_by_email(&email)?
            .ok_or(AuthError::InvalidCredentials)?;

        if !password::verify(&record.password, record.hashed, password) {
            return Err(AuthError::InvalidCredentials);
        }

        let identity = record.identity();
        self.start_session(&identity)?;
        tracing::info!(user_id = %identity.user_id, "Signed in");

        Ok(identity)
    }

    /// Discard the stored token and sign out.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the token cannot be removed.
    #[instrument(skip(self))]
    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.active = None;
        SessionRepository::new(self.store.as_mut()).clear_token()?;
        tracing::info!("Signed out");
        Ok(())
    }

    // =========================================================================
    // Session Tokens
    // =========================================================================

    /// Pick up a persisted session at process start.
    ///
    /// A token that does not decode or is past its expiry is discarded and
    /// the session starts signed out. Also seeds an empty record list.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` only if the store itself fails.
    #[instrument(skip(self))]
    pub fn restore_session(&mut self) -> Result<Session, AuthError> {
        UserRepository::new(self.store.as_mut()).ensure_initialized()?;

        let Some(raw) = SessionRepository::new(self.store.as_mut()).token()? else {
            self.active = None;
            return Ok(Session::anonymous());
        };

        match token::validate(&raw, self.clock.now_ms()) {
            Ok(claims) => {
                tracing::info!(user_id = %claims.user_id, "Restored session");
                self.active = Some(claims);
            }
            Err(e) => {
                tracing::warn!(error = %AuthError::from(e), "Discarding stored session token");
                self.active = None;
                SessionRepository::new(self.store.as_mut()).clear_token()?;
            }
        }

        Ok(self.session())
    }

    /// Sign out if the active token has expired since it was issued.
    ///
    /// Returns `true` if a session was expired by this call.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the stale token cannot be removed.
    pub fn expire_if_stale(&mut self) -> Result<bool, AuthError> {
        let now = self.clock.now_ms();
        match &self.active {
            Some(claims) if !claims.is_live_at(now) => {
                tracing::info!(user_id = %claims.user_id, exp = claims.exp, "Session expired");
                self.active = None;
                SessionRepository::new(self.store.as_mut()).clear_token()?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Registered accounts, in signup order.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the records cannot be loaded.
    pub fn accounts(&mut self) -> Result<Vec<Identity>, AuthError> {
        Ok(UserRepository::new(self.store.as_mut())
            .all()?
            .iter()
            .map(CredentialRecord::identity)
            .collect())
    }

    fn start_session(&mut self, identity: &Identity) -> Result<(), AuthError> {
        let claims = token::issue(identity, self.clock.now_ms(), self.ttl_ms());
        let encoded = token::encode(&claims)?;
        SessionRepository::new(self.store.as_mut()).save_token(encoded)?;
        self.active = Some(claims);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::db::MemoryStore;
    use crate::models::storage_keys;

    const HOUR_MS: i64 = 60 * 60 * 1000;

    fn plain_store(clock: &ManualClock) -> SessionStore {
        SessionStore::new(
            Box::new(MemoryStore::new()),
            Arc::new(clock.clone()),
            AuthSettings {
                password_scheme: PasswordScheme::Plain,
                ..AuthSettings::default()
            },
        )
    }

    #[test]
    fn test_signup_signs_in_and_rejects_duplicates() {
        let clock = ManualClock::starting_at(0);
        let mut sessions = plain_store(&clock);

        let identity = sessions.signup("a@x.com", "pw").unwrap();
        assert_eq!(identity.email.as_str(), "a@x.com");
        assert_eq!(sessions.session().email(), Some(&identity.email));

        assert!(matches!(
            sessions.signup("a@x.com", "pw2"),
            Err(AuthError::DuplicateEmail)
        ));
        assert_eq!(sessions.accounts().unwrap().len(), 1);
    }

    #[test]
    fn test_signup_validates_input() {
        let clock = ManualClock::starting_at(0);
        let mut sessions = plain_store(&clock);

        assert!(matches!(
            sessions.signup("not-an-email", "pw"),
            Err(AuthError::InvalidEmail(_))
        ));
        assert!(matches!(
            sessions.signup("a@x.com", ""),
            Err(AuthError::EmptyPassword)
        ));
        assert!(!sessions.session().is_authenticated());
    }

    #[test]
    fn test_login_requires_exact_match() {
        let clock = ManualClock::starting_at(0);
        let mut sessions = plain_store(&clock);
        sessions.signup("a@x.com", "pw").unwrap();
        sessions.logout().unwrap();

        for (email, password) in [("a@x.com", "PW"), ("A@x.com", "pw"), ("b@x.com", "pw"), ("", "pw")] {
            assert!(
                matches!(sessions.login(email, password), Err(AuthError::InvalidCredentials)),
                "{email}/{password} should be rejected"
            );
        }
        assert!(!sessions.session().is_authenticated());

        sessions.login("a@x.com", "pw").unwrap();
        assert!(sessions.session().is_authenticated());
    }

    #[test]
    fn test_login_against_argon2_records() {
        let clock = ManualClock::starting_at(0);
        let mut sessions = SessionStore::new(
            Box::new(MemoryStore::new()),
            Arc::new(clock),
            AuthSettings::default(),
        );
        sessions.signup("a@x.com", "pw").unwrap();
        sessions.logout().unwrap();

        assert!(sessions.login("a@x.com", "nope").is_err());
        assert!(sessions.login("a@x.com", "pw").is_ok());
    }

    #[test]
    fn test_restore_session_picks_up_live_token() {
        let clock = ManualClock::starting_at(1_000);
        let mut sessions = plain_store(&clock);
        let identity = sessions.signup("a@x.com", "pw").unwrap();

        let SessionStore { store, .. } = sessions;
        let mut restarted = SessionStore::new(store, Arc::new(clock.clone()), AuthSettings::default());
        clock.advance_ms(HOUR_MS - 1);

        let session = restarted.restore_session().unwrap();
        assert_eq!(session.identity(), Some(&identity));
    }

    #[test]
    fn test_restore_session_discards_expired_token() {
        let clock = ManualClock::starting_at(1_000);
        let mut sessions = plain_store(&clock);
        sessions.signup("a@x.com", "pw").unwrap();

        clock.advance_ms(HOUR_MS);
        let session = sessions.restore_session().unwrap();

        assert!(!session.is_authenticated());
        assert_eq!(sessions.store.get(storage_keys::JWT_TOKEN).unwrap(), None);
    }

    #[test]
    fn test_restore_session_discards_malformed_token() {
        let clock = ManualClock::starting_at(0);
        let mut sessions = plain_store(&clock);
        sessions
            .store
            .set(storage_keys::JWT_TOKEN, "definitely not a token".to_owned())
            .unwrap();

        assert!(!sessions.restore_session().unwrap().is_authenticated());
        assert_eq!(sessions.store.get(storage_keys::JWT_TOKEN).unwrap(), None);
        assert_eq!(
            sessions.store.get(storage_keys::MOCK_USERS).unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn test_logout_then_restore_is_signed_out() {
        let clock = ManualClock::starting_at(0);
        let mut sessions = plain_store(&clock);
        sessions.signup("a@x.com", "pw").unwrap();
        sessions.logout().unwrap();

        assert!(!sessions.restore_session().unwrap().is_authenticated());
    }

    #[test]
    fn test_expire_if_stale() {
        let clock = ManualClock::starting_at(0);
        let mut sessions = plain_store(&clock);
        sessions.signup("a@x.com", "pw").unwrap();

        clock.advance_ms(HOUR_MS - 1);
        assert!(!sessions.expire_if_stale().unwrap());

        clock.advance_ms(1);
        assert!(sessions.expire_if_stale().unwrap());
        assert!(!sessions.session().is_authenticated());
        assert!(!sessions.expire_if_stale().unwrap());
    }
}
