//! Mock authentication.
//!
//! There is no credential check: any non-blank username and password signs
//! in. The signed-in user is remembered under the `user` blob key so the
//! session survives restarts. Passwords are only ever held as
//! [`SecretString`] and are never persisted.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use shopfront_core::{Email, EmailError, UserId};

use crate::blob::BlobStore;
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::persistence::{PersistenceError, report_write_failure};

/// Blob key holding the signed-in user.
pub const USER_KEY: &str = "user";

/// Domain used to synthesize an email for users who log in by name.
const MOCK_EMAIL_DOMAIN: &str = "example.com";

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username is blank.
    #[error("username is required")]
    MissingUsername,

    /// Password is blank.
    #[error("password is required")]
    MissingPassword,

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
}

/// Signed-in shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: Email,
}

/// Boolean-returning login/register/logout over a nullable current user.
pub struct MockAuth {
    store: Arc<dyn BlobStore>,
    user: Option<User>,
}

impl std::fmt::Debug for MockAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockAuth")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl MockAuth {
    /// Restore the signed-in user from `store`, if any.
    ///
    /// An unreadable or malformed record is treated as signed out.
    #[must_use]
    pub fn load(store: Arc<dyn BlobStore>) -> Self {
        let user = match store.get(USER_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw)
                .inspect_err(|e| warn!(error = %e, "Discarding malformed user record"))
                .ok(),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read user record");
                None
            }
        };
        Self { store, user }
    }

    /// Sign in. Succeeds for any non-blank username and password.
    #[instrument(skip(self, password))]
    pub fn login(&mut self, username: &str, password: &SecretString) -> bool {
        let result = validate_credentials(username, password).and_then(|username| {
            Ok(User {
                id: new_user_id(),
                username: username.to_owned(),
                email: login_email(username)?,
            })
        });
        self.sign_in(result)
    }

    /// Create an account and sign in. Succeeds for a non-blank username and
    /// password with a well-formed email.
    #[instrument(skip(self, password))]
    pub fn register(&mut self, username: &str, email: &str, password: &SecretString) -> bool {
        let result = validate_credentials(username, password).and_then(|username| {
            Ok(User {
                id: new_user_id(),
                username: username.to_owned(),
                email: Email::parse(email)?,
            })
        });
        self.sign_in(result)
    }

    fn sign_in(&mut self, result: Result<User, AuthError>) -> bool {
        match result {
            Ok(user) => {
                info!(user_id = %user.id, username = %user.username, "Signed in");
                set_sentry_user(&user.id, &user.username, Some(user.email.as_str()));
                self.persist(&user);
                self.user = Some(user);
                true
            }
            Err(e) => {
                info!(reason = %e, "Sign-in rejected");
                false
            }
        }
    }

    fn persist(&self, user: &User) {
        let written = serde_json::to_string(user)
            .map_err(|source| PersistenceError::Serialize {
                key: USER_KEY,
                source,
            })
            .and_then(|raw| {
                self.store
                    .set(USER_KEY, &raw)
                    .map_err(PersistenceError::from)
            });
        if let Err(e) = written {
            report_write_failure(USER_KEY, &e);
        }
    }

    /// Sign out. Safe to call when nobody is signed in.
    #[instrument(skip(self))]
    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            info!(user_id = %user.id, "Signed out");
        }
        clear_sentry_user();
        if let Err(e) = self.store.remove(USER_KEY) {
            report_write_failure(USER_KEY, &PersistenceError::Storage(e));
        }
    }

    /// Signed-in user, if any.
    #[must_use]
    pub const fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Whether somebody is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Email for a user who signed in by name.
///
/// A username that is already an address is used as is. Anything else
/// becomes the local part of a mock address, with `@` replaced and the
/// length capped so the result always parses.
fn login_email(username: &str) -> Result<Email, AuthError> {
    if let Ok(email) = Email::parse(username) {
        return Ok(email);
    }
    let max_local = Email::MAX_LENGTH - MOCK_EMAIL_DOMAIN.len() - 1;
    let mut local = String::with_capacity(username.len().min(max_local));
    for c in username.chars().map(|c| if c == '@' { '_' } else { c }) {
        if local.len() + c.len_utf8() > max_local {
            break;
        }
        local.push(c);
    }
    Ok(Email::parse(&format!("{local}@{MOCK_EMAIL_DOMAIN}"))?)
}

fn new_user_id() -> UserId {
    UserId::new(Uuid::new_v4().to_string())
}

fn validate_credentials<'a>(
    username: &'a str,
    password: &SecretString,
) -> Result<&'a str, AuthError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AuthError::MissingUsername);
    }
    if password.expose_secret().trim().is_empty() {
        return Err(AuthError::MissingPassword);
    }
    Ok(username)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::blob::{BlobStoreError, MemoryBlobStore, MockBlobStore};

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    fn auth() -> (MockAuth, Arc<MemoryBlobStore>) {
        let store = Arc::new(MemoryBlobStore::new());
        (MockAuth::load(store.clone()), store)
    }

    #[test]
    fn test_login_accepts_any_non_blank_credentials() {
        let (mut auth, _) = auth();
        assert!(!auth.is_authenticated());

        assert!(auth.login("priya", &secret("hunter2")));
        let user = auth.current_user().unwrap();
        assert_eq!(user.username, "priya");
        assert_eq!(user.email.as_str(), "priya@example.com");
    }

    #[test]
    fn test_login_with_email_or_long_username() {
        let (mut auth, _) = auth();
        assert!(auth.login("priya@shop.in", &secret("pw")));
        let user = auth.current_user().unwrap();
        assert_eq!(user.username, "priya@shop.in");
        assert_eq!(user.email.as_str(), "priya@shop.in");

        assert!(auth.login("a@b@c", &secret("pw")));
        assert_eq!(auth.current_user().unwrap().email.as_str(), "a_b_c@example.com");

        let long = "x".repeat(250);
        assert!(auth.login(&long, &secret("pw")));
        let user = auth.current_user().unwrap();
        assert_eq!(user.username, long);
        assert!(user.email.as_str().len() <= Email::MAX_LENGTH);
        assert!(user.email.as_str().ends_with("@example.com"));
    }

    #[test]
    fn test_login_rejects_blank_input() {
        let (mut auth, _) = auth();
        assert!(!auth.login("  ", &secret("pw")));
        assert!(!auth.login("priya", &secret("")));
        assert!(!auth.is_authenticated());
    }

    #[test]
    fn test_register_validates_email() {
        let (mut auth, _) = auth();
        assert!(!auth.register("arjun", "not-an-email", &secret("pw")));
        assert!(auth.register("arjun", "arjun@shop.in", &secret("pw")));
        assert_eq!(auth.current_user().unwrap().email.as_str(), "arjun@shop.in");
    }

    #[test]
    fn test_session_survives_reload_and_logout_clears_it() {
        let (mut auth, store) = auth();
        assert!(auth.login("meera", &secret("pw")));
        let id = auth.current_user().unwrap().id.clone();

        let restored = MockAuth::load(store.clone());
        assert_eq!(restored.current_user().unwrap().id, id);

        auth.logout();
        assert!(!auth.is_authenticated());
        assert!(store.get(USER_KEY).unwrap().is_none());

        // Logging out twice is harmless.
        auth.logout();
    }

    #[test]
    fn test_password_is_not_persisted() {
        let (mut auth, store) = auth();
        assert!(auth.login("kabir", &secret("top-secret-pw")));
        let raw = store.get(USER_KEY).unwrap().unwrap();
        assert!(!raw.contains("top-secret-pw"));
    }

    #[test]
    fn test_failed_writes_keep_local_session_state() {
        let mut store = MockBlobStore::new();
        store.expect_get().returning(|_| Ok(None));
        store.expect_set().times(1).returning(|key, _| {
            Err(BlobStoreError::Rejected {
                key: key.to_owned(),
                reason: "quota exceeded".to_string(),
            })
        });
        store.expect_remove().times(1).returning(|key| {
            Err(BlobStoreError::Rejected {
                key: key.to_owned(),
                reason: "read-only".to_string(),
            })
        });
        let mut auth = MockAuth::load(Arc::new(store));

        assert!(auth.login("farah", &secret("pw")));
        assert_eq!(auth.current_user().unwrap().username, "farah");

        auth.logout();
        assert!(!auth.is_authenticated());
    }

    #[test]
    fn test_malformed_user_record_means_signed_out() {
        let store = Arc::new(MemoryBlobStore::with_entries([(USER_KEY, "{")]));
        assert!(!MockAuth::load(store).is_authenticated());
    }
}
