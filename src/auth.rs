//! Mock authentication: salted password digests, opaque session tokens and
//! a JSON session file standing in for browser storage.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::db::{NewUser, PublicUser};
use crate::error::AuthError;
use crate::latency::{Latency, Operation};
use crate::store::UserStore;

/// BLAKE3 digest of the password salted with the normalised email
pub fn hash_password(email: &str, password: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(email.trim().to_ascii_lowercase().as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hasher.finalize().to_hex().to_string()
}

fn issue_token(user: &PublicUser) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&user.id.to_le_bytes());
    hasher.update(user.email.as_bytes());
    hasher.update(chrono::Utc::now().to_rfc3339().as_bytes());
    hasher.finalize().to_hex().to_string()
}

/// Logged-in user plus the token that identifies the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: PublicUser,
}

/// Session persisted between CLI invocations
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Stored session, `None` when nobody is logged in
    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file {:?}", self.path))?;
        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!("Ignoring unreadable session file {:?}: {}", self.path, e);
                Ok(None)
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }
        let raw = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write session file {:?}", self.path))
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove session file {:?}", self.path))?;
        }
        Ok(())
    }
}

pub struct AuthService {
    users: Arc<dyn UserStore>,
    latency: Latency,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, latency: Latency) -> Self {
        Self { users, latency }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.latency.simulate(Operation::Login).await;

        let email = email.trim();
        let user = self
            .users
            .find_by_email(email)?
            .filter(|u| u.password_hash == hash_password(email, password))
            .ok_or(AuthError::InvalidCredentials)?;

        info!("User {} logged in", user.id);
        let user = PublicUser::from(&user);
        Ok(Session {
            token: issue_token(&user),
            user,
        })
    }

    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        self.latency.simulate(Operation::Signup).await;

        let (name, email) = (name.trim(), email.trim());
        if name.is_empty() {
            return Err(AuthError::InvalidInput("name must not be empty".to_string()));
        }
        if !email.contains('@') {
            return Err(AuthError::InvalidInput(format!("'{}' is not an email address", email)));
        }
        if password.is_empty() {
            return Err(AuthError::InvalidInput("password must not be empty".to_string()));
        }
        if self.users.find_by_email(email)?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let new_user = NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: hash_password(email, password),
        };
        let user = match self.users.insert(new_user) {
            Ok(user) => user,
            // A concurrent signup may have taken the email after the check above
            Err(_) if self.users.find_by_email(email)?.is_some() => {
                return Err(AuthError::EmailTaken);
            }
            Err(err) => return Err(err.into()),
        };

        info!("Registered user {}", user.id);
        let user = PublicUser::from(&user);
        Ok(Session {
            token: issue_token(&user),
            user,
        })
    }

    /// User behind a session, `None` when there is no session or the user is gone
    pub async fn current_user(
        &self,
        session: Option<&Session>,
    ) -> Result<Option<PublicUser>, AuthError> {
        self.latency.simulate(Operation::CurrentUser).await;

        let Some(session) = session else {
            return Ok(None);
        };
        let user = self.users.find_by_id(session.user.id)?;
        if user.is_none() {
            debug!("Session refers to unknown user {}", session.user.id);
        }
        Ok(user.as_ref().map(PublicUser::from))
    }

    /// Like `current_user`, but a missing user is an error
    pub async fn require_user(&self, session: Option<&Session>) -> Result<PublicUser, AuthError> {
        self.current_user(session).await?.ok_or(AuthError::NotLoggedIn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed::{seed_demo_data, DEMO_PASSWORD};
    use crate::db::User;
    use crate::store::MemoryStore;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tempfile::TempDir;

    fn service() -> AuthService {
        let store = Arc::new(MemoryStore::new());
        seed_demo_data(store.as_ref(), store.as_ref()).unwrap();
        AuthService::new(store, Latency::disabled())
    }

    #[test]
    fn test_hash_password_is_salted_by_email() {
        let a = hash_password("john@example.com", "secret");
        assert_eq!(a, hash_password(" JOHN@example.com ", "secret"));
        assert_ne!(a, hash_password("jane@example.com", "secret"));
        assert_ne!(a, hash_password("john@example.com", "Secret"));
    }

    #[tokio::test]
    async fn test_login_with_demo_user() {
        let auth = service();
        let session = auth.login("john@example.com", DEMO_PASSWORD).await.unwrap();
        assert_eq!(session.user.id, 1);
        assert_eq!(session.user.name, "John Doe");
        assert_eq!(session.token.len(), 64);
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let auth = service();
        assert!(matches!(
            auth.login("john@example.com", "wrong").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("nobody@example.com", DEMO_PASSWORD).await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_signup_assigns_next_id_and_rejects_duplicates() {
        let auth = service();
        let session = auth.signup("Ana", "ana@example.com", "pw").await.unwrap();
        assert_eq!(session.user.id, 3);

        assert!(matches!(
            auth.signup("Ana Again", "ana@example.com", "pw").await,
            Err(AuthError::EmailTaken)
        ));
        assert!(matches!(
            auth.signup("", "x@example.com", "pw").await,
            Err(AuthError::InvalidInput(_))
        ));
        assert!(matches!(
            auth.signup("X", "not-an-email", "pw").await,
            Err(AuthError::InvalidInput(_))
        ));

        let again = auth.login("ana@example.com", "pw").await.unwrap();
        assert_eq!(again.user, session.user);
    }

    /// Store whose first email lookup misses, as if another signup raced ahead
    struct RacingStore {
        inner: MemoryStore,
        missed: AtomicBool,
    }

    impl UserStore for RacingStore {
        fn find_by_email(&self, email: &str) -> Result<Option<User>> {
            if !self.missed.swap(true, Ordering::SeqCst) {
                return Ok(None);
            }
            self.inner.find_by_email(email)
        }

        fn find_by_id(&self, id: i64) -> Result<Option<User>> {
            self.inner.find_by_id(id)
        }

        fn insert(&self, user: NewUser) -> Result<User> {
            self.inner.insert(user)
        }
    }

    #[tokio::test]
    async fn test_signup_race_on_same_email_reports_email_taken() {
        let inner = MemoryStore::new();
        inner
            .insert(NewUser {
                name: "Ana".to_string(),
                email: "ana@example.com".to_string(),
                password_hash: hash_password("ana@example.com", "pw"),
            })
            .unwrap();
        let store = Arc::new(RacingStore {
            inner,
            missed: AtomicBool::new(false),
        });
        let auth = AuthService::new(store, Latency::disabled());

        assert!(matches!(
            auth.signup("Other Ana", "ANA@example.com", "pw2").await,
            Err(AuthError::EmailTaken)
        ));
    }

    #[tokio::test]
    async fn test_current_user_follows_session() {
        let auth = service();
        assert_eq!(auth.current_user(None).await.unwrap(), None);
        assert!(matches!(auth.require_user(None).await, Err(AuthError::NotLoggedIn)));

        let session = auth.login("jane@example.com", DEMO_PASSWORD).await.unwrap();
        let user = auth.require_user(Some(&session)).await.unwrap();
        assert_eq!(user.email, "jane@example.com");

        let mut stale = session.clone();
        stale.user.id = 99;
        assert_eq!(auth.current_user(Some(&stale)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_session_file_save_load_clear() {
        let dir = TempDir::new().unwrap();
        let file = SessionFile::new(dir.path().join("nested").join("session.json"));
        assert_eq!(file.load().unwrap(), None);

        let session = service().login("john@example.com", DEMO_PASSWORD).await.unwrap();
        file.save(&session).unwrap();
        assert_eq!(file.load().unwrap(), Some(session));

        file.clear().unwrap();
        assert_eq!(file.load().unwrap(), None);
        file.clear().unwrap();
    }
}
