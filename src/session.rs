//! Admin sessions as explicit values.
//!
//! A [`SessionManager`] holds at most one signed-in [`Session`], talks to
//! an [`AuthBackend`] to verify credentials, and persists the session as
//! JSON through a [`SessionCache`] so a restart picks it up again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::content::{Author, Role};
use crate::error::BackendError;

/// A signed-in author plus the token metadata the backend issued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub author: Author,
    pub token: String,
    pub issued_at: DateTime<Utc>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.author.role == Role::Admin
    }

    /// Whether this session may manage posts and categories.
    pub fn can_publish(&self) -> bool {
        matches!(self.author.role, Role::Admin | Role::Moderator)
    }
}

/// State transitions reported to observers after each operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn,
    TokenRefreshed,
    SignedOut,
}

/// Credential verification, implemented by the real backend or a stub in
/// tests.
pub trait AuthBackend {
    /// Verify credentials, returning the author row on success.
    fn authenticate(&self, email: &str, password: &str) -> Result<Author, BackendError>;

    /// Exchange the current token for a fresh one.
    fn refresh(&self, token: &str) -> Result<String, BackendError>;
}

/// Durable storage for the serialized session.
pub trait SessionCache {
    fn load(&self) -> Option<String>;
    fn store(&mut self, value: &str);
    fn clear(&mut self);
}

impl<T: SessionCache + ?Sized> SessionCache for &mut T {
    fn load(&self) -> Option<String> {
        (**self).load()
    }

    fn store(&mut self, value: &str) {
        (**self).store(value);
    }

    fn clear(&mut self) {
        (**self).clear();
    }
}

/// In-process cache, the default for tests and the CLI.
#[derive(Debug, Default)]
pub struct MemoryCache {
    value: Option<String>,
}

impl SessionCache for MemoryCache {
    fn load(&self) -> Option<String> {
        self.value.clone()
    }

    fn store(&mut self, value: &str) {
        self.value = Some(value.to_string());
    }

    fn clear(&mut self) {
        self.value = None;
    }
}

/// Owns the current session and keeps the cache in sync with it.
pub struct SessionManager<B, C> {
    backend: B,
    cache: C,
    session: Option<Session>,
}

impl<B: AuthBackend, C: SessionCache> SessionManager<B, C> {
    /// Create a manager, restoring any session the cache still holds.
    /// A cache entry that no longer parses is discarded.
    pub fn new(backend: B, mut cache: C) -> Self {
        let session = cache
            .load()
            .and_then(|raw| serde_json::from_str::<Session>(&raw).ok());
        if session.is_none() {
            cache.clear();
        }
        Self {
            backend,
            cache,
            session,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    /// Verify credentials and install the resulting session.
    pub fn sign_in(&mut self, email: &str, password: &str) -> Result<AuthEvent, BackendError> {
        let author = self.backend.authenticate(email, password)?;
        info!(email = %author.email, role = ?author.role, "signed in");
        let session = Session {
            author,
            token: new_token(),
            issued_at: Utc::now(),
        };
        self.persist(&session)?;
        self.session = Some(session);
        Ok(AuthEvent::SignedIn)
    }

    /// Refresh the current token in place.
    pub fn refresh(&mut self) -> Result<AuthEvent, BackendError> {
        let Some(session) = self.session.as_mut() else {
            return Err(BackendError::InvalidCredentials);
        };
        session.token = self.backend.refresh(&session.token)?;
        session.issued_at = Utc::now();
        let session = session.clone();
        self.persist(&session)?;
        Ok(AuthEvent::TokenRefreshed)
    }

    /// Drop the session and its cached copy. Signing out while signed
    /// out is a no-op.
    pub fn sign_out(&mut self) -> AuthEvent {
        if self.session.take().is_some() {
            info!("signed out");
        }
        self.cache.clear();
        AuthEvent::SignedOut
    }

    fn persist(&mut self, session: &Session) -> Result<(), BackendError> {
        let raw = serde_json::to_string(session)
            .map_err(|e| BackendError::Unexpected(e.to_string()))?;
        self.cache.store(&raw);
        Ok(())
    }
}

/// Opaque bearer token for a new session.
fn new_token() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..32)
        .map(|_| {
            const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
            CHARSET[rng.gen_range(0..CHARSET.len())] as char
        })
        .collect()
}
