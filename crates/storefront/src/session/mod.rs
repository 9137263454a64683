//! Session store: who is logged in, and with which token.
//!
//! A [`SessionStore`] is an explicit context object handed to handlers
//! rather than ambient global state. Three backends exist:
//!
//! - [`AuthSession`] - server-side session (tower-sessions), used by route handlers
//! - [`MemorySessionStore`] - in-process, used by tests
//! - a file-backed store in the CLI crate
//!
//! The token is also mirrored into the `accessToken` cookie (see [`cookie`])
//! so the route guard can decide without touching the session backend.

pub mod cookie;
mod server;

pub use server::{AUTH_DATA_KEY, AuthSession, SessionRejection};

use std::future::Future;
use std::sync::Arc;

use bazaar_core::{AccessToken, AuthData, User};
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors raised by session backends.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Server-side session backend failed.
    #[error("session backend error: {0}")]
    Backend(#[from] tower_sessions::session::Error),

    /// Session file could not be read or written.
    #[error("session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored session could not be decoded.
    #[error("stored session is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Load/save/clear contract shared by every session backend.
///
/// Writes are last-write-wins: saving replaces any prior session as a whole,
/// so a session never holds more than one token.
pub trait SessionStore: Send + Sync {
    /// Current session, if any.
    fn load(&self) -> impl Future<Output = Result<Option<AuthData>, SessionError>> + Send;

    /// Replace the session.
    fn save(&self, data: &AuthData) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// Remove the session.
    fn clear(&self) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// Persist a token and the user it belongs to, overwriting any prior session.
    fn store_auth_data(
        &self,
        access_token: AccessToken,
        user: User,
    ) -> impl Future<Output = Result<(), SessionError>> + Send {
        async move { self.save(&AuthData::new(access_token, user)).await }
    }

    /// Remove token and user (logout).
    fn clear_auth_data(&self) -> impl Future<Output = Result<(), SessionError>> + Send {
        self.clear()
    }

    /// True iff a non-empty token is stored.
    ///
    /// Backend errors read as "not authenticated".
    fn is_authenticated(&self) -> impl Future<Output = bool> + Send {
        async move {
            match self.load().await {
                Ok(Some(data)) => data.has_token(),
                Ok(None) => false,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to load session");
                    false
                }
            }
        }
    }
}

/// In-process session store.
///
/// Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    slot: Arc<RwLock<Option<AuthData>>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<Option<AuthData>, SessionError> {
        Ok(self.slot.read().await.clone())
    }

    async fn save(&self, data: &AuthData) -> Result<(), SessionError> {
        *self.slot.write().await = Some(data.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        *self.slot.write().await = None;
        Ok(())
    }
}
