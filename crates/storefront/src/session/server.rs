//! Session store backed by tower-sessions.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use bazaar_core::AuthData;
use tower_sessions::Session;

use super::{SessionError, SessionStore};

/// Session key holding the serialized [`AuthData`].
pub const AUTH_DATA_KEY: &str = "auth_data";

/// The request's server-side session, viewed as a [`SessionStore`].
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(session: AuthSession) -> impl IntoResponse {
///     if session.is_authenticated().await {
///         "welcome back"
///     } else {
///         "hello, guest"
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthSession {
    session: Session,
}

impl AuthSession {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// The underlying tower-sessions handle.
    #[must_use]
    pub const fn inner(&self) -> &Session {
        &self.session
    }
}

impl SessionStore for AuthSession {
    async fn load(&self) -> Result<Option<AuthData>, SessionError> {
        Ok(self.session.get::<AuthData>(AUTH_DATA_KEY).await?)
    }

    async fn save(&self, data: &AuthData) -> Result<(), SessionError> {
        // New identity, new session id.
        self.session.cycle_id().await?;
        self.session.insert(AUTH_DATA_KEY, data).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        self.session.flush().await?;
        Ok(())
    }
}

/// Returned when the session layer is missing from the router.
#[derive(Debug)]
pub struct SessionRejection;

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        tracing::error!("AuthSession extracted without a SessionManagerLayer");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
{
    type Rejection = SessionRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .map(Self::new)
            .ok_or(SessionRejection)
    }
}
