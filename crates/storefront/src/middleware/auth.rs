//! Authentication extractors.
//!
//! All three read the [`AuthData`] stored by the login handler in the
//! server-side session.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use bazaar_core::AuthData;
use tower_sessions::Session;

use crate::session::{AuthSession, SessionStore};

/// Login page unauthenticated visitors are sent to.
pub const LOGIN_PATH: &str = "/login";

/// Extractor that requires a logged-in user of any role.
///
/// # Example
///
/// ```rust,ignore
/// async fn profile(RequireUser(auth): RequireUser) -> impl IntoResponse {
///     format!("Hello, {}!", auth.user.name)
/// }
/// ```
pub struct RequireUser(pub AuthData);

/// Extractor that requires a logged-in admin.
///
/// Anonymous visitors are redirected to the login page; logged-in
/// non-admins get `403 Forbidden`.
pub struct RequireAdmin(pub AuthData);

/// Extractor that optionally gets the logged-in user.
pub struct OptionalUser(pub Option<AuthData>);

/// Returned when an extractor's requirements are not met.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// Not logged in; send to the login page.
    RedirectToLogin,
    /// Logged in without the required role.
    Forbidden,
    /// Session layer missing or session backend failed.
    SessionUnavailable,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::Forbidden => (StatusCode::FORBIDDEN, "Forbidden").into_response(),
            Self::SessionUnavailable => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

/// Load the session's auth data, treating a blank token as logged out.
async fn current_auth(parts: &Parts) -> Result<Option<AuthData>, AuthRejection> {
    let session = parts
        .extensions
        .get::<Session>()
        .cloned()
        .map(AuthSession::new)
        .ok_or(AuthRejection::SessionUnavailable)?;

    match session.load().await {
        Ok(data) => Ok(data.filter(AuthData::has_token)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load session");
            Err(AuthRejection::SessionUnavailable)
        }
    }
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        current_auth(parts)
            .await?
            .map(Self)
            .ok_or(AuthRejection::RedirectToLogin)
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth = current_auth(parts)
            .await?
            .ok_or(AuthRejection::RedirectToLogin)?;

        if !auth.user.role.is_admin() {
            tracing::warn!(user_id = %auth.user.id, path = %parts.uri.path(), "Non-admin hit dashboard");
            return Err(AuthRejection::Forbidden);
        }

        Ok(Self(auth))
    }
}

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(current_auth(parts).await.ok().flatten()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::http::Request;
    use bazaar_core::{AccessToken, Email, Role, User, UserId};
    use tower_sessions::MemoryStore;

    use super::*;

    fn user(role: Role) -> User {
        User {
            id: UserId::new("u1"),
            name: "Ada".to_string(),
            email: Email::parse("ada@example.com").unwrap(),
            role,
            photo: None,
            address: None,
        }
    }

    async fn parts_with(auth: Option<(&str, Role)>) -> Parts {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        if let Some((token, role)) = auth {
            AuthSession::new(session.clone())
                .store_auth_data(AccessToken::new(token), user(role))
                .await
                .unwrap();
        }
        let (mut parts, ()) = Request::builder()
            .uri("/dashboard")
            .body(())
            .unwrap()
            .into_parts();
        parts.extensions.insert(session);
        parts
    }

    #[tokio::test]
    async fn test_require_user_redirects_anonymous() {
        let mut parts = parts_with(None).await;
        let rejection = RequireUser::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert_eq!(rejection, AuthRejection::RedirectToLogin);
    }

    #[tokio::test]
    async fn test_require_admin_forbids_regular_user() {
        let mut parts = parts_with(Some(("tok", Role::User))).await;
        let rejection = RequireAdmin::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert_eq!(rejection, AuthRejection::Forbidden);
    }

    #[tokio::test]
    async fn test_require_admin_accepts_admin() {
        let mut parts = parts_with(Some(("tok", Role::Admin))).await;
        let RequireAdmin(auth) = RequireAdmin::from_request_parts(&mut parts, &())
            .await
            .ok()
            .unwrap();
        assert_eq!(auth.access_token.expose(), "tok");
    }

    #[tokio::test]
    async fn test_blank_token_counts_as_anonymous() {
        let mut parts = parts_with(Some(("", Role::Admin))).await;
        let OptionalUser(auth) = OptionalUser::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(auth.is_none());
    }

    #[tokio::test]
    async fn test_missing_session_layer() {
        let (mut parts, ()) = Request::builder().body(()).unwrap().into_parts();
        let rejection = RequireUser::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert_eq!(rejection, AuthRejection::SessionUnavailable);
    }
}
