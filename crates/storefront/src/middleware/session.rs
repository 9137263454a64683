//! Session middleware configuration.
//!
//! Sessions live in process memory: the remote API is the system of record
//! for identities, so a restart simply logs everyone out of the storefront
//! while their API tokens stay valid until they expire upstream.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::config::StorefrontConfig;
use crate::session::cookie::{
    ACCESS_TOKEN_COOKIE, ACCESS_TOKEN_MAX_AGE_SECONDS, access_token_from_headers,
    expired_access_token_cookie, set_cookie, sets_cookie,
};
use crate::session::{AuthSession, SessionStore};
use crate::state::AppState;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "bazaar_session";

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(ACCESS_TOKEN_MAX_AGE_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Expire an `accessToken` cookie that no longer has a session behind it.
///
/// The cookie outlives the in-memory session across restarts and idle
/// expiry. Left alone, the guest-page guard would keep such a browser away
/// from `/login` forever. Must run inside the session layer.
pub async fn expire_stale_access_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let session = access_token_from_headers(request.headers())
        .and(request.extensions().get::<Session>().cloned())
        .map(AuthSession::new);

    let mut response = next.run(request).await;

    let Some(session) = session else {
        return response;
    };
    if sets_cookie(response.headers(), ACCESS_TOKEN_COOKIE) {
        return response;
    }

    match session.load().await {
        Ok(Some(auth)) if auth.has_token() => {}
        Ok(_) => {
            tracing::debug!("accessToken cookie without a session, expiring it");
            set_cookie(
                &mut response,
                &expired_access_token_cookie(state.config().is_secure()),
            );
        }
        Err(e) => tracing::warn!(error = %e, "Could not check session for accessToken cookie"),
    }
    response
}
