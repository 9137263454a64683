//! Guest-only route guard.
//!
//! Requests for the login, registration and password pages carrying a
//! non-empty `accessToken` cookie are sent to `/`. Every other request
//! passes through untouched. The guard only inspects the cookie; it never
//! validates the token with the API.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::session::cookie::access_token_from_headers;

/// Path prefixes reserved for visitors who are not logged in.
///
/// Matching is a literal prefix test, so `/registered` is guarded too.
pub const GUARDED_PREFIXES: &[&str] = &["/login", "/register", "/reset-password", "/forgot-password"];

/// Where authenticated visitors are sent.
pub const GUARD_REDIRECT: &str = "/";

/// Outcome of the guard for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Let the request through.
    Pass,
    /// Redirect to the given path.
    Redirect(&'static str),
}

/// True if `path` falls under one of [`GUARDED_PREFIXES`].
#[must_use]
pub fn is_guarded(path: &str) -> bool {
    GUARDED_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
}

/// Decide what to do with a request for `path` given its `accessToken` cookie.
#[must_use]
pub fn decide(path: &str, access_token: Option<&str>) -> GuardDecision {
    let has_token = access_token.is_some_and(|t| !t.trim().is_empty());
    if has_token && is_guarded(path) {
        GuardDecision::Redirect(GUARD_REDIRECT)
    } else {
        GuardDecision::Pass
    }
}

/// Middleware applying [`decide`] to every request.
pub async fn route_guard_middleware(request: Request, next: Next) -> Response {
    let token = access_token_from_headers(request.headers());
    match decide(request.uri().path(), token.as_deref()) {
        GuardDecision::Pass => next.run(request).await,
        GuardDecision::Redirect(to) => {
            tracing::debug!(path = %request.uri().path(), to, "Guest-only page, redirecting");
            Redirect::to(to).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticated_visitor_leaves_register() {
        assert_eq!(
            decide("/register", Some("abc123")),
            GuardDecision::Redirect("/")
        );
        assert_eq!(
            decide("/login?next=/account", Some("abc123")),
            GuardDecision::Redirect("/")
        );
        assert_eq!(
            decide("/reset-password/xyz", Some("abc123")),
            GuardDecision::Redirect("/")
        );
    }

    #[test]
    fn test_anonymous_visitor_passes() {
        assert_eq!(decide("/login", None), GuardDecision::Pass);
        assert_eq!(decide("/register", Some("")), GuardDecision::Pass);
        assert_eq!(decide("/register", Some("   ")), GuardDecision::Pass);
    }

    #[test]
    fn test_other_paths_pass() {
        assert_eq!(decide("/products", Some("abc123")), GuardDecision::Pass);
        assert_eq!(decide("/", Some("abc123")), GuardDecision::Pass);
        assert_eq!(decide("/account/login", Some("abc123")), GuardDecision::Pass);
    }

    #[test]
    fn test_prefix_match_is_literal() {
        assert!(is_guarded("/registered"));
        assert!(is_guarded("/login"));
        assert!(!is_guarded("/logout"));
    }
}
