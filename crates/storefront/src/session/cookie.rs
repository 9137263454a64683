//! The `accessToken` cookie that mirrors the session token.
//!
//! The route guard reads this cookie directly; handlers set it on login and
//! expire it on logout.

use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::Response;
use bazaar_core::AccessToken;
use tower_sessions::cookie::{Cookie, SameSite, time::Duration};

/// Name of the cookie carrying the bearer token.
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";

/// Lifetime of the mirrored cookie; matches the server-side session expiry.
pub const ACCESS_TOKEN_MAX_AGE_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Build the cookie written after a successful login or registration.
#[must_use]
pub fn access_token_cookie(token: &AccessToken, secure: bool) -> Cookie<'static> {
    Cookie::build((ACCESS_TOKEN_COOKIE, token.expose().to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::seconds(ACCESS_TOKEN_MAX_AGE_SECONDS))
        .build()
}

/// Build the cookie that expires `accessToken` on logout.
#[must_use]
pub fn expired_access_token_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((ACCESS_TOKEN_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}

/// Read a cookie value from request headers.
///
/// Handles multiple `Cookie` headers and malformed pairs; the first match wins.
#[must_use]
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| Cookie::parse(pair.trim()).ok())
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
}

/// The `accessToken` value if present and non-empty.
#[must_use]
pub fn access_token_from_headers(headers: &HeaderMap) -> Option<String> {
    read_cookie(headers, ACCESS_TOKEN_COOKIE).filter(|value| !value.trim().is_empty())
}

/// True if `headers` already carry a `Set-Cookie` for `name`.
#[must_use]
pub fn sets_cookie(headers: &HeaderMap, name: &str) -> bool {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| Cookie::parse(value).ok())
        .any(|cookie| cookie.name() == name)
}

/// Append a `Set-Cookie` header to a response.
pub fn set_cookie(response: &mut Response, cookie: &Cookie<'_>) {
    match HeaderValue::from_str(&cookie.to_string()) {
        Ok(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        Err(e) => tracing::error!(error = %e, cookie = cookie.name(), "Unencodable cookie"),
    }
}
