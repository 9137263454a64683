//! Client for the remote REST API.
//!
//! # Architecture
//!
//! - The remote API owns users, sessions, orders and the catalog
//! - Every call here is a thin wrapper: build the request, send it once,
//!   normalize the reply into an [`ActionResult`]
//! - No retries; a configured timeout bounds every request
//!
//! # Example
//!
//! ```rust,ignore
//! use bazaar_storefront::api::{ApiClient, LoginForm};
//!
//! let client = ApiClient::new(&config.api)?;
//! let result = client.login_user(&LoginForm {
//!     email: "ada@example.com".into(),
//!     password: "hunter22".into(),
//! }).await;
//!
//! if let Some(auth) = result.data {
//!     session.store_auth_data(auth.access_token, auth.user).await?;
//! }
//! ```

mod auth;
mod profile;
mod response;

pub use auth::{ForgotPasswordForm, LoginForm, RegisterForm, ResetPasswordForm};
pub use profile::{PhotoUpload, ProfileField, ProfileForm};
pub use response::{ActionResult, ErrorKind, FieldErrors};

use std::sync::Arc;

use reqwest::RequestBuilder;
use thiserror::Error;
use url::Url;

use crate::config::ApiConfig;
use response::Envelope;

/// User agent sent with every outbound request.
const USER_AGENT: &str = concat!("bazaar-storefront/", env!("CARGO_PKG_VERSION"));

/// Errors raised while building or sending a request.
///
/// Auth actions never return these directly; they are folded into an
/// [`ActionResult`] at the action boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint URL could not be built.
    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// True when the failure was the client-side timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }
}

/// Client for the remote REST API.
///
/// Cheaply cloneable; all clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed
    /// (e.g. the TLS backend fails to initialize).
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// Root URL of the remote API.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve an endpoint path against the base URL.
    ///
    /// The base URL's own path is preserved, so `/auth/login` against
    /// `http://host/api/v1` yields `http://host/api/v1/auth/login`.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    fn post(&self, path: &str) -> Result<RequestBuilder, ApiError> {
        Ok(self.inner.client.post(self.endpoint(path)?))
    }

    fn put(&self, path: &str) -> Result<RequestBuilder, ApiError> {
        Ok(self.inner.client.put(self.endpoint(path)?))
    }

    /// Send a request and capture status plus (best-effort) JSON body.
    async fn send(&self, request: RequestBuilder) -> Result<Envelope, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        tracing::debug!(status = %status, bytes = text.len(), "API response received");

        Ok(Envelope::new(status, &text))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(&ApiConfig::new(base, Duration::from_secs(5)).unwrap()).unwrap()
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let api = client("http://localhost:8000/api/v1");
        assert_eq!(
            api.endpoint("/auth/login").unwrap().as_str(),
            "http://localhost:8000/api/v1/auth/login"
        );
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let api = client("http://localhost:8000/api/v1/");
        assert_eq!(
            api.endpoint("users/profile").unwrap().as_str(),
            "http://localhost:8000/api/v1/users/profile"
        );
    }

    #[test]
    fn test_debug_shows_base_url() {
        let api = client("http://localhost:8000/api/v1");
        assert!(format!("{api:?}").contains("localhost:8000"));
    }
}
