//! HTTP route handlers for the storefront and admin dashboard.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /                            - Home page
//!
//! # Products
//! GET  /products                    - Product listing (?category=, ?q=)
//! GET  /products/{slug}             - Product detail
//!
//! # Auth (guest-only pages, see route guard)
//! GET  /login            POST /login
//! GET  /register         POST /register
//! GET  /forgot-password  POST /forgot-password
//! GET  /reset-password   POST /reset-password   (?token=)
//! POST /logout
//!
//! # Account (requires auth)
//! GET  /account/profile  POST /account/profile  (multipart)
//!
//! # Dashboard (requires admin)
//! GET  /dashboard
//! GET  /dashboard/users
//! GET  /dashboard/products
//! GET  /dashboard/orders                        (?status=)
//! GET  /dashboard/orders/{id}
//! POST /dashboard/orders/{id}/status
//! GET  /dashboard/reviews                       (?status=)
//! POST /dashboard/reviews/{id}/status
//! ```

pub mod account;
pub mod auth;
pub mod dashboard;
pub mod home;
pub mod products;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    routing::{MethodRouter, get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::api::{ActionResult, ErrorKind, FieldErrors};
use crate::middleware::{
    auth_rate_limiter, create_session_layer, expire_stale_access_token,
    rate_limit::RateLimiterLayer, request_id_middleware, route_guard_middleware,
    security_headers_middleware,
};
use crate::state::AppState;

/// Directory served under `/static`, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/storefront/static";

// =============================================================================
// Shared view helpers
// =============================================================================

/// Error and notice text shown above a form.
#[derive(Debug, Clone, Default)]
pub struct FormFeedback {
    pub error: Option<String>,
    pub message: Option<String>,
    pub field_errors: FieldErrors,
}

impl FormFeedback {
    /// Feedback for a finished action.
    #[must_use]
    pub fn from_result<T>(result: &ActionResult<T>) -> Self {
        Self {
            error: result.error.clone(),
            message: result.message.clone(),
            field_errors: result.field_errors.clone(),
        }
    }

    /// A success notice with no errors.
    #[must_use]
    pub fn notice(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// First message recorded for `field`, if any.
    #[must_use]
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }
}

/// Status code for re-rendering a form after a failed action.
#[must_use]
pub const fn failure_status(kind: Option<ErrorKind>) -> StatusCode {
    match kind {
        Some(ErrorKind::Network) => StatusCode::SERVICE_UNAVAILABLE,
        Some(ErrorKind::Server) => StatusCode::BAD_GATEWAY,
        Some(ErrorKind::Unauthenticated) => StatusCode::UNAUTHORIZED,
        Some(ErrorKind::Client) | None => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

// =============================================================================
// Routers
// =============================================================================

fn limited(
    route: MethodRouter<AppState>,
    limiter: Option<&RateLimiterLayer>,
) -> MethodRouter<AppState> {
    match limiter {
        Some(layer) => route.layer(layer.clone()),
        None => route,
    }
}

/// Create the auth routes router. Form posts are rate limited when enabled.
pub fn auth_routes(rate_limit: bool) -> Router<AppState> {
    let limiter = rate_limit.then(auth_rate_limiter);
    let limiter = limiter.as_ref();

    Router::new()
        .route(
            "/login",
            get(auth::login_page).merge(limited(post(auth::login), limiter)),
        )
        .route(
            "/register",
            get(auth::register_page).merge(limited(post(auth::register), limiter)),
        )
        .route(
            "/forgot-password",
            get(auth::forgot_password_page).merge(limited(post(auth::forgot_password), limiter)),
        )
        .route(
            "/reset-password",
            get(auth::reset_password_page).merge(limited(post(auth::reset_password), limiter)),
        )
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{slug}", get(products::show))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(account::profile_page).post(account::update_profile),
        )
        .layer(DefaultBodyLimit::max(account::MAX_PROFILE_BODY_BYTES))
}

/// Create the admin dashboard router.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/users", get(dashboard::users::index))
        .route("/products", get(dashboard::products::index))
        .route("/orders", get(dashboard::orders::index))
        .route("/orders/{id}", get(dashboard::orders::show))
        .route("/orders/{id}/status", post(dashboard::orders::update_status))
        .route("/reviews", get(dashboard::reviews::index))
        .route(
            "/reviews/{id}/status",
            post(dashboard::reviews::update_status),
        )
}

/// Create all page routes.
pub fn routes(rate_limit: bool) -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/products", product_routes())
        .nest("/account", account_routes())
        .nest("/dashboard", dashboard_routes())
        .merge(auth_routes(rate_limit))
}

/// Build the full application: routes, static files and middleware.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes(state.config().rate_limit))
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(from_fn(route_guard_middleware))
        .layer(from_fn_with_state(state.clone(), expire_stale_access_token))
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, header};
    use tower::ServiceExt;

    use super::*;
    use crate::config::{ApiConfig, StorefrontConfig};
    use crate::middleware::request_id::REQUEST_ID_HEADER;

    fn test_app() -> Router {
        let config = StorefrontConfig {
            host: [127, 0, 0, 1].into(),
            port: 0,
            base_url: "http://localhost:3000".parse().unwrap(),
            api: ApiConfig::new("http://127.0.0.1:9/api/v1", Duration::from_secs(1)).unwrap(),
            rate_limit: false,
            sentry_dsn: None,
            sentry_environment: None,
        };
        app(AppState::new(config).unwrap())
    }

    async fn send(request: Request<Body>) -> axum::response::Response {
        test_app().oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = send(Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_pages_carry_security_headers_and_request_id() {
        let response = send(Request::get("/products").body(Body::empty()).unwrap()).await;

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert!(headers.contains_key(header::CONTENT_SECURITY_POLICY));
        assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
        assert!(headers.contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_inbound_request_id_is_echoed() {
        let response = send(
            Request::get("/")
                .header(REQUEST_ID_HEADER, "req-abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-abc");
    }

    #[tokio::test]
    async fn test_guard_runs_inside_app() {
        let response = send(
            Request::get("/login")
                .header(header::COOKIE, "accessToken=tok")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn test_cookie_without_session_is_expired() {
        for path in ["/login", "/account/profile", "/"] {
            let response = send(
                Request::get(path)
                    .header(header::COOKIE, "accessToken=left-over")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;

            let expired = response
                .headers()
                .get_all(header::SET_COOKIE)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .any(|v| v.starts_with("accessToken=;") && v.contains("Max-Age=0"));
            assert!(expired, "{path}");
        }
    }

    #[tokio::test]
    async fn test_no_cookie_means_no_expiry_header() {
        let response = send(Request::get("/").body(Body::empty()).unwrap()).await;
        assert!(!response.headers().contains_key(header::SET_COOKIE));
    }

    #[tokio::test]
    async fn test_unknown_product_is_not_found() {
        let response = send(
            Request::get("/products/no-such-thing")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_failure_status_mapping() {
        assert_eq!(
            failure_status(Some(ErrorKind::Network)),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(failure_status(None), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
