//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP, frame options, etc.)
//! 5. Session layer (tower-sessions with in-memory store)
//! 6. Stale `accessToken` cookie expiry (needs the session)
//! 7. Route guard (guest-only pages)
//! 8. Rate limiting on auth form posts (governor)

pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod route_guard;
pub mod security_headers;
pub mod session;

pub use auth::{AuthRejection, OptionalUser, RequireAdmin, RequireUser};
pub use rate_limit::auth_rate_limiter;
pub use request_id::request_id_middleware;
pub use route_guard::{GuardDecision, route_guard_middleware};
pub use security_headers::security_headers_middleware;
pub use session::{create_session_layer, expire_stale_access_token};
