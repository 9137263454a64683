//! Integration tests for Bazaar.
//!
//! Every test runs against real sockets on `127.0.0.1:0`:
//!
//! - [`FakeApi`] stands in for the remote REST API and records what it saw
//! - [`Storefront`] serves the full storefront router against a given API
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bazaar-integration-tests
//! ```
//!
//! # Accounts known to the fake API
//!
//! | Email | Password | Role |
//! |---|---|---|
//! | `ada@example.com` | `correct horse` | user |
//! | `admin@bazaar.test` | `admin pass` | admin |

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc)]

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{post, put},
};
use bazaar_storefront::config::{ApiConfig, StorefrontConfig};
use bazaar_storefront::routes;
use bazaar_storefront::state::AppState;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

pub const USER_EMAIL: &str = "ada@example.com";
pub const USER_PASSWORD: &str = "correct horse";
pub const ADMIN_EMAIL: &str = "admin@bazaar.test";
pub const ADMIN_PASSWORD: &str = "admin pass";

/// Reset token the fake API accepts.
pub const VALID_RESET_TOKEN: &str = "valid-reset-token";

const USER_TOKEN: &str = "tok-user";
const ADMIN_TOKEN: &str = "tok-admin";

// =============================================================================
// Fake remote API
// =============================================================================

/// What the fake API has received so far.
#[derive(Debug, Default)]
pub struct Recorded {
    /// Requests of any kind.
    pub requests: AtomicUsize,
    /// `POST /auth/logout` calls that carried a bearer token.
    pub logouts: AtomicUsize,
    /// Multipart field names of the last profile update, in order.
    pub profile_fields: Mutex<Vec<String>>,
    /// Multipart text fields of the last registration.
    pub register_fields: Mutex<Vec<(String, String)>>,
    /// Answer logout with a 500.
    pub fail_logout: AtomicBool,
}

/// A running fake of the remote REST API.
pub struct FakeApi {
    pub base_url: String,
    pub recorded: Arc<Recorded>,
}

impl FakeApi {
    /// Bind on an ephemeral port and serve in the background.
    pub async fn spawn() -> Self {
        let recorded = Arc::new(Recorded::default());
        let app = Router::new()
            .route("/api/v1/auth/login", post(login))
            .route("/api/v1/auth/register", post(register))
            .route("/api/v1/auth/logout", post(logout))
            .route("/api/v1/auth/forgot-password", post(forgot_password))
            .route("/api/v1/auth/reset-password", post(reset_password))
            .route("/api/v1/users/profile", put(update_profile))
            .with_state(Arc::clone(&recorded));

        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("bind fake api");
        let addr = listener.local_addr().expect("fake api addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake api server");
        });

        Self {
            base_url: format!("http://{addr}/api/v1"),
            recorded,
        }
    }

    /// API client configured for this fake.
    pub fn client(&self) -> bazaar_storefront::api::ApiClient {
        bazaar_storefront::api::ApiClient::new(&api_config(&self.base_url))
            .expect("build api client")
    }

    pub fn request_count(&self) -> usize {
        self.recorded.requests.load(Ordering::SeqCst)
    }
}

/// A URL nothing is listening on.
pub async fn unreachable_api_url() -> String {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("bind throwaway listener");
    let addr = listener.local_addr().expect("throwaway addr");
    drop(listener);
    format!("http://{addr}/api/v1")
}

fn api_config(base_url: &str) -> ApiConfig {
    ApiConfig::new(base_url, Duration::from_secs(5)).expect("valid api url")
}

fn user_json(token: &str) -> Value {
    if token == ADMIN_TOKEN {
        json!({"_id": "usr_admin", "name": "Store Admin", "email": ADMIN_EMAIL, "role": "admin"})
    } else {
        json!({"_id": "usr_ada", "name": "Ada Lovelace", "email": USER_EMAIL, "role": "user"})
    }
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn reply(status: StatusCode, body: &Value) -> Response {
    (status, Json(body.clone())).into_response()
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn login(State(rec): State<Arc<Recorded>>, Json(body): Json<LoginBody>) -> Response {
    rec.requests.fetch_add(1, Ordering::SeqCst);
    let token = match (body.email.as_str(), body.password.as_str()) {
        (USER_EMAIL, USER_PASSWORD) => USER_TOKEN,
        (ADMIN_EMAIL, ADMIN_PASSWORD) => ADMIN_TOKEN,
        _ => {
            return reply(
                StatusCode::UNAUTHORIZED,
                &json!({"success": false, "message": "Invalid email or password"}),
            );
        }
    };
    reply(
        StatusCode::OK,
        &json!({
            "success": true,
            "message": "Logged in",
            "data": {"accessToken": token, "user": user_json(token)}
        }),
    )
}

async fn register(State(rec): State<Arc<Recorded>>, mut multipart: Multipart) -> Response {
    rec.requests.fetch_add(1, Ordering::SeqCst);
    let mut fields = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let value = field.text().await.unwrap_or_default();
        fields.push((name, value));
    }
    let field = |key: &str| {
        fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.clone())
            .unwrap_or_default()
    };
    let (name, email) = (field("name"), field("email"));
    *rec.register_fields.lock().await = fields.clone();

    if email == USER_EMAIL || email == ADMIN_EMAIL {
        return reply(
            StatusCode::UNPROCESSABLE_ENTITY,
            &json!({
                "success": false,
                "message": "Validation failed",
                "errors": {"email": "Email already registered"}
            }),
        );
    }

    // The misspelled flag is what the real API sends on this endpoint.
    reply(
        StatusCode::CREATED,
        &json!({
            "sucess": true,
            "message": "Account created",
            "data": {
                "accessToken": "tok-new",
                "user": {"_id": "usr_new", "name": name, "email": email, "role": "user"}
            }
        }),
    )
}

async fn logout(State(rec): State<Arc<Recorded>>, headers: HeaderMap) -> Response {
    rec.requests.fetch_add(1, Ordering::SeqCst);
    if bearer(&headers).is_none() {
        return reply(StatusCode::UNAUTHORIZED, &json!({"message": "Not logged in"}));
    }
    rec.logouts.fetch_add(1, Ordering::SeqCst);
    if rec.fail_logout.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    reply(StatusCode::OK, &json!({"success": true}))
}

async fn forgot_password(State(rec): State<Arc<Recorded>>) -> Response {
    rec.requests.fetch_add(1, Ordering::SeqCst);
    reply(
        StatusCode::OK,
        &json!({"success": true, "message": "Check your inbox for a reset link."}),
    )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResetBody {
    token: String,
    new_password: String,
}

async fn reset_password(State(rec): State<Arc<Recorded>>, Json(body): Json<ResetBody>) -> Response {
    rec.requests.fetch_add(1, Ordering::SeqCst);
    if body.token != VALID_RESET_TOKEN {
        return reply(
            StatusCode::BAD_REQUEST,
            &json!({"success": false, "message": "Reset link has expired"}),
        );
    }
    if body.new_password.len() < 8 {
        return reply(
            StatusCode::BAD_REQUEST,
            &json!({"success": false, "message": "Validation failed", "errors": {"password": "Too short"}}),
        );
    }
    reply(StatusCode::OK, &json!({"success": true, "message": "Password updated"}))
}

async fn update_profile(
    State(rec): State<Arc<Recorded>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    rec.requests.fetch_add(1, Ordering::SeqCst);
    let Some(token) = bearer(&headers).map(str::to_string) else {
        return reply(StatusCode::UNAUTHORIZED, &json!({"message": "Not logged in"}));
    };

    let mut user = user_json(&token);
    let mut names = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        if name == "photo" {
            let _ = field.bytes().await;
            user["photo"] = json!("https://cdn.example.com/u/photo.jpg");
        } else {
            let value = field.text().await.unwrap_or_default();
            user[name.as_str()] = match name.as_str() {
                "address" => serde_json::from_str(&value).unwrap_or(Value::Null),
                _ => Value::String(value),
            };
        }
        names.push(name);
    }
    *rec.profile_fields.lock().await = names;

    reply(
        StatusCode::OK,
        &json!({"success": true, "message": "Profile updated", "data": user}),
    )
}

// =============================================================================
// Storefront under test
// =============================================================================

/// A running storefront plus a browser-like client (cookie jar, no redirects).
pub struct Storefront {
    pub base_url: String,
    pub client: reqwest::Client,
}

impl Storefront {
    /// Serve the storefront against `api_base_url` on an ephemeral port.
    pub async fn spawn(api_base_url: &str) -> Self {
        let config = StorefrontConfig {
            host: Ipv4Addr::LOCALHOST.into(),
            port: 0,
            base_url: "http://localhost:3000".parse().expect("base url"),
            api: api_config(api_base_url),
            rate_limit: false,
            sentry_dsn: None,
            sentry_environment: None,
        };
        let state = AppState::new(config).expect("app state");
        let app = routes::app(state);

        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("bind storefront");
        let addr = listener.local_addr().expect("storefront addr");
        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("storefront server");
        });

        Self {
            base_url: format!("http://{addr}"),
            client: browser(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request")
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request")
    }

    /// Submit the login form and return the response (a redirect on success).
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post_form("/login", &[("email", email), ("password", password)])
            .await
    }
}

/// Cookie-keeping client that reports redirects instead of following them.
pub fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("http client")
}

/// Like [`browser`], with `cookie` already in the jar for `base_url`.
pub fn browser_with_cookie(base_url: &str, cookie: &str) -> reqwest::Client {
    let jar = std::sync::Arc::new(reqwest::cookie::Jar::default());
    jar.add_cookie_str(cookie, &base_url.parse().expect("storefront url"));
    reqwest::Client::builder()
        .cookie_provider(jar)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("http client")
}

/// `Location` header of a redirect response.
pub fn location(response: &reqwest::Response) -> Option<&str> {
    response.headers().get(header::LOCATION)?.to_str().ok()
}
