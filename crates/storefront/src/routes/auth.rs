//! Authentication route handlers.
//!
//! Each form post calls the matching auth action on the API client. On
//! success the token and user go into the server-side session and the token
//! is mirrored into the `accessToken` cookie; on failure the form is
//! re-rendered with the action's error and per-field messages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use bazaar_core::{AuthData, User};
use serde::Deserialize;
use tracing::instrument;

use super::{FormFeedback, failure_status};
use crate::api::{ForgotPasswordForm, LoginForm, RegisterForm, ResetPasswordForm};
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::session::cookie::{access_token_cookie, expired_access_token_cookie, set_cookie};
use crate::session::{AuthSession, SessionStore};
use crate::state::AppState;

// =============================================================================
// Query Types
// =============================================================================

/// Notice codes carried across redirects.
#[derive(Debug, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}

impl NoticeQuery {
    fn feedback(&self) -> FormFeedback {
        match self.notice.as_deref() {
            Some("password-reset") => {
                FormFeedback::notice("Your password has been reset. Please log in.")
            }
            Some("logged-out") => FormFeedback::notice("You have been logged out."),
            _ => FormFeedback::default(),
        }
    }
}

/// Reset link query (`/reset-password?token=...`).
#[derive(Debug, Deserialize)]
pub struct ResetQuery {
    #[serde(default)]
    pub token: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub current_user: Option<User>,
    pub email: String,
    pub feedback: FormFeedback,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub current_user: Option<User>,
    pub name: String,
    pub email: String,
    pub feedback: FormFeedback,
}

/// Forgot password page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/forgot_password.html")]
pub struct ForgotPasswordTemplate {
    pub current_user: Option<User>,
    pub email: String,
    pub feedback: FormFeedback,
}

/// Reset password page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/reset_password.html")]
pub struct ResetPasswordTemplate {
    pub current_user: Option<User>,
    pub token: String,
    pub feedback: FormFeedback,
}

// =============================================================================
// Session helpers
// =============================================================================

/// Store a fresh login and redirect to the role's landing page.
async fn start_session(
    state: &AppState,
    session: &AuthSession,
    auth: AuthData,
) -> Result<Response> {
    let landing = auth.user.role.landing_path();
    let cookie = access_token_cookie(&auth.access_token, state.config().is_secure());

    set_sentry_user(&auth.user);
    tracing::info!(user_id = %auth.user.id, role = %auth.user.role, "Session started");

    session.store_auth_data(auth.access_token, auth.user).await?;

    let mut response = Redirect::to(landing).into_response();
    set_cookie(&mut response, &cookie);
    Ok(response)
}

// =============================================================================
// Login
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<NoticeQuery>) -> impl IntoResponse {
    LoginTemplate {
        current_user: None,
        email: String::new(),
        feedback: query.feedback(),
    }
}

/// Handle login form submission.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: AuthSession,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let result = state.api().login_user(&form).await;

    let status = failure_status(result.kind);
    let feedback = FormFeedback::from_result(&result);

    match result.data {
        Some(auth) if result.success => start_session(&state, &session, auth).await,
        _ => Ok((
            status,
            LoginTemplate {
                current_user: None,
                email: form.email,
                feedback,
            },
        )
            .into_response()),
    }
}

// =============================================================================
// Registration
// =============================================================================

/// Display the registration page.
pub async fn register_page() -> impl IntoResponse {
    RegisterTemplate {
        current_user: None,
        name: String::new(),
        email: String::new(),
        feedback: FormFeedback::default(),
    }
}

/// Handle registration form submission.
///
/// A successful registration logs the new user straight in.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    session: AuthSession,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let result = state.api().register_user(&form).await;

    let status = failure_status(result.kind);
    let feedback = FormFeedback::from_result(&result);

    match result.data {
        Some(auth) if result.success => start_session(&state, &session, auth).await,
        _ => Ok((
            status,
            RegisterTemplate {
                current_user: None,
                name: form.name,
                email: form.email,
                feedback,
            },
        )
            .into_response()),
    }
}

// =============================================================================
// Password Reset
// =============================================================================

/// Display the forgot password page.
pub async fn forgot_password_page() -> impl IntoResponse {
    ForgotPasswordTemplate {
        current_user: None,
        email: String::new(),
        feedback: FormFeedback::default(),
    }
}

/// Handle forgot password form submission.
#[instrument(skip_all)]
pub async fn forgot_password(
    State(state): State<AppState>,
    Form(form): Form<ForgotPasswordForm>,
) -> Response {
    let result = state.api().request_password_reset(&form).await;

    if result.success {
        let message = result.message.unwrap_or_else(|| {
            "If an account exists for that address, a reset link is on its way.".to_string()
        });
        return ForgotPasswordTemplate {
            current_user: None,
            email: String::new(),
            feedback: FormFeedback::notice(message),
        }
        .into_response();
    }

    (
        failure_status(result.kind),
        ForgotPasswordTemplate {
            current_user: None,
            email: form.email,
            feedback: FormFeedback::from_result(&result),
        },
    )
        .into_response()
}

/// Display the reset password page for the emailed token.
pub async fn reset_password_page(Query(query): Query<ResetQuery>) -> Response {
    if query.token.trim().is_empty() {
        return Redirect::to("/forgot-password").into_response();
    }

    ResetPasswordTemplate {
        current_user: None,
        token: query.token,
        feedback: FormFeedback::default(),
    }
    .into_response()
}

/// Handle reset password form submission.
#[instrument(skip_all)]
pub async fn reset_password(
    State(state): State<AppState>,
    Form(form): Form<ResetPasswordForm>,
) -> Response {
    let result = state.api().reset_password(&form).await;

    if result.success {
        return Redirect::to("/login?notice=password-reset").into_response();
    }

    (
        failure_status(result.kind),
        ResetPasswordTemplate {
            current_user: None,
            token: form.token,
            feedback: FormFeedback::from_result(&result),
        },
    )
        .into_response()
}

// =============================================================================
// Logout
// =============================================================================

/// Handle logout.
///
/// The local session is cleared and the cookie expired even when the API
/// call fails, so the browser never stays half logged in.
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, session: AuthSession) -> Result<Response> {
    let token = session.load().await?.map(|auth| auth.access_token);

    let result = state.api().logout_user(token.as_ref()).await;
    if !result.success {
        tracing::warn!(
            kind = ?result.kind,
            error = result.error.as_deref().unwrap_or_default(),
            "Remote logout failed; clearing local session anyway"
        );
    }

    session.clear_auth_data().await?;
    clear_sentry_user();

    let mut response = Redirect::to("/login?notice=logged-out").into_response();
    set_cookie(
        &mut response,
        &expired_access_token_cookie(state.config().is_secure()),
    );
    Ok(response)
}
