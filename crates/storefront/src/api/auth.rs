//! Authentication actions against `/auth/*`.

use bazaar_core::{AccessToken, AuthData, Role};
use reqwest::multipart;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{ActionResult, ApiClient, ErrorKind, FieldErrors};

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Clone, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Clone, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub password_confirm: Option<String>,
}

/// Forgot password form data.
#[derive(Debug, Clone, Deserialize)]
pub struct ForgotPasswordForm {
    pub email: String,
}

/// Reset password form data.
#[derive(Clone, Deserialize)]
pub struct ResetPasswordForm {
    pub token: String,
    pub password: String,
    #[serde(default)]
    pub password_confirm: Option<String>,
}

// Passwords never reach logs.
impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl std::fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for ResetPasswordForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResetPasswordForm")
            .field("password", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Password confirmation check shared by register and reset forms.
fn confirm_mismatch(password: &str, confirm: Option<&str>) -> Option<FieldErrors> {
    match confirm {
        Some(confirm) if confirm != password => Some(FieldErrors::from([(
            "password_confirm".to_string(),
            vec!["Passwords do not match".to_string()],
        )])),
        _ => None,
    }
}

// =============================================================================
// Request Bodies
// =============================================================================

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct ForgotPasswordRequest<'a> {
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResetPasswordRequest<'a> {
    token: &'a str,
    new_password: &'a str,
}

// =============================================================================
// Actions
// =============================================================================

impl ApiClient {
    /// Register a new account.
    ///
    /// Sends a multipart body with `name`, `email`, `password` and a fixed
    /// `role` of `user` to `POST /auth/register`.
    #[instrument(skip_all, fields(email = %form.email))]
    pub async fn register_user(&self, form: &RegisterForm) -> ActionResult<AuthData> {
        if let Some(errors) = confirm_mismatch(&form.password, form.password_confirm.as_deref()) {
            return ActionResult::fail(ErrorKind::Client, "Please fix the errors below.")
                .with_field_errors(errors);
        }

        let body = multipart::Form::new()
            .text("name", form.name.trim().to_string())
            .text("email", form.email.trim().to_string())
            .text("password", form.password.clone())
            .text("role", Role::User.as_str());

        let request = match self.post("/auth/register") {
            Ok(request) => request.multipart(body),
            Err(e) => return ActionResult::network(&e),
        };

        let result = match self.send(request).await {
            Ok(envelope) => envelope.into_result::<AuthData>(),
            Err(e) => {
                tracing::warn!(error = %e, "Registration request failed");
                return ActionResult::network(&e);
            }
        };

        log_outcome("register", &result);
        result
    }

    /// Log in with email and password via `POST /auth/login` (JSON body).
    #[instrument(skip_all, fields(email = %form.email))]
    pub async fn login_user(&self, form: &LoginForm) -> ActionResult<AuthData> {
        let body = LoginRequest {
            email: form.email.trim(),
            password: &form.password,
        };

        let request = match self.post("/auth/login") {
            Ok(request) => request.json(&body),
            Err(e) => return ActionResult::network(&e),
        };

        let result = match self.send(request).await {
            Ok(envelope) => envelope.into_result::<AuthData>(),
            Err(e) => {
                tracing::warn!(error = %e, "Login request failed");
                return ActionResult::network(&e);
            }
        };

        log_outcome("login", &result);
        result
    }

    /// Revoke the session at the API via `POST /auth/logout`.
    ///
    /// Fails closed without touching the network when no token is supplied.
    #[instrument(skip_all)]
    pub async fn logout_user(&self, token: Option<&AccessToken>) -> ActionResult<()> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            tracing::debug!("Logout attempted without a token");
            return ActionResult::unauthenticated();
        };

        let request = match self.post("/auth/logout") {
            Ok(request) => request.bearer_auth(token.expose()),
            Err(e) => return ActionResult::network(&e),
        };

        let result = match self.send(request).await {
            Ok(envelope) => envelope.into_unit(),
            Err(e) => {
                tracing::warn!(error = %e, "Logout request failed");
                return ActionResult::network(&e);
            }
        };

        log_outcome("logout", &result);
        result
    }

    /// Ask the API to email a password reset link (`POST /auth/forgot-password`).
    #[instrument(skip_all, fields(email = %form.email))]
    pub async fn request_password_reset(&self, form: &ForgotPasswordForm) -> ActionResult<()> {
        let body = ForgotPasswordRequest {
            email: form.email.trim(),
        };

        let request = match self.post("/auth/forgot-password") {
            Ok(request) => request.json(&body),
            Err(e) => return ActionResult::network(&e),
        };

        match self.send(request).await {
            Ok(envelope) => envelope.into_unit(),
            Err(e) => {
                tracing::warn!(error = %e, "Password reset request failed");
                ActionResult::network(&e)
            }
        }
    }

    /// Set a new password using the emailed reset token (`POST /auth/reset-password`).
    #[instrument(skip_all)]
    pub async fn reset_password(&self, form: &ResetPasswordForm) -> ActionResult<()> {
        if form.token.trim().is_empty() {
            return ActionResult::fail(
                ErrorKind::Client,
                "This reset link is invalid or incomplete.",
            );
        }
        if let Some(errors) = confirm_mismatch(&form.password, form.password_confirm.as_deref()) {
            return ActionResult::fail(ErrorKind::Client, "Please fix the errors below.")
                .with_field_errors(errors);
        }

        let body = ResetPasswordRequest {
            token: form.token.trim(),
            new_password: &form.password,
        };

        let request = match self.post("/auth/reset-password") {
            Ok(request) => request.json(&body),
            Err(e) => return ActionResult::network(&e),
        };

        let result = match self.send(request).await {
            Ok(envelope) => envelope.into_unit(),
            Err(e) => {
                tracing::warn!(error = %e, "Password reset failed");
                return ActionResult::network(&e);
            }
        };

        log_outcome("reset_password", &result);
        result
    }
}

fn log_outcome<T>(action: &'static str, result: &ActionResult<T>) {
    if result.success {
        tracing::info!(action, "Auth action succeeded");
    } else {
        tracing::info!(
            action,
            kind = ?result.kind,
            error = result.error.as_deref().unwrap_or_default(),
            "Auth action rejected"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_mismatch() {
        assert!(confirm_mismatch("secret1", Some("secret2")).is_some());
        assert!(confirm_mismatch("secret1", Some("secret1")).is_none());
        assert!(confirm_mismatch("secret1", None).is_none());
    }

    #[test]
    fn test_login_form_debug_redacts_password() {
        let form = LoginForm {
            email: "ada@example.com".to_string(),
            password: "hunter22".to_string(),
        };
        let debug = format!("{form:?}");
        assert!(debug.contains("ada@example.com"));
        assert!(!debug.contains("hunter22"));
    }

    #[test]
    fn test_reset_request_uses_camel_case() {
        let body = ResetPasswordRequest {
            token: "t",
            new_password: "p",
        };
        let json = serde_json::to_value(&body).unwrap_or_default();
        assert_eq!(json["newPassword"], "p");
    }
}
