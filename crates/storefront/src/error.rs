//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Server-side failures are
//! captured to Sentry before the response is written; clients only ever see
//! a generic message for those.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bazaar_core::{TransitionError, User};
use thiserror::Error;

use crate::session::SessionError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Session backend failed.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Requested status change is not allowed.
    #[error("{0}")]
    Transition(#[from] TransitionError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Transition(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Tag Sentry events from this scope with the signed-in user.
pub fn set_sentry_user(user: &User) {
    let sentry_user = sentry::User {
        id: Some(user.id.to_string()),
        email: Some(user.email.to_string()),
        username: Some(user.name.clone()),
        ..Default::default()
    };
    sentry::configure_scope(|scope| scope.set_user(Some(sentry_user)));
}

pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| scope.set_user(None));
}

/// Record a dashboard write as an `admin` breadcrumb.
///
/// `fields` become the breadcrumb's data map, e.g.
/// `[("order_id", "ord_1001"), ("status", "shipped")]`.
pub fn admin_breadcrumb(message: &str, fields: &[(&str, &str)]) {
    let data = fields
        .iter()
        .map(|&(key, value)| (key.to_owned(), serde_json::Value::from(value)))
        .collect();

    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some("admin".to_owned()),
        message: Some(message.to_owned()),
        level: sentry::Level::Info,
        data,
        ..Default::default()
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::OrderStatus;

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("ord_404".to_string());
        assert_eq!(err.to_string(), "Not found: ord_404");

        let err = OrderStatus::Delivered
            .transition(OrderStatus::Pending)
            .unwrap_err();
        let err = AppError::from(err);
        assert_eq!(err.to_string(), "cannot move order from delivered to pending");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_session_failure_hides_details() {
        let err = AppError::from(SessionError::Io(std::io::Error::other("disk full")));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Internal server error");
    }

    #[test]
    fn test_transition_error_is_conflict() {
        let err = OrderStatus::Cancelled
            .transition(OrderStatus::Shipped)
            .unwrap_err();
        assert_eq!(AppError::from(err).status(), StatusCode::CONFLICT);
    }
}
