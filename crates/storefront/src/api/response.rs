//! Normalization of remote API replies.
//!
//! The API is inconsistent about its envelope: the success flag is sometimes
//! spelled `sucess`, field errors arrive in several shapes, and some
//! endpoints return no body at all. Everything funnels through [`Envelope`]
//! into a single [`ActionResult`].

use std::collections::BTreeMap;

use reqwest::StatusCode;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use super::ApiError;

/// Per-field validation messages, keyed by form field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Failure category of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The request never got a response (connection refused, timeout, DNS).
    Network,
    /// The API rejected the request (4xx, or a 2xx with `success: false`).
    Client,
    /// The API failed (5xx) or replied with an unusable body.
    Server,
    /// A token-requiring action was attempted without a token.
    Unauthenticated,
}

/// Uniform result of every auth action.
///
/// Actions never return `Err`; callers branch on [`ActionResult::success`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub field_errors: FieldErrors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

impl<T> ActionResult<T> {
    /// Successful result carrying `data`.
    #[must_use]
    pub fn ok(data: T, message: Option<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            field_errors: BTreeMap::new(),
            message,
            kind: None,
        }
    }

    /// Failed result with a user-facing error message.
    #[must_use]
    pub fn fail(kind: ErrorKind, error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            field_errors: BTreeMap::new(),
            message: None,
            kind: Some(kind),
        }
    }

    /// Failure for a token-requiring action attempted without a token.
    #[must_use]
    pub fn unauthenticated() -> Self {
        Self::fail(
            ErrorKind::Unauthenticated,
            "You must be logged in to do that.",
        )
    }

    /// Failure for a transport-level error.
    #[must_use]
    pub fn network(err: &ApiError) -> Self {
        let message = if err.is_timeout() {
            "Network error: the server took too long to respond."
        } else {
            "Network error. Please check your connection and try again."
        };
        Self::fail(ErrorKind::Network, message)
    }

    #[must_use]
    pub fn with_field_errors(mut self, field_errors: FieldErrors) -> Self {
        self.field_errors = field_errors;
        self
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

/// Raw reply: status code plus the body parsed as JSON when possible.
#[derive(Debug, Clone)]
pub(crate) struct Envelope {
    status: StatusCode,
    body: Value,
}

impl Envelope {
    /// Wrap a status and raw body text. Non-JSON bodies become `null`.
    pub(crate) fn new(status: StatusCode, text: &str) -> Self {
        let body = serde_json::from_str(text).unwrap_or(Value::Null);
        Self { status, body }
    }

    /// Explicit success flag, accepting the API's `sucess` misspelling.
    fn success_flag(&self) -> Option<bool> {
        self.body
            .get("success")
            .or_else(|| self.body.get("sucess"))
            .and_then(Value::as_bool)
    }

    fn message(&self) -> Option<String> {
        self.body
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(String::from)
    }

    /// Best error text the body offers, falling back to the status line.
    fn error_text(&self) -> String {
        self.body
            .get("message")
            .or_else(|| self.body.get("error"))
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map_or_else(
                || {
                    format!(
                        "Request failed: {} {}",
                        self.status.as_u16(),
                        self.status.canonical_reason().unwrap_or("Unknown")
                    )
                },
                String::from,
            )
    }

    fn failure_kind(&self) -> ErrorKind {
        if self.status.is_server_error() {
            ErrorKind::Server
        } else {
            ErrorKind::Client
        }
    }

    /// Whether the reply counts as accepted by the API.
    fn accepted(&self) -> bool {
        self.status.is_success() && self.success_flag() != Some(false)
    }

    /// Field-level validation errors in any of the shapes the API emits.
    ///
    /// - `{"errors": {"email": "taken"}}` or `{"errors": {"email": ["taken"]}}`
    /// - `{"errors": [{"path": "email", "message": "taken"}]}` (`field` also accepted)
    /// - `{"errorSources": [{"path": "email", "message": "taken"}]}`
    pub(crate) fn field_errors(&self) -> FieldErrors {
        let mut out = FieldErrors::new();

        for key in ["errors", "errorSources"] {
            match self.body.get(key) {
                Some(Value::Object(map)) => {
                    for (field, value) in map {
                        match value {
                            Value::String(msg) => push_error(&mut out, field, msg),
                            Value::Array(items) => {
                                for msg in items.iter().filter_map(Value::as_str) {
                                    push_error(&mut out, field, msg);
                                }
                            }
                            _ => {}
                        }
                    }
                }
                Some(Value::Array(items)) => {
                    for item in items {
                        let field = item
                            .get("path")
                            .or_else(|| item.get("field"))
                            .and_then(Value::as_str);
                        let msg = item.get("message").and_then(Value::as_str);
                        if let (Some(field), Some(msg)) = (field, msg) {
                            push_error(&mut out, field, msg);
                        }
                    }
                }
                _ => {}
            }
        }

        out
    }

    /// Failure result built from this reply.
    pub(crate) fn into_failure<T>(self) -> ActionResult<T> {
        let field_errors = self.field_errors();
        ActionResult::fail(self.failure_kind(), self.error_text()).with_field_errors(field_errors)
    }

    /// Normalize into a result carrying the `data` payload as `T`.
    ///
    /// A 2xx whose `data` does not decode as `T` is a failure: the success
    /// flag alone is never taken as proof that the payload is usable.
    pub(crate) fn into_result<T: DeserializeOwned>(self) -> ActionResult<T> {
        if !self.accepted() {
            return self.into_failure();
        }

        let message = self.message();
        let data = self.body.get("data").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<T>(data) {
            Ok(data) => ActionResult::ok(data, message),
            Err(e) => {
                tracing::warn!(error = %e, "API accepted request but payload was malformed");
                ActionResult::fail(ErrorKind::Server, "Malformed response from server")
            }
        }
    }

    /// Normalize a reply whose payload is irrelevant.
    pub(crate) fn into_unit(self) -> ActionResult<()> {
        if self.accepted() {
            let message = self.message();
            ActionResult::ok((), message)
        } else {
            self.into_failure()
        }
    }
}

fn push_error(out: &mut FieldErrors, field: &str, msg: &str) {
    out.entry(field.to_string())
        .or_default()
        .push(msg.to_string());
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::AuthData;
    use serde_json::json;

    use super::*;

    fn envelope(status: u16, body: &Value) -> Envelope {
        Envelope::new(StatusCode::from_u16(status).unwrap(), &body.to_string())
    }

    fn auth_body(flag_key: &str) -> Value {
        let mut body = json!({
            "message": "Logged in",
            "data": {
                "accessToken": "tok-123",
                "user": {"_id": "u1", "name": "Ada", "email": "ada@example.com", "role": "user"}
            }
        });
        body[flag_key] = Value::Bool(true);
        body
    }

    #[test]
    fn test_success_copies_user_and_token() {
        let result: ActionResult<AuthData> = envelope(200, &auth_body("success")).into_result();
        assert!(result.success);
        let auth = result.data.unwrap();
        assert_eq!(auth.access_token.expose(), "tok-123");
        assert_eq!(auth.user.name, "Ada");
        assert_eq!(result.message.as_deref(), Some("Logged in"));
    }

    #[test]
    fn test_misspelled_flag_is_honored() {
        let result: ActionResult<AuthData> = envelope(201, &auth_body("sucess")).into_result();
        assert!(result.success);
    }

    #[test]
    fn test_missing_flag_with_complete_payload_succeeds() {
        let mut body = auth_body("success");
        body.as_object_mut().unwrap().remove("success");
        let result: ActionResult<AuthData> = envelope(200, &body).into_result();
        assert!(result.success);
    }

    #[test]
    fn test_explicit_false_flag_fails_on_2xx() {
        let body = json!({"sucess": false, "message": "Email not verified"});
        let result: ActionResult<AuthData> = envelope(200, &body).into_result();
        assert!(!result.success);
        assert_eq!(result.kind, Some(ErrorKind::Client));
        assert_eq!(result.error.as_deref(), Some("Email not verified"));
    }

    #[test]
    fn test_2xx_without_token_is_malformed() {
        let body = json!({"success": true, "data": {"user": {"id": "u1", "name": "A", "email": "a@b.c"}}});
        let result: ActionResult<AuthData> = envelope(200, &body).into_result();
        assert!(!result.success);
        assert_eq!(result.kind, Some(ErrorKind::Server));
        assert_eq!(result.error.as_deref(), Some("Malformed response from server"));
    }

    #[test]
    fn test_client_error_with_field_map() {
        let body = json!({
            "message": "Validation failed",
            "errors": {"email": "Email already registered", "password": ["Too short", "Needs a digit"]}
        });
        let result: ActionResult<AuthData> = envelope(422, &body).into_result();
        assert!(!result.success);
        assert_eq!(result.kind, Some(ErrorKind::Client));
        assert_eq!(result.error.as_deref(), Some("Validation failed"));
        assert_eq!(result.field_error("email"), Some("Email already registered"));
        assert_eq!(result.field_errors["password"].len(), 2);
    }

    #[test]
    fn test_error_sources_array() {
        let body = json!({
            "success": false,
            "errorSources": [{"path": "name", "message": "Required"}],
            "errors": [{"field": "email", "message": "Invalid"}]
        });
        let fields = envelope(400, &body).field_errors();
        assert_eq!(fields["name"], vec!["Required".to_string()]);
        assert_eq!(fields["email"], vec!["Invalid".to_string()]);
    }

    #[test]
    fn test_server_error_without_body() {
        let env = Envelope::new(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        let result = env.into_unit();
        assert!(!result.success);
        assert_eq!(result.kind, Some(ErrorKind::Server));
        assert_eq!(result.error.as_deref(), Some("Request failed: 502 Bad Gateway"));
    }

    #[test]
    fn test_unit_success_ignores_body() {
        let env = Envelope::new(StatusCode::NO_CONTENT, "");
        let result = env.into_unit();
        assert!(result.success);
        assert_eq!(result.data, Some(()));
    }

    #[test]
    fn test_action_result_serializes_camel_case() {
        let result: ActionResult<()> = ActionResult::fail(ErrorKind::Client, "nope")
            .with_field_errors(FieldErrors::from([(
                "email".to_string(),
                vec!["bad".to_string()],
            )]));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["fieldErrors"]["email"][0], "bad");
        assert_eq!(json["kind"], "client");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_unauthenticated_result() {
        let result: ActionResult<()> = ActionResult::unauthenticated();
        assert!(!result.success);
        assert_eq!(result.kind, Some(ErrorKind::Unauthenticated));
    }
}
