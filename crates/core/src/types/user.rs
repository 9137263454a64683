//! User profile and session payload types.
//!
//! These mirror the JSON the remote API returns from `/auth/login`,
//! `/auth/register` and `/users/profile`.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Email, Role, UserId};

/// A user profile as returned by the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

/// Postal address attached to a profile.
///
/// Every field is optional because profile updates are partial.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "zipCode")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Address {
    /// True when no field carries a value.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.street.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.postal_code.is_none()
            && self.country.is_none()
    }
}

/// Bearer token issued by the remote API.
///
/// Serialized as a plain string so it can live in the server-side session;
/// `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token for use in an `Authorization` header or cookie.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// The authenticated session: one token plus the profile it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub access_token: AccessToken,
    pub user: User,
}

impl AuthData {
    #[must_use]
    pub const fn new(access_token: AccessToken, user: User) -> Self {
        Self { access_token, user }
    }

    /// A session only counts as authenticated when it carries a token.
    #[must_use]
    pub fn has_token(&self) -> bool {
        !self.access_token.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_deserializes_api_shape() {
        let json = r#"{
            "_id": "64f1c2a9",
            "name": "Ada",
            "email": "ada@example.com",
            "role": "admin",
            "address": {"city": "London", "zipCode": "N1"}
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id.as_str(), "64f1c2a9");
        assert_eq!(user.role, Role::Admin);
        let address = user.address.unwrap();
        assert_eq!(address.city.as_deref(), Some("London"));
        assert_eq!(address.postal_code.as_deref(), Some("N1"));
    }

    #[test]
    fn test_user_role_defaults_to_user() {
        let json = r#"{"id": "1", "name": "Bo", "email": "bo@example.com"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Role::User);
        assert!(user.photo.is_none());
    }

    #[test]
    fn test_access_token_debug_is_redacted() {
        let token = AccessToken::new("eyJhbGciOi.secret");
        let debug = format!("{token:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_blank_token_is_not_a_session() {
        let user: User =
            serde_json::from_str(r#"{"id": "1", "name": "Bo", "email": "bo@example.com"}"#)
                .unwrap();
        assert!(!AuthData::new(AccessToken::new("  "), user.clone()).has_token());
        assert!(AuthData::new(AccessToken::new("t"), user).has_token());
    }

    #[test]
    fn test_address_skips_empty_fields() {
        let address = Address {
            city: Some("Lagos".to_string()),
            ..Address::default()
        };
        assert!(!address.is_empty());
        assert_eq!(
            serde_json::to_string(&address).unwrap(),
            r#"{"city":"Lagos"}"#
        );
        assert!(Address::default().is_empty());
    }
}
