//! Customer email addresses.
//!
//! The storefront never sends mail itself; addresses only need to be shaped
//! well enough that the commerce API accepts them and that the dashboard can
//! show them. Deeper checks (MX lookup, deliverability) are the API's job.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Why a string was rejected as an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    #[error("email must be at most {max} characters")]
    TooLong { max: usize },
    #[error("email must contain an @ symbol")]
    MissingAtSymbol,
    #[error("email local part cannot be empty")]
    EmptyLocalPart,
    #[error("email domain cannot be empty")]
    EmptyDomain,
    #[error("email cannot contain whitespace")]
    Whitespace,
}

/// An account email address.
///
/// Split on the last `@`, so quoted local parts such as `"a@b"@shop.test`
/// keep their domain. Values coming from the API go through the same check
/// on deserialize.
///
/// ```
/// use bazaar_core::Email;
///
/// let email = Email::parse_trimmed(" ada+orders@bazaar.test ").unwrap();
/// assert_eq!(email.as_str(), "ada+orders@bazaar.test");
/// assert!(Email::parse("ada at bazaar.test").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// RFC 5321 path limit.
    pub const MAX_LENGTH: usize = 254;

    /// Validate `s` as an email address.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] naming the first problem found.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        Self::check(s)?;
        Ok(Self(s.to_owned()))
    }

    /// Like [`Email::parse`], ignoring leading and trailing whitespace.
    ///
    /// # Errors
    ///
    /// Same as [`Email::parse`].
    pub fn parse_trimmed(s: &str) -> Result<Self, EmailError> {
        Self::parse(s.trim())
    }

    fn check(s: &str) -> Result<(), EmailError> {
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if s.chars().any(char::is_whitespace) {
            return Err(EmailError::Whitespace);
        }
        match s.rsplit_once('@') {
            None => Err(EmailError::MissingAtSymbol),
            Some(("", _)) => Err(EmailError::EmptyLocalPart),
            Some((_, "")) => Err(EmailError::EmptyDomain),
            Some(_) => Ok(()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::check(&value)?;
        Ok(Self(value))
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
