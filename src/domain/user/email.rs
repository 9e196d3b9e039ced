use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::validation::ValidationError;

const MAX_EMAIL_LENGTH: usize = 254;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9!#$%&'*+/=?^_`{|}~.-]+@[a-z0-9](?:[a-z0-9-]*[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]*[a-z0-9])?)+$")
        .unwrap()
});

/// A normalized, syntactically valid email address.
///
/// Construction trims surrounding whitespace and lowercases the input, so two
/// addresses that differ only in case compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let normalized = value.into().trim().to_lowercase();

        if normalized.is_empty() {
            return Err(ValidationError::EmptyEmail);
        }

        if normalized.chars().count() > MAX_EMAIL_LENGTH {
            return Err(ValidationError::EmailTooLong(MAX_EMAIL_LENGTH));
        }

        let at_count = normalized.matches('@').count();
        if at_count == 0 {
            return Err(ValidationError::EmailMissingAt);
        }
        if at_count > 1 {
            return Err(ValidationError::EmailInvalidFormat);
        }

        let (local, domain) = normalized
            .split_once('@')
            .ok_or(ValidationError::EmailMissingAt)?;

        if local.is_empty() {
            return Err(ValidationError::EmailInvalidFormat);
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(ValidationError::EmailMissingDomain);
        }

        if local.starts_with('.')
            || local.ends_with('.')
            || domain.starts_with('.')
            || domain.ends_with('.')
        {
            return Err(ValidationError::EmailEdgeDot);
        }

        if normalized.contains("..") {
            return Err(ValidationError::EmailInvalidFormat);
        }

        if !EMAIL_PATTERN.is_match(&normalized) {
            return Err(ValidationError::EmailInvalidFormat);
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Domain part, after the '@'.
    pub fn domain(&self) -> &str {
        self.0
            .split_once('@')
            .map(|(_, domain)| domain)
            .unwrap_or("")
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}
