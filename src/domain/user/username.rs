use std::fmt;

use serde::{Deserialize, Serialize};

use super::validation::ValidationError;

const MIN_USERNAME_LENGTH: usize = 3;
const MAX_USERNAME_LENGTH: usize = 30;

/// A display handle: 3 to 30 characters of ASCII letters, digits, underscores
/// and hyphens. Case is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let trimmed = value.into().trim().to_string();

        let length = trimmed.chars().count();
        if length < MIN_USERNAME_LENGTH {
            return Err(ValidationError::UsernameTooShort(MIN_USERNAME_LENGTH));
        }

        if length > MAX_USERNAME_LENGTH {
            return Err(ValidationError::UsernameTooLong(MAX_USERNAME_LENGTH));
        }

        if let Some(invalid) = trimmed
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '_' && *c != '-')
        {
            return Err(ValidationError::UsernameInvalidCharacter(invalid));
        }

        Ok(Self(trimmed))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Username {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_allowed_characters() {
        for candidate in ["abc", "Maria_Lopez", "user-42", "A1_b2-C3"] {
            assert!(Username::new(candidate).is_ok(), "rejected {candidate}");
        }
    }

    #[test]
    fn test_preserves_case() {
        let username = Username::new("MariaLopez").unwrap();
        assert_eq!(username.as_str(), "MariaLopez");
    }

    #[test]
    fn test_trims_whitespace_before_validating() {
        let username = Username::new("  maria  ").unwrap();
        assert_eq!(username.as_str(), "maria");
    }

    #[test]
    fn test_rejects_too_short() {
        assert_eq!(
            Username::new("ab"),
            Err(ValidationError::UsernameTooShort(MIN_USERNAME_LENGTH))
        );
        assert_eq!(
            Username::new(""),
            Err(ValidationError::UsernameTooShort(MIN_USERNAME_LENGTH))
        );
    }

    #[test]
    fn test_rejects_too_long() {
        assert_eq!(
            Username::new("a".repeat(31)),
            Err(ValidationError::UsernameTooLong(MAX_USERNAME_LENGTH))
        );
        assert!(Username::new("a".repeat(30)).is_ok());
    }

    #[test]
    fn test_rejects_invalid_characters() {
        assert_eq!(
            Username::new("maria lopez"),
            Err(ValidationError::UsernameInvalidCharacter(' '))
        );
        assert_eq!(
            Username::new("maria?"),
            Err(ValidationError::UsernameInvalidCharacter('?'))
        );
        assert_eq!(
            Username::new("año123"),
            Err(ValidationError::UsernameInvalidCharacter('ñ'))
        );
    }
}
