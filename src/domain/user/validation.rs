//! Validation errors shared by the identity value objects

use thiserror::Error;

use super::status::UserStatus;

/// Errors raised by value-object constructors and entity rehydration
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Email cannot be empty")]
    EmptyEmail,

    #[error("Email cannot exceed {0} characters")]
    EmailTooLong(usize),

    #[error("Email must contain an '@' separator")]
    EmailMissingAt,

    #[error("Email is missing its domain part")]
    EmailMissingDomain,

    #[error("Email cannot have a leading or trailing dot in its local or domain part")]
    EmailEdgeDot,

    #[error("Email format is not valid")]
    EmailInvalidFormat,

    #[error("Username must have at least {0} characters")]
    UsernameTooShort(usize),

    #[error("Username cannot exceed {0} characters")]
    UsernameTooLong(usize),

    #[error("Username contains invalid character: '{0}'. Only letters, digits, underscores and hyphens are allowed")]
    UsernameInvalidCharacter(char),

    #[error("Password must have at least {0} characters")]
    PasswordTooShort(usize),

    #[error("Password cannot exceed {0} characters")]
    PasswordTooLong(usize),

    #[error("Password cannot contain control characters")]
    PasswordControlCharacter,

    #[error("Password cannot contain the character '{0}'")]
    PasswordForbiddenCharacter(char),

    #[error("Password cannot contain the sequence \"{0}\"")]
    PasswordForbiddenSequence(&'static str),

    /// Carries every missing complexity category, pre-joined into one message.
    #[error("Password must contain {0}")]
    PasswordMissingClasses(String),

    #[error("Current password is incorrect")]
    CurrentPasswordMismatch,

    #[error("Password hash is not a recognized bcrypt string")]
    HashInvalidFormat,

    #[error("Password hash length {0} is not a valid bcrypt length")]
    HashInvalidLength(usize),

    #[error("Password hash cost factor {0} must be between {1} and {2}")]
    HashCostOutOfRange(u32, u32, u32),

    #[error("Unknown role '{0}'")]
    UnknownRole(String),

    #[error("Unknown user status '{0}'")]
    UnknownStatus(String),

    #[error("Unknown continent '{0}'")]
    UnknownContinent(String),

    #[error("Country code must be exactly two letters")]
    CountryCodeNotTwoLetters,

    #[error("Country code '{0}' is not in the supported ISO 3166-1 set")]
    UnknownCountryCode(String),

    #[error("User id cannot be empty")]
    EmptyUserId,

    #[error("updated_at cannot precede created_at")]
    UpdatedBeforeCreated,

    #[error("Cannot transition user status from '{from}' to '{to}'")]
    InvalidStatusTransition { from: UserStatus, to: UserStatus },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_messages_carry_limits() {
        assert_eq!(
            ValidationError::UsernameTooShort(3).to_string(),
            "Username must have at least 3 characters"
        );
        assert_eq!(
            ValidationError::UsernameTooLong(30).to_string(),
            "Username cannot exceed 30 characters"
        );
    }

    #[test]
    fn test_password_classes_message_joins_categories() {
        let error = ValidationError::PasswordMissingClasses(
            "an uppercase letter, a digit".to_string(),
        );
        assert_eq!(
            error.to_string(),
            "Password must contain an uppercase letter, a digit"
        );
    }

    #[test]
    fn test_transition_message_names_both_states() {
        let error = ValidationError::InvalidStatusTransition {
            from: UserStatus::Banned,
            to: UserStatus::Active,
        };
        assert_eq!(
            error.to_string(),
            "Cannot transition user status from 'banned' to 'active'"
        );
    }
}
