use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use super::validation::ValidationError;

const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 100;

/// Characters that are never accepted in a password, mostly markup delimiters.
const FORBIDDEN_CHARACTERS: [char; 5] = ['<', '>', '\'', '"', '`'];

/// Case-insensitive injection markers. A password containing any of these is
/// rejected outright.
const FORBIDDEN_SEQUENCES: [&str; 8] = [
    "javascript:",
    "vbscript:",
    "data:text/html",
    "<script",
    "eval(",
    "expression(",
    "onerror=",
    "onload=",
];

const SPECIAL_CHARACTERS: &str = "!@#$%^&*()_+-=[]{}|;:,.?/~";

pub const BCRYPT_MIN_COST: u32 = 4;
pub const BCRYPT_MAX_COST: u32 = 31;

static HASH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$2[abxy]?\$(\d{2})\$[./A-Za-z0-9]{53}$").unwrap());

/// A plaintext password that passed the strength policy.
///
/// The inner value is deliberately kept out of `Debug` output and never
/// serialized.
#[derive(Clone, PartialEq, Eq)]
pub struct PlainPassword(String);

impl PlainPassword {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let candidate = value.into();

        let length = candidate.chars().count();
        if length < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
        }

        if length > MAX_PASSWORD_LENGTH {
            return Err(ValidationError::PasswordTooLong(MAX_PASSWORD_LENGTH));
        }

        if candidate.chars().any(char::is_control) {
            return Err(ValidationError::PasswordControlCharacter);
        }

        if let Some(forbidden) = candidate
            .chars()
            .find(|c| FORBIDDEN_CHARACTERS.contains(c))
        {
            return Err(ValidationError::PasswordForbiddenCharacter(forbidden));
        }

        let lowered = candidate.to_lowercase();
        if let Some(sequence) = FORBIDDEN_SEQUENCES
            .iter()
            .find(|sequence| lowered.contains(**sequence))
        {
            return Err(ValidationError::PasswordForbiddenSequence(*sequence));
        }

        let mut missing = Vec::new();
        if !candidate.chars().any(|c| c.is_ascii_lowercase()) {
            missing.push("a lowercase letter");
        }
        if !candidate.chars().any(|c| c.is_ascii_uppercase()) {
            missing.push("an uppercase letter");
        }
        if !candidate.chars().any(|c| c.is_ascii_digit()) {
            missing.push("a digit");
        }
        if !candidate.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
            missing.push("a special character");
        }
        if !missing.is_empty() {
            return Err(ValidationError::PasswordMissingClasses(missing.join(", ")));
        }

        Ok(Self(candidate))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlainPassword(<redacted>)")
    }
}

/// A bcrypt hash string of the form `$2[abxy]?$NN$<22-char salt><31-char digest>`.
///
/// Only the shape is checked here. Producing and verifying hashes is the job
/// of a `PasswordHasher` implementation.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    value: String,
    cost: u32,
}

impl HashedPassword {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();

        if value.len() != 59 && value.len() != 60 {
            return Err(ValidationError::HashInvalidLength(value.len()));
        }

        let captures = HASH_PATTERN
            .captures(&value)
            .ok_or(ValidationError::HashInvalidFormat)?;

        let cost: u32 = captures[1]
            .parse()
            .map_err(|_| ValidationError::HashInvalidFormat)?;

        if !(BCRYPT_MIN_COST..=BCRYPT_MAX_COST).contains(&cost) {
            return Err(ValidationError::HashCostOutOfRange(
                cost,
                BCRYPT_MIN_COST,
                BCRYPT_MAX_COST,
            ));
        }

        Ok(Self { value, cost })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Cost factor embedded in the hash.
    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashedPassword(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HASH: &str = "$2b$12$C6UzMDM.H6dfI/f/IKcEeO7ZBw5qMeEjV1kqCJS8g6cMqrYhWCEG6";

    #[test]
    fn test_accepts_strong_password() {
        assert!(PlainPassword::new("Str0ng!Password").is_ok());
    }

    #[test]
    fn test_rejects_short_and_long() {
        assert_eq!(
            PlainPassword::new("Ab1!xyz"),
            Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH))
        );
        let long = format!("Aa1!{}", "x".repeat(97));
        assert_eq!(
            PlainPassword::new(long),
            Err(ValidationError::PasswordTooLong(MAX_PASSWORD_LENGTH))
        );
    }

    #[test]
    fn test_rejects_control_characters() {
        assert_eq!(
            PlainPassword::new("Str0ng!\tPass"),
            Err(ValidationError::PasswordControlCharacter)
        );
    }

    #[test]
    fn test_rejects_forbidden_characters() {
        assert_eq!(
            PlainPassword::new("Str0ng!<Pass"),
            Err(ValidationError::PasswordForbiddenCharacter('<'))
        );
        assert_eq!(
            PlainPassword::new("Str0ng!\"Pass"),
            Err(ValidationError::PasswordForbiddenCharacter('"'))
        );
    }

    #[test]
    fn test_rejects_forbidden_sequences_case_insensitively() {
        assert_eq!(
            PlainPassword::new("Abc1!JavaScript:x"),
            Err(ValidationError::PasswordForbiddenSequence("javascript:"))
        );
        assert_eq!(
            PlainPassword::new("Abc1!eval(now)"),
            Err(ValidationError::PasswordForbiddenSequence("eval("))
        );
    }

    #[test]
    fn test_reports_all_missing_classes_at_once() {
        assert_eq!(
            PlainPassword::new("alllowercase"),
            Err(ValidationError::PasswordMissingClasses(
                "an uppercase letter, a digit, a special character".to_string()
            ))
        );
        assert_eq!(
            PlainPassword::new("12345678"),
            Err(ValidationError::PasswordMissingClasses(
                "a lowercase letter, an uppercase letter, a special character".to_string()
            ))
        );
    }

    #[test]
    fn test_debug_redacts_plaintext() {
        let password = PlainPassword::new("Str0ng!Password").unwrap();
        let rendered = format!("{password:?}");
        assert!(!rendered.contains("Str0ng"));
        assert!(rendered.contains("redacted"));
    }

    #[test]
    fn test_accepts_bcrypt_variants() {
        assert!(HashedPassword::new(SAMPLE_HASH).is_ok());
        let legacy = SAMPLE_HASH.replacen("$2b$", "$2$", 1);
        assert_eq!(legacy.len(), 59);
        assert!(HashedPassword::new(legacy).is_ok());
        for variant in ["$2a$", "$2x$", "$2y$"] {
            assert!(HashedPassword::new(SAMPLE_HASH.replacen("$2b$", variant, 1)).is_ok());
        }
    }

    #[test]
    fn test_exposes_cost() {
        let hash = HashedPassword::new(SAMPLE_HASH).unwrap();
        assert_eq!(hash.cost(), 12);
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert_eq!(
            HashedPassword::new("$2b$12$tooshort"),
            Err(ValidationError::HashInvalidLength(15))
        );
    }

    #[test]
    fn test_rejects_malformed_prefix() {
        let candidate = SAMPLE_HASH.replacen("$2b$", "$3b$", 1);
        assert_eq!(
            HashedPassword::new(candidate),
            Err(ValidationError::HashInvalidFormat)
        );
    }

    #[test]
    fn test_rejects_cost_out_of_range() {
        let candidate = SAMPLE_HASH.replacen("$2b$12$", "$2b$03$", 1);
        assert_eq!(
            HashedPassword::new(candidate),
            Err(ValidationError::HashCostOutOfRange(3, 4, 31))
        );
        let candidate = SAMPLE_HASH.replacen("$2b$12$", "$2b$32$", 1);
        assert_eq!(
            HashedPassword::new(candidate),
            Err(ValidationError::HashCostOutOfRange(32, 4, 31))
        );
    }

    #[test]
    fn test_debug_redacts_hash() {
        let hash = HashedPassword::new(SAMPLE_HASH).unwrap();
        assert!(!format!("{hash:?}").contains("$2b$"));
    }
}
