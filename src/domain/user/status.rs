use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::validation::ValidationError;

/// Lifecycle state of a user account.
///
/// Accounts start in `ConfirmationPending` and move through the transitions
/// allowed by [`UserStatus::can_transition_to`]. `Banned` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    #[default]
    ConfirmationPending,
    Suspended,
    Banned,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::ConfirmationPending => "confirmation_pending",
            Self::Suspended => "suspended",
            Self::Banned => "banned",
        }
    }

    /// Only active accounts may authenticate.
    pub fn can_login(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn can_reactivate(&self) -> bool {
        matches!(self, Self::Suspended)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Banned)
    }

    /// Whether moving from `self` to `target` is a legal lifecycle step.
    /// Staying in place is not a transition.
    pub fn can_transition_to(&self, target: UserStatus) -> bool {
        match (self, target) {
            (Self::ConfirmationPending, Self::Active)
            | (Self::ConfirmationPending, Self::Suspended)
            | (Self::ConfirmationPending, Self::Banned)
            | (Self::Active, Self::Suspended)
            | (Self::Active, Self::Banned)
            | (Self::Suspended, Self::Active)
            | (Self::Suspended, Self::Banned) => true,
            _ => false,
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "confirmation_pending" => Ok(Self::ConfirmationPending),
            "suspended" => Ok(Self::Suspended),
            "banned" => Ok(Self::Banned),
            other => Err(ValidationError::UnknownStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_confirmation_pending() {
        assert_eq!(UserStatus::default(), UserStatus::ConfirmationPending);
    }

    #[test]
    fn test_round_trips_through_str() {
        for status in [
            UserStatus::Active,
            UserStatus::ConfirmationPending,
            UserStatus::Suspended,
            UserStatus::Banned,
        ] {
            assert_eq!(status.as_str().parse::<UserStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_rejects_unknown_status() {
        assert_eq!(
            "frozen".parse::<UserStatus>(),
            Err(ValidationError::UnknownStatus("frozen".to_string()))
        );
    }

    #[test]
    fn test_only_active_can_login() {
        assert!(UserStatus::Active.can_login());
        assert!(!UserStatus::ConfirmationPending.can_login());
        assert!(!UserStatus::Suspended.can_login());
        assert!(!UserStatus::Banned.can_login());
    }

    #[test]
    fn test_allowed_transitions() {
        use UserStatus::*;

        assert!(ConfirmationPending.can_transition_to(Active));
        assert!(ConfirmationPending.can_transition_to(Suspended));
        assert!(ConfirmationPending.can_transition_to(Banned));
        assert!(Active.can_transition_to(Suspended));
        assert!(Active.can_transition_to(Banned));
        assert!(Suspended.can_transition_to(Active));
        assert!(Suspended.can_transition_to(Banned));
    }

    #[test]
    fn test_forbidden_transitions() {
        use UserStatus::*;

        assert!(!Active.can_transition_to(ConfirmationPending));
        assert!(!Suspended.can_transition_to(ConfirmationPending));
        assert!(!Banned.can_transition_to(Active));
        assert!(!Banned.can_transition_to(Suspended));
        assert!(!Banned.can_transition_to(ConfirmationPending));
    }

    #[test]
    fn test_self_transition_is_forbidden() {
        for status in [
            UserStatus::Active,
            UserStatus::ConfirmationPending,
            UserStatus::Suspended,
            UserStatus::Banned,
        ] {
            assert!(!status.can_transition_to(status));
        }
    }

    #[test]
    fn test_terminal_and_reactivation_flags() {
        assert!(UserStatus::Banned.is_terminal());
        assert!(!UserStatus::Suspended.is_terminal());
        assert!(UserStatus::Suspended.can_reactivate());
        assert!(!UserStatus::Banned.can_reactivate());
    }
}
