use std::fmt;

use thiserror::Error;

use crate::domain::user::ValidationError;

/// Unique columns a conflict can be raised for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Email,
    Username,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => write!(f, "email"),
            Self::Username => write!(f, "username"),
        }
    }
}

/// Core domain errors
///
/// Not-found is never modeled here: lookups return `Option` instead. The two
/// storage variants separate "cannot reach the engine" from "the engine
/// rejected the operation" so callers can decide between retrying and
/// surfacing.
#[derive(Debug, Error, PartialEq)]
pub enum DomainError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Conflict: {field} '{value}' already exists")]
    Conflict { field: UniqueField, value: String },

    #[error("Storage unavailable: {message}")]
    Unavailable { message: String },

    #[error("Storage rejected the operation: {message}")]
    Rejected { message: String },

    #[error("Password hashing failed")]
    Hashing,
}

impl DomainError {
    pub fn conflict(field: UniqueField, value: impl Into<String>) -> Self {
        Self::Conflict {
            field,
            value: value.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
