//! Error mapping shared by the SQL adapters

use crate::domain::user::User;
use crate::domain::{DomainError, UniqueField};

/// Classify a unique-constraint violation by the field it hit.
///
/// Both engines name the constraints `uq_users_email` / `uq_users_username`
/// in the embedded schema; the message is checked as a fallback for engines
/// that do not report the constraint name.
pub(crate) fn unique_conflict(error: &sqlx::Error) -> Option<UniqueField> {
    let database_error = match error {
        sqlx::Error::Database(database_error) => database_error,
        _ => return None,
    };

    if !database_error.is_unique_violation() {
        return None;
    }

    let detail = database_error
        .constraint()
        .map(str::to_string)
        .unwrap_or_else(|| database_error.message().to_string())
        .to_lowercase();

    // Constraint names first: MySQL only reports them inside the message,
    // next to the duplicated value, which may itself contain "email".
    if detail.contains("uq_users_email") {
        Some(UniqueField::Email)
    } else if detail.contains("uq_users_username") {
        Some(UniqueField::Username)
    } else if detail.contains("username") {
        Some(UniqueField::Username)
    } else if detail.contains("email") {
        Some(UniqueField::Email)
    } else {
        None
    }
}

/// The value a conflict was raised for, read back off the entity.
pub(crate) fn conflict_value(user: &User, field: UniqueField) -> &str {
    match field {
        UniqueField::Email => user.email().as_str(),
        UniqueField::Username => user.username().as_str(),
    }
}

/// Wrap a non-conflict sqlx error, separating connectivity problems from
/// statements the engine refused.
pub(crate) fn map_sqlx_error(context: &str, error: sqlx::Error) -> DomainError {
    match error {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Configuration(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => {
            DomainError::unavailable(format!("{context}: {error}"))
        }
        other => DomainError::rejected(format!("{context}: {other}")),
    }
}
