//! Errors raised while building domain values from untrusted input.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Rejected master data or identifiers.
///
/// Authorization outcomes (denials, pending role selection) are not errors of
/// this kind; they live with the evaluator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Two records claim the same key (menu id, role name, user id).
    #[error("duplicate {kind} '{key}'")]
    Duplicate { kind: &'static str, key: String },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn duplicate(kind: &'static str, key: impl ToString) -> Self {
        Self::Duplicate {
            kind,
            key: key.to_string(),
        }
    }
}
