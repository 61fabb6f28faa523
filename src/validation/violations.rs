//! Violation errors and handling strategies.

use thiserror::Error;

/// A single failed validation check.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ViolationError {
    #[error("Field '{field}' is invalid: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Custom check failed: {message}")]
    CustomCheckFailed { message: String },
}

/// What the validation middleware does when any check fails.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViolationStrategy {
    /// Return the previous value, rejecting the candidate
    Veto,

    /// Fail the transition with every violation attached
    Propagate,

    /// Let the candidate through but log a warning
    IgnoreAndLog,
}
