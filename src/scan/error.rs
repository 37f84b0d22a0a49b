//! Scan flow error types.

use thiserror::Error;

use crate::models::FlowStep;

/// Reasons a scan flow operation was not carried out.
///
/// None of these are fatal: the flow stays at the same step and the
/// operator can retry or reset.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// Scanned value was empty or rejected by the validator.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The move transaction failed; the record is kept for a retry.
    #[error("Commit failed: {0}")]
    Commit(String),

    /// Another validation or commit is still pending.
    #[error("Another scan operation is still in progress")]
    Busy,

    /// Operation is not valid at the current step.
    #[error("Cannot {operation} at step '{}'", step.as_str())]
    WrongStep { operation: &'static str, step: FlowStep },

    /// The flow was reset while the operation was pending.
    #[error("Scan run was reset before the operation finished")]
    Superseded,
}

/// Result type for scan flow operations.
pub type Result<T> = std::result::Result<T, FlowError>;
