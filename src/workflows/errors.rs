use thiserror::Error;

use crate::workflows::types::RecordStatus;

pub const MISSING_VERIFIED_COUNT: &str = "missing verified count";
pub const INVALID_PAYMENT_DATE: &str = "missing or invalid payment date";

/// Failures the status workflow reports to its caller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// Caller-supplied input failed a precondition; re-prompt
    #[error("{0}")]
    Validation(String),
    /// The record is at PAYMENT and cannot move
    #[error("no further status change possible")]
    TerminalState,
    /// The record carries a status outside the known stages
    #[error("unknown record status {0:?}")]
    UnknownState(String),
    /// The store's copy has moved past the caller's copy
    #[error("record moved from {expected} to {actual} in the meantime")]
    Stale {
        expected: RecordStatus,
        actual: RecordStatus,
    },
}

impl WorkflowError {
    pub fn missing_verified_count() -> Self {
        WorkflowError::Validation(MISSING_VERIFIED_COUNT.to_string())
    }

    pub fn invalid_payment_date() -> Self {
        WorkflowError::Validation(INVALID_PAYMENT_DATE.to_string())
    }

    /// Whether the caller can fix the condition and try again
    pub fn is_retryable(&self) -> bool {
        matches!(self, WorkflowError::Validation(_) | WorkflowError::Stale { .. })
    }
}
