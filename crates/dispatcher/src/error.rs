//! Dispatcher error types

use contracts::RunState;
use thiserror::Error;

/// Dispatch controller errors
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Recipient list is empty
    #[error("validation error: recipient list is empty")]
    EmptyQueue,

    /// Recipient list contains malformed addresses; the whole batch is rejected
    #[error("validation error: invalid email addresses found: {}", invalid.join(", "))]
    InvalidRecipients { invalid: Vec<String> },

    /// Message template is missing a required field or has a bad address
    #[error("validation error: {message}")]
    InvalidTemplate { message: String },

    /// start() called while a batch is active
    #[error("a batch is already {state}")]
    BatchInProgress { state: RunState },

    /// Drive loop task failed to complete
    #[error("batch task failed: {0}")]
    Join(String),
}

impl DispatchError {
    /// True for errors that stop a batch before it starts
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyQueue | Self::InvalidRecipients { .. } | Self::InvalidTemplate { .. }
        )
    }
}
