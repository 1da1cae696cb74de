//! Error types for signaling primitives.

use thiserror::Error;

/// Reasons a pending confirmation settles without a user decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfirmationError {
    /// A newer confirmation replaced this one before it was answered.
    #[error("confirmation superseded by a newer request")]
    Superseded,
    /// The dialog was closed, or the broker dropped, without an answer.
    #[error("confirmation dismissed without a decision")]
    Dismissed,
}

/// Result alias for confirmation outcomes.
pub type ConfirmationResult<T> = Result<T, ConfirmationError>;
