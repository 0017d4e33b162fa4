//! Error types for the scheduling workflow.
//!
//! Three families, handled differently:
//! - [`ValidationError`]: operator input rejected before any request.
//! - [`RemoteError`]: a collaborator call failed; the operator may retry.
//! - [`WorkflowError::Invariant`]: a local programming error, logged and
//!   never reported to the operator as their mistake.

pub use crate::validation::ValidationError;

/// Result type for collaborator calls.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Result type for workflow operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

const GENERIC_REMOTE_MESSAGE: &str = "The request could not be completed. Please try again later.";

/// Error returned by a directory, store or import endpoint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("Server returned status {code}")]
    Status {
        code: u16,
        /// Message supplied by the server, if any.
        message: Option<String>,
    },

    #[error("Transport error: {0}")]
    Transport(String),
}

impl RemoteError {
    /// Status error without a server message.
    pub fn status(code: u16) -> Self {
        RemoteError::Status {
            code,
            message: None,
        }
    }

    /// Status error carrying the server's message.
    pub fn with_message(code: u16, message: impl Into<String>) -> Self {
        RemoteError::Status {
            code,
            message: Some(message.into()),
        }
    }

    /// Text to show the operator: the server's message when present,
    /// a generic one otherwise.
    pub fn operator_message(&self) -> &str {
        match self {
            RemoteError::Status {
                message: Some(m), ..
            } if !m.is_empty() => m.as_str(),
            _ => GENERIC_REMOTE_MESSAGE,
        }
    }
}

/// Error type for workflow operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Invariant violated: {0}")]
    Invariant(String),
}

impl WorkflowError {
    /// Whether the error should be shown to the operator.
    pub fn is_operator_facing(&self) -> bool {
        !matches!(self, WorkflowError::Invariant(_))
    }

    /// Operator-facing text, `None` for invariant violations.
    pub fn operator_message(&self) -> Option<String> {
        match self {
            WorkflowError::Validation(e) => Some(e.message.clone()),
            WorkflowError::Remote(e) => Some(e.operator_message().to_string()),
            WorkflowError::Invariant(_) => None,
        }
    }
}
