//! Handler failures.

use std::result::Result as StdResult;

use thiserror::Error;

/// Result type returned by action handlers.
pub type HandlerResult = StdResult<(), HandlerError>;

/// Failure reported by an action handler.
///
/// Failures are logged by the registry and never stop delivery to other handlers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// A payload value the handler needs is absent or malformed.
    #[error("missing or invalid payload value '{0}'")]
    Payload(String),

    /// The handler refused the action.
    #[error("action rejected: {0}")]
    Rejected(String),

    /// Generic error with context.
    #[error("handler error: {0}")]
    Msg(String),
}

impl HandlerError {
    /// Shorthand for [`HandlerError::Msg`].
    pub fn msg(s: impl Into<String>) -> Self {
        Self::Msg(s.into())
    }
}
