//! Engine errors.
//!
//! `Display` output is meant for the player or admin who triggered the
//! operation; [`Error::pretty`] adds a hint for logs and CLIs.

use std::result::Result as StdResult;

use dialog_config::CompileError;
use dialog_key::KeyError;
use thiserror::Error;

/// Result alias for engine operations.
pub type Result<T> = StdResult<T, Error>;

/// Failures surfaced by [`crate::DialogEngine`] and its helpers.
#[derive(Debug, Error)]
pub enum Error {
    /// Compilation failed: unknown id, disabled dialog or `show_dialog` cycle.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Validation found errors and the policy blocks opening.
    #[error("dialog '{id}' is blocked by {errors} validation error(s)")]
    Blocked {
        /// Dialog id.
        id: String,
        /// Number of `Error` issues.
        errors: usize,
    },

    /// A console command still contains `%` placeholders after resolution.
    #[error("refusing to run console command with unresolved placeholders: {command}")]
    UnresolvedPlaceholders {
        /// The command after resolution.
        command: String,
    },

    /// A player-only action was triggered without a player.
    #[error("cannot run '{action}' without a player")]
    NoPlayer {
        /// The action or resolved command.
        action: String,
    },

    /// A custom click carried an invalid key.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// An addon failed to enable or disable.
    #[error("addon '{id}': {message}")]
    Addon {
        /// Addon id.
        id: String,
        /// Failure text reported by the addon.
        message: String,
    },

    /// Dialog or settings text could not be read.
    #[error(transparent)]
    Config(#[from] dialog_config::Error),

    /// Generic error with context.
    #[error("{0}")]
    Msg(String),
}

impl Error {
    /// Shorthand for [`Error::Msg`].
    pub fn msg(s: impl Into<String>) -> Self {
        Self::Msg(s.into())
    }

    /// Shorthand for [`Error::Addon`].
    pub fn addon(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Addon {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Multi-line rendering with a resolution hint where one exists.
    pub fn pretty(&self) -> String {
        match self {
            Self::Compile(e) => e.pretty(),
            Self::Config(e) => e.pretty(),
            Self::Blocked { id, .. } => format!(
                "{self}\nRun validation on '{}' and fix the reported errors, or use the advisory policy",
                id
            ),
            Self::UnresolvedPlaceholders { .. } => {
                format!("{self}\nCheck the placeholder names or install a resolver that provides them")
            }
            _ => self.to_string(),
        }
    }
}
