//! Error handling for the dialogs binary.

use std::{io, path::PathBuf, result};

use thiserror::Error;

/// Convenient result type for dialogs operations.
pub type Result<T> = result::Result<T, Error>;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrapper for standard I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Directory traversal failed.
    #[error("Failed to read dialog directory: {0}")]
    Walk(#[from] walkdir::Error),
    /// A dialog or settings file failed to parse.
    #[error("{}: {}", path.display(), source.pretty())]
    File {
        /// Offending file.
        path: PathBuf,
        /// Parse failure.
        source: dialog_config::Error,
    },
    /// Engine-level failure (not found, disabled, cycle, blocked).
    #[error("{}", .0.pretty())]
    Engine(#[from] dialog_engine::Error),
    /// Output rendering failed.
    #[error("Failed to render output: {0}")]
    Render(#[from] ron::Error),
    /// Validation found errors under `--strict`.
    #[error("validation failed: {0}")]
    Invalid(String),
}
