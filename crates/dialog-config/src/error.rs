//! Error types for loading and compiling dialog documents.

use std::{
    cmp::{max, min},
    fmt::Write as _,
};

use ron::error::SpannedError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors produced while turning source text into a [`crate::Document`].
pub enum Error {
    #[error("{message}")]
    /// The source text could not be parsed.
    Parse {
        /// Source format name (`ron`, `json`).
        format: &'static str,
        /// Optional 1-based line number.
        line: Option<usize>,
        /// Optional 1-based column number.
        col: Option<usize>,
        /// Human-readable error message.
        message: String,
        /// Optional excerpt including a caret at the error location.
        excerpt: Option<String>,
    },
    #[error("{message}")]
    /// The source parsed, but its top level is not a map.
    Shape {
        /// Human-readable error message.
        message: String,
    },
}

impl Error {
    /// Map a RON parse failure, keeping its position and an excerpt of `source`.
    pub fn from_ron(source: &str, e: &SpannedError) -> Self {
        let (line, col) = (e.span.start.line, e.span.start.col);
        let located = line > 0 && col > 0;
        Self::Parse {
            format: "ron",
            line: located.then_some(line),
            col: located.then_some(col),
            message: e.code.to_string(),
            excerpt: located.then(|| excerpt_at(source, line, col)),
        }
    }

    /// Render a human-friendly error message including location and an excerpt when available.
    pub fn pretty(&self) -> String {
        match self {
            Self::Parse {
                format,
                line,
                col,
                message,
                excerpt,
            } => match (line, col, excerpt) {
                (Some(l), Some(c), Some(ex)) => format!(
                    "Dialog {} parse error at line {}, column {}\n{}\n{}",
                    format, l, c, message, ex
                ),
                (Some(l), Some(c), None) => format!(
                    "Dialog {} parse error at line {}, column {}\n{}",
                    format, l, c, message
                ),
                _ => format!("Dialog {} parse error\n{}", format, message),
            },
            Self::Shape { message } => format!("Dialog document error\n{}", message),
        }
    }
}

/// Build a small 2-3 line excerpt with a caret at `(line_no, col_no)`.
pub fn excerpt_at(source: &str, line_no: usize, col_no: usize) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let total = lines.len();
    let start = max(1usize, line_no.saturating_sub(2));
    let end = min(total, line_no + 1);

    let mut out = String::new();
    for n in start..=end {
        let text = lines.get(n - 1).copied().unwrap_or("");
        let _ignored = writeln!(out, " {:>4} | {}", n, text);
        if n == line_no {
            let prefix = format!(" {:>4} | ", n);
            let _ignored = writeln!(
                out,
                "{}{}^",
                " ".repeat(prefix.len()),
                " ".repeat(col_no.saturating_sub(1))
            );
        }
    }
    out
}

/// Reasons a dialog could not be compiled at all.
///
/// Element-level problems are not errors: they are logged and the element is omitted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// No dialog with this id exists in the catalog.
    #[error("dialog '{id}' not found")]
    NotFound {
        /// Requested id.
        id: String,
    },
    /// The dialog exists but has `enabled: false`.
    #[error("dialog '{id}' is disabled")]
    Disabled {
        /// Requested id.
        id: String,
    },
    /// A `show_dialog` chain leads back to a dialog already being compiled.
    #[error("show_dialog cycle: {}", chain.join(" -> "))]
    Cycle {
        /// Ids along the cycle, starting and ending with the repeated id.
        chain: Vec<String>,
    },
}

impl CompileError {
    /// Render the error with a hint on how to resolve it.
    pub fn pretty(&self) -> String {
        match self {
            Self::NotFound { id } => {
                format!("Dialog '{}' not found\nCheck the id against the loaded dialogs", id)
            }
            Self::Disabled { id } => {
                format!("Dialog '{}' is disabled\nSet `enabled: true` to allow opening it", id)
            }
            Self::Cycle { chain } => format!(
                "Dialog cycle detected\n{}\nA show_dialog action must not lead back to a dialog on the path",
                chain.join(" -> ")
            ),
        }
    }
}
