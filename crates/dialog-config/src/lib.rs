//! Dialog configuration: documents, component builders, validation and compilation.
//!
//! Loosely structured documents (nested maps and lists, however they were
//! loaded) are compiled by [`DialogCompiler`] into immutable
//! [`DialogDefinition`]s. [`Validator`] inspects the same documents
//! independently and reports [`ValidationIssue`]s.
//!
//! ```text
//! Document ──► DialogCompiler ──► DialogDefinition
//!                 │  ├─ components (body, input, button)
//!                 │  ├─ KindRegistry (confirmation, notice, multi_action, ...)
//!                 │  └─ compile_action (show_dialog recurses with a cycle guard)
//! Document ──► Validator ──► ValidationReport
//! ```

mod action;
mod catalog;
mod compile;
pub mod components;
mod document;
mod error;
mod format;
mod kinds;
mod loader;
mod model;
mod validate;
mod value;

#[cfg(test)]
mod test_compile;
#[cfg(test)]
mod test_validate;

pub use action::compile_action;
pub use catalog::{DEFAULT_OPEN_PERMISSION, DEFAULT_REMOTE_PERMISSION, DialogCatalog};
pub use compile::{CompileCx, DEFAULT_KIND, DEFAULT_TITLE, DialogCompiler};
pub use components::{ButtonDefaults, Skip};
pub use document::{Document, FromValue, ListEntry};
pub use error::{CompileError, Error, excerpt_at};
pub use format::{AnyMaterial, BuildEnv, MaterialCatalog, MaterialList, PlainText, TextFormatter};
pub use kinds::{
    ACKNOWLEDGE, ACTION, CANCEL, CONFIRM, Confirmation, DialogKind, KindRegistry, MultiAction,
    Notice,
};
pub use loader::{from_json_str, from_ron_str};
pub use model::{
    ActionButton, ActionSpec, BodyElement, CommandScope, DialogDefinition, DialogTypeSpec,
    InputKind, InputSpec, Multiline, OptionEntry,
};
pub use validate::{
    Severity, ValidationIssue, ValidationPolicy, ValidationReport, Validator,
};
pub use value::Value;
