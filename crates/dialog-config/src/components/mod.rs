//! Builders turning one configuration section into one typed component.
//!
//! Body and input builders are pure. They return [`Skip`] when a section cannot
//! be built; the compiler logs it and omits the element.

mod body;
mod button;
mod input;

use thiserror::Error;

pub use body::build_body;
pub use button::{ButtonDefaults, build_button};
pub use input::{build_input, build_label};

/// Why a single component was left out of a compiled dialog.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Skip {
    /// A required field is absent or blank.
    #[error("{element} is missing required '{field}' field")]
    MissingField {
        /// Component kind, e.g. `input`.
        element: &'static str,
        /// Missing field name.
        field: &'static str,
    },
    /// The `type` field names nothing this builder knows.
    #[error("unsupported {element} type '{kind}'")]
    UnsupportedType {
        /// Component kind.
        element: &'static str,
        /// Offending type name.
        kind: String,
    },
    /// An item body names a material the host does not know.
    #[error("invalid material '{0}'")]
    UnknownMaterial(String),
    /// A number range whose `min` is not below its `max`, NaN included.
    #[error("number_range '{id}' has min {min} not below max {max}")]
    InvalidRange {
        /// Input id.
        id: String,
        /// Configured lower bound.
        min: f64,
        /// Configured upper bound.
        max: f64,
    },
    /// A numeric field is NaN or infinite.
    #[error("number_range '{id}' has non-finite {field}")]
    NonFinite {
        /// Input id.
        id: String,
        /// Offending field name.
        field: &'static str,
    },
    /// A second input reuses an id.
    #[error("duplicate input id '{0}'")]
    DuplicateId(String),
    /// A list entry is a scalar where a map was expected.
    #[error("{element} entry is not a map")]
    NotAMap {
        /// Component kind.
        element: &'static str,
    },
}
