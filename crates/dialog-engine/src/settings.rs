//! Engine-wide settings.

use dialog_config::{Error as ConfigError, ValidationPolicy};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Version string reported to addons when settings do not override it.
pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Settings for a [`crate::DialogEngine`].
///
/// Every field has a default, so an empty RON map `()` is a valid settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct EngineSettings {
    /// Whether validation errors stop a dialog from opening.
    pub validation: ValidationPolicy,
    /// API version handed to addons.
    pub api_version: String,
    /// Dialog opened when no id is given.
    pub default_dialog: Option<String>,
    /// Validate the whole catalog on every reload.
    pub validate_on_reload: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            validation: ValidationPolicy::Advisory,
            api_version: API_VERSION.to_string(),
            default_dialog: None,
            validate_on_reload: true,
        }
    }
}

impl EngineSettings {
    /// Parse settings from RON text.
    pub fn from_ron_str(source: &str) -> Result<Self> {
        ron::from_str(source).map_err(|e| ConfigError::from_ron(source, &e).into())
    }
}
