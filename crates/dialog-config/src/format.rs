//! Seams to host-provided text formatting and item materials.

use std::{fmt, sync::Arc};

use once_cell::sync::Lazy;
use regex::Regex;

/// Turns authored markup (color codes, tags) into display text.
///
/// Hosts plug in their own formatter; the default leaves text unchanged.
pub trait TextFormatter: Send + Sync {
    /// Format `raw` for display.
    fn format(&self, raw: &str) -> String;
}

/// Identity formatter.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainText;

impl TextFormatter for PlainText {
    fn format(&self, raw: &str) -> String {
        raw.to_string()
    }
}

impl<F> TextFormatter for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn format(&self, raw: &str) -> String {
        self(raw)
    }
}

/// Looks up item materials by name.
pub trait MaterialCatalog: Send + Sync {
    /// Canonical name for `name`, or `None` when no such material exists.
    fn resolve(&self, name: &str) -> Option<String>;
}

/// Shape of a material identifier.
static MATERIAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9_]+$").expect("material pattern compiles"));

/// Accepts any well-formed material name, uppercased.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyMaterial;

impl MaterialCatalog for AnyMaterial {
    fn resolve(&self, name: &str) -> Option<String> {
        let upper = name.trim().to_uppercase();
        MATERIAL_RE.is_match(&upper).then_some(upper)
    }
}

/// A fixed material list.
#[derive(Debug, Clone, Default)]
pub struct MaterialList(pub Vec<String>);

impl MaterialCatalog for MaterialList {
    fn resolve(&self, name: &str) -> Option<String> {
        let upper = name.trim().to_uppercase();
        self.0.iter().find(|m| **m == upper).cloned()
    }
}

/// Host services consulted while building components.
#[derive(Clone)]
pub struct BuildEnv {
    /// Text formatter.
    pub formatter: Arc<dyn TextFormatter>,
    /// Material lookup.
    pub materials: Arc<dyn MaterialCatalog>,
}

impl BuildEnv {
    /// Shorthand for formatting through the configured formatter.
    pub fn fmt(&self, raw: &str) -> String {
        self.formatter.format(raw)
    }
}

impl Default for BuildEnv {
    fn default() -> Self {
        Self {
            formatter: Arc::new(PlainText),
            materials: Arc::new(AnyMaterial),
        }
    }
}

impl fmt::Debug for BuildEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildEnv").finish_non_exhaustive()
    }
}
