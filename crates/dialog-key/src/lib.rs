//! Namespaced identifiers for custom dialog actions.
//!
//! A [`Key`] pairs a namespace with a value, e.g. `shop:buy/sword`. Both parts
//! are trimmed and lowercased on construction and must match a restricted
//! character set, so any `Key` you can hold is already canonical.

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as DeError};
use thiserror::Error;

/// Allowed characters for the namespace part.
static NAMESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9._-]+$").expect("namespace pattern compiles"));

/// Allowed characters for the value part.
static VALUE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9._/-]+$").expect("value pattern compiles"));

/// Errors raised when constructing or parsing a [`Key`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// Namespace is empty or contains characters outside `[a-z0-9._-]`.
    #[error("invalid key namespace '{0}': expected [a-z0-9._-]+")]
    Namespace(String),
    /// Value is empty or contains characters outside `[a-z0-9._/-]`.
    #[error("invalid key value '{0}': expected [a-z0-9._/-]+")]
    Value(String),
    /// String form lacks a separating colon, or the colon is first or last.
    #[error("malformed key '{0}': expected namespace:value")]
    Malformed(String),
}

/// A validated `namespace:value` identifier.
#[derive(Clone)]
pub struct Key {
    /// Lowercased namespace.
    namespace: String,
    /// Lowercased value.
    value: String,
    /// Cached `namespace:value` form.
    canonical: String,
}

impl Key {
    /// Build a key from its two parts.
    ///
    /// Both parts are trimmed and lowercased before validation.
    pub fn new(namespace: &str, value: &str) -> Result<Self, KeyError> {
        let namespace = namespace.trim().to_lowercase();
        let value = value.trim().to_lowercase();
        if !NAMESPACE_RE.is_match(&namespace) {
            return Err(KeyError::Namespace(namespace));
        }
        if !VALUE_RE.is_match(&value) {
            return Err(KeyError::Value(value));
        }
        let canonical = format!("{namespace}:{value}");
        Ok(Self {
            namespace,
            value,
            canonical,
        })
    }

    /// Parse the `namespace:value` string form.
    ///
    /// The split happens at the first colon; a colon at either end is rejected.
    pub fn parse(s: &str) -> Result<Self, KeyError> {
        let trimmed = s.trim();
        match trimmed.find(':') {
            Some(idx) if idx > 0 && idx + 1 < trimmed.len() => {
                Self::new(&trimmed[..idx], &trimmed[idx + 1..])
            }
            _ => Err(KeyError::Malformed(s.to_string())),
        }
    }

    /// The namespace part.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The value part.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The canonical `namespace:value` string.
    pub fn as_str(&self) -> &str {
        &self.canonical
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.namespace == other.namespace && self.value == other.value
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.namespace.hash(state);
        self.value.hash(state);
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self.canonical)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl FromStr for Key {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical)
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(DeError::custom)
    }
}
