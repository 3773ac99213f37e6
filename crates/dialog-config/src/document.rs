//! Dotted-path access over a nested configuration map.

use indexmap::IndexMap;
use serde::Serialize;

use crate::{Error, loader, value::Value};

/// Conversion from a raw [`Value`] used by [`Document::get`].
///
/// Returning `None` makes the getter fall back to its default.
pub trait FromValue: Sized {
    /// Convert `v`, or return `None` when the value has the wrong shape.
    fn from_value(v: &Value) -> Option<Self>;
}

impl FromValue for String {
    fn from_value(v: &Value) -> Option<Self> {
        v.to_text()
    }
}

impl FromValue for bool {
    fn from_value(v: &Value) -> Option<Self> {
        v.as_bool()
    }
}

impl FromValue for i64 {
    fn from_value(v: &Value) -> Option<Self> {
        v.as_i64()
    }
}

impl FromValue for i32 {
    fn from_value(v: &Value) -> Option<Self> {
        v.as_i64()
            .map(|i| i.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as Self)
    }
}

impl FromValue for u32 {
    fn from_value(v: &Value) -> Option<Self> {
        v.as_i64().map(|i| i.clamp(0, i64::from(Self::MAX)) as Self)
    }
}

impl FromValue for f64 {
    fn from_value(v: &Value) -> Option<Self> {
        v.as_f64()
    }
}

impl FromValue for f32 {
    fn from_value(v: &Value) -> Option<Self> {
        v.as_f64().map(|f| f as Self)
    }
}

impl FromValue for Value {
    fn from_value(v: &Value) -> Option<Self> {
        Some(v.clone())
    }
}

/// One element of a list read through [`Document::get_list`].
#[derive(Debug, Clone, PartialEq)]
pub enum ListEntry {
    /// A nested map, exposed as its own document.
    Section(Document),
    /// Any non-map element.
    Scalar(Value),
}

impl ListEntry {
    /// The section, if this entry is one.
    pub fn as_section(&self) -> Option<&Document> {
        match self {
            Self::Section(d) => Some(d),
            Self::Scalar(_) => None,
        }
    }
}

/// A configuration section addressed by dotted paths such as `buttons.confirm.text`.
///
/// Absent keys and shape mismatches never fail; getters return the caller's default.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Document {
    /// Top-level entries in authoring order.
    entries: IndexMap<String, Value>,
}

impl Document {
    /// An empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing map.
    pub fn from_map(entries: IndexMap<String, Value>) -> Self {
        Self { entries }
    }

    /// Wrap `v` if it is a map.
    pub fn from_value(v: Value) -> Option<Self> {
        match v {
            Value::Map(entries) => Some(Self { entries }),
            _ => None,
        }
    }

    /// Parse a RON source. See [`loader::from_ron_str`].
    pub fn from_ron_str(source: &str) -> Result<Self, Error> {
        loader::from_ron_str(source)
    }

    /// Parse a JSON source. See [`loader::from_json_str`].
    pub fn from_json_str(source: &str) -> Result<Self, Error> {
        loader::from_json_str(source)
    }

    /// Convert back into a raw map value.
    pub fn into_value(self) -> Value {
        Value::Map(self.entries)
    }

    /// Look up a top-level key without splitting on dots.
    pub fn entry(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Look up the raw value at `path`.
    pub fn get_value(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let first = parts.next()?;
        let mut cur = self.entries.get(first)?;
        for part in parts {
            cur = cur.as_map()?.get(part)?;
        }
        Some(cur)
    }

    /// Read `path` as `T`, returning `default` when absent or of the wrong shape.
    pub fn get<T: FromValue>(&self, path: &str, default: T) -> T {
        self.get_opt(path).unwrap_or(default)
    }

    /// Read `path` as `T`, if present and convertible.
    pub fn get_opt<T: FromValue>(&self, path: &str) -> Option<T> {
        self.get_value(path).and_then(T::from_value)
    }

    /// Read a string, treating a missing key as `default`.
    pub fn get_str(&self, path: &str, default: &str) -> String {
        self.get_opt(path).unwrap_or_else(|| default.to_string())
    }

    /// Read the list at `path`; absent or non-list values yield an empty list.
    pub fn get_list(&self, path: &str) -> Vec<ListEntry> {
        let Some(items) = self.get_value(path).and_then(Value::as_list) else {
            return Vec::new();
        };
        items
            .iter()
            .map(|item| match item {
                Value::Map(m) => ListEntry::Section(Self::from_map(m.clone())),
                other => ListEntry::Scalar(other.clone()),
            })
            .collect()
    }

    /// Read a list of strings, stringifying scalar entries and skipping the rest.
    pub fn get_string_list(&self, path: &str) -> Vec<String> {
        self.get_value(path)
            .and_then(Value::as_list)
            .map(|items| items.iter().filter_map(Value::to_text).collect())
            .unwrap_or_default()
    }

    /// The nested section at `path`, if that value is a map.
    pub fn get_section(&self, path: &str) -> Option<Self> {
        self.get_value(path)
            .and_then(Value::as_map)
            .map(|m| Self::from_map(m.clone()))
    }

    /// True when any value exists at `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.get_value(path).is_some()
    }

    /// True when the value at `path` is a list.
    pub fn is_list(&self, path: &str) -> bool {
        matches!(self.get_value(path), Some(Value::List(_)))
    }

    /// True when the value at `path` is a map.
    pub fn is_section(&self, path: &str) -> bool {
        matches!(self.get_value(path), Some(Value::Map(_)))
    }

    /// Top-level keys in authoring order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no top-level entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Set a top-level key, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }
}
