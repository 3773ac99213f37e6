//! Read-only access to values submitted with a custom action.

use serde_json::{Map, Value};

/// Typed reads over a submitted payload.
///
/// Absent keys and values of the wrong shape read as `None`.
pub trait PayloadView: Send + Sync {
    /// Text value; numbers and booleans are rendered as text.
    fn get_text(&self, key: &str) -> Option<String>;
    /// Integer value; floats truncate toward zero.
    fn get_int(&self, key: &str) -> Option<i64>;
    /// Floating point value.
    fn get_float(&self, key: &str) -> Option<f64>;
    /// Boolean value; only real booleans qualify.
    fn get_bool(&self, key: &str) -> Option<bool>;
    /// True when the key is present.
    fn has(&self, key: &str) -> bool;
}

/// A payload backed by a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    /// Submitted values keyed by input id.
    values: Map<String, Value>,
}

impl Payload {
    /// An empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value; anything but an object yields an empty payload.
    pub fn from_json(v: Value) -> Self {
        match v {
            Value::Object(values) => Self { values },
            _ => Self::default(),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Raw value access.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Keys present in the payload.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

impl PayloadView for Payload {
    fn get_text(&self, key: &str) -> Option<String> {
        match self.values.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        let v = self.values.get(key)?;
        v.as_i64().or_else(|| {
            v.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        })
    }

    fn get_float(&self, key: &str) -> Option<f64> {
        self.values.get(key)?.as_f64()
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.get(key)?.as_bool()
    }

    fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}
