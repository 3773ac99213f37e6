//! The set of dialog documents known to a compiler.

use indexmap::IndexMap;

use crate::{Document, Error, Value};

/// Permission required to open a dialog for oneself, unless overridden.
pub const DEFAULT_OPEN_PERMISSION: &str = "dialogs.open.*";

/// Permission required to open a dialog for someone else, unless overridden.
pub const DEFAULT_REMOTE_PERMISSION: &str = "dialogs.remote.*";

/// Dialog documents keyed by id.
///
/// Ids may be hierarchical, e.g. `templates/confirmation`. A catalog is
/// immutable once shared; reloading builds a new one.
#[derive(Debug, Clone, Default)]
pub struct DialogCatalog {
    /// Documents in insertion order.
    dialogs: IndexMap<String, Document>,
}

impl DialogCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a dialog, returning the previous document.
    pub fn insert(&mut self, id: impl Into<String>, doc: Document) -> Option<Document> {
        self.dialogs.insert(id.into(), doc)
    }

    /// Parse a RON source and add it under `id`.
    pub fn insert_ron(&mut self, id: impl Into<String>, source: &str) -> Result<(), Error> {
        let doc = Document::from_ron_str(source)?;
        self.insert(id, doc);
        Ok(())
    }

    /// Parse a JSON source and add it under `id`.
    pub fn insert_json(&mut self, id: impl Into<String>, source: &str) -> Result<(), Error> {
        let doc = Document::from_json_str(source)?;
        self.insert(id, doc);
        Ok(())
    }

    /// Remove a dialog.
    pub fn remove(&mut self, id: &str) -> Option<Document> {
        self.dialogs.shift_remove(id)
    }

    /// The document as authored.
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.dialogs.get(id)
    }

    /// True when `id` is known.
    pub fn contains(&self, id: &str) -> bool {
        self.dialogs.contains_key(id)
    }

    /// Number of dialogs.
    pub fn len(&self) -> usize {
        self.dialogs.len()
    }

    /// True when no dialogs are loaded.
    pub fn is_empty(&self) -> bool {
        self.dialogs.is_empty()
    }

    /// All ids, sorted case-insensitively.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.dialogs.keys().map(String::as_str).collect();
        ids.sort_by_key(|id| id.to_lowercase());
        ids
    }

    /// Sorted ids starting with `prefix`, ignoring case.
    pub fn complete_ids(&self, prefix: &str) -> Vec<&str> {
        let prefix = prefix.to_lowercase();
        self.ids()
            .into_iter()
            .filter(|id| id.to_lowercase().starts_with(&prefix))
            .collect()
    }

    /// Iterate over `(id, document)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Document)> {
        self.dialogs.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// True when the document nests its content under its own id.
    pub fn is_legacy_layout(id: &str, doc: &Document) -> bool {
        matches!(doc.entry(id), Some(Value::Map(_)))
    }

    /// The effective root section of a dialog, unwrapping the legacy nested layout.
    pub fn root(&self, id: &str) -> Option<Document> {
        let doc = self.dialogs.get(id)?;
        Some(Self::unwrap_legacy(id, doc))
    }

    /// Unwrap `{<id>: {...}}` to its inner section; other documents are returned as is.
    pub fn unwrap_legacy(id: &str, doc: &Document) -> Document {
        match doc.entry(id) {
            Some(Value::Map(inner)) => Document::from_map(inner.clone()),
            _ => doc.clone(),
        }
    }

    /// Whether the dialog may be opened; unknown ids are not enabled.
    pub fn is_enabled(&self, id: &str) -> bool {
        self.root(id).is_some_and(|r| r.get("enabled", true))
    }

    /// Permission needed to open the dialog for oneself.
    pub fn permission_to_open(&self, id: &str) -> String {
        self.root(id)
            .map(|r| r.get_str("permission_to_open", DEFAULT_OPEN_PERMISSION))
            .unwrap_or_else(|| DEFAULT_OPEN_PERMISSION.to_string())
    }

    /// Permission needed to open the dialog for another player.
    pub fn permission_to_open_remote(&self, id: &str) -> String {
        self.root(id)
            .map(|r| r.get_str("permission_to_open_remote", DEFAULT_REMOTE_PERMISSION))
            .unwrap_or_else(|| DEFAULT_REMOTE_PERMISSION.to_string())
    }
}
