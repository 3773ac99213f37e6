//! Load a directory of dialog files into a catalog.

use std::{
    fs,
    path::{Path, PathBuf},
    result::Result as StdResult,
};

use dialog_config::{DialogCatalog, Document, Error as ConfigError};
use dialog_engine::EngineSettings;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Text-to-document parser for one file format.
type Parser = fn(&str) -> StdResult<Document, ConfigError>;

/// Dialog file formats, by extension.
fn parser_for(path: &Path) -> Option<Parser> {
    match path.extension()?.to_str()? {
        "ron" => Some(Document::from_ron_str),
        "json" => Some(Document::from_json_str),
        _ => None,
    }
}

/// Catalog id for `path`: relative to `root`, without extension, `/`-separated.
pub fn dialog_id(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?.with_extension("");
    let parts: Vec<&str> = rel
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    (!parts.is_empty()).then(|| parts.join("/"))
}

/// Dialog files under `root`, sorted by path.
fn dialog_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if entry.file_type().is_file() && parser_for(entry.path()).is_some() {
            paths.push(entry.into_path());
        }
    }
    paths.sort();
    Ok(paths)
}

/// Read every `*.ron` and `*.json` file under `root`.
///
/// A later file with the same id (e.g. `a.ron` and `a.json`) replaces the earlier one.
pub fn load_dir(root: &Path) -> Result<DialogCatalog> {
    let mut catalog = DialogCatalog::new();
    for path in dialog_files(root)? {
        let (Some(parse), Some(id)) = (parser_for(&path), dialog_id(root, &path)) else {
            continue;
        };
        let source = fs::read_to_string(&path)?;
        let doc = parse(&source).map_err(|source| Error::File {
            path: path.clone(),
            source,
        })?;
        debug!(dialog = %id, path = %path.display(), "loaded dialog file");
        catalog.insert(id, doc);
    }
    info!(dialogs = catalog.len(), root = %root.display(), "loaded dialog directory");
    Ok(catalog)
}

/// Read engine settings, or defaults when no file is given.
pub fn load_settings(path: Option<&Path>) -> Result<EngineSettings> {
    let Some(path) = path else {
        return Ok(EngineSettings::default());
    };
    let source = fs::read_to_string(path)?;
    EngineSettings::from_ron_str(&source).map_err(|e| match e {
        dialog_engine::Error::Config(source) => Error::File {
            path: path.to_path_buf(),
            source,
        },
        other => other.into(),
    })
}
