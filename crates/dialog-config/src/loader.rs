//! Text front-ends for [`Document`].
//!
//! File discovery and YAML are host concerns; hosts either hand over parsed
//! values or use one of the text loaders here.

use crate::{
    Document, Error,
    error::excerpt_at,
    value::Value,
};

/// Require a top-level map.
fn into_document(v: Value, format: &str) -> Result<Document, Error> {
    let kind = v.type_name();
    Document::from_value(v).ok_or_else(|| Error::Shape {
        message: format!("expected a map at the top level of the {format} source, found {kind}"),
    })
}

/// Parse a RON source into a document.
pub fn from_ron_str(source: &str) -> Result<Document, Error> {
    let v: Value = ron::from_str(source).map_err(|e| Error::from_ron(source, &e))?;
    into_document(v, "ron")
}

/// Parse a JSON source into a document.
pub fn from_json_str(source: &str) -> Result<Document, Error> {
    let v: Value = serde_json::from_str(source).map_err(|e| {
        let (line, col) = (e.line(), e.column());
        Error::Parse {
            format: "json",
            line: Some(line),
            col: Some(col),
            message: e.to_string(),
            excerpt: (line > 0).then(|| excerpt_at(source, line, col)),
        }
    })?;
    into_document(v, "json")
}
