//! Action button builder.

use crate::{
    ActionButton, ActionSpec, CompileCx, CompileError, Document, Value, action::compile_action,
};

/// Fallback text and width for a button slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonDefaults {
    /// Label used when the section has no `text`.
    pub text: &'static str,
    /// Hover text used when the section has no `description`.
    pub description: &'static str,
    /// Width used when the section has no `width`.
    pub width: u32,
}

/// The `action` field as a section; a bare string is shorthand for `{type: <string>}`.
fn action_section(sec: &Document) -> Option<Document> {
    match sec.get_value("action") {
        Some(Value::Map(m)) => Some(Document::from_map(m.clone())),
        Some(Value::String(t)) => {
            let mut d = Document::new();
            d.set("type", t.as_str());
            Some(d)
        }
        _ => None,
    }
}

/// Build a button from an optional section.
///
/// With no section the defaults produce a button without an action. A section
/// without an `action` field returns to the previous screen.
pub fn build_button(
    sec: Option<&Document>,
    defaults: &ButtonDefaults,
    cx: &mut CompileCx<'_>,
) -> Result<ActionButton, CompileError> {
    let Some(sec) = sec else {
        return Ok(ActionButton {
            text: defaults.text.to_string(),
            description: defaults.description.to_string(),
            width: defaults.width,
            action: None,
        });
    };
    let action = match action_section(sec) {
        Some(a) => compile_action(&a, cx)?,
        None => Some(ActionSpec::Return),
    };
    let env = cx.env();
    Ok(ActionButton {
        text: env.fmt(&sec.get_str("text", defaults.text)),
        description: env.fmt(&sec.get_str("description", defaults.description)),
        width: sec.get("width", defaults.width),
        action,
    })
}
