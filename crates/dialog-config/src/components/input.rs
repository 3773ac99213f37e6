//! Input field builder.

use std::cmp::Ordering;

use tracing::debug;

use crate::{
    BuildEnv, Document, InputKind, InputSpec, ListEntry, Multiline, OptionEntry, Skip, Value,
};

/// Resolve the label of an input.
///
/// A string label is formatted; a map label uses its `text` field. Anything
/// else, or a blank result, falls back to the input id.
pub fn build_label(sec: &Document, id: &str, env: &BuildEnv) -> String {
    let raw = match sec.get_value("label") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Map(_)) => sec.get_str("label.text", ""),
        _ => String::new(),
    };
    if raw.trim().is_empty() {
        id.to_string()
    } else {
        env.fmt(&raw)
    }
}

/// Build an input from its section.
pub fn build_input(sec: &Document, env: &BuildEnv) -> Result<InputSpec, Skip> {
    let id = sec
        .get_opt::<String>("id")
        .filter(|s| !s.trim().is_empty())
        .ok_or(Skip::MissingField {
            element: "input",
            field: "id",
        })?;
    let label = build_label(sec, &id, env);
    let kind = match sec.get_str("type", "text").to_lowercase().as_str() {
        "boolean" => boolean(sec, &id),
        "number_range" => number_range(sec, &id)?,
        "text" => text(sec),
        "single_option" => single_option(sec, env)?,
        other => {
            return Err(Skip::UnsupportedType {
                element: "input",
                kind: other.to_string(),
            });
        }
    };
    Ok(InputSpec { id, label, kind })
}

/// Only string values are accepted for `on_true` / `on_false`.
fn string_only(sec: &Document, key: &str, id: &str) -> Option<String> {
    match sec.get_value(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            debug!(input = id, key, found = other.type_name(), "ignoring non-string value");
            None
        }
        None => None,
    }
}

/// Checkbox input.
fn boolean(sec: &Document, id: &str) -> InputKind {
    InputKind::Boolean {
        initial: sec.get("initial", false),
        on_true: string_only(sec, "on_true", id),
        on_false: string_only(sec, "on_false", id),
    }
}

/// Slider input; rejects empty, inverted or non-finite ranges.
fn number_range(sec: &Document, id: &str) -> Result<InputKind, Skip> {
    let min = sec.get("min", 0.0f64);
    let max = sec.get("max", 100.0f64);
    // NaN bounds compare as None
    if min.partial_cmp(&max) != Some(Ordering::Less) {
        return Err(Skip::InvalidRange {
            id: id.to_string(),
            min,
            max,
        });
    }
    let step = sec.get("step", 1.0f64);
    let initial = sec.get("initial", min);
    let fields = [("min", min), ("max", max), ("step", step), ("initial", initial)];
    if let Some((field, _)) = fields.into_iter().find(|(_, v)| !v.is_finite()) {
        return Err(Skip::NonFinite {
            id: id.to_string(),
            field,
        });
    }
    Ok(InputKind::NumberRange {
        min,
        max,
        step,
        initial,
        width: sec.get("width", 300u32),
        label_format: sec
            .get_opt::<String>("label_format")
            .filter(|s| !s.trim().is_empty()),
    })
}

/// Text input; `multiline` applies only when given as a map.
fn text(sec: &Document) -> InputKind {
    let multiline = sec.get_section("multiline").map(|m| Multiline {
        max_lines: m.get("max_lines", 1u32),
        max_columns: m.get("max_columns", 50u32),
    });
    InputKind::Text {
        initial: sec.get_str("initial", ""),
        width: sec.get("width", 300u32),
        max_length: sec.get("max_length", 0u32),
        label_visible: sec.get("label_visible", true),
        multiline,
    }
}

/// Option list input.
///
/// Entries are plain strings, or maps with `id`, optional `display` and `initial`.
fn single_option(sec: &Document, env: &BuildEnv) -> Result<InputKind, Skip> {
    let options: Vec<OptionEntry> = sec
        .get_list("entries")
        .into_iter()
        .filter_map(|entry| match entry {
            ListEntry::Scalar(Value::String(s)) => Some(OptionEntry {
                display_text: env.fmt(&s),
                value: s,
                initially_selected: false,
            }),
            ListEntry::Section(m) => {
                let value = m.get_opt::<String>("id").filter(|s| !s.trim().is_empty())?;
                let display = m.get_str("display", &value);
                Some(OptionEntry {
                    display_text: env.fmt(&display),
                    initially_selected: m.get("initial", false),
                    value,
                })
            }
            ListEntry::Scalar(_) => None,
        })
        .collect();
    if options.is_empty() {
        return Err(Skip::MissingField {
            element: "single_option",
            field: "entries",
        });
    }
    Ok(InputKind::SingleOption {
        width: sec.get("width", 300u32),
        label_visible: sec.get("label_visible", true),
        options,
    })
}
