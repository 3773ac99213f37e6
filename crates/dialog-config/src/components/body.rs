//! Body element builder.

use crate::{BodyElement, BuildEnv, Document, Skip, Value};

/// Build a body element from its section.
pub fn build_body(sec: &Document, env: &BuildEnv) -> Result<BodyElement, Skip> {
    let Some(kind) = sec.get_opt::<String>("type") else {
        return Err(Skip::MissingField {
            element: "body",
            field: "type",
        });
    };
    match kind.to_lowercase().as_str() {
        "plain_message" => Ok(plain_message(sec, env)),
        "item" => item(sec, env),
        other => Err(Skip::UnsupportedType {
            element: "body",
            kind: other.to_string(),
        }),
    }
}

/// `message` wins over the older `text` key.
fn plain_message(sec: &Document, env: &BuildEnv) -> BodyElement {
    let text = sec
        .get_opt::<String>("message")
        .or_else(|| sec.get_opt("text"))
        .unwrap_or_default();
    BodyElement::PlainMessage {
        formatted_text: env.fmt(&text),
        width: sec.get("width", 300u32),
    }
}

/// Item body; the material must resolve through the host catalog.
fn item(sec: &Document, env: &BuildEnv) -> Result<BodyElement, Skip> {
    let name = sec.get_str("material", "STONE");
    let material = env
        .materials
        .resolve(&name)
        .ok_or(Skip::UnknownMaterial(name))?;
    let non_blank = |key: &str| {
        sec.get_opt::<String>(key)
            .filter(|s| !s.trim().is_empty())
            .map(|s| env.fmt(&s))
    };
    let lore = sec
        .get_value("lore")
        .and_then(Value::as_list)
        .map(|lines| {
            lines
                .iter()
                .filter_map(Value::as_str)
                .map(|l| env.fmt(l))
                .collect()
        })
        .unwrap_or_default();
    Ok(BodyElement::Item {
        material,
        amount: sec.get("amount", 1u32),
        display_name: non_blank("display_name"),
        lore,
        width: sec.get("width", 300u32),
        height: sec.get("height", 300u32),
        show_tooltip: sec.get("show_tooltip", true),
        show_decorations: sec.get("show_stack_count", true),
        description: non_blank("description"),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::MaterialList;

    fn sec(json: &str) -> Document {
        Document::from_json_str(json).unwrap()
    }

    #[test]
    fn plain_message_prefers_message_over_text() {
        let env = BuildEnv::default();
        let b = build_body(
            &sec(r#"{"type": "PLAIN_MESSAGE", "message": "hi", "text": "old"}"#),
            &env,
        )
        .unwrap();
        assert_eq!(
            b,
            BodyElement::PlainMessage {
                formatted_text: "hi".into(),
                width: 300
            }
        );
        let b = build_body(&sec(r#"{"type": "plain_message", "text": "old"}"#), &env).unwrap();
        assert!(matches!(b, BodyElement::PlainMessage { formatted_text, .. } if formatted_text == "old"));
    }

    #[test]
    fn item_defaults() {
        let b = build_body(&sec(r#"{"type": "item"}"#), &BuildEnv::default()).unwrap();
        match b {
            BodyElement::Item {
                material,
                amount,
                display_name,
                lore,
                width,
                height,
                show_tooltip,
                show_decorations,
                description,
            } => {
                assert_eq!(material, "STONE");
                assert_eq!(amount, 1);
                assert_eq!((width, height), (300, 300));
                assert!(show_tooltip && show_decorations);
                assert!(display_name.is_none() && description.is_none());
                assert!(lore.is_empty());
            }
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn item_reads_lore_strings_only() {
        let b = build_body(
            &sec(r#"{"type": "item", "material": "diamond", "lore": ["a", 1, "b"], "display_name": "  "}"#),
            &BuildEnv::default(),
        )
        .unwrap();
        let BodyElement::Item {
            material,
            lore,
            display_name,
            ..
        } = b
        else {
            panic!("expected item");
        };
        assert_eq!(material, "DIAMOND");
        assert_eq!(lore, ["a", "b"]);
        assert_eq!(display_name, None);
    }

    #[test]
    fn skips_are_descriptive() {
        let env = BuildEnv {
            materials: Arc::new(MaterialList(vec!["STONE".into()])),
            ..BuildEnv::default()
        };
        assert_eq!(
            build_body(&sec(r#"{"text": "x"}"#), &env),
            Err(Skip::MissingField {
                element: "body",
                field: "type"
            })
        );
        assert_eq!(
            build_body(&sec(r#"{"type": "video"}"#), &env),
            Err(Skip::UnsupportedType {
                element: "body",
                kind: "video".into()
            })
        );
        assert_eq!(
            build_body(&sec(r#"{"type": "item", "material": "unobtainium"}"#), &env),
            Err(Skip::UnknownMaterial("unobtainium".into()))
        );
    }
}
