#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use crate::*;

    fn catalog(entries: &[(&str, &str)]) -> Arc<DialogCatalog> {
        let mut c = DialogCatalog::new();
        for (id, ron) in entries {
            c.insert_ron(*id, ron).unwrap();
        }
        Arc::new(c)
    }

    fn compile(entries: &[(&str, &str)], id: &str) -> Result<DialogDefinition, CompileError> {
        DialogCompiler::with_defaults(catalog(entries)).compile(id)
    }

    #[test]
    fn confirmation_buttons_default_to_return() {
        let d = compile(
            &[(
                "ask",
                r#"{
                    "type": "confirmation",
                    "buttons": {"confirm": {"text": "Yes"}, "cancel": {"text": "No"}},
                }"#,
            )],
            "ask",
        )
        .unwrap();
        match d.kind {
            DialogTypeSpec::Confirmation { confirm, cancel } => {
                assert_eq!(confirm.text, "Yes");
                assert_eq!(cancel.text, "No");
                for b in [&confirm, &cancel] {
                    assert_eq!(b.width, 100);
                    assert_eq!(b.action, Some(ActionSpec::Return));
                }
                assert_eq!(confirm.description, "Click to confirm.");
            }
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn dialog_level_defaults() {
        let d = compile(&[("empty", "{}")], "empty").unwrap();
        assert_eq!(d.id, "empty");
        assert_eq!(d.title, DEFAULT_TITLE);
        assert_eq!(d.external_title, DEFAULT_TITLE);
        assert!(d.can_close_with_escape);
        assert!(d.body.is_empty() && d.inputs.is_empty());
        match d.kind {
            DialogTypeSpec::Notice { exit } => {
                assert_eq!(exit.text, "OK");
                assert_eq!(exit.action, None);
            }
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn unknown_type_falls_back_to_confirmation() {
        let (_guard, logs) = logging::capture::scoped();
        let d = compile(&[("x", r#"{"type": "Carousel"}"#)], "x").unwrap();
        assert!(logs.contains("WARN", "unsupported dialog type"));
        assert!(logs.contains("WARN", "carousel"));
        assert_eq!(d.kind.type_name(), "confirmation");
        let buttons = d.kind.buttons();
        assert_eq!(buttons[0].text, "Confirm");
        assert_eq!(buttons[1].text, "Cancel");
    }

    #[test]
    fn unbuildable_elements_are_omitted() {
        let (_guard, logs) = logging::capture::scoped();
        let d = compile(
            &[(
                "form",
                r#"{
                    "inputs": [
                        {"id": "name"},
                        {"type": "text"},
                        {"id": "n", "type": "number_range", "min": 10, "max": 5},
                        {"id": "name", "type": "boolean"},
                        "scalar",
                        {"id": "age", "type": "number_range", "min": 0, "max": 99},
                    ],
                    "bodies": [
                        {"type": "plain_message", "message": "hello"},
                        {"message": "no type"},
                        {"type": "item", "material": "bad material"},
                    ],
                }"#,
            )],
            "form",
        )
        .unwrap();
        let ids: Vec<&str> = d.inputs.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["name", "age"]);
        assert!(logs.count("WARN") >= 6);
        assert_eq!(d.body.len(), 1);
    }

    #[test]
    fn show_dialog_embeds_target() {
        let d = compile(
            &[
                (
                    "menu",
                    r#"{"exit_button": {"action": {"type": "show_dialog", "id": "shop"}}}"#,
                ),
                ("shop", r#"{"title": "Shop"}"#),
            ],
            "menu",
        )
        .unwrap();
        let DialogTypeSpec::Notice { exit } = d.kind else {
            panic!("expected notice");
        };
        match exit.action {
            Some(ActionSpec::ShowDialog {
                target_dialog_id,
                dialog,
            }) => {
                assert_eq!(target_dialog_id, "shop");
                assert_eq!(dialog.title, "Shop");
            }
            other => panic!("{:?}", other),
        }
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let err = compile(
            &[(
                "loop",
                r#"{
                    "type": "confirmation",
                    "buttons": {"confirm": {"action": {"type": "show_dialog", "id": "loop"}}},
                }"#,
            )],
            "loop",
        )
        .unwrap_err();
        assert_eq!(
            err,
            CompileError::Cycle {
                chain: vec!["loop".into(), "loop".into()]
            }
        );
    }

    #[test]
    fn indirect_cycle_reports_chain() {
        let entries = [
            (
                "a",
                r#"{"exit_button": {"action": {"type": "show_dialog", "id": "b"}}}"#,
            ),
            (
                "b",
                r#"{"exit_button": {"action": {"type": "show_dialog", "id": "a"}}}"#,
            ),
        ];
        assert_eq!(
            compile(&entries, "a").unwrap_err(),
            CompileError::Cycle {
                chain: vec!["a".into(), "b".into(), "a".into()]
            }
        );
        // deterministic across calls
        assert_eq!(compile(&entries, "a"), compile(&entries, "a"));
    }

    #[test]
    fn shared_targets_are_not_cycles() {
        let d = compile(
            &[
                (
                    "root",
                    r#"{
                        "type": "confirmation",
                        "buttons": {
                            "confirm": {"action": {"type": "show_dialog", "id": "leaf"}},
                            "cancel": {"action": {"type": "show_dialog", "id": "leaf"}},
                        },
                    }"#,
                ),
                ("leaf", r#"{"title": "Leaf"}"#),
            ],
            "root",
        )
        .unwrap();
        for b in d.kind.buttons() {
            assert!(matches!(b.action, Some(ActionSpec::ShowDialog { .. })));
        }
    }

    #[test]
    fn actions_with_missing_payload_become_none() {
        let d = compile(
            &[(
                "acts",
                r#"{
                    "type": "multi_action",
                    "buttons": [
                        {"text": "a", "action": {"type": "open_url"}},
                        {"text": "b", "action": {"type": "copy_to_clipboard", "text": "  "}},
                        {"text": "c", "action": {"type": "show_dialog", "id": "nowhere"}},
                        {"text": "d", "action": {"type": "custom", "key": "Bad Key"}},
                        {"text": "e", "action": {"type": "teleport"}},
                        {"text": "f", "action": {"type": "null"}},
                    ],
                }"#,
            )],
            "acts",
        )
        .unwrap();
        let DialogTypeSpec::MultiAction { buttons, .. } = d.kind else {
            panic!("expected multi_action");
        };
        assert_eq!(buttons.len(), 6);
        assert!(buttons.iter().all(|b| b.action.is_none()));
    }

    #[test]
    fn action_payloads() {
        let d = compile(
            &[(
                "acts",
                r#"{
                    "type": "multi_action",
                    "columns": 3,
                    "buttons": {
                        "url": {"action": {"type": "OPEN_URL", "url": "https://example.org"}},
                        "run": {"action": {"type": "run_command", "command": "spawn <player>"}},
                        "console": {"action": {"type": "console_command", "command": "give <player> 1"}},
                        "suggest": {"action": {"type": "suggest_command", "command": "/msg "}},
                        "custom": {"action": {"type": "custom", "key": "Shop:Buy/Sword"}},
                        "close": {"action": "close"},
                    },
                    "exit_button": {"text": "Bye"},
                }"#,
            )],
            "acts",
        )
        .unwrap();
        let DialogTypeSpec::MultiAction {
            buttons,
            exit,
            columns,
        } = d.kind
        else {
            panic!("expected multi_action");
        };
        assert_eq!(columns, 3);
        let actions: Vec<ActionSpec> = buttons.into_iter().filter_map(|b| b.action).collect();
        assert_eq!(
            actions,
            vec![
                ActionSpec::OpenUrl {
                    url: "https://example.org".into()
                },
                ActionSpec::RunCommand {
                    template: "spawn <player>".into(),
                    scope: CommandScope::Player
                },
                ActionSpec::RunCommand {
                    template: "give <player> 1".into(),
                    scope: CommandScope::Console
                },
                ActionSpec::SuggestCommand {
                    template: "/msg ".into()
                },
                ActionSpec::Custom {
                    key: dialog_key::Key::parse("shop:buy/sword").unwrap()
                },
                ActionSpec::Close,
            ]
        );
        let exit = exit.unwrap();
        assert_eq!(exit.text, "Bye");
        assert_eq!(exit.action, Some(ActionSpec::Return));
    }

    #[test]
    fn multi_action_placeholders() {
        let d = compile(&[("m", r#"{"type": "multi_action"}"#)], "m").unwrap();
        let DialogTypeSpec::MultiAction {
            buttons,
            exit,
            columns,
        } = d.kind
        else {
            panic!("expected multi_action");
        };
        assert_eq!(buttons.len(), 3);
        assert_eq!(buttons[0].text, "These are");
        assert!(exit.is_none());
        assert_eq!(columns, 2);
    }

    #[test]
    fn not_found_disabled_and_legacy() {
        let entries = [
            ("off", r#"{"enabled": false}"#),
            ("old", r#"{"old": {"title": "Nested"}}"#),
        ];
        assert_eq!(
            compile(&entries, "ghost"),
            Err(CompileError::NotFound { id: "ghost".into() })
        );
        assert_eq!(
            compile(&entries, "off"),
            Err(CompileError::Disabled { id: "off".into() })
        );
        assert_eq!(compile(&entries, "old").unwrap().title, "Nested");
    }

    #[test]
    fn formatter_applies_to_text() {
        let env = BuildEnv {
            formatter: Arc::new(|s: &str| s.to_uppercase()),
            ..BuildEnv::default()
        };
        let compiler = DialogCompiler::new(
            catalog(&[(
                "f",
                r#"{"title": "hello", "inputs": [{"id": "n", "label": "name"}]}"#,
            )]),
            Arc::new(KindRegistry::with_builtins()),
            env,
        );
        let d = compiler.compile("f").unwrap();
        assert_eq!(d.title, "HELLO");
        assert_eq!(d.inputs[0].label, "NAME");
    }

    #[test]
    fn compiles_concurrently() {
        let compiler = DialogCompiler::with_defaults(catalog(&[
            ("a", r#"{"exit_button": {"action": {"type": "show_dialog", "id": "b"}}}"#),
            ("b", r#"{"title": "B"}"#),
        ]));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let c = compiler.clone();
                thread::spawn(move || c.compile("a"))
            })
            .collect();
        for h in handles {
            assert!(h.join().unwrap().is_ok());
        }
    }

    #[test]
    fn definitions_serialize_with_type_tags() {
        let d = compile(&[("s", r#"{"title": "T"}"#)], "s").unwrap();
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["kind"]["type"], "notice");
        assert_eq!(json["kind"]["exit"]["text"], "OK");
    }
}
