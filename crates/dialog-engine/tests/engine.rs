//! End-to-end behavior of the engine context.

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
};

use dialog_actions::{ActionContext, HandlerResult, Payload, PayloadView, PlayerRef, ReplySink};
use dialog_config::{ActionSpec, CommandScope, CompileError, DialogCatalog, ValidationPolicy};
use dialog_engine::{
    CommandRunner, CommandSink, DialogEngine, EngineSettings, Error, Performed, Placeholders,
    Viewer,
};
use dialog_key::Key;
use parking_lot::Mutex;
use uuid::Uuid;

fn catalog() -> DialogCatalog {
    let mut c = DialogCatalog::new();
    c.insert_ron(
        "shop/main",
        r#"{
            "title": "&6Shop",
            "type": "multi_action",
            "inputs": [{"id": "qty", "type": "number_range", "min": 1, "max": 64}],
            "buttons": {
                "buy": {"text": "Buy", "action": {"type": "custom", "key": "shop:buy"}},
                "pay": {"text": "Pay", "action": {"type": "console_command", "command": "eco take <player> 5"}},
                "info": {"text": "Info", "action": {"type": "show_dialog", "id": "shop/info"}},
            },
        }"#,
    )
    .unwrap();
    c.insert_ron("shop/info", r#"{"title": "About", "type": "notice"}"#)
        .unwrap();
    c.insert_ron(
        "broken",
        r#"{"title": "x", "inputs": [{"id": "n", "type": "number_range", "min": 5, "max": 1}]}"#,
    )
    .unwrap();
    c.insert_ron("hidden", r#"{"title": "x", "enabled": false}"#)
        .unwrap();
    c
}

fn viewer() -> Viewer {
    Viewer {
        player: PlayerRef::named(Uuid::nil(), "Alex"),
        world: "world".into(),
        x: 0.5,
        y: 70.0,
        z: 0.5,
        gamemode: "CREATIVE".into(),
    }
}

fn buttons(engine: &DialogEngine, id: &str) -> Vec<ActionSpec> {
    engine
        .open(id)
        .unwrap()
        .kind
        .buttons()
        .into_iter()
        .filter_map(|b| b.action.clone())
        .collect()
}

#[test]
fn open_reports_not_found_and_disabled() {
    let engine = DialogEngine::builder(EngineSettings::default())
        .catalog(catalog())
        .build();
    match engine.open("nope") {
        Err(Error::Compile(CompileError::NotFound { id })) => assert_eq!(id, "nope"),
        other => panic!("{:?}", other),
    }
    let err = engine.open("hidden").unwrap_err();
    assert_eq!(err.to_string(), "dialog 'hidden' is disabled");
}

#[test]
fn validation_policy_controls_opening() {
    let advisory = DialogEngine::builder(EngineSettings::default())
        .catalog(catalog())
        .build();
    let d = advisory.open("broken").unwrap();
    assert!(d.inputs.is_empty());

    let strict = DialogEngine::builder(EngineSettings {
        validation: ValidationPolicy::BlockOnError,
        ..EngineSettings::default()
    })
    .catalog(catalog())
    .build();
    match strict.open("broken") {
        Err(Error::Blocked { id, errors }) => {
            assert_eq!(id, "broken");
            assert_eq!(errors, 1);
        }
        other => panic!("{:?}", other),
    }
    assert!(strict.open("shop/info").is_ok());
}

#[test]
fn reload_swaps_catalog_and_validates() {
    let engine = DialogEngine::new(EngineSettings::default());
    assert!(engine.dialog_ids().is_empty());

    let (_guard, logs) = logging::capture::scoped();
    let report = engine.reload(catalog());
    assert_eq!(report.errors(), 1);
    assert!(logs.contains("INFO", "dialog catalog reloaded"));
    assert!(logs.contains("ERROR", "must be less than max value"));

    assert_eq!(engine.dialog_ids(), ["broken", "hidden", "shop/info", "shop/main"]);
    assert_eq!(engine.complete_ids("SHOP/"), ["shop/info", "shop/main"]);
    assert_eq!(engine.validate().errors(), 1);
    assert!(engine.validate_dialog("shop/info").unwrap().is_clean());
    assert!(engine.validate_dialog("missing").is_none());

    let quiet = DialogEngine::new(EngineSettings {
        validate_on_reload: false,
        ..EngineSettings::default()
    });
    assert!(quiet.reload(catalog()).is_clean());
}

#[test]
fn default_dialog_and_api_version() {
    let engine = DialogEngine::builder(EngineSettings {
        default_dialog: Some("shop/info".into()),
        api_version: "  ".into(),
        ..EngineSettings::default()
    })
    .catalog(catalog())
    .build();
    assert_eq!(engine.open_default().unwrap().title, "About");
    assert_eq!(engine.api_version(), "unknown");

    let engine = DialogEngine::new(EngineSettings::default());
    assert!(engine.open_default().is_err());
    assert_eq!(engine.api_version(), dialog_engine::API_VERSION);
}

#[test]
fn custom_clicks_reach_handlers() {
    #[derive(Default)]
    struct Replies(Mutex<Vec<String>>);
    impl ReplySink for Replies {
        fn reply(&self, _player: &PlayerRef, message: &str) {
            self.0.lock().push(message.to_string());
        }
    }
    let replies = Arc::new(Replies::default());
    let engine = DialogEngine::builder(EngineSettings::default())
        .catalog(catalog())
        .replies(replies.clone())
        .build();
    let _reg = engine.registry().register(
        Key::parse("shop:buy").unwrap(),
        |cx: &ActionContext| -> HandlerResult {
            let qty = cx.payload().get_int("qty").unwrap_or(1);
            cx.reply(&format!("bought {qty}"));
            Ok(())
        },
    );

    let out = engine
        .handle_custom_click(
            "Shop",
            "BUY",
            Payload::new().with("qty", 3),
            PlayerRef::named(Uuid::nil(), "Alex"),
        )
        .unwrap();
    assert_eq!(out.invoked, 1);

    let (_guard, logs) = logging::capture::scoped();
    let bad = engine.handle_custom_click("shop", "", Payload::new(), viewer().player);
    assert!(matches!(bad, Err(Error::Key(_))));
    assert!(logs.contains("WARN", "invalid key"));

    // the compiled button routes through the same registry
    let custom = buttons(&engine, "shop/main")
        .into_iter()
        .find(|a| a.type_name() == "custom")
        .unwrap();
    match engine.perform(&custom, Some(&viewer()), Payload::new()) {
        Ok(Performed::Dispatched(out)) => assert_eq!(out.invoked, 1),
        other => panic!("{:?}", other),
    }
    assert_eq!(*replies.0.lock(), ["bought 3", "bought 1"]);
}

#[test]
fn button_actions_perform() {
    #[derive(Default)]
    struct Console(Mutex<Vec<String>>);
    impl CommandSink for Console {
        fn run_as_player(&self, _viewer: &Viewer, command: &str) {
            self.0.lock().push(format!("player: {command}"));
        }
        fn run_as_console(&self, command: &str) {
            self.0.lock().push(format!("console: {command}"));
        }
        fn suggest(&self, _viewer: &Viewer, command: &str) {
            self.0.lock().push(format!("suggest: {command}"));
        }
    }
    let console = Arc::new(Console::default());
    let engine = DialogEngine::builder(EngineSettings::default())
        .catalog(catalog())
        .commands(CommandRunner::new(Arc::new(Placeholders::new()), console.clone()))
        .build();

    let actions = buttons(&engine, "shop/main");
    let kinds: Vec<&str> = actions.iter().map(ActionSpec::type_name).collect();
    assert_eq!(kinds, ["custom", "console_command", "show_dialog"]);

    match engine.perform(&actions[1], Some(&viewer()), Payload::new()) {
        Ok(Performed::Command(cmd)) => assert_eq!(cmd, "eco take Alex 5"),
        other => panic!("{:?}", other),
    }
    match engine.perform(&actions[2], Some(&viewer()), Payload::new()) {
        Ok(Performed::ShowDialog(d)) => assert_eq!(d.title, "About"),
        other => panic!("{:?}", other),
    }
    let guarded = ActionSpec::RunCommand {
        template: "eco give %vault_eco% 1".into(),
        scope: CommandScope::Console,
    };
    assert!(matches!(
        engine.perform(&guarded, Some(&viewer()), Payload::new()),
        Err(Error::UnresolvedPlaceholders { .. })
    ));
    assert!(matches!(
        engine.perform(&actions[0], None, Payload::new()),
        Err(Error::NoPlayer { .. })
    ));
    assert_eq!(engine.perform(&ActionSpec::Close, None, Payload::new()).unwrap(), Performed::Close);
    assert_eq!(*console.0.lock(), ["console: eco take Alex 5"]);
}

#[test]
fn concurrent_opens_and_reloads() {
    let engine = Arc::new(
        DialogEngine::builder(EngineSettings::default())
            .catalog(catalog())
            .build(),
    );
    let opened = Arc::new(AtomicUsize::new(0));
    thread::scope(|s| {
        for i in 0..4 {
            let engine = engine.clone();
            let opened = opened.clone();
            s.spawn(move || {
                for _ in 0..50 {
                    if i == 0 {
                        engine.reload(catalog());
                    } else if engine.open("shop/main").is_ok() {
                        opened.fetch_add(1, Ordering::Relaxed);
                    }
                }
            });
        }
    });
    assert_eq!(opened.load(Ordering::Relaxed), 150);
}

#[test]
fn shutdown_clears_handlers() {
    let engine = DialogEngine::new(EngineSettings::default());
    let reg = engine
        .registry()
        .register(Key::parse("a:b").unwrap(), |_: &ActionContext| -> HandlerResult {
            Ok(())
        });
    engine.shutdown();
    assert!(!reg.is_active());
    assert!(engine.registry().keys().is_empty());
}
