#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        thread,
    };

    use dialog_key::Key;
    use parking_lot::Mutex;
    use uuid::Uuid;

    use crate::*;

    fn key(s: &str) -> Key {
        Key::parse(s).unwrap()
    }

    fn cx(k: &str) -> ActionContext {
        ActionContext::new(key(k), Payload::new(), PlayerRef::named(Uuid::nil(), "steve"))
    }

    /// Handler that appends `tag` to a shared log.
    fn recorder(log: Arc<Mutex<Vec<&'static str>>>, tag: &'static str) -> impl ActionHandler {
        move |_: &ActionContext| -> HandlerResult {
            log.lock().push(tag);
            Ok(())
        }
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let reg = ActionRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let _a = reg.register(key("shop:buy"), recorder(log.clone(), "a"));
        let _b = reg.register(key("shop:buy"), recorder(log.clone(), "b"));
        let _c = reg.register(key("shop:buy"), recorder(log.clone(), "a"));
        let _other = reg.register(key("shop:sell"), recorder(log.clone(), "x"));

        let out = reg.dispatch(&cx("shop:buy"));
        assert_eq!(out.invoked, 3);
        assert_eq!(*log.lock(), ["a", "b", "a"]);
        assert_eq!(reg.listener_count(&key("shop:buy")), 3);
    }

    #[test]
    fn dispatch_without_listeners_is_a_noop() {
        let reg = ActionRegistry::new();
        assert_eq!(reg.dispatch(&cx("a:b")), DispatchOutcome::default());
    }

    #[test]
    fn unregister_is_idempotent() {
        let reg = ActionRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let a = reg.register(key("k:v"), recorder(log.clone(), "a"));
        let _b = reg.register(key("k:v"), recorder(log.clone(), "b"));
        a.unregister();
        a.unregister();
        assert!(!a.is_active());
        assert_eq!(reg.dispatch(&cx("k:v")).invoked, 1);
        assert_eq!(*log.lock(), ["b"]);
    }

    #[test]
    fn last_unregister_drops_the_key() {
        let reg = ActionRegistry::new();
        let r = reg.register(key("k:v"), |_: &ActionContext| -> HandlerResult { Ok(()) });
        assert_eq!(reg.keys(), [key("k:v")]);
        r.unregister();
        assert!(reg.keys().is_empty());
    }

    #[test]
    fn unregister_all_and_clear_count_active_listeners() {
        let reg = ActionRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let a = reg.register(key("k:one"), recorder(log.clone(), "a"));
        let _b = reg.register(key("k:one"), recorder(log.clone(), "b"));
        let c = reg.register(key("k:two"), recorder(log.clone(), "c"));
        let _d = reg.register(key("k:three"), recorder(log.clone(), "d"));

        a.unregister();
        assert_eq!(reg.unregister_all(&key("k:one")), 1);
        assert_eq!(reg.unregister_all(&key("k:one")), 0);
        assert_eq!(reg.clear(), 2);
        assert_eq!(reg.clear(), 0);
        assert!(!c.is_active());
        // unregister after clear stays a no-op
        c.unregister();
        assert_eq!(reg.dispatch(&cx("k:two")).attempted(), 0);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn failures_and_panics_do_not_stop_delivery() {
        let reg = ActionRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let _e = reg.register(key("k:v"), |_: &ActionContext| -> HandlerResult {
            Err(HandlerError::Rejected("nope".into()))
        });
        let _p = reg.register(key("k:v"), |_: &ActionContext| -> HandlerResult {
            panic!("handler blew up")
        });
        let _ok = reg.register(key("k:v"), recorder(log.clone(), "ok"));

        let (_guard, captured) = logging::capture::scoped();
        let out = reg.dispatch(&cx("k:v"));
        assert_eq!(out.invoked, 1);
        assert_eq!(out.failed, 2);
        assert_eq!(*log.lock(), ["ok"]);
        assert!(captured.contains("WARN", "action handler failed"));
        assert!(captured.contains("ERROR", "action handler panicked"));

        // registry still usable after a panic
        assert_eq!(reg.dispatch(&cx("k:v")).invoked, 1);
    }

    #[test]
    fn handlers_may_mutate_the_registry_during_dispatch() {
        let reg = ActionRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let slot: Arc<Mutex<Option<Registration>>> = Arc::new(Mutex::new(None));

        let inner_reg = reg.clone();
        let inner_slot = slot.clone();
        let _first = reg.register(key("k:v"), move |_: &ActionContext| -> HandlerResult {
            if let Some(r) = inner_slot.lock().as_ref() {
                r.unregister();
            }
            let _late = inner_reg.register(key("k:late"), |_: &ActionContext| -> HandlerResult {
                Ok(())
            });
            Ok(())
        });
        let h = hits.clone();
        let second = reg.register(key("k:v"), move |_: &ActionContext| -> HandlerResult {
            h.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        *slot.lock() = Some(second);

        let out = reg.dispatch(&cx("k:v"));
        // second was deactivated mid-dispatch and skipped
        assert_eq!(out.invoked, 1);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(reg.listener_count(&key("k:late")), 1);
    }

    #[test]
    fn concurrent_register_dispatch_unregister() {
        let reg = ActionRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let workers: Vec<_> = (0..8)
            .map(|_| {
                let reg = reg.clone();
                let hits = hits.clone();
                thread::spawn(move || {
                    for _ in 0..200 {
                        let h = hits.clone();
                        let r = reg.register(key("k:v"), move |_: &ActionContext| -> HandlerResult {
                            h.fetch_add(1, Ordering::Relaxed);
                            Ok(())
                        });
                        reg.dispatch(&cx("k:v"));
                        r.unregister();
                    }
                })
            })
            .collect();
        for w in workers {
            w.join().unwrap();
        }
        assert!(hits.load(Ordering::Relaxed) >= 1600);
        assert_eq!(reg.listener_count(&key("k:v")), 0);
        assert!(reg.keys().is_empty());
    }

    #[test]
    fn context_reads_payload_and_replies() {
        struct Collect(Mutex<Vec<String>>);
        impl ReplySink for Collect {
            fn reply(&self, player: &PlayerRef, message: &str) {
                self.0
                    .lock()
                    .push(format!("{}: {message}", player.name.as_deref().unwrap_or("?")));
            }
        }
        let sink = Arc::new(Collect(Mutex::new(Vec::new())));
        let reg = ActionRegistry::new();
        let _r = reg.register(key("shop:buy"), |cx: &ActionContext| -> HandlerResult {
            let qty = cx
                .payload()
                .get_int("qty")
                .ok_or_else(|| HandlerError::Payload("qty".into()))?;
            cx.reply(&format!("bought {qty}"));
            Ok(())
        });
        let c = ActionContext::new(
            key("shop:buy"),
            Payload::new().with("qty", 3.7),
            PlayerRef::named(Uuid::nil(), "alex"),
        )
        .with_replies(sink.clone());
        assert_eq!(reg.dispatch(&c).invoked, 1);
        assert_eq!(*sink.0.lock(), ["alex: bought 3"]);

        let missing = cx("shop:buy");
        assert_eq!(reg.dispatch(&missing).failed, 1);
    }
}
