//! Keyed registration and dispatch of custom action handlers.
//!
//! Each key owns a list of listeners in registration order. Dispatch copies the
//! list, reaps deactivated listeners, then runs the remaining handlers with no
//! registry lock held, so handlers may register or unregister freely.

use std::{
    any::Any,
    collections::HashMap,
    fmt,
    panic::{AssertUnwindSafe, catch_unwind},
    sync::{
        Arc, Weak,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use dialog_key::Key;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info, trace, warn};

use crate::{ActionContext, HandlerResult};

/// Reacts to a custom action.
pub trait ActionHandler: Send + Sync {
    /// Handle one triggered action.
    fn handle(&self, cx: &ActionContext) -> HandlerResult;
}

impl<F> ActionHandler for F
where
    F: Fn(&ActionContext) -> HandlerResult + Send + Sync,
{
    fn handle(&self, cx: &ActionContext) -> HandlerResult {
        self(cx)
    }
}

/// One registered handler.
struct Listener {
    /// Registry-unique id, used in logs.
    id: u64,
    /// Key the handler is registered under.
    key: Key,
    /// The handler.
    handler: Box<dyn ActionHandler>,
    /// Cleared exactly once when the listener is removed.
    active: AtomicBool,
}

impl Listener {
    /// Mark inactive; true if this call did the transition.
    fn deactivate(&self) -> bool {
        self.active.swap(false, Ordering::AcqRel)
    }

    /// Current state.
    fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

/// Listeners for one key.
type Slot = Arc<Mutex<Vec<Arc<Listener>>>>;

/// Shared registry state.
struct Inner {
    /// Listener lists by key.
    slots: RwLock<HashMap<Key, Slot>>,
    /// Source of listener ids.
    next_id: AtomicU64,
}

impl Inner {
    /// Remove one listener's entry, dropping the key when its list empties.
    fn remove(&self, listener: &Arc<Listener>) {
        let mut slots = self.slots.write();
        let Some(slot) = slots.get(&listener.key).cloned() else {
            return;
        };
        let mut list = slot.lock();
        list.retain(|l| !Arc::ptr_eq(l, listener));
        if list.is_empty() {
            drop(list);
            slots.remove(&listener.key);
        }
    }
}

/// Counts from one dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Handlers that ran and returned `Ok`.
    pub invoked: usize,
    /// Handlers that returned `Err` or panicked.
    pub failed: usize,
    /// Inactive listeners removed from the list during this dispatch.
    pub reaped: usize,
}

impl DispatchOutcome {
    /// Handlers that ran, successfully or not.
    pub fn attempted(&self) -> usize {
        self.invoked + self.failed
    }
}

/// Routes custom actions to registered handlers.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone)]
pub struct ActionRegistry {
    /// Shared state.
    inner: Arc<Inner>,
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("keys", &self.inner.slots.read().len())
            .finish()
    }
}

/// Best-effort text of a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

impl ActionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                slots: RwLock::new(HashMap::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Register `handler` under `key`.
    ///
    /// Duplicates are allowed; every registration runs, in registration order.
    pub fn register(&self, key: Key, handler: impl ActionHandler + 'static) -> Registration {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let listener = Arc::new(Listener {
            id,
            key: key.clone(),
            handler: Box::new(handler),
            active: AtomicBool::new(true),
        });
        {
            let mut slots = self.inner.slots.write();
            let slot = slots.entry(key).or_default();
            slot.lock().push(listener.clone());
        }
        debug!(key = %listener.key, listener = id, "registered action handler");
        Registration {
            registry: Arc::downgrade(&self.inner),
            listener,
        }
    }

    /// Remove every listener for `key`; returns how many were active.
    pub fn unregister_all(&self, key: &Key) -> usize {
        let Some(slot) = self.inner.slots.write().remove(key) else {
            return 0;
        };
        let removed = slot
            .lock()
            .drain(..)
            .filter(|l| l.deactivate())
            .count();
        info!(key = %key, removed, "unregistered action handlers");
        removed
    }

    /// Remove every listener; returns how many were active.
    pub fn clear(&self) -> usize {
        let slots: Vec<Slot> = self.inner.slots.write().drain().map(|(_, s)| s).collect();
        let removed = slots
            .iter()
            .map(|slot| slot.lock().drain(..).filter(|l| l.deactivate()).count())
            .sum();
        info!(removed, "cleared action registry");
        removed
    }

    /// Active listeners for `key`.
    pub fn listener_count(&self, key: &Key) -> usize {
        let Some(slot) = self.inner.slots.read().get(key).cloned() else {
            return 0;
        };
        slot.lock().iter().filter(|l| l.is_active()).count()
    }

    /// Keys with at least one listener entry.
    pub fn keys(&self) -> Vec<Key> {
        self.inner.slots.read().keys().cloned().collect()
    }

    /// Deliver `cx` to every active handler registered under its key.
    ///
    /// Runs on the caller's thread. Handler errors and panics are logged and
    /// counted; they never stop delivery to later handlers.
    pub fn dispatch(&self, cx: &ActionContext) -> DispatchOutcome {
        let key = cx.key();
        let Some(slot) = self.inner.slots.read().get(key).cloned() else {
            trace!(key = %key, "no handlers for action");
            return DispatchOutcome::default();
        };
        let mut outcome = DispatchOutcome::default();
        let snapshot: Vec<Arc<Listener>> = {
            let mut list = slot.lock();
            let before = list.len();
            list.retain(|l| l.is_active());
            outcome.reaped = before - list.len();
            list.clone()
        };
        for listener in snapshot {
            // unregistered while earlier handlers ran
            if !listener.is_active() {
                continue;
            }
            match catch_unwind(AssertUnwindSafe(|| listener.handler.handle(cx))) {
                Ok(Ok(())) => outcome.invoked += 1,
                Ok(Err(e)) => {
                    outcome.failed += 1;
                    warn!(key = %key, listener = listener.id, error = %e, "action handler failed");
                }
                Err(payload) => {
                    outcome.failed += 1;
                    error!(
                        key = %key,
                        listener = listener.id,
                        panic = %panic_message(payload.as_ref()),
                        "action handler panicked"
                    );
                }
            }
        }
        trace!(key = %key, ?outcome, "dispatched action");
        outcome
    }
}

/// Handle to one registered handler.
///
/// Dropping the handle leaves the handler registered; call
/// [`unregister`](Self::unregister) to remove it.
pub struct Registration {
    /// Owning registry; may be gone.
    registry: Weak<Inner>,
    /// The registered listener.
    listener: Arc<Listener>,
}

impl Registration {
    /// Remove the handler. Calling this again has no effect.
    pub fn unregister(&self) {
        if !self.listener.deactivate() {
            return;
        }
        if let Some(inner) = self.registry.upgrade() {
            inner.remove(&self.listener);
        }
        debug!(key = %self.listener.key, listener = self.listener.id, "unregistered action handler");
    }

    /// False once the handler has been removed by any means.
    pub fn is_active(&self) -> bool {
        self.listener.is_active()
    }

    /// Key the handler is registered under.
    pub fn key(&self) -> &Key {
        &self.listener.key
    }

    /// Registry-unique listener id.
    pub fn id(&self) -> u64 {
        self.listener.id
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("key", &self.listener.key)
            .field("id", &self.listener.id)
            .field("active", &self.is_active())
            .finish()
    }
}
