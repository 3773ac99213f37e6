//! Record tracing events in memory.
//!
//! Install [`layer`] in a subscriber, or call [`scoped`] to capture events on
//! the current thread until the returned guard drops. Tests use this to assert
//! on diagnostics.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{Event, Subscriber, dispatcher::DefaultGuard, subscriber::set_default};
use tracing_subscriber::{
    layer::{Context, Layer, SubscriberExt},
    registry,
};

use crate::fmt::{RenderedLog, render_event};

/// Shared buffer of captured events.
#[derive(Debug, Clone, Default)]
pub struct Captured {
    /// Events in arrival order.
    events: Arc<Mutex<Vec<RenderedLog>>>,
}

impl Captured {
    /// Copy of every captured event.
    pub fn events(&self) -> Vec<RenderedLog> {
        self.events.lock().clone()
    }

    /// True if an event at `level` mentions `needle` in its message or fields.
    pub fn contains(&self, level: &str, needle: &str) -> bool {
        self.events.lock().iter().any(|e| {
            e.level.eq_ignore_ascii_case(level)
                && (e.message.contains(needle) || e.fields.contains(needle))
        })
    }

    /// Number of events at `level`.
    pub fn count(&self, level: &str) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| e.level.eq_ignore_ascii_case(level))
            .count()
    }

    /// Drop everything captured so far.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

/// Tracing layer that appends rendered events to a [`Captured`] buffer.
pub struct CaptureLayer {
    /// Destination buffer.
    sink: Captured,
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        self.sink.events.lock().push(render_event(event));
    }
}

/// Create a capture layer and the handle to read what it records.
pub fn layer() -> (CaptureLayer, Captured) {
    let sink = Captured::default();
    (CaptureLayer { sink: sink.clone() }, sink)
}

/// Capture every event on the current thread while the guard lives.
pub fn scoped() -> (DefaultGuard, Captured) {
    let (layer, captured) = layer();
    let guard = set_default(registry().with(layer));
    (guard, captured)
}
