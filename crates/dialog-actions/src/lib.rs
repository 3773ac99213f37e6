//! Routing of custom dialog actions to registered handlers.
//!
//! Handlers register under a namespaced [`Key`](dialog_key::Key) and receive an
//! [`ActionContext`] when a player triggers a matching custom action. The
//! [`ActionRegistry`] is safe to use from any thread: dispatch works on a
//! snapshot of the listener list and never holds a lock while a handler runs.

mod context;
mod error;
mod payload;
mod registry;

#[cfg(test)]
mod test_registry;

pub use context::{ActionContext, NoReply, PlayerRef, ReplySink};
pub use error::{HandlerError, HandlerResult};
pub use payload::{Payload, PayloadView};
pub use registry::{ActionHandler, ActionRegistry, DispatchOutcome, Registration};
