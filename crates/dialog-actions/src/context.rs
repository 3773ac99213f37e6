//! What a handler receives when a custom action fires.

use std::{fmt, sync::Arc};

use dialog_key::Key;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{Payload, PayloadView};

/// The player who triggered an action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerRef {
    /// Stable player id.
    pub id: Uuid,
    /// Last known display name.
    pub name: Option<String>,
}

impl PlayerRef {
    /// A player with a known name.
    pub fn named(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
        }
    }
}

/// Delivers messages back to the triggering player.
///
/// The registry makes no threading assumptions; hosts that must reply on a
/// particular thread marshal inside their implementation.
pub trait ReplySink: Send + Sync {
    /// Send `message` to `player`.
    fn reply(&self, player: &PlayerRef, message: &str);
}

/// Discards replies.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReply;

impl ReplySink for NoReply {
    fn reply(&self, player: &PlayerRef, message: &str) {
        debug!(player = %player.id, message, "reply dropped: no sink");
    }
}

/// One triggered custom action.
#[derive(Clone)]
pub struct ActionContext {
    /// Key the action was routed by.
    key: Key,
    /// Submitted values.
    payload: Arc<Payload>,
    /// Triggering player.
    player: PlayerRef,
    /// Reply channel.
    replies: Arc<dyn ReplySink>,
}

impl ActionContext {
    /// A context without a reply channel.
    pub fn new(key: Key, payload: Payload, player: PlayerRef) -> Self {
        Self {
            key,
            payload: Arc::new(payload),
            player,
            replies: Arc::new(NoReply),
        }
    }

    /// Attach a reply channel.
    pub fn with_replies(mut self, replies: Arc<dyn ReplySink>) -> Self {
        self.replies = replies;
        self
    }

    /// Routing key.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Submitted values.
    pub fn payload(&self) -> &dyn PayloadView {
        self.payload.as_ref()
    }

    /// Triggering player.
    pub fn player(&self) -> &PlayerRef {
        &self.player
    }

    /// Send a message to the triggering player.
    pub fn reply(&self, message: &str) {
        self.replies.reply(&self.player, message);
    }
}

impl fmt::Debug for ActionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionContext")
            .field("key", &self.key)
            .field("player", &self.player)
            .field("payload", &self.payload)
            .finish_non_exhaustive()
    }
}
