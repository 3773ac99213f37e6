//! Addon lifecycle.
//!
//! Discovery and loading are host concerns. The host constructs addon values
//! and hands them to an [`AddonManager`], which enables them with an
//! [`AddonContext`] and disables them on shutdown.

use std::{collections::HashSet, fmt, sync::Arc};

use dialog_actions::ActionRegistry;
use dialog_config::KindRegistry;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{Span, error, info, info_span, warn};

use crate::{Error, Result};

/// An extension enabled against a running engine.
pub trait Addon: Send {
    /// Unique id; a second addon with the same id is skipped.
    fn id(&self) -> &str;

    /// Version text, reported in listings.
    fn version(&self) -> &str;

    /// Called once when enabled. Register handlers and dialog types here.
    fn on_enable(&mut self, cx: &AddonContext) -> Result<()>;

    /// Called once when disabled.
    fn on_disable(&mut self) -> Result<()>;
}

/// What an addon gets to work with while enabling.
#[derive(Clone)]
pub struct AddonContext {
    /// Id of the addon being enabled.
    addon_id: String,
    /// Engine API version.
    api_version: String,
    /// Shared action registry.
    registry: ActionRegistry,
    /// Shared dialog type registry.
    kinds: Arc<KindRegistry>,
    /// Span carrying the addon id, for the addon's own logging.
    span: Span,
}

impl fmt::Debug for AddonContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddonContext")
            .field("addon_id", &self.addon_id)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

impl AddonContext {
    /// Id of the addon this context was made for.
    pub fn addon_id(&self) -> &str {
        &self.addon_id
    }

    /// Engine API version.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// The engine's action registry.
    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// The engine's dialog type registry.
    pub fn kinds(&self) -> &Arc<KindRegistry> {
        &self.kinds
    }

    /// Span tagged with the addon id; enter it to attribute log lines.
    pub fn span(&self) -> &Span {
        &self.span
    }
}

/// Listing entry for an enabled addon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddonInfo {
    /// Addon id.
    pub id: String,
    /// Addon version.
    pub version: String,
}

/// Tracks enabled addons.
pub struct AddonManager {
    /// Engine API version passed to every addon.
    api_version: String,
    /// Registry handed to addons.
    registry: ActionRegistry,
    /// Dialog types handed to addons.
    kinds: Arc<KindRegistry>,
    /// Enabled addons and ids still enabling.
    state: Mutex<Slots>,
}

/// Addon bookkeeping guarded by one lock.
#[derive(Default)]
struct Slots {
    /// Enabled addons in enable order.
    enabled: Vec<Box<dyn Addon>>,
    /// Ids whose `on_enable` is running.
    starting: HashSet<String>,
}

impl Slots {
    /// True if `id` is enabled or enabling.
    fn claims(&self, id: &str) -> bool {
        self.starting.contains(id) || self.enabled.iter().any(|a| a.id() == id)
    }
}

impl fmt::Debug for AddonManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddonManager")
            .field("api_version", &self.api_version)
            .field("loaded", &self.loaded())
            .finish()
    }
}

impl AddonManager {
    /// A manager handing out `registry` and `kinds` to addons.
    pub fn new(
        api_version: impl Into<String>,
        registry: ActionRegistry,
        kinds: Arc<KindRegistry>,
    ) -> Self {
        Self {
            api_version: api_version.into(),
            registry,
            kinds,
            state: Mutex::new(Slots::default()),
        }
    }

    /// Enable `addon`.
    ///
    /// Returns `Ok(false)` when an addon with the same id is already enabled
    /// or enabling. An addon whose `on_enable` fails is dropped and not recorded.
    pub fn enable(&self, mut addon: Box<dyn Addon>) -> Result<bool> {
        let id = addon.id().to_string();
        {
            let mut state = self.state.lock();
            if state.claims(&id) {
                warn!(addon = %id, "addon already loaded, skipping");
                return Ok(false);
            }
            state.starting.insert(id.clone());
        }
        let cx = AddonContext {
            addon_id: id.clone(),
            api_version: self.api_version.clone(),
            registry: self.registry.clone(),
            kinds: self.kinds.clone(),
            span: info_span!("addon", addon = %id),
        };
        // on_enable runs with no manager lock held
        let enabled = cx.span.in_scope(|| addon.on_enable(&cx));
        let mut state = self.state.lock();
        state.starting.remove(&id);
        if let Err(e) = enabled {
            error!(addon = %id, error = %e, "failed to enable addon");
            return Err(Error::addon(id, e.to_string()));
        }
        info!(addon = %id, version = addon.version(), "addon enabled");
        state.enabled.push(addon);
        Ok(true)
    }

    /// Disable the addon `id`. Returns false if it was not enabled.
    pub fn disable(&self, id: &str) -> Result<bool> {
        let mut addon = {
            let mut state = self.state.lock();
            let Some(pos) = state.enabled.iter().position(|a| a.id() == id) else {
                warn!(addon = id, "no such addon loaded");
                return Ok(false);
            };
            state.enabled.remove(pos)
        };
        Self::shut_down(addon.as_mut())?;
        Ok(true)
    }

    /// Disable every addon, most recently enabled first.
    ///
    /// Failures are logged and do not stop the remaining addons from being
    /// disabled. Returns how many addons were disabled cleanly.
    pub fn disable_all(&self) -> usize {
        let mut addons: Vec<Box<dyn Addon>> = self.state.lock().enabled.drain(..).rev().collect();
        addons
            .iter_mut()
            .map(|a| Self::shut_down(a.as_mut()))
            .filter(Result::is_ok)
            .count()
    }

    /// True if an addon with `id` is enabled.
    pub fn is_enabled(&self, id: &str) -> bool {
        self.state.lock().enabled.iter().any(|a| a.id() == id)
    }

    /// Enabled addons in enable order.
    pub fn loaded(&self) -> Vec<AddonInfo> {
        self.state
            .lock()
            .enabled
            .iter()
            .map(|a| AddonInfo {
                id: a.id().to_string(),
                version: a.version().to_string(),
            })
            .collect()
    }

    /// Run `on_disable` with no manager lock held.
    fn shut_down(addon: &mut dyn Addon) -> Result<()> {
        let id = addon.id().to_string();
        match addon.on_disable() {
            Ok(()) => {
                info!(addon = %id, "addon disabled");
                Ok(())
            }
            Err(e) => {
                error!(addon = %id, error = %e, "error disabling addon");
                Err(Error::addon(id, e.to_string()))
            }
        }
    }
}
