//! Engine context for dialogs: catalog, compilation, validation, commands,
//! custom actions and addons behind one [`DialogEngine`] value.
//!
//! ```text
//! host ──► DialogEngine ──► open(id) ──► DialogCompiler ──► DialogDefinition
//!            │   ├─ reload(catalog) / validate() ──► ValidationReport
//!            │   ├─ perform(action) ──► CommandRunner | ActionRegistry
//!            │   └─ handle_custom_click(ns, value, payload, player)
//!            └─ AddonManager ──► Addon::on_enable(AddonContext)
//! ```

mod addons;
mod commands;
mod engine;
mod error;
mod settings;

pub use addons::{Addon, AddonContext, AddonInfo, AddonManager};
pub use commands::{
    CONSOLE_NAME, CommandRunner, CommandSink, LogOnly, PlaceholderResolver, Placeholders, Viewer,
};
pub use engine::{DialogEngine, EngineBuilder, Performed};
pub use error::{Error, Result};
pub use settings::{API_VERSION, EngineSettings};
