//! The engine context: one value owning every shared piece of dialog state.

use std::{fmt, sync::Arc};

use dialog_actions::{
    ActionContext, ActionRegistry, DispatchOutcome, NoReply, Payload, PlayerRef, ReplySink,
};
use dialog_config::{
    ActionSpec, BuildEnv, DialogCatalog, DialogCompiler, DialogDefinition, DialogKind,
    KindRegistry, MaterialCatalog, TextFormatter, ValidationReport, Validator,
};
use dialog_key::Key;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::{
    Addon, AddonInfo, AddonManager, CommandRunner, EngineSettings, Error, Result, Viewer,
};

/// API version reported when settings leave it blank.
const UNKNOWN_VERSION: &str = "unknown";

/// Result of performing a button action.
#[derive(Debug, Clone, PartialEq)]
pub enum Performed {
    /// The dialog should close.
    Close,
    /// The dialog should close and the previous screen return.
    Return,
    /// Text to copy to the clipboard.
    CopyToClipboard(String),
    /// Dialog to show next.
    ShowDialog(Box<DialogDefinition>),
    /// URL to offer to the player.
    OpenUrl(String),
    /// A command ran; holds the resolved command.
    Command(String),
    /// A command was suggested; holds the resolved command.
    Suggested(String),
    /// A custom action was dispatched.
    Dispatched(DispatchOutcome),
}

/// Owns the catalog, registries, host services and addons.
///
/// Create one per host and pass it where needed; nothing here is global. All
/// methods take `&self` and are safe to call from any thread.
pub struct DialogEngine {
    /// Engine settings.
    settings: EngineSettings,
    /// Current catalog; replaced wholesale on reload.
    catalog: RwLock<Arc<DialogCatalog>>,
    /// Dialog type handlers.
    kinds: Arc<KindRegistry>,
    /// Host formatting and material services.
    env: BuildEnv,
    /// Document validator.
    validator: Validator,
    /// Custom action handlers.
    registry: ActionRegistry,
    /// Command template execution.
    commands: CommandRunner,
    /// Reply channel handed to action handlers.
    replies: Arc<dyn ReplySink>,
    /// Enabled addons.
    addons: AddonManager,
}

impl fmt::Debug for DialogEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogEngine")
            .field("settings", &self.settings)
            .field("dialogs", &self.catalog.read().len())
            .field("kinds", &self.kinds.names())
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl DialogEngine {
    /// An engine with default host services and an empty catalog.
    pub fn new(settings: EngineSettings) -> Self {
        EngineBuilder::new(settings).build()
    }

    /// Start configuring an engine.
    pub fn builder(settings: EngineSettings) -> EngineBuilder {
        EngineBuilder::new(settings)
    }

    /// Active settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// API version handed to addons.
    pub fn api_version(&self) -> &str {
        let v = self.settings.api_version.trim();
        if v.is_empty() { UNKNOWN_VERSION } else { v }
    }

    /// The custom action registry.
    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// The dialog type registry.
    pub fn kinds(&self) -> &Arc<KindRegistry> {
        &self.kinds
    }

    /// Add or replace a dialog type handler.
    pub fn register_kind(&self, kind: Arc<dyn DialogKind>) {
        self.kinds.register(kind);
    }

    /// Snapshot of the current catalog.
    pub fn catalog(&self) -> Arc<DialogCatalog> {
        self.catalog.read().clone()
    }

    /// A compiler over the current catalog.
    pub fn compiler(&self) -> DialogCompiler {
        DialogCompiler::new(self.catalog(), self.kinds.clone(), self.env.clone())
    }

    /// Compile dialog `id` for display.
    ///
    /// Under [`ValidationPolicy::BlockOnError`](dialog_config::ValidationPolicy)
    /// a dialog with validation errors is refused.
    pub fn open(&self, id: &str) -> Result<DialogDefinition> {
        let compiler = self.compiler();
        if let Some(doc) = compiler.catalog().get(id) {
            let report = self.validator.validate(id, doc);
            if self.settings.validation.blocks(&report) {
                report.log();
                warn!(dialog = id, errors = report.errors(), "dialog blocked by validation");
                return Err(Error::Blocked {
                    id: id.to_string(),
                    errors: report.errors(),
                });
            }
        }
        let dialog = compiler.compile(id)?;
        debug!(dialog = id, "opened dialog");
        Ok(dialog)
    }

    /// Open the configured default dialog.
    pub fn open_default(&self) -> Result<DialogDefinition> {
        let id = self
            .settings
            .default_dialog
            .as_deref()
            .ok_or_else(|| Error::msg("no default dialog configured"))?;
        self.open(id)
    }

    /// Replace the catalog.
    ///
    /// Validates the new catalog when `validate_on_reload` is set and logs the
    /// report; otherwise returns an empty report.
    pub fn reload(&self, catalog: DialogCatalog) -> ValidationReport {
        let catalog = Arc::new(catalog);
        let report = if self.settings.validate_on_reload {
            let report = self.validator.validate_catalog(&catalog);
            report.log();
            report
        } else {
            ValidationReport::default()
        };
        let count = catalog.len();
        *self.catalog.write() = catalog;
        info!(dialogs = count, "dialog catalog reloaded");
        report
    }

    /// Validate every dialog in the current catalog.
    pub fn validate(&self) -> ValidationReport {
        self.validator.validate_catalog(&self.catalog())
    }

    /// Validate one dialog; `None` if the id is unknown.
    pub fn validate_dialog(&self, id: &str) -> Option<ValidationReport> {
        let catalog = self.catalog();
        catalog.get(id).map(|doc| self.validator.validate(id, doc))
    }

    /// Dialog ids, sorted case-insensitively.
    pub fn dialog_ids(&self) -> Vec<String> {
        self.catalog().ids().into_iter().map(str::to_string).collect()
    }

    /// Dialog ids starting with `prefix`, ignoring case.
    pub fn complete_ids(&self, prefix: &str) -> Vec<String> {
        self.catalog()
            .complete_ids(prefix)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Route a custom click from the host to registered handlers.
    ///
    /// An invalid key is logged and nothing is dispatched.
    pub fn handle_custom_click(
        &self,
        namespace: &str,
        value: &str,
        payload: Payload,
        player: PlayerRef,
    ) -> Result<DispatchOutcome> {
        let key = Key::new(namespace, value).map_err(|e| {
            warn!(namespace, value, error = %e, "dropping custom click with invalid key");
            e
        })?;
        Ok(self.dispatch(key, payload, player))
    }

    /// Dispatch a custom action for `player`.
    fn dispatch(&self, key: Key, payload: Payload, player: PlayerRef) -> DispatchOutcome {
        let cx = ActionContext::new(key, payload, player).with_replies(self.replies.clone());
        self.registry.dispatch(&cx)
    }

    /// Carry out a compiled button action for `viewer`.
    ///
    /// `payload` holds the dialog's submitted input values and is only used by
    /// custom actions.
    pub fn perform(
        &self,
        action: &ActionSpec,
        viewer: Option<&Viewer>,
        payload: Payload,
    ) -> Result<Performed> {
        Ok(match action {
            ActionSpec::Close => Performed::Close,
            ActionSpec::Return => Performed::Return,
            ActionSpec::CopyToClipboard { text } => Performed::CopyToClipboard(text.clone()),
            ActionSpec::ShowDialog { dialog, .. } => Performed::ShowDialog(dialog.clone()),
            ActionSpec::OpenUrl { url } => Performed::OpenUrl(url.clone()),
            ActionSpec::RunCommand { template, scope } => {
                Performed::Command(self.commands.run(template, *scope, viewer)?)
            }
            ActionSpec::SuggestCommand { template } => {
                let v = viewer.ok_or_else(|| Error::NoPlayer {
                    action: "suggest_command".into(),
                })?;
                Performed::Suggested(self.commands.suggest(template, v))
            }
            ActionSpec::Custom { key } => {
                let v = viewer.ok_or_else(|| Error::NoPlayer {
                    action: key.to_string(),
                })?;
                Performed::Dispatched(self.dispatch(key.clone(), payload, v.player.clone()))
            }
        })
    }

    /// Enable an addon against this engine.
    pub fn enable_addon(&self, addon: Box<dyn Addon>) -> Result<bool> {
        self.addons.enable(addon)
    }

    /// Disable one addon by id.
    pub fn disable_addon(&self, id: &str) -> Result<bool> {
        self.addons.disable(id)
    }

    /// Enabled addons.
    pub fn addons(&self) -> Vec<AddonInfo> {
        self.addons.loaded()
    }

    /// Disable all addons, then drop every action handler.
    pub fn shutdown(&self) {
        let addons = self.addons.disable_all();
        let handlers = self.registry.clear();
        info!(addons, handlers, "dialog engine shut down");
    }
}

/// Configures a [`DialogEngine`].
pub struct EngineBuilder {
    /// Engine settings.
    settings: EngineSettings,
    /// Initial catalog.
    catalog: DialogCatalog,
    /// Dialog type handlers.
    kinds: Arc<KindRegistry>,
    /// Host services.
    env: BuildEnv,
    /// Command execution.
    commands: CommandRunner,
    /// Reply channel.
    replies: Arc<dyn ReplySink>,
}

impl EngineBuilder {
    /// Defaults: built-in dialog types, plain text, any material, logged commands.
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            catalog: DialogCatalog::new(),
            kinds: Arc::new(KindRegistry::with_builtins()),
            env: BuildEnv::default(),
            commands: CommandRunner::default(),
            replies: Arc::new(NoReply),
        }
    }

    /// Initial catalog.
    pub fn catalog(mut self, catalog: DialogCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Text formatter for titles, labels and messages.
    pub fn formatter(mut self, formatter: Arc<dyn TextFormatter>) -> Self {
        self.env.formatter = formatter;
        self
    }

    /// Material lookup for item bodies.
    pub fn materials(mut self, materials: Arc<dyn MaterialCatalog>) -> Self {
        self.env.materials = materials;
        self
    }

    /// Dialog type registry.
    pub fn kinds(mut self, kinds: Arc<KindRegistry>) -> Self {
        self.kinds = kinds;
        self
    }

    /// Command resolution and execution.
    pub fn commands(mut self, commands: CommandRunner) -> Self {
        self.commands = commands;
        self
    }

    /// Reply channel for action handlers.
    pub fn replies(mut self, replies: Arc<dyn ReplySink>) -> Self {
        self.replies = replies;
        self
    }

    /// Finish building.
    pub fn build(self) -> DialogEngine {
        let registry = ActionRegistry::new();
        let api_version = match self.settings.api_version.trim() {
            "" => UNKNOWN_VERSION.to_string(),
            v => v.to_string(),
        };
        let addons = AddonManager::new(api_version, registry.clone(), self.kinds.clone());
        let validator = Validator::new(self.env.formatter.clone());
        info!(
            dialogs = self.catalog.len(),
            policy = ?self.settings.validation,
            "dialog engine created"
        );
        DialogEngine {
            settings: self.settings,
            catalog: RwLock::new(Arc::new(self.catalog)),
            kinds: self.kinds,
            env: self.env,
            validator,
            registry,
            commands: self.commands,
            replies: self.replies,
            addons,
        }
    }
}
