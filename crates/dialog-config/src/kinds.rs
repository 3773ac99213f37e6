//! Dialog type handlers and their registry.
//!
//! Each dialog `type` maps to a [`DialogKind`] that builds the button layout
//! from the dialog root. Hosts and addons may register more kinds at runtime.

use std::{collections::HashMap, sync::Arc};

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::{
    ActionButton, ButtonDefaults, CompileCx, CompileError, DialogTypeSpec, Document, ListEntry,
};

/// Defaults for the confirm slot.
pub const CONFIRM: ButtonDefaults = ButtonDefaults {
    text: "Confirm",
    description: "Click to confirm.",
    width: 100,
};

/// Defaults for the cancel slot.
pub const CANCEL: ButtonDefaults = ButtonDefaults {
    text: "Cancel",
    description: "Click to cancel.",
    width: 100,
};

/// Defaults for the notice acknowledgement button.
pub const ACKNOWLEDGE: ButtonDefaults = ButtonDefaults {
    text: "OK",
    description: "Click to acknowledge.",
    width: 100,
};

/// Defaults for multi-action grid and exit buttons.
pub const ACTION: ButtonDefaults = ButtonDefaults {
    text: "Action",
    description: "Click to perform action.",
    width: 100,
};

/// Builds the [`DialogTypeSpec`] for one dialog type.
pub trait DialogKind: Send + Sync {
    /// Type name as written in configuration, lowercase.
    fn name(&self) -> &str;

    /// Build the button layout from the dialog root.
    fn build(&self, root: &Document, cx: &mut CompileCx<'_>)
    -> Result<DialogTypeSpec, CompileError>;
}

/// `confirmation`: a confirm and a cancel button under `buttons`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Confirmation;

impl DialogKind for Confirmation {
    fn name(&self) -> &str {
        "confirmation"
    }

    fn build(
        &self,
        root: &Document,
        cx: &mut CompileCx<'_>,
    ) -> Result<DialogTypeSpec, CompileError> {
        let buttons = root.get_section("buttons");
        let slot = |name: &str| buttons.as_ref().and_then(|b| b.get_section(name));
        let confirm = cx.button(slot("confirm").as_ref(), &CONFIRM)?;
        let cancel = cx.button(slot("cancel").as_ref(), &CANCEL)?;
        Ok(DialogTypeSpec::Confirmation { confirm, cancel })
    }
}

/// `notice`: a single `exit_button`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Notice;

impl DialogKind for Notice {
    fn name(&self) -> &str {
        "notice"
    }

    fn build(
        &self,
        root: &Document,
        cx: &mut CompileCx<'_>,
    ) -> Result<DialogTypeSpec, CompileError> {
        let exit = cx.button(root.get_section("exit_button").as_ref(), &ACKNOWLEDGE)?;
        Ok(DialogTypeSpec::Notice { exit })
    }
}

/// `multi_action`: a grid of buttons from a map or a list.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiAction;

impl MultiAction {
    /// Shown when a multi-action dialog configures no buttons.
    fn placeholders() -> Vec<ActionButton> {
        ["These are", "Default", "Buttons"]
            .into_iter()
            .map(|text| ActionButton {
                text: text.to_string(),
                description: "You should configure buttons in this dialog configuration."
                    .to_string(),
                width: 100,
                action: None,
            })
            .collect()
    }
}

impl DialogKind for MultiAction {
    fn name(&self) -> &str {
        "multi_action"
    }

    fn build(
        &self,
        root: &Document,
        cx: &mut CompileCx<'_>,
    ) -> Result<DialogTypeSpec, CompileError> {
        let mut sections = Vec::new();
        if let Some(map) = root.get_section("buttons") {
            for key in map.keys() {
                if let Some(sec) = map.entry(key).cloned().and_then(Document::from_value) {
                    sections.push(sec);
                }
            }
        } else {
            sections.extend(
                root.get_list("buttons")
                    .into_iter()
                    .filter_map(|e| match e {
                        ListEntry::Section(s) => Some(s),
                        ListEntry::Scalar(_) => None,
                    }),
            );
        }
        let mut buttons = Vec::with_capacity(sections.len());
        for sec in &sections {
            buttons.push(cx.button(Some(sec), &ACTION)?);
        }
        if buttons.is_empty() {
            debug!("multi_action dialog has no buttons, using placeholders");
            buttons = Self::placeholders();
        }
        let exit = match root.get_section("exit_button") {
            Some(sec) => Some(cx.button(Some(&sec), &ACTION)?),
            None => None,
        };
        Ok(DialogTypeSpec::MultiAction {
            buttons,
            exit,
            columns: root.get("columns", 2u32),
        })
    }
}

/// Type name to handler map.
///
/// Names are stored lowercase. Registering an existing name replaces its handler.
pub struct KindRegistry {
    /// Registered handlers.
    kinds: RwLock<HashMap<String, Arc<dyn DialogKind>>>,
}

impl KindRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            kinds: RwLock::new(HashMap::new()),
        }
    }

    /// A registry holding `confirmation`, `notice` and `multi_action`.
    pub fn with_builtins() -> Self {
        let reg = Self::new();
        reg.register(Arc::new(Confirmation));
        reg.register(Arc::new(Notice));
        reg.register(Arc::new(MultiAction));
        reg
    }

    /// Add a handler under its lowercase name.
    pub fn register(&self, kind: Arc<dyn DialogKind>) {
        let name = kind.name().to_lowercase();
        if self.kinds.write().insert(name.clone(), kind).is_some() {
            warn!(kind = %name, "replacing dialog type handler");
        } else {
            debug!(kind = %name, "registered dialog type handler");
        }
    }

    /// The handler for `name`, if registered.
    pub fn get(&self, name: &str) -> Option<Arc<dyn DialogKind>> {
        self.kinds.read().get(&name.to_lowercase()).cloned()
    }

    /// True when `name` has a handler.
    pub fn is_supported(&self, name: &str) -> bool {
        self.kinds.read().contains_key(&name.to_lowercase())
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.kinds.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// The handler for `name`, falling back to `confirmation` for unknown names.
    pub fn resolve(&self, name: &str) -> Arc<dyn DialogKind> {
        if let Some(kind) = self.get(name) {
            return kind;
        }
        warn!(kind = name, "unsupported dialog type, using confirmation");
        self.get("confirmation")
            .unwrap_or_else(|| Arc::new(Confirmation) as Arc<dyn DialogKind>)
    }
}

impl Default for KindRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
