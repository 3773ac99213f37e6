//! Dialog compilation: catalog document in, [`DialogDefinition`] out.

use std::{collections::HashSet, sync::Arc};

use tracing::{debug, trace, warn};

use crate::{
    ActionButton, BodyElement, BuildEnv, ButtonDefaults, CompileError, DialogCatalog,
    DialogDefinition, Document, InputSpec, KindRegistry, ListEntry, Skip,
    components::{build_body, build_button, build_input},
};

/// Title used when a dialog sets none.
pub const DEFAULT_TITLE: &str = "Default Title";

/// Dialog type used when a dialog sets none.
pub const DEFAULT_KIND: &str = "notice";

/// Compiles catalog entries into dialog definitions.
///
/// Holds no mutable state; every [`compile`](Self::compile) call starts from scratch
/// and may run concurrently with others.
#[derive(Clone)]
pub struct DialogCompiler {
    /// Source documents.
    catalog: Arc<DialogCatalog>,
    /// Dialog type handlers.
    kinds: Arc<KindRegistry>,
    /// Host formatting and material services.
    env: BuildEnv,
}

impl DialogCompiler {
    /// Create a compiler over `catalog`.
    pub fn new(catalog: Arc<DialogCatalog>, kinds: Arc<KindRegistry>, env: BuildEnv) -> Self {
        Self {
            catalog,
            kinds,
            env,
        }
    }

    /// A compiler with built-in dialog types and default host services.
    pub fn with_defaults(catalog: Arc<DialogCatalog>) -> Self {
        Self::new(catalog, Arc::new(KindRegistry::with_builtins()), BuildEnv::default())
    }

    /// The catalog this compiler reads.
    pub fn catalog(&self) -> &Arc<DialogCatalog> {
        &self.catalog
    }

    /// The dialog type registry.
    pub fn kinds(&self) -> &Arc<KindRegistry> {
        &self.kinds
    }

    /// Compile the dialog `id`.
    ///
    /// Fails when the id is unknown, the dialog is disabled, or a `show_dialog`
    /// chain loops back onto itself. Unbuildable elements are logged and left out.
    ///
    /// Every `show_dialog` target is compiled in full and embedded, with no
    /// sharing between buttons. A dialog reached along several paths is
    /// compiled once per path, so a chain where each dialog has two buttons
    /// pointing at the next one costs `2^depth` dialog builds.
    pub fn compile(&self, id: &str) -> Result<DialogDefinition, CompileError> {
        if !self.catalog.contains(id) {
            warn!(dialog = id, available = %self.catalog.ids().join(", "), "dialog not found");
            return Err(CompileError::NotFound { id: id.to_string() });
        }
        if !self.catalog.is_enabled(id) {
            debug!(dialog = id, "dialog is disabled");
            return Err(CompileError::Disabled { id: id.to_string() });
        }
        let mut cx = CompileCx {
            compiler: self,
            active: Vec::new(),
        };
        cx.dialog(id)
    }
}

/// State of one compile call.
///
/// Tracks the chain of dialogs currently being built so `show_dialog` loops are
/// caught. Dialog type handlers receive it to build buttons.
pub struct CompileCx<'a> {
    /// Owning compiler.
    compiler: &'a DialogCompiler,
    /// Ids on the current `show_dialog` path, outermost first.
    active: Vec<String>,
}

impl CompileCx<'_> {
    /// Host services for formatting and materials.
    pub fn env(&self) -> &BuildEnv {
        &self.compiler.env
    }

    /// The catalog being compiled from.
    pub fn catalog(&self) -> &DialogCatalog {
        &self.compiler.catalog
    }

    /// Ids on the current `show_dialog` path, outermost first.
    pub fn active_path(&self) -> &[String] {
        &self.active
    }

    /// Build a button, compiling its action in this context.
    pub fn button(
        &mut self,
        sec: Option<&Document>,
        defaults: &ButtonDefaults,
    ) -> Result<ActionButton, CompileError> {
        build_button(sec, defaults, self)
    }

    /// Compile `id` as part of the current chain.
    ///
    /// Fails with [`CompileError::Cycle`] when `id` is already on the path.
    pub fn dialog(&mut self, id: &str) -> Result<DialogDefinition, CompileError> {
        if let Some(pos) = self.active.iter().position(|a| a == id) {
            let mut chain = self.active[pos..].to_vec();
            chain.push(id.to_string());
            warn!(chain = %chain.join(" -> "), "show_dialog cycle");
            return Err(CompileError::Cycle { chain });
        }
        let root = self
            .compiler
            .catalog
            .root(id)
            .ok_or_else(|| CompileError::NotFound { id: id.to_string() })?;
        self.active.push(id.to_string());
        let out = self.build(id, &root);
        self.active.pop();
        out
    }

    /// Assemble a dialog from its root section.
    fn build(&mut self, id: &str, root: &Document) -> Result<DialogDefinition, CompileError> {
        trace!(dialog = id, depth = self.active.len(), "compiling dialog");
        let env = self.env().clone();
        let title = env.fmt(&root.get_str("title", DEFAULT_TITLE));
        let external_title = env.fmt(&root.get_str("external_title", DEFAULT_TITLE));
        let inputs = inputs(id, root, &env);
        let body = bodies(id, root, &env);

        let kind_name = root.get_str("type", DEFAULT_KIND).to_lowercase();
        let handler = self.compiler.kinds.resolve(&kind_name);
        let kind = handler.build(root, self)?;

        trace!(
            dialog = id,
            inputs = inputs.len(),
            body = body.len(),
            kind = kind.type_name(),
            "compiled dialog"
        );
        Ok(DialogDefinition {
            id: id.to_string(),
            title,
            external_title,
            can_close_with_escape: root.get("can_close_with_escape", true),
            body,
            inputs,
            kind,
        })
    }
}

/// Log an omitted element.
fn skipped(dialog: &str, element: &str, index: usize, skip: &Skip) {
    warn!(dialog, element, index, reason = %skip, "skipping dialog element");
}

/// Build all inputs, dropping unbuildable entries and repeated ids.
fn inputs(id: &str, root: &Document, env: &BuildEnv) -> Vec<InputSpec> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for (i, entry) in root.get_list("inputs").into_iter().enumerate() {
        let ListEntry::Section(sec) = entry else {
            skipped(id, "input", i, &Skip::NotAMap { element: "input" });
            continue;
        };
        match build_input(&sec, env) {
            Ok(input) if !seen.insert(input.id.clone()) => {
                skipped(id, "input", i, &Skip::DuplicateId(input.id));
            }
            Ok(input) => out.push(input),
            Err(skip) => skipped(id, "input", i, &skip),
        }
    }
    out
}

/// Build all body elements, dropping unbuildable entries.
fn bodies(id: &str, root: &Document, env: &BuildEnv) -> Vec<BodyElement> {
    let mut out = Vec::new();
    for (i, entry) in root.get_list("bodies").into_iter().enumerate() {
        let ListEntry::Section(sec) = entry else {
            skipped(id, "body", i, &Skip::NotAMap { element: "body" });
            continue;
        };
        match build_body(&sec, env) {
            Ok(body) => out.push(body),
            Err(skip) => skipped(id, "body", i, &skip),
        }
    }
    out
}
