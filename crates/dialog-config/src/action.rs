//! Button action compilation.

use dialog_key::Key;
use tracing::warn;

use crate::{ActionSpec, CommandScope, CompileCx, CompileError, Document};

/// Read a required non-blank string field, warning when it is absent.
fn required(sec: &Document, field: &str, kind: &str) -> Option<String> {
    let v = sec
        .get_opt::<String>(field)
        .filter(|s| !s.trim().is_empty());
    if v.is_none() {
        warn!(action = kind, field, "missing required field for action");
    }
    v
}

/// Compile an `action` section into an [`ActionSpec`].
///
/// Unusable actions yield `Ok(None)` after a warning. The only hard error is
/// a `show_dialog` that leads back into the dialog chain being compiled.
pub fn compile_action(
    sec: &Document,
    cx: &mut CompileCx<'_>,
) -> Result<Option<ActionSpec>, CompileError> {
    let kind = sec.get_str("type", "return").to_lowercase();
    let spec = match kind.as_str() {
        "close" => Some(ActionSpec::Close),
        "return" => Some(ActionSpec::Return),
        "copy_to_clipboard" => {
            required(sec, "text", &kind).map(|text| ActionSpec::CopyToClipboard { text })
        }
        "open_url" => required(sec, "url", &kind).map(|url| ActionSpec::OpenUrl { url }),
        "run_command" => required(sec, "command", &kind).map(|template| ActionSpec::RunCommand {
            template,
            scope: CommandScope::Player,
        }),
        "console_command" => {
            required(sec, "command", &kind).map(|template| ActionSpec::RunCommand {
                template,
                scope: CommandScope::Console,
            })
        }
        "suggest_command" => {
            required(sec, "command", &kind).map(|template| ActionSpec::SuggestCommand { template })
        }
        "show_dialog" => return show_dialog(sec, cx),
        "custom" => required(sec, "key", &kind).and_then(|raw| match Key::parse(&raw) {
            Ok(key) => Some(ActionSpec::Custom { key }),
            Err(e) => {
                warn!(error = %e, "invalid key for custom action");
                None
            }
        }),
        "null" | "none" => None,
        other => {
            warn!(action = other, "unsupported action type");
            None
        }
    };
    Ok(spec)
}

/// Compile the target dialog in the caller's context.
fn show_dialog(
    sec: &Document,
    cx: &mut CompileCx<'_>,
) -> Result<Option<ActionSpec>, CompileError> {
    let Some(target) = required(sec, "id", "show_dialog") else {
        return Ok(None);
    };
    if !cx.catalog().contains(&target) {
        warn!(target = %target, "show_dialog target does not exist");
        return Ok(None);
    }
    match cx.dialog(&target) {
        Ok(dialog) => Ok(Some(ActionSpec::ShowDialog {
            target_dialog_id: target,
            dialog: Box::new(dialog),
        })),
        Err(e @ CompileError::Cycle { .. }) => Err(e),
        Err(e) => {
            warn!(target = %target, error = %e, "failed to build show_dialog target");
            Ok(None)
        }
    }
}
