//! Command templates attached to buttons.
//!
//! Templates are stored unresolved in compiled dialogs and expanded when the
//! button is clicked, against the clicking [`Viewer`].

use std::{fmt, sync::Arc};

use dialog_actions::PlayerRef;
use dialog_config::CommandScope;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{Error, Result};

/// Name substituted for `<player>` when no player is involved.
pub const CONSOLE_NAME: &str = "CONSOLE";

/// Snapshot of the player a dialog is shown to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewer {
    /// The player.
    pub player: PlayerRef,
    /// World name.
    pub world: String,
    /// Position.
    pub x: f64,
    /// Position.
    pub y: f64,
    /// Position.
    pub z: f64,
    /// Game mode name, e.g. `SURVIVAL`.
    pub gamemode: String,
}

impl Viewer {
    /// Display name, falling back to the id.
    pub fn name(&self) -> String {
        self.player
            .name
            .clone()
            .unwrap_or_else(|| self.player.id.to_string())
    }

    /// Block coordinates of the position.
    pub fn block_pos(&self) -> (i64, i64, i64) {
        (
            self.x.floor() as i64,
            self.y.floor() as i64,
            self.z.floor() as i64,
        )
    }
}

/// Expands placeholders in a command template.
pub trait PlaceholderResolver: Send + Sync {
    /// Expand `template` for `viewer`; `None` means the console triggered it.
    fn resolve(&self, template: &str, viewer: Option<&Viewer>) -> String;
}

impl<F> PlaceholderResolver for F
where
    F: Fn(&str, Option<&Viewer>) -> String + Send + Sync,
{
    fn resolve(&self, template: &str, viewer: Option<&Viewer>) -> String {
        self(template, viewer)
    }
}

/// Built-in placeholders with an optional external expansion step.
///
/// Order: `<...>` tags, then the expansion (only with a viewer and while `%`
/// remains), then the `%player_*%` fallbacks.
#[derive(Clone, Default)]
pub struct Placeholders {
    /// Host-provided expansion for `%...%` placeholders.
    expansion: Option<Arc<dyn PlaceholderResolver>>,
}

impl fmt::Debug for Placeholders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Placeholders")
            .field("expansion", &self.expansion.is_some())
            .finish()
    }
}

impl Placeholders {
    /// Built-in placeholders only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `expansion` between the tag and fallback passes.
    pub fn with_expansion(expansion: Arc<dyn PlaceholderResolver>) -> Self {
        Self {
            expansion: Some(expansion),
        }
    }
}

/// Replace the `<...>` tags.
fn native_tags(template: &str, viewer: Option<&Viewer>) -> String {
    let Some(v) = viewer else {
        return template.replace("<player>", CONSOLE_NAME);
    };
    let (bx, by, bz) = v.block_pos();
    template
        .replace("<player>", &v.name())
        .replace("<uuid>", &v.player.id.to_string())
        .replace("<world>", &v.world)
        .replace("<x>", &bx.to_string())
        .replace("<y>", &by.to_string())
        .replace("<z>", &bz.to_string())
        .replace("<pos>", &format!("{bx} {by} {bz}"))
        .replace("<gamemode>", &v.gamemode)
}

/// Replace the `%player_*%` fallbacks.
fn fallback_tags(text: &str, v: &Viewer) -> String {
    text.replace("%player_name%", &v.name())
        .replace("%player_uuid%", &v.player.id.to_string())
        .replace("%player_world%", &v.world)
        .replace("%world%", &v.world)
        .replace("%player_gamemode%", &v.gamemode)
}

impl PlaceholderResolver for Placeholders {
    fn resolve(&self, template: &str, viewer: Option<&Viewer>) -> String {
        let mut out = native_tags(template, viewer);
        let Some(v) = viewer else {
            return out;
        };
        if out.contains('%')
            && let Some(expansion) = &self.expansion
        {
            out = expansion.resolve(&out, viewer);
        }
        if out.contains('%') {
            out = fallback_tags(&out, v);
        }
        out
    }
}

/// Host side of command execution.
pub trait CommandSink: Send + Sync {
    /// Run `command` as `viewer`.
    fn run_as_player(&self, viewer: &Viewer, command: &str);
    /// Run `command` from the console.
    fn run_as_console(&self, command: &str);
    /// Put `command` into the viewer's chat box.
    fn suggest(&self, viewer: &Viewer, command: &str);
}

/// Logs commands instead of running them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOnly;

impl CommandSink for LogOnly {
    fn run_as_player(&self, viewer: &Viewer, command: &str) {
        debug!(player = %viewer.name(), command, "player command (not executed)");
    }

    fn run_as_console(&self, command: &str) {
        debug!(command, "console command (not executed)");
    }

    fn suggest(&self, viewer: &Viewer, command: &str) {
        debug!(player = %viewer.name(), command, "command suggestion (not sent)");
    }
}

/// Resolves templates and hands them to a [`CommandSink`].
#[derive(Clone)]
pub struct CommandRunner {
    /// Placeholder expansion.
    resolver: Arc<dyn PlaceholderResolver>,
    /// Execution target.
    sink: Arc<dyn CommandSink>,
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new(Arc::new(Placeholders::new()), Arc::new(LogOnly))
    }
}

impl fmt::Debug for CommandRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRunner").finish_non_exhaustive()
    }
}

impl CommandRunner {
    /// A runner using `resolver` and `sink`.
    pub fn new(resolver: Arc<dyn PlaceholderResolver>, sink: Arc<dyn CommandSink>) -> Self {
        Self { resolver, sink }
    }

    /// Expand `template` without running it.
    pub fn resolve(&self, template: &str, viewer: Option<&Viewer>) -> String {
        self.resolver.resolve(template, viewer)
    }

    /// Resolve and run `template`; returns the command that ran.
    ///
    /// Console commands with leftover `%` placeholders are refused. Player
    /// commands need a viewer.
    pub fn run(
        &self,
        template: &str,
        scope: CommandScope,
        viewer: Option<&Viewer>,
    ) -> Result<String> {
        let command = self.resolve(template, viewer);
        match scope {
            CommandScope::Player => {
                let Some(v) = viewer else {
                    warn!(command = %command, "cannot run player command: no player");
                    return Err(Error::NoPlayer { action: command });
                };
                debug!(player = %v.name(), command = %command, "running player command");
                self.sink.run_as_player(v, &command);
            }
            CommandScope::Console => {
                if command.contains('%') {
                    warn!(command = %command, "refusing console command with unresolved placeholders");
                    return Err(Error::UnresolvedPlaceholders { command });
                }
                debug!(command = %command, "running console command");
                self.sink.run_as_console(&command);
            }
        }
        Ok(command)
    }

    /// Resolve `template` and suggest it to `viewer`; returns the suggestion.
    pub fn suggest(&self, template: &str, viewer: &Viewer) -> String {
        let command = self.resolve(template, Some(viewer));
        self.sink.suggest(viewer, &command);
        command
    }
}
