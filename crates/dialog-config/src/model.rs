//! Typed dialog descriptions produced by the compiler.
//!
//! Every value here is built fresh per compile and never mutated afterwards.
//! Text fields hold the output of the configured [`crate::TextFormatter`].

use dialog_key::Key;
use serde::Serialize;

/// A fully compiled dialog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogDefinition {
    /// Catalog id this dialog was compiled from.
    pub id: String,
    /// Title shown above the dialog.
    pub title: String,
    /// Title used when the dialog is referenced from elsewhere (pause menu, links).
    pub external_title: String,
    /// Whether pressing escape closes the dialog.
    pub can_close_with_escape: bool,
    /// Body elements in authoring order.
    pub body: Vec<BodyElement>,
    /// Input fields in authoring order; ids are unique.
    pub inputs: Vec<InputSpec>,
    /// Button layout.
    pub kind: DialogTypeSpec,
}

/// A non-interactive element rendered above the inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BodyElement {
    /// A block of text.
    PlainMessage {
        /// Formatted text.
        formatted_text: String,
        /// Width in pixels.
        width: u32,
    },
    /// An item stack rendered as an icon.
    Item {
        /// Canonical material name, e.g. `DIAMOND_SWORD`.
        material: String,
        /// Stack size.
        amount: u32,
        /// Custom item name.
        display_name: Option<String>,
        /// Tooltip lines.
        lore: Vec<String>,
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
        /// Show the item tooltip on hover.
        show_tooltip: bool,
        /// Show stack count and durability decorations.
        show_decorations: bool,
        /// Text rendered beside the item.
        description: Option<String>,
    },
}

/// An input field with its common attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputSpec {
    /// Key under which the submitted value is reported.
    pub id: String,
    /// Formatted label; falls back to the id.
    pub label: String,
    /// Type-specific settings.
    pub kind: InputKind,
}

/// Type-specific input settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputKind {
    /// A checkbox.
    Boolean {
        /// Initial state.
        initial: bool,
        /// Value submitted when checked.
        on_true: Option<String>,
        /// Value submitted when unchecked.
        on_false: Option<String>,
    },
    /// A slider over `[min, max]`.
    NumberRange {
        /// Lower bound, strictly below `max`.
        min: f64,
        /// Upper bound.
        max: f64,
        /// Slider increment.
        step: f64,
        /// Starting value.
        initial: f64,
        /// Width in pixels.
        width: u32,
        /// Translation-style format for the label, e.g. `%s: %s`.
        label_format: Option<String>,
    },
    /// A free-text field.
    Text {
        /// Prefilled text.
        initial: String,
        /// Width in pixels.
        width: u32,
        /// Maximum length; zero means unlimited.
        max_length: u32,
        /// Whether the label is drawn.
        label_visible: bool,
        /// Multiline settings, when the field spans several lines.
        multiline: Option<Multiline>,
    },
    /// A cycling button over fixed options.
    SingleOption {
        /// Width in pixels.
        width: u32,
        /// Whether the label is drawn.
        label_visible: bool,
        /// Available options in order.
        options: Vec<OptionEntry>,
    },
}

/// Size limits of a multiline text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Multiline {
    /// Visible line count.
    pub max_lines: u32,
    /// Characters per line.
    pub max_columns: u32,
}

/// One choice of a single-option input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionEntry {
    /// Submitted value.
    pub value: String,
    /// Formatted text shown to the player.
    pub display_text: String,
    /// Whether this option starts selected.
    pub initially_selected: bool,
}

/// Button layout of a dialog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DialogTypeSpec {
    /// Two buttons: confirm and cancel.
    Confirmation {
        /// Affirmative button.
        confirm: ActionButton,
        /// Negative button.
        cancel: ActionButton,
    },
    /// A single acknowledgement button.
    Notice {
        /// The acknowledgement button.
        exit: ActionButton,
    },
    /// A grid of buttons with an optional exit button.
    MultiAction {
        /// Grid buttons in order.
        buttons: Vec<ActionButton>,
        /// Button shown below the grid.
        exit: Option<ActionButton>,
        /// Grid column count.
        columns: u32,
    },
}

/// A clickable button.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionButton {
    /// Formatted label.
    pub text: String,
    /// Formatted hover text.
    pub description: String,
    /// Width in pixels.
    pub width: u32,
    /// What happens on click; `None` only closes the dialog.
    pub action: Option<ActionSpec>,
}

/// Who runs a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandScope {
    /// The clicking player.
    Player,
    /// The server console.
    Console,
}

/// An action attached to a button.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionSpec {
    /// Close the dialog and any open screen.
    Close,
    /// Close the dialog and return to the previous screen.
    Return,
    /// Copy text to the player's clipboard.
    CopyToClipboard {
        /// Copied text.
        text: String,
    },
    /// Open another dialog.
    ShowDialog {
        /// Target catalog id.
        target_dialog_id: String,
        /// Target compiled during the same compile call.
        dialog: Box<DialogDefinition>,
    },
    /// Open a URL after confirmation.
    OpenUrl {
        /// Target URL.
        url: String,
    },
    /// Run a command template, resolved when the button is clicked.
    RunCommand {
        /// Unresolved command template.
        template: String,
        /// Sender of the resolved command.
        scope: CommandScope,
    },
    /// Put a command template into the player's chat box.
    SuggestCommand {
        /// Unresolved command template.
        template: String,
    },
    /// Fire a custom click event routed through the action registry.
    Custom {
        /// Registry key.
        key: Key,
    },
}

impl ActionSpec {
    /// Short name matching the configuration `type` field.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Close => "close",
            Self::Return => "return",
            Self::CopyToClipboard { .. } => "copy_to_clipboard",
            Self::ShowDialog { .. } => "show_dialog",
            Self::OpenUrl { .. } => "open_url",
            Self::RunCommand {
                scope: CommandScope::Player,
                ..
            } => "run_command",
            Self::RunCommand {
                scope: CommandScope::Console,
                ..
            } => "console_command",
            Self::SuggestCommand { .. } => "suggest_command",
            Self::Custom { .. } => "custom",
        }
    }
}

impl DialogTypeSpec {
    /// Short name matching the configuration `type` field.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Confirmation { .. } => "confirmation",
            Self::Notice { .. } => "notice",
            Self::MultiAction { .. } => "multi_action",
        }
    }

    /// All buttons in display order, exit button last.
    pub fn buttons(&self) -> Vec<&ActionButton> {
        match self {
            Self::Confirmation { confirm, cancel } => vec![confirm, cancel],
            Self::Notice { exit } => vec![exit],
            Self::MultiAction { buttons, exit, .. } => buttons.iter().chain(exit.as_ref()).collect(),
        }
    }
}
