//! Rule-based checks over raw dialog documents.
//!
//! The validator never fails and never blocks on its own. It reads the
//! documents as authored, independent of compilation, and collects
//! [`ValidationIssue`]s in order. Whether errors stop a dialog from opening is
//! decided by the caller's [`ValidationPolicy`].

use std::{cmp::Ordering, collections::HashSet, fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::{DialogCatalog, Document, PlainText, TextFormatter, Value};

/// How serious an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Style or migration hint.
    Info,
    /// Probably unintended, but the dialog still works.
    Warning,
    /// The dialog will not behave as written.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        })
    }
}

/// One finding of the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Severity.
    pub severity: Severity,
    /// Dialog the issue belongs to.
    pub dialog_id: String,
    /// Input the issue belongs to; `input[<index>]` when the input has no id.
    pub input_id: Option<String>,
    /// What is wrong.
    pub message: String,
    /// How to fix it.
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    /// `dialog` or `dialog -> input`.
    pub fn location(&self) -> String {
        match &self.input_id {
            Some(input) => format!("{} -> {}", self.dialog_id, input),
            None => self.dialog_id.clone(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.location(), self.message)
    }
}

/// Whether validation errors prevent a dialog from opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    /// Issues are reported only.
    #[default]
    Advisory,
    /// A dialog with any `Error` issue is refused.
    BlockOnError,
}

impl ValidationPolicy {
    /// True when `report` should stop the dialog from opening.
    pub fn blocks(self, report: &ValidationReport) -> bool {
        matches!(self, Self::BlockOnError) && report.has_errors()
    }
}

/// Ordered issues from one validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Issues in discovery order.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Number of issues with `severity`.
    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    /// Number of errors.
    pub fn errors(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Number of warnings.
    pub fn warnings(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// Number of info messages.
    pub fn infos(&self) -> usize {
        self.count(Severity::Info)
    }

    /// True when at least one error was found.
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    /// True when nothing was found.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues belonging to one dialog.
    pub fn for_dialog(&self, id: &str) -> Self {
        Self {
            issues: self
                .issues
                .iter()
                .filter(|i| i.dialog_id == id)
                .cloned()
                .collect(),
        }
    }

    /// `"N errors, N warnings, N info messages"`.
    pub fn summary(&self) -> String {
        format!(
            "{} errors, {} warnings, {} info messages",
            self.errors(),
            self.warnings(),
            self.infos()
        )
    }

    /// Emit every issue and a summary line through `tracing`.
    pub fn log(&self) {
        if self.is_clean() {
            info!("all dialog configurations are valid");
            return;
        }
        for issue in &self.issues {
            let location = issue.location();
            let suggestion = issue.suggestion.as_deref().unwrap_or("");
            match issue.severity {
                Severity::Error => error!(%location, suggestion, "{}", issue.message),
                Severity::Warning => warn!(%location, suggestion, "{}", issue.message),
                Severity::Info => info!(%location, suggestion, "{}", issue.message),
            }
        }
        info!("dialog validation summary: {}", self.summary());
    }

    /// Append another report.
    pub fn extend(&mut self, other: Self) {
        self.issues.extend(other.issues);
    }
}

/// True when `text` carries color or gradient markup.
fn uses_formatting(text: &str) -> bool {
    text.contains("<gradient:") || text.contains('&') || text.contains('#') || text.contains('§')
}

/// Collects issues for one dialog at a time.
struct Collector<'a> {
    /// Dialog being validated.
    dialog_id: &'a str,
    /// Issues so far.
    issues: Vec<ValidationIssue>,
}

impl Collector<'_> {
    /// Record an issue.
    fn push(
        &mut self,
        severity: Severity,
        input_id: Option<&str>,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) {
        self.issues.push(ValidationIssue {
            severity,
            dialog_id: self.dialog_id.to_string(),
            input_id: input_id.map(str::to_string),
            message: message.into(),
            suggestion: Some(suggestion.into()),
        });
    }
}

/// Checks dialog documents for semantic mistakes.
#[derive(Clone)]
pub struct Validator {
    /// Formatter used to measure formatted initial text.
    formatter: Arc<dyn TextFormatter>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(Arc::new(PlainText))
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator").finish_non_exhaustive()
    }
}

impl Validator {
    /// A validator measuring text with `formatter`.
    pub fn new(formatter: Arc<dyn TextFormatter>) -> Self {
        Self { formatter }
    }

    /// Validate every dialog in `catalog`, in sorted id order.
    pub fn validate_catalog(&self, catalog: &DialogCatalog) -> ValidationReport {
        let mut report = ValidationReport::default();
        for id in catalog.ids() {
            if let Some(doc) = catalog.get(id) {
                report.extend(self.validate(id, doc));
            }
        }
        report
    }

    /// Validate one dialog document as authored.
    pub fn validate(&self, dialog_id: &str, doc: &Document) -> ValidationReport {
        let mut c = Collector {
            dialog_id,
            issues: Vec::new(),
        };
        if DialogCatalog::is_legacy_layout(dialog_id, doc) {
            c.push(
                Severity::Info,
                None,
                "Dialog uses nested structure (dialog ID as root key)",
                "Consider moving content to root level for cleaner structure",
            );
        }
        let root = DialogCatalog::unwrap_legacy(dialog_id, doc);

        let mut seen = HashSet::new();
        if let Some(inputs) = root.get_value("inputs").and_then(Value::as_list) {
            for (index, input) in inputs.iter().enumerate() {
                if let Some(sec) = Document::from_value(input.clone()) {
                    self.input(&mut c, &sec, index, &mut seen);
                }
            }
        }

        if let Some(buttons) = root.get_section("buttons")
            && !buttons.contains("confirm")
            && !buttons.contains("cancel")
        {
            c.push(
                Severity::Warning,
                None,
                "No confirm or cancel buttons defined",
                "Add 'confirm' and/or 'cancel' button configurations",
            );
        }

        if !root.contains("title") {
            c.push(
                Severity::Warning,
                None,
                "No title specified",
                "Add a 'title' field to improve user experience",
            );
        }

        ValidationReport { issues: c.issues }
    }

    /// Checks for one input entry.
    fn input(
        &self,
        c: &mut Collector<'_>,
        sec: &Document,
        index: usize,
        seen: &mut HashSet<String>,
    ) {
        let Some(id) = sec
            .get_opt::<String>("id")
            .filter(|s| !s.trim().is_empty())
        else {
            c.push(
                Severity::Error,
                Some(&format!("input[{index}]")),
                "Input is missing required 'id' field",
                "Add an 'id' field with a unique identifier",
            );
            return;
        };
        if !seen.insert(id.clone()) {
            c.push(
                Severity::Error,
                Some(&id),
                format!("Duplicate input id '{id}'"),
                "Give every input in a dialog a unique 'id'",
            );
        }

        let kind = sec.get_opt::<String>("type").map(|t| t.to_lowercase());
        if kind.is_none() {
            c.push(
                Severity::Warning,
                Some(&id),
                "Input type not specified, defaulting to 'text'",
                "Explicitly set 'type: text' or choose another input type",
            );
        }
        match kind.as_deref() {
            None | Some("text") => self.text_input(c, sec, &id),
            Some("number_range") => number_range_input(c, sec, &id),
            Some("boolean") => boolean_input(c, sec, &id),
            Some(_) => {}
        }
    }

    /// Length checks for text inputs.
    fn text_input(&self, c: &mut Collector<'_>, sec: &Document, id: &str) {
        let max_length = sec
            .get_value("max_length")
            .filter(|v| v.is_number())
            .and_then(Value::as_i64);
        let Some(max_length) = max_length else {
            return;
        };
        if let Some(initial) = sec.get_value("initial").and_then(Value::as_str)
            && uses_formatting(initial)
        {
            let formatted = self.formatter.format(initial).chars().count() as i64;
            if max_length > 0 && formatted > max_length {
                c.push(
                    Severity::Warning,
                    Some(id),
                    format!(
                        "Initial text with formatting ({formatted} chars) exceeds max_length ({max_length})"
                    ),
                    format!(
                        "Increase max_length to at least {} or simplify initial text",
                        formatted + 50
                    ),
                );
            }
            if max_length > 0 && max_length < 50 {
                c.push(
                    Severity::Info,
                    Some(id),
                    "Using formatted initial text with low max_length may cause issues",
                    "Consider using max_length of 50+ when using formatted text",
                );
            }
        }
        if max_length < 1 {
            c.push(
                Severity::Warning,
                Some(id),
                format!("max_length is set to {max_length} (effectively unlimited)"),
                "Set a reasonable max_length (e.g., 50-500) or remove the field",
            );
        }
    }
}

/// Range checks; only applied when both bounds are numbers.
///
/// NaN and infinite values are errors, since the compiler drops such inputs.
fn number_range_input(c: &mut Collector<'_>, sec: &Document, id: &str) {
    let num = |key: &str| sec.get_value(key).and_then(Value::as_f64);
    let (Some(min), Some(max)) = (num("min"), num("max")) else {
        return;
    };
    let fields = [
        ("min", Some(min)),
        ("max", Some(max)),
        ("step", num("step")),
        ("initial", num("initial")),
    ];
    for (field, value) in fields {
        if let Some(v) = value
            && !v.is_finite()
        {
            c.push(
                Severity::Error,
                Some(id),
                format!("{field} value ({v}) must be a finite number"),
                format!("Replace '{field}' with a finite number"),
            );
        }
    }
    if !(min.is_finite() && max.is_finite()) {
        return;
    }
    if min.partial_cmp(&max) != Some(Ordering::Less) {
        c.push(
            Severity::Error,
            Some(id),
            format!("min value ({min:.2}) must be less than max value ({max:.2})"),
            "Ensure min < max for proper range functionality",
        );
    }
    if let Some(initial) = num("initial")
        && initial.is_finite()
        && !(min..=max).contains(&initial)
    {
        c.push(
            Severity::Warning,
            Some(id),
            format!("initial value ({initial:.2}) is outside range [{min:.2}, {max:.2}]"),
            "Set initial value within the min-max range",
        );
    }
}

/// `initial` must be a real boolean when present.
fn boolean_input(c: &mut Collector<'_>, sec: &Document, id: &str) {
    if let Some(v) = sec.get_value("initial")
        && v.as_bool().is_none()
    {
        c.push(
            Severity::Warning,
            Some(id),
            "Boolean input 'initial' should be a boolean value",
            "Change 'initial' to true or false",
        );
    }
}
