//! Editor configuration.
//!
//! `EditorConfig` is the effective configuration; `EditorOptions` is a partial
//! update merged into it by `TreeEditor::configure`.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tree-wide semantics of the per-node selection affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// No selection affordance.
    #[default]
    None,
    /// Independent check boxes.
    Checkbox,
    /// At most one node checked tree-wide.
    Radio,
}

impl SelectionMode {
    /// Returns the string representation used on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionMode::None => "none",
            SelectionMode::Checkbox => "checkbox",
            SelectionMode::Radio => "radio",
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SelectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(SelectionMode::None),
            "checkbox" | "checkboxes" => Ok(SelectionMode::Checkbox),
            "radio" | "radios" => Ok(SelectionMode::Radio),
            other => Err(format!(
                "invalid selection mode '{}' (expected none, checkbox or radio)",
                other
            )),
        }
    }
}

/// Effective editor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Whether internal nodes start expanded.
    pub expanded: bool,
    /// Selection affordance semantics.
    pub selection_mode: SelectionMode,
    /// Whether labels can be edited and the more-actions menu is shown.
    pub editable: bool,
    /// Deepest level (roots are level 1) "add child" may create.
    pub max_depth: Option<usize>,
    /// How long a deleted node flashes before it is removed.
    #[serde(with = "millis")]
    pub delete_flash: Duration,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            expanded: true,
            selection_mode: SelectionMode::None,
            editable: true,
            max_depth: None,
            delete_flash: Duration::ZERO,
        }
    }
}

impl EditorConfig {
    /// Merge a partial update, returning what changed.
    pub fn merge(&mut self, options: &EditorOptions) -> ConfigChanges {
        let mut changes = ConfigChanges::default();
        if let Some(expanded) = options.expanded {
            self.expanded = expanded;
            changes.expanded = true;
        }
        if let Some(mode) = options.selection_mode {
            changes.selection_mode = mode != self.selection_mode;
            self.selection_mode = mode;
        }
        if let Some(editable) = options.editable {
            changes.editable = editable != self.editable;
            self.editable = editable;
        }
        if let Some(max_depth) = options.max_depth {
            self.max_depth = max_depth;
        }
        if let Some(flash) = options.delete_flash {
            self.delete_flash = flash;
        }
        changes
    }
}

/// Which re-render steps a merge requires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigChanges {
    /// `expanded` was supplied, so every internal node is reset to it.
    pub expanded: bool,
    /// The selection mode changed.
    pub selection_mode: bool,
    /// The editable flag changed.
    pub editable: bool,
}

/// Partial configuration update; `None` leaves a setting untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorOptions {
    pub expanded: Option<bool>,
    pub selection_mode: Option<SelectionMode>,
    pub editable: Option<bool>,
    /// `Some(None)` removes the depth cap.
    pub max_depth: Option<Option<usize>>,
    pub delete_flash: Option<Duration>,
}

impl EditorOptions {
    /// Create an empty update
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial expand state
    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.expanded = Some(expanded);
        self
    }

    /// Set the selection mode
    pub fn with_selection_mode(mut self, mode: SelectionMode) -> Self {
        self.selection_mode = Some(mode);
        self
    }

    /// Set whether the tree is editable
    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = Some(editable);
        self
    }

    /// Cap (or uncap with `None`) the nesting depth
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Set the delete flash duration
    pub fn with_delete_flash(mut self, flash: Duration) -> Self {
        self.delete_flash = Some(flash);
        self
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
