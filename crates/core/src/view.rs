//! Flattened, render-ready projection of an editor.
//!
//! Renderers never walk the outline themselves. They ask for `rows` and draw
//! each one; interaction goes back through the `TreeEditor` API using the
//! row's `id`.

use crate::config::SelectionMode;
use crate::editor::{Interaction, TreeEditor};
use crate::outline::NodeId;

/// State of a row's expand/collapse arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expander {
    /// Leaf: no arrow.
    None,
    Expanded,
    Collapsed,
}

/// The selection affordance shown before a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    None,
    Checkbox(bool),
    Radio(bool),
}

/// One visible line of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: NodeId,
    /// Nesting level, roots are 1.
    pub depth: usize,
    /// Label text, or the edit buffer while editing.
    pub label: String,
    pub expander: Expander,
    pub affordance: Affordance,
    /// Whether the more-actions affordance is shown.
    pub more_actions: bool,
    /// Whether the row is inside a subtree that is flashing before removal.
    pub flashing: bool,
    pub editing: bool,
    pub is_cursor: bool,
    /// Whether the open menu is armed on this row.
    pub armed: bool,
}

/// Visible rows of `editor` in display order.
pub fn rows(editor: &TreeEditor) -> Vec<Row> {
    let outline = editor.outline();
    let config = editor.config();
    let (editing, buffer) = match editor.interaction() {
        Interaction::Editing { target, buffer } => (Some(*target), Some(buffer.as_str())),
        _ => (None, None),
    };
    let armed = editor.armed_target();

    editor
        .visible_ids()
        .into_iter()
        .map(|id| {
            let checked = outline.is_checked(id);
            let is_editing = editing == Some(id);
            Row {
                id,
                depth: outline.depth(id),
                label: match buffer {
                    Some(text) if is_editing => text.to_string(),
                    _ => outline.label(id).unwrap_or_default().to_string(),
                },
                expander: if outline.children(id).is_none_or(<[_]>::is_empty) {
                    Expander::None
                } else if editor.is_expanded(id) {
                    Expander::Expanded
                } else {
                    Expander::Collapsed
                },
                affordance: match config.selection_mode {
                    SelectionMode::None => Affordance::None,
                    SelectionMode::Checkbox => Affordance::Checkbox(checked),
                    SelectionMode::Radio => Affordance::Radio(checked),
                },
                more_actions: config.editable,
                flashing: editor.is_transitioning(id),
                editing: is_editing,
                is_cursor: editor.cursor() == Some(id),
                armed: armed == Some(id),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorOptions;
    use crate::editor::HostContainer;
    use crate::menu::{MenuAction, Point};
    use crate::model::TreeNode;
    use std::time::{Duration, Instant};

    fn editor(nodes: Vec<TreeNode>) -> TreeEditor {
        let mut editor = TreeEditor::create(HostContainer::new("view", 40, 20), None).unwrap();
        editor.load(&nodes);
        editor
    }

    #[test]
    fn test_rows_follow_expand_state() {
        let mut editor = editor(vec![
            TreeNode::new("A").with_child(TreeNode::new("A1")),
            TreeNode::new("Empty").with_children(Vec::new()),
        ]);
        let rows_before = rows(&editor);
        assert_eq!(rows_before.len(), 3);
        assert_eq!(rows_before[0].expander, Expander::Expanded);
        assert_eq!(rows_before[1].depth, 2);
        assert_eq!(rows_before[1].expander, Expander::None);
        // an empty container shows no arrow
        assert_eq!(rows_before[2].expander, Expander::None);

        editor.collapse(rows_before[0].id);
        let rows_after = rows(&editor);
        assert_eq!(rows_after.len(), 2);
        assert_eq!(rows_after[0].expander, Expander::Collapsed);
    }

    #[test]
    fn test_affordance_follows_mode() {
        let mut editor = editor(vec![TreeNode::new("A").with_checked(true)]);
        assert_eq!(rows(&editor)[0].affordance, Affordance::None);
        editor.configure(EditorOptions::new().with_selection_mode(SelectionMode::Checkbox));
        assert_eq!(rows(&editor)[0].affordance, Affordance::Checkbox(true));
        editor.configure(EditorOptions::new().with_selection_mode(SelectionMode::Radio));
        assert_eq!(rows(&editor)[0].affordance, Affordance::Radio(true));
    }

    #[test]
    fn test_read_only_hides_more_actions() {
        let mut editor = editor(vec![TreeNode::new("A")]);
        assert!(rows(&editor)[0].more_actions);
        editor.configure(EditorOptions::new().with_editable(false));
        assert!(!rows(&editor)[0].more_actions);
    }

    #[test]
    fn test_editing_row_shows_buffer() {
        let mut editor = editor(vec![TreeNode::new("A")]);
        let id = rows(&editor)[0].id;
        editor.begin_edit(id).unwrap();
        editor.edit_input('!');
        let row = &rows(&editor)[0];
        assert!(row.editing);
        assert_eq!(row.label, "A!");
    }

    #[test]
    fn test_flashing_marks_whole_subtree() {
        let mut editor = editor(vec![
            TreeNode::new("A").with_child(TreeNode::new("A1")),
            TreeNode::new("B"),
        ]);
        editor.configure(EditorOptions::new().with_delete_flash(Duration::from_millis(200)));
        let a = rows(&editor)[0].id;
        editor.open_menu(a, Point::default()).unwrap();
        assert!(rows(&editor)[0].armed);
        editor.choose_at(MenuAction::Delete, Instant::now());

        let flags: Vec<bool> = rows(&editor).iter().map(|r| r.flashing).collect();
        assert_eq!(flags, vec![true, true, false]);
    }
}
