//! Shared helpers for editor integration tests.

use std::cell::RefCell;
use std::rc::Rc;

use arbor_core::{
    EditorConfig, HostContainer, MenuAction, NodeId, Outcome, Point, TreeEditor, TreeNode,
};

/// Create an editor on a standard host and load `nodes`.
pub fn editor_with(nodes: &[TreeNode], config: Option<EditorConfig>) -> TreeEditor {
    let mut editor = TreeEditor::create(HostContainer::new("integration", 80, 24), config)
        .expect("host has a name");
    editor.load(nodes);
    editor
}

/// Look up a node by label.
pub fn node(editor: &TreeEditor, label: &str) -> NodeId {
    editor
        .outline()
        .find_label(label)
        .unwrap_or_else(|| panic!("no node labelled {label}"))
}

/// Open the menu on `label` and choose `action`.
pub fn menu(editor: &mut TreeEditor, label: &str, action: MenuAction) -> Outcome {
    let target = node(editor, label);
    editor
        .open_menu(target, Point::new(1, 1))
        .expect("menu opens on an editable tree");
    editor.choose(action)
}

/// Count `on_change` invocations.
pub fn change_counter(editor: &mut TreeEditor) -> Rc<RefCell<usize>> {
    let count = Rc::new(RefCell::new(0));
    let handle = Rc::clone(&count);
    editor.on_change(move |_| *handle.borrow_mut() += 1);
    count
}

/// A three-level outline with mixed containers.
pub fn sample_outline() -> Vec<TreeNode> {
    vec![
        TreeNode::new("Inbox").with_children(vec![
            TreeNode::new("Call plumber").with_checked(true),
            TreeNode::new("Taxes").with_child(TreeNode::new("Receipts")),
        ]),
        TreeNode::new("Someday").with_children(Vec::new()),
        TreeNode::new("Done").with_checked(true),
    ]
}
