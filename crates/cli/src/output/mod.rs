//! Output formatting module for Arbor
//!
//! Renders outlines as indented text trees for the terminal.

use arbor_core::{SelectionMode, TreeNode};

/// Visual prefix characters for tree structure.
mod tree_chars {
    /// Branch connector for intermediate items.
    pub const BRANCH: &str = "\u{251C}\u{2500}\u{2500} "; // ├──
    /// Last item connector.
    pub const LAST_BRANCH: &str = "\u{2514}\u{2500}\u{2500} "; // └──
    /// Vertical line for continuing structure.
    pub const VERTICAL: &str = "\u{2502}   "; // │
    /// Empty space for alignment.
    pub const SPACE: &str = "    ";
}

/// Format an outline as a text tree.
///
/// Produces output in the format:
/// ```text
/// Groceries
/// ├── [x] Milk
/// └── [ ] Bread
/// ```
///
/// Roots carry no connector. Selection markers are drawn for
/// `SelectionMode::Checkbox` and `SelectionMode::Radio` only.
pub fn format_tree(nodes: &[TreeNode], mode: SelectionMode) -> String {
    if nodes.is_empty() {
        return "Outline is empty.".to_string();
    }
    let mut lines = Vec::new();
    for node in nodes {
        lines.push(format!("{}{}", marker(node, mode), node.label));
        push_children(&mut lines, node, String::new(), mode);
    }
    lines.join("\n")
}

/// Recursively format the children of `node` below `prefix`.
fn push_children(lines: &mut Vec<String>, node: &TreeNode, prefix: String, mode: SelectionMode) {
    let Some(children) = &node.children else {
        return;
    };
    for (i, child) in children.iter().enumerate() {
        let is_last = i + 1 == children.len();
        let connector = if is_last {
            tree_chars::LAST_BRANCH
        } else {
            tree_chars::BRANCH
        };
        lines.push(format!(
            "{}{}{}{}",
            prefix,
            connector,
            marker(child, mode),
            child.label
        ));

        let continuation = if is_last {
            tree_chars::SPACE
        } else {
            tree_chars::VERTICAL
        };
        push_children(lines, child, format!("{}{}", prefix, continuation), mode);
    }
}

fn marker(node: &TreeNode, mode: SelectionMode) -> &'static str {
    match (mode, node.checked) {
        (SelectionMode::None, _) => "",
        (SelectionMode::Checkbox, true) => "[x] ",
        (SelectionMode::Checkbox, false) => "[ ] ",
        (SelectionMode::Radio, true) => "(\u{2022}) ",
        (SelectionMode::Radio, false) => "( ) ",
    }
}
