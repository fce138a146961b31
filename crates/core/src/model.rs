//! Serializable tree node model.
//!
//! `TreeNode` is the unit handed to the editor by `load` and returned by
//! `get_data`. Its JSON form is an array of objects with a `label`, an
//! optional `checked` flag and an optional `children` array.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{EditorError, EditorResult};

/// Label given to every node inserted by the editor itself.
pub const NEW_ITEM_LABEL: &str = "New item";

/// One entry of an outline.
///
/// `children: Some(vec![])` is an internal node with an empty container,
/// `children: None` is a leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Free-text title. Older files used the key `title`.
    #[serde(alias = "title")]
    pub label: String,
    /// Selection flag, only meaningful in checkbox and radio mode.
    #[serde(
        default,
        skip_serializing_if = "is_false",
        deserialize_with = "deserialize_checked"
    )]
    pub checked: bool,
    /// Ordered children; presence marks an internal node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    /// Create a new leaf node.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            checked: false,
            children: None,
        }
    }

    /// Create the placeholder leaf the editor inserts on add and on an emptied root.
    pub fn placeholder() -> Self {
        Self::new(NEW_ITEM_LABEL)
    }

    /// Set the checked flag.
    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Add a child node, creating the children container if needed.
    pub fn with_child(mut self, child: TreeNode) -> Self {
        self.children.get_or_insert_with(Vec::new).push(child);
        self
    }

    /// Add multiple children, creating the container even if `children` is empty.
    pub fn with_children(mut self, children: impl IntoIterator<Item = TreeNode>) -> Self {
        self.children.get_or_insert_with(Vec::new).extend(children);
        self
    }

    /// Check if this node has a children container (possibly empty).
    pub fn is_internal(&self) -> bool {
        self.children.is_some()
    }

    /// Number of nodes in this subtree, including this one.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .flatten()
            .map(TreeNode::subtree_len)
            .sum::<usize>()
    }

    /// Number of levels in this subtree (a leaf has height 1).
    pub fn height(&self) -> usize {
        1 + self
            .children
            .iter()
            .flatten()
            .map(TreeNode::height)
            .max()
            .unwrap_or(0)
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Accept `true`/`false` as booleans or strings; anything else is unchecked.
fn deserialize_checked<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::String(s) => s == "true",
        _ => false,
    })
}

/// Parse a JSON array of tree nodes.
///
/// # Errors
///
/// Returns `EditorError::MalformedNode` if the document is not an array of
/// nodes or any node lacks a `label`.
pub fn parse_nodes(json: &str) -> EditorResult<Vec<TreeNode>> {
    serde_json::from_str(json).map_err(|source| EditorError::MalformedNode { source })
}

/// Serialize nodes as pretty-printed JSON.
pub fn to_json(nodes: &[TreeNode]) -> EditorResult<String> {
    serde_json::to_string_pretty(nodes).map_err(EditorError::Serialize)
}

/// Total number of nodes in a forest.
pub fn count_nodes(nodes: &[TreeNode]) -> usize {
    nodes.iter().map(TreeNode::subtree_len).sum()
}

/// Number of levels in a forest (0 for an empty one).
pub fn forest_height(nodes: &[TreeNode]) -> usize {
    nodes.iter().map(TreeNode::height).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_node_new_is_leaf() {
        let node = TreeNode::new("Task");
        assert_eq!(node.label, "Task");
        assert!(!node.checked);
        assert!(!node.is_internal());
    }

    #[test]
    fn test_with_children_empty_creates_container() {
        let node = TreeNode::new("Parent").with_children(Vec::new());
        assert_eq!(node.children, Some(Vec::new()));
        assert!(node.is_internal());
    }

    #[test]
    fn test_serialize_leaf_omits_optional_fields() {
        let json = serde_json::to_string(&TreeNode::new("A")).unwrap();
        assert_eq!(json, r#"{"label":"A"}"#);
    }

    #[test]
    fn test_serialize_keeps_empty_children_container() {
        let node = TreeNode::new("A").with_children(Vec::new()).with_checked(true);
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, r#"{"label":"A","checked":true,"children":[]}"#);
    }

    #[test]
    fn test_parse_accepts_title_alias() {
        let nodes = parse_nodes(r#"[{"title":"Legacy","children":[{"title":"Child"}]}]"#).unwrap();
        assert_eq!(nodes[0].label, "Legacy");
        assert_eq!(nodes[0].children.as_ref().unwrap()[0].label, "Child");
    }

    #[test]
    fn test_parse_accepts_string_checked() {
        let nodes = parse_nodes(
            r#"[{"label":"a","checked":"true"},{"label":"b","checked":"false"},{"label":"c","checked":null}]"#,
        )
        .unwrap();
        assert!(nodes[0].checked);
        assert!(!nodes[1].checked);
        assert!(!nodes[2].checked);
    }

    #[test]
    fn test_parse_missing_label_fails() {
        let result = parse_nodes(r#"[{"checked":true}]"#);
        assert!(matches!(result, Err(EditorError::MalformedNode { .. })));
    }

    #[test]
    fn test_parse_nested_missing_label_fails() {
        let result = parse_nodes(r#"[{"label":"ok","children":[{"children":[]}]}]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_count_and_height() {
        let nodes = vec![
            TreeNode::new("A").with_child(TreeNode::new("B").with_child(TreeNode::new("C"))),
            TreeNode::new("D"),
        ];
        assert_eq!(count_nodes(&nodes), 4);
        assert_eq!(forest_height(&nodes), 3);
        assert_eq!(forest_height(&[]), 0);
    }
}
