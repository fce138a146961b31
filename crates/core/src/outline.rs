//! Arena-backed outline model.
//!
//! Every node lives in a flat map keyed by a stable `NodeId` and keeps an
//! explicit parent reference, so ancestry questions (depth, label path) are
//! answered without walking any view structure.

use std::collections::HashMap;
use std::fmt;

use tracing::trace;

use crate::model::{NEW_ITEM_LABEL, TreeNode};

/// Stable identifier of a node within one outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Raw numeric value, unique for the lifetime of the outline.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    label: String,
    checked: bool,
    parent: Option<NodeId>,
    children: Option<Vec<NodeId>>,
}

/// What a `remove` call changed besides dropping the subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    /// Number of nodes dropped (target plus descendants).
    pub removed: usize,
    /// Parent whose emptied children container was pruned.
    pub pruned_parent: Option<NodeId>,
    /// Placeholder inserted because the root became empty.
    pub placeholder: Option<NodeId>,
}

/// An ordered forest of labeled nodes.
#[derive(Debug, Clone, Default)]
pub struct Outline {
    entries: HashMap<NodeId, Entry>,
    roots: Vec<NodeId>,
    next_id: u64,
}

impl Outline {
    /// Create an empty outline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an outline from serialized nodes, preserving order and containers.
    pub fn from_nodes(nodes: &[TreeNode]) -> Self {
        let mut outline = Self::new();
        for node in nodes {
            let id = outline.materialize(node, None);
            outline.roots.push(id);
        }
        outline
    }

    fn materialize(&mut self, node: &TreeNode, parent: Option<NodeId>) -> NodeId {
        let id = self.allocate(&node.label, parent);
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.checked = node.checked;
        }
        if let Some(children) = &node.children {
            let ids: Vec<NodeId> = children
                .iter()
                .map(|child| self.materialize(child, Some(id)))
                .collect();
            if let Some(entry) = self.entries.get_mut(&id) {
                entry.children = Some(ids);
            }
        }
        id
    }

    fn allocate(&mut self, label: &str, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.entries.insert(
            id,
            Entry {
                label: label.to_string(),
                checked: false,
                parent,
                children: None,
            },
        );
        id
    }

    /// Serialize the outline back into nodes, in display order.
    pub fn to_nodes(&self) -> Vec<TreeNode> {
        self.roots.iter().filter_map(|id| self.to_node(*id)).collect()
    }

    fn to_node(&self, id: NodeId) -> Option<TreeNode> {
        let entry = self.entries.get(&id)?;
        Some(TreeNode {
            label: entry.label.clone(),
            checked: entry.checked,
            children: entry
                .children
                .as_ref()
                .map(|ids| ids.iter().filter_map(|c| self.to_node(*c)).collect()),
        })
    }

    /// Top-level nodes in order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the outline has no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check whether `id` is part of this outline.
    pub fn contains(&self, id: NodeId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Label of a node.
    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.entries.get(&id).map(|e| e.label.as_str())
    }

    /// Replace a node's label. Returns `false` for unknown ids.
    pub fn set_label(&mut self, id: NodeId, label: impl Into<String>) -> bool {
        match self.entries.get_mut(&id) {
            Some(entry) => {
                entry.label = label.into();
                true
            }
            None => false,
        }
    }

    /// Whether a node is checked.
    pub fn is_checked(&self, id: NodeId) -> bool {
        self.entries.get(&id).is_some_and(|e| e.checked)
    }

    /// Set a node's checked flag. Returns `false` for unknown ids.
    pub fn set_checked(&mut self, id: NodeId, checked: bool) -> bool {
        match self.entries.get_mut(&id) {
            Some(entry) => {
                entry.checked = checked;
                true
            }
            None => false,
        }
    }

    /// Clear the checked flag on every node.
    pub fn clear_checked(&mut self) {
        for entry in self.entries.values_mut() {
            entry.checked = false;
        }
    }

    /// Checked nodes in display order.
    pub fn checked_ids(&self) -> Vec<NodeId> {
        self.display_order()
            .into_iter()
            .filter(|id| self.is_checked(*id))
            .collect()
    }

    /// Parent of a node (`None` for roots and unknown ids).
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entries.get(&id).and_then(|e| e.parent)
    }

    /// Children container of a node (`None` for leaves and unknown ids).
    pub fn children(&self, id: NodeId) -> Option<&[NodeId]> {
        self.entries
            .get(&id)
            .and_then(|e| e.children.as_deref())
    }

    /// Whether the node carries a children container.
    pub fn is_internal(&self, id: NodeId) -> bool {
        self.children(id).is_some()
    }

    /// Depth of a node, counting roots as depth 1.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 1;
        let mut current = self.parent(id);
        while let Some(parent) = current {
            depth += 1;
            current = self.parent(parent);
        }
        depth
    }

    /// Labels from the root down to and including `id`.
    pub fn path_from_root(&self, id: NodeId) -> Vec<String> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            match self.entries.get(&node) {
                Some(entry) => {
                    path.push(entry.label.clone());
                    current = entry.parent;
                }
                None => break,
            }
        }
        path.reverse();
        path
    }

    /// Whether `id` is `ancestor` or lies inside its subtree.
    pub fn is_within(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// All node ids in depth-first display order.
    pub fn display_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.entries.len());
        for root in &self.roots {
            self.collect_subtree(*root, &mut order);
        }
        order
    }

    /// First node in display order carrying `label`.
    pub fn find_label(&self, label: &str) -> Option<NodeId> {
        self.display_order()
            .into_iter()
            .find(|id| self.label(*id) == Some(label))
    }

    fn collect_subtree(&self, id: NodeId, out: &mut Vec<NodeId>) {
        out.push(id);
        if let Some(children) = self.children(id) {
            for child in children {
                self.collect_subtree(*child, out);
            }
        }
    }

    fn siblings_mut(&mut self, id: NodeId) -> Option<&mut Vec<NodeId>> {
        match self.entries.get(&id)?.parent {
            Some(parent) => self.entries.get_mut(&parent)?.children.as_mut(),
            None => Some(&mut self.roots),
        }
    }

    /// Insert a `"New item"` leaf as the first child of `parent`, creating the
    /// container if absent.
    pub fn insert_first_child(&mut self, parent: NodeId) -> Option<NodeId> {
        if !self.contains(parent) {
            return None;
        }
        let id = self.allocate(NEW_ITEM_LABEL, Some(parent));
        if let Some(entry) = self.entries.get_mut(&parent) {
            entry.children.get_or_insert_with(Vec::new).insert(0, id);
        }
        trace!("Inserted child {} under {}", id, parent);
        Some(id)
    }

    /// Insert a `"New item"` leaf right after `id` at the same level.
    pub fn insert_after(&mut self, id: NodeId) -> Option<NodeId> {
        let parent = self.entries.get(&id)?.parent;
        let position = self.siblings_mut(id)?.iter().position(|s| *s == id)?;
        let new_id = self.allocate(NEW_ITEM_LABEL, parent);
        self.siblings_mut(id)?.insert(position + 1, new_id);
        trace!("Inserted sibling {} after {}", new_id, id);
        Some(new_id)
    }

    /// Append a `"New item"` leaf at the end of the root level.
    pub fn push_root(&mut self) -> NodeId {
        let id = self.allocate(NEW_ITEM_LABEL, None);
        self.roots.push(id);
        id
    }

    /// Remove `id` and its subtree.
    ///
    /// A parent left with an empty container loses the container; an emptied
    /// root level receives a placeholder leaf.
    pub fn remove(&mut self, id: NodeId) -> Option<Removal> {
        let parent = self.entries.get(&id)?.parent;
        let mut doomed = Vec::new();
        self.collect_subtree(id, &mut doomed);

        if let Some(siblings) = self.siblings_mut(id) {
            siblings.retain(|s| *s != id);
        }
        for node in &doomed {
            self.entries.remove(node);
        }

        let mut pruned_parent = None;
        if let Some(parent) = parent
            && let Some(entry) = self.entries.get_mut(&parent)
            && entry.children.as_ref().is_some_and(Vec::is_empty)
        {
            entry.children = None;
            pruned_parent = Some(parent);
        }

        let placeholder = if self.roots.is_empty() {
            Some(self.push_root())
        } else {
            None
        };

        trace!("Removed {} ({} nodes)", id, doomed.len());
        Some(Removal {
            removed: doomed.len(),
            pruned_parent,
            placeholder,
        })
    }

    /// Swap `id` with its previous sibling. Returns `false` at the edge.
    pub fn move_up(&mut self, id: NodeId) -> bool {
        let Some(siblings) = self.siblings_mut(id) else {
            return false;
        };
        match siblings.iter().position(|s| *s == id) {
            Some(index) if index > 0 => {
                siblings.swap(index, index - 1);
                true
            }
            _ => false,
        }
    }

    /// Swap `id` with its next sibling. Returns `false` at the edge.
    pub fn move_down(&mut self, id: NodeId) -> bool {
        let Some(siblings) = self.siblings_mut(id) else {
            return false;
        };
        match siblings.iter().position(|s| *s == id) {
            Some(index) if index + 1 < siblings.len() => {
                siblings.swap(index, index + 1);
                true
            }
            _ => false,
        }
    }
}

// The outline is moved between the event loop and async save tasks.
static_assertions::assert_impl_all!(Outline: Send, Sync);
