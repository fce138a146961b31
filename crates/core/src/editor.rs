//! The outline tree editor.
//!
//! `TreeEditor` owns an `Outline` (the data) plus the view state needed to
//! drive it interactively: per-node expand flags, the keyboard cursor, the
//! interaction state machine and an optional pending delete. Every mutation
//! goes to the model first; renderers read the result through `view::rows`.
//!
//! Interaction follows a small state machine:
//!
//! ```text
//! Idle --open_menu(target)--> MenuOpen(target) --choose/close/outside--> Idle
//! Idle --begin_edit(target)--> Editing(target) --commit/cancel--> Idle
//! ```

use std::collections::HashSet;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::config::{EditorConfig, EditorOptions, SelectionMode};
use crate::error::{EditorError, EditorResult};
use crate::menu::{MenuAction, Point, Size, menu_size, place_menu};
use crate::model::{self, TreeNode};
use crate::outline::{NodeId, Outline};
use crate::scope::{EditorId, Element, EventTarget, ScopedListener};

/// Called after every settled structural or label mutation.
pub type ChangeCallback = Box<dyn FnMut(&TreeEditor)>;

/// Called after a selection toggle with `(is_checked, label, path_from_root)`.
pub type CheckCallback = Box<dyn FnMut(bool, &str, &[String])>;

/// The container an editor renders into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostContainer {
    /// Name of the host, used in logs and titles.
    pub name: String,
    /// Available area, used as the viewport for menu placement.
    pub size: Size,
}

impl HostContainer {
    pub fn new(name: impl Into<String>, width: u16, height: u16) -> Self {
        Self {
            name: name.into(),
            size: Size::new(width, height),
        }
    }
}

/// Interaction state of one editor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Interaction {
    /// No menu open, no label being edited.
    #[default]
    Idle,
    /// The more-actions menu is open and armed on `target`.
    MenuOpen {
        target: NodeId,
        position: Point,
        highlighted: usize,
    },
    /// The label of `target` is being edited.
    Editing { target: NodeId, buffer: String },
}

/// Why an action had no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No menu open, so nothing is armed.
    NoTarget,
    /// The node is not part of the outline.
    UnknownNode,
    /// The editor is read-only.
    NotEditable,
    /// Adding a child would exceed `max_depth`.
    MaxDepth,
    /// The node is being removed by a delete flash.
    Transitioning,
    /// A move past the first or last sibling.
    AtEdge,
}

/// Result of a menu action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The outline changed; `focus` is the node the cursor moved to.
    Applied { focus: Option<NodeId> },
    /// A delete was scheduled behind its flash.
    Deferred,
    /// Nothing changed.
    Rejected(Rejection),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingDelete {
    target: NodeId,
    due: Instant,
}

/// An interactive outline editor bound to one host container.
pub struct TreeEditor {
    id: EditorId,
    host: HostContainer,
    config: EditorConfig,
    outline: Outline,
    expanded: HashSet<NodeId>,
    cursor: Option<NodeId>,
    interaction: Interaction,
    pending: Option<PendingDelete>,
    on_change: Option<ChangeCallback>,
    on_check: Option<CheckCallback>,
}

impl std::fmt::Debug for TreeEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeEditor")
            .field("id", &self.id)
            .field("host", &self.host)
            .field("config", &self.config)
            .field("nodes", &self.outline.len())
            .field("interaction", &self.interaction)
            .finish()
    }
}

impl TreeEditor {
    /// Create an editor bound to `host`.
    ///
    /// The editor starts with a single placeholder node.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::MissingHost` if the host has no name.
    pub fn create(host: HostContainer, config: Option<EditorConfig>) -> EditorResult<Self> {
        if host.name.trim().is_empty() {
            return Err(EditorError::MissingHost {
                reason: "host container has no name".to_string(),
            });
        }
        let mut editor = Self {
            id: EditorId::random(),
            host,
            config: config.unwrap_or_default(),
            outline: Outline::new(),
            expanded: HashSet::new(),
            cursor: None,
            interaction: Interaction::Idle,
            pending: None,
            on_change: None,
            on_check: None,
        };
        editor.load(&[]);
        debug!("Created editor {} on host '{}'", editor.id, editor.host.name);
        Ok(editor)
    }

    /// Replace the whole outline with `nodes`.
    ///
    /// View state is rebuilt from the configuration and any open menu,
    /// label edit or pending delete is dropped. An empty input yields a
    /// single placeholder node.
    pub fn load(&mut self, nodes: &[TreeNode]) -> &mut Self {
        self.outline = Outline::from_nodes(nodes);
        if self.outline.roots().is_empty() {
            self.outline.push_root();
        }
        self.interaction = Interaction::Idle;
        self.pending = None;
        self.reset_expanded(self.config.expanded);
        if self.config.selection_mode == SelectionMode::Radio {
            self.normalize_radio();
        }
        self.cursor = self.outline.roots().first().copied();
        debug!(
            "Editor {} loaded {} nodes",
            self.id,
            self.outline.len()
        );
        self
    }

    /// Parse a JSON array of nodes and load it.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::MalformedNode` if any node is malformed; the
    /// editor is left untouched in that case.
    pub fn load_json(&mut self, json: &str) -> EditorResult<&mut Self> {
        let nodes = model::parse_nodes(json)?;
        Ok(self.load(&nodes))
    }

    /// Merge configuration options and re-apply them to existing content.
    pub fn configure(&mut self, options: EditorOptions) -> &mut Self {
        let changes = self.config.merge(&options);
        if changes.expanded {
            self.reset_expanded(self.config.expanded);
        }
        if changes.selection_mode && self.config.selection_mode == SelectionMode::Radio {
            self.normalize_radio();
        }
        if changes.editable && !self.config.editable {
            self.interaction = Interaction::Idle;
        }
        trace!("Editor {} configured: {:?}", self.id, self.config);
        self
    }

    /// Register the change callback.
    pub fn on_change(&mut self, callback: impl FnMut(&TreeEditor) + 'static) -> &mut Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Register the selection callback.
    pub fn on_check(
        &mut self,
        callback: impl FnMut(bool, &str, &[String]) + 'static,
    ) -> &mut Self {
        self.on_check = Some(Box::new(callback));
        self
    }

    /// The outline as nodes, in display order.
    ///
    /// A label being edited contributes its current buffer. Collapsed
    /// subtrees are included in full.
    pub fn get_data(&self) -> Vec<TreeNode> {
        match &self.interaction {
            Interaction::Editing { target, buffer } => {
                let mut outline = self.outline.clone();
                outline.set_label(*target, buffer.clone());
                outline.to_nodes()
            }
            _ => self.outline.to_nodes(),
        }
    }

    /// `get_data` as pretty-printed JSON.
    pub fn get_json(&self) -> EditorResult<String> {
        model::to_json(&self.get_data())
    }

    pub fn id(&self) -> &EditorId {
        &self.id
    }

    pub fn host(&self) -> &HostContainer {
        &self.host
    }

    /// Update the host area used for menu placement.
    pub fn resize_host(&mut self, size: Size) {
        self.host.size = size;
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// Whether an internal node is currently expanded.
    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.expanded.contains(&id)
    }

    /// Node currently flashing before removal, if any.
    pub fn flashing(&self) -> Option<NodeId> {
        self.pending.map(|p| p.target)
    }

    /// Whether `id` lies inside a subtree that is being removed.
    pub fn is_transitioning(&self, id: NodeId) -> bool {
        self.pending
            .is_some_and(|p| self.outline.is_within(id, p.target))
    }

    fn reset_expanded(&mut self, expanded: bool) {
        self.expanded.clear();
        if expanded {
            for id in self.outline.display_order() {
                if self.outline.is_internal(id) {
                    self.expanded.insert(id);
                }
            }
        }
    }

    /// Keep only the first checked node in display order.
    fn normalize_radio(&mut self) {
        let checked = self.outline.checked_ids();
        for id in checked.iter().skip(1) {
            self.outline.set_checked(*id, false);
        }
        if checked.len() > 1 {
            debug!(
                "Editor {} cleared {} checked nodes for radio mode",
                self.id,
                checked.len() - 1
            );
        }
    }

    fn settle(&mut self) {
        if let Some(mut callback) = self.on_change.take() {
            callback(self);
            if self.on_change.is_none() {
                self.on_change = Some(callback);
            }
        }
    }

    // ------------------------------------------------------------------
    // Visible rows and cursor
    // ------------------------------------------------------------------

    /// Ids of visible nodes (children of collapsed nodes are hidden).
    pub fn visible_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        for root in self.outline.roots() {
            self.collect_visible(*root, &mut ids);
        }
        ids
    }

    fn collect_visible(&self, id: NodeId, out: &mut Vec<NodeId>) {
        out.push(id);
        if self.is_expanded(id)
            && let Some(children) = self.outline.children(id)
        {
            for child in children {
                self.collect_visible(*child, out);
            }
        }
    }

    pub fn cursor(&self) -> Option<NodeId> {
        self.cursor
    }

    /// Move the cursor to `id`. Returns `false` for unknown ids.
    pub fn set_cursor(&mut self, id: NodeId) -> bool {
        if self.outline.contains(id) {
            self.cursor = Some(id);
            true
        } else {
            false
        }
    }

    /// Move the cursor to the next visible row (clamps at the end).
    pub fn cursor_down(&mut self) {
        self.step_cursor(1);
    }

    /// Move the cursor to the previous visible row (clamps at the start).
    pub fn cursor_up(&mut self) {
        self.step_cursor(-1);
    }

    fn step_cursor(&mut self, delta: isize) {
        let visible = self.visible_ids();
        if visible.is_empty() {
            return;
        }
        let current = self
            .cursor
            .and_then(|c| visible.iter().position(|v| *v == c))
            .unwrap_or(0);
        let next = current
            .saturating_add_signed(delta)
            .min(visible.len() - 1);
        self.cursor = Some(visible[next]);
    }

    /// Move the cursor to the parent of the current node.
    pub fn cursor_parent(&mut self) {
        if let Some(parent) = self.cursor.and_then(|c| self.outline.parent(c)) {
            self.cursor = Some(parent);
        }
    }

    fn ensure_visible(&mut self, id: NodeId) {
        let mut current = self.outline.parent(id);
        while let Some(parent) = current {
            self.expanded.insert(parent);
            current = self.outline.parent(parent);
        }
    }

    // ------------------------------------------------------------------
    // Expand / collapse (view only, never fires on_change)
    // ------------------------------------------------------------------

    /// Flip the expand flag of an internal node.
    pub fn toggle_expanded(&mut self, id: NodeId) -> bool {
        if !self.outline.is_internal(id) {
            return false;
        }
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
        true
    }

    /// Expand an internal node.
    pub fn expand(&mut self, id: NodeId) -> bool {
        self.outline.is_internal(id) && self.expanded.insert(id)
    }

    /// Collapse an internal node.
    pub fn collapse(&mut self, id: NodeId) -> bool {
        self.expanded.remove(&id)
    }

    // ------------------------------------------------------------------
    // Selection affordance
    // ------------------------------------------------------------------

    /// Toggle the checkbox/radio of `id`.
    ///
    /// In radio mode every other node is cleared first. Fires `on_check`
    /// then `on_change`. Does nothing in `SelectionMode::None`.
    pub fn toggle_check(&mut self, id: NodeId) -> bool {
        if !self.outline.contains(id) {
            return false;
        }
        let checked = match self.config.selection_mode {
            SelectionMode::None => return false,
            SelectionMode::Checkbox => {
                let checked = !self.outline.is_checked(id);
                self.outline.set_checked(id, checked);
                checked
            }
            SelectionMode::Radio => {
                self.outline.clear_checked();
                self.outline.set_checked(id, true);
                true
            }
        };

        if let Some(mut callback) = self.on_check.take() {
            let label = self.outline.label(id).unwrap_or_default().to_string();
            let path = self.outline.path_from_root(id);
            callback(checked, &label, &path);
            if self.on_check.is_none() {
                self.on_check = Some(callback);
            }
        }
        self.settle();
        true
    }

    // ------------------------------------------------------------------
    // Context menu
    // ------------------------------------------------------------------

    /// Open the more-actions menu armed on `target`, anchored at `anchor`.
    pub fn open_menu(&mut self, target: NodeId, anchor: Point) -> Result<(), Rejection> {
        if !self.config.editable {
            return Err(Rejection::NotEditable);
        }
        if !self.outline.contains(target) {
            return Err(Rejection::UnknownNode);
        }
        if self.is_transitioning(target) {
            debug!("Menu refused on {} during delete flash", target);
            return Err(Rejection::Transitioning);
        }
        if matches!(self.interaction, Interaction::Editing { .. }) {
            self.commit_edit();
        }
        let position = place_menu(anchor, menu_size(), self.host.size);
        self.interaction = Interaction::MenuOpen {
            target,
            position,
            highlighted: 0,
        };
        self.cursor = Some(target);
        Ok(())
    }

    /// Close the menu without acting.
    pub fn close_menu(&mut self) {
        if matches!(self.interaction, Interaction::MenuOpen { .. }) {
            self.interaction = Interaction::Idle;
        }
    }

    /// The armed target, if the menu is open.
    pub fn armed_target(&self) -> Option<NodeId> {
        match self.interaction {
            Interaction::MenuOpen { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Move the menu highlight by `delta` rows, wrapping around.
    pub fn highlight_menu(&mut self, delta: isize) {
        if let Interaction::MenuOpen { highlighted, .. } = &mut self.interaction {
            let len = MenuAction::ALL.len() as isize;
            *highlighted = (*highlighted as isize + delta).rem_euclid(len) as usize;
        }
    }

    /// Apply the highlighted menu entry.
    pub fn choose_highlighted(&mut self) -> Outcome {
        match self.interaction {
            Interaction::MenuOpen { highlighted, .. } => match MenuAction::from_index(highlighted)
            {
                Some(action) => self.choose(action),
                None => Outcome::Rejected(Rejection::NoTarget),
            },
            _ => Outcome::Rejected(Rejection::NoTarget),
        }
    }

    /// Apply `action` to the armed target and return to idle.
    pub fn choose(&mut self, action: MenuAction) -> Outcome {
        self.choose_at(action, Instant::now())
    }

    /// `choose` with an explicit clock, for deferred deletes.
    pub fn choose_at(&mut self, action: MenuAction, now: Instant) -> Outcome {
        let Some(target) = self.armed_target() else {
            return Outcome::Rejected(Rejection::NoTarget);
        };
        self.interaction = Interaction::Idle;
        let outcome = self.apply(action, target, now);
        if let Outcome::Rejected(reason) = outcome {
            debug!("{:?} on {} rejected: {:?}", action, target, reason);
        }
        outcome
    }

    /// Apply `action` to `target` directly, without going through the menu.
    ///
    /// Used for keyboard shortcuts; the same policy checks apply.
    pub fn apply(&mut self, action: MenuAction, target: NodeId, now: Instant) -> Outcome {
        if !self.config.editable {
            return Outcome::Rejected(Rejection::NotEditable);
        }
        if !self.outline.contains(target) {
            return Outcome::Rejected(Rejection::UnknownNode);
        }
        if self.is_transitioning(target) {
            return Outcome::Rejected(Rejection::Transitioning);
        }
        match action {
            MenuAction::AddChild => self.add_child(target),
            MenuAction::AddSibling => self.add_sibling(target),
            MenuAction::Delete => self.delete(target, now),
            MenuAction::MoveUp => self.reorder(target, Outline::move_up),
            MenuAction::MoveDown => self.reorder(target, Outline::move_down),
        }
    }

    fn add_child(&mut self, target: NodeId) -> Outcome {
        if let Some(max) = self.config.max_depth
            && self.outline.depth(target) >= max
        {
            debug!("Max depth {} reached at {}", max, target);
            return Outcome::Rejected(Rejection::MaxDepth);
        }
        let Some(child) = self.outline.insert_first_child(target) else {
            return Outcome::Rejected(Rejection::UnknownNode);
        };
        self.expanded.insert(target);
        self.ensure_visible(target);
        self.cursor = Some(child);
        self.settle();
        Outcome::Applied { focus: Some(child) }
    }

    fn add_sibling(&mut self, target: NodeId) -> Outcome {
        let Some(sibling) = self.outline.insert_after(target) else {
            return Outcome::Rejected(Rejection::UnknownNode);
        };
        self.cursor = Some(sibling);
        self.settle();
        Outcome::Applied {
            focus: Some(sibling),
        }
    }

    fn delete(&mut self, target: NodeId, now: Instant) -> Outcome {
        self.flush_pending();
        if !self.outline.contains(target) {
            return Outcome::Rejected(Rejection::UnknownNode);
        }
        if self.config.delete_flash > Duration::ZERO {
            self.pending = Some(PendingDelete {
                target,
                due: now + self.config.delete_flash,
            });
            trace!("Delete of {} deferred", target);
            return Outcome::Deferred;
        }
        let focus = self.remove_now(target);
        self.settle();
        Outcome::Applied { focus }
    }

    fn remove_now(&mut self, target: NodeId) -> Option<NodeId> {
        let visible = self.visible_ids();
        let index = visible.iter().position(|v| *v == target).unwrap_or(0);

        let removal = self.outline.remove(target)?;
        self.expanded.retain(|id| self.outline.contains(*id));
        if let Some(pruned) = removal.pruned_parent {
            self.expanded.remove(&pruned);
        }
        if let Interaction::Editing { target: editing, .. } = &self.interaction
            && !self.outline.contains(*editing)
        {
            self.interaction = Interaction::Idle;
        }

        let visible = self.visible_ids();
        let focus = visible
            .get(index.min(visible.len().saturating_sub(1)))
            .copied();
        self.cursor = focus;
        debug!(
            "Editor {} removed {} nodes at {}",
            self.id, removal.removed, target
        );
        focus
    }

    fn reorder(&mut self, target: NodeId, step: fn(&mut Outline, NodeId) -> bool) -> Outcome {
        if step(&mut self.outline, target) {
            self.cursor = Some(target);
            self.settle();
            Outcome::Applied {
                focus: Some(target),
            }
        } else {
            Outcome::Rejected(Rejection::AtEdge)
        }
    }

    /// Finish a pending delete whose flash has elapsed.
    ///
    /// Returns `true` if the outline changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(pending) if pending.due <= now => self.flush_pending(),
            _ => false,
        }
    }

    /// Time left until the pending delete is applied.
    pub fn pending_remaining(&self, now: Instant) -> Option<Duration> {
        self.pending.map(|p| p.due.saturating_duration_since(now))
    }

    /// Apply the pending delete now. Returns `true` if anything was removed.
    fn flush_pending(&mut self) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        if !self.outline.contains(pending.target) {
            return false;
        }
        self.remove_now(pending.target);
        self.settle();
        true
    }

    // ------------------------------------------------------------------
    // Label editing
    // ------------------------------------------------------------------

    /// Start editing the label of `target`.
    pub fn begin_edit(&mut self, target: NodeId) -> Result<(), Rejection> {
        if !self.config.editable {
            return Err(Rejection::NotEditable);
        }
        if self.is_transitioning(target) {
            return Err(Rejection::Transitioning);
        }
        let Some(label) = self.outline.label(target).map(str::to_string) else {
            return Err(Rejection::UnknownNode);
        };
        match self.interaction {
            Interaction::Editing { target: current, .. } if current == target => return Ok(()),
            Interaction::Editing { .. } => {
                self.commit_edit();
            }
            _ => {}
        }
        self.interaction = Interaction::Editing {
            target,
            buffer: label,
        };
        self.cursor = Some(target);
        Ok(())
    }

    /// The node being edited, if any.
    pub fn editing(&self) -> Option<NodeId> {
        match self.interaction {
            Interaction::Editing { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Append a character to the edit buffer.
    pub fn edit_input(&mut self, c: char) {
        if let Interaction::Editing { buffer, .. } = &mut self.interaction {
            buffer.push(c);
        }
    }

    /// Remove the last character of the edit buffer.
    pub fn edit_backspace(&mut self) {
        if let Interaction::Editing { buffer, .. } = &mut self.interaction {
            buffer.pop();
        }
    }

    /// Store the edit buffer as the label and fire `on_change`.
    pub fn commit_edit(&mut self) -> bool {
        let Some(target) = self.store_edit() else {
            return false;
        };
        trace!("Committed label of {}", target);
        self.settle();
        true
    }

    fn store_edit(&mut self) -> Option<NodeId> {
        match std::mem::take(&mut self.interaction) {
            Interaction::Editing { target, buffer } => {
                self.outline.set_label(target, buffer);
                Some(target)
            }
            other => {
                self.interaction = other;
                None
            }
        }
    }

    /// Discard the edit buffer.
    pub fn cancel_edit(&mut self) {
        if matches!(self.interaction, Interaction::Editing { .. }) {
            self.interaction = Interaction::Idle;
        }
    }

    /// The commit-key shortcut: store the label, add a sibling after it and
    /// continue editing the new node. Fires `on_change` once.
    pub fn commit_and_add_sibling(&mut self) -> Outcome {
        let Some(target) = self.store_edit() else {
            return Outcome::Rejected(Rejection::NoTarget);
        };
        let Some(sibling) = self.outline.insert_after(target) else {
            self.settle();
            return Outcome::Rejected(Rejection::UnknownNode);
        };
        self.interaction = Interaction::Editing {
            target: sibling,
            buffer: self.outline.label(sibling).unwrap_or_default().to_string(),
        };
        self.cursor = Some(sibling);
        self.settle();
        Outcome::Applied {
            focus: Some(sibling),
        }
    }

    /// The surface-wide mouse-down handler for this instance.
    ///
    /// Closes the menu and commits a label edit unless the event landed in
    /// this instance's menu or on one of its more-actions affordances.
    pub fn handle_outside_mousedown(&mut self, target: Option<&EventTarget>) {
        if target.is_some_and(|t| self.contains_event_target(t)) {
            return;
        }
        self.on_outside_mousedown();
    }
}

impl ScopedListener for TreeEditor {
    fn scope(&self) -> &EditorId {
        &self.id
    }

    fn contains_event_target(&self, target: &EventTarget) -> bool {
        target.scope == self.id
            && matches!(target.element, Element::Menu(_) | Element::MoreActions(_))
    }

    fn on_outside_mousedown(&mut self) {
        self.close_menu();
        if self.editing().is_some() {
            self.commit_edit();
        }
    }
}
