//! Per-instance event scoping.
//!
//! Several editors can share one host surface. Each carries an `EditorId`
//! and every pointer event is described as an `EventTarget` naming the scope
//! it landed in. The single surface-wide "mouse down" listener is the
//! `Registry`, which lets each instance decide whether the event was outside
//! of it before acting.

use std::fmt;

use crate::menu::MenuAction;
use crate::outline::NodeId;

/// Unique identifier of one editor instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EditorId(String);

impl EditorId {
    /// Generate a random (v4 UUID) id.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Use a caller-chosen id.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EditorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The part of an editor an event landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    /// Anywhere in the tree area that is not a more specific element.
    Body,
    /// A node's label text.
    Label(NodeId),
    /// A node's checkbox or radio affordance.
    Toggle(NodeId),
    /// A node's expand/collapse arrow.
    Expander(NodeId),
    /// A node's "more actions" affordance.
    MoreActions(NodeId),
    /// The open context menu (optionally a specific entry).
    Menu(Option<MenuAction>),
}

/// Where a pointer event landed: which instance, and what inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTarget {
    pub scope: EditorId,
    pub element: Element,
}

impl EventTarget {
    pub fn new(scope: EditorId, element: Element) -> Self {
        Self { scope, element }
    }
}

/// An instance that takes part in surface-wide mouse-down dispatch.
pub trait ScopedListener {
    /// The instance's scope identifier.
    fn scope(&self) -> &EditorId;

    /// Whether a mouse down on `target` counts as inside this instance's
    /// menu scope (and must therefore not close the menu).
    fn contains_event_target(&self, target: &EventTarget) -> bool;

    /// Called for a mouse down outside this instance's scope.
    fn on_outside_mousedown(&mut self);
}

/// The set of live instances sharing one surface.
#[derive(Debug)]
pub struct Registry<T> {
    instances: Vec<T>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            instances: Vec::new(),
        }
    }
}

impl<T: ScopedListener> Registry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an instance and return its scope id.
    pub fn register(&mut self, instance: T) -> EditorId {
        let id = instance.scope().clone();
        self.instances.push(instance);
        id
    }

    pub fn get(&self, id: &EditorId) -> Option<&T> {
        self.instances.iter().find(|i| i.scope() == id)
    }

    pub fn get_mut(&mut self, id: &EditorId) -> Option<&mut T> {
        self.instances.iter_mut().find(|i| i.scope() == id)
    }

    /// Instance at a registration index.
    pub fn at(&self, index: usize) -> Option<&T> {
        self.instances.get(index)
    }

    /// Mutable instance at a registration index.
    pub fn at_mut(&mut self, index: usize) -> Option<&mut T> {
        self.instances.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.instances.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.instances.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Deliver a surface-wide mouse down.
    ///
    /// `None` means the event hit no instance at all. Every instance whose
    /// scope does not contain the target is notified; returns how many were.
    pub fn dispatch_mousedown(&mut self, target: Option<&EventTarget>) -> usize {
        let mut notified = 0;
        for instance in &mut self.instances {
            let inside = target.is_some_and(|t| instance.contains_event_target(t));
            if !inside {
                instance.on_outside_mousedown();
                notified += 1;
            }
        }
        notified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakePane {
        id: EditorId,
        menu_open: bool,
    }

    impl FakePane {
        fn new(id: &str) -> Self {
            Self {
                id: EditorId::from_string(id),
                menu_open: true,
            }
        }
    }

    impl ScopedListener for FakePane {
        fn scope(&self) -> &EditorId {
            &self.id
        }

        fn contains_event_target(&self, target: &EventTarget) -> bool {
            target.scope == self.id && matches!(target.element, Element::Menu(_))
        }

        fn on_outside_mousedown(&mut self) {
            self.menu_open = false;
        }
    }

    #[test]
    fn test_editor_id_random_layout() {
        let id = EditorId::random();
        let parts: Vec<_> = id.as_str().split('-').map(str::len).collect();
        assert_eq!(parts, vec![8, 4, 4, 4, 12]);
        assert_ne!(id, EditorId::random());
    }

    #[test]
    fn test_dispatch_inside_one_scope_closes_only_others() {
        let mut registry = Registry::new();
        let a = registry.register(FakePane::new("a"));
        let b = registry.register(FakePane::new("b"));

        let target = EventTarget::new(a.clone(), Element::Menu(None));
        let notified = registry.dispatch_mousedown(Some(&target));

        assert_eq!(notified, 1);
        assert!(registry.get(&a).unwrap().menu_open);
        assert!(!registry.get(&b).unwrap().menu_open);
    }

    #[test]
    fn test_dispatch_outside_everything_closes_all() {
        let mut registry = Registry::new();
        registry.register(FakePane::new("a"));
        registry.register(FakePane::new("b"));
        assert_eq!(registry.dispatch_mousedown(None), 2);
        assert!(registry.iter().all(|p| !p.menu_open));
    }
}
