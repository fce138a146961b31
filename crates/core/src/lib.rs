//! Core of Arbor, an editable outline tree.
//!
//! Provides the serializable node model, the arena-backed outline, the
//! `TreeEditor` interaction state machine, per-instance event scoping and
//! JSON file storage. Rendering lives in `arbor-tui`.

pub mod config;
pub mod editor;
pub mod error;
pub mod menu;
pub mod model;
pub mod outline;
pub mod scope;
pub mod store;
pub mod view;

pub use config::{EditorConfig, EditorOptions, SelectionMode};
pub use editor::{HostContainer, Interaction, Outcome, Rejection, TreeEditor};
pub use error::{EditorError, EditorResult};
pub use menu::{MenuAction, Point, Size};
pub use model::{NEW_ITEM_LABEL, TreeNode};
pub use outline::{NodeId, Outline};
pub use scope::{EditorId, Element, EventTarget, Registry, ScopedListener};
pub use store::OutlineStore;
pub use view::{Affordance, Expander, Row, rows};
