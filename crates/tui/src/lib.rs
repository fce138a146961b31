//! Terminal front end for Arbor
//!
//! Renders one or more outline editors side by side using ratatui and
//! crossterm, and maps keys and mouse clicks onto the editor API.

pub mod app;
pub mod error;
pub mod event;
pub mod outline_view;
pub mod pane;
pub mod ui;

pub use app::{App, Mode};
pub use error::{TuiError, TuiResult};
pub use outline_view::HitMap;
pub use pane::Pane;
