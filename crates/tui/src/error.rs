//! Error types for the TUI module.

use std::io;
use thiserror::Error;

/// Result type for TUI operations.
pub type TuiResult<T> = Result<T, TuiError>;

/// Error type for TUI operations.
#[derive(Debug, Error)]
pub enum TuiError {
    /// Failed to initialize or restore the terminal.
    #[error("Terminal error: {0}")]
    Terminal(#[from] io::Error),

    /// Loading, validating or saving an outline failed.
    #[error("Outline error: {0}")]
    Editor(#[from] arbor_core::EditorError),

    /// The app was started without any outline to edit.
    #[error("No outline files to edit")]
    NoPanes,
}
