//! Error types for the CLI.

use std::path::PathBuf;
use thiserror::Error;

use arbor_core::EditorError;
use arbor_tui::TuiError;

/// Error types for CLI commands
#[derive(Error, Debug)]
pub enum CliError {
    /// Reading, parsing or writing the outline failed
    #[error(transparent)]
    Editor(#[from] EditorError),

    /// The terminal front end failed
    #[error(transparent)]
    Tui(#[from] TuiError),

    /// `init` found an existing outline and `--force` was not given
    #[error("Outline already exists at {path} (use --force to overwrite)")]
    AlreadyExists { path: PathBuf },

    /// `check` found the outline violating a requested constraint
    #[error("Outline at {path} failed validation: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

impl CliError {
    /// The error message followed by any source not already part of it.
    pub fn full_message(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            let text = err.to_string();
            if !message.contains(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            source = err.source();
        }
        message
    }
}

/// Result type alias for CLI commands
pub type CliResult<T> = Result<T, CliError>;
