use std::path::PathBuf;
use thiserror::Error;

/// Error types for the outline editor and its file store
#[derive(Error, Debug)]
pub enum EditorError {
    /// The editor was created without a usable host container
    #[error("Missing host container: {reason}")]
    MissingHost { reason: String },

    /// Input nodes did not match the `TreeNode` contract (e.g. no label)
    #[error("Malformed tree node: {source}")]
    MalformedNode {
        #[source]
        source: serde_json::Error,
    },

    /// Error reading or writing an outline file
    #[error("Failed to access outline file at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error serializing the outline
    #[error("Failed to serialize outline: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Result type alias for editor operations
pub type EditorResult<T> = Result<T, EditorError>;
