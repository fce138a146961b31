//! File-backed outline storage.
//!
//! Outlines are stored as pretty-printed JSON arrays of `TreeNode`.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::error::{EditorError, EditorResult};
use crate::model::{self, TreeNode};

/// Default outline path relative to project root or current working directory
pub const DEFAULT_OUTLINE_PATH: &str = ".arbor/outline.json";

/// An outline file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineStore {
    path: PathBuf,
}

impl OutlineStore {
    /// Bind a store to `path`. Nothing is touched on disk yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the path of the outline file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the default outline path based on project root.
    ///
    /// Uses `git rev-parse --show-toplevel` to find the project root and
    /// returns `<project_root>/.arbor/outline.json`. Outside a git repository
    /// the path is relative to the current working directory.
    pub fn default_path() -> PathBuf {
        let base_path = find_project_root().unwrap_or_else(|| PathBuf::from("."));
        base_path.join(DEFAULT_OUTLINE_PATH)
    }

    /// Whether the outline file exists.
    pub async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    /// Read the outline.
    ///
    /// A missing file reads as a single placeholder node.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::Io` if the file cannot be read and
    /// `EditorError::MalformedNode` if its content is not a node array.
    pub async fn load(&self) -> EditorResult<Vec<TreeNode>> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No outline at {}, starting empty", self.path.display());
                return Ok(vec![TreeNode::placeholder()]);
            }
            Err(source) => {
                return Err(EditorError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        let nodes = model::parse_nodes(&text)?;
        debug!(
            "Loaded {} nodes from {}",
            model::count_nodes(&nodes),
            self.path.display()
        );
        Ok(nodes)
    }

    /// Write the outline, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::Io` if the directory or file cannot be written.
    pub async fn save(&self, nodes: &[TreeNode]) -> EditorResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| EditorError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let mut json = model::to_json(nodes)?;
        json.push('\n');
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|source| EditorError::Io {
                path: self.path.clone(),
                source,
            })?;
        info!(
            "Saved {} nodes to {}",
            model::count_nodes(nodes),
            self.path.display()
        );
        Ok(())
    }
}

static_assertions::assert_impl_all!(OutlineStore: Send, Sync);

/// Find the project root by running `git rev-parse --show-toplevel`.
///
/// Returns `None` if not in a git repository or the command fails.
pub fn find_project_root() -> Option<PathBuf> {
    let output = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .output()
        .ok()?;

    if output.status.success() {
        let path_str = String::from_utf8(output.stdout).ok()?;
        Some(PathBuf::from(path_str.trim()))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir()
            .join(format!(
                "arbor-store-{}-{}-{}",
                name,
                std::process::id(),
                std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .unwrap()
                    .as_nanos()
            ))
            .join("outline.json")
    }

    #[tokio::test]
    async fn test_missing_file_loads_placeholder() {
        let store = OutlineStore::new(temp_path("missing"));
        assert!(!store.exists().await);
        assert_eq!(store.load().await.unwrap(), vec![TreeNode::placeholder()]);
    }

    #[tokio::test]
    async fn test_save_creates_directories_and_round_trips() {
        let store = OutlineStore::new(temp_path("roundtrip"));
        let nodes = vec![
            TreeNode::new("Groceries").with_children(vec![
                TreeNode::new("Milk").with_checked(true),
                TreeNode::new("Bread"),
            ]),
            TreeNode::new("Empty").with_children(Vec::new()),
        ];
        store.save(&nodes).await.unwrap();
        assert!(store.exists().await);
        assert_eq!(store.load().await.unwrap(), nodes);
    }

    #[tokio::test]
    async fn test_malformed_file_is_rejected() {
        let path = temp_path("malformed");
        tokio::fs::create_dir_all(path.parent().unwrap())
            .await
            .unwrap();
        tokio::fs::write(&path, r#"[{"checked": true}]"#)
            .await
            .unwrap();
        let err = OutlineStore::new(path).load().await.unwrap_err();
        assert!(matches!(err, EditorError::MalformedNode { .. }));
    }

    #[test]
    fn test_default_path_ends_with_outline_file() {
        assert!(OutlineStore::default_path().ends_with(DEFAULT_OUTLINE_PATH));
    }
}
