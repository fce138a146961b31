//! Test infrastructure for integration tests
//!
//! Provides an isolated outline file per test plus command builders.

use std::path::PathBuf;

use arbor_cli::commands::{CheckCommand, InitCommand, ShowCommand};
use arbor_core::{OutlineStore, SelectionMode, TreeNode};

/// Test context containing an isolated outline store and temp directory
pub struct TestContext {
    pub store: OutlineStore,
    pub temp_dir: PathBuf,
}

impl TestContext {
    /// Create a new test context with a store whose file does not exist yet.
    ///
    /// Each call creates a uniquely named temp directory using process ID,
    /// thread ID, and nanosecond timestamp to guarantee isolation.
    pub fn new() -> Self {
        let temp_dir = std::env::temp_dir().join(format!(
            "arbor-integration-test-{}-{:?}-{}",
            std::process::id(),
            std::thread::current().id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        let store = OutlineStore::new(temp_dir.join("outline.json"));
        Self { store, temp_dir }
    }

    /// Create a context whose outline already holds `nodes`.
    pub async fn with_nodes(nodes: &[TreeNode]) -> Self {
        let ctx = Self::new();
        ctx.store.save(nodes).await.unwrap();
        ctx
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.temp_dir);
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// A two-level shopping outline with one checked item.
pub fn groceries() -> Vec<TreeNode> {
    vec![
        TreeNode::new("Groceries").with_children(vec![
            TreeNode::new("Milk").with_checked(true),
            TreeNode::new("Bread"),
        ]),
        TreeNode::new("Errands").with_child(TreeNode::new("Bank")),
    ]
}

// =============================================================================
// Command Builder Helpers
// =============================================================================

pub fn show_cmd(json: bool) -> ShowCommand {
    ShowCommand {
        json,
        mode: SelectionMode::Checkbox,
    }
}

pub fn check_cmd(max_depth: Option<usize>, mode: Option<SelectionMode>) -> CheckCommand {
    CheckCommand {
        max_depth,
        mode,
        json: false,
    }
}

pub fn init_cmd(force: bool) -> InitCommand {
    InitCommand { force }
}
