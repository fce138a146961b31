//! End-to-end integration tests for the Arbor CLI
//!
//! Commands run against an isolated outline file per test:
//! - `init` - creating and overwriting outlines
//! - `show` - tree and JSON output
//! - `check` - statistics and constraint failures

mod common;

use arbor_cli::CliError;
use arbor_core::{NEW_ITEM_LABEL, SelectionMode, TreeNode, model};
use common::*;

// =============================================================================
// INIT TESTS
// =============================================================================

mod init {
    use super::*;

    #[tokio::test]
    async fn test_init_writes_placeholder() {
        let ctx = TestContext::new();

        let result = init_cmd(false).init(&ctx.store).await.unwrap();
        assert!(!result.overwritten);

        let nodes = ctx.store.load().await.unwrap();
        assert_eq!(nodes, vec![TreeNode::new(NEW_ITEM_LABEL)]);
    }

    #[tokio::test]
    async fn test_init_refuses_existing_outline() {
        let ctx = TestContext::with_nodes(&groceries()).await;

        let err = init_cmd(false).init(&ctx.store).await.unwrap_err();
        assert!(matches!(err, CliError::AlreadyExists { .. }));
        assert_eq!(ctx.store.load().await.unwrap(), groceries());
    }

    #[tokio::test]
    async fn test_init_force_overwrites() {
        let ctx = TestContext::with_nodes(&groceries()).await;

        let output = init_cmd(true).execute(&ctx.store).await.unwrap();
        assert!(output.contains("Replaced outline"));
        assert_eq!(model::count_nodes(&ctx.store.load().await.unwrap()), 1);
    }
}

// =============================================================================
// SHOW TESTS
// =============================================================================

mod show {
    use super::*;

    #[tokio::test]
    async fn test_show_tree() {
        let ctx = TestContext::with_nodes(&groceries()).await;

        let output = show_cmd(false).execute(&ctx.store).await.unwrap();
        assert_eq!(
            output,
            "[ ] Groceries\n├── [x] Milk\n└── [ ] Bread\n[ ] Errands\n└── [ ] Bank"
        );
    }

    #[tokio::test]
    async fn test_show_json_round_trips() {
        let ctx = TestContext::with_nodes(&groceries()).await;

        let output = show_cmd(true).execute(&ctx.store).await.unwrap();
        assert_eq!(model::parse_nodes(&output).unwrap(), groceries());
    }

    #[tokio::test]
    async fn test_show_missing_file_shows_placeholder() {
        let ctx = TestContext::new();

        let output = show_cmd(false).execute(&ctx.store).await.unwrap();
        assert_eq!(output, format!("[ ] {}", NEW_ITEM_LABEL));
    }

    #[tokio::test]
    async fn test_show_malformed_file_fails() {
        let ctx = TestContext::new();
        std::fs::create_dir_all(&ctx.temp_dir).unwrap();
        std::fs::write(ctx.store.path(), r#"[{"checked": true}]"#).unwrap();

        let err = show_cmd(false).execute(&ctx.store).await.unwrap_err();
        assert!(matches!(err, CliError::Editor(_)));
    }
}

// =============================================================================
// CHECK TESTS
// =============================================================================

mod check {
    use super::*;

    #[tokio::test]
    async fn test_check_reports_shape() {
        let ctx = TestContext::with_nodes(&groceries()).await;

        let output = check_cmd(None, None).execute(&ctx.store).await.unwrap();
        assert!(output.contains("Nodes:   5"));
        assert!(output.contains("Depth:   2"));
        assert!(output.contains("Checked: Milk"));
        assert!(output.contains("Modified:"));
    }

    #[tokio::test]
    async fn test_check_max_depth_violation() {
        let ctx = TestContext::with_nodes(&groceries()).await;

        let err = check_cmd(Some(1), None).execute(&ctx.store).await.unwrap_err();
        assert!(matches!(err, CliError::Invalid { .. }));
    }

    #[tokio::test]
    async fn test_check_radio_with_two_checked_fails() {
        let mut nodes = groceries();
        nodes[1].checked = true;
        let ctx = TestContext::with_nodes(&nodes).await;

        let err = check_cmd(None, Some(SelectionMode::Radio))
            .execute(&ctx.store)
            .await
            .unwrap_err();
        assert!(err.full_message().contains("found 2"));
    }

    #[tokio::test]
    async fn test_check_json() {
        let ctx = TestContext::with_nodes(&groceries()).await;
        let mut cmd = check_cmd(None, Some(SelectionMode::Radio));
        cmd.json = true;

        let output = cmd.execute(&ctx.store).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["nodes"], 5);
        assert_eq!(value["roots"], 2);
        assert_eq!(value["checked"][0], "Milk");
    }
}
