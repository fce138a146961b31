//! Check command for validating an outline
//!
//! Implements the `arbor check` command. It parses the outline, reports its
//! shape, and fails when a requested constraint does not hold.

use std::fmt;
use std::path::PathBuf;

use arbor_core::{OutlineStore, SelectionMode, TreeNode, model};
use chrono::{DateTime, Local};
use clap::Args;
use serde::Serialize;
use tracing::debug;

use crate::commands::parse_mode;
use crate::error::{CliError, CliResult};

/// Validate an outline and print its statistics
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Fail if any node sits deeper than this level (roots are level 1)
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Fail if the checked flags violate this mode (radio allows at most one)
    #[arg(short, long, value_parser = parse_mode)]
    pub mode: Option<SelectionMode>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Shape of a valid outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub path: PathBuf,
    /// Total node count.
    pub nodes: usize,
    pub roots: usize,
    /// Deepest level.
    pub depth: usize,
    /// Labels of checked nodes in display order.
    pub checked: Vec<String>,
    /// Last modification of the file, if it exists.
    pub modified: Option<DateTime<Local>>,
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Outline OK: {}", self.path.display())?;
        writeln!(f)?;
        writeln!(f, "  Nodes:   {}", self.nodes)?;
        writeln!(f, "  Roots:   {}", self.roots)?;
        writeln!(f, "  Depth:   {}", self.depth)?;
        if self.checked.is_empty() {
            write!(f, "  Checked: none")?;
        } else {
            write!(f, "  Checked: {}", self.checked.join(", "))?;
        }
        if let Some(modified) = self.modified {
            write!(f, "\n  Modified: {}", modified.format("%Y-%m-%d %H:%M:%S"))?;
        }
        Ok(())
    }
}

impl CheckCommand {
    pub async fn execute(&self, store: &OutlineStore) -> CliResult<String> {
        let nodes = store.load().await?;
        let modified = match tokio::fs::metadata(store.path()).await {
            Ok(meta) => meta.modified().ok().map(DateTime::<Local>::from),
            Err(e) => {
                debug!("No metadata for {}: {}", store.path().display(), e);
                None
            }
        };
        let report = build_report(store.path().to_path_buf(), &nodes, modified);
        self.validate(&report)?;

        if self.json {
            return serde_json::to_string_pretty(&report).map_err(|e| {
                CliError::Editor(arbor_core::EditorError::Serialize(e))
            });
        }
        Ok(report.to_string())
    }

    /// Apply the requested constraints to a report.
    pub fn validate(&self, report: &CheckReport) -> CliResult<()> {
        if let Some(max) = self.max_depth
            && report.depth > max
        {
            return Err(CliError::Invalid {
                path: report.path.clone(),
                reason: format!("depth {} exceeds maximum {}", report.depth, max),
            });
        }
        match self.mode {
            Some(SelectionMode::Radio) if report.checked.len() > 1 => Err(CliError::Invalid {
                path: report.path.clone(),
                reason: format!(
                    "radio mode allows one checked node, found {}",
                    report.checked.len()
                ),
            }),
            Some(SelectionMode::None) if !report.checked.is_empty() => Err(CliError::Invalid {
                path: report.path.clone(),
                reason: "checked nodes present but selection mode is none".to_string(),
            }),
            _ => Ok(()),
        }
    }
}

/// Summarize `nodes`.
pub fn build_report(
    path: PathBuf,
    nodes: &[TreeNode],
    modified: Option<DateTime<Local>>,
) -> CheckReport {
    let mut checked = Vec::new();
    collect_checked(nodes, &mut checked);
    CheckReport {
        path,
        nodes: model::count_nodes(nodes),
        roots: nodes.len(),
        depth: model::forest_height(nodes),
        checked,
        modified,
    }
}

fn collect_checked(nodes: &[TreeNode], out: &mut Vec<String>) {
    for node in nodes {
        if node.checked {
            out.push(node.label.clone());
        }
        if let Some(children) = &node.children {
            collect_checked(children, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes() -> Vec<TreeNode> {
        vec![
            TreeNode::new("A").with_children(vec![
                TreeNode::new("A1").with_checked(true),
                TreeNode::new("A2").with_child(TreeNode::new("A2a").with_checked(true)),
            ]),
            TreeNode::new("B"),
        ]
    }

    fn command(max_depth: Option<usize>, mode: Option<SelectionMode>) -> CheckCommand {
        CheckCommand {
            max_depth,
            mode,
            json: false,
        }
    }

    #[test]
    fn test_build_report_counts() {
        let report = build_report(PathBuf::from("o.json"), &nodes(), None);
        assert_eq!(report.nodes, 5);
        assert_eq!(report.roots, 2);
        assert_eq!(report.depth, 3);
        assert_eq!(report.checked, vec!["A1", "A2a"]);
    }

    #[test]
    fn test_validate_depth() {
        let report = build_report(PathBuf::from("o.json"), &nodes(), None);
        assert!(command(Some(3), None).validate(&report).is_ok());
        let err = command(Some(2), None).validate(&report).unwrap_err();
        assert!(err.to_string().contains("depth 3 exceeds maximum 2"));
    }

    #[test]
    fn test_validate_radio_allows_one() {
        let report = build_report(PathBuf::from("o.json"), &nodes(), None);
        assert!(command(None, Some(SelectionMode::Checkbox)).validate(&report).is_ok());
        assert!(matches!(
            command(None, Some(SelectionMode::Radio)).validate(&report),
            Err(CliError::Invalid { .. })
        ));
    }

    #[test]
    fn test_validate_none_rejects_checked() {
        let report = build_report(PathBuf::from("o.json"), &nodes(), None);
        assert!(command(None, Some(SelectionMode::None)).validate(&report).is_err());
        let clean = build_report(PathBuf::from("o.json"), &[TreeNode::new("x")], None);
        assert!(command(None, Some(SelectionMode::None)).validate(&clean).is_ok());
    }

    #[test]
    fn test_report_display() {
        let report = build_report(PathBuf::from("o.json"), &[TreeNode::new("x")], None);
        assert_eq!(
            report.to_string(),
            "Outline OK: o.json\n\n  Nodes:   1\n  Roots:   1\n  Depth:   1\n  Checked: none"
        );
    }
}
