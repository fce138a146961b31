//! Show command for printing an outline
//!
//! Implements the `arbor show` command: a connector-drawn text tree, or the
//! raw node array with `--json`.

use arbor_core::{OutlineStore, SelectionMode, model};
use clap::Args;

use crate::commands::parse_mode;
use crate::error::CliResult;
use crate::output::format_tree;

/// Print an outline as a tree
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Print the outline as JSON instead of a tree
    #[arg(long)]
    pub json: bool,

    /// Selection markers to draw (none, checkbox, radio)
    #[arg(short, long, default_value = "checkbox", value_parser = parse_mode)]
    pub mode: SelectionMode,
}

impl ShowCommand {
    pub async fn execute(&self, store: &OutlineStore) -> CliResult<String> {
        let nodes = store.load().await?;
        if self.json {
            return Ok(model::to_json(&nodes)?);
        }
        Ok(format_tree(&nodes, self.mode))
    }
}
