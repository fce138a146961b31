//! Edit command for the interactive outline editor
//!
//! Implements the `arbor edit` command, which opens one pane per outline file
//! in the terminal UI.

use std::path::PathBuf;
use std::time::Duration;

use arbor_core::{EditorOptions, OutlineStore, SelectionMode};
use arbor_tui::App;
use clap::Args;
use tracing::info;

use crate::commands::parse_mode;
use crate::error::CliResult;

/// Open outlines in the interactive editor
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Outline files to open side by side (defaults to the --file outline)
    pub files: Vec<PathBuf>,

    /// Selection affordance (none, checkbox, radio)
    #[arg(short, long, default_value = "none", value_parser = parse_mode)]
    pub mode: SelectionMode,

    /// Disable label editing and structural actions
    #[arg(long)]
    pub read_only: bool,

    /// Start with every parent collapsed
    #[arg(long)]
    pub collapsed: bool,

    /// Deepest level a child may be added at
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Delete flash duration in milliseconds
    #[arg(long, default_value_t = 250)]
    pub flash: u64,
}

impl EditCommand {
    /// Editor options for every pane.
    pub fn options(&self) -> EditorOptions {
        EditorOptions::new()
            .with_selection_mode(self.mode)
            .with_editable(!self.read_only)
            .with_expanded(!self.collapsed)
            .with_max_depth(self.max_depth)
            .with_delete_flash(Duration::from_millis(self.flash))
    }

    /// One store per file, or `default` alone when no file was named.
    pub fn stores(&self, default: &OutlineStore) -> Vec<OutlineStore> {
        if self.files.is_empty() {
            vec![default.clone()]
        } else {
            self.files.iter().map(OutlineStore::new).collect()
        }
    }

    /// Run the editor until the user quits.
    pub async fn execute(&self, store: &OutlineStore) -> CliResult<String> {
        let stores = self.stores(store);
        info!("Editing {} outline(s)", stores.len());
        let count = stores.len();
        let mut app = App::open(stores, self.options()).await?;
        app.run().await?;
        Ok(format!("Closed {} outline(s).", count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::EditorConfig;

    fn command(files: &[&str]) -> EditCommand {
        EditCommand {
            files: files.iter().map(PathBuf::from).collect(),
            mode: SelectionMode::Checkbox,
            read_only: true,
            collapsed: true,
            max_depth: Some(2),
            flash: 100,
        }
    }

    #[test]
    fn test_options_map_flags() {
        let mut config = EditorConfig::default();
        config.merge(&command(&[]).options());
        assert_eq!(config.selection_mode, SelectionMode::Checkbox);
        assert!(!config.editable);
        assert!(!config.expanded);
        assert_eq!(config.max_depth, Some(2));
        assert_eq!(config.delete_flash, Duration::from_millis(100));
    }

    #[test]
    fn test_stores_default_when_no_files() {
        let default = OutlineStore::new("/tmp/default.json");
        assert_eq!(command(&[]).stores(&default), vec![default.clone()]);
    }

    #[test]
    fn test_stores_one_per_file() {
        let default = OutlineStore::new("/tmp/default.json");
        let stores = command(&["a.json", "b.json"]).stores(&default);
        assert_eq!(stores.len(), 2);
        assert_eq!(stores[1].path(), PathBuf::from("b.json").as_path());
    }
}
