//! CLI commands for Arbor
//!
//! This module contains all subcommand implementations for the arbor CLI.

pub mod check;
pub mod edit;
pub mod init;
pub mod show;

pub use check::{CheckCommand, CheckReport};
pub use edit::EditCommand;
pub use init::{InitCommand, InitResult};
pub use show::ShowCommand;

use arbor_core::{OutlineStore, SelectionMode};
use clap::Subcommand;

use crate::error::CliResult;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open one or more outlines in the interactive editor
    Edit(EditCommand),
    /// Print an outline as a tree
    Show(ShowCommand),
    /// Validate an outline and print its statistics
    Check(CheckCommand),
    /// Create a fresh outline file
    Init(InitCommand),
}

impl Command {
    /// Execute the command against the outline at `store`.
    ///
    /// Returns the text to print on success.
    ///
    /// # Errors
    ///
    /// Returns `CliError` if the outline cannot be read, written or validated,
    /// or if the terminal fails.
    pub async fn execute(&self, store: &OutlineStore) -> CliResult<String> {
        match self {
            Command::Edit(cmd) => cmd.execute(store).await,
            Command::Show(cmd) => cmd.execute(store).await,
            Command::Check(cmd) => cmd.execute(store).await,
            Command::Init(cmd) => cmd.execute(store).await,
        }
    }
}

/// Parse a selection mode string (none, checkbox, radio)
pub(crate) fn parse_mode(s: &str) -> Result<SelectionMode, String> {
    s.to_lowercase().parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    /// Test struct to parse commands
    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: Command,
    }

    #[test]
    fn test_command_edit_defaults() {
        let cli = TestCli::try_parse_from(["test", "edit"]).unwrap();
        match cli.command {
            Command::Edit(cmd) => {
                assert!(cmd.files.is_empty());
                assert_eq!(cmd.mode, SelectionMode::None);
                assert!(!cmd.read_only);
                assert_eq!(cmd.flash, 250);
            }
            other => panic!("Expected Edit, got {:?}", other),
        }
    }

    #[test]
    fn test_command_edit_with_files_and_options() {
        let cli = TestCli::try_parse_from([
            "test",
            "edit",
            "a.json",
            "b.json",
            "--mode",
            "Radio",
            "--max-depth",
            "3",
            "--collapsed",
        ])
        .unwrap();
        match cli.command {
            Command::Edit(cmd) => {
                assert_eq!(cmd.files, vec![PathBuf::from("a.json"), PathBuf::from("b.json")]);
                assert_eq!(cmd.mode, SelectionMode::Radio);
                assert_eq!(cmd.max_depth, Some(3));
                assert!(cmd.collapsed);
            }
            other => panic!("Expected Edit, got {:?}", other),
        }
    }

    #[test]
    fn test_command_invalid_mode() {
        let result = TestCli::try_parse_from(["test", "show", "--mode", "multi"]);
        match result {
            Err(e) => assert!(e.to_string().contains("multi"), "got: {}", e),
            Ok(_) => panic!("Expected error for invalid mode"),
        }
    }

    #[test]
    fn test_command_show_json() {
        let cli = TestCli::try_parse_from(["test", "show", "--json"]).unwrap();
        match cli.command {
            Command::Show(cmd) => assert!(cmd.json),
            other => panic!("Expected Show, got {:?}", other),
        }
    }

    #[test]
    fn test_command_check_options() {
        let cli =
            TestCli::try_parse_from(["test", "check", "--mode", "radio", "--max-depth", "2"])
                .unwrap();
        match cli.command {
            Command::Check(cmd) => {
                assert_eq!(cmd.mode, Some(SelectionMode::Radio));
                assert_eq!(cmd.max_depth, Some(2));
                assert!(!cmd.json);
            }
            other => panic!("Expected Check, got {:?}", other),
        }
    }

    #[test]
    fn test_command_init_force() {
        let cli = TestCli::try_parse_from(["test", "init", "--force"]).unwrap();
        match cli.command {
            Command::Init(cmd) => assert!(cmd.force),
            other => panic!("Expected Init, got {:?}", other),
        }
    }
}
