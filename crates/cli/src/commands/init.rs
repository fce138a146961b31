//! Init command for creating an outline file
//!
//! Implements the `arbor init` command, which writes an outline holding a
//! single placeholder node.

use std::fmt;
use std::path::PathBuf;

use arbor_core::{OutlineStore, TreeNode};
use clap::Args;

use crate::error::{CliError, CliResult};

/// Create a fresh outline file
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Overwrite an existing outline
    #[arg(long)]
    pub force: bool,
}

/// Result of the init command execution
#[derive(Debug)]
pub struct InitResult {
    /// Path of the written outline
    pub path: PathBuf,
    /// Whether an existing outline was replaced
    pub overwritten: bool,
}

impl fmt::Display for InitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Arbor initialized successfully!")?;
        writeln!(f)?;
        if self.overwritten {
            write!(f, "  Replaced outline: {}", self.path.display())
        } else {
            write!(f, "  Created outline: {}", self.path.display())
        }
    }
}

impl InitCommand {
    pub async fn execute(&self, store: &OutlineStore) -> CliResult<String> {
        Ok(self.init(store).await?.to_string())
    }

    /// Write the placeholder outline.
    ///
    /// # Errors
    ///
    /// Returns `CliError::AlreadyExists` if the file exists and `--force` was
    /// not given.
    pub async fn init(&self, store: &OutlineStore) -> CliResult<InitResult> {
        let exists = store.exists().await;
        if exists && !self.force {
            return Err(CliError::AlreadyExists {
                path: store.path().to_path_buf(),
            });
        }
        store.save(&[TreeNode::placeholder()]).await?;
        Ok(InitResult {
            path: store.path().to_path_buf(),
            overwritten: exists,
        })
    }
}
