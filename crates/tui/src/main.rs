//! Entry point for the Arbor TUI application.
//!
//! Opens the project's default outline. Use `arbor edit` for more options.

use arbor_core::{EditorOptions, OutlineStore};
use arbor_tui::{App, TuiResult};

#[tokio::main]
async fn main() -> TuiResult<()> {
    let store = OutlineStore::new(OutlineStore::default_path());
    let mut app = App::open(vec![store], EditorOptions::new()).await?;
    app.run().await
}
