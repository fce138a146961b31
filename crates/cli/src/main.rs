use std::path::PathBuf;
use std::process;

use arbor_cli::{CliResult, Command};
use arbor_core::OutlineStore;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Environment variable name for the outline path
const ARBOR_FILE_ENV: &str = "ARBOR_FILE";

/// Arbor - An outline tree editor
#[derive(Parser)]
#[command(name = "arbor")]
#[command(version = "0.1.0")]
#[command(about = "An outline tree editor", long_about = None)]
struct Args {
    /// Path to the outline file (can also be set via ARBOR_FILE env var)
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Option<Command>,
}

/// Get the outline path from command line, environment variable, or default.
///
/// Priority:
/// 1. Command line --file argument
/// 2. ARBOR_FILE environment variable (if non-empty)
/// 3. Default path (<project root>/.arbor/outline.json)
fn resolve_outline_path(cli_file: Option<PathBuf>) -> PathBuf {
    if let Some(path) = cli_file {
        return path;
    }

    if let Ok(env_path) = std::env::var(ARBOR_FILE_ENV)
        && !env_path.is_empty()
    {
        return PathBuf::from(env_path);
    }

    OutlineStore::default_path()
}

/// Initialize logging based on RUST_LOG
///
/// Logs go to stderr so they never mix with command output or the editor's
/// screen.
fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();

    let args = Args::parse();
    if let Err(e) = run_with_args(&args).await {
        eprintln!("error: {}", e.full_message());
        process::exit(1);
    }
}

/// Run the application with the given arguments
async fn run_with_args(args: &Args) -> CliResult<()> {
    let store = OutlineStore::new(resolve_outline_path(args.file.clone()));

    match &args.command {
        Some(cmd) => {
            let result = cmd.execute(&store).await?;
            println!("{}", result);
        }
        None => {
            println!("Welcome to Arbor!");
            println!("Use 'arbor --help' for usage information.");
        }
    }

    Ok(())
}
