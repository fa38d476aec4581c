//! # Deskkit Library Manager
//!
//! Menu-driven book inventory. Books live in a JSON data file
//! (`library_data.json` by default) that is rewritten after every change.
//!
//! ```text
//! library_cli [--data-file <PATH>] [--user <NAME>] [--verbose]
//! ```

mod menu;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use desk_core::{FileLock, Library, DEFAULT_DATA_FILE};
use tracing::{info, Level};

use crate::menu::InventoryMenu;

/// Book inventory manager
#[derive(Parser, Debug)]
#[command(name = "library_cli")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Inventory data file
    #[arg(short, long, default_value = DEFAULT_DATA_FILE)]
    data_file: PathBuf,

    /// Name recorded in the lock file (defaults to the login name)
    #[arg(short, long)]
    user: Option<String>,

    /// Log diagnostics to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let user = cli.user.unwrap_or_else(whoami::username);
    let lock = match FileLock::acquire(&cli.data_file, user) {
        Ok(lock) => lock,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(data_file = %lock.data_path().display(), user = %lock.info.user_id, "inventory locked");

    let library = match Library::open(&cli.data_file) {
        Ok(library) => library,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(books = library.count_total(), next_id = library.next_id(), "inventory loaded");

    let mut menu = InventoryMenu::new(library, io::stdin().lock(), io::stdout());
    let outcome = menu.run();
    drop(lock);

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Console error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
