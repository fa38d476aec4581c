//! # Deskkit Calculator
//!
//! Menu-driven four-function calculator. Each calculation asks for two
//! numbers and an operator; bad input is reported and the menu comes back.
//!
//! ```text
//! calc_cli [--verbose]
//! ```

mod menu;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::Level;

use crate::menu::CalculatorMenu;

/// Simple calculator
#[derive(Parser, Debug)]
#[command(name = "calc_cli")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log diagnostics to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut menu = CalculatorMenu::new(io::stdin().lock(), io::stdout());
    match menu.run() {
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
