//! Varscope CLI
//!
//! Read-only viewer for recorded snapshot sessions

use clap::{Parser, Subcommand};
use varscope_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "varscope")]
#[command(about = "Varscope - Browse recorded variable snapshots", long_about = None)]
struct Cli {
    /// Log diagnostics to stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List recording sessions, newest first
    Sessions(commands::sessions::SessionsArgs),
    /// Page through the records of one session
    Records(commands::records::RecordsArgs),
}

fn main() {
    let cli = Cli::parse();
    if cli.verbose {
        init(Profile::Development);
    }

    let result = match cli.command {
        Commands::Sessions(args) => commands::sessions::execute(args),
        Commands::Records(args) => commands::records::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
