use clap::Parser;
use colored::*;
use std::process;
use tracing_subscriber::EnvFilter;

mod cli;

use crate::cli::{Cli, Commands};
use linnaea_core::LinnaeaError;

fn main() {
    // Initialize logging with LINNAEA_LOG environment variable support
    let log_level = std::env::var("LINNAEA_LOG").unwrap_or_else(|_| "warn".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);

        // Use appropriate exit codes based on error type
        let exit_code = match e.downcast_ref::<LinnaeaError>() {
            Some(LinnaeaError::InvalidInput(_)) => 2,
            Some(LinnaeaError::Io(_)) => 3,
            Some(LinnaeaError::Parse(_)) => 4,
            Some(LinnaeaError::Database(_)) => 5,
            Some(LinnaeaError::Configuration(_)) => 6,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // Expose the verbosity level to the command implementations
    std::env::set_var("LINNAEA_VERBOSE", cli.verbose.to_string());

    match cli.command {
        Commands::Load(args) => crate::cli::commands::load::run(args),
        Commands::Query(args) => crate::cli::commands::query::run(args),
        Commands::Filter(args) => crate::cli::commands::filter::run(args),
        Commands::Export(args) => crate::cli::commands::export::run(args),
    }
}
