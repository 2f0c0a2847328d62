pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use linnaea_core::config::{load_config, Config};

#[derive(Parser)]
#[command(
    name = "linnaea",
    version,
    about = "NCBI taxonomy database construction and lineage queries",
    long_about = "Linnaea loads the NCBI taxonomy dump files (nodes, names, divisions, \
                  genetic codes, accession mappings) into a SQLite database and expands \
                  seed taxids into their descendant subtrees and ancestor lineages."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a taxonomy database from NCBI dump files
    Load(commands::load::LoadArgs),

    /// Expand seed taxids into their subtree and/or lineage
    Query(commands::query::QueryArgs),

    /// Filter accession2taxid mapping files by an expanded taxid set
    Filter(commands::filter::FilterArgs),

    /// Write a database table back out in NCBI dump format
    Export(commands::export::ExportArgs),
}

/// Database path resolution order: explicit flag, then the config file
/// named by `LINNAEA_CONFIG`, then `linnaea.toml` in the working
/// directory, then the built-in default.
pub(crate) fn resolve_db_path(explicit: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }

    let candidate = std::env::var_os("LINNAEA_CONFIG")
        .map(PathBuf::from)
        .or_else(|| {
            let local = PathBuf::from("linnaea.toml");
            local.exists().then_some(local)
        });

    let config = match candidate {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    Ok(config.database.path)
}
