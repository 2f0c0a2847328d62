use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};

use linnaea_core::traverse::{collect_taxids, QueryOptions};
use linnaea_core::types::parse_taxids;
use linnaea_storage::SqliteStore;

#[derive(Args)]
pub struct QueryArgs {
    /// Path of the SQLite taxonomy database
    #[arg(short, long)]
    pub db: Option<PathBuf>,

    /// Seed taxids to expand
    #[arg(short = 't', long = "taxids", value_name = "TAXID", num_args = 1.., required = true)]
    pub taxids: Vec<String>,

    /// Leave out the descendant subtree of each seed
    #[arg(short = 'c', long)]
    pub no_children: bool,

    /// Include the ancestor lineage of each seed
    #[arg(short, long)]
    pub parents: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One taxid per line
    Plain,
    /// JSON array of taxids
    Json,
}

pub fn run(args: QueryArgs) -> Result<()> {
    // Sanitise before any store access
    let seeds = parse_taxids(&args.taxids)?;

    let db_path = crate::cli::resolve_db_path(args.db)?;
    let store = SqliteStore::open(&db_path)?;

    let options = QueryOptions {
        children: !args.no_children,
        parents: args.parents,
        max_search_rows: None,
    };
    let taxids = collect_taxids(&store, &seeds, &options)?;

    match args.format {
        OutputFormat::Plain => {
            for taxid in &taxids {
                println!("{}", taxid);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(&taxids)?);
        }
    }

    Ok(())
}
