use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use linnaea_storage::SqliteStore;

#[derive(Args)]
pub struct LoadArgs {
    /// Path of the SQLite database to create or extend
    #[arg(short, long)]
    pub db: Option<PathBuf>,

    /// Path to nodes.dmp
    #[arg(long)]
    pub nodes: Option<PathBuf>,

    /// Path to names.dmp
    #[arg(long)]
    pub names: Option<PathBuf>,

    /// Path to division.dmp
    #[arg(long)]
    pub divisions: Option<PathBuf>,

    /// Path to gencode.dmp
    #[arg(long)]
    pub gencodes: Option<PathBuf>,

    /// accession2taxid mapping files (tab-delimited, with header)
    #[arg(long = "accessions", value_name = "FILE", num_args = 1..)]
    pub accessions: Vec<PathBuf>,
}

fn spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .expect("valid progress template"),
    );
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

pub fn run(args: LoadArgs) -> Result<()> {
    let db_path = crate::cli::resolve_db_path(args.db)?;
    let mut store = SqliteStore::open(&db_path)?;

    println!(
        "{} Loading taxonomy files into {}",
        "►".cyan().bold(),
        db_path.display()
    );

    let taxdump_requested = args.nodes.is_some()
        || args.names.is_some()
        || args.divisions.is_some()
        || args.gencodes.is_some();

    if taxdump_requested {
        let bar = spinner("ingesting taxdump tables".to_string());
        let stats = store.load_taxdump(
            args.nodes.as_deref(),
            args.names.as_deref(),
            args.divisions.as_deref(),
            args.gencodes.as_deref(),
        )?;
        bar.finish_and_clear();

        if args.nodes.is_some() {
            println!("  {} nodes: {} rows", "✓".green(), stats.nodes);
        }
        if args.names.is_some() {
            println!("  {} names: {} rows", "✓".green(), stats.names);
        }
        if args.divisions.is_some() {
            println!("  {} divisions: {} rows", "✓".green(), stats.divisions);
        }
        if args.gencodes.is_some() {
            println!("  {} genetic codes: {} rows", "✓".green(), stats.gencodes);
        }
    }

    for path in &args.accessions {
        let bar = spinner(format!("ingesting {}", path.display()));
        let count = store.load_accessions(path)?;
        bar.finish_and_clear();
        println!(
            "  {} {}: {} rows",
            "✓".green(),
            path.display(),
            count
        );
    }

    if !taxdump_requested && args.accessions.is_empty() {
        println!("  {} nothing to load", "ℹ".blue());
        return Ok(());
    }

    println!("{} Database ready", "✓".green().bold());
    Ok(())
}
