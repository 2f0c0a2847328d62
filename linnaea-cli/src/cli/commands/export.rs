use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::*;

use linnaea_storage::{export_table, ExportTable, SqliteStore};

#[derive(Args)]
pub struct ExportArgs {
    /// Path of the SQLite taxonomy database
    #[arg(short, long)]
    pub db: Option<PathBuf>,

    /// Table to export
    #[arg(long, value_enum)]
    pub table: TableArg,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TableArg {
    Nodes,
    Names,
    Divisions,
    Gencodes,
}

impl From<TableArg> for ExportTable {
    fn from(table: TableArg) -> Self {
        match table {
            TableArg::Nodes => ExportTable::Nodes,
            TableArg::Names => ExportTable::Names,
            TableArg::Divisions => ExportTable::Divisions,
            TableArg::Gencodes => ExportTable::GenCodes,
        }
    }
}

pub fn run(args: ExportArgs) -> Result<()> {
    let db_path = crate::cli::resolve_db_path(args.db)?;
    let store = SqliteStore::open(&db_path)?;

    let count = match &args.output {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            let count = export_table(&store, args.table.into(), &mut out)?;
            out.flush()?;
            println!(
                "{} Wrote {} rows to {}",
                "✓".green().bold(),
                count,
                path.display()
            );
            count
        }
        None => {
            // Keep stdout clean: rows only, status stays off it
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            let count = export_table(&store, args.table.into(), &mut out)?;
            out.flush()?;
            count
        }
    };

    tracing::info!(rows = count, "export finished");
    Ok(())
}
