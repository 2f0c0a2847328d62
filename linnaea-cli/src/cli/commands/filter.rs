use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use tracing::debug;

use linnaea_core::error::LinnaeaError;
use linnaea_core::traverse::{collect_taxids, QueryOptions};
use linnaea_core::types::{parse_taxids, TaxId};
use linnaea_storage::SqliteStore;

#[derive(Args)]
pub struct FilterArgs {
    /// Path of the SQLite taxonomy database
    #[arg(short, long)]
    pub db: Option<PathBuf>,

    /// Seed taxids; the filter set is their expansion
    #[arg(short = 't', long = "taxids", value_name = "TAXID", num_args = 1.., required = true)]
    pub taxids: Vec<String>,

    /// accession2taxid mapping files to filter (tab-delimited, with header)
    #[arg(short = 'f', long = "files", value_name = "FILE", num_args = 1.., required = true)]
    pub files: Vec<PathBuf>,

    /// Leave out the descendant subtree of each seed
    #[arg(short = 'c', long)]
    pub no_children: bool,

    /// Include the ancestor lineage of each seed
    #[arg(short, long)]
    pub parents: bool,

    /// Print accessions whose taxid is NOT in the expanded set
    #[arg(short, long)]
    pub invert: bool,
}

/// Column positions found in the header line of a mapping file
struct MappingColumns {
    accession: usize,
    taxid: usize,
}

fn parse_header(header: &str, path: &Path) -> Result<MappingColumns, LinnaeaError> {
    let fields: Vec<&str> = header.split('\t').collect();
    let position = |name: &str| {
        fields.iter().position(|f| *f == name).ok_or_else(|| {
            LinnaeaError::Parse(format!(
                "no {:?} column in header of {}",
                name,
                path.display()
            ))
        })
    };
    Ok(MappingColumns {
        accession: position("accession")?,
        taxid: position("taxid")?,
    })
}

fn filter_file(path: &Path, wanted: &HashSet<TaxId>, invert: bool) -> Result<()> {
    let mut lines = BufReader::new(File::open(path)?).lines();

    let header = match lines.next() {
        Some(line) => line?,
        None => return Ok(()),
    };
    let columns = parse_header(&header, path)?;

    for line in lines {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        let wide_enough = columns.accession.max(columns.taxid) < fields.len();
        if !wide_enough {
            return Err(LinnaeaError::Parse(format!(
                "short record in {}: {:?}",
                path.display(),
                line
            ))
            .into());
        }

        let taxid: TaxId = fields[columns.taxid].parse()?;
        if wanted.contains(&taxid) != invert {
            println!("{}", fields[columns.accession]);
        }
    }

    Ok(())
}

pub fn run(args: FilterArgs) -> Result<()> {
    // Sanitise before any store access
    let seeds = parse_taxids(&args.taxids)?;

    let db_path = crate::cli::resolve_db_path(args.db)?;
    let store = SqliteStore::open(&db_path)?;

    let options = QueryOptions {
        children: !args.no_children,
        parents: args.parents,
        max_search_rows: None,
    };
    let wanted: HashSet<TaxId> = collect_taxids(&store, &seeds, &options)?
        .into_iter()
        .collect();
    debug!(taxids = wanted.len(), "expanded filter set");

    for path in &args.files {
        filter_file(path, &wanted, args.invert)?;
    }

    Ok(())
}
