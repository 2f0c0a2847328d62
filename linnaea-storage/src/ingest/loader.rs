//! Bulk loading of taxonomy dump files into the SQLite store
//!
//! Each loader streams its file line by line and inserts inside a single
//! transaction: commit on success, rollback on any error on the way out
//! (the transaction rolls back when dropped uncommitted), so a failed load
//! leaves the store exactly as it was.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rusqlite::{params, Transaction};
use tracing::info;

use linnaea_core::error::{LinnaeaError, LinnaeaResult};
use linnaea_core::types::{AccessionMapping, Division, GenCode, TaxId, TaxonName, TaxonomyNode};

use super::dmp::DmpRecord;
use crate::sqlite::{db_err, SqliteStore};

/// Row counts from one [`SqliteStore::load_taxdump`] call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub nodes: usize,
    pub names: usize,
    pub divisions: usize,
    pub gencodes: usize,
}

fn insert_nodes(tx: &Transaction<'_>, path: &Path) -> LinnaeaResult<usize> {
    let reader = BufReader::new(File::open(path)?);
    let mut stmt = tx
        .prepare(
            "INSERT INTO nodes (taxid, parent_taxid, rank, embl_code, division_id, \
             inherited_div_flag, genetic_code_id, inherited_gc_flag, mito_genetic_code_id, \
             inherited_mgc_flag, genbank_hidden_flag, hidden_subtree_root_flag, comments) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .map_err(db_err)?;

    let mut count = 0;
    for line in reader.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let node = TaxonomyNode::parse_line(&line)?;
        stmt.execute(params![
            node.taxid.value(),
            node.parent_taxid.value(),
            node.rank,
            node.embl_code,
            node.division_id,
            node.inherited_div_flag,
            node.genetic_code_id,
            node.inherited_gc_flag,
            node.mito_genetic_code_id,
            node.inherited_mgc_flag,
            node.genbank_hidden_flag,
            node.hidden_subtree_root_flag,
            node.comments,
        ])
        .map_err(db_err)?;
        count += 1;
    }
    Ok(count)
}

fn insert_names(tx: &Transaction<'_>, path: &Path) -> LinnaeaResult<usize> {
    let reader = BufReader::new(File::open(path)?);
    let mut stmt = tx
        .prepare("INSERT INTO names (taxid, name, unique_name, name_class) VALUES (?, ?, ?, ?)")
        .map_err(db_err)?;

    let mut count = 0;
    for line in reader.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let name = TaxonName::parse_line(&line)?;
        stmt.execute(params![
            name.taxid.value(),
            name.name,
            name.unique_name,
            name.name_class,
        ])
        .map_err(db_err)?;
        count += 1;
    }
    Ok(count)
}

fn insert_divisions(tx: &Transaction<'_>, path: &Path) -> LinnaeaResult<usize> {
    let reader = BufReader::new(File::open(path)?);
    let mut stmt = tx
        .prepare(
            "INSERT INTO division (division_id, division_cde, division_name, comments) \
             VALUES (?, ?, ?, ?)",
        )
        .map_err(db_err)?;

    let mut count = 0;
    for line in reader.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let division = Division::parse_line(&line)?;
        stmt.execute(params![
            division.division_id,
            division.code,
            division.name,
            division.comments,
        ])
        .map_err(db_err)?;
        count += 1;
    }
    Ok(count)
}

fn insert_gencodes(tx: &Transaction<'_>, path: &Path) -> LinnaeaResult<usize> {
    let reader = BufReader::new(File::open(path)?);
    let mut stmt = tx
        .prepare(
            "INSERT INTO gencode (code_id, abbreviation, name, cde, starts) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .map_err(db_err)?;

    let mut count = 0;
    for line in reader.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let gencode = GenCode::parse_line(&line)?;
        stmt.execute(params![
            gencode.code_id,
            gencode.abbreviation,
            gencode.name,
            gencode.translation_table,
            gencode.start_codons,
        ])
        .map_err(db_err)?;
        count += 1;
    }
    Ok(count)
}

/// One data row of an accession2taxid file: plain tab-delimited,
/// `accession accession.version taxid gi`
fn parse_accession_line(line: &str) -> LinnaeaResult<AccessionMapping> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() != 4 {
        return Err(LinnaeaError::Parse(format!(
            "expected 4 tab-delimited fields, found {}: {:?}",
            fields.len(),
            line
        )));
    }
    Ok(AccessionMapping {
        accession: fields[0].to_string(),
        accession_version: fields[1].to_string(),
        taxid: fields[2]
            .parse::<u32>()
            .map(TaxId)
            .map_err(|_| LinnaeaError::Parse(format!("invalid taxid: {:?}", fields[2])))?,
        gi: fields[3]
            .parse::<i64>()
            .map_err(|_| LinnaeaError::Parse(format!("invalid gi: {:?}", fields[3])))?,
    })
}

fn insert_accessions(tx: &Transaction<'_>, path: &Path) -> LinnaeaResult<usize> {
    let reader = BufReader::new(File::open(path)?);
    let mut stmt = tx
        .prepare(
            "INSERT INTO accessions (accession, accession_version, taxid, gi) \
             VALUES (?, ?, ?, ?)",
        )
        .map_err(db_err)?;

    let mut count = 0;
    // These files carry a header line, unlike the taxdump family
    for line in reader.lines().skip(1) {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let mapping = parse_accession_line(&line)?;
        stmt.execute(params![
            mapping.accession,
            mapping.accession_version,
            mapping.taxid.value(),
            mapping.gi,
        ])
        .map_err(db_err)?;
        count += 1;
    }
    Ok(count)
}

impl SqliteStore {
    /// Load `nodes.dmp` in one transaction, returning the row count
    pub fn load_nodes(&mut self, path: impl AsRef<Path>) -> LinnaeaResult<usize> {
        let tx = self.connection_mut().transaction().map_err(db_err)?;
        let count = insert_nodes(&tx, path.as_ref())?;
        tx.commit().map_err(db_err)?;
        info!(rows = count, file = %path.as_ref().display(), "loaded nodes");
        Ok(count)
    }

    /// Load `names.dmp` in one transaction, returning the row count
    pub fn load_names(&mut self, path: impl AsRef<Path>) -> LinnaeaResult<usize> {
        let tx = self.connection_mut().transaction().map_err(db_err)?;
        let count = insert_names(&tx, path.as_ref())?;
        tx.commit().map_err(db_err)?;
        info!(rows = count, file = %path.as_ref().display(), "loaded names");
        Ok(count)
    }

    /// Load `division.dmp` in one transaction, returning the row count
    pub fn load_divisions(&mut self, path: impl AsRef<Path>) -> LinnaeaResult<usize> {
        let tx = self.connection_mut().transaction().map_err(db_err)?;
        let count = insert_divisions(&tx, path.as_ref())?;
        tx.commit().map_err(db_err)?;
        info!(rows = count, file = %path.as_ref().display(), "loaded divisions");
        Ok(count)
    }

    /// Load `gencode.dmp` in one transaction, returning the row count
    pub fn load_gencodes(&mut self, path: impl AsRef<Path>) -> LinnaeaResult<usize> {
        let tx = self.connection_mut().transaction().map_err(db_err)?;
        let count = insert_gencodes(&tx, path.as_ref())?;
        tx.commit().map_err(db_err)?;
        info!(rows = count, file = %path.as_ref().display(), "loaded genetic codes");
        Ok(count)
    }

    /// Load an accession2taxid mapping file in one transaction, returning
    /// the row count. These can be very large; callers usually loop over
    /// several of them.
    pub fn load_accessions(&mut self, path: impl AsRef<Path>) -> LinnaeaResult<usize> {
        let tx = self.connection_mut().transaction().map_err(db_err)?;
        let count = insert_accessions(&tx, path.as_ref())?;
        tx.commit().map_err(db_err)?;
        info!(rows = count, file = %path.as_ref().display(), "loaded accession mappings");
        Ok(count)
    }

    /// Load any subset of the taxdump family inside a single transaction.
    /// A failure in any file rolls back every table.
    pub fn load_taxdump(
        &mut self,
        nodes: Option<&Path>,
        names: Option<&Path>,
        divisions: Option<&Path>,
        gencodes: Option<&Path>,
    ) -> LinnaeaResult<LoadStats> {
        let tx = self.connection_mut().transaction().map_err(db_err)?;
        let mut stats = LoadStats::default();

        if let Some(path) = nodes {
            stats.nodes = insert_nodes(&tx, path)?;
        }
        if let Some(path) = names {
            stats.names = insert_names(&tx, path)?;
        }
        if let Some(path) = divisions {
            stats.divisions = insert_divisions(&tx, path)?;
        }
        if let Some(path) = gencodes {
            stats.gencodes = insert_gencodes(&tx, path)?;
        }

        tx.commit().map_err(db_err)?;
        info!(
            nodes = stats.nodes,
            names = stats.names,
            divisions = stats.divisions,
            gencodes = stats.gencodes,
            "taxdump load committed"
        );
        Ok(stats)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    use linnaea_core::store::{NodeField, RecordStore};

    use super::*;

    pub(crate) const SAMPLE_NODES: &str = "\
1\t|\t1\t|\tno rank\t|\t\t|\t8\t|\t0\t|\t1\t|\t0\t|\t0\t|\t0\t|\t0\t|\t0\t|\t\t|
2\t|\t1\t|\tsuperkingdom\t|\t\t|\t0\t|\t0\t|\t11\t|\t0\t|\t0\t|\t0\t|\t0\t|\t0\t|\t\t|
1224\t|\t2\t|\tphylum\t|\t\t|\t0\t|\t1\t|\t11\t|\t1\t|\t0\t|\t1\t|\t0\t|\t0\t|\t\t|
";

    pub(crate) const SAMPLE_NAMES: &str = "\
1\t|\tall\t|\t\t|\tsynonym\t|
1\t|\troot\t|\t\t|\tscientific name\t|
2\t|\tBacteria\t|\tBacteria <bacteria>\t|\tscientific name\t|
2\t|\teubacteria\t|\t\t|\tgenbank common name\t|
1224\t|\tProteobacteria\t|\t\t|\tscientific name\t|
";

    pub(crate) const SAMPLE_DIVISIONS: &str = "\
0\t|\tBCT\t|\tBacteria\t|\t\t|
8\t|\tUNA\t|\tUnannotated\t|\tNo species nodes should inherit this division assignment\t|
";

    pub(crate) const SAMPLE_GENCODES: &str = "\
0\t|\t\t|\tUnspecified\t|\t\t|\t\t|
1\t|\tSGC0\t|\tStandard\t|\t\t|\t---M---------------M---------------M\t|
";

    pub(crate) const SAMPLE_ACCESSIONS: &str = "\
accession\taccession.version\ttaxid\tgi
A00001\tA00001.1\t10641\t58418
A00002\tA00002.1\t9913\t2
A00003\tA00003.1\t1224\t3
";

    pub(crate) fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn test_load_nodes() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let file = write_temp(SAMPLE_NODES);

        let count = store.load_nodes(file.path()).unwrap();
        assert_eq!(count, 3);

        let node = store.node_matching(NodeField::TaxId, TaxId(1224)).unwrap();
        assert_eq!(node.parent_taxid, TaxId(2));
        assert_eq!(node.rank, "phylum");
        assert!(node.inherited_div_flag);
        assert!(node.genbank_hidden_flag);
    }

    #[test]
    fn test_load_names_with_class_filter() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let file = write_temp(SAMPLE_NAMES);

        let count = store.load_names(file.path()).unwrap();
        assert_eq!(count, 5);

        let all = store
            .names_for_taxids(&[TaxId(1), TaxId(2)], None)
            .unwrap();
        assert_eq!(all.len(), 4);

        let scientific = store
            .names_for_taxids(&[TaxId(1), TaxId(2)], Some("scientific name"))
            .unwrap();
        let names: Vec<&str> = scientific.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["root", "Bacteria"]);
    }

    #[test]
    fn test_load_divisions_and_gencodes() {
        let mut store = SqliteStore::open_in_memory().unwrap();

        let divisions = write_temp(SAMPLE_DIVISIONS);
        assert_eq!(store.load_divisions(divisions.path()).unwrap(), 2);

        let gencodes = write_temp(SAMPLE_GENCODES);
        assert_eq!(store.load_gencodes(gencodes.path()).unwrap(), 2);
    }

    #[test]
    fn test_load_accessions_skips_header() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let file = write_temp(SAMPLE_ACCESSIONS);

        let count = store.load_accessions(file.path()).unwrap();
        assert_eq!(count, 3);

        let mappings = store.accessions_for_taxids(&[TaxId(1224)]).unwrap();
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].accession_version, "A00003.1");
        assert_eq!(mappings[0].gi, 3);
    }

    #[test]
    fn test_load_taxdump_together() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let nodes = write_temp(SAMPLE_NODES);
        let names = write_temp(SAMPLE_NAMES);
        let divisions = write_temp(SAMPLE_DIVISIONS);
        let gencodes = write_temp(SAMPLE_GENCODES);

        let stats = store
            .load_taxdump(
                Some(nodes.path()),
                Some(names.path()),
                Some(divisions.path()),
                Some(gencodes.path()),
            )
            .unwrap();

        assert_eq!(
            stats,
            LoadStats {
                nodes: 3,
                names: 5,
                divisions: 2,
                gencodes: 2,
            }
        );
    }

    #[test]
    fn test_parse_failure_rolls_back_whole_batch() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let broken = format!(
            "{}bogus\t|\tline\t|\n",
            SAMPLE_NODES
        );
        let file = write_temp(&broken);

        match store.load_nodes(file.path()) {
            Err(LinnaeaError::Parse(_)) => {}
            other => panic!("Expected Parse error, got {:?}", other),
        }
        // The rows before the bad line must not survive
        assert_eq!(store.node_count().unwrap(), 0);
    }

    #[test]
    fn test_accession_line_rejects_bad_taxid() {
        assert!(parse_accession_line("A\tA.1\tnope\t1").is_err());
        assert!(parse_accession_line("A\tA.1\t5").is_err());
    }
}
