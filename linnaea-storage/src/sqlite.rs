//! SQLite implementation of the record store

use std::path::Path;

use rusqlite::{params, params_from_iter, Connection, Row};
use tracing::debug;

use linnaea_core::error::{LinnaeaError, LinnaeaResult};
use linnaea_core::store::{NodeField, RecordStore, MAX_SEARCH_ROWS};
use linnaea_core::types::{AccessionMapping, TaxId, TaxonName, TaxonomyNode};

pub(crate) const NODE_COLUMNS: &str = "taxid, parent_taxid, rank, embl_code, division_id, \
     inherited_div_flag, genetic_code_id, inherited_gc_flag, mito_genetic_code_id, \
     inherited_mgc_flag, genbank_hidden_flag, hidden_subtree_root_flag, comments";

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS nodes (
    taxid                    INTEGER PRIMARY KEY,
    parent_taxid             INTEGER NOT NULL,
    rank                     TEXT NOT NULL,
    embl_code                TEXT NOT NULL,
    division_id              INTEGER NOT NULL,
    inherited_div_flag       INTEGER NOT NULL,
    genetic_code_id          TEXT NOT NULL,
    inherited_gc_flag        INTEGER NOT NULL,
    mito_genetic_code_id     TEXT NOT NULL,
    inherited_mgc_flag       INTEGER NOT NULL,
    genbank_hidden_flag      INTEGER NOT NULL,
    hidden_subtree_root_flag INTEGER NOT NULL,
    comments                 TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_nodes_parent_taxid ON nodes(parent_taxid);

CREATE TABLE IF NOT EXISTS names (
    id          INTEGER PRIMARY KEY,
    taxid       INTEGER NOT NULL,
    name        TEXT NOT NULL,
    unique_name TEXT NOT NULL,
    name_class  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_names_taxid ON names(taxid);

CREATE TABLE IF NOT EXISTS division (
    division_id   INTEGER PRIMARY KEY,
    division_cde  TEXT NOT NULL,
    division_name TEXT NOT NULL,
    comments      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS gencode (
    code_id      TEXT PRIMARY KEY,
    abbreviation TEXT NOT NULL,
    name         TEXT NOT NULL,
    cde          TEXT NOT NULL,
    starts       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS accessions (
    accession         TEXT NOT NULL,
    accession_version TEXT PRIMARY KEY,
    taxid             INTEGER NOT NULL,
    gi                INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_accessions_taxid ON accessions(taxid);
";

/// Map a rusqlite failure into the shared error type
pub(crate) fn db_err(e: rusqlite::Error) -> LinnaeaError {
    LinnaeaError::Database(e.to_string())
}

pub(crate) fn row_to_node(row: &Row<'_>) -> rusqlite::Result<TaxonomyNode> {
    Ok(TaxonomyNode {
        taxid: TaxId(row.get(0)?),
        parent_taxid: TaxId(row.get(1)?),
        rank: row.get(2)?,
        embl_code: row.get(3)?,
        division_id: row.get(4)?,
        inherited_div_flag: row.get(5)?,
        genetic_code_id: row.get(6)?,
        inherited_gc_flag: row.get(7)?,
        mito_genetic_code_id: row.get(8)?,
        inherited_mgc_flag: row.get(9)?,
        genbank_hidden_flag: row.get(10)?,
        hidden_subtree_root_flag: row.get(11)?,
        comments: row.get(12)?,
    })
}

pub(crate) fn row_to_name(row: &Row<'_>) -> rusqlite::Result<TaxonName> {
    Ok(TaxonName {
        taxid: TaxId(row.get(0)?),
        name: row.get(1)?,
        unique_name: row.get(2)?,
        name_class: row.get(3)?,
    })
}

fn row_to_accession(row: &Row<'_>) -> rusqlite::Result<AccessionMapping> {
    Ok(AccessionMapping {
        accession: row.get(0)?,
        accession_version: row.get(1)?,
        taxid: TaxId(row.get(2)?),
        gi: row.get(3)?,
    })
}

/// Taxonomy database on a single SQLite connection. The schema is created
/// on open; ingestion and queries share the connection, one caller at a
/// time.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (creating if needed) a taxonomy database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> LinnaeaResult<Self> {
        let conn = Connection::open(path.as_ref()).map_err(db_err)?;
        Self::from_connection(conn)
    }

    /// In-memory database, used by the test suites
    pub fn open_in_memory() -> LinnaeaResult<Self> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> LinnaeaResult<Self> {
        conn.execute_batch(SCHEMA).map_err(db_err)?;
        Ok(Self { conn })
    }

    pub(crate) fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Number of rows in the nodes table
    pub fn node_count(&self) -> LinnaeaResult<usize> {
        self.conn
            .query_row("SELECT COUNT(*) FROM nodes", [], |row| row.get::<_, i64>(0))
            .map(|n| n as usize)
            .map_err(db_err)
    }

    /// Name rows for the given taxids, optionally restricted to one name
    /// class (e.g. "scientific name"). Batched internally like the node
    /// lookups.
    pub fn names_for_taxids(
        &self,
        taxids: &[TaxId],
        name_class: Option<&str>,
    ) -> LinnaeaResult<Vec<TaxonName>> {
        let mut results = Vec::new();
        for chunk in taxids.chunks(MAX_SEARCH_ROWS) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let mut sql = format!(
                "SELECT taxid, name, unique_name, name_class FROM names WHERE taxid IN ({})",
                placeholders
            );
            if name_class.is_some() {
                sql.push_str(" AND name_class = ?");
            }

            let mut stmt = self.conn.prepare(&sql).map_err(db_err)?;
            let mut values: Vec<rusqlite::types::Value> = chunk
                .iter()
                .map(|t| rusqlite::types::Value::from(t.value() as i64))
                .collect();
            if let Some(class) = name_class {
                values.push(rusqlite::types::Value::from(class.to_string()));
            }

            let rows = stmt
                .query_map(params_from_iter(values.iter()), row_to_name)
                .map_err(db_err)?;
            for row in rows {
                results.push(row.map_err(db_err)?);
            }
        }
        Ok(results)
    }

    /// Accession mapping rows for the given taxids
    pub fn accessions_for_taxids(
        &self,
        taxids: &[TaxId],
    ) -> LinnaeaResult<Vec<AccessionMapping>> {
        let mut results = Vec::new();
        for chunk in taxids.chunks(MAX_SEARCH_ROWS) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!(
                "SELECT accession, accession_version, taxid, gi FROM accessions \
                 WHERE taxid IN ({})",
                placeholders
            );
            let mut stmt = self.conn.prepare(&sql).map_err(db_err)?;
            let rows = stmt
                .query_map(
                    params_from_iter(chunk.iter().map(|t| t.value())),
                    row_to_accession,
                )
                .map_err(db_err)?;
            for row in rows {
                results.push(row.map_err(db_err)?);
            }
        }
        Ok(results)
    }
}

impl RecordStore for SqliteStore {
    fn nodes_matching(
        &self,
        field: NodeField,
        values: &[TaxId],
    ) -> LinnaeaResult<Vec<TaxonomyNode>> {
        if values.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; values.len()].join(", ");
        let sql = format!(
            "SELECT {} FROM nodes WHERE {} IN ({})",
            NODE_COLUMNS,
            field.column_name(),
            placeholders
        );
        debug!(column = field.column_name(), values = values.len(), "node set lookup");

        let mut stmt = self.conn.prepare(&sql).map_err(db_err)?;
        let rows = stmt
            .query_map(params_from_iter(values.iter().map(|t| t.value())), row_to_node)
            .map_err(db_err)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(db_err)?);
        }
        Ok(records)
    }

    fn node_matching(&self, field: NodeField, value: TaxId) -> LinnaeaResult<TaxonomyNode> {
        // Read up to two rows so zero and many matches stay distinguishable
        let sql = format!(
            "SELECT {} FROM nodes WHERE {} = ? LIMIT 2",
            NODE_COLUMNS,
            field.column_name()
        );
        let mut stmt = self.conn.prepare(&sql).map_err(db_err)?;
        let rows = stmt
            .query_map(params![value.value()], row_to_node)
            .map_err(db_err)?;

        let mut matches = Vec::new();
        for row in rows {
            matches.push(row.map_err(db_err)?);
        }

        match matches.len() {
            0 => Err(LinnaeaError::NotFound(format!(
                "no node with {} = {}",
                field.column_name(),
                value
            ))),
            1 => Ok(matches.remove(0)),
            _ => Err(LinnaeaError::AmbiguousResult(format!(
                "more than one node with {} = {}",
                field.column_name(),
                value
            ))),
        }
    }
}
