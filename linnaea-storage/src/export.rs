//! Write database tables back out in their NCBI dump formats
//!
//! The output is byte-compatible with what ingestion accepts, so a loaded
//! table can be regenerated as a `.dmp` file.

use std::io::Write;

use rusqlite::Row;
use tracing::info;

use linnaea_core::error::LinnaeaResult;
use linnaea_core::types::{Division, GenCode};

use crate::ingest::dmp::DmpRecord;
use crate::sqlite::{db_err, row_to_name, row_to_node, SqliteStore, NODE_COLUMNS};

/// Tables with a dump-format text representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTable {
    Nodes,
    Names,
    Divisions,
    GenCodes,
}

fn row_to_division(row: &Row<'_>) -> rusqlite::Result<Division> {
    Ok(Division {
        division_id: row.get(0)?,
        code: row.get(1)?,
        name: row.get(2)?,
        comments: row.get(3)?,
    })
}

fn row_to_gencode(row: &Row<'_>) -> rusqlite::Result<GenCode> {
    Ok(GenCode {
        code_id: row.get(0)?,
        abbreviation: row.get(1)?,
        name: row.get(2)?,
        translation_table: row.get(3)?,
        start_codons: row.get(4)?,
    })
}

fn write_rows<R, F, W>(
    store: &SqliteStore,
    sql: &str,
    to_record: F,
    out: &mut W,
) -> LinnaeaResult<usize>
where
    R: DmpRecord,
    F: Fn(&Row<'_>) -> rusqlite::Result<R>,
    W: Write,
{
    let mut stmt = store.connection().prepare(sql).map_err(db_err)?;
    let rows = stmt.query_map([], to_record).map_err(db_err)?;

    let mut count = 0;
    for row in rows {
        let record = row.map_err(db_err)?;
        writeln!(out, "{}", record.format_line())?;
        count += 1;
    }
    Ok(count)
}

/// Stream one table to `out` in its dump format, returning the row count
pub fn export_table<W: Write>(
    store: &SqliteStore,
    table: ExportTable,
    out: &mut W,
) -> LinnaeaResult<usize> {
    let count = match table {
        ExportTable::Nodes => write_rows(
            store,
            &format!("SELECT {} FROM nodes ORDER BY taxid", NODE_COLUMNS),
            row_to_node,
            out,
        )?,
        ExportTable::Names => write_rows(
            store,
            "SELECT taxid, name, unique_name, name_class FROM names ORDER BY id",
            row_to_name,
            out,
        )?,
        ExportTable::Divisions => write_rows(
            store,
            "SELECT division_id, division_cde, division_name, comments FROM division \
             ORDER BY division_id",
            row_to_division,
            out,
        )?,
        ExportTable::GenCodes => write_rows(
            store,
            "SELECT code_id, abbreviation, name, cde, starts FROM gencode ORDER BY rowid",
            row_to_gencode,
            out,
        )?,
    };
    info!(?table, rows = count, "exported table");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ingest::loader::tests::{
        write_temp, SAMPLE_DIVISIONS, SAMPLE_NAMES, SAMPLE_NODES,
    };

    fn export_to_string(store: &SqliteStore, table: ExportTable) -> String {
        let mut out = Vec::new();
        export_table(store, table, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_nodes_round_trip_through_export() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let file = write_temp(SAMPLE_NODES);
        store.load_nodes(file.path()).unwrap();

        assert_eq!(export_to_string(&store, ExportTable::Nodes), SAMPLE_NODES);
    }

    #[test]
    fn test_names_round_trip_through_export() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let file = write_temp(SAMPLE_NAMES);
        store.load_names(file.path()).unwrap();

        assert_eq!(export_to_string(&store, ExportTable::Names), SAMPLE_NAMES);
    }

    #[test]
    fn test_divisions_round_trip_through_export() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let file = write_temp(SAMPLE_DIVISIONS);
        store.load_divisions(file.path()).unwrap();

        assert_eq!(
            export_to_string(&store, ExportTable::Divisions),
            SAMPLE_DIVISIONS
        );
    }

    #[test]
    fn test_empty_table_exports_nothing() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut out = Vec::new();
        let count = export_table(&store, ExportTable::GenCodes, &mut out).unwrap();
        assert_eq!(count, 0);
        assert!(out.is_empty());
    }
}
