//! SQLite-backed record store and NCBI taxonomy dump ingestion

pub mod export;
pub mod ingest;
pub mod sqlite;

pub use export::{export_table, ExportTable};
pub use ingest::loader::LoadStats;
pub use sqlite::SqliteStore;
