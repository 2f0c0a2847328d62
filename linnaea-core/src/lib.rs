//! Core types and the taxonomy tree traversal engine shared across all
//! Linnaea crates

pub mod config;
pub mod error;
pub mod store;
pub mod traverse;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::{load_config, save_config, Config};
pub use error::{LinnaeaError, LinnaeaResult};
pub use store::{fetch_in_batches, NodeField, RecordStore, MAX_SEARCH_ROWS};
pub use traverse::{
    ancestors, collect_taxids, descendants, resolve_nodes, QueryOptions, Seed,
};
pub use types::{
    parse_taxids, AccessionMapping, Division, GenCode, TaxId, TaxonName, TaxonomyNode,
};

/// Version information for the Linnaea project
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
