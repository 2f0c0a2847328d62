pub mod records;
pub mod taxonomy;

pub use records::{AccessionMapping, Division, GenCode, TaxonName, TaxonomyNode};
pub use taxonomy::{parse_taxids, TaxId};
