//! Record store interface consumed by the traversal engine
//!
//! The store answers exact equality-set lookups against the nodes table.
//! It does not batch by itself; callers go through [`fetch_in_batches`] so
//! that a single query never carries more than [`MAX_SEARCH_ROWS`] bound
//! values (backends cap the number of parameters per statement).

use crate::error::LinnaeaResult;
use crate::types::{TaxId, TaxonomyNode};

/// The maximum number of values bound into a single store query
pub const MAX_SEARCH_ROWS: usize = 900;

/// Node table columns that support equality-set lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeField {
    TaxId,
    ParentTaxId,
}

impl NodeField {
    pub fn column_name(&self) -> &'static str {
        match self {
            NodeField::TaxId => "taxid",
            NodeField::ParentTaxId => "parent_taxid",
        }
    }
}

/// Read access to persisted taxonomy node rows
pub trait RecordStore {
    /// All nodes whose `field` value is in `values`. Values without a
    /// matching row are silently absent from the result.
    fn nodes_matching(
        &self,
        field: NodeField,
        values: &[TaxId],
    ) -> LinnaeaResult<Vec<TaxonomyNode>>;

    /// The single node whose `field` value equals `value`. Zero matches is
    /// a `NotFound` error and more than one is `AmbiguousResult` — unlike
    /// the batch lookup, which never errors on missing values.
    fn node_matching(&self, field: NodeField, value: TaxId) -> LinnaeaResult<TaxonomyNode>;
}

/// Look up an unbounded value list in chunks of at most `max_rows`
/// (default [`MAX_SEARCH_ROWS`]), concatenating results in chunk order.
/// Empty input returns an empty result without touching the store.
pub fn fetch_in_batches<S: RecordStore + ?Sized>(
    store: &S,
    field: NodeField,
    values: &[TaxId],
    max_rows: Option<usize>,
) -> LinnaeaResult<Vec<TaxonomyNode>> {
    let max_rows = max_rows.unwrap_or(MAX_SEARCH_ROWS).max(1);

    let mut records = Vec::new();
    for chunk in values.chunks(max_rows) {
        records.extend(store.nodes_matching(field, chunk)?);
    }
    Ok(records)
}
