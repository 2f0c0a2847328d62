//! In-memory record store used by the unit tests

use std::cell::Cell;

use crate::error::{LinnaeaError, LinnaeaResult};
use crate::store::{NodeField, RecordStore};
use crate::types::{TaxId, TaxonomyNode};

/// Fixed node set answering lookups in insertion order, counting how many
/// store queries a caller issued.
pub(crate) struct MemoryStore {
    nodes: Vec<TaxonomyNode>,
    queries: Cell<usize>,
}

impl MemoryStore {
    /// Build a store from `(taxid, parent_taxid, rank)` triples
    pub fn with_nodes(rows: &[(u32, u32, &str)]) -> Self {
        let nodes = rows
            .iter()
            .map(|&(taxid, parent, rank)| {
                TaxonomyNode::new(TaxId(taxid), TaxId(parent), rank)
            })
            .collect();
        Self {
            nodes,
            queries: Cell::new(0),
        }
    }

    pub fn query_count(&self) -> usize {
        self.queries.get()
    }

    fn field_value(node: &TaxonomyNode, field: NodeField) -> TaxId {
        match field {
            NodeField::TaxId => node.taxid,
            NodeField::ParentTaxId => node.parent_taxid,
        }
    }
}

impl RecordStore for MemoryStore {
    fn nodes_matching(
        &self,
        field: NodeField,
        values: &[TaxId],
    ) -> LinnaeaResult<Vec<TaxonomyNode>> {
        self.queries.set(self.queries.get() + 1);
        Ok(self
            .nodes
            .iter()
            .filter(|n| values.contains(&Self::field_value(n, field)))
            .cloned()
            .collect())
    }

    fn node_matching(&self, field: NodeField, value: TaxId) -> LinnaeaResult<TaxonomyNode> {
        let mut matches = self.nodes_matching(field, &[value])?;
        match matches.len() {
            0 => Err(LinnaeaError::NotFound(format!(
                "no node with {} = {}",
                field.column_name(),
                value
            ))),
            1 => Ok(matches.remove(0)),
            n => Err(LinnaeaError::AmbiguousResult(format!(
                "{} nodes with {} = {}",
                n,
                field.column_name(),
                value
            ))),
        }
    }
}
