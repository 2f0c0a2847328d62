//! Ancestor and descendant closures over the taxonomy parent-pointer tree
//!
//! Both traversals expand level by level with an explicit frontier and a
//! seen-set (no call-stack recursion; NCBI lineages can be deeper than a
//! default stack likes). Each top-level call owns its own seen-set, so
//! independent calls never share state. The seen-set only grows and the
//! identifier space is finite, so expansion terminates even on degenerate
//! data: every taxid is fetched at most once per call.

use std::collections::HashSet;

use tracing::debug;

use crate::error::LinnaeaResult;
use crate::store::{fetch_in_batches, NodeField, RecordStore};
use crate::types::{TaxId, TaxonomyNode};

/// Traversal seed: either an already-resolved node record or a raw taxid
/// still to be looked up.
#[derive(Debug, Clone)]
pub enum Seed {
    Node(TaxonomyNode),
    Id(TaxId),
}

impl From<TaxonomyNode> for Seed {
    fn from(node: TaxonomyNode) -> Self {
        Seed::Node(node)
    }
}

impl From<TaxId> for Seed {
    fn from(taxid: TaxId) -> Self {
        Seed::Id(taxid)
    }
}

impl From<u32> for Seed {
    fn from(taxid: u32) -> Self {
        Seed::Id(TaxId(taxid))
    }
}

/// Which closures [`collect_taxids`] should expand around the seeds
#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// Include the full descendant subtree of each seed
    pub children: bool,
    /// Include the ancestor chain of each seed up to the root
    pub parents: bool,
    /// Override for the per-query value bound of the batched lookup
    pub max_search_rows: Option<usize>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            children: true,
            parents: false,
            max_search_rows: None,
        }
    }
}

fn partition_seeds(seeds: &[Seed]) -> (Vec<TaxonomyNode>, Vec<TaxId>) {
    let mut nodes = Vec::new();
    let mut raw = Vec::new();
    for seed in seeds {
        match seed {
            Seed::Node(node) => nodes.push(node.clone()),
            Seed::Id(taxid) => raw.push(*taxid),
        }
    }
    (nodes, raw)
}

/// Frontier values not yet seen, first occurrence only, input order kept
fn next_unseen(frontier: &[TaxId], seen: &HashSet<TaxId>) -> Vec<TaxId> {
    let mut level = HashSet::new();
    frontier
        .iter()
        .copied()
        .filter(|t| !seen.contains(t) && level.insert(*t))
        .collect()
}

/// Level-by-level expansion shared by both closures. For ancestor walks
/// (`field == TaxId`) the next frontier follows `parent_taxid`; for
/// descendant walks (`field == ParentTaxId`) it follows `taxid`, and rows
/// already seen are dropped so the self-parenting root cannot re-enter.
fn expand<S: RecordStore + ?Sized>(
    store: &S,
    field: NodeField,
    mut frontier: Vec<TaxId>,
    mut seen: HashSet<TaxId>,
    max_rows: Option<usize>,
) -> LinnaeaResult<Vec<TaxonomyNode>> {
    let mut closure = Vec::new();

    loop {
        let pending = next_unseen(&frontier, &seen);
        if pending.is_empty() {
            break;
        }

        let records = fetch_in_batches(store, field, &pending, max_rows)?;
        debug!(
            frontier = pending.len(),
            fetched = records.len(),
            "expanded traversal level"
        );
        seen.extend(pending);

        match field {
            NodeField::TaxId => {
                frontier = records.iter().map(|r| r.parent_taxid).collect();
                closure.extend(records);
            }
            NodeField::ParentTaxId => {
                let children: Vec<TaxonomyNode> = records
                    .into_iter()
                    .filter(|r| !seen.contains(&r.taxid))
                    .collect();
                frontier = children.iter().map(|r| r.taxid).collect();
                closure.extend(children);
            }
        }
    }

    Ok(closure)
}

/// Resolve raw taxids to their node records. Unknown ids are simply absent
/// from the result.
pub fn resolve_nodes<S: RecordStore + ?Sized>(
    store: &S,
    taxids: &[TaxId],
) -> LinnaeaResult<Vec<TaxonomyNode>> {
    fetch_in_batches(store, NodeField::TaxId, taxids, None)
}

/// Every ancestor of the seed set, nearer levels first, seeds excluded.
///
/// Raw seed ids are resolved to node records up front; the walk then
/// follows `parent_taxid` until the frontier is exhausted. Seed taxids are
/// pre-marked as seen, which both keeps seeds out of their own lineage and
/// makes `ancestors` of the root alone come back empty instead of looping
/// on its self-parent.
pub fn ancestors<S: RecordStore + ?Sized>(
    store: &S,
    seeds: &[Seed],
) -> LinnaeaResult<Vec<TaxonomyNode>> {
    ancestors_with_batch(store, seeds, None)
}

fn ancestors_with_batch<S: RecordStore + ?Sized>(
    store: &S,
    seeds: &[Seed],
    max_rows: Option<usize>,
) -> LinnaeaResult<Vec<TaxonomyNode>> {
    let (mut nodes, raw) = partition_seeds(seeds);
    let resolved = fetch_in_batches(store, NodeField::TaxId, &raw, max_rows)?;
    if resolved.len() < raw.len() {
        debug!(
            unresolved = raw.len() - resolved.len(),
            "seed taxids without node records"
        );
    }
    nodes.extend(resolved);

    let seen: HashSet<TaxId> = nodes.iter().map(|n| n.taxid).collect();
    let frontier: Vec<TaxId> = nodes.iter().map(|n| n.parent_taxid).collect();

    expand(store, NodeField::TaxId, frontier, seen, max_rows)
}

/// Every descendant of the seed set across all depths, nearer levels
/// first, seeds excluded.
///
/// Unlike [`ancestors`], raw seed ids are not resolved first: they join
/// the initial frontier directly, so an unknown id contributes nothing and
/// raises no error.
pub fn descendants<S: RecordStore + ?Sized>(
    store: &S,
    seeds: &[Seed],
) -> LinnaeaResult<Vec<TaxonomyNode>> {
    descendants_with_batch(store, seeds, None)
}

fn descendants_with_batch<S: RecordStore + ?Sized>(
    store: &S,
    seeds: &[Seed],
    max_rows: Option<usize>,
) -> LinnaeaResult<Vec<TaxonomyNode>> {
    let (nodes, mut frontier) = partition_seeds(seeds);
    frontier.extend(nodes.iter().map(|n| n.taxid));

    expand(store, NodeField::ParentTaxId, frontier, HashSet::new(), max_rows)
}

/// Resolve the seed taxids and assemble the caller-facing output:
/// `seeds ++ descendants ++ ancestors`, projected to bare taxids. The
/// groups are disjoint while the parent pointers form a tree, so no
/// cross-group dedup happens here.
pub fn collect_taxids<S: RecordStore + ?Sized>(
    store: &S,
    taxids: &[TaxId],
    options: &QueryOptions,
) -> LinnaeaResult<Vec<TaxId>> {
    let max_rows = options.max_search_rows;
    let seeds = fetch_in_batches(store, NodeField::TaxId, taxids, max_rows)?;
    let seed_inputs: Vec<Seed> = seeds.iter().cloned().map(Seed::Node).collect();

    let children = if options.children {
        descendants_with_batch(store, &seed_inputs, max_rows)?
    } else {
        Vec::new()
    };

    let parents = if options.parents {
        ancestors_with_batch(store, &seed_inputs, max_rows)?
    } else {
        Vec::new()
    };

    Ok(seeds
        .iter()
        .chain(children.iter())
        .chain(parents.iter())
        .map(|n| n.taxid)
        .collect())
}
