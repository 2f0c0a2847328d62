//! Row types for the five NCBI taxonomy tables

use serde::{Deserialize, Serialize};

use super::taxonomy::TaxId;

/// One entry of `nodes.dmp`. Only `taxid` and `parent_taxid` drive tree
/// traversal; the remaining columns are carried through ingestion and
/// export untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TaxonomyNode {
    pub taxid: TaxId,
    pub parent_taxid: TaxId,
    pub rank: String,
    pub embl_code: String,
    pub division_id: u32,
    pub inherited_div_flag: bool,
    pub genetic_code_id: String,
    pub inherited_gc_flag: bool,
    pub mito_genetic_code_id: String,
    pub inherited_mgc_flag: bool,
    pub genbank_hidden_flag: bool,
    pub hidden_subtree_root_flag: bool,
    pub comments: String,
}

impl TaxonomyNode {
    /// Minimal node with the traversal-relevant columns filled in
    pub fn new(taxid: TaxId, parent_taxid: TaxId, rank: &str) -> Self {
        Self {
            taxid,
            parent_taxid,
            rank: rank.to_string(),
            ..Self::default()
        }
    }

    /// The root is conventionally its own parent
    pub fn is_root(&self) -> bool {
        self.taxid == self.parent_taxid
    }
}

/// One entry of `names.dmp`; many-to-one against [`TaxonomyNode`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonName {
    pub taxid: TaxId,
    pub name: String,
    pub unique_name: String,
    pub name_class: String,
}

/// One entry of `division.dmp` (GenBank division lookup table)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Division {
    pub division_id: u32,
    /// Three-letter GenBank division code (BCT, PLN, VRT, ...)
    pub code: String,
    pub name: String,
    pub comments: String,
}

/// One entry of `gencode.dmp` (genetic code lookup table)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenCode {
    pub code_id: String,
    pub abbreviation: String,
    pub name: String,
    pub translation_table: String,
    pub start_codons: String,
}

/// One row of an accession2taxid mapping file (tab-delimited, with header)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessionMapping {
    pub accession: String,
    pub accession_version: String,
    pub taxid: TaxId,
    pub gi: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_root_detection() {
        let root = TaxonomyNode::new(TaxId(1), TaxId(1), "no rank");
        let phylum = TaxonomyNode::new(TaxId(1224), TaxId(2), "phylum");

        assert!(root.is_root());
        assert!(!phylum.is_root());
    }

    #[test]
    fn test_node_new_defaults() {
        let node = TaxonomyNode::new(TaxId(2), TaxId(1), "superkingdom");
        assert_eq!(node.rank, "superkingdom");
        assert_eq!(node.division_id, 0);
        assert!(!node.genbank_hidden_flag);
        assert!(node.comments.is_empty());
    }
}
