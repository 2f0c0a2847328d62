/// Taxonomy ID type - newtype pattern for type safety
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LinnaeaError, LinnaeaResult};

/// Identifier of one taxonomic rank entry (NCBI taxonomy convention)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct TaxId(pub u32);

impl TaxId {
    /// The conventional root of the NCBI taxonomy, which is its own parent
    pub const ROOT: Self = Self(1);

    /// Create a new TaxId
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the inner value
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Check if this is the root taxon (1)
    pub fn is_root(&self) -> bool {
        self.0 == 1
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TaxId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<TaxId> for u32 {
    fn from(taxid: TaxId) -> Self {
        taxid.0
    }
}

impl FromStr for TaxId {
    type Err = LinnaeaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(Self)
            .map_err(|_| LinnaeaError::InvalidInput(format!("not an integer taxid: {:?}", s)))
    }
}

/// Sanitise a batch of raw taxid values before any store access. A single
/// bad value fails the whole batch.
pub fn parse_taxids<S: AsRef<str>>(values: &[S]) -> LinnaeaResult<Vec<TaxId>> {
    values.iter().map(|v| v.as_ref().parse()).collect()
}
