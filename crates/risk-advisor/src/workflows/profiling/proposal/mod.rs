mod assembler;
mod partition;

pub use assembler::{assemble_proposal, build_proposal};
pub use partition::{partition_universe, PartitionedUniverse, UniverseBucket};

use serde::{Deserialize, Serialize};

use super::domain::{BucketKey, Instrument};

/// Per-bucket slice of a proposal.
///
/// `target_percentage` is the archetype's intended share; `realized_percentage` is the
/// share of instruments actually found in the universe snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalBucket {
    pub key: BucketKey,
    pub name: String,
    pub instruments: Vec<Instrument>,
    pub count: usize,
    pub avg_yield: f64,
    pub target_weight: f64,
    pub target_percentage: f64,
    pub realized_percentage: f64,
}

/// Assembled recommendation. Downstream renderers display these numbers as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentProposal {
    pub archetype_id: String,
    pub archetype_name: String,
    pub buckets: Vec<ProposalBucket>,
    pub total_bonds: usize,
    pub expected_yield: f64,
}

impl InvestmentProposal {
    pub fn bucket(&self, key: &BucketKey) -> Option<&ProposalBucket> {
        self.buckets.iter().find(|bucket| &bucket.key == key)
    }

    pub fn target_percentage_total(&self) -> f64 {
        self.buckets
            .iter()
            .map(|bucket| bucket.target_percentage)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProposalError {
    #[error("cannot assemble a proposal without a matched archetype")]
    MissingArchetype,
}
