use tracing::debug;

use super::super::archetypes::RiskArchetype;
use super::super::domain::Instrument;
use super::partition::{partition_universe, PartitionedUniverse, UniverseBucket};
use super::{InvestmentProposal, ProposalBucket, ProposalError};

/// Partition `instruments` for the archetype and assemble the proposal.
pub fn build_proposal(
    archetype: Option<&RiskArchetype>,
    instruments: &[Instrument],
) -> Result<InvestmentProposal, ProposalError> {
    let archetype = archetype.ok_or(ProposalError::MissingArchetype)?;
    let universe = partition_universe(instruments, archetype.target_allocation.buckets());
    assemble_proposal(Some(archetype), universe)
}

/// Combine a matched archetype with an already partitioned universe.
///
/// Expected yield is weighted by the archetype's *target* allocation, not by how many
/// instruments each bucket happens to hold. Empty buckets report an average yield of 0.
pub fn assemble_proposal(
    archetype: Option<&RiskArchetype>,
    universe: PartitionedUniverse,
) -> Result<InvestmentProposal, ProposalError> {
    let archetype = archetype.ok_or(ProposalError::MissingArchetype)?;
    let allocation = archetype.target_allocation.normalize();
    let total_bonds = universe.total_instruments();

    let buckets: Vec<ProposalBucket> = universe
        .into_buckets()
        .into_iter()
        .map(|bucket| {
            let target_weight = allocation.weight(&bucket.key);
            bucket_statistics(bucket, target_weight, total_bonds)
        })
        .collect();

    let expected_yield: f64 = buckets
        .iter()
        .map(|bucket| bucket.avg_yield * bucket.target_weight)
        .sum();

    debug!(
        archetype = %archetype.id,
        total_bonds,
        expected_yield,
        "investment proposal assembled"
    );

    Ok(InvestmentProposal {
        archetype_id: archetype.id.clone(),
        archetype_name: archetype.name.clone(),
        buckets,
        total_bonds,
        expected_yield,
    })
}

fn bucket_statistics(
    bucket: UniverseBucket,
    target_weight: f64,
    total_bonds: usize,
) -> ProposalBucket {
    let count = bucket.instruments.len();
    let avg_yield = if count == 0 {
        0.0
    } else {
        bucket
            .instruments
            .iter()
            .map(|instrument| instrument.current_yield)
            .sum::<f64>()
            / count as f64
    };
    let realized_percentage = if total_bonds == 0 {
        0.0
    } else {
        count as f64 / total_bonds as f64 * 100.0
    };

    ProposalBucket {
        name: bucket.key.label(),
        key: bucket.key,
        instruments: bucket.instruments,
        count,
        avg_yield,
        target_weight,
        target_percentage: target_weight * 100.0,
        realized_percentage,
    }
}
