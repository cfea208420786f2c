//! Questionnaire scoring, archetype matching, and investment proposal assembly.
//!
//! The pipeline is pure: `answers -> score -> archetype -> (archetype, universe) ->
//! proposal`. Configuration (weights and archetype bands) is built once and passed in
//! explicitly; persistence and instrument sourcing sit behind the traits in
//! [`repository`].

pub mod allocation;
pub mod archetypes;
pub mod domain;
pub mod proposal;
pub mod repository;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use allocation::{AllocationUnit, NormalizedAllocation, TargetAllocation};
pub use archetypes::{
    match_archetype, ArchetypeDirectory, ArchetypeRecord, DirectoryError, RiskArchetype,
};
pub use domain::{AnswerSheet, BucketKey, Instrument, Question, SubjectId};
pub use proposal::{
    assemble_proposal, build_proposal, partition_universe, InvestmentProposal,
    PartitionedUniverse, ProposalBucket, ProposalError, UniverseBucket,
};
pub use repository::{
    InstrumentSource, ProfileRecord, ProfileRepository, RepositoryError, SourceError,
};
pub use scoring::{ScoreComponent, ScoreOutcome, ScoringEngine, ScoringError, WeightTable};
pub use service::{
    evaluate_answers, ProfileEvaluation, ProfileServiceError, RiskAssessment, RiskProfileService,
};
