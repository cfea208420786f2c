use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use super::archetypes::{match_archetype, ArchetypeDirectory, RiskArchetype};
use super::domain::{AnswerSheet, Instrument, SubjectId};
use super::proposal::{build_proposal, InvestmentProposal, ProposalError};
use super::repository::{
    InstrumentSource, ProfileRecord, ProfileRepository, RepositoryError, SourceError,
};
use super::scoring::{ScoreOutcome, ScoringEngine, ScoringError};

/// Score plus the band it fell into, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileEvaluation {
    pub outcome: ScoreOutcome,
    pub archetype: Option<RiskArchetype>,
}

impl ProfileEvaluation {
    pub fn risk_score(&self) -> f64 {
        self.outcome.risk_score
    }

    pub fn is_matched(&self) -> bool {
        self.archetype.is_some()
    }
}

/// Pure `answers -> score -> archetype` step, shared by every surface.
pub fn evaluate_answers(
    engine: &ScoringEngine,
    directory: &ArchetypeDirectory,
    answers: &AnswerSheet,
) -> Result<ProfileEvaluation, ScoringError> {
    let outcome = engine.score(answers)?;
    let archetype = match_archetype(directory, outcome.risk_score).cloned();
    Ok(ProfileEvaluation { outcome, archetype })
}

/// Assessment returned to callers after the record has been stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub subject_id: SubjectId,
    pub evaluation: ProfileEvaluation,
    pub assessed_at: DateTime<Utc>,
}

/// Service composing the scoring engine, archetype directory, and external collaborators.
pub struct RiskProfileService<R, S> {
    engine: Arc<ScoringEngine>,
    directory: Arc<ArchetypeDirectory>,
    repository: Arc<R>,
    source: Arc<S>,
}

impl<R, S> RiskProfileService<R, S>
where
    R: ProfileRepository + 'static,
    S: InstrumentSource + 'static,
{
    pub fn new(
        engine: ScoringEngine,
        directory: ArchetypeDirectory,
        repository: Arc<R>,
        source: Arc<S>,
    ) -> Self {
        Self {
            engine: Arc::new(engine),
            directory: Arc::new(directory),
            repository,
            source,
        }
    }

    pub fn directory(&self) -> &ArchetypeDirectory {
        &self.directory
    }

    /// Score and match a submission, then hand the result to the repository.
    ///
    /// An unmatched score is still recorded (with no archetype) so the caller can
    /// surface it.
    pub fn assess(
        &self,
        subject_id: SubjectId,
        answers: &AnswerSheet,
    ) -> Result<RiskAssessment, ProfileServiceError> {
        let evaluation = evaluate_answers(&self.engine, &self.directory, answers)?;
        let assessed_at = Utc::now();

        self.repository.save(ProfileRecord {
            subject_id: subject_id.clone(),
            risk_score: evaluation.risk_score(),
            archetype_id: evaluation.archetype.as_ref().map(|a| a.id.clone()),
            assessed_at,
        })?;

        info!(
            subject = %subject_id,
            risk_score = evaluation.risk_score(),
            matched = evaluation.is_matched(),
            "risk profile assessed"
        );

        Ok(RiskAssessment {
            subject_id,
            evaluation,
            assessed_at,
        })
    }

    pub fn get(&self, subject_id: &SubjectId) -> Result<ProfileRecord, ProfileServiceError> {
        let record = self
            .repository
            .fetch(subject_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Build a proposal for a previously assessed subject against the current universe.
    pub fn propose(
        &self,
        subject_id: &SubjectId,
    ) -> Result<InvestmentProposal, ProfileServiceError> {
        let record = self.get(subject_id)?;
        let archetype = record
            .archetype_id
            .as_deref()
            .and_then(|id| self.directory.get(id));
        if archetype.is_none() {
            return Err(ProposalError::MissingArchetype.into());
        }

        let universe = self.source.universe()?;
        let proposal = build_proposal(archetype, &universe)?;

        info!(
            subject = %subject_id,
            archetype = %proposal.archetype_id,
            total_bonds = proposal.total_bonds,
            "investment proposal built"
        );
        Ok(proposal)
    }

    /// Stateless variant: evaluate answers and assemble against a caller-supplied universe.
    pub fn preview(
        &self,
        answers: &AnswerSheet,
        universe: &[Instrument],
    ) -> Result<(ProfileEvaluation, InvestmentProposal), ProfileServiceError> {
        let evaluation = evaluate_answers(&self.engine, &self.directory, answers)?;
        let proposal = build_proposal(evaluation.archetype.as_ref(), universe)?;
        Ok((evaluation, proposal))
    }
}

/// Error raised by the profile service.
#[derive(Debug, thiserror::Error)]
pub enum ProfileServiceError {
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Proposal(#[from] ProposalError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Source(#[from] SourceError),
}
