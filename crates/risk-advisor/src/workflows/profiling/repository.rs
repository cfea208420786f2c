use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Instrument, SubjectId};

/// Persisted outcome of one questionnaire assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub subject_id: SubjectId,
    pub risk_score: f64,
    pub archetype_id: Option<String>,
    pub assessed_at: DateTime<Utc>,
}

impl ProfileRecord {
    pub fn is_matched(&self) -> bool {
        self.archetype_id.is_some()
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_matched() {
            "matched"
        } else {
            "unmatched"
        }
    }
}

/// Storage abstraction for assessed profiles; the core never persists anything itself.
pub trait ProfileRepository: Send + Sync {
    /// Insert or replace the latest record for the subject.
    fn save(&self, record: ProfileRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, subject_id: &SubjectId) -> Result<Option<ProfileRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("profile not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Holdings / market-data collaborator supplying the instrument universe.
///
/// Any fetching, retrying, or caching happens behind this trait; the returned snapshot is
/// treated as immutable for the rest of the proposal computation.
pub trait InstrumentSource: Send + Sync {
    fn universe(&self) -> Result<Vec<Instrument>, SourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("instrument source unavailable: {0}")]
    Unavailable(String),
}
