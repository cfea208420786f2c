mod directory;
mod matcher;

pub use directory::ArchetypeDirectory;
pub use matcher::match_archetype;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::allocation::{AllocationUnit, TargetAllocation};
use super::domain::BucketKey;

/// Named score band carrying a target allocation.
///
/// A band covers `min_score <= score < max_score`; a score sitting exactly on a
/// boundary belongs to the band that starts there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskArchetype {
    pub id: String,
    pub name: String,
    pub min_score: f64,
    pub max_score: f64,
    pub target_allocation: TargetAllocation,
}

impl RiskArchetype {
    pub fn contains(&self, score: f64) -> bool {
        self.min_score <= score && score < self.max_score
    }
}

/// Flat `{id, name, min_score, max_score, allocation}` shape used by configuration files
/// and "list archetypes" responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeRecord {
    pub id: String,
    pub name: String,
    pub min_score: f64,
    pub max_score: f64,
    pub allocation: BTreeMap<BucketKey, f64>,
    #[serde(default)]
    pub unit: AllocationUnit,
}

impl From<ArchetypeRecord> for RiskArchetype {
    fn from(record: ArchetypeRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            min_score: record.min_score,
            max_score: record.max_score,
            target_allocation: TargetAllocation {
                unit: record.unit,
                weights: record.allocation,
            },
        }
    }
}

impl From<&RiskArchetype> for ArchetypeRecord {
    fn from(archetype: &RiskArchetype) -> Self {
        Self {
            id: archetype.id.clone(),
            name: archetype.name.clone(),
            min_score: archetype.min_score,
            max_score: archetype.max_score,
            allocation: archetype.target_allocation.weights.clone(),
            unit: archetype.target_allocation.unit,
        }
    }
}

/// Reasons a set of bands cannot serve as a directory.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DirectoryError {
    #[error("archetype directory is empty")]
    Empty,
    #[error("archetype id '{0}' appears more than once")]
    DuplicateId(String),
    #[error("archetype '{id}' has an invalid band [{min_score}, {max_score})")]
    InvalidBand {
        id: String,
        min_score: f64,
        max_score: f64,
    },
    #[error("gap between '{lower}' (ends at {lower_max}) and '{upper}' (starts at {upper_min})")]
    Gap {
        lower: String,
        lower_max: f64,
        upper: String,
        upper_min: f64,
    },
    #[error("'{lower}' (ends at {lower_max}) overlaps '{upper}' (starts at {upper_min})")]
    Overlap {
        lower: String,
        lower_max: f64,
        upper: String,
        upper_min: f64,
    },
    #[error("archetype '{id}' has an invalid allocation: {reason}")]
    InvalidAllocation { id: String, reason: String },
}
