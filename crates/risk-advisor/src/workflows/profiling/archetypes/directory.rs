use std::collections::HashSet;
use std::io::Read;

use super::super::allocation::{AllocationUnit, TargetAllocation};
use super::super::domain::BucketKey;
use super::{ArchetypeRecord, DirectoryError, RiskArchetype};

/// Normalized allocations must total 1 within this margin.
const ALLOCATION_TOTAL_TOLERANCE: f64 = 0.01;

/// Ordered, validated set of archetype bands.
///
/// Bands are sorted by `min_score` and contiguous: each band ends exactly where the
/// next one starts, so every score inside the covered range matches exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchetypeDirectory {
    archetypes: Vec<RiskArchetype>,
}

impl ArchetypeDirectory {
    pub fn new(mut archetypes: Vec<RiskArchetype>) -> Result<Self, DirectoryError> {
        archetypes.sort_by(|left, right| left.min_score.total_cmp(&right.min_score));
        validate(&archetypes)?;
        Ok(Self { archetypes })
    }

    pub fn from_records<I>(records: I) -> Result<Self, DirectoryError>
    where
        I: IntoIterator<Item = ArchetypeRecord>,
    {
        Self::new(records.into_iter().map(RiskArchetype::from).collect())
    }

    /// Read a JSON array of [`ArchetypeRecord`]s.
    pub fn records_from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<ArchetypeRecord>, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    /// Built-in five-band directory sized for [`WeightTable::standard`] answers on a
    /// 1-5 scale (scores between 0.6 and 3.0).
    ///
    /// [`WeightTable::standard`]: crate::workflows::profiling::WeightTable::standard
    pub fn standard() -> Self {
        Self {
            archetypes: standard_archetypes(),
        }
    }

    pub fn archetypes(&self) -> &[RiskArchetype] {
        &self.archetypes
    }

    pub fn get(&self, id: &str) -> Option<&RiskArchetype> {
        self.archetypes.iter().find(|archetype| archetype.id == id)
    }

    /// Lowest `min_score` and highest `max_score` covered by the directory.
    pub fn score_range(&self) -> (f64, f64) {
        let lowest = self.archetypes.first().map_or(0.0, |a| a.min_score);
        let highest = self.archetypes.last().map_or(0.0, |a| a.max_score);
        (lowest, highest)
    }

    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }
}

fn validate(archetypes: &[RiskArchetype]) -> Result<(), DirectoryError> {
    if archetypes.is_empty() {
        return Err(DirectoryError::Empty);
    }

    let mut seen = HashSet::new();
    for archetype in archetypes {
        if !seen.insert(archetype.id.as_str()) {
            return Err(DirectoryError::DuplicateId(archetype.id.clone()));
        }

        let finite = archetype.min_score.is_finite() && archetype.max_score.is_finite();
        if !finite || archetype.min_score >= archetype.max_score {
            return Err(DirectoryError::InvalidBand {
                id: archetype.id.clone(),
                min_score: archetype.min_score,
                max_score: archetype.max_score,
            });
        }

        validate_allocation(archetype)?;
    }

    for pair in archetypes.windows(2) {
        let (lower, upper) = (&pair[0], &pair[1]);
        if upper.min_score > lower.max_score {
            return Err(DirectoryError::Gap {
                lower: lower.id.clone(),
                lower_max: lower.max_score,
                upper: upper.id.clone(),
                upper_min: upper.min_score,
            });
        }
        if upper.min_score < lower.max_score {
            return Err(DirectoryError::Overlap {
                lower: lower.id.clone(),
                lower_max: lower.max_score,
                upper: upper.id.clone(),
                upper_min: upper.min_score,
            });
        }
    }

    Ok(())
}

fn validate_allocation(archetype: &RiskArchetype) -> Result<(), DirectoryError> {
    let weights = &archetype.target_allocation.weights;
    let invalid = |reason: &str| DirectoryError::InvalidAllocation {
        id: archetype.id.clone(),
        reason: reason.to_string(),
    };

    if weights.is_empty() {
        return Err(invalid("no buckets"));
    }
    if weights.keys().any(BucketKey::is_other) {
        return Err(invalid("'other' is reserved for unallocated instruments"));
    }
    if weights
        .values()
        .any(|weight| !weight.is_finite() || *weight < 0.0)
    {
        return Err(invalid("weights must be finite and non-negative"));
    }
    if weights.values().sum::<f64>() <= 0.0 {
        return Err(invalid("weights sum to zero"));
    }

    let total = archetype.target_allocation.normalize().total();
    if (total - 1.0).abs() > ALLOCATION_TOTAL_TOLERANCE {
        return Err(DirectoryError::InvalidAllocation {
            id: archetype.id.clone(),
            reason: format!(
                "weights normalize to {total} as {:?}; expected a full allocation",
                archetype.target_allocation.resolved_unit()
            ),
        });
    }

    Ok(())
}

fn standard_archetypes() -> Vec<RiskArchetype> {
    vec![
        RiskArchetype {
            id: "conservative_a".to_string(),
            name: "Conservative A".to_string(),
            min_score: 0.0,
            max_score: 0.9,
            target_allocation: TargetAllocation::new(
                AllocationUnit::Auto,
                [(BucketKey::AAA_A, 70.0), (BucketKey::BBB, 30.0)],
            ),
        },
        RiskArchetype {
            id: "conservative_b".to_string(),
            name: "Conservative B".to_string(),
            min_score: 0.9,
            max_score: 1.25,
            target_allocation: TargetAllocation::new(
                AllocationUnit::Auto,
                [
                    (BucketKey::AAA_A, 0.5),
                    (BucketKey::BBB, 0.4),
                    (BucketKey::BB, 0.1),
                ],
            ),
        },
        RiskArchetype {
            id: "moderate".to_string(),
            name: "Moderate".to_string(),
            min_score: 1.25,
            max_score: 1.75,
            target_allocation: TargetAllocation::new(
                AllocationUnit::Percentage,
                [
                    (BucketKey::AAA_A, 35.0),
                    (BucketKey::BBB, 40.0),
                    (BucketKey::BB, 15.0),
                    (BucketKey::ETF, 10.0),
                ],
            ),
        },
        RiskArchetype {
            id: "growth".to_string(),
            name: "Growth".to_string(),
            min_score: 1.75,
            max_score: 2.25,
            target_allocation: TargetAllocation::new(
                AllocationUnit::Percentage,
                [
                    (BucketKey::AAA_A, 20.0),
                    (BucketKey::BBB, 35.0),
                    (BucketKey::BB, 25.0),
                    (BucketKey::ETF, 20.0),
                ],
            ),
        },
        RiskArchetype {
            id: "aggressive".to_string(),
            name: "Aggressive".to_string(),
            min_score: 2.25,
            max_score: 3.25,
            target_allocation: TargetAllocation::new(
                AllocationUnit::Percentage,
                [
                    (BucketKey::AAA_A, 10.0),
                    (BucketKey::BBB, 25.0),
                    (BucketKey::BB, 30.0),
                    (BucketKey::B, 15.0),
                    (BucketKey::ETF, 20.0),
                ],
            ),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_directory_passes_validation() {
        let standard = ArchetypeDirectory::standard();
        let revalidated = ArchetypeDirectory::new(standard.archetypes().to_vec())
            .expect("standard bands are contiguous");
        assert_eq!(revalidated, standard);
        assert_eq!(standard.score_range(), (0.0, 3.25));
    }

    #[test]
    fn records_from_reader_defaults_unit_to_auto() {
        let json = r#"[
            {"id": "low", "name": "Low", "min_score": 0.0, "max_score": 1.0,
             "allocation": {"aaa_a": 60, "bbb": 40}},
            {"id": "high", "name": "High", "min_score": 1.0, "max_score": 2.0,
             "allocation": {"bbb": 0.5, "bb": 0.5}, "unit": "fraction"}
        ]"#;

        let records = ArchetypeDirectory::records_from_reader(json.as_bytes()).expect("parses");
        assert_eq!(records[0].unit, AllocationUnit::Auto);
        assert_eq!(records[1].unit, AllocationUnit::Fraction);

        let directory = ArchetypeDirectory::from_records(records).expect("valid directory");
        assert_eq!(directory.len(), 2);
        assert_eq!(directory.get("high").map(|a| a.name.as_str()), Some("High"));
    }

    #[test]
    fn records_with_mismatched_unit_are_rejected() {
        let json = r#"[
            {"id": "only", "name": "Only", "min_score": 0.0, "max_score": 3.0,
             "allocation": {"aaa_a": 30, "bbb": 70}, "unit": "fraction"}
        ]"#;

        let records = ArchetypeDirectory::records_from_reader(json.as_bytes()).expect("parses");
        match ArchetypeDirectory::from_records(records) {
            Err(DirectoryError::InvalidAllocation { id, reason }) => {
                assert_eq!(id, "only");
                assert!(reason.contains("Fraction"), "{reason}");
            }
            other => panic!("expected invalid allocation, got {other:?}"),
        }
    }
}
