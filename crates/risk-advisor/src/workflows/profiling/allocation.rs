use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::BucketKey;

/// Raw sums above this are read as percentages even when every value is `<= 1`.
const FRACTION_SUM_TOLERANCE: f64 = 1.01;

/// Unit in which an archetype's target weights are written.
///
/// Configuration sources disagree: some store `0.3`, others `30`. Tagging the unit
/// explicitly removes the guesswork; `Auto` keeps the magnitude heuristic for records
/// that have not been migrated yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationUnit {
    /// Infer from the values: if any weight exceeds 1, or the weights sum to more
    /// than 1.01, the whole set is read as percentages.
    #[default]
    Auto,
    Fraction,
    Percentage,
}

/// Target allocation as configured, before unit resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetAllocation {
    #[serde(default)]
    pub unit: AllocationUnit,
    pub weights: BTreeMap<BucketKey, f64>,
}

impl TargetAllocation {
    pub fn new<K, I>(unit: AllocationUnit, weights: I) -> Self
    where
        K: Into<BucketKey>,
        I: IntoIterator<Item = (K, f64)>,
    {
        Self {
            unit,
            weights: weights
                .into_iter()
                .map(|(bucket, weight)| (bucket.into(), weight))
                .collect(),
        }
    }

    pub fn buckets(&self) -> impl Iterator<Item = &BucketKey> {
        self.weights.keys()
    }

    /// Unit the whole set resolves to. Never decided bucket by bucket.
    pub fn resolved_unit(&self) -> AllocationUnit {
        match self.unit {
            AllocationUnit::Auto => {
                let any_above_one = self.weights.values().any(|weight| *weight > 1.0);
                let total: f64 = self.weights.values().sum();
                if any_above_one || total > FRACTION_SUM_TOLERANCE {
                    AllocationUnit::Percentage
                } else {
                    AllocationUnit::Fraction
                }
            }
            explicit => explicit,
        }
    }

    pub fn normalize(&self) -> NormalizedAllocation {
        let divisor = match self.resolved_unit() {
            AllocationUnit::Percentage => 100.0,
            AllocationUnit::Fraction | AllocationUnit::Auto => 1.0,
        };

        NormalizedAllocation {
            weights: self
                .weights
                .iter()
                .map(|(bucket, weight)| (bucket.clone(), weight / divisor))
                .collect(),
        }
    }
}

/// Target weights expressed as fractions of 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedAllocation {
    weights: BTreeMap<BucketKey, f64>,
}

impl NormalizedAllocation {
    /// Target weight for a bucket; buckets outside the allocation (including "Other")
    /// carry no target.
    pub fn weight(&self, bucket: &BucketKey) -> f64 {
        self.weights.get(bucket).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Re-tag as an explicit fraction allocation, e.g. when migrating stored records.
    pub fn into_target(self) -> TargetAllocation {
        TargetAllocation {
            unit: AllocationUnit::Fraction,
            weights: self.weights,
        }
    }
}
