use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::super::domain::{BucketKey, Instrument};

/// Instruments sharing one rating bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniverseBucket {
    pub key: BucketKey,
    pub instruments: Vec<Instrument>,
}

/// Instrument universe grouped by the active archetype's buckets.
///
/// Every instrument lands in exactly one bucket; those outside the allocation are kept
/// in the reserved "Other" bucket, which is always last.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartitionedUniverse {
    buckets: Vec<UniverseBucket>,
}

impl PartitionedUniverse {
    pub fn buckets(&self) -> &[UniverseBucket] {
        &self.buckets
    }

    pub fn bucket(&self, key: &BucketKey) -> Option<&UniverseBucket> {
        self.buckets.iter().find(|bucket| &bucket.key == key)
    }

    pub fn other(&self) -> Option<&UniverseBucket> {
        self.buckets.iter().find(|bucket| bucket.key.is_other())
    }

    pub fn total_instruments(&self) -> usize {
        self.buckets
            .iter()
            .map(|bucket| bucket.instruments.len())
            .sum()
    }

    pub fn into_buckets(self) -> Vec<UniverseBucket> {
        self.buckets
    }
}

/// Group `instruments` by rating bucket.
///
/// Each of `bucket_keys` gets a bucket even when nothing falls into it. Buckets come out
/// in credit-quality order, then alphabetically for keys outside the known ladder.
pub fn partition_universe<'a, I>(instruments: &[Instrument], bucket_keys: I) -> PartitionedUniverse
where
    I: IntoIterator<Item = &'a BucketKey>,
{
    let mut grouped: BTreeMap<BucketKey, Vec<Instrument>> = bucket_keys
        .into_iter()
        .filter(|key| !key.is_other())
        .map(|key| (key.clone(), Vec::new()))
        .collect();
    let mut other = Vec::new();

    for instrument in instruments {
        match grouped.get_mut(&instrument.rating_bucket) {
            Some(bucket) => bucket.push(instrument.clone()),
            None => other.push(instrument.clone()),
        }
    }

    let mut buckets: Vec<UniverseBucket> = grouped
        .into_iter()
        .map(|(key, instruments)| UniverseBucket { key, instruments })
        .collect();
    buckets.sort_by(|left, right| {
        left.key
            .rank()
            .cmp(&right.key.rank())
            .then_with(|| left.key.cmp(&right.key))
    });

    if !other.is_empty() {
        buckets.push(UniverseBucket {
            key: BucketKey::other(),
            instruments: other,
        });
    }

    PartitionedUniverse { buckets }
}
