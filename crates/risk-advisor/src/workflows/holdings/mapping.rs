use super::normalizer::normalize_rating;
use crate::workflows::profiling::BucketKey;
use std::collections::HashMap;
use std::sync::OnceLock;

static RATING_BUCKET_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

/// Bucket for a rating label; labels outside the ladder keep their own (lowercased) key
/// and end up in "Other" during partitioning.
pub(crate) fn bucket_for_rating(rating: &str) -> BucketKey {
    let normalized = normalize_rating(rating);
    match rating_bucket_map().get(normalized.as_str()) {
        Some(bucket) => BucketKey::new(*bucket),
        None if normalized.is_empty() => BucketKey::other(),
        None => BucketKey::new(normalized.to_ascii_lowercase()),
    }
}

fn rating_bucket_map() -> &'static HashMap<&'static str, &'static str> {
    RATING_BUCKET_MAP.get_or_init(|| {
        const RATING_TO_BUCKET: &[(&str, &str)] = &[
            // S&P / Fitch investment grade
            ("AAA", BucketKey::AAA_A),
            ("AA+", BucketKey::AAA_A),
            ("AA", BucketKey::AAA_A),
            ("AA-", BucketKey::AAA_A),
            ("A+", BucketKey::AAA_A),
            ("A", BucketKey::AAA_A),
            ("A-", BucketKey::AAA_A),
            ("BBB+", BucketKey::BBB),
            ("BBB", BucketKey::BBB),
            ("BBB-", BucketKey::BBB),
            // S&P / Fitch high yield
            ("BB+", BucketKey::BB),
            ("BB", BucketKey::BB),
            ("BB-", BucketKey::BB),
            ("B+", BucketKey::B),
            ("B", BucketKey::B),
            ("B-", BucketKey::B),
            // Moody's, after upper-casing
            ("AA1", BucketKey::AAA_A),
            ("AA2", BucketKey::AAA_A),
            ("AA3", BucketKey::AAA_A),
            ("A1", BucketKey::AAA_A),
            ("A2", BucketKey::AAA_A),
            ("A3", BucketKey::AAA_A),
            ("BAA1", BucketKey::BBB),
            ("BAA2", BucketKey::BBB),
            ("BAA3", BucketKey::BBB),
            ("BA1", BucketKey::BB),
            ("BA2", BucketKey::BB),
            ("BA3", BucketKey::BB),
            ("B1", BucketKey::B),
            ("B2", BucketKey::B),
            ("B3", BucketKey::B),
            // Funds
            ("ETF", BucketKey::ETF),
            ("ETFS", BucketKey::ETF),
        ];

        RATING_TO_BUCKET.iter().copied().collect()
    })
}

#[cfg(test)]
pub(crate) fn lookup_for_tests(rating: &str) -> String {
    bucket_for_rating(rating).0
}
