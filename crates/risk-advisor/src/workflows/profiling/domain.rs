use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for the client (or account) a profile belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubjectId(pub String);

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw questionnaire submission: question key to text-encoded numeral.
///
/// Identifier fields (client name, account number, ...) travel in the same map and are
/// dropped by the weight table's exclusion list before any lookup happens.
pub type AnswerSheet = BTreeMap<String, String>;

/// Scored questionnaire entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub key: String,
    pub weight: f64,
}

/// Rating-equivalence group shared by the instrument universe and target allocations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketKey(pub String);

impl BucketKey {
    pub const AAA_A: &'static str = "aaa_a";
    pub const BBB: &'static str = "bbb";
    pub const BB: &'static str = "bb";
    pub const B: &'static str = "b";
    pub const ETF: &'static str = "etf";
    pub const OTHER: &'static str = "other";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Reserved bucket for instruments whose rating bucket is not part of the allocation.
    pub fn other() -> Self {
        Self(Self::OTHER.to_string())
    }

    pub fn is_other(&self) -> bool {
        self.0 == Self::OTHER
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn label(&self) -> String {
        match self.0.as_str() {
            Self::AAA_A => "AAA/AA/A".to_string(),
            Self::BBB => "BBB".to_string(),
            Self::BB => "BB".to_string(),
            Self::B => "B".to_string(),
            Self::ETF => "ETFs".to_string(),
            Self::OTHER => "Other".to_string(),
            other => other.to_ascii_uppercase(),
        }
    }

    /// Position in the canonical credit-quality ordering; unknown keys sort after it.
    pub(crate) fn rank(&self) -> usize {
        match self.0.as_str() {
            Self::AAA_A => 0,
            Self::BBB => 1,
            Self::BB => 2,
            Self::B => 3,
            Self::ETF => 4,
            Self::OTHER => usize::MAX,
            _ => 5,
        }
    }
}

impl From<&str> for BucketKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for BucketKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Candidate holding supplied by the external bond / market-data source.
///
/// `current_yield` is expressed in percent, so `5.25` reads as 5.25%.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub symbol: String,
    pub rating_bucket: BucketKey,
    pub current_yield: f64,
    #[serde(default)]
    pub equivalent_label: String,
}

impl Instrument {
    pub fn new(
        symbol: impl Into<String>,
        rating_bucket: impl Into<BucketKey>,
        yield_pct: f64,
    ) -> Self {
        let rating_bucket = rating_bucket.into();
        Self {
            symbol: symbol.into(),
            equivalent_label: rating_bucket.label(),
            rating_bucket,
            current_yield: yield_pct,
        }
    }
}
