use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;

use serde::{Deserialize, Serialize};

use super::super::domain::Question;

/// Question weights plus the identifier fields the questionnaire schema never scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightTable {
    weights: BTreeMap<String, f64>,
    #[serde(default)]
    excluded_fields: BTreeSet<String>,
}

impl WeightTable {
    pub fn new<W, E, S>(weights: W, excluded_fields: E) -> Self
    where
        W: IntoIterator<Item = (S, f64)>,
        E: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            weights: weights
                .into_iter()
                .map(|(key, weight)| (key.into(), weight))
                .collect(),
            excluded_fields: excluded_fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Built-in suitability questionnaire. Answers are expected on a 1-5 scale.
    pub fn standard() -> Self {
        Self::new(
            [
                ("investment_horizon", 0.12),
                ("risk_tolerance", 0.15),
                ("loss_reaction", 0.10),
                ("investment_experience", 0.08),
                ("income_stability", 0.06),
                ("liquidity_needs", 0.05),
                ("age_band", 0.04),
                ("advisor_notes_flag", 0.0),
            ],
            ["client_name", "account_name", "account_number", "email"],
        )
    }

    /// Read a JSON document shaped as `{"weights": {...}, "excluded_fields": [...]}`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    pub fn weight(&self, key: &str) -> Option<f64> {
        self.weights.get(key).copied()
    }

    pub fn is_excluded(&self, key: &str) -> bool {
        self.excluded_fields.contains(key)
    }

    pub fn excluded_fields(&self) -> impl Iterator<Item = &str> {
        self.excluded_fields.iter().map(String::as_str)
    }

    pub fn questions(&self) -> Vec<Question> {
        self.weights
            .iter()
            .map(|(key, weight)| Question {
                key: key.clone(),
                weight: *weight,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_excludes_identifier_fields() {
        let table = WeightTable::standard();
        assert!(table.is_excluded("client_name"));
        assert!(table.is_excluded("account_number"));
        assert!(!table.is_excluded("risk_tolerance"));
        assert_eq!(table.weight("risk_tolerance"), Some(0.15));
        assert_eq!(table.weight("advisor_notes_flag"), Some(0.0));
    }

    #[test]
    fn from_reader_defaults_excluded_fields() {
        let json = r#"{"weights": {"risk_tolerance": 0.2, "investment_horizon": 0.1}}"#;
        let table = WeightTable::from_reader(json.as_bytes()).expect("valid weights json");
        assert_eq!(table.len(), 2);
        assert_eq!(table.excluded_fields().count(), 0);
        assert_eq!(table.weight("investment_horizon"), Some(0.1));
    }
}
