mod rules;
mod weights;

pub use weights::WeightTable;

use serde::{Deserialize, Serialize};

use super::domain::AnswerSheet;

/// Stateless scorer applying a weight table to questionnaire answers.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    table: WeightTable,
}

impl ScoringEngine {
    pub fn new(table: WeightTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &WeightTable {
        &self.table
    }

    /// Weighted sum of every scored answer.
    ///
    /// Excluded identifier fields are skipped without parsing. Keys the table does not
    /// know contribute 0 and are reported in [`ScoreOutcome::unscored_keys`].
    pub fn score(&self, answers: &AnswerSheet) -> Result<ScoreOutcome, ScoringError> {
        rules::score_answers(answers, &self.table)
    }
}

/// Single weighted answer, kept so a score can be audited after the fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub question_key: String,
    pub weight: f64,
    pub value: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    pub risk_score: f64,
    pub components: Vec<ScoreComponent>,
    pub unscored_keys: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("answer for '{key}' is not a number: '{value}'")]
    NonNumericAnswer { key: String, value: String },
    #[error("weighted answers overflow the risk score")]
    NonFiniteScore,
}

#[cfg(test)]
pub(crate) use rules::parse_numeral_for_tests;
