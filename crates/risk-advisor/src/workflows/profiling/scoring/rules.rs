use tracing::warn;

use super::super::domain::AnswerSheet;
use super::weights::WeightTable;
use super::{ScoreComponent, ScoreOutcome, ScoringError};

pub(crate) fn score_answers(
    answers: &AnswerSheet,
    table: &WeightTable,
) -> Result<ScoreOutcome, ScoringError> {
    let mut components = Vec::new();
    let mut unscored_keys = Vec::new();
    let mut risk_score = 0.0;

    for (key, raw) in answers {
        if table.is_excluded(key) {
            continue;
        }

        let Some(weight) = table.weight(key) else {
            // Unknown keys degrade to weight 0 but stay visible to the caller.
            warn!(question_key = %key, "answer key missing from weight table; scoring as 0");
            unscored_keys.push(key.clone());
            continue;
        };

        let value = parse_numeral(raw).ok_or_else(|| ScoringError::NonNumericAnswer {
            key: key.clone(),
            value: raw.clone(),
        })?;

        let contribution = weight * value;
        risk_score += contribution;
        components.push(ScoreComponent {
            question_key: key.clone(),
            weight,
            value,
            contribution,
        });
    }

    if !risk_score.is_finite() {
        return Err(ScoringError::NonFiniteScore);
    }

    Ok(ScoreOutcome {
        risk_score,
        components,
        unscored_keys,
    })
}

fn parse_numeral(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[cfg(test)]
pub(crate) fn parse_numeral_for_tests(raw: &str) -> Option<f64> {
    parse_numeral(raw)
}
