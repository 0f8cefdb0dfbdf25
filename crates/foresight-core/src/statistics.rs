//! Aggregation of per-question scores.
//!
//! The headline number is the unweighted mean over every scored question.
//! Because each rule already lands in [0, 1], a 3-choice and a 10-choice
//! question carry the same weight as a binary one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::model::QuestionType;
use crate::results::ResultSet;

/// Arithmetic mean of `scores`. Fails on empty input.
pub fn overall_score<I>(scores: I) -> Result<f64, ScoringError>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = scores
        .into_iter()
        .fold((0.0f64, 0usize), |(sum, count), s| (sum + s, count + 1));
    if count == 0 {
        return Err(ScoringError::EmptyResultSet);
    }
    Ok(sum / count as f64)
}

/// Aggregate statistics over a result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Unweighted mean over all scored questions.
    pub overall: f64,
    /// Number of scored questions.
    pub count: usize,
    /// Breakdown per question type. Informational only.
    pub per_type: BTreeMap<QuestionType, TypeStats>,
}

/// Statistics for one question type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeStats {
    pub count: usize,
    pub mean: f64,
    pub best: f64,
    pub worst: f64,
}

/// Compute aggregate statistics. Fails if `results` is empty.
pub fn compute_aggregate_stats(results: &ResultSet) -> Result<AggregateStats, ScoringError> {
    let overall = overall_score(results.scores())?;

    let mut grouped: BTreeMap<QuestionType, Vec<f64>> = BTreeMap::new();
    for record in results {
        grouped
            .entry(record.question_type)
            .or_default()
            .push(record.score);
    }

    let per_type = grouped
        .into_iter()
        .map(|(question_type, scores)| {
            let stats = TypeStats {
                count: scores.len(),
                mean: scores.iter().sum::<f64>() / scores.len() as f64,
                best: scores.iter().copied().fold(f64::INFINITY, f64::min),
                worst: scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            };
            (question_type, stats)
        })
        .collect();

    Ok(AggregateStats {
        overall,
        count: results.len(),
        per_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Forecast, QuestionDefinition};
    use crate::results::ScoreRecord;

    #[test]
    fn mean_of_scores() {
        let overall = overall_score([0.04, 0.0, 0.5]).unwrap();
        assert!((overall - 0.18).abs() < 1e-12, "got {overall}");
    }

    #[test]
    fn empty_is_an_error() {
        assert_eq!(
            overall_score(std::iter::empty::<f64>()),
            Err(ScoringError::EmptyResultSet)
        );
        assert!(compute_aggregate_stats(&ResultSet::new()).is_err());
    }

    #[test]
    fn order_does_not_matter() {
        let a = overall_score([0.1, 0.7, 0.25, 0.0]).unwrap();
        let b = overall_score([0.0, 0.25, 0.7, 0.1]).unwrap();
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn per_type_breakdown() {
        let b1 = QuestionDefinition::binary("b1", true);
        let b2 = QuestionDefinition::binary("b2", false);
        let c = QuestionDefinition::choice("c", "x", ["x", "y"]);
        let results: ResultSet = vec![
            ScoreRecord::new(&b1, &Forecast::Binary(0.8), 0.04),
            ScoreRecord::new(&b2, &Forecast::Binary(0.4), 0.16),
            ScoreRecord::new(&c, &Forecast::choice([("x", 1.0)]), 0.0),
        ]
        .into_iter()
        .collect();

        let stats = compute_aggregate_stats(&results).unwrap();
        assert_eq!(stats.count, 3);
        assert!((stats.overall - 0.2 / 3.0).abs() < 1e-12);

        let binary = &stats.per_type[&QuestionType::Binary];
        assert_eq!(binary.count, 2);
        assert!((binary.mean - 0.1).abs() < 1e-12);
        assert_eq!(binary.best, 0.04);
        assert_eq!(binary.worst, 0.16);
        assert_eq!(stats.per_type[&QuestionType::Choice].count, 1);
        assert!(!stats.per_type.contains_key(&QuestionType::Date));
    }
}
