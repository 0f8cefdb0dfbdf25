//! Per-type scoring rules.
//!
//! Every rule maps a (question, forecast) pair to an error score in [0, 1]
//! where 0 is a perfect forecast:
//!
//! - binary: Brier score `(p - y)^2`
//! - choice: mean over the declared choices of `(p_c - y_c)^2`
//! - date: `(days_error / max_days)^2`, clamped to 1 unless configured otherwise

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::model::{Forecast, QuestionDefinition, Resolution};

/// Default date-forecast horizon in days.
pub const DEFAULT_MAX_DAYS: u32 = 365;

/// What happens to a date error larger than the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateClamp {
    /// Normalized error is capped at 1 before squaring.
    #[default]
    Clamp,
    /// Normalized error is squared as is and may exceed 1.
    Unclamped,
}

/// Scoring parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Horizon used to normalize date errors.
    #[serde(default = "default_max_days")]
    pub max_days: u32,
    /// Policy for date errors beyond the horizon.
    #[serde(default)]
    pub date_clamp: DateClamp,
}

fn default_max_days() -> u32 {
    DEFAULT_MAX_DAYS
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_days: DEFAULT_MAX_DAYS,
            date_clamp: DateClamp::Clamp,
        }
    }
}

/// Scores forecasts against question resolutions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer {
    config: ScoringConfig,
}

impl Scorer {
    pub fn new(config: ScoringConfig) -> Result<Self, ScoringError> {
        if config.max_days == 0 {
            return Err(ScoringError::InvalidConfig(
                "max_days must be at least 1".into(),
            ));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score one forecast. The rule is selected by the question's type.
    pub fn score(
        &self,
        question: &QuestionDefinition,
        forecast: &Forecast,
    ) -> Result<f64, ScoringError> {
        match (&question.resolution, forecast) {
            (Resolution::Binary { outcome }, Forecast::Binary(p)) => {
                check_probability(&question.id, "p", *p)?;
                Ok(binary_brier(*outcome, *p))
            }
            (Resolution::Date { outcome }, Forecast::Date(predicted)) => Ok(date_error_score(
                *outcome,
                *predicted,
                self.config.max_days,
                self.config.date_clamp,
            )),
            (Resolution::Choice { outcome, choices }, Forecast::Choice(probabilities)) => {
                for choice in choices {
                    let p = probabilities.get(choice).copied().unwrap_or(0.0);
                    check_probability(&question.id, choice, p)?;
                }
                Ok(choice_brier(outcome, choices, probabilities))
            }
            _ => Err(ScoringError::ForecastTypeMismatch {
                question_id: question.id.clone(),
                expected: question.question_type(),
                actual: forecast.question_type(),
            }),
        }
    }
}

fn check_probability(question_id: &str, label: &str, p: f64) -> Result<(), ScoringError> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(ScoringError::InvalidForecast {
            question_id: question_id.to_string(),
            label: label.to_string(),
            probability: p,
        })
    }
}

/// Brier score of a single binary event. Does not validate `probability`.
pub fn binary_brier(outcome: bool, probability: f64) -> f64 {
    let y = if outcome { 1.0 } else { 0.0 };
    (probability - y).powi(2)
}

/// Multi-class Brier score averaged over `choices`.
///
/// Labels missing from `probabilities` count as 0; labels not in `choices`
/// are ignored. An empty choice set scores 0.
pub fn choice_brier(
    outcome: &str,
    choices: &[String],
    probabilities: &BTreeMap<String, f64>,
) -> f64 {
    if choices.is_empty() {
        return 0.0;
    }
    let total: f64 = choices
        .iter()
        .map(|choice| {
            let p = probabilities.get(choice).copied().unwrap_or(0.0);
            let y = if choice == outcome { 1.0 } else { 0.0 };
            (p - y).powi(2)
        })
        .sum();
    total / choices.len() as f64
}

/// Normalized squared date error.
///
/// `max_days` must be non-zero; a zero horizon is treated as one day.
pub fn date_error_score(
    outcome: NaiveDate,
    predicted: NaiveDate,
    max_days: u32,
    clamp: DateClamp,
) -> f64 {
    let days_error = (outcome - predicted).num_days().unsigned_abs() as f64;
    let normalized = days_error / f64::from(max_days.max(1));
    let normalized = match clamp {
        DateClamp::Clamp => normalized.min(1.0),
        DateClamp::Unclamped => normalized,
    };
    normalized.powi(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn binary_examples() {
        let scorer = Scorer::default();
        let yes = QuestionDefinition::binary("q", true);
        let no = QuestionDefinition::binary("q", false);
        let leaning = Forecast::Binary(0.7);
        let certain = Forecast::Binary(1.0);
        assert!(approx(scorer.score(&yes, &leaning).unwrap(), 0.09));
        assert!(approx(scorer.score(&no, &leaning).unwrap(), 0.49));
        assert_eq!(scorer.score(&yes, &certain).unwrap(), 0.0);
        assert_eq!(scorer.score(&no, &certain).unwrap(), 1.0);
    }

    #[test]
    fn binary_rejects_out_of_range() {
        let scorer = Scorer::default();
        let q = QuestionDefinition::binary("q1", true);
        for p in [-0.1, 1.01, f64::NAN] {
            let err = scorer.score(&q, &Forecast::Binary(p)).unwrap_err();
            assert!(matches!(err, ScoringError::InvalidForecast { .. }), "p={p}");
        }
    }

    #[test]
    fn choice_perfect_and_wrong() {
        let scorer = Scorer::default();
        let q = QuestionDefinition::choice("q6", "Alice", ["Alice", "Bob", "Charlie"]);

        let perfect = Forecast::choice([("Alice", 1.0), ("Bob", 0.0), ("Charlie", 0.0)]);
        assert_eq!(scorer.score(&q, &perfect).unwrap(), 0.0);

        let wrong = Forecast::choice([("Alice", 0.0), ("Bob", 1.0), ("Charlie", 0.0)]);
        let score = scorer.score(&q, &wrong).unwrap();
        assert!(approx(score, 2.0 / 3.0), "got {score}");
    }

    #[test]
    fn choice_missing_keys_count_as_zero() {
        let scorer = Scorer::default();
        let q = QuestionDefinition::choice("q9", "Charlie", ["Alice", "Bob", "Charlie"]);

        let sparse = Forecast::choice([("Charlie", 1.0)]);
        assert_eq!(scorer.score(&q, &sparse).unwrap(), 0.0);

        // Missing mass is scored as zero on the true choice too.
        let partial = Forecast::choice([("Bob", 0.3)]);
        let score = scorer.score(&q, &partial).unwrap();
        assert!(approx(score, (0.09 + 1.0) / 3.0), "got {score}");
    }

    #[test]
    fn choice_ignores_unknown_labels() {
        let scorer = Scorer::default();
        let q = QuestionDefinition::choice("q", "Alice", ["Alice", "Bob"]);
        let f = Forecast::choice([("Alice", 1.0), ("Dave", 5.0)]);
        assert_eq!(scorer.score(&q, &f).unwrap(), 0.0);
    }

    #[test]
    fn choice_rejects_out_of_range() {
        let scorer = Scorer::default();
        let q = QuestionDefinition::choice("q", "Alice", ["Alice", "Bob"]);
        let over = Forecast::choice([("Alice", 1.2)]);
        let err = scorer.score(&q, &over).unwrap_err();
        match err {
            ScoringError::InvalidForecast {
                label,
                probability,
                ..
            } => {
                assert_eq!(label, "Alice");
                assert_eq!(probability, 1.2);
            }
            other => panic!("unexpected error: {other}"),
        }
        let negative = Forecast::choice([("Bob", -0.2)]);
        assert!(scorer.score(&q, &negative).is_err());
    }

    #[test]
    fn date_examples() {
        let scorer = Scorer::default();
        let q = QuestionDefinition::date("q3", ymd(2024, 12, 31));

        let score = |d: NaiveDate| scorer.score(&q, &Forecast::Date(d)).unwrap();

        assert_eq!(score(ymd(2024, 12, 31)), 0.0);

        let thirty_off = score(ymd(2024, 12, 1));
        assert!(approx(thirty_off, (30.0 / 365.0_f64).powi(2)));

        // 2024 is a leap year: 366 days, clamped to the horizon.
        assert_eq!(score(ymd(2023, 12, 31)), 1.0);

        // Direction does not matter.
        assert!(approx(score(ymd(2025, 1, 30)), thirty_off));
    }

    #[test]
    fn date_half_horizon_is_quarter() {
        let half = date_error_score(ymd(2024, 1, 1), ymd(2024, 1, 2), 2, DateClamp::Clamp);
        assert!(approx(half, 0.25));
    }

    #[test]
    fn date_clamp_policies() {
        let truth = ymd(2024, 12, 31);
        let two_years_off = truth - chrono::Duration::days(730);
        assert_eq!(
            date_error_score(truth, two_years_off, 365, DateClamp::Clamp),
            1.0
        );
        assert!(approx(
            date_error_score(truth, two_years_off, 365, DateClamp::Unclamped),
            4.0
        ));
        let year_off = truth - chrono::Duration::days(365);
        assert_eq!(
            date_error_score(truth, year_off, 365, DateClamp::Clamp),
            1.0
        );
    }

    #[test]
    fn custom_horizon() {
        let scorer = Scorer::new(ScoringConfig {
            max_days: 30,
            date_clamp: DateClamp::Clamp,
        })
        .unwrap();
        let q = QuestionDefinition::date("q", ymd(2024, 6, 30));
        let score = scorer.score(&q, &Forecast::Date(ymd(2024, 6, 15))).unwrap();
        assert!(approx(score, 0.25));
    }

    #[test]
    fn zero_horizon_rejected() {
        let err = Scorer::new(ScoringConfig {
            max_days: 0,
            date_clamp: DateClamp::Clamp,
        })
        .unwrap_err();
        assert!(matches!(err, ScoringError::InvalidConfig(_)));
    }

    #[test]
    fn mismatched_forecast_shape() {
        let scorer = Scorer::default();
        let q = QuestionDefinition::date("q8", ymd(2024, 6, 30));
        let err = scorer.score(&q, &Forecast::Binary(0.5)).unwrap_err();
        assert_eq!(
            err,
            ScoringError::ForecastTypeMismatch {
                question_id: "q8".into(),
                expected: crate::model::QuestionType::Date,
                actual: crate::model::QuestionType::Binary,
            }
        );
    }

    #[test]
    fn scoring_is_idempotent() {
        let scorer = Scorer::default();
        let q = QuestionDefinition::choice("q", "Bob", ["Alice", "Bob", "Charlie"]);
        let f = Forecast::choice([("Alice", 0.2), ("Bob", 0.5), ("Charlie", 0.3)]);
        assert_eq!(scorer.score(&q, &f).unwrap(), scorer.score(&q, &f).unwrap());
    }

    #[test]
    fn config_defaults_from_toml() {
        let config: ScoringConfig = toml::from_str("").unwrap();
        assert_eq!(config, ScoringConfig::default());

        let config: ScoringConfig =
            toml::from_str("max_days = 180\ndate_clamp = \"unclamped\"").unwrap();
        assert_eq!(config.max_days, 180);
        assert_eq!(config.date_clamp, DateClamp::Unclamped);
    }
}
