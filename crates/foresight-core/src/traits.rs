//! Seams between the scoring core and its collaborators.
//!
//! Forecasts come in through [`ForecastSource`]; the core never cares whether
//! they were read from a file or drawn from a seeded simulator.

use anyhow::Result;

use crate::error::ScoringError;
use crate::model::{Forecast, ForecastSet, QuestionDefinition};

/// Supplies one forecast per question.
pub trait ForecastSource {
    /// Human-readable forecaster name (e.g. "alice" or "simulated(seed=42)").
    fn name(&self) -> &str;

    /// Produce the forecast for `question`.
    ///
    /// A source that has nothing for the question should fail with
    /// [`ScoringError::MissingForecast`] so the run can apply its failure
    /// policy.
    fn forecast(&mut self, question: &QuestionDefinition) -> Result<Forecast>;
}

impl ForecastSource for ForecastSet {
    fn name(&self) -> &str {
        &self.forecaster
    }

    fn forecast(&mut self, question: &QuestionDefinition) -> Result<Forecast> {
        self.get(&question.id)
            .cloned()
            .ok_or_else(|| ScoringError::MissingForecast(question.id.clone()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_set_lookup() {
        let mut set = ForecastSet::new("alice").with("q1", Forecast::Binary(0.8));
        let q1 = QuestionDefinition::binary("q1", true);
        assert_eq!(set.forecast(&q1).unwrap(), Forecast::Binary(0.8));
        assert_eq!(set.name(), "alice");
    }

    #[test]
    fn forecast_set_missing_is_typed() {
        let mut set = ForecastSet::new("alice");
        let q2 = QuestionDefinition::binary("q2", true);
        let err = set.forecast(&q2).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ScoringError>(),
            Some(&ScoringError::MissingForecast("q2".into()))
        );
    }
}
