//! Random forecaster backed by a seeded `StdRng`.

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use foresight_core::model::{Forecast, ForecastSet, QuestionDefinition, Resolution};
use foresight_core::registry::QuestionRegistry;
use foresight_core::traits::ForecastSource;

/// Parameters of the simulated forecaster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for the random generator.
    pub seed: u64,
    /// Lower bound (inclusive) of binary probabilities.
    pub binary_min: f64,
    /// Upper bound (exclusive) of binary probabilities.
    pub binary_max: f64,
    /// First date a date forecast can land on.
    pub date_anchor: NaiveDate,
    /// Number of days after the anchor a date forecast can land on.
    pub date_span_days: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            binary_min: 0.4,
            binary_max: 0.9,
            date_anchor: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            date_span_days: 365,
        }
    }
}

impl SimulationConfig {
    /// Check that the configured ranges are non-empty and inside [0, 1].
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            0.0 <= self.binary_min && self.binary_min < self.binary_max && self.binary_max <= 1.0,
            "binary range must satisfy 0 <= binary_min < binary_max <= 1, got [{}, {})",
            self.binary_min,
            self.binary_max
        );
        anyhow::ensure!(self.date_span_days > 0, "date_span_days must be positive");
        Ok(())
    }
}

/// Draws plausible forecasts for any question type.
///
/// The same seed over the same questions, visited in the same order, yields
/// the same forecasts.
pub struct SimulatedForecaster {
    name: String,
    config: SimulationConfig,
    rng: StdRng,
}

impl SimulatedForecaster {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            name: format!("simulated(seed={})", config.seed),
            rng: StdRng::seed_from_u64(config.seed),
            config,
        })
    }

    /// Convenience constructor with default ranges.
    pub fn with_seed(seed: u64) -> Result<Self> {
        Self::new(SimulationConfig {
            seed,
            ..Default::default()
        })
    }

    /// Draw one forecast shaped for `question`.
    pub fn draw(&mut self, question: &QuestionDefinition) -> Forecast {
        match &question.resolution {
            Resolution::Binary { .. } => {
                let (low, high) = (self.config.binary_min, self.config.binary_max);
                Forecast::Binary(self.rng.gen_range(low..high))
            }
            Resolution::Date { .. } => {
                let offset = self.rng.gen_range(0..self.config.date_span_days);
                Forecast::Date(self.config.date_anchor + Duration::days(i64::from(offset)))
            }
            Resolution::Choice { choices, .. } => {
                let weights = self.flat_dirichlet(choices.len());
                Forecast::choice(choices.iter().cloned().zip(weights))
            }
        }
    }

    /// Draw a forecast for every question, in registry order.
    pub fn simulate(&mut self, registry: &QuestionRegistry) -> ForecastSet {
        let mut set = ForecastSet::new(self.name.clone());
        for question in registry {
            let forecast = self.draw(question);
            set.insert(question.id.clone(), forecast);
        }
        tracing::debug!("simulated {} forecasts as {}", set.len(), self.name);
        set
    }

    /// Sample from Dirichlet(1, ..., 1) via normalized unit exponentials.
    fn flat_dirichlet(&mut self, n: usize) -> Vec<f64> {
        let draws: Vec<f64> = (0..n)
            .map(|_| {
                // gen::<f64>() is in [0, 1); 1 - u is in (0, 1] so ln stays finite.
                let u: f64 = self.rng.gen();
                -(1.0 - u).ln()
            })
            .collect();
        let total: f64 = draws.iter().sum();
        if total > 0.0 {
            draws.iter().map(|d| d / total).collect()
        } else {
            vec![1.0 / n as f64; n]
        }
    }
}

impl ForecastSource for SimulatedForecaster {
    fn name(&self) -> &str {
        &self.name
    }

    fn forecast(&mut self, question: &QuestionDefinition) -> Result<Forecast> {
        Ok(self.draw(question))
    }
}
