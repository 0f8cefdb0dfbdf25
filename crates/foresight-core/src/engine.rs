//! Evaluation run orchestrator.
//!
//! Walks a question registry in order, pulls a forecast for each question
//! from a [`ForecastSource`], scores it, and assembles the final report.

use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ScoringError;
use crate::model::{Forecast, QuestionDefinition};
use crate::registry::QuestionRegistry;
use crate::report::{EvalReport, QuestionSetSummary, SkippedQuestion};
use crate::results::{ResultSet, ScoreRecord};
use crate::scoring::{Scorer, ScoringConfig};
use crate::statistics::compute_aggregate_stats;
use crate::traits::ForecastSource;

/// What to do when a single question cannot be scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Abort the run on the first per-question error.
    #[default]
    FailFast,
    /// Record the question as skipped and keep going.
    Skip,
}

/// Configuration for an evaluation run.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvalEngineConfig {
    /// Scoring parameters.
    pub scoring: ScoringConfig,
    /// Handling of per-question errors.
    pub failure_policy: FailurePolicy,
}

/// Progress reporting trait.
pub trait ProgressReporter {
    fn on_question_scored(&self, record: &ScoreRecord);
    fn on_question_skipped(&self, question_id: &str, reason: &str);
    fn on_run_complete(&self, scored: usize, skipped: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_question_scored(&self, _: &ScoreRecord) {}
    fn on_question_skipped(&self, _: &str, _: &str) {}
    fn on_run_complete(&self, _: usize, _: usize, _: Duration) {}
}

/// The evaluation engine.
pub struct EvalEngine {
    scorer: Scorer,
    config: EvalEngineConfig,
}

impl EvalEngine {
    pub fn new(config: EvalEngineConfig) -> Result<Self, ScoringError> {
        Ok(Self {
            scorer: Scorer::new(config.scoring)?,
            config,
        })
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    /// Score every question in `registry` against forecasts from `source`.
    ///
    /// Fails with [`ScoringError::EmptyResultSet`] if nothing could be scored.
    pub fn run(
        &self,
        registry: &QuestionRegistry,
        source: &mut dyn ForecastSource,
        progress: &dyn ProgressReporter,
    ) -> Result<EvalReport> {
        let start = Instant::now();
        let mut results = ResultSet::new();
        let mut skipped = Vec::new();

        for question in registry {
            match self.score_question(question, source) {
                Ok(record) => {
                    tracing::debug!(
                        question = %record.question_id,
                        score = record.score,
                        "scored question"
                    );
                    progress.on_question_scored(&record);
                    results.push(record);
                }
                Err(e) => {
                    let per_question = e
                        .downcast_ref::<ScoringError>()
                        .is_some_and(ScoringError::is_per_question);
                    if !per_question || self.config.failure_policy == FailurePolicy::FailFast {
                        return Err(e);
                    }
                    let reason = format!("{e:#}");
                    tracing::warn!("skipping question '{}': {}", question.id, reason);
                    progress.on_question_skipped(&question.id, &reason);
                    skipped.push(SkippedQuestion {
                        question_id: question.id.clone(),
                        reason,
                    });
                }
            }
        }

        let aggregate = compute_aggregate_stats(&results)?;
        let elapsed = start.elapsed();
        progress.on_run_complete(results.len(), skipped.len(), elapsed);

        Ok(EvalReport {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            question_set: QuestionSetSummary {
                id: registry.id.clone(),
                name: registry.name.clone(),
                question_count: registry.len(),
            },
            forecaster: source.name().to_string(),
            scoring: *self.scorer.config(),
            results,
            skipped,
            aggregate,
            duration_ms: elapsed.as_millis() as u64,
        })
    }

    fn score_question(
        &self,
        question: &QuestionDefinition,
        source: &mut dyn ForecastSource,
    ) -> Result<ScoreRecord> {
        let forecast = source.forecast(question)?;
        warn_on_undeclared_labels(question, &forecast);
        let score = self.scorer.score(question, &forecast)?;
        Ok(ScoreRecord::new(question, &forecast, score))
    }
}

fn warn_on_undeclared_labels(question: &QuestionDefinition, forecast: &Forecast) {
    if let Forecast::Choice(probabilities) = forecast {
        let choices = question.choices();
        for label in probabilities.keys().filter(|l| !choices.contains(*l)) {
            tracing::warn!(
                "forecast for '{}' names undeclared choice '{}'; it is not scored",
                question.id,
                label
            );
        }
    }
}
