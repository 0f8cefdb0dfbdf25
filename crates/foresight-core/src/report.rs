//! Evaluation report types with JSON persistence and regression detection.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::results::ResultSet;
use crate::scoring::ScoringConfig;
use crate::statistics::AggregateStats;

/// A complete evaluation report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Summary of the question set.
    pub question_set: QuestionSetSummary,
    /// Who made the forecasts.
    pub forecaster: String,
    /// Scoring parameters used for this run.
    pub scoring: ScoringConfig,
    /// Per-question scores in registry order.
    pub results: ResultSet,
    /// Questions that could not be scored.
    #[serde(default)]
    pub skipped: Vec<SkippedQuestion>,
    /// Aggregate statistics, including the overall score.
    pub aggregate: AggregateStats,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// Summary of a question set (without the full definitions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSetSummary {
    pub id: String,
    pub name: String,
    pub question_count: usize,
}

/// A question left out of the aggregate, and why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedQuestion {
    pub question_id: String,
    pub reason: String,
}

impl EvalReport {
    /// The headline number: mean score over all scored questions.
    pub fn overall(&self) -> f64 {
        self.aggregate.overall
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: EvalReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Compare this report against a baseline.
    ///
    /// Scores are errors, so a rise of more than `threshold` is a regression
    /// and a drop of more than `threshold` an improvement.
    pub fn compare(&self, baseline: &EvalReport, threshold: f64) -> RegressionReport {
        let score_map = |report: &EvalReport| -> HashMap<String, f64> {
            report
                .results
                .iter()
                .map(|r| (r.question_id.clone(), r.score))
                .collect()
        };

        let baseline_scores = score_map(baseline);
        let current_scores = score_map(self);

        let mut regressions = Vec::new();
        let mut improvements = Vec::new();
        let mut unchanged = 0usize;
        let mut new_questions = 0usize;

        // Walk in report order so output is stable.
        for record in self.results.iter() {
            let current = record.score;
            let Some(&baseline_val) = baseline_scores.get(&record.question_id) else {
                new_questions += 1;
                continue;
            };
            let delta = current - baseline_val;
            let change = ScoreChange {
                question_id: record.question_id.clone(),
                baseline_score: baseline_val,
                current_score: current,
                delta,
            };
            if delta > threshold {
                regressions.push(change);
            } else if delta < -threshold {
                improvements.push(change);
            } else {
                unchanged += 1;
            }
        }

        let removed_questions = baseline_scores
            .keys()
            .filter(|k| !current_scores.contains_key(*k))
            .count();

        RegressionReport {
            baseline_overall: baseline.overall(),
            current_overall: self.overall(),
            regressions,
            improvements,
            unchanged,
            new_questions,
            removed_questions,
        }
    }
}

/// Result of comparing two reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionReport {
    /// Overall score of the baseline.
    pub baseline_overall: f64,
    /// Overall score of the current report.
    pub current_overall: f64,
    /// Questions whose score went up (worse).
    pub regressions: Vec<ScoreChange>,
    /// Questions whose score went down (better).
    pub improvements: Vec<ScoreChange>,
    /// Questions with no significant change.
    pub unchanged: usize,
    /// Questions in current but not baseline.
    pub new_questions: usize,
    /// Questions in baseline but not current.
    pub removed_questions: usize,
}

/// A per-question score change between two reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreChange {
    pub question_id: String,
    pub baseline_score: f64,
    pub current_score: f64,
    pub delta: f64,
}

impl RegressionReport {
    /// Format the regression report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Overall:** {:.4} -> {:.4} ({:+.4})\n\n",
            self.baseline_overall,
            self.current_overall,
            self.current_overall - self.baseline_overall
        ));
        md.push_str(&format!(
            "**Summary:** {} regressions, {} improvements, {} unchanged\n\n",
            self.regressions.len(),
            self.improvements.len(),
            self.unchanged
        ));

        for (title, changes) in [
            ("Regressions", &self.regressions),
            ("Improvements", &self.improvements),
        ] {
            if changes.is_empty() {
                continue;
            }
            md.push_str(&format!("### {title}\n\n"));
            md.push_str("| Question | Baseline | Current | Delta |\n");
            md.push_str("|----------|----------|---------|-------|\n");
            for c in changes {
                md.push_str(&format!(
                    "| {} | {:.4} | {:.4} | {:+.4} |\n",
                    c.question_id, c.baseline_score, c.current_score, c.delta
                ));
            }
            md.push('\n');
        }

        md
    }

    /// Returns true if there are any regressions.
    pub fn has_regressions(&self) -> bool {
        !self.regressions.is_empty()
    }
}
