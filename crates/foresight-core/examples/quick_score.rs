//! Quick score example: minimal programmatic usage of foresight.
//!
//! Builds a small question registry and a forecast set in code, scores them,
//! and prints the per-question scores and the overall score.
//!
//! ```bash
//! cargo run -p foresight-core --example quick_score
//! ```

use anyhow::Context;
use chrono::NaiveDate;
use foresight_core::engine::{EvalEngine, EvalEngineConfig, NoopReporter};
use foresight_core::model::{Forecast, ForecastSet, QuestionDefinition};
use foresight_core::registry::QuestionRegistry;

fn main() -> anyhow::Result<()> {
    let release = NaiveDate::from_ymd_opt(2024, 12, 31).context("invalid date")?;
    let guess = NaiveDate::from_ymd_opt(2024, 12, 1).context("invalid date")?;

    // Define the questions and how they resolved
    let registry = QuestionRegistry::new(
        "quick",
        "Quick Score",
        vec![
            QuestionDefinition::binary("Will it rain?", true),
            QuestionDefinition::date("Release date", release),
            QuestionDefinition::choice("Election", "Alice", ["Alice", "Bob", "Charlie"]),
        ],
    )?;
    let count = registry.len();
    println!("Loaded question set: {} ({count} questions)", registry.name);

    // One forecaster's predictions
    let mut forecasts = ForecastSet::new("alice")
        .with("Will it rain?", Forecast::Binary(0.8))
        .with("Release date", Forecast::Date(guess))
        .with(
            "Election",
            Forecast::choice([("Alice", 0.6), ("Bob", 0.3), ("Charlie", 0.1)]),
        );

    let engine = EvalEngine::new(EvalEngineConfig::default())?;
    let report = engine.run(&registry, &mut forecasts, &NoopReporter)?;

    // Lower is better: 0 is a perfect forecast, 1 the worst
    for record in &report.results {
        let (id, score) = (&record.question_id, record.score);
        println!("  {id}: {score:.4} (forecast {})", record.forecast);
    }
    println!("\nOverall score: {:.4}", report.overall());

    for (question_type, stats) in &report.aggregate.per_type {
        let mean = stats.mean;
        println!("  {question_type}: mean={mean:.4} (n={})", stats.count);
    }

    Ok(())
}
