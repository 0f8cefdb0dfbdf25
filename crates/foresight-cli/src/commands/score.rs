//! The `foresight score` command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use foresight_core::engine::{EvalEngine, FailurePolicy, ProgressReporter};
use foresight_core::parser;
use foresight_core::results::ScoreRecord;
use foresight_core::scoring::DateClamp;
use foresight_core::traits::ForecastSource;
use foresight_report::html::write_html_report;
use foresight_report::table::{render_results_table, render_type_table};
use foresight_sim::config::load_config_from;
use foresight_sim::SimulatedForecaster;

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_question_scored(&self, _record: &ScoreRecord) {}

    fn on_question_skipped(&self, question_id: &str, reason: &str) {
        eprintln!("  SKIPPED: {question_id}: {reason}");
    }

    fn on_run_complete(&self, scored: usize, skipped: usize, elapsed: Duration) {
        eprintln!(
            "Complete: {scored} scored, {skipped} skipped ({:.3}s)",
            elapsed.as_secs_f64()
        );
    }
}

pub struct ScoreArgs {
    pub questions: PathBuf,
    pub forecasts: Option<PathBuf>,
    pub simulate: bool,
    pub seed: Option<u64>,
    pub max_days: Option<u32>,
    pub unclamped: bool,
    pub skip_invalid: bool,
    pub output: Option<PathBuf>,
    pub format: String,
    pub config: Option<PathBuf>,
}

pub fn execute(args: ScoreArgs) -> Result<()> {
    let formats = parse_formats(&args.format)?;

    let mut config = load_config_from(args.config.as_deref())?;
    if let Some(max_days) = args.max_days {
        config.scoring.max_days = max_days;
    }
    if args.unclamped {
        config.scoring.date_clamp = DateClamp::Unclamped;
    }
    if args.skip_invalid {
        config.failure_policy = FailurePolicy::Skip;
    }
    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }
    let output = args.output.unwrap_or_else(|| config.output_dir.clone());

    let engine = EvalEngine::new(config.engine_config())?;
    let registries = parser::load_question_sets(&args.questions)?;
    anyhow::ensure!(
        !registries.is_empty(),
        "no question sets found in {}",
        args.questions.display()
    );

    let mut source: Box<dyn ForecastSource> = match (&args.forecasts, args.simulate) {
        (_, true) => Box::new(SimulatedForecaster::new(config.simulation.clone())?),
        (Some(path), false) => Box::new(parser::parse_forecast_set(path)?),
        (None, false) => anyhow::bail!("either --forecasts or --simulate is required"),
    };

    let reporter = ConsoleReporter;

    for registry in &registries {
        eprintln!(
            "foresight v{}: scoring {} questions from '{}' as {}",
            env!("CARGO_PKG_VERSION"),
            registry.len(),
            registry.name,
            source.name()
        );

        let report = engine.run(registry, source.as_mut(), &reporter)?;

        println!("{}", render_results_table(&report));
        println!("{}", render_type_table(&report));
        println!("Overall score: {:.4}", report.overall());

        if formats.is_empty() {
            continue;
        }

        std::fs::create_dir_all(&output)?;
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
        let stem = format!("report-{}-{timestamp}", file_safe(&registry.id));

        for fmt in &formats {
            match *fmt {
                "json" => {
                    let path = output.join(format!("{stem}.json"));
                    report.save_json(&path)?;
                    eprintln!("Results saved to: {}", path.display());
                }
                "html" => {
                    let path = output.join(format!("{stem}.html"));
                    write_html_report(&report, &path)?;
                    eprintln!("HTML report: {}", path.display());
                }
                _ => {}
            }
        }
    }

    Ok(())
}

/// File formats to write in addition to the terminal table.
fn parse_formats(format: &str) -> Result<Vec<&'static str>> {
    let mut formats: Vec<&'static str> = Vec::new();
    for fmt in format.split(',').map(str::trim) {
        let wanted: &[&'static str] = match fmt {
            "table" => &[],
            "json" => &["json"],
            "html" => &["html"],
            "all" => &["json", "html"],
            other => anyhow::bail!("unknown format '{other}', expected table, json, html or all"),
        };
        for w in wanted {
            if !formats.contains(w) {
                formats.push(*w);
            }
        }
    }
    Ok(formats)
}

fn file_safe(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats() {
        assert!(parse_formats("table").unwrap().is_empty());
        assert_eq!(parse_formats("all").unwrap(), ["json", "html"]);
        assert_eq!(parse_formats("table,json").unwrap(), ["json"]);
        assert_eq!(parse_formats("json,html,json").unwrap(), ["json", "html"]);
        assert!(parse_formats("sarif").is_err());
    }

    #[test]
    fn file_safe_ids() {
        assert_eq!(file_safe("demo-set_1"), "demo-set_1");
        assert_eq!(file_safe("Q 1/x"), "Q_1_x");
    }
}
