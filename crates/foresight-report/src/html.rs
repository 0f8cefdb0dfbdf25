//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use std::path::Path;

use anyhow::{Context, Result};

use foresight_core::report::EvalReport;
use foresight_core::statistics::AggregateStats;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// CSS class for a score; lower is better.
fn score_class(score: f64) -> &'static str {
    if score <= 0.1 {
        "good"
    } else if score <= 0.25 {
        "fair"
    } else {
        "poor"
    }
}

/// Generate an HTML report from an eval report.
pub fn generate_html(report: &EvalReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>foresight report: {}</title>\n",
        html_escape(&report.question_set.name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str("<h1>foresight report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Question set: <strong>{}</strong> | {} questions | forecaster <strong>{}</strong> | {}</p>\n",
        html_escape(&report.question_set.name),
        report.question_set.question_count,
        html_escape(&report.forecaster),
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Summary
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str(&format!(
        "<p class=\"overall {}\">Overall score: <strong>{:.4}</strong> over {} questions (0 is perfect)</p>\n",
        score_class(report.overall()),
        report.overall(),
        report.aggregate.count
    ));

    html.push_str("<table class=\"summary\">\n");
    html.push_str(
        "<thead><tr><th>Type</th><th>Count</th><th>Mean</th><th>Best</th><th>Worst</th></tr></thead>\n",
    );
    html.push_str("<tbody>\n");
    for (question_type, stats) in &report.aggregate.per_type {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{:.4}</td><td>{:.4}</td><td>{:.4}</td></tr>\n",
            question_type, stats.count, stats.mean, stats.best, stats.worst,
        ));
    }
    html.push_str("</tbody></table>\n");

    if !report.aggregate.per_type.is_empty() {
        html.push_str(&generate_bar_chart(&report.aggregate));
    }

    html.push_str("</section>\n");

    // Per-question results
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Results</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Question</th><th onclick=\"sortTable(1)\">Type</th><th onclick=\"sortTable(2)\">Outcome</th><th onclick=\"sortTable(3)\">Forecast</th><th onclick=\"sortTable(4)\">Score</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for r in &report.results {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class=\"{}\">{:.4}</td></tr>\n",
            html_escape(&r.question_id),
            r.question_type,
            html_escape(&r.outcome),
            html_escape(&r.forecast),
            score_class(r.score),
            r.score
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    if !report.skipped.is_empty() {
        html.push_str("<section class=\"skipped\">\n");
        html.push_str("<h2>Skipped</h2>\n<ul>\n");
        for s in &report.skipped {
            html.push_str(&format!(
                "<li><strong>{}</strong>: {}</li>\n",
                html_escape(&s.question_id),
                html_escape(&s.reason)
            ));
        }
        html.push_str("</ul>\n</section>\n");
    }

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(report)
            .unwrap_or_default()
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &EvalReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

/// Mean score per question type as horizontal bars. Bars are scaled to the
/// [0, 1] score range, so an unclamped date mean above 1 fills the bar.
fn generate_bar_chart(aggregate: &AggregateStats) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 120;

    let total_height = aggregate.per_type.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 80,
        total_height
    );

    for (i, (question_type, stats)) in aggregate.per_type.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = (stats.mean.clamp(0.0, 1.0) * max_width as f64) as usize;

        let color = match score_class(stats.mean) {
            "good" => "#22c55e",
            "fair" => "#eab308",
            _ => "#ef4444",
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            question_type
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.4}</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            stats.mean
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --good: #dcfce7; --fair: #fef9c3; --poor: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --good: #064e3b; --fair: #713f12; --poor: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.overall { display: inline-block; padding: 0.5rem 1rem; border-radius: 8px; font-size: 1.2rem; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.good { background: var(--good); }
.fair { background: var(--fair); }
.poor { background: var(--poor); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

// Score column sorts numerically; the rest lexically.
const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = !(table.dataset.sortCol == col && table.dataset.sortDir == 'asc');
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    const cmp = col === 4 ? parseFloat(va) - parseFloat(vb) : va.localeCompare(vb);
    return asc ? cmp : -cmp;
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use foresight_core::model::{Forecast, QuestionDefinition};
    use foresight_core::report::{QuestionSetSummary, SkippedQuestion};
    use foresight_core::results::{ResultSet, ScoreRecord};
    use foresight_core::scoring::{Scorer, ScoringConfig};
    use foresight_core::statistics::compute_aggregate_stats;

    pub(crate) fn make_test_report() -> EvalReport {
        let scorer = Scorer::default();
        let pairs = [
            (
                QuestionDefinition::binary("Question 1", true),
                Forecast::Binary(0.8),
            ),
            (
                QuestionDefinition::choice("Question 6", "Alice", ["Alice", "Bob", "Charlie"]),
                Forecast::choice([("Alice", 0.6), ("Bob", 0.3), ("Charlie", 0.1)]),
            ),
        ];
        let results: ResultSet = pairs
            .iter()
            .map(|(q, f)| ScoreRecord::new(q, f, scorer.score(q, f).unwrap()))
            .collect();
        let aggregate = compute_aggregate_stats(&results).unwrap();

        EvalReport {
            id: uuid::Uuid::nil(),
            created_at: chrono::Utc::now(),
            question_set: QuestionSetSummary {
                id: "demo".into(),
                name: "Demo <Set>".into(),
                question_count: 3,
            },
            forecaster: "tester".into(),
            scoring: ScoringConfig::default(),
            results,
            skipped: vec![SkippedQuestion {
                question_id: "Question 3".into(),
                reason: "no forecast".into(),
            }],
            aggregate,
            duration_ms: 5,
        }
    }

    #[test]
    fn html_report_contains_required_elements() {
        let report = make_test_report();
        let html = generate_html(&report);

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("Question 1"));
        assert!(html.contains("Question 6"));
        assert!(html.contains("tester"));
        assert!(html.contains("<svg"));
        assert!(html.contains("Skipped"));
        assert!(html.contains(&format!("{:.4}", report.overall())));
    }

    #[test]
    fn html_escapes_user_text() {
        let html = generate_html(&make_test_report());
        assert!(html.contains("Demo &lt;Set&gt;"));
        assert!(!html.contains("Demo <Set>"));
    }

    #[test]
    fn score_classes() {
        assert_eq!(score_class(0.0), "good");
        assert_eq!(score_class(0.2), "fair");
        assert_eq!(score_class(0.9), "poor");
    }

    #[test]
    fn html_report_write_to_file() {
        let report = make_test_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/report.html");

        write_html_report(&report, &path).unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
