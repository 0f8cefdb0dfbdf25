//! Terminal tables.

use comfy_table::{Cell, CellAlignment, Table};

use foresight_core::report::EvalReport;

/// Per-question results: question, type, outcome, forecast, score.
pub fn render_results_table(report: &EvalReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Question", "Type", "Outcome", "Forecast", "Score"]);

    for record in &report.results {
        table.add_row(vec![
            Cell::new(&record.question_id),
            Cell::new(record.question_type),
            Cell::new(&record.outcome),
            Cell::new(&record.forecast),
            Cell::new(format!("{:.4}", record.score)).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

/// Per-type breakdown: count, mean, best and worst score.
pub fn render_type_table(report: &EvalReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Type", "Count", "Mean", "Best", "Worst"]);

    for (question_type, stats) in &report.aggregate.per_type {
        table.add_row(vec![
            Cell::new(question_type),
            Cell::new(stats.count),
            Cell::new(format!("{:.4}", stats.mean)),
            Cell::new(format!("{:.4}", stats.best)),
            Cell::new(format!("{:.4}", stats.worst)),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::tests::make_test_report;

    #[test]
    fn results_table_lists_every_question() {
        let report = make_test_report();
        let rendered = render_results_table(&report).to_string();

        assert!(rendered.contains("Question"));
        assert!(rendered.contains("Question 1"));
        assert!(rendered.contains("Question 6"));
        assert!(rendered.contains("Alice"));
        assert!(rendered.contains("0.0400"));
    }

    #[test]
    fn type_table_has_one_row_per_type() {
        let report = make_test_report();
        let rendered = render_type_table(&report).to_string();

        assert!(rendered.contains("binary"));
        assert!(rendered.contains("choice"));
        assert!(!rendered.contains("date"));
    }
}
