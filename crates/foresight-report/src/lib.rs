//! foresight-report: Rendering of evaluation reports.

pub mod html;
pub mod table;

pub use html::{generate_html, write_html_report};
pub use table::{render_results_table, render_type_table};
