//! Text and JSON output for a rendered view
//!
//! Global invariants enforced:
//! - Output depends only on the view model (deterministic)
//! - Column order is the header order of the visible rows

use crate::aggregate::{CoverageBreakdown, ReportSummary, StatusCount};
use crate::query::SortDirection;
use crate::view::ViewModel;
use serde::Serialize;

const COLUMN_WIDTH: usize = 24;

/// Render a view as a plain-text dashboard and table
pub fn render_text(view: &ViewModel) -> String {
    let mut output = String::new();

    let path = view
        .breadcrumb
        .iter()
        .map(|c| c.label())
        .collect::<Vec<_>>()
        .join(" > ");
    output.push_str(&format!("{}\n", path));

    if let Some(ref alert) = view.alert {
        output.push_str(&format!("! {}\n", alert));
    }

    push_summary(&mut output, view);
    output.push_str(&format!(
        "Tab: {}  Rows: {}  Coverage: {:.2}%\n\n",
        view.tab.as_str(),
        view.rows.len(),
        view.stats.total_coverage_percentage
    ));

    if view.rows.is_empty() {
        output.push_str("No data to display\n");
        return output;
    }

    let header_line = view
        .headers
        .iter()
        .map(|h| truncate_or_pad(&header_label(view, h), COLUMN_WIDTH))
        .collect::<Vec<_>>()
        .join(" ");
    output.push_str(header_line.trim_end());
    output.push('\n');

    for row in &view.rows {
        let line = view
            .headers
            .iter()
            .map(|h| truncate_or_pad(row.value(h), COLUMN_WIDTH))
            .collect::<Vec<_>>()
            .join(" ");
        output.push_str(line.trim_end());
        output.push('\n');
    }

    output
}

/// Render a view as JSON output
pub fn render_json(view: &ViewModel) -> String {
    serde_json::to_string_pretty(view).unwrap_or_else(|_| "{}".to_string())
}

/// Dashboard numbers without the table
#[derive(Serialize)]
struct SummaryOutput<'a> {
    summary: &'a ReportSummary,
    status_counts: &'a [StatusCount],
    coverage: &'a CoverageBreakdown,
}

pub fn render_summary_text(view: &ViewModel) -> String {
    let mut output = String::new();
    push_summary(&mut output, view);
    output.push_str(&format!(
        "Coverage split: {:.2}% covered, {:.2}% remaining\n",
        view.coverage.covered, view.coverage.remaining
    ));
    output
}

pub fn render_summary_json(view: &ViewModel) -> String {
    let summary = SummaryOutput {
        summary: &view.summary,
        status_counts: &view.status_counts,
        coverage: &view.coverage,
    };
    serde_json::to_string_pretty(&summary).unwrap_or_else(|_| "{}".to_string())
}

fn push_summary(output: &mut String, view: &ViewModel) {
    output.push_str(&format!(
        "Packages: {}  Classes: {}  Critical: {}  Total Coverage: {:.2}%\n",
        view.summary.packages,
        view.summary.classes,
        view.summary.critical_packages,
        view.summary.total_coverage
    ));

    let counts = view
        .status_counts
        .iter()
        .map(|c| format!("{}={}", c.status.as_str(), c.count))
        .collect::<Vec<_>>()
        .join(" ");
    output.push_str(&format!("Status: {}\n", counts));
}

/// Header text with a marker on the sorted column
fn header_label(view: &ViewModel, header: &str) -> String {
    match view.sort {
        Some(ref key) if key.field == header => {
            let marker = match key.direction {
                SortDirection::Ascending => '^',
                SortDirection::Descending => 'v',
            };
            format!("{} {}", header, marker)
        }
        _ => header.to_string(),
    }
}

/// Truncate or pad string to fixed width (counted in characters)
fn truncate_or_pad(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        format!("{:<width$}", s, width = width)
    }
}
