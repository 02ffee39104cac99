//! Aggregate statistics over report sets
//!
//! Global invariants enforced:
//! - Statistics are strictly derived (never stored, always recomputed)
//! - An empty set yields zero-valued statistics, never an error
//! - Status counts are always emitted in the fixed severity order

use crate::coerce::{coerce_field, coerce_number};
use crate::fields::{resolve_field, FieldPattern};
use crate::record::{Record, ReportSet};
use serde::{Deserialize, Serialize};

/// Coverage totals for a record set
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CoverageStats {
    pub covered: f64,
    pub missed: f64,
    pub total_coverage_percentage: f64,
}

/// Coverage status bands, ordered from worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CoverageStatus {
    Critical,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl CoverageStatus {
    pub const ALL: [CoverageStatus; 5] = [
        CoverageStatus::Critical,
        CoverageStatus::Poor,
        CoverageStatus::Fair,
        CoverageStatus::Good,
        CoverageStatus::Excellent,
    ];

    /// Label as it appears in the status column
    pub fn as_str(&self) -> &'static str {
        match self {
            CoverageStatus::Critical => "Critical",
            CoverageStatus::Poor => "Poor",
            CoverageStatus::Fair => "Fair",
            CoverageStatus::Good => "Good",
            CoverageStatus::Excellent => "Excellent",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            CoverageStatus::Critical => "critical",
            CoverageStatus::Poor => "poor",
            CoverageStatus::Fair => "fair",
            CoverageStatus::Good => "good",
            CoverageStatus::Excellent => "excellent",
        }
    }

    /// Parse a status cell, ignoring case and surrounding whitespace
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(label))
    }

    /// Warning shown for packages that need tests
    pub fn alert(&self) -> Option<&'static str> {
        match self {
            CoverageStatus::Critical => Some("Critical coverage! Add unit tests immediately."),
            CoverageStatus::Poor => Some("Poor coverage! Consider adding more tests."),
            _ => None,
        }
    }
}

/// Number of records carrying one status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: CoverageStatus,
    pub count: usize,
}

/// Headline numbers for the dashboard summary panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReportSummary {
    pub packages: usize,
    pub classes: usize,
    pub critical_packages: usize,
    pub total_coverage: f64,
}

/// Covered/remaining split of the overall coverage percentage
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageBreakdown {
    pub covered: f64,
    pub remaining: f64,
}

impl CoverageBreakdown {
    pub fn from_percentage(total: f64) -> Self {
        Self {
            covered: total,
            remaining: (100.0 - total).max(0.0),
        }
    }
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute covered/missed totals and the overall coverage percentage
///
/// The covered and missed columns are resolved on the first record's shape.
/// Unresolved columns contribute 0; a zero denominator yields 0%.
pub fn compute_stats(records: &[Record]) -> CoverageStats {
    let first = records.first();
    let covered_field = resolve_field(first, &FieldPattern::covered());
    let missed_field = resolve_field(first, &FieldPattern::missed());

    let (covered, missed) = records.iter().fold((0.0, 0.0), |(c, m), record| {
        (
            c + coerce_field(record, covered_field),
            m + coerce_field(record, missed_field),
        )
    });

    let denominator = covered + missed;
    let total_coverage_percentage = if denominator > 0.0 {
        round2(covered / denominator * 100.0)
    } else {
        0.0
    };

    CoverageStats {
        covered,
        missed,
        total_coverage_percentage,
    }
}

/// Count records per status, in the fixed Critical..Excellent order
pub fn status_counts(records: &[Record]) -> Vec<StatusCount> {
    let status_field = resolve_field(records.first(), &FieldPattern::status());

    CoverageStatus::ALL
        .into_iter()
        .map(|status| {
            let count = match status_field {
                Some(field) => records
                    .iter()
                    .filter(|r| r.value(field).eq_ignore_ascii_case(status.as_str()))
                    .count(),
                None => 0,
            };
            StatusCount { status, count }
        })
        .collect()
}

/// Status of a single record, if its status cell holds a known label
pub fn record_status(record: &Record) -> Option<CoverageStatus> {
    let field = resolve_field(Some(record), &FieldPattern::status())?;
    CoverageStatus::from_label(record.value(field))
}

/// Overall coverage reported by the summary set's first row
pub fn summary_total_coverage(summary: &ReportSet) -> f64 {
    summary.first().map_or(0.0, |row| {
        let field = resolve_field(Some(row), &FieldPattern::total_coverage());
        field.map_or(0.0, |name| coerce_number(row.value(name)))
    })
}

/// Build the summary panel numbers from the package, class and summary sets
pub fn summarize(packages: &ReportSet, classes: &ReportSet, summary: &ReportSet) -> ReportSummary {
    let critical_packages = status_counts(packages.records())
        .into_iter()
        .find(|c| c.status == CoverageStatus::Critical)
        .map_or(0, |c| c.count);

    ReportSummary {
        packages: packages.len(),
        classes: classes.len(),
        critical_packages,
        total_coverage: summary_total_coverage(summary),
    }
}
