//! Comma-separated report parsing
//!
//! Global invariants enforced:
//! - Blank and whitespace-only lines never produce records
//! - Column values are assigned to header names strictly by position
//!
//! Quoted values are not supported: a value containing a comma shifts every
//! following column of its row.

use crate::record::{Record, ReportSet};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, warn};

/// Parse report text into records keyed by the header row
///
/// Returns an empty sequence when the text has no non-blank lines.
pub fn parse_records(text: &str) -> Vec<Record> {
    let mut lines = text.split('\n').filter(|line| !line.trim().is_empty());

    let headers: Vec<&str> = match lines.next() {
        Some(header_line) => header_line.split(',').map(str::trim).collect(),
        None => return Vec::new(),
    };

    let records: Vec<Record> = lines
        .enumerate()
        .map(|(row_index, line)| {
            let columns: Vec<&str> = line.split(',').collect();
            if columns.len() > headers.len() {
                warn!(
                    row = row_index + 1,
                    columns = columns.len(),
                    headers = headers.len(),
                    "row has more columns than headers; extra values dropped"
                );
            }
            headers
                .iter()
                .enumerate()
                .map(|(i, name)| (*name, columns.get(i).map_or("", |v| v.trim())))
                .collect::<Record>()
        })
        .collect();

    debug!(
        headers = headers.len(),
        rows = records.len(),
        "parsed report text"
    );
    records
}

/// Read and parse a report file into a report set
pub fn load_report_set(path: &Path) -> Result<ReportSet> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read report file: {}", path.display()))?;

    let records = parse_records(&text);
    debug!(path = %path.display(), rows = records.len(), "loaded report set");
    Ok(ReportSet::new(records))
}
