//! covscope core library - hierarchical coverage report pipeline

#![deny(warnings)]

// Global invariants enforced in this crate:
// - Records are schema-less; fields are located by pattern, never by struct member
// - No global mutable state; view state is owned by a single controller
// - No randomness, clocks, threads, or async
// - Malformed numbers coerce to 0 instead of failing
// - Identical input and events yield byte-for-byte identical output

pub mod aggregate;
pub mod bundle;
pub mod coerce;
pub mod config;
pub mod fields;
pub mod navigation;
pub mod parser;
pub mod query;
pub mod record;
pub mod render;
pub mod view;

pub use bundle::{ReportBundle, ReportFiles};
pub use config::ResolvedConfig;
pub use query::{SortDirection, TabCategory, TabThresholds};
pub use record::{Record, ReportLevel, ReportSet};
pub use render::{render_json, render_summary_json, render_summary_text, render_text};
pub use view::{ReportView, ViewModel};

use anyhow::Result;
use std::path::Path;
use tracing::info;

/// Open a report directory: resolve its configuration and load all reports
///
/// The returned view starts at the package table on the configured tab.
pub fn open(report_dir: &Path, config_path: Option<&Path>) -> Result<ReportView> {
    let config = config::load_and_resolve(report_dir, config_path)?;
    if let Some(ref path) = config.config_path {
        info!(config = %path.display(), "using config file");
    }
    let bundle = ReportBundle::load(report_dir, &config.report_files)?;
    Ok(ReportView::with_tab(
        bundle,
        config.thresholds,
        config.default_tab,
    ))
}
