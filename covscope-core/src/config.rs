//! Configuration file support for covscope
//!
//! Loads per-report-directory configuration from JSON files.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.covscoperc.json` in the report directory
//! 3. `covscope.config.json` in the report directory
//!
//! All fields are optional. CLI flags take precedence over config file values.

use crate::bundle::ReportFiles;
use crate::query::{TabCategory, TabThresholds};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAMES: &[&str] = &[".covscoperc.json", "covscope.config.json"];

/// covscope configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CovscopeConfig {
    /// Report file names inside the report directory
    #[serde(default)]
    pub reports: Option<ReportFilesConfig>,

    /// Coverage cut-offs for the `top` and `attention` tabs
    #[serde(default)]
    pub tabs: Option<TabConfig>,

    /// Tab selected when the view opens (default: all)
    #[serde(default)]
    pub default_tab: Option<String>,
}

/// Report file name overrides
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportFilesConfig {
    /// Package report (default: package_report.csv)
    pub package: Option<String>,
    /// Class report (default: class_report.csv)
    pub class: Option<String>,
    /// Method report (default: method_report.csv)
    pub method: Option<String>,
    /// Summary report (default: summary.csv)
    pub summary: Option<String>,
}

/// Tab threshold overrides
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TabConfig {
    /// Minimum instruction coverage for `top` (default: 80.0)
    pub top_min: Option<f64>,
    /// Instruction coverage below which a package needs attention (default: 40.0)
    pub attention_below: Option<f64>,
}

/// Resolved configuration with every default filled in
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub report_files: ReportFiles,
    pub thresholds: TabThresholds,
    pub default_tab: TabCategory,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

impl CovscopeConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        if let Some(ref r) = self.reports {
            for (name, value) in [
                ("package", &r.package),
                ("class", &r.class),
                ("method", &r.method),
                ("summary", &r.summary),
            ] {
                if let Some(v) = value {
                    if v.trim().is_empty() {
                        anyhow::bail!("reports.{} must not be empty", name);
                    }
                }
            }
        }

        if let Some(ref t) = self.tabs {
            let defaults = TabThresholds::default();
            let top_min = t.top_min.unwrap_or(defaults.top_min);
            let attention_below = t.attention_below.unwrap_or(defaults.attention_below);

            for (name, value) in [("top_min", top_min), ("attention_below", attention_below)] {
                if !(0.0..=100.0).contains(&value) {
                    anyhow::bail!("tabs.{} must be between 0 and 100 (got {})", name, value);
                }
            }
            if attention_below > top_min {
                anyhow::bail!(
                    "tabs.attention_below ({}) must not exceed tabs.top_min ({})",
                    attention_below,
                    top_min
                );
            }
        }

        if let Some(ref tab) = self.default_tab {
            tab.parse::<TabCategory>()
                .with_context(|| format!("invalid default_tab: {}", tab))?;
        }

        Ok(())
    }

    /// Resolve config into the form the view consumes
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        let mut report_files = ReportFiles::default();
        if let Some(ref r) = self.reports {
            if let Some(ref v) = r.package {
                report_files.package = v.clone();
            }
            if let Some(ref v) = r.class {
                report_files.class = v.clone();
            }
            if let Some(ref v) = r.method {
                report_files.method = v.clone();
            }
            if let Some(ref v) = r.summary {
                report_files.summary = v.clone();
            }
        }

        let defaults = TabThresholds::default();
        let thresholds = match &self.tabs {
            Some(t) => TabThresholds {
                top_min: t.top_min.unwrap_or(defaults.top_min),
                attention_below: t.attention_below.unwrap_or(defaults.attention_below),
            },
            None => defaults,
        };

        let default_tab = match &self.default_tab {
            Some(tab) => tab.parse()?,
            None => TabCategory::All,
        };

        Ok(ResolvedConfig {
            report_files,
            thresholds,
            default_tab,
            config_path: None,
        })
    }
}

impl ResolvedConfig {
    /// Build a ResolvedConfig with all defaults (no config file)
    pub fn defaults() -> Result<Self> {
        CovscopeConfig::default().resolve()
    }
}

/// Discover and load a config file from the report directory
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(report_dir: &Path) -> Result<Option<(CovscopeConfig, PathBuf)>> {
    for name in CONFIG_FILE_NAMES {
        let path = report_dir.join(name);
        if path.exists() {
            let config = load_config_file(&path)?;
            return Ok(Some((config, path)));
        }
    }
    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<CovscopeConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: CovscopeConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load and resolve config for a report directory
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config in the report directory.
/// Returns default config if nothing is found.
pub fn load_and_resolve(report_dir: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(report_dir)? {
            Some((config, path)) => (config, Some(path)),
            None => (CovscopeConfig::default(), None),
        }
    };

    let mut resolved = config.resolve()?;
    resolved.config_path = source_path;
    Ok(resolved)
}
