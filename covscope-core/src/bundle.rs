//! The four report sets a coverage view is built from
//!
//! A bundle exists only when every report loaded; there is no partially
//! loaded state.

use crate::aggregate::{self, ReportSummary};
use crate::fields::{resolve_field, FieldPattern};
use crate::parser::{load_report_set, parse_records};
use crate::record::{Record, ReportLevel, ReportSet};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// File names of the four reports inside a report directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFiles {
    pub package: String,
    pub class: String,
    pub method: String,
    pub summary: String,
}

impl Default for ReportFiles {
    fn default() -> Self {
        Self {
            package: "package_report.csv".to_string(),
            class: "class_report.csv".to_string(),
            method: "method_report.csv".to_string(),
            summary: "summary.csv".to_string(),
        }
    }
}

impl ReportFiles {
    pub fn file_for(&self, level: ReportLevel) -> &str {
        match level {
            ReportLevel::Package => &self.package,
            ReportLevel::Class => &self.class,
            ReportLevel::Method => &self.method,
            ReportLevel::Summary => &self.summary,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportBundle {
    packages: ReportSet,
    classes: ReportSet,
    methods: ReportSet,
    summary: ReportSet,
}

impl ReportBundle {
    pub fn new(packages: ReportSet, classes: ReportSet, methods: ReportSet, summary: ReportSet) -> Self {
        Self {
            packages,
            classes,
            methods,
            summary,
        }
    }

    /// Parse a bundle from in-memory report texts
    pub fn from_texts(package: &str, class: &str, method: &str, summary: &str) -> Self {
        Self::new(
            ReportSet::new(parse_records(package)),
            ReportSet::new(parse_records(class)),
            ReportSet::new(parse_records(method)),
            ReportSet::new(parse_records(summary)),
        )
    }

    /// Load all four reports from `dir`
    ///
    /// Fails as a whole if any report cannot be read.
    pub fn load(dir: &Path, files: &ReportFiles) -> Result<Self> {
        Self::load_sets(dir, files)
            .with_context(|| format!("failed to load coverage reports from {}", dir.display()))
    }

    fn load_sets(dir: &Path, files: &ReportFiles) -> Result<Self> {
        let packages = load_report_set(&dir.join(&files.package))?;
        let classes = load_report_set(&dir.join(&files.class))?;
        let methods = load_report_set(&dir.join(&files.method))?;
        let summary = load_report_set(&dir.join(&files.summary))?;

        info!(
            packages = packages.len(),
            classes = classes.len(),
            methods = methods.len(),
            "loaded coverage reports"
        );

        Ok(Self::new(packages, classes, methods, summary))
    }

    pub fn packages(&self) -> &ReportSet {
        &self.packages
    }

    pub fn classes(&self) -> &ReportSet {
        &self.classes
    }

    pub fn methods(&self) -> &ReportSet {
        &self.methods
    }

    pub fn summary_set(&self) -> &ReportSet {
        &self.summary
    }

    pub fn set(&self, level: ReportLevel) -> &ReportSet {
        match level {
            ReportLevel::Package => &self.packages,
            ReportLevel::Class => &self.classes,
            ReportLevel::Method => &self.methods,
            ReportLevel::Summary => &self.summary,
        }
    }

    /// Dashboard headline numbers
    pub fn summary(&self) -> ReportSummary {
        aggregate::summarize(&self.packages, &self.classes, &self.summary)
    }

    /// Package row whose package column equals `name`
    pub fn find_package(&self, name: &str) -> Option<&Record> {
        let field = resolve_field(self.packages.first(), &FieldPattern::package())?;
        self.packages.iter().find(|r| r.value(field) == name)
    }

    /// Class rows belonging to `package` (exact match on the package column)
    pub fn classes_in_package(&self, package: &str) -> Vec<Record> {
        match resolve_field(self.classes.first(), &FieldPattern::package()) {
            Some(field) => self
                .classes
                .iter()
                .filter(|r| r.value(field) == package)
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    /// Method rows belonging to `class`
    ///
    /// When the method report also carries a package column, rows must match
    /// `package` too, so equally named classes in different packages stay apart.
    pub fn methods_in_class(&self, package: &str, class: &str) -> Vec<Record> {
        let first = self.methods.first();
        let class_field = match resolve_field(first, &FieldPattern::class()) {
            Some(field) => field,
            None => return Vec::new(),
        };
        let package_field = resolve_field(first, &FieldPattern::package());

        self.methods
            .iter()
            .filter(|r| r.value(class_field) == class)
            .filter(|r| match package_field {
                Some(field) => r.value(field) == package,
                None => true,
            })
            .cloned()
            .collect()
    }
}
