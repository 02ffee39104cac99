//! Field name resolution over unknown header shapes
//!
//! Report headers differ between tools and hierarchy levels ("Covered",
//! "Instructions Covered", "INSTRUCTION_COVERED"...). Fields are looked up by
//! case-insensitive pattern instead of by exact name.

use crate::record::Record;
use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};

/// Case-insensitive pattern over field names
#[derive(Debug, Clone)]
pub struct FieldPattern {
    regex: Regex,
}

impl FieldPattern {
    /// Compile an arbitrary regular expression, matched case-insensitively
    pub fn new(expr: &str) -> Result<Self> {
        let regex = RegexBuilder::new(expr)
            .case_insensitive(true)
            .build()
            .with_context(|| format!("invalid field pattern: {}", expr))?;
        Ok(Self { regex })
    }

    /// Match field names containing `text`, ignoring case
    pub fn contains(text: &str) -> Self {
        let regex = RegexBuilder::new(&regex::escape(text))
            .case_insensitive(true)
            .build()
            .unwrap_or_else(|_| unreachable!("escaped literal is always a valid regex"));
        Self { regex }
    }

    pub fn covered() -> Self {
        Self::contains("covered")
    }

    pub fn missed() -> Self {
        Self::contains("missed")
    }

    pub fn status() -> Self {
        Self::contains("status")
    }

    pub fn instruction_coverage() -> Self {
        Self::contains("instruction coverage")
    }

    pub fn total_coverage() -> Self {
        Self::contains("total coverage")
    }

    pub fn package() -> Self {
        Self::contains("package")
    }

    pub fn class() -> Self {
        Self::contains("class")
    }

    pub fn is_match(&self, field_name: &str) -> bool {
        self.regex.is_match(field_name)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// Find the first field of `record` whose name matches `pattern`
///
/// Fields are tried in the record's own order, so the result is deterministic
/// for a given record shape. Returns `None` when there is no record or no
/// field matches.
pub fn resolve_field<'a>(record: Option<&'a Record>, pattern: &FieldPattern) -> Option<&'a str> {
    record?.field_names().find(|name| pattern.is_match(name))
}
