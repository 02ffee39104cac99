//! Query engine: tab filtering, substring search and column sorting
//!
//! Global invariants enforced:
//! - Filters never mutate their input; they return new sequences
//! - Order of operations is tab filter, then search, then sort
//! - Sorting is stable; descending reverses the comparator, not the output
//! - Numeric comparison wins whenever either side coerces to a non-zero value

use crate::coerce::{coerce_field, coerce_number};
use crate::fields::{resolve_field, FieldPattern};
use crate::record::{Record, ReportLevel};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Coverage bucket applied to the package table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabCategory {
    #[default]
    All,
    Top,
    Attention,
}

impl TabCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TabCategory::All => "all",
            TabCategory::Top => "top",
            TabCategory::Attention => "attention",
        }
    }

    pub fn all() -> &'static [TabCategory] {
        &[TabCategory::All, TabCategory::Top, TabCategory::Attention]
    }
}

impl FromStr for TabCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TabCategory::All),
            "top" => Ok(TabCategory::Top),
            "attention" => Ok(TabCategory::Attention),
            other => anyhow::bail!("unknown tab '{}' (expected all, top or attention)", other),
        }
    }
}

/// Instruction coverage cut-offs for the `top` and `attention` tabs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TabThresholds {
    /// `top` keeps packages at or above this percentage
    pub top_min: f64,
    /// `attention` keeps packages strictly below this percentage
    pub attention_below: f64,
}

impl Default for TabThresholds {
    fn default() -> Self {
        Self {
            top_min: 80.0,
            attention_below: 40.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

/// Field and direction of one sort
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

/// Column sort state of a view session
///
/// Clicking the active field flips its direction; clicking any other field
/// makes it active and ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    field: Option<String>,
    direction: SortDirection,
}

impl SortState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a click on a column header and return the new direction
    pub fn click(&mut self, field: &str) -> SortDirection {
        if self.field.as_deref() == Some(field) {
            self.direction = self.direction.flipped();
        } else {
            self.field = Some(field.to_string());
            self.direction = SortDirection::Ascending;
        }
        self.direction
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    pub fn key(&self) -> Option<SortKey> {
        self.field.as_ref().map(|field| SortKey {
            field: field.clone(),
            direction: self.direction,
        })
    }
}

/// Everything the engine needs to derive one table
#[derive(Debug, Clone)]
pub struct Query {
    pub level: ReportLevel,
    pub search: String,
    pub tab: TabCategory,
    pub sort: Option<SortKey>,
}

impl Query {
    pub fn new(level: ReportLevel) -> Self {
        Self {
            level,
            search: String::new(),
            tab: TabCategory::All,
            sort: None,
        }
    }
}

/// Keep package rows belonging to the tab's coverage bucket
///
/// Only the package level is bucketed; other levels pass through unchanged.
pub fn apply_tab_filter(
    records: &[Record],
    level: ReportLevel,
    tab: TabCategory,
    thresholds: &TabThresholds,
) -> Vec<Record> {
    if level != ReportLevel::Package || tab == TabCategory::All {
        return records.to_vec();
    }

    let field = resolve_field(records.first(), &FieldPattern::instruction_coverage());
    records
        .iter()
        .filter(|record| {
            let coverage = coerce_field(record, field);
            match tab {
                TabCategory::Top => coverage >= thresholds.top_min,
                TabCategory::Attention => coverage < thresholds.attention_below,
                TabCategory::All => true,
            }
        })
        .cloned()
        .collect()
}

/// Keep records where any value contains the query, ignoring case
pub fn apply_search_filter(records: &[Record], query: &str) -> Vec<Record> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|record| record.values().any(|v| v.to_lowercase().contains(&needle)))
        .cloned()
        .collect()
}

/// Compare two raw cell values
///
/// When either side coerces to a non-zero number the comparison is numeric.
/// Only when both coerce to exactly zero are the raw strings compared
/// lexicographically (case-sensitive). A literal "0" and a non-numeric string
/// therefore fall into the same lexicographic branch.
pub fn compare_values(a: &str, b: &str) -> Ordering {
    let an = coerce_number(a);
    let bn = coerce_number(b);
    if an != 0.0 || bn != 0.0 {
        return an.partial_cmp(&bn).unwrap_or(Ordering::Equal);
    }
    a.cmp(b)
}

/// Sort records in place by one field
pub fn sort_records(records: &mut [Record], field: &str, direction: SortDirection) {
    records.sort_by(|a, b| {
        let ordering = compare_values(a.value(field), b.value(field));
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

/// Apply tab filter, search filter and optional sort to a record set
pub fn filter_and_sort(
    records: &[Record],
    query: &Query,
    thresholds: &TabThresholds,
) -> Vec<Record> {
    let tabbed = apply_tab_filter(records, query.level, query.tab, thresholds);
    let mut result = apply_search_filter(&tabbed, &query.search);

    if let Some(ref key) = query.sort {
        sort_records(&mut result, &key.field, key.direction);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(name: &str, coverage: &str) -> Record {
        [
            ("Package", name),
            ("Status", "Fair"),
            ("Instruction Coverage (%)", coverage),
        ]
        .into_iter()
        .collect()
    }

    fn names(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.value("Package")).collect()
    }

    #[test]
    fn test_sort_clicks_toggle_direction() {
        let mut state = SortState::new();
        assert_eq!(state.click("Package"), SortDirection::Ascending);
        assert_eq!(state.click("Package"), SortDirection::Descending);
        assert_eq!(state.click("Package"), SortDirection::Ascending);
    }

    #[test]
    fn test_sort_click_new_field_resets_to_ascending() {
        let mut state = SortState::new();
        state.click("Package");
        state.click("Package");
        assert_eq!(state.direction(), SortDirection::Descending);
        assert_eq!(state.click("Status"), SortDirection::Ascending);
        assert_eq!(state.field(), Some("Status"));
    }

    #[test]
    fn test_tab_filter_buckets() {
        let records = vec![package("hi", "85"), package("low", "35"), package("mid", "60")];
        let thresholds = TabThresholds::default();

        let top = apply_tab_filter(&records, ReportLevel::Package, TabCategory::Top, &thresholds);
        assert_eq!(names(&top), vec!["hi"]);

        let attention = apply_tab_filter(
            &records,
            ReportLevel::Package,
            TabCategory::Attention,
            &thresholds,
        );
        assert_eq!(names(&attention), vec!["low"]);

        let all = apply_tab_filter(&records, ReportLevel::Package, TabCategory::All, &thresholds);
        assert_eq!(names(&all), vec!["hi", "low", "mid"]);
    }

    #[test]
    fn test_tab_filter_boundaries() {
        let records = vec![package("eighty", "80%"), package("forty", "40%")];
        let thresholds = TabThresholds::default();
        let top = apply_tab_filter(&records, ReportLevel::Package, TabCategory::Top, &thresholds);
        assert_eq!(names(&top), vec!["eighty"]);
        let attention = apply_tab_filter(
            &records,
            ReportLevel::Package,
            TabCategory::Attention,
            &thresholds,
        );
        assert!(attention.is_empty());
    }

    #[test]
    fn test_tab_filter_ignored_below_package_level() {
        let records = vec![package("hi", "85"), package("low", "35")];
        let result = apply_tab_filter(
            &records,
            ReportLevel::Class,
            TabCategory::Top,
            &TabThresholds::default(),
        );
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_search_matches_any_field_case_insensitive() {
        let records = vec![
            [("Class", "com.pkg1.Foo"), ("Status", "Good")].into_iter().collect(),
            [("Class", "com.other.Bar"), ("Status", "Poor")].into_iter().collect::<Record>(),
        ];
        let result = apply_search_filter(&records, "PKG1");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].value("Class"), "com.pkg1.Foo");

        let by_status = apply_search_filter(&records, "  poor ");
        assert_eq!(by_status.len(), 1);
    }

    #[test]
    fn test_empty_search_matches_everything() {
        let records = vec![package("a", "1"), package("b", "2")];
        assert_eq!(apply_search_filter(&records, "").len(), 2);
        assert_eq!(apply_search_filter(&records, "   ").len(), 2);
    }

    #[test]
    fn test_compare_numeric_first() {
        assert_eq!(compare_values("9%", "10%"), Ordering::Less);
        assert_eq!(compare_values("-1", "abc"), Ordering::Less);
        assert_eq!(compare_values("abc", "2"), Ordering::Less);
    }

    #[test]
    fn test_compare_lexicographic_fallback_is_case_sensitive() {
        assert_eq!(compare_values("apple", "banana"), Ordering::Less);
        assert_eq!(compare_values("Zeta", "alpha"), Ordering::Less);
    }

    #[test]
    fn test_zero_and_text_are_indistinguishable_numerically() {
        // A real 0 and a non-numeric value both coerce to 0, so the raw
        // strings decide the order.
        assert_eq!(compare_values("0", "n/a"), Ordering::Less);
        assert_eq!(compare_values("n/a", "0"), Ordering::Greater);
        assert_eq!(compare_values("0", "0.0"), Ordering::Less);
    }

    #[test]
    fn test_sort_descending_keeps_ties_stable() {
        let mut records = vec![package("a", "50"), package("b", "70"), package("c", "50")];
        sort_records(&mut records, "Instruction Coverage (%)", SortDirection::Descending);
        assert_eq!(names(&records), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_sort_missing_field_treated_as_empty() {
        let mut records = vec![package("b", "1"), package("a", "1")];
        sort_records(&mut records, "Nonexistent", SortDirection::Ascending);
        assert_eq!(names(&records), vec!["b", "a"]);
    }

    #[test]
    fn test_filter_and_sort_pipeline() {
        let records = vec![
            package("com.app.web", "85"),
            package("com.app.core", "92"),
            package("com.lib.util", "95"),
            package("com.app.db", "20"),
        ];
        let query = Query {
            level: ReportLevel::Package,
            search: "app".to_string(),
            tab: TabCategory::Top,
            sort: Some(SortKey {
                field: "Instruction Coverage (%)".to_string(),
                direction: SortDirection::Descending,
            }),
        };
        let result = filter_and_sort(&records, &query, &TabThresholds::default());
        assert_eq!(names(&result), vec!["com.app.core", "com.app.web"]);
        assert_eq!(records.len(), 4, "input must be left untouched");
    }

    #[test]
    fn test_filter_without_sort_keeps_input_order() {
        let records = vec![package("b", "1"), package("a", "2")];
        let result = filter_and_sort(
            &records,
            &Query::new(ReportLevel::Package),
            &TabThresholds::default(),
        );
        assert_eq!(names(&result), vec!["b", "a"]);
    }

    #[test]
    fn test_tab_category_parse() {
        assert_eq!("TOP".parse::<TabCategory>().unwrap(), TabCategory::Top);
        assert_eq!(" attention ".parse::<TabCategory>().unwrap(), TabCategory::Attention);
        assert!("best".parse::<TabCategory>().is_err());
    }
}
