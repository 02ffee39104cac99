//! View controller for one coverage browsing session
//!
//! Owns the loaded bundle together with navigation, sort and search state.
//! Every event handler runs to completion before the next one; nothing here
//! is shared across threads.
//!
//! The working copy holds the in-scope records in their current order. Sort
//! clicks reorder it in place; navigation replaces it with the new scope in
//! report order. The sort state itself survives navigation, so clicking the
//! same column after drilling down keeps toggling its direction.

use crate::aggregate::{
    self, compute_stats, record_status, CoverageBreakdown, CoverageStats, ReportSummary,
    StatusCount,
};
use crate::bundle::ReportBundle;
use crate::navigation::{Crumb, NavigationState};
use crate::query::{
    apply_search_filter, apply_tab_filter, sort_records, SortDirection, SortKey, SortState,
    TabCategory, TabThresholds,
};
use crate::record::{Record, ReportLevel};
use serde::Serialize;
use tracing::debug;

/// Everything the presentation layer needs to draw one screen
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ViewModel {
    pub level: ReportLevel,
    pub tab: TabCategory,
    pub search: String,
    pub breadcrumb: Vec<Crumb>,
    pub headers: Vec<String>,
    pub rows: Vec<Record>,
    pub sort: Option<SortKey>,
    pub stats: CoverageStats,
    pub status_counts: Vec<StatusCount>,
    pub summary: ReportSummary,
    pub coverage: CoverageBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
}

pub struct ReportView {
    bundle: ReportBundle,
    thresholds: TabThresholds,
    navigation: NavigationState,
    sort: SortState,
    search: String,
    working: Vec<Record>,
}

impl ReportView {
    pub fn new(bundle: ReportBundle, thresholds: TabThresholds) -> Self {
        Self::with_tab(bundle, thresholds, TabCategory::All)
    }

    pub fn with_tab(bundle: ReportBundle, thresholds: TabThresholds, tab: TabCategory) -> Self {
        let navigation = NavigationState::with_tab(tab);
        let working = navigation.scope(&bundle);
        Self {
            bundle,
            thresholds,
            navigation,
            sort: SortState::new(),
            search: String::new(),
            working,
        }
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    pub fn bundle(&self) -> &ReportBundle {
        &self.bundle
    }

    pub fn go_home(&mut self) {
        self.navigate(|nav| nav.go_home());
    }

    pub fn select_package(&mut self, name: &str) {
        self.navigate(|nav| nav.select_package(name));
    }

    /// Drill into a class of the selected package; ignored at home
    pub fn select_class(&mut self, name: &str) {
        if self.navigation.package().is_none() {
            debug!(class = name, "ignoring class selection outside a package");
            return;
        }
        self.navigate(|nav| nav.select_class(name));
    }

    pub fn set_tab(&mut self, tab: TabCategory) {
        self.navigate(|nav| nav.set_tab(tab));
    }

    pub fn set_search(&mut self, query: &str) {
        self.search = query.to_string();
    }

    /// Handle a click on a column header
    pub fn click_sort(&mut self, field: &str) -> SortDirection {
        let direction = self.sort.click(field);
        sort_records(&mut self.working, field, direction);
        debug!(field, direction = direction.as_str(), rows = self.working.len(), "sorted view");
        direction
    }

    fn navigate(&mut self, transition: impl FnOnce(NavigationState) -> NavigationState) {
        let current = std::mem::take(&mut self.navigation);
        self.navigation = transition(current);
        self.working = self.navigation.scope(&self.bundle);
    }

    /// Rows currently visible: tab filter then search over the working copy
    pub fn visible_rows(&self) -> Vec<Record> {
        let tabbed = apply_tab_filter(
            &self.working,
            self.navigation.level(),
            self.navigation.tab(),
            &self.thresholds,
        );
        apply_search_filter(&tabbed, &self.search)
    }

    fn selected_package_alert(&self) -> Option<String> {
        let package = self.navigation.package()?;
        let record = self.bundle.find_package(package)?;
        record_status(record)
            .and_then(|status| status.alert())
            .map(str::to_string)
    }

    pub fn render(&self) -> ViewModel {
        let rows = self.visible_rows();
        let headers = rows
            .first()
            .map(|r| r.field_names().map(str::to_string).collect())
            .unwrap_or_default();
        let summary = self.bundle.summary();

        ViewModel {
            level: self.navigation.level(),
            tab: self.navigation.tab(),
            search: self.search.clone(),
            breadcrumb: self.navigation.breadcrumb(),
            headers,
            stats: compute_stats(&rows),
            status_counts: aggregate::status_counts(self.bundle.packages().records()),
            coverage: CoverageBreakdown::from_percentage(summary.total_coverage),
            summary,
            sort: self.sort.key(),
            alert: self.selected_package_alert(),
            rows,
        }
    }
}
