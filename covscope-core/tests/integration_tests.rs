//! Integration tests for covscope over the workspace report fixtures

use covscope_core::aggregate::CoverageStatus;
use covscope_core::navigation::Crumb;
use covscope_core::{
    open, render_json, render_summary_text, render_text, ReportLevel, ReportView, SortDirection,
    TabCategory,
};
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn open_fixture(name: &str) -> ReportView {
    open(&fixture_path(name), None).unwrap()
}

fn packages(view: &ReportView) -> Vec<String> {
    view.render()
        .rows
        .iter()
        .map(|r| r.value("Package").to_string())
        .collect()
}

#[test]
fn test_open_reports() {
    let view = open_fixture("reports");
    let model = view.render();

    assert_eq!(model.level, ReportLevel::Package);
    assert_eq!(model.tab, TabCategory::All);
    assert_eq!(model.rows.len(), 5);
    assert_eq!(model.summary.packages, 5);
    assert_eq!(model.summary.classes, 7);
    assert_eq!(model.summary.critical_packages, 1);
    assert_eq!(model.summary.total_coverage, 50.4);
    assert_eq!(model.coverage.remaining, 100.0 - 50.4);
}

#[test]
fn test_package_stats_from_instruction_columns() {
    let model = open_fixture("reports").render();
    assert_eq!(model.stats.covered, 2520.0);
    assert_eq!(model.stats.missed, 2480.0);
    assert_eq!(model.stats.total_coverage_percentage, 50.4);
}

#[test]
fn test_status_counts_in_severity_order() {
    let model = open_fixture("reports").render();
    let statuses: Vec<CoverageStatus> = model.status_counts.iter().map(|c| c.status).collect();
    assert_eq!(statuses, CoverageStatus::ALL.to_vec());
    assert!(model.status_counts.iter().all(|c| c.count == 1));
}

#[test]
fn test_tabs() {
    let mut view = open_fixture("reports");

    view.set_tab(TabCategory::Top);
    assert_eq!(packages(&view), vec!["com.example.api"]);

    view.set_tab(TabCategory::Attention);
    assert_eq!(packages(&view), vec!["com.example.db", "com.example.util"]);

    view.set_tab(TabCategory::All);
    assert_eq!(packages(&view).len(), 5);
}

#[test]
fn test_drill_down_to_methods() {
    let mut view = open_fixture("reports");

    view.select_package("com.example.db");
    let model = view.render();
    assert_eq!(model.level, ReportLevel::Class);
    assert_eq!(model.rows.len(), 1);
    assert_eq!(model.rows[0].value("Class"), "Repository");
    assert_eq!(
        model.alert.as_deref(),
        Some("Poor coverage! Consider adding more tests.")
    );
    assert_eq!(model.stats.total_coverage_percentage, 30.0);

    view.select_class("Repository");
    let model = view.render();
    assert_eq!(model.level, ReportLevel::Method);
    let methods: Vec<&str> = model.rows.iter().map(|r| r.value("Method")).collect();
    assert_eq!(methods, vec!["save", "load"]);
    assert_eq!(
        model.breadcrumb,
        vec![
            Crumb::Home,
            Crumb::Package("com.example.db".to_string()),
            Crumb::Class("Repository".to_string()),
        ]
    );
    assert_eq!(model.stats.covered, 300.0);
    assert_eq!(model.stats.missed, 700.0);

    view.go_home();
    assert_eq!(view.render().level, ReportLevel::Package);
}

#[test]
fn test_unknown_package_is_empty_not_an_error() {
    let mut view = open_fixture("reports");
    view.select_package("com.example.missing");
    let model = view.render();
    assert_eq!(model.level, ReportLevel::Class);
    assert!(model.rows.is_empty());
    assert_eq!(model.stats.total_coverage_percentage, 0.0);
    assert!(render_text(&model).ends_with("No data to display\n"));
}

#[test]
fn test_numeric_sort_toggles() {
    let mut view = open_fixture("reports");

    assert_eq!(
        view.click_sort("Instruction Coverage (%)"),
        SortDirection::Ascending
    );
    assert_eq!(
        packages(&view),
        vec![
            "com.example.util",
            "com.example.db",
            "com.example.web",
            "com.example.core",
            "com.example.api",
        ]
    );

    assert_eq!(
        view.click_sort("Instruction Coverage (%)"),
        SortDirection::Descending
    );
    assert_eq!(packages(&view)[0], "com.example.api");
}

#[test]
fn test_text_sort_on_names() {
    let mut view = open_fixture("reports");
    view.click_sort("Status");
    let model = view.render();
    let statuses: Vec<&str> = model.rows.iter().map(|r| r.value("Status")).collect();
    assert_eq!(statuses, vec!["Critical", "Excellent", "Fair", "Good", "Poor"]);
}

#[test]
fn test_search_matches_any_column() {
    let mut view = open_fixture("reports");

    view.set_search("CORE");
    assert_eq!(packages(&view), vec!["com.example.core"]);

    view.set_search("critical");
    assert_eq!(packages(&view), vec!["com.example.util"]);

    view.set_search("");
    assert_eq!(packages(&view).len(), 5);
}

#[test]
fn test_config_file_renames_reports_and_sets_tab() {
    let view = open_fixture("custom-reports");
    let model = view.render();
    assert_eq!(model.tab, TabCategory::Top);
    let names: Vec<&str> = model.rows.iter().map(|r| r.value("Package")).collect();
    assert_eq!(names, vec!["alpha", "gamma"]);
    assert_eq!(model.summary.total_coverage, 55.0);
}

#[test]
fn test_config_thresholds_drive_attention_tab() {
    let mut view = open_fixture("custom-reports");
    view.set_tab(TabCategory::Attention);
    assert_eq!(packages(&view), vec!["beta"]);
}

#[test]
fn test_missing_report_directory_fails() {
    let result = open(&fixture_path("does-not-exist"), None);
    assert!(result.is_err());
}

#[test]
fn test_output_is_deterministic() {
    let render = || {
        let mut view = open_fixture("reports");
        view.select_package("com.example.api");
        view.click_sort("Instructions Covered");
        render_json(&view.render())
    };
    assert_eq!(render(), render());
}

#[test]
fn test_text_rendering() {
    let mut view = open_fixture("reports");
    view.select_package("com.example.util");
    let text = render_text(&view.render());
    assert!(text.starts_with("Home > com.example.util\n"));
    assert!(text.contains("! Critical coverage! Add unit tests immediately."));
    assert!(text.contains("Strings"));

    let summary = render_summary_text(&view.render());
    assert!(summary.contains("Packages: 5  Classes: 7  Critical: 1  Total Coverage: 50.40%"));
}
