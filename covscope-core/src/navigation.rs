//! Drill-down navigation state (home → package → class)
//!
//! Global invariants enforced:
//! - A class selection implies a package selection
//! - Transitions are pure: they consume a state and return the next one
//! - Invalid transitions are no-ops, never errors

use crate::bundle::ReportBundle;
use crate::query::TabCategory;
use crate::record::{Record, ReportLevel};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One breadcrumb segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum Crumb {
    Home,
    Package(String),
    Class(String),
}

impl Crumb {
    pub fn label(&self) -> &str {
        match self {
            Crumb::Home => "Home",
            Crumb::Package(name) | Crumb::Class(name) => name.as_str(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    package: Option<String>,
    class: Option<String>,
    tab: TabCategory,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tab(tab: TabCategory) -> Self {
        Self {
            tab,
            ..Self::default()
        }
    }

    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    pub fn tab(&self) -> TabCategory {
        self.tab
    }

    pub fn go_home(self) -> Self {
        debug!("navigate home");
        Self {
            package: None,
            class: None,
            tab: self.tab,
        }
    }

    pub fn select_package(self, name: &str) -> Self {
        debug!(package = name, "select package");
        Self {
            package: Some(name.to_string()),
            class: None,
            tab: self.tab,
        }
    }

    /// Select a class inside the current package; ignored at home
    pub fn select_class(self, name: &str) -> Self {
        if self.package.is_none() {
            debug!(class = name, "class selection ignored without a package");
            return self;
        }
        debug!(class = name, "select class");
        Self {
            class: Some(name.to_string()),
            ..self
        }
    }

    /// Switch tab; always lands on the home view
    pub fn set_tab(self, tab: TabCategory) -> Self {
        debug!(tab = tab.as_str(), "set tab");
        Self {
            package: None,
            class: None,
            tab,
        }
    }

    /// Hierarchy level of the table in scope
    pub fn level(&self) -> ReportLevel {
        match (&self.package, &self.class) {
            (Some(_), Some(_)) => ReportLevel::Method,
            (Some(_), None) => ReportLevel::Class,
            _ => ReportLevel::Package,
        }
    }

    pub fn breadcrumb(&self) -> Vec<Crumb> {
        let mut crumbs = vec![Crumb::Home];
        if let Some(ref package) = self.package {
            crumbs.push(Crumb::Package(package.clone()));
            if let Some(ref class) = self.class {
                crumbs.push(Crumb::Class(class.clone()));
            }
        }
        crumbs
    }

    /// Records in scope for the current selection
    pub fn scope(&self, bundle: &ReportBundle) -> Vec<Record> {
        match (&self.package, &self.class) {
            (Some(package), Some(class)) => bundle.methods_in_class(package, class),
            (Some(package), None) => bundle.classes_in_package(package),
            _ => bundle.packages().records().to_vec(),
        }
    }
}
