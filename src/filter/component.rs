//! Filtering and sorting of the component list.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::payload::{Component, PackageKey};

/// Sort order for the component list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    #[default]
    NameAsc,
    NameDesc,
    UsageAsc,
    UsageDesc,
}

impl SortOption {
    /// Every option, in picker order.
    pub const ALL: [SortOption; 4] = [
        SortOption::NameAsc,
        SortOption::NameDesc,
        SortOption::UsageAsc,
        SortOption::UsageDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::NameAsc => "name-asc",
            SortOption::NameDesc => "name-desc",
            SortOption::UsageAsc => "usage-asc",
            SortOption::UsageDesc => "usage-desc",
        }
    }

    /// Human readable label for pickers.
    pub fn label(&self) -> &'static str {
        match self {
            SortOption::NameAsc => "Name (asc)",
            SortOption::NameDesc => "Name (desc)",
            SortOption::UsageAsc => "Usage (asc)",
            SortOption::UsageDesc => "Usage (desc)",
        }
    }
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name-asc" => Ok(SortOption::NameAsc),
            "name-desc" => Ok(SortOption::NameDesc),
            "usage-asc" => Ok(SortOption::UsageAsc),
            "usage-desc" => Ok(SortOption::UsageDesc),
            _ => Err(format!(
                "Unknown sort option: '{}'. Valid options: name-asc, name-desc, usage-asc, usage-desc",
                s
            )),
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter state of the component list view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentFilterState {
    /// Case-insensitive substring matched against component names.
    pub name_query: String,
    /// Packages whose components are hidden.
    pub excluded_packages: BTreeSet<PackageKey>,
    pub sort_by: SortOption,
}

/// Keeps components whose name contains the query and whose package is not excluded.
pub fn filter_components<'a>(
    components: &'a [Component],
    state: &ComponentFilterState,
) -> Vec<&'a Component> {
    let query = state.name_query.to_lowercase();

    components
        .iter()
        .filter(|c| query.is_empty() || c.name.to_lowercase().contains(&query))
        .filter(|c| !state.excluded_packages.contains(&c.package.key))
        .collect()
}

/// Returns a sorted copy of the list. The input is left untouched and
/// equal elements keep their relative order.
pub fn sort_components<'a>(components: &[&'a Component], sort_by: SortOption) -> Vec<&'a Component> {
    let mut sorted = components.to_vec();

    match sort_by {
        SortOption::NameAsc => sorted.sort_by(|a, b| a.name.cmp(&b.name)),
        SortOption::NameDesc => sorted.sort_by(|a, b| b.name.cmp(&a.name)),
        SortOption::UsageAsc => sorted.sort_by_key(|c| c.instance_count()),
        SortOption::UsageDesc => {
            sorted.sort_by(|a, b| b.instance_count().cmp(&a.instance_count()))
        }
    }

    sorted
}

/// Sorts by a raw option string; unrecognized options keep the input order.
pub fn sort_components_by<'a>(components: &[&'a Component], sort_by: &str) -> Vec<&'a Component> {
    match sort_by.parse::<SortOption>() {
        Ok(option) => sort_components(components, option),
        Err(_) => components.to_vec(),
    }
}
