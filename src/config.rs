//! Explorer configuration.

use std::time::Duration;

use crate::filter::SortOption;

/// Quiet window before a prop value search is applied.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Tunables for the filter stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerConfig {
    /// Debounce delay for prop value search boxes.
    pub search_debounce: Duration,
    /// Sort order a fresh component list starts with.
    pub default_sort: SortOption,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            search_debounce: SEARCH_DEBOUNCE,
            default_sort: SortOption::NameAsc,
        }
    }
}

impl ExplorerConfig {
    pub fn with_default_sort(mut self, sort: SortOption) -> Self {
        self.default_sort = sort;
        self
    }
}
