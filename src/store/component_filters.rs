//! Filter state of the component list view.

use tracing::debug;

use super::selection::{CheckboxMode, ExclusionSet, Selection};
use crate::config::ExplorerConfig;
use crate::filter::{filter_components, sort_components, ComponentFilterState, SortOption};
use crate::payload::{Component, PackageKey};

/// Name search, package exclusions and sort order of the landing list.
#[derive(Debug, Clone)]
pub struct ComponentFilterStore {
    name_query: String,
    sort_by: SortOption,
    default_sort: SortOption,
    packages: ExclusionSet<PackageKey>,
}

impl ComponentFilterStore {
    /// Creates a store over the given package keys with nothing filtered.
    pub fn new(package_keys: Vec<PackageKey>, config: &ExplorerConfig) -> Self {
        Self {
            name_query: String::new(),
            sort_by: config.default_sort,
            default_sort: config.default_sort,
            packages: ExclusionSet::new(package_keys),
        }
    }

    /// Snapshot of the current filter state.
    pub fn filters(&self) -> ComponentFilterState {
        ComponentFilterState {
            name_query: self.name_query.clone(),
            excluded_packages: self.packages.excluded().clone(),
            sort_by: self.sort_by,
        }
    }

    pub fn name_query(&self) -> &str {
        &self.name_query
    }

    pub fn sort_by(&self) -> SortOption {
        self.sort_by
    }

    pub fn package_keys(&self) -> &[PackageKey] {
        self.packages.items()
    }

    pub fn is_package_selected(&self, key: &PackageKey) -> bool {
        self.packages.is_checked(key)
    }

    pub fn toggle_package(&mut self, key: &PackageKey) {
        self.packages.toggle(key);
        debug!("Toggled package {}", key);
    }

    pub fn select_only_package(&mut self, key: &PackageKey) {
        self.packages.select_only(key);
    }

    pub fn select_all_packages(&mut self) {
        self.packages.select_all();
    }

    /// Label click on a package row: narrows to it, or restores all if it
    /// was the only one left.
    pub fn activate_package_label(&mut self, key: &PackageKey) -> CheckboxMode {
        self.packages.activate_label(key)
    }

    /// Overlay hint for a package row's label.
    pub fn package_overlay_text(&self, key: &PackageKey) -> &'static str {
        self.packages.overlay_text(key)
    }

    pub fn set_name_query(&mut self, query: impl Into<String>) {
        self.name_query = query.into();
    }

    pub fn set_sort_by(&mut self, sort_by: SortOption) {
        self.sort_by = sort_by;
    }

    /// True if the name query or any package exclusion narrows the list.
    /// Sort order alone does not count.
    pub fn has_active_filters(&self) -> bool {
        !self.name_query.is_empty() || self.packages.has_exclusions()
    }

    /// Resets query, exclusions and sort order.
    pub fn clear_all_filters(&mut self) {
        self.name_query.clear();
        self.packages.clear();
        self.sort_by = self.default_sort;
    }

    /// Filters then sorts `components`.
    pub fn visible_components<'a>(&self, components: &'a [Component]) -> Vec<&'a Component> {
        let state = self.filters();
        let filtered = filter_components(components, &state);
        let visible = sort_components(&filtered, state.sort_by);
        debug!(
            "{} of {} components visible",
            visible.len(),
            components.len()
        );
        visible
    }
}
