//! Filter state of a component's detail view.
//!
//! The store is built once per component. It analyzes the full instance
//! list up front, starts with every package selected and every value of
//! every prop key checked, and recomputes the filtered views lazily when
//! the filter state actually changes.

use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use tracing::debug;

use super::memo::{fingerprint, Memo};
use super::selection::{CheckboxGroup, CheckboxMode, ExclusionSet, Selection};
use crate::analysis::{analyze, analyze_filtered, FilteredPropCounts, PropAnalysis};
use crate::filter::{build_filter_predicate, instance_packages, PackageInfo, PropValueFilters};
use crate::schema::Instance;

/// Excluded package names and checked values per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceFilterState {
    pub excluded_packages: BTreeSet<String>,
    pub prop_value_filters: PropValueFilters,
}

/// Package and prop value filters over one component's usage sites.
#[derive(Debug)]
pub struct InstanceFilterStore<'a> {
    instances: &'a [Instance],
    props_analysis: Vec<PropAnalysis>,
    all_prop_values: BTreeMap<String, Vec<String>>,
    available_packages: Vec<PackageInfo>,
    packages: ExclusionSet<String>,
    prop_values: BTreeMap<String, CheckboxGroup<String>>,
    filtered: Memo<InstanceFilterState, Vec<usize>>,
    counts: Memo<InstanceFilterState, FilteredPropCounts>,
}

impl<'a> InstanceFilterStore<'a> {
    pub fn new(instances: &'a [Instance]) -> Self {
        let props_analysis = analyze(instances);
        let all_prop_values: BTreeMap<String, Vec<String>> = props_analysis
            .iter()
            .map(|prop| (prop.key.clone(), prop.value_names()))
            .collect();
        let available_packages = instance_packages(instances);
        let packages =
            ExclusionSet::new(available_packages.iter().map(|p| p.name.clone()).collect());

        debug!(
            "Instance filters over {} instances, {} prop keys, {} packages",
            instances.len(),
            props_analysis.len(),
            available_packages.len()
        );

        let mut store = Self {
            instances,
            props_analysis,
            all_prop_values,
            available_packages,
            packages,
            prop_values: BTreeMap::new(),
            filtered: Memo::new(),
            counts: Memo::new(),
        };
        store.prop_values = store.initial_prop_values();
        store
    }

    fn initial_prop_values(&self) -> BTreeMap<String, CheckboxGroup<String>> {
        self.all_prop_values
            .iter()
            .map(|(key, values)| (key.clone(), CheckboxGroup::new(values.clone())))
            .collect()
    }

    /// Unfiltered analysis of every prop key.
    pub fn props_analysis(&self) -> &[PropAnalysis] {
        &self.props_analysis
    }

    /// Packages of the usage sites by display name, most used first.
    pub fn available_packages(&self) -> &[PackageInfo] {
        &self.available_packages
    }

    pub fn instances(&self) -> &'a [Instance] {
        self.instances
    }

    // Packages

    pub fn is_package_selected(&self, name: &str) -> bool {
        !self.packages.excluded().contains(name)
    }

    pub fn toggle_package(&mut self, name: &str) {
        self.packages.toggle(&name.to_string());
    }

    pub fn select_only_package(&mut self, name: &str) {
        self.packages.select_only(&name.to_string());
    }

    pub fn select_all_packages(&mut self) {
        self.packages.select_all();
    }

    pub fn clear_package_filters(&mut self) {
        self.packages.clear();
    }

    pub fn activate_package_label(&mut self, name: &str) -> CheckboxMode {
        self.packages.activate_label(&name.to_string())
    }

    pub fn package_overlay_text(&self, name: &str) -> &'static str {
        self.packages.overlay_text(&name.to_string())
    }

    // Prop values

    /// True if some instance gives `key` this value, [`NO_VALUE`](crate::schema::NO_VALUE)
    /// included when some instance lacks the key.
    pub fn has_value(&self, key: &str, value: &str) -> bool {
        self.all_prop_values
            .get(key)
            .is_some_and(|values| values.iter().any(|v| v == value))
    }

    /// Values outside a known key's value set are dropped with a debug log.
    /// Unknown keys are left to [`group_mut`](Self::group_mut).
    fn keep_known_value(&self, key: &str, value: &str) -> bool {
        if !self.all_prop_values.contains_key(key) || self.has_value(key, value) {
            return true;
        }
        debug!("Dropping value {} that prop {} never takes", value, key);
        false
    }

    /// False for keys the component never uses.
    pub fn is_value_checked(&self, key: &str, value: &str) -> bool {
        self.prop_values
            .get(key)
            .is_some_and(|group| group.is_checked(&value.to_string()))
    }

    /// Ignores values the key never takes.
    pub fn toggle_value(&mut self, key: &str, value: &str) {
        if !self.keep_known_value(key, value) {
            return;
        }
        if let Some(group) = self.group_mut(key) {
            group.toggle(&value.to_string());
        }
    }

    /// Narrowing to a value the key never takes checks nothing, so no
    /// instance passes.
    pub fn select_only_value(&mut self, key: &str, value: &str) {
        self.select_only_values(key, [value]);
    }

    /// Checks exactly the given values of `key`, dropping unknown ones.
    pub fn select_only_values<I, S>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values
            .into_iter()
            .map(Into::into)
            .filter(|value| self.keep_known_value(key, value))
            .collect();
        if let Some(group) = self.group_mut(key) {
            group.select_only_many(values);
        }
    }

    pub fn select_all_values(&mut self, key: &str) {
        if let Some(group) = self.group_mut(key) {
            group.select_all();
        }
    }

    /// Same as [`select_all_values`](Self::select_all_values).
    pub fn clear_prop_filter(&mut self, key: &str) {
        self.select_all_values(key);
    }

    /// Label click on a value row. Returns `None` for unknown keys and
    /// for values the key never takes.
    pub fn activate_value_label(&mut self, key: &str, value: &str) -> Option<CheckboxMode> {
        if !self.keep_known_value(key, value) {
            return None;
        }
        self.group_mut(key)
            .map(|group| group.activate_label(&value.to_string()))
    }

    pub fn value_overlay_text(&self, key: &str, value: &str) -> &'static str {
        self.prop_values
            .get(key)
            .map_or(CheckboxMode::Only.label(), |group| {
                group.overlay_text(&value.to_string())
            })
    }

    /// True if exactly the search results are checked.
    pub fn is_filtering_by_search_results(&self, key: &str, results: &[String]) -> bool {
        let Some(group) = self.prop_values.get(key) else {
            return false;
        };
        let results: BTreeSet<&String> = results.iter().collect();
        !results.is_empty()
            && group.checked_count() == results.len()
            && results.iter().all(|value| group.is_checked(value))
    }

    /// Narrows the key to the search results, or restores every value if
    /// it is already narrowed to them. Returns the action taken.
    pub fn select_search_results(&mut self, key: &str, results: &[String]) -> Option<CheckboxMode> {
        if !self.prop_values.contains_key(key) || results.is_empty() {
            return None;
        }

        if self.is_filtering_by_search_results(key, results) {
            self.select_all_values(key);
            Some(CheckboxMode::All)
        } else {
            self.select_only_values(key, results.iter().cloned());
            Some(CheckboxMode::Only)
        }
    }

    fn group_mut(&mut self, key: &str) -> Option<&mut CheckboxGroup<String>> {
        let group = self.prop_values.get_mut(key);
        if group.is_none() {
            debug!("Ignoring filter change for unknown prop key {}", key);
        }
        group
    }

    // Queries

    /// True if some values of `key` are unchecked.
    pub fn is_prop_filtered(&self, key: &str) -> bool {
        self.prop_values
            .get(key)
            .is_some_and(|group| group.is_filtered())
    }

    pub fn checked_count(&self, key: &str) -> usize {
        self.prop_values
            .get(key)
            .map_or(0, |group| group.checked_count())
    }

    pub fn all_values_count(&self, key: &str) -> usize {
        self.all_prop_values.get(key).map_or(0, Vec::len)
    }

    /// Count of `value` for `key` among the filtered instances.
    pub fn filtered_count(&self, key: &str, value: &str) -> usize {
        self.filtered_prop_counts().count(key, value)
    }

    pub fn has_active_filters(&self) -> bool {
        self.packages.has_exclusions()
            || self.prop_values.values().any(|group| group.is_filtered())
    }

    /// Restores the initial state.
    pub fn clear_all_filters(&mut self) {
        self.packages.clear();
        self.prop_values = self.initial_prop_values();
    }

    pub fn state(&self) -> InstanceFilterState {
        InstanceFilterState {
            excluded_packages: self.packages.excluded().clone(),
            prop_value_filters: self
                .prop_values
                .iter()
                .map(|(key, group)| (key.clone(), group.checked().clone()))
                .collect(),
        }
    }

    /// Hash of the filter state. Equal states hash equally however they
    /// were reached.
    pub fn fingerprint(&self) -> u64 {
        fingerprint(&self.state())
    }

    fn filtered_indices(&self) -> Rc<Vec<usize>> {
        let state = self.state();
        self.filtered.get_or_compute(state.clone(), || {
            let predicate = build_filter_predicate(
                &state.excluded_packages,
                &state.prop_value_filters,
                &self.all_prop_values,
            );
            let indices: Vec<usize> = self
                .instances
                .iter()
                .enumerate()
                .filter(|(_, instance)| predicate(*instance))
                .map(|(i, _)| i)
                .collect();
            debug!(
                "{} of {} instances pass filters",
                indices.len(),
                self.instances.len()
            );
            indices
        })
    }

    /// Usage sites passing every active filter, in input order.
    pub fn filtered_instances(&self) -> Vec<&'a Instance> {
        let instances = self.instances;
        self.filtered_indices()
            .iter()
            .map(|&i| &instances[i])
            .collect()
    }

    /// Value counts over the filtered instances.
    pub fn filtered_prop_counts(&self) -> Rc<FilteredPropCounts> {
        self.counts.get_or_compute(self.state(), || {
            analyze_filtered(self.instances, &self.filtered_instances())
        })
    }

    /// How many times each derived view has been computed.
    pub fn computations(&self) -> (usize, usize) {
        (self.filtered.computations(), self.counts.computations())
    }
}
