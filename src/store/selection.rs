//! Checkbox selections and the "toggle / only / all" interaction model.
//!
//! Every checkbox row has two zones. The checkbox itself always toggles.
//! The label performs a derived action: if the row is the only checked
//! item of its group, it restores the whole group ("All"); otherwise it
//! narrows the group to just this row ("Only").

use std::collections::BTreeSet;

use serde::Serialize;

/// The part of a checkbox row under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverZone {
    Checkbox,
    Label,
}

/// What activating a zone of a checkbox row will do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckboxMode {
    Toggle,
    Only,
    All,
}

impl CheckboxMode {
    /// Hint text shown next to the hovered row.
    pub fn label(&self) -> &'static str {
        match self {
            CheckboxMode::Toggle => "Toggle",
            CheckboxMode::Only => "Only",
            CheckboxMode::All => "All",
        }
    }
}

/// Action taken when a row's label is activated.
pub fn label_action(checked: bool, checked_count: usize) -> CheckboxMode {
    if checked && checked_count == 1 {
        CheckboxMode::All
    } else {
        CheckboxMode::Only
    }
}

/// Action for the given zone of a row.
pub fn hover_mode(zone: HoverZone, checked: bool, checked_count: usize) -> CheckboxMode {
    match zone {
        HoverZone::Checkbox => CheckboxMode::Toggle,
        HoverZone::Label => label_action(checked, checked_count),
    }
}

/// A group of checkable items driven by the tri-state model.
pub trait Selection<T> {
    fn is_checked(&self, item: &T) -> bool;

    /// Number of checked items.
    fn checked_count(&self) -> usize;

    /// Number of items in the group.
    fn total_count(&self) -> usize;

    /// Flips exactly one item.
    fn toggle(&mut self, item: &T);

    /// Checks exactly `item` and nothing else.
    fn select_only(&mut self, item: &T);

    /// Checks every item of the group.
    fn select_all(&mut self);

    /// True unless every item is checked.
    fn is_filtered(&self) -> bool {
        self.checked_count() != self.total_count()
    }

    /// What activating `item`'s label would do right now.
    fn label_mode(&self, item: &T) -> CheckboxMode {
        label_action(self.is_checked(item), self.checked_count())
    }

    /// Applies the label action for `item` and returns it.
    fn activate_label(&mut self, item: &T) -> CheckboxMode {
        let mode = self.label_mode(item);
        match mode {
            CheckboxMode::All => self.select_all(),
            _ => self.select_only(item),
        }
        mode
    }

    /// Hint text for the label zone of `item`.
    fn overlay_text(&self, item: &T) -> &'static str {
        self.label_mode(item).label()
    }
}

/// A group stored as its checked items.
///
/// Items outside the group are never checked, so the checked set is always
/// a subset of the items and its size alone tells whether the group filters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CheckboxGroup<T: Ord + Clone> {
    items: Vec<T>,
    checked: BTreeSet<T>,
}

impl<T: Ord + Clone> CheckboxGroup<T> {
    /// Creates a group with every item checked.
    pub fn new(items: Vec<T>) -> Self {
        let checked = items.iter().cloned().collect();
        Self { items, checked }
    }

    /// Creates a group with only `checked` checked.
    pub fn with_checked(items: Vec<T>, checked: impl IntoIterator<Item = T>) -> Self {
        let mut group = Self {
            items,
            checked: BTreeSet::new(),
        };
        group.select_only_many(checked);
        group
    }

    /// Items in display order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn checked(&self) -> &BTreeSet<T> {
        &self.checked
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    /// Replaces the checked set with the members of `items` in this group.
    pub fn select_only_many(&mut self, items: impl IntoIterator<Item = T>) {
        self.checked = items.into_iter().filter(|item| self.contains(item)).collect();
    }
}

impl<T: Ord + Clone> Selection<T> for CheckboxGroup<T> {
    fn is_checked(&self, item: &T) -> bool {
        self.checked.contains(item)
    }

    fn checked_count(&self) -> usize {
        self.checked.len()
    }

    fn total_count(&self) -> usize {
        self.items.len()
    }

    fn toggle(&mut self, item: &T) {
        if !self.checked.remove(item) && self.contains(item) {
            self.checked.insert(item.clone());
        }
    }

    /// Checks nothing when `item` is not in the group.
    fn select_only(&mut self, item: &T) {
        self.checked.clear();
        if self.contains(item) {
            self.checked.insert(item.clone());
        }
    }

    fn select_all(&mut self) {
        self.checked = self.items.iter().cloned().collect();
    }
}

/// A group stored as its unchecked items, as package filters are.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExclusionSet<T: Ord + Clone> {
    items: Vec<T>,
    excluded: BTreeSet<T>,
}

impl<T: Ord + Clone> ExclusionSet<T> {
    /// Creates a group with nothing excluded.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            excluded: BTreeSet::new(),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn excluded(&self) -> &BTreeSet<T> {
        &self.excluded
    }

    /// True if anything is excluded.
    pub fn has_exclusions(&self) -> bool {
        !self.excluded.is_empty()
    }

    /// Removes every exclusion.
    pub fn clear(&mut self) {
        self.excluded.clear();
    }
}

impl<T: Ord + Clone> Selection<T> for ExclusionSet<T> {
    fn is_checked(&self, item: &T) -> bool {
        !self.excluded.contains(item)
    }

    fn checked_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| !self.excluded.contains(item))
            .count()
    }

    fn total_count(&self) -> usize {
        self.items.len()
    }

    fn toggle(&mut self, item: &T) {
        if !self.excluded.remove(item) && self.items.contains(item) {
            self.excluded.insert(item.clone());
        }
    }

    fn select_only(&mut self, item: &T) {
        self.excluded = self.items.iter().filter(|i| *i != item).cloned().collect();
    }

    fn select_all(&mut self) {
        self.excluded.clear();
    }
}
