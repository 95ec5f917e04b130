//! Boolean predicates and their combinators.
//!
//! Predicates are boxed closures so that filter state can be compiled into
//! a single value and applied to every instance without re-inspecting the
//! state on each call.

use std::collections::BTreeSet;

use crate::schema::Instance;

/// A boolean test over a borrowed item.
pub type Predicate<T> = Box<dyn Fn(&T) -> bool>;

/// True iff every predicate is true. An empty list is always true.
///
/// Evaluation stops at the first false predicate.
pub fn and<T: 'static>(predicates: Vec<Predicate<T>>) -> Predicate<T> {
    if predicates.is_empty() {
        return always();
    }
    Box::new(move |item: &T| predicates.iter().all(|p| p(item)))
}

/// True iff any predicate is true. An empty list is always false.
///
/// Evaluation stops at the first true predicate.
pub fn or<T: 'static>(predicates: Vec<Predicate<T>>) -> Predicate<T> {
    if predicates.is_empty() {
        return never();
    }
    Box::new(move |item: &T| predicates.iter().any(|p| p(item)))
}

/// Negates a predicate.
pub fn not<T: 'static>(predicate: Predicate<T>) -> Predicate<T> {
    Box::new(move |item: &T| !predicate(item))
}

/// The predicate that accepts everything.
pub fn always<T: 'static>() -> Predicate<T> {
    Box::new(|_: &T| true)
}

/// The predicate that rejects everything.
pub fn never<T: 'static>() -> Predicate<T> {
    Box::new(|_: &T| false)
}

/// Instance belongs to the package with this display name.
pub fn has_package(package_name: impl Into<String>) -> Predicate<Instance> {
    let package_name = package_name.into();
    Box::new(move |instance: &Instance| instance.package.display_name() == package_name)
}

/// Instance does not belong to any of the given display names.
///
/// Native usage sites are matched under `"(no package)"`.
pub fn package_not_in(excluded: BTreeSet<String>) -> Predicate<Instance> {
    Box::new(move |instance: &Instance| !excluded.contains(instance.package.display_name()))
}

/// Instance carries at least one prop with this key.
pub fn has_prop(key: impl Into<String>) -> Predicate<Instance> {
    let key = key.into();
    Box::new(move |instance: &Instance| instance.has_prop(&key))
}

/// Instance carries no prop with this key.
pub fn prop_missing(key: impl Into<String>) -> Predicate<Instance> {
    not(has_prop(key))
}

/// Some prop with this key has exactly this raw source text.
pub fn prop_equals(key: impl Into<String>, value: impl Into<String>) -> Predicate<Instance> {
    let key = key.into();
    let value = value.into();
    Box::new(move |instance: &Instance| {
        instance
            .props
            .iter()
            .any(|p| p.key == key && p.raw == value)
    })
}

/// The first prop with this key contains `needle`, ignoring case.
pub fn prop_contains(key: impl Into<String>, needle: impl Into<String>) -> Predicate<Instance> {
    let key = key.into();
    let needle = needle.into().to_lowercase();
    Box::new(move |instance: &Instance| {
        instance
            .prop(&key)
            .is_some_and(|p| p.raw.to_lowercase().contains(&needle))
    })
}

/// The instance's file path contains `pattern` (case-sensitive).
pub fn file_path_contains(pattern: impl Into<String>) -> Predicate<Instance> {
    let pattern = pattern.into();
    Box::new(move |instance: &Instance| instance.file_path.contains(&pattern))
}
