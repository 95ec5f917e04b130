//! Filtering of a component's usage sites.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use super::predicates::{self, Predicate};
use crate::schema::{Instance, NO_VALUE};

/// Checked values per prop key.
pub type PropValueFilters = BTreeMap<String, BTreeSet<String>>;

/// Usage count for one display package name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageInfo {
    pub name: String,
    pub count: usize,
}

/// Occurrence count for one prop key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropKeyInfo {
    pub key: String,
    pub count: usize,
}

/// Compiles instance filter state into a single predicate.
///
/// The result is the conjunction of:
/// - a package exclusion test, if any package is excluded;
/// - for each prop key with fewer checked values than its full value set,
///   a disjunction over the checked values. [`NO_VALUE`] matches instances
///   that lack the key.
///
/// A fully checked key adds nothing, so "everything checked" and "no
/// filter" are the same predicate. With no clauses the result accepts
/// every instance.
pub fn build_filter_predicate(
    excluded_packages: &BTreeSet<String>,
    prop_value_filters: &PropValueFilters,
    all_prop_values: &BTreeMap<String, Vec<String>>,
) -> Predicate<Instance> {
    let mut clauses: Vec<Predicate<Instance>> = Vec::new();

    if !excluded_packages.is_empty() {
        clauses.push(predicates::package_not_in(excluded_packages.clone()));
    }

    for (key, checked) in prop_value_filters {
        let universe = all_prop_values.get(key).map_or(0, Vec::len);
        if checked.len() >= universe {
            continue;
        }

        let alternatives = checked
            .iter()
            .map(|value| {
                if value == NO_VALUE {
                    predicates::prop_missing(key.as_str())
                } else {
                    predicates::prop_equals(key.as_str(), value.as_str())
                }
            })
            .collect();
        clauses.push(predicates::or(alternatives));
    }

    predicates::and(clauses)
}

/// Counts instances per display package name, most used first.
pub fn instance_packages(instances: &[Instance]) -> Vec<PackageInfo> {
    let mut rows: Vec<PackageInfo> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for instance in instances {
        let name = instance.package.display_name();
        match index.get(name) {
            Some(&i) => rows[i].count += 1,
            None => {
                index.insert(name, rows.len());
                rows.push(PackageInfo {
                    name: name.to_string(),
                    count: 1,
                });
            }
        }
    }

    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

/// Counts prop occurrences per key, most used first.
pub fn instance_prop_keys(instances: &[Instance]) -> Vec<PropKeyInfo> {
    let mut rows: Vec<PropKeyInfo> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for prop in instances.iter().flat_map(|i| &i.props) {
        match index.get(prop.key.as_str()) {
            Some(&i) => rows[i].count += 1,
            None => {
                index.insert(prop.key.as_str(), rows.len());
                rows.push(PropKeyInfo {
                    key: prop.key.clone(),
                    count: 1,
                });
            }
        }
    }

    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{PackageIdentity, Prop, Span};

    fn instance(package: PackageIdentity, props: &[(&str, &str)]) -> Instance {
        Instance {
            file_path: "src/App.tsx".to_string(),
            raw: "<Button />".to_string(),
            span: Span::default(),
            import_specifier: None,
            resolved_path: "ui".to_string(),
            package,
            props: props
                .iter()
                .map(|(k, v)| Prop {
                    key: k.to_string(),
                    raw: v.to_string(),
                    prop_type: "string".to_string(),
                    value: None,
                })
                .collect(),
        }
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn sample() -> Vec<Instance> {
        vec![
            instance(PackageIdentity::external("ui", "1.0.0"), &[("variant", "outline")]),
            instance(PackageIdentity::external("ui", "1.0.0"), &[("variant", "solid")]),
            instance(PackageIdentity::Native, &[]),
        ]
    }

    fn universe() -> BTreeMap<String, Vec<String>> {
        let mut all = BTreeMap::new();
        all.insert(
            "variant".to_string(),
            vec!["outline".to_string(), "solid".to_string(), NO_VALUE.to_string()],
        );
        all
    }

    fn matching(instances: &[Instance], p: &Predicate<Instance>) -> usize {
        instances.iter().filter(|i| p(i)).count()
    }

    #[test]
    fn test_no_filters_accepts_everything() {
        let mut filters = PropValueFilters::new();
        filters.insert("variant".to_string(), set(&["outline", "solid", NO_VALUE]));

        let p = build_filter_predicate(&BTreeSet::new(), &filters, &universe());
        assert_eq!(matching(&sample(), &p), 3);
    }

    #[test]
    fn test_package_exclusion() {
        let p = build_filter_predicate(&set(&["(no package)"]), &PropValueFilters::new(), &universe());
        assert_eq!(matching(&sample(), &p), 2);
    }

    #[test]
    fn test_prop_value_filter() {
        let mut filters = PropValueFilters::new();
        filters.insert("variant".to_string(), set(&["solid"]));

        let p = build_filter_predicate(&BTreeSet::new(), &filters, &universe());
        let instances = sample();
        let kept: Vec<_> = instances.iter().filter(|i| p(i)).collect();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].props[0].raw, "solid");
    }

    #[test]
    fn test_no_value_sentinel_matches_missing_prop() {
        let mut filters = PropValueFilters::new();
        filters.insert("variant".to_string(), set(&[NO_VALUE]));

        let p = build_filter_predicate(&BTreeSet::new(), &filters, &universe());
        let instances = sample();
        let kept: Vec<_> = instances.iter().filter(|i| p(i)).collect();
        assert_eq!(kept.len(), 1);
        assert!(kept[0].props.is_empty());
    }

    #[test]
    fn test_nothing_checked_rejects_everything() {
        let mut filters = PropValueFilters::new();
        filters.insert("variant".to_string(), BTreeSet::new());

        let p = build_filter_predicate(&BTreeSet::new(), &filters, &universe());
        assert_eq!(matching(&sample(), &p), 0);
    }

    #[test]
    fn test_unknown_key_contributes_nothing() {
        let mut filters = PropValueFilters::new();
        filters.insert("size".to_string(), set(&["sm"]));

        let p = build_filter_predicate(&BTreeSet::new(), &filters, &universe());
        assert_eq!(matching(&sample(), &p), 3);
    }

    #[test]
    fn test_package_and_prop_filters_combine() {
        let mut filters = PropValueFilters::new();
        filters.insert("variant".to_string(), set(&["outline", NO_VALUE]));

        let p = build_filter_predicate(&set(&["(no package)"]), &filters, &universe());
        assert_eq!(matching(&sample(), &p), 1);
    }

    #[test]
    fn test_instance_packages() {
        let packages = instance_packages(&sample());
        assert_eq!(
            packages,
            vec![
                PackageInfo { name: "ui".to_string(), count: 2 },
                PackageInfo { name: "(no package)".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_instance_prop_keys() {
        let mut instances = sample();
        instances.push(instance(PackageIdentity::Native, &[("size", "sm")]));
        let keys = instance_prop_keys(&instances);
        assert_eq!(keys[0], PropKeyInfo { key: "variant".to_string(), count: 2 });
        assert_eq!(keys[1], PropKeyInfo { key: "size".to_string(), count: 1 });
    }
}
