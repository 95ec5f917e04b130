//! Prop value distributions.
//!
//! For a set of usage sites, computes how often each prop key is set and
//! which raw values it takes. Every occurrence of a key counts toward its
//! value, so an instance that repeats a key contributes once per
//! occurrence. Instances lacking the key entirely are counted once under
//! [`NO_VALUE`].

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::schema::{Instance, NO_VALUE};

const PERCENTAGE_MULTIPLIER: f64 = 100.0;

/// How often one raw value appears for a prop key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropValueDistribution {
    pub value: String,
    pub count: usize,
    pub percentage: f64,
}

/// Value distribution of a single prop key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropAnalysis {
    pub key: String,
    /// Occurrences of the key plus instances that lack it.
    pub total_count: usize,
    /// Share of all analyzed instances that either set the key or lack it.
    /// Repeated keys never push it past 100.
    pub total_percentage: f64,
    /// Values by count, descending; the [`NO_VALUE`] entry, if any, is last.
    pub values: Vec<PropValueDistribution>,
    pub has_no_value: bool,
    pub no_value_count: usize,
}

impl PropAnalysis {
    /// Number of props carrying this key, repeats included.
    pub fn matched_count(&self) -> usize {
        self.total_count - self.no_value_count
    }

    /// Every distinct value, including [`NO_VALUE`] when some instance lacks the key.
    pub fn value_names(&self) -> Vec<String> {
        self.values.iter().map(|v| v.value.clone()).collect()
    }
}

/// `part / whole * 100`, or 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64) * PERCENTAGE_MULTIPLIER
}

/// Per-key value counts in first-seen order.
#[derive(Default)]
struct KeyTally {
    values: Vec<(String, usize)>,
    index: HashMap<String, usize>,
    /// Props carrying the key.
    occurrences: usize,
    /// Instances carrying the key at least once.
    present: usize,
}

impl KeyTally {
    fn add(&mut self, value: &str) {
        self.occurrences += 1;
        match self.index.get(value) {
            Some(&i) => self.values[i].1 += 1,
            None => {
                self.index.insert(value.to_string(), self.values.len());
                self.values.push((value.to_string(), 1));
            }
        }
    }
}

/// Tallies every occurrence of every key on every instance.
fn tally(instances: &[Instance]) -> Vec<(String, KeyTally)> {
    let mut keys: Vec<(String, KeyTally)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for instance in instances {
        let mut seen: HashSet<&str> = HashSet::new();
        for prop in &instance.props {
            let i = *index.entry(prop.key.clone()).or_insert_with(|| {
                keys.push((prop.key.clone(), KeyTally::default()));
                keys.len() - 1
            });
            let entry = &mut keys[i].1;
            entry.add(&prop.raw);
            if seen.insert(prop.key.as_str()) {
                entry.present += 1;
            }
        }
    }

    keys
}

fn build_analysis(key: String, tally: KeyTally, instance_count: usize) -> PropAnalysis {
    let matched = tally.occurrences;
    let no_value_count = instance_count - tally.present;

    let mut values: Vec<PropValueDistribution> = tally
        .values
        .into_iter()
        .map(|(value, count)| PropValueDistribution {
            value,
            count,
            percentage: percentage(count, matched),
        })
        .collect();
    values.sort_by(|a, b| b.count.cmp(&a.count));

    if no_value_count > 0 {
        values.push(PropValueDistribution {
            value: NO_VALUE.to_string(),
            count: no_value_count,
            percentage: percentage(no_value_count, matched + no_value_count),
        });
    }

    PropAnalysis {
        key,
        total_count: matched + no_value_count,
        total_percentage: percentage(tally.present + no_value_count, instance_count),
        values,
        has_no_value: no_value_count > 0,
        no_value_count,
    }
}

/// Computes the value distribution of every prop key seen on `instances`.
///
/// Keys are ordered by `total_count`, then by how many props carry
/// them, both descending; ties keep first-seen order.
pub fn analyze(instances: &[Instance]) -> Vec<PropAnalysis> {
    let mut analysis: Vec<PropAnalysis> = tally(instances)
        .into_iter()
        .map(|(key, t)| build_analysis(key, t, instances.len()))
        .collect();

    analysis.sort_by(|a, b| {
        b.total_count
            .cmp(&a.total_count)
            .then_with(|| b.matched_count().cmp(&a.matched_count()))
    });
    analysis
}

/// Value counts restricted to a filtered subset.
///
/// Holds an entry for every key and value known from the unfiltered set,
/// so lookups never disappear when the subset shrinks to nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredPropCounts {
    keys: Vec<String>,
    counts: HashMap<String, HashMap<String, usize>>,
}

impl FilteredPropCounts {
    /// Count of `value` for `key` within the subset; 0 when unknown.
    pub fn count(&self, key: &str, value: &str) -> usize {
        self.counts
            .get(key)
            .and_then(|values| values.get(value))
            .copied()
            .unwrap_or(0)
    }

    /// All value counts for `key`.
    pub fn values(&self, key: &str) -> Option<&HashMap<String, usize>> {
        self.counts.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.counts.contains_key(key)
    }

    /// Keys in first-seen order of the unfiltered set.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Recounts prop values over `filtered`, keeping every key of `all`.
///
/// Every occurrence of a key on a filtered instance is counted, and
/// instances that lack a key are counted once under [`NO_VALUE`].
pub fn analyze_filtered(all: &[Instance], filtered: &[&Instance]) -> FilteredPropCounts {
    let mut result = FilteredPropCounts::default();

    for (key, t) in tally(all) {
        let mut values: HashMap<String, usize> =
            t.values.into_iter().map(|(value, _)| (value, 0)).collect();
        if t.present < all.len() {
            values.insert(NO_VALUE.to_string(), 0);
        }
        result.keys.push(key.clone());
        result.counts.insert(key, values);
    }

    for instance in filtered {
        let mut seen: HashSet<&str> = HashSet::new();
        for prop in &instance.props {
            if let Some(values) = result.counts.get_mut(&prop.key) {
                *values.entry(prop.raw.clone()).or_insert(0) += 1;
                seen.insert(prop.key.as_str());
            }
        }
        for key in &result.keys {
            if seen.contains(key.as_str()) {
                continue;
            }
            if let Some(values) = result.counts.get_mut(key) {
                *values.entry(NO_VALUE.to_string()).or_insert(0) += 1;
            }
        }
    }

    result
}

/// Values of `analysis` whose text contains `query`, ignoring case and
/// surrounding whitespace. An empty query returns every value.
pub fn search_values<'a>(analysis: &'a PropAnalysis, query: &str) -> Vec<&'a PropValueDistribution> {
    let query = query.trim().to_lowercase();
    analysis
        .values
        .iter()
        .filter(|v| query.is_empty() || v.value.to_lowercase().contains(&query))
        .collect()
}
