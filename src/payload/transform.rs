//! Derived component data and package usage statistics.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use super::key::PackageKey;
use crate::schema::{ComponentRecord, Instance, Meta, PackageIdentity, Payload};

/// A package identity together with its precomputed key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyedPackage {
    pub key: PackageKey,
    #[serde(flatten)]
    pub identity: PackageIdentity,
}

impl KeyedPackage {
    pub fn new(identity: PackageIdentity) -> Self {
        Self {
            key: identity.key(),
            identity,
        }
    }
}

/// A component ready for listing and filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub id: String,
    pub name: String,
    pub package: KeyedPackage,
    pub instances: Vec<Instance>,
}

impl Component {
    /// Attaches the package key to a wire component.
    pub fn from_record(record: ComponentRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            package: KeyedPackage::new(record.package),
            instances: record.instances,
        }
    }

    /// Number of usage sites. Always the live length of `instances`.
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }
}

/// One row of the package usage table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageWithCount {
    pub key: PackageKey,
    #[serde(flatten)]
    pub identity: PackageIdentity,
    /// Number of components whose package has this key.
    pub count: usize,
}

/// Groups components by package key and counts each group.
///
/// Rows are ordered by package kind (external, then internal, then
/// native), then by count descending. Ties keep first-seen order.
pub fn derive_usage_stats(components: &[Component]) -> Vec<PackageWithCount> {
    let mut rows: Vec<PackageWithCount> = Vec::new();
    let mut index: HashMap<&PackageKey, usize> = HashMap::new();

    for component in components {
        match index.get(&component.package.key) {
            Some(&i) => rows[i].count += 1,
            None => {
                index.insert(&component.package.key, rows.len());
                rows.push(PackageWithCount {
                    key: component.package.key.clone(),
                    identity: component.package.identity.clone(),
                    count: 1,
                });
            }
        }
    }

    // Stable sort keeps first-seen order for ties.
    rows.sort_by(|a, b| {
        b.identity
            .kind()
            .priority()
            .cmp(&a.identity.kind().priority())
            .then_with(|| b.count.cmp(&a.count))
    });
    rows
}

/// The payload after derived data has been attached.
#[derive(Debug, Clone)]
pub struct TransformedPayload {
    pub meta: Meta,
    pub components: Vec<Component>,
    pub packages: Vec<PackageWithCount>,
}

impl TransformedPayload {
    pub fn from_payload(payload: Payload) -> Self {
        let components: Vec<Component> = payload
            .components
            .into_iter()
            .map(Component::from_record)
            .collect();
        let packages = derive_usage_stats(&components);

        debug!(
            components = components.len(),
            packages = packages.len(),
            "transformed payload"
        );

        Self {
            meta: payload.meta,
            components,
            packages,
        }
    }

    /// Looks up a component by id.
    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Every package key present in the component list.
    pub fn package_keys(&self) -> Vec<PackageKey> {
        self.packages.iter().map(|p| p.key.clone()).collect()
    }
}
