//! Payload transformation.
//!
//! Attaches derived data to a normalized payload: a stable [`PackageKey`]
//! for every package, per-component instance counts, and the package
//! usage table shown next to the component list.

mod key;
mod transform;

pub use key::PackageKey;
pub use transform::{
    derive_usage_stats, Component, KeyedPackage, PackageWithCount, TransformedPayload,
};
