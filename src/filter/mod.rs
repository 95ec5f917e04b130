//! Filtering for the component list and for a component's usage sites.
//!
//! [`predicates`] holds the combinator library. [`instance`] compiles the
//! detail view's filter state into one predicate; [`component`] filters
//! and sorts the landing list.
//!
//! # Example
//!
//! ```ignore
//! use cuin::filter::{build_filter_predicate, PropValueFilters};
//!
//! let predicate = build_filter_predicate(&excluded, &filters, &all_values);
//! let visible: Vec<_> = instances.iter().filter(|i| predicate(i)).collect();
//! ```

pub mod component;
pub mod instance;
pub mod predicates;

pub use component::{
    filter_components, sort_components, sort_components_by, ComponentFilterState, SortOption,
};
pub use instance::{
    build_filter_predicate, instance_packages, instance_prop_keys, PackageInfo, PropKeyInfo,
    PropValueFilters,
};
pub use predicates::Predicate;
