//! cuin - Component usage explorer
//!
//! This crate loads a component usage report produced by a static analyzer
//! and answers questions about it: which components exist and where they
//! come from, and how each component's props are used across its call
//! sites, narrowed by package and prop value filters.

pub mod analysis;
pub mod config;
pub mod export;
pub mod filter;
pub mod payload;
pub mod schema;
pub mod store;
