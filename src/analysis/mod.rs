//! Prop usage analysis module for cuin.
//!
//! This module computes how the props of a component are used across its
//! usage sites, and recomputes those counts for a filtered subset.
//!
//! # Features
//!
//! - Value frequency tables per prop key, with percentages
//! - A synthetic `"(no value)"` bucket for instances that omit a prop
//! - Filtered recounts that keep every key and value of the full set
//! - Case-insensitive search over a prop's values
//!
//! # Example
//!
//! ```ignore
//! use cuin::analysis::{analyze, analyze_filtered};
//!
//! let props = analyze(&component.instances);
//! for prop in &props {
//!     println!("{}: {:.1}%", prop.key, prop.total_percentage);
//! }
//!
//! let counts = analyze_filtered(&component.instances, &visible);
//! println!("{}", counts.count("variant", "\"outline\""));
//! ```

pub mod props;

// Re-export main types for convenience
pub use props::{
    analyze, analyze_filtered, percentage, search_values, FilteredPropCounts, PropAnalysis,
    PropValueDistribution,
};
