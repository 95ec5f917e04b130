//! Selection state for the component list and the instance detail view.
//!
//! Stores are plain owned values: mutations take `&mut self`, reads take
//! `&self`. Views derived from the filter state are memoized on that state
//! and its hash, so repeated reads are free.
//!
//! # Example
//!
//! ```ignore
//! use cuin::store::InstanceFilterStore;
//!
//! let mut store = InstanceFilterStore::new(&component.instances);
//! store.select_only_value("variant", "\"outline\"");
//! for instance in store.filtered_instances() {
//!     println!("{}", instance.file_path);
//! }
//! ```

pub mod component_filters;
pub mod debounce;
pub mod instance_filters;
pub mod memo;
pub mod selection;

// Re-export main types for convenience
pub use component_filters::ComponentFilterStore;
pub use debounce::{Debouncer, ValueSearch};
pub use instance_filters::{InstanceFilterState, InstanceFilterStore};
pub use memo::{fingerprint, Memo};
pub use selection::{
    hover_mode, label_action, CheckboxGroup, CheckboxMode, ExclusionSet, HoverZone, Selection,
};
