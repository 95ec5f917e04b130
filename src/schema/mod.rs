//! Schema module for cuin.
//!
//! Turns the analyzer's JSON document into the typed entity model. The
//! document is snake_case on the wire; [`normalize`] camel-cases every key
//! and validates the result, reporting the first non-conforming field.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use cuin::schema::parse_file;
//!
//! let payload = parse_file(Path::new("payload.json"))?;
//! println!("{} components under {}", payload.components.len(), payload.meta.base_path);
//! ```

pub mod normalize;
pub mod types;

pub use normalize::{
    normalize, parse_file, parse_str, to_camel_case_keys, SchemaError, SchemaResult,
    ValidationError,
};

pub use types::{
    ComponentRecord, Instance, Meta, PackageIdentity, PackageKind, Payload, Prop, Span,
    NO_PACKAGE, NO_VALUE,
};
