//! # regbook-schema: Record Schemas & Index Annotations
//!
//! Loads the requirement and evidence JSON Schemas, compiles them once,
//! and validates every record before it is written.
//!
//! ## Runtime Validation (`validate`)
//!
//! [`RecordSchema::load`] reads one schema document from disk. Cross-file
//! `$ref`s resolve against sibling files of the schema; nothing is fetched
//! over the network. [`RecordSchema::validate`] reports every violation
//! with its instance path.
//!
//! ## Index Annotations (`index`)
//!
//! A property carrying a custom `index` object becomes a custom index.
//! [`index_specs`] extracts those annotations in property order together
//! with the legal values (`enum` or `oneOf` of `const`s) of each field.
//!
//! ## Crate Policy
//!
//! - Depends only on `regbook-core` internally.
//! - A schema that cannot be read, parsed, or compiled aborts the run.

pub mod index;
pub mod validate;

pub use index::{index_specs, legal_values, IndexSpec, INDEX_ANNOTATION, RESERVED_INDEX_IDS};
pub use validate::{RecordSchema, SchemaError, ValidationViolations, Violation};
