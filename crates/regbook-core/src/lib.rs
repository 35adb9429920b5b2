//! # regbook-core: Foundational Types for the Compliance Register
//!
//! This crate defines the value model shared by every other `regbook-*`
//! crate. A compliance register arrives as spreadsheet rows; each row is
//! projected onto the fields a JSON Schema declares and becomes a
//! [`Record`] of [`FieldValue`]s. Everything downstream (validation, index
//! building, output) operates on records.
//!
//! ## Key Design Principles
//!
//! 1. **Tagged cell values.** A cell is empty, text, an integer, a float,
//!    a boolean, a list, or a synthesized JSON structure. Empty cells are
//!    a distinct variant that serializes as `""`, so "was this field
//!    supplied" is always an emptiness check.
//!
//! 2. **Schema order is output order.** [`Record`] keeps fields in
//!    insertion order; projection inserts them in schema property order
//!    and synthesized fields are appended.
//!
//! 3. **Identifiers are file stems.** [`RequirementId`] and [`EvidenceId`]
//!    can only be constructed from values that are safe to use as an
//!    output file name.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `regbook-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod buckets;
pub mod error;
pub mod fields;
pub mod framework;
pub mod identity;
pub mod priority;
pub mod record;
pub mod summary;
pub mod value;

pub use buckets::OrderedBuckets;
pub use error::RegbookError;
pub use framework::{FrameworkId, FrameworkMapping};
pub use identity::{EvidenceId, RequirementId};
pub use priority::{normalize_priority, round_half_even};
pub use record::Record;
pub use summary::{EvidenceEntry, EvidenceSummary, RequirementSummary};
pub use value::FieldValue;
