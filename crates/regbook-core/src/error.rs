//! # Error Types
//!
//! Errors raised while shaping individual register values. All of them are
//! structural: the run cannot continue once one is raised.

use thiserror::Error;

/// Error produced by the core value model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegbookError {
    /// An identifier cell was blank.
    #[error("{kind} is missing")]
    MissingIdentifier {
        /// Identifier field name (e.g. `Requirement ID`).
        kind: &'static str,
    },

    /// An identifier cannot be used as an output file stem.
    #[error("{kind} {value:?} is not usable as a file name: {reason}")]
    InvalidIdentifier {
        /// Identifier field name.
        kind: &'static str,
        /// Offending value, as read from the sheet.
        value: String,
        /// Why the value was rejected.
        reason: &'static str,
    },

    /// A `Priority` cell held something other than a number.
    #[error("priority value {value:?} is not a number")]
    InvalidPriority {
        /// Offending value, rendered as text.
        value: String,
    },
}
