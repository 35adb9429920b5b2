//! # Register Identifiers
//!
//! Newtypes for the two identifier namespaces of the register. Both end up
//! as output file stems (`requirements/<id>.json`, `evidences/<id>.json`),
//! so construction rejects values that would escape their directory.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RegbookError;
use crate::fields::{EVIDENCE_ID, REQUIREMENT_ID};
use crate::value::FieldValue;

/// Identifier of a requirement (`Requirement ID` column).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequirementId(String);

/// Identifier of an evidence item (`Evidence ID` column).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EvidenceId(String);

impl RequirementId {
    /// Parse an identifier cell.
    pub fn from_value(value: &FieldValue) -> Result<Self, RegbookError> {
        parse_file_stem(REQUIREMENT_ID, value).map(Self)
    }

    /// Parse an identifier string.
    pub fn new(s: &str) -> Result<Self, RegbookError> {
        Self::from_value(&FieldValue::text(s))
    }

    /// Access the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl EvidenceId {
    /// Parse an identifier cell.
    pub fn from_value(value: &FieldValue) -> Result<Self, RegbookError> {
        parse_file_stem(EVIDENCE_ID, value).map(Self)
    }

    /// Parse an identifier string.
    pub fn new(s: &str) -> Result<Self, RegbookError> {
        Self::from_value(&FieldValue::text(s))
    }

    /// Access the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequirementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for EvidenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn parse_file_stem(kind: &'static str, value: &FieldValue) -> Result<String, RegbookError> {
    if value.is_empty() {
        return Err(RegbookError::MissingIdentifier { kind });
    }
    let s = value.key_string();
    let reason = if s.contains(['/', '\\']) {
        Some("contains a path separator")
    } else if s == "." || s == ".." {
        Some("is a relative path component")
    } else if s.contains('\0') {
        Some("contains a NUL byte")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(RegbookError::InvalidIdentifier {
            kind,
            value: s,
            reason,
        }),
        None => Ok(s),
    }
}
