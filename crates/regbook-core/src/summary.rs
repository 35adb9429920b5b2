//! Summary shapes written into the flat indexes, the custom indexes, and
//! the evidence reverse index.

use serde::Serialize;

use crate::fields::{DESCRIPTION, TITLE};
use crate::identity::{EvidenceId, RequirementId};
use crate::record::Record;
use crate::value::FieldValue;

/// `{Requirement ID, Title}`, used by `requirements/index.json` and the
/// custom indexes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequirementSummary {
    #[serde(rename = "Requirement ID")]
    pub requirement_id: RequirementId,
    #[serde(rename = "Title")]
    pub title: FieldValue,
}

/// `{Evidence ID, Title}`, used by `evidences/index.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvidenceEntry {
    #[serde(rename = "Evidence ID")]
    pub evidence_id: EvidenceId,
    #[serde(rename = "Title")]
    pub title: FieldValue,
}

/// Evidence summary stored per requirement in the reverse index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvidenceSummary {
    #[serde(rename = "Evidence ID")]
    pub evidence_id: EvidenceId,
    #[serde(rename = "Title")]
    pub title: FieldValue,
    #[serde(rename = "Description")]
    pub description: FieldValue,
    /// Path of the evidence file relative to the `indexes/` directory.
    #[serde(rename = "File")]
    pub file: String,
}

impl RequirementSummary {
    /// Summarize a requirement record.
    pub fn of(requirement_id: &RequirementId, record: &Record) -> Self {
        Self {
            requirement_id: requirement_id.clone(),
            title: record.value_or_empty(TITLE),
        }
    }
}

impl EvidenceEntry {
    /// Flat index entry for an evidence record.
    pub fn of(evidence_id: &EvidenceId, record: &Record) -> Self {
        Self {
            evidence_id: evidence_id.clone(),
            title: record.value_or_empty(TITLE),
        }
    }
}

impl EvidenceSummary {
    /// Reverse-index entry for an evidence record.
    pub fn of(evidence_id: &EvidenceId, record: &Record) -> Self {
        Self {
            evidence_id: evidence_id.clone(),
            title: record.value_or_empty(TITLE),
            description: record.value_or_empty(DESCRIPTION),
            file: Self::relative_file(evidence_id),
        }
    }

    /// `../evidences/<Evidence ID>.json`
    pub fn relative_file(evidence_id: &EvidenceId) -> String {
        format!("../evidences/{evidence_id}.json")
    }

    /// Convert to JSON (for attaching to a requirement record).
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "Evidence ID": self.evidence_id.as_str(),
            "Title": self.title.to_json(),
            "Description": self.description.to_json(),
            "File": self.file,
        })
    }
}
