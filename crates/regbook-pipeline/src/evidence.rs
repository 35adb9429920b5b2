//! # Evidence Phase
//!
//! Runs first. Each evidence row is projected onto the evidence schema,
//! normalized, validated, and written to `evidences/<Evidence ID>.json`.
//! Along the way the phase accumulates the flat evidence index and the
//! requirement → evidence reverse index consumed by the requirement phase.

use std::collections::HashSet;

use regbook_core::fields::{EVIDENCE_ID, RELATED_REQUIREMENTS_SUMMARY, RELATED_REQUIREMENT_IDS};
use regbook_core::{EvidenceEntry, EvidenceId, EvidenceSummary, FieldValue, OrderedBuckets};
use regbook_schema::RecordSchema;
use serde::Serialize;

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::output::{OutputTree, EVIDENCES_DIR, INDEXES_DIR, INDEX_FILE};
use crate::projection::{
    check_required_columns, empty_to_list, project, scan_identifiers, MissingColumn,
};
use crate::table::Table;

/// File name of the reverse index under `indexes/`.
pub const EVIDENCES_BY_REQUIREMENT_FILE: &str = "evidences-by-requirement.json";

/// Accumulated output of the evidence phase.
#[derive(Debug, Clone, Default)]
pub struct EvidencePhase {
    /// `{Evidence ID, Title}` per evidence, in row order.
    pub index: Vec<EvidenceEntry>,
    /// Requirement ID → summaries of the evidence referencing it.
    pub by_requirement: OrderedBuckets<EvidenceSummary>,
}

#[derive(Serialize)]
struct EvidenceIndexFile<'a> {
    evidences: &'a [EvidenceEntry],
}

#[derive(Serialize)]
struct ByRequirementFile<'a> {
    #[serde(rename = "by-requirement")]
    by_requirement: &'a OrderedBuckets<EvidenceSummary>,
}

/// Normalize a `Related Requirement ID(s)` cell into a list.
///
/// Blank → `[]`. Otherwise a single-element list, unless `separator` is
/// set, in which case text is split on it and blank pieces are dropped.
/// An id listed more than once is kept at its first position only.
pub fn related_requirement_ids(value: &FieldValue, separator: Option<&str>) -> Vec<FieldValue> {
    let ids = match (value, separator) {
        (v, _) if v.is_empty() => Vec::new(),
        (FieldValue::List(items), _) => items.clone(),
        (FieldValue::Text(s), Some(sep)) => s
            .split(sep)
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(FieldValue::from)
            .collect(),
        (v, _) => vec![v.clone()],
    };
    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|id| seen.insert(id.key_string()))
        .collect()
}

/// Process every evidence row and write the evidence files and indexes.
///
/// # Errors
///
/// Structural errors (missing required column, blank, unusable or
/// duplicate `Evidence ID`) abort before any file is written. A schema
/// violation aborts at the offending evidence.
pub fn process_evidences(
    table: &Table,
    schema: &RecordSchema,
    config: &PipelineConfig,
    out: &mut OutputTree,
) -> Result<EvidencePhase, PipelineError> {
    check_required_columns(table, schema, &[])?;
    let ids = scan_identifiers(table, EVIDENCE_ID, EvidenceId::from_value)?;
    let properties = schema.property_names();
    let separator = config.related_id_separator.as_deref();

    let mut phase = EvidencePhase::default();
    for (row, id) in table.rows().iter().zip(ids) {
        let mut evidence = project(row, &properties, MissingColumn::DefaultEmpty);
        empty_to_list(&mut evidence, RELATED_REQUIREMENTS_SUMMARY);

        let related_cell = row.cells.value_or_empty(RELATED_REQUIREMENT_IDS);
        let related = related_requirement_ids(&related_cell, separator);
        if evidence.contains(RELATED_REQUIREMENT_IDS) {
            evidence.set(RELATED_REQUIREMENT_IDS, FieldValue::List(related.clone()));
        }

        schema
            .validate_record(&evidence)
            .map_err(|source| PipelineError::EvidenceValidation {
                id: id.to_string(),
                source,
            })?;

        out.write_json(EVIDENCES_DIR, &format!("{id}.json"), &evidence)?;
        phase.index.push(EvidenceEntry::of(&id, &evidence));

        let summary = EvidenceSummary::of(&id, &evidence);
        for requirement in &related {
            phase.by_requirement.push(requirement.key_string(), summary.clone());
        }
    }

    out.write_json(
        EVIDENCES_DIR,
        INDEX_FILE,
        &EvidenceIndexFile {
            evidences: &phase.index,
        },
    )?;
    out.write_json(
        INDEXES_DIR,
        EVIDENCES_BY_REQUIREMENT_FILE,
        &ByRequirementFile {
            by_requirement: &phase.by_requirement,
        },
    )?;

    tracing::info!(
        evidences = phase.index.len(),
        linked_requirements = phase.by_requirement.len(),
        "evidence phase complete"
    );
    Ok(phase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_related_ids_become_empty_list() {
        assert!(related_requirement_ids(&FieldValue::Empty, None).is_empty());
        assert!(related_requirement_ids(&FieldValue::Empty, Some(",")).is_empty());
    }

    #[test]
    fn scalar_related_id_becomes_single_element() {
        assert_eq!(
            related_requirement_ids(&FieldValue::from("R1, R2"), None),
            vec![FieldValue::from("R1, R2")]
        );
        assert_eq!(
            related_requirement_ids(&FieldValue::Integer(7), None),
            vec![FieldValue::Integer(7)]
        );
    }

    #[test]
    fn separator_splits_and_trims() {
        assert_eq!(
            related_requirement_ids(&FieldValue::from("R1, R2,, "), Some(",")),
            vec![FieldValue::from("R1"), FieldValue::from("R2")]
        );
        assert_eq!(
            related_requirement_ids(&FieldValue::Integer(7), Some(",")),
            vec![FieldValue::Integer(7)]
        );
    }

    #[test]
    fn repeated_ids_are_listed_once() {
        assert_eq!(
            related_requirement_ids(&FieldValue::from("R1,R2, R1,R2"), Some(",")),
            vec![FieldValue::from("R1"), FieldValue::from("R2")]
        );
        let list = FieldValue::List(vec![
            FieldValue::from("R3"),
            FieldValue::Integer(4),
            FieldValue::from("R3"),
            FieldValue::from("4"),
        ]);
        assert_eq!(
            related_requirement_ids(&list, None),
            vec![FieldValue::from("R3"), FieldValue::Integer(4)]
        );
    }
}
