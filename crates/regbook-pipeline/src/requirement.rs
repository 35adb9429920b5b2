//! # Requirement Phase
//!
//! Runs after the evidence phase. Each requirement row is projected onto
//! the requirement schema, given its framework mappings, indexed, then
//! normalized, validated, and written to
//! `requirements/<Requirement ID>.json`. The flat requirement index, one
//! file per custom index, and the discovery manifest follow.

use regbook_core::fields::{
    self, EVIDENCES, FRAMEWORK_MAPPINGS, PRIORITY, RELATED_REQUIREMENTS, REQUIREMENT_ID,
};
use regbook_core::{
    normalize_priority, EvidenceSummary, FieldValue, FrameworkId, FrameworkMapping, OrderedBuckets,
    Record, RequirementId, RequirementSummary,
};
use regbook_schema::{IndexSpec, RecordSchema};
use serde::Serialize;
use serde_json::Value;

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::indexes::{discovery_manifest, CustomIndex, ManifestFile};
use crate::output::{OutputTree, INDEXES_DIR, INDEX_FILE, REQUIREMENTS_DIR};
use crate::projection::{
    check_required_columns, empty_to_list, project, scan_identifiers, MissingColumn,
};
use crate::table::{Row, Table};

/// Accumulated output of the requirement phase.
#[derive(Debug, Clone)]
pub struct RequirementPhase {
    /// `{Requirement ID, Title}` per requirement, in row order.
    pub index: Vec<RequirementSummary>,
    /// Custom indexes, in schema property order.
    pub indexes: Vec<CustomIndex>,
}

#[derive(Serialize)]
struct RequirementIndexFile<'a> {
    requirements: &'a [RequirementSummary],
}

/// Build the `Framework Mappings` list for a row: one entry per known
/// framework, in fixed order, holding the raw mapping cell.
pub fn framework_mappings(row: &Row, config: &PipelineConfig) -> Vec<FrameworkMapping> {
    FrameworkId::all()
        .iter()
        .map(|&framework_id| FrameworkMapping {
            framework_id,
            mapping: row
                .cells
                .value_or_empty(config.framework_columns.column(framework_id)),
        })
        .collect()
}

fn mappings_value(mappings: &[FrameworkMapping]) -> FieldValue {
    FieldValue::Json(Value::Array(
        mappings.iter().map(FrameworkMapping::to_json).collect(),
    ))
}

fn evidences_value(summaries: &[EvidenceSummary]) -> FieldValue {
    FieldValue::Json(Value::Array(
        summaries.iter().map(EvidenceSummary::to_json).collect(),
    ))
}

/// Build the record for one requirement row, feeding `indexes` along the way.
fn build_requirement(
    row: &Row,
    id: &RequirementId,
    properties: &[&str],
    config: &PipelineConfig,
    evidence_by_requirement: &OrderedBuckets<EvidenceSummary>,
    indexes: &mut [CustomIndex],
) -> Result<(Record, RequirementSummary), PipelineError> {
    let mut requirement = project(row, properties, MissingColumn::Skip);
    requirement.set(FRAMEWORK_MAPPINGS, mappings_value(&framework_mappings(row, config)));

    let summary = RequirementSummary::of(id, &requirement);
    for index in indexes.iter_mut() {
        let value = requirement.value_or_empty(&index.spec.field);
        index.observe(&value, &summary);
    }

    empty_to_list(&mut requirement, RELATED_REQUIREMENTS);
    requirement
        .update(PRIORITY, normalize_priority)
        .map_err(|source| PipelineError::Requirement {
            id: id.to_string(),
            source,
        })?;

    if config.attach_evidences {
        requirement.set(
            EVIDENCES,
            evidences_value(evidence_by_requirement.get(id.as_str())),
        );
    }
    Ok((requirement, summary))
}

/// Process every requirement row and write the requirement files, the
/// custom indexes, and the discovery manifest.
///
/// # Errors
///
/// Structural errors (missing required column, blank, unusable or
/// duplicate `Requirement ID`) abort before any requirement file is
/// written. A bad `Priority` or a schema violation aborts at the
/// offending requirement.
pub fn process_requirements(
    table: &Table,
    schema: &RecordSchema,
    index_specs: &[IndexSpec],
    evidence_by_requirement: &OrderedBuckets<EvidenceSummary>,
    config: &PipelineConfig,
    out: &mut OutputTree,
) -> Result<RequirementPhase, PipelineError> {
    check_required_columns(table, schema, &fields::SYNTHESIZED_REQUIREMENT_FIELDS)?;
    let ids = scan_identifiers(table, REQUIREMENT_ID, RequirementId::from_value)?;
    let properties: Vec<&str> = schema
        .property_names()
        .into_iter()
        .filter(|name| !fields::is_synthesized_requirement_field(name))
        .collect();

    let mut phase = RequirementPhase {
        index: Vec::with_capacity(table.len()),
        indexes: index_specs.iter().cloned().map(CustomIndex::new).collect(),
    };

    for (row, id) in table.rows().iter().zip(ids) {
        let (requirement, summary) = build_requirement(
            row,
            &id,
            &properties,
            config,
            evidence_by_requirement,
            &mut phase.indexes,
        )?;

        schema
            .validate_record(&requirement)
            .map_err(|source| PipelineError::RequirementValidation {
                id: id.to_string(),
                source,
            })?;

        out.write_json(REQUIREMENTS_DIR, &format!("{id}.json"), &requirement)?;
        phase.index.push(summary);
    }

    out.write_json(
        REQUIREMENTS_DIR,
        INDEX_FILE,
        &RequirementIndexFile {
            requirements: &phase.index,
        },
    )?;
    for index in &phase.indexes {
        out.write_json(INDEXES_DIR, &index.spec.file_name(), &index.file())?;
        tracing::debug!(index = %index.spec.id, keys = index.data.len(), "wrote custom index");
    }

    let manifest = discovery_manifest(phase.indexes.iter().map(|i| &i.spec));
    out.write_json(INDEXES_DIR, INDEX_FILE, &ManifestFile { indexes: &manifest })?;

    tracing::info!(
        requirements = phase.index.len(),
        indexes = phase.indexes.len(),
        "requirement phase complete"
    );
    Ok(phase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regbook_core::EvidenceId;
    use serde_json::json;

    fn row(headers: &[&str], cells: &[&str]) -> Row {
        let mut t = Table::new("Requirements", headers).unwrap();
        t.push_row(2, cells.iter().map(|c| FieldValue::from(*c)).collect());
        t.rows()[0].clone()
    }

    #[test]
    fn framework_mappings_follow_fixed_order() {
        let r = row(&["ENTRUST Blueprint", "SATRE"], &["EB-1", ""]);
        let mappings = framework_mappings(&r, &PipelineConfig::default());
        assert_eq!(
            mappings_value(&mappings).to_json(),
            json!([
                {"frameworkId": "SATRE", "mapping": ""},
                {"frameworkId": "ENTRUST Blueprint", "mapping": "EB-1"}
            ])
        );
    }

    #[test]
    fn framework_columns_are_configurable() {
        let r = row(&["SATRE ref"], &["S-9"]);
        let mut config = PipelineConfig::default();
        config.framework_columns.satre = "SATRE ref".into();
        let mappings = framework_mappings(&r, &config);
        assert_eq!(mappings[0].mapping, FieldValue::from("S-9"));
        assert_eq!(mappings[1].mapping, FieldValue::Empty);
    }

    #[test]
    fn build_normalizes_and_indexes() {
        let r = row(
            &["Requirement ID", "Title", "Category", "Priority", "Related Requirements"],
            &["R1", "X", "Governance", "2.5", ""],
        );
        let id = RequirementId::new("R1").unwrap();
        let props = ["Requirement ID", "Title", "Category", "Priority", "Related Requirements"];
        let spec = IndexSpec {
            field: "Category".into(),
            id: "by-category".into(),
            annotation: json!({"id": "by-category"}).as_object().unwrap().clone(),
            legal_values: vec![],
        };
        let mut indexes = vec![CustomIndex::new(spec)];

        let (record, summary) = build_requirement(
            &r,
            &id,
            &props,
            &PipelineConfig::default(),
            &OrderedBuckets::new(),
            &mut indexes,
        )
        .unwrap();

        assert_eq!(record.get("Priority"), Some(&FieldValue::Integer(2)));
        assert_eq!(record.get("Related Requirements"), Some(&FieldValue::List(vec![])));
        assert!(!record.contains(EVIDENCES));
        assert_eq!(
            record.field_names().last(),
            Some(FRAMEWORK_MAPPINGS),
        );
        assert_eq!(summary.title, FieldValue::from("X"));
        assert_eq!(indexes[0].data.get("Governance").len(), 1);
    }

    #[test]
    fn attached_evidences_default_to_empty_list() {
        let r = row(&["Requirement ID", "Title"], &["R2", "Y"]);
        let id = RequirementId::new("R2").unwrap();
        let mut config = PipelineConfig::default();
        config.attach_evidences = true;

        let mut buckets = OrderedBuckets::new();
        let e1 = EvidenceId::new("E1").unwrap();
        let mut evidence = Record::new();
        evidence.set("Title", FieldValue::from("Log"));
        buckets.push("R1", EvidenceSummary::of(&e1, &evidence));

        let (record, _) =
            build_requirement(&r, &id, &["Requirement ID", "Title"], &config, &buckets, &mut [])
                .unwrap();
        assert_eq!(record.get(EVIDENCES).map(FieldValue::to_json), Some(json!([])));

        let r1 = row(&["Requirement ID", "Title"], &["R1", "Z"]);
        let id1 = RequirementId::new("R1").unwrap();
        let (record, _) =
            build_requirement(&r1, &id1, &["Requirement ID", "Title"], &config, &buckets, &mut [])
                .unwrap();
        assert_eq!(
            record.get(EVIDENCES).map(FieldValue::to_json),
            Some(json!([{
                "Evidence ID": "E1",
                "Title": "Log",
                "Description": "",
                "File": "../evidences/E1.json"
            }]))
        );
    }

    #[test]
    fn bad_priority_names_requirement() {
        let r = row(&["Requirement ID", "Priority"], &["R7", "high"]);
        let id = RequirementId::new("R7").unwrap();
        let err = build_requirement(
            &r,
            &id,
            &["Requirement ID", "Priority"],
            &PipelineConfig::default(),
            &OrderedBuckets::new(),
            &mut [],
        )
        .unwrap_err();
        assert!(matches!(&err, PipelineError::Requirement { id, .. } if id == "R7"), "got: {err}");
    }
}
