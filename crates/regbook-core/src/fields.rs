//! Field names the pipeline reads or synthesizes. Every other field is
//! taken verbatim from the schema's `properties`.

/// Requirement identifier.
pub const REQUIREMENT_ID: &str = "Requirement ID";
/// Evidence identifier.
pub const EVIDENCE_ID: &str = "Evidence ID";
pub const TITLE: &str = "Title";
pub const DESCRIPTION: &str = "Description";
pub const PRIORITY: &str = "Priority";
pub const RELATED_REQUIREMENTS: &str = "Related Requirements";
pub const RELATED_REQUIREMENT_IDS: &str = "Related Requirement ID(s)";
pub const RELATED_REQUIREMENTS_SUMMARY: &str = "Related Requirements Summary";

/// Synthesized list of external framework mappings.
pub const FRAMEWORK_MAPPINGS: &str = "Framework Mappings";
/// Synthesized list of attached evidence summaries.
pub const EVIDENCES: &str = "Evidences";

/// Requirement fields that are never projected from the sheet.
pub const SYNTHESIZED_REQUIREMENT_FIELDS: [&str; 2] = [FRAMEWORK_MAPPINGS, EVIDENCES];

/// Returns true if `name` is produced by the pipeline rather than read
/// from a requirement row.
pub fn is_synthesized_requirement_field(name: &str) -> bool {
    SYNTHESIZED_REQUIREMENT_FIELDS.contains(&name)
}
