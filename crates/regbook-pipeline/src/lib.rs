//! # regbook-pipeline
//!
//! Turns a compliance register workbook into a static JSON tree.
//!
//! A run is a strict two-phase batch:
//!
//! 1. **Evidence phase** ([`evidence::process_evidences`]): every row of
//!    the `Evidences` sheet becomes `evidences/<id>.json`, plus the flat
//!    evidence index and the requirement → evidence reverse index.
//! 2. **Requirement phase** ([`requirement::process_requirements`]): every
//!    row of the `Requirements` sheet becomes `requirements/<id>.json`,
//!    plus the flat requirement index, one file per schema-declared custom
//!    index, and the discovery manifest `indexes/index.json`.
//!
//! Every record is validated against its JSON Schema before it is written.
//! Any failure stops the run; files already written are left in place.

pub mod config;
pub mod csv_dir;
pub mod error;
pub mod evidence;
pub mod indexes;
pub mod output;
pub(crate) mod projection;
pub mod requirement;
pub mod source;
pub mod table;
pub mod xlsx;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use output::OutputTree;
pub use source::{open_source, read_register, RegisterTables, TabularSource};

use regbook_schema::{index_specs, RecordSchema};

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub evidences: usize,
    pub requirements: usize,
    pub indexes: usize,
    pub files_written: usize,
}

/// Load schemas and the workbook named by `config`, then generate the tree.
///
/// With `dry_run`, everything is read, validated, and serialized, but
/// nothing is written.
pub fn run(config: &PipelineConfig, dry_run: bool) -> Result<RunSummary, PipelineError> {
    config.validate()?;

    let requirement_schema = RecordSchema::load(&config.requirement_schema)?;
    let evidence_schema = RecordSchema::load(&config.evidence_schema)?;
    tracing::debug!(
        requirement_schema = %config.requirement_schema.display(),
        evidence_schema = %config.evidence_schema.display(),
        "loaded schemas"
    );

    let mut source = open_source(&config.workbook)?;
    let tables = read_register(source.as_mut())?;

    let mut out = if dry_run {
        OutputTree::dry_run(&config.output_dir)
    } else {
        OutputTree::new(&config.output_dir)
    };
    generate(&tables, &requirement_schema, &evidence_schema, config, &mut out)
}

/// Run both phases over already-loaded tables.
pub fn generate(
    tables: &RegisterTables,
    requirement_schema: &RecordSchema,
    evidence_schema: &RecordSchema,
    config: &PipelineConfig,
    out: &mut OutputTree,
) -> Result<RunSummary, PipelineError> {
    let specs = index_specs(requirement_schema)?;
    tracing::debug!(
        indexes = ?specs.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(),
        "custom indexes declared"
    );

    let evidence = evidence::process_evidences(&tables.evidences, evidence_schema, config, out)?;
    let requirements = requirement::process_requirements(
        &tables.requirements,
        requirement_schema,
        &specs,
        &evidence.by_requirement,
        config,
        out,
    )?;

    let summary = RunSummary {
        evidences: evidence.index.len(),
        requirements: requirements.index.len(),
        indexes: requirements.indexes.len(),
        files_written: out.files_written(),
    };
    tracing::info!(
        output = %out.root().display(),
        dry_run = out.is_dry_run(),
        evidences = summary.evidences,
        requirements = summary.requirements,
        files = summary.files_written,
        "generation complete"
    );
    Ok(summary)
}
