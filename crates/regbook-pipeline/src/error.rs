//! # Pipeline Errors
//!
//! Every error is fatal to the run. Structural errors (missing sheet,
//! column, or identifier) abort before the affected phase writes anything;
//! validation errors abort at the offending record. Files already written
//! stay on disk.

use regbook_core::RegbookError;
use regbook_schema::SchemaError;
use thiserror::Error;

/// Error raised while generating the register output.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The workbook lacks one of the two register sheets.
    #[error("workbook '{path}' is missing the '{sheet}' sheet")]
    MissingSheet {
        /// Workbook path.
        path: String,
        /// Sheet that was expected.
        sheet: String,
    },

    /// The workbook could not be opened or a sheet could not be read.
    #[error("cannot read workbook '{path}': {reason}")]
    Workbook {
        /// Workbook path.
        path: String,
        /// Underlying reader error.
        reason: String,
    },

    /// A sheet lacks columns its schema marks as required.
    #[error("sheet '{sheet}' is missing required columns: {}", .columns.join(", "))]
    MissingColumns {
        /// Sheet name.
        sheet: String,
        /// Missing column names, sorted.
        columns: Vec<String>,
    },

    /// Two header cells of a sheet carry the same name.
    #[error("sheet '{sheet}' has more than one column named '{column}'")]
    DuplicateColumn {
        /// Sheet name.
        sheet: String,
        /// Repeated header.
        column: String,
    },

    /// A spreadsheet error cell (e.g. `#DIV/0!`).
    #[error("sheet '{sheet}' row {row}, column '{column}': error cell {value}")]
    ErrorCell {
        /// Sheet name.
        sheet: String,
        /// 1-based sheet row.
        row: usize,
        /// Column name.
        column: String,
        /// Error code as displayed by the spreadsheet.
        value: String,
    },

    /// A row-level structural problem (missing or unusable identifier).
    #[error("sheet '{sheet}' row {row}: {source}")]
    Row {
        /// Sheet name.
        sheet: String,
        /// 1-based sheet row.
        row: usize,
        /// Underlying value error.
        source: RegbookError,
    },

    /// The same identifier appears on two rows.
    #[error("sheet '{sheet}' has duplicate {kind} '{id}' (rows {first_row} and {row})")]
    DuplicateIdentifier {
        /// Sheet name.
        sheet: String,
        /// Identifier field name.
        kind: &'static str,
        /// Repeated identifier.
        id: String,
        /// Row of the first occurrence.
        first_row: usize,
        /// Row of the repetition.
        row: usize,
    },

    /// A requirement field could not be normalized.
    #[error("Requirement {id}: {source}")]
    Requirement {
        /// Requirement identifier.
        id: String,
        /// Underlying value error.
        source: RegbookError,
    },

    /// An evidence record failed schema validation.
    #[error("Evidence {id} failed schema validation:\n{source}")]
    EvidenceValidation {
        /// Evidence identifier.
        id: String,
        /// Validation failure.
        source: SchemaError,
    },

    /// A requirement record failed schema validation.
    #[error("Requirement {id} failed schema validation:\n{source}")]
    RequirementValidation {
        /// Requirement identifier.
        id: String,
        /// Validation failure.
        source: SchemaError,
    },

    /// A schema could not be loaded or its annotations are malformed.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Invalid pipeline configuration.
    #[error("config error: {0}")]
    Config(String),

    /// An output file could not be written.
    #[error("cannot write '{path}': {source}")]
    Write {
        /// Output path.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
