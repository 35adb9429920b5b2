//! # Tabular Sources
//!
//! The register lives in two sheets named literally `Requirements` and
//! `Evidences`. A source is either a spreadsheet workbook (read with
//! calamine) or a directory holding one CSV export per sheet.

use std::path::Path;

use crate::csv_dir::CsvDirectory;
use crate::error::PipelineError;
use crate::table::Table;
use crate::xlsx::Workbook;

/// Sheet holding requirement rows.
pub const REQUIREMENTS_SHEET: &str = "Requirements";
/// Sheet holding evidence rows.
pub const EVIDENCES_SHEET: &str = "Evidences";

/// A workbook-like container of named sheets.
pub trait TabularSource {
    /// Human-readable location, used in error messages.
    fn location(&self) -> String;

    /// Names of the sheets the source contains.
    fn sheet_names(&self) -> Vec<String>;

    /// Load one sheet; the first row is the header.
    fn read_sheet(&mut self, name: &str) -> Result<Table, PipelineError>;
}

/// The two sheets of a register.
#[derive(Debug, Clone)]
pub struct RegisterTables {
    pub requirements: Table,
    pub evidences: Table,
}

/// Open a workbook file or CSV directory.
pub fn open_source(path: &Path) -> Result<Box<dyn TabularSource>, PipelineError> {
    if path.is_dir() {
        Ok(Box::new(CsvDirectory::open(path)?))
    } else {
        Ok(Box::new(Workbook::open(path)?))
    }
}

/// Load both register sheets.
///
/// # Errors
///
/// Returns `PipelineError::MissingSheet` if either sheet is absent; both
/// are checked before either is read.
pub fn read_register(source: &mut dyn TabularSource) -> Result<RegisterTables, PipelineError> {
    let names = source.sheet_names();
    for sheet in [REQUIREMENTS_SHEET, EVIDENCES_SHEET] {
        if !names.iter().any(|n| n == sheet) {
            return Err(PipelineError::MissingSheet {
                path: source.location(),
                sheet: sheet.to_string(),
            });
        }
    }

    let requirements = source.read_sheet(REQUIREMENTS_SHEET)?;
    let evidences = source.read_sheet(EVIDENCES_SHEET)?;
    tracing::info!(
        source = %source.location(),
        requirements = requirements.len(),
        evidences = evidences.len(),
        "loaded register sheets"
    );
    Ok(RegisterTables {
        requirements,
        evidences,
    })
}
