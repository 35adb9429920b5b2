//! A directory of CSV exports, one `<sheet>.csv` per sheet. All cells are
//! read as text; numeric fields such as `Priority` are parsed downstream.

use std::path::{Path, PathBuf};

use regbook_core::FieldValue;

use crate::error::PipelineError;
use crate::source::TabularSource;
use crate::table::Table;

/// A directory standing in for a workbook.
#[derive(Debug, Clone)]
pub struct CsvDirectory {
    dir: PathBuf,
    sheets: Vec<String>,
}

impl CsvDirectory {
    /// Scan `dir` for `*.csv` files.
    pub fn open(dir: &Path) -> Result<Self, PipelineError> {
        let unreadable = |e: std::io::Error| PipelineError::Workbook {
            path: dir.display().to_string(),
            reason: e.to_string(),
        };
        let mut sheets = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(unreadable)? {
            let path = entry.map_err(unreadable)?.path();
            if path.extension().is_some_and(|ext| ext == "csv") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    sheets.push(stem.to_string());
                }
            }
        }
        sheets.sort();
        Ok(Self {
            dir: dir.to_path_buf(),
            sheets,
        })
    }
}

impl TabularSource for CsvDirectory {
    fn location(&self) -> String {
        self.dir.display().to_string()
    }

    fn sheet_names(&self) -> Vec<String> {
        self.sheets.clone()
    }

    fn read_sheet(&mut self, name: &str) -> Result<Table, PipelineError> {
        let path = self.dir.join(format!("{name}.csv"));
        let csv_error = |e: csv::Error| PipelineError::Workbook {
            path: path.display().to_string(),
            reason: e.to_string(),
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&path)
            .map_err(csv_error)?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
                h.trim().to_string()
            })
            .collect();
        let mut table = Table::new(name, &headers)?;

        for (offset, record) in reader.records().enumerate() {
            let record = record.map_err(csv_error)?;
            let number = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(offset + 2);
            table.push_row(number, record.iter().map(FieldValue::from).collect());
        }
        Ok(table)
    }
}
