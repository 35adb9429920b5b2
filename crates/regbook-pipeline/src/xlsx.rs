//! Spreadsheet workbooks (`.xlsx`, `.xlsm`, `.xls`, `.ods`) via calamine.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use regbook_core::FieldValue;

use crate::error::PipelineError;
use crate::source::TabularSource;
use crate::table::Table;

/// An opened workbook file.
pub struct Workbook {
    path: PathBuf,
    sheets: Sheets<BufReader<File>>,
}

impl Workbook {
    /// Open a workbook; the format is chosen from the file extension.
    pub fn open(path: &Path) -> Result<Self, PipelineError> {
        let sheets = open_workbook_auto(path).map_err(|e| PipelineError::Workbook {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            sheets,
        })
    }
}

impl TabularSource for Workbook {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    fn read_sheet(&mut self, name: &str) -> Result<Table, PipelineError> {
        let range = self
            .sheets
            .worksheet_range(name)
            .map_err(|e| PipelineError::Workbook {
                path: self.path.display().to_string(),
                reason: format!("sheet '{name}': {e}"),
            })?;
        table_from_range(name, &range)
    }
}

/// Build a table from a worksheet range whose first row is the header.
pub(crate) fn table_from_range(name: &str, range: &Range<Data>) -> Result<Table, PipelineError> {
    let first_row = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);
    let mut rows = range.rows();

    let Some(header_cells) = rows.next() else {
        return Table::new(name, &[] as &[String]);
    };
    let headers = header_cells
        .iter()
        .enumerate()
        .map(|(col, cell)| {
            convert_cell(cell)
                .map(|v| v.key_string().trim().to_string())
                .map_err(|value| error_cell(name, first_row, &format!("#{}", col + 1), value))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let mut table = Table::new(name, &headers)?;

    for (offset, cells) in rows.enumerate() {
        let number = first_row + offset + 1;
        let values = cells
            .iter()
            .enumerate()
            .map(|(col, cell)| {
                convert_cell(cell).map_err(|value| {
                    let column = headers.get(col).map(String::as_str).unwrap_or("");
                    error_cell(name, number, column, value)
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        table.push_row(number, values);
    }
    Ok(table)
}

fn error_cell(sheet: &str, row: usize, column: &str, value: String) -> PipelineError {
    PipelineError::ErrorCell {
        sheet: sheet.to_string(),
        row,
        column: column.to_string(),
        value,
    }
}

/// Convert one cell. Error cells come back as `Err` with their code.
fn convert_cell(cell: &Data) -> Result<FieldValue, String> {
    Ok(match cell {
        Data::Empty => FieldValue::Empty,
        Data::String(s) => FieldValue::text(s.as_str()),
        Data::Int(i) => FieldValue::Integer(*i),
        Data::Float(f) => FieldValue::number(*f),
        Data::Bool(b) => FieldValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ts) if ts.time() == chrono::NaiveTime::MIN => {
                FieldValue::Text(ts.format("%Y-%m-%d").to_string())
            }
            Some(ts) => FieldValue::Text(ts.format("%Y-%m-%dT%H:%M:%S").to_string()),
            None => FieldValue::number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => FieldValue::text(s.as_str()),
        Data::Error(e) => return Err(format!("{e:?}")),
    })
}
