//! # Row-Oriented Tables
//!
//! A `Table` is one sheet of the register: a header row naming the columns
//! and the data rows beneath it. Every row carries a value for every named
//! column; blank and missing cells are [`FieldValue::Empty`], so a field
//! "was supplied" exactly when its value is non-empty.

use std::collections::HashSet;

use regbook_core::{FieldValue, Record};

use crate::error::PipelineError;

/// One data row and its 1-based position in the sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Sheet row number (the header is usually row 1).
    pub number: usize,
    /// Column name → cell value, in column order.
    pub cells: Record,
}

/// A sheet loaded into memory.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    /// Header per physical column; `None` for unnamed columns, which are ignored.
    columns: Vec<Option<String>>,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table from its header cells.
    ///
    /// Blank header cells mark columns that are ignored.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::DuplicateColumn` if two headers share a name.
    pub fn new<S: AsRef<str>>(
        name: impl Into<String>,
        headers: &[S],
    ) -> Result<Self, PipelineError> {
        let name = name.into();
        let mut seen = HashSet::new();
        let mut columns = Vec::with_capacity(headers.len());
        for header in headers {
            let header = header.as_ref();
            if header.is_empty() {
                columns.push(None);
                continue;
            }
            if !seen.insert(header.to_string()) {
                return Err(PipelineError::DuplicateColumn {
                    sheet: name,
                    column: header.to_string(),
                });
            }
            columns.push(Some(header.to_string()));
        }
        Ok(Self {
            name,
            columns,
            rows: Vec::new(),
        })
    }

    /// Append a row of physical cells. Cells beyond the header are dropped,
    /// missing trailing cells are empty, and rows whose named cells are all
    /// empty are skipped.
    pub fn push_row(&mut self, number: usize, cells: Vec<FieldValue>) {
        let mut record = Record::new();
        for (i, column) in self.columns.iter().enumerate() {
            if let Some(name) = column {
                record.set(name.clone(), cells.get(i).cloned().unwrap_or_default());
            }
        }
        if record.iter().all(|(_, v)| v.is_empty()) {
            return;
        }
        self.rows.push(Row {
            number,
            cells: record,
        });
    }

    /// Sheet name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Named columns, in sheet order.
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().flatten().map(String::as_str)
    }

    /// Returns true if a column named `name` exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.headers().any(|h| h == name)
    }

    /// Data rows in sheet order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the sheet has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
