//! Schema-driven row projection and the per-table structural checks that
//! run before a phase writes anything.

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

use regbook_core::{FieldValue, Record, RegbookError};
use regbook_schema::RecordSchema;

use crate::error::PipelineError;
use crate::table::{Row, Table};

/// What to do with a schema property whose column is absent from the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MissingColumn {
    /// Project it as an empty value.
    DefaultEmpty,
    /// Leave it out of the record.
    Skip,
}

/// Project `row` onto `fields`, in field order.
pub(crate) fn project(row: &Row, fields: &[&str], missing: MissingColumn) -> Record {
    let mut record = Record::new();
    for field in fields {
        match (row.cells.get(field), missing) {
            (Some(value), _) => record.set(*field, value.clone()),
            (None, MissingColumn::DefaultEmpty) => record.set(*field, FieldValue::Empty),
            (None, MissingColumn::Skip) => {}
        }
    }
    record
}

/// Replace an empty value of `field` with an empty list.
pub(crate) fn empty_to_list(record: &mut Record, field: &str) {
    if record.get(field).is_some_and(FieldValue::is_empty) {
        record.set(field, FieldValue::List(Vec::new()));
    }
}

/// Fail if `table` lacks a column the schema requires. Names in `exclude`
/// are synthesized by the pipeline and need no column.
pub(crate) fn check_required_columns(
    table: &Table,
    schema: &RecordSchema,
    exclude: &[&str],
) -> Result<(), PipelineError> {
    let mut missing: Vec<String> = schema
        .required()
        .into_iter()
        .filter(|name| !exclude.contains(name) && !table.has_column(name))
        .map(str::to_string)
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    missing.sort();
    Err(PipelineError::MissingColumns {
        sheet: table.name().to_string(),
        columns: missing,
    })
}

/// Parse the identifier of every row, rejecting blanks, unusable file
/// names, and duplicates. Returns identifiers in row order.
pub(crate) fn scan_identifiers<I>(
    table: &Table,
    field: &'static str,
    parse: impl Fn(&FieldValue) -> Result<I, RegbookError>,
) -> Result<Vec<I>, PipelineError>
where
    I: Clone + Eq + Hash + Display,
{
    let mut first_seen: HashMap<I, usize> = HashMap::new();
    let mut ids = Vec::with_capacity(table.len());

    for row in table.rows() {
        let value = row.cells.value_or_empty(field);
        let id = parse(&value).map_err(|source| PipelineError::Row {
            sheet: table.name().to_string(),
            row: row.number,
            source,
        })?;
        if let Some(&first_row) = first_seen.get(&id) {
            return Err(PipelineError::DuplicateIdentifier {
                sheet: table.name().to_string(),
                kind: field,
                id: id.to_string(),
                first_row,
                row: row.number,
            });
        }
        first_seen.insert(id.clone(), row.number);
        ids.push(id);
    }
    Ok(ids)
}
