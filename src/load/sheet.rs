use crate::error::ImportError;
use crate::load::read_err;
use arrow::{
    array::{ArrayRef, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::Timelike;
use std::path::Path;
use std::sync::Arc;

/// Read the first worksheet of a spreadsheet. The first row is the header;
/// empty cells become null and date cells are rendered ISO so the cleaner
/// can re-parse them alongside the other formats.
pub fn load_sheet(path: &Path) -> Result<RecordBatch, ImportError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| read_err(path, e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| read_err(path, "workbook has no worksheets"))?
        .map_err(|e| read_err(path, e))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(RecordBatch::new_empty(Arc::new(Schema::empty())));
    };
    let names: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| cell_text(cell).unwrap_or_else(|| format!("column_{i}")))
        .collect();
    if names.is_empty() {
        return Ok(RecordBatch::new_empty(Arc::new(Schema::empty())));
    }

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
    for row in rows {
        for (col, slot) in cells.iter_mut().enumerate() {
            slot.push(row.get(col).and_then(cell_text));
        }
    }

    let fields: Vec<Field> = names
        .iter()
        .map(|name| Field::new(name, DataType::Utf8, true))
        .collect();
    let arrays: Vec<ArrayRef> = cells
        .into_iter()
        .map(|col| Arc::new(StringArray::from(col)) as ArrayRef)
        .collect();

    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).map_err(|e| read_err(path, e))
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => {
            // spreadsheets store integers as floats
            if f.fract() == 0.0 && f.abs() < 1e15 {
                Some(format!("{}", *f as i64))
            } else {
                Some(f.to_string())
            }
        }
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => dt.as_datetime().map(|ndt| {
            if ndt.hour() == 0 && ndt.minute() == 0 && ndt.second() == 0 {
                ndt.date().format("%Y-%m-%d").to_string()
            } else {
                ndt.format("%Y-%m-%d %H:%M:%S").to_string()
            }
        }),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
    }
}
