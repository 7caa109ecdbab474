use crate::error::ImportError;
use crate::load::read_err;
use arrow::{
    array::{ArrayRef, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

/// Read a structured-record file: a JSON array of flat objects. Column
/// order is first-seen key order; scalar values are stringified and JSON
/// null becomes a null cell.
pub fn load_json(path: &Path) -> Result<RecordBatch, ImportError> {
    let file = File::open(path).map_err(|e| read_err(path, e))?;
    let records: Vec<Map<String, Value>> =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| read_err(path, e))?;

    let mut names: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for record in &records {
        for key in record.keys() {
            if !index.contains_key(key) {
                index.insert(key.clone(), names.len());
                names.push(key.clone());
            }
        }
    }
    if names.is_empty() {
        return Ok(RecordBatch::new_empty(Arc::new(Schema::empty())));
    }

    let mut cells: Vec<Vec<Option<String>>> = vec![vec![None; records.len()]; names.len()];
    for (row, record) in records.iter().enumerate() {
        for (key, value) in record {
            if let Some(&col) = index.get(key) {
                cells[col][row] = scalar_text(value);
            }
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

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        // nested values are kept as their JSON text
        other => Some(other.to_string()),
    }
}
