use crate::error::ImportError;
use crate::load::read_err;
use arrow::{
    csv::{reader::Format, ReaderBuilder},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

const INFER_ROWS: usize = 100;
const READ_BATCH_ROWS: usize = 8192;

/// Read a delimited-text file with a header row. Every column is read as
/// nullable text; arrow's inference is only used to discover the header.
pub fn load_csv(path: &Path) -> Result<RecordBatch, ImportError> {
    let mut file = File::open(path).map_err(|e| read_err(path, e))?;
    let format = Format::default().with_header(true);
    let (inferred, _) = format
        .infer_schema(&mut file, Some(INFER_ROWS))
        .map_err(|e| read_err(path, e))?;

    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .map(|f| Field::new(f.name(), DataType::Utf8, true))
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let file = File::open(path).map_err(|e| read_err(path, e))?;
    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_batch_size(READ_BATCH_ROWS)
        .build(file)
        .map_err(|e| read_err(path, e))?;

    let mut batches = Vec::new();
    for batch in reader {
        batches.push(batch.map_err(|e| read_err(path, e))?);
    }
    if batches.is_empty() {
        return Ok(RecordBatch::new_empty(schema));
    }
    arrow::compute::concat_batches(&schema, &batches).map_err(|e| read_err(path, e))
}
