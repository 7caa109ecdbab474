use crate::clean::utils::normalize_column_name;
use arrow::{
    datatypes::{Field, Schema},
    error::ArrowError,
    record_batch::RecordBatch,
};
use std::sync::Arc;
use tracing::debug;

/// Rewrite the schema with normalized column names. Arrays are untouched.
pub fn normalize_column_names(batch: &RecordBatch) -> Result<RecordBatch, ArrowError> {
    let fields: Vec<Field> = batch
        .schema()
        .fields()
        .iter()
        .map(|f| Field::new(normalize_column_name(f.name()), f.data_type().clone(), f.is_nullable()))
        .collect();

    RecordBatch::try_new(Arc::new(Schema::new(fields)), batch.columns().to_vec())
}

/// Drop columns where more than half the rows are missing. Surviving
/// columns keep their order. If nothing survives the dataset is empty.
pub fn drop_sparse_columns(batch: &RecordBatch) -> Result<RecordBatch, ArrowError> {
    let rows = batch.num_rows();
    let mut fields: Vec<Field> = Vec::with_capacity(batch.num_columns());
    let mut cols = Vec::with_capacity(batch.num_columns());
    for (field, col) in batch.schema().fields().iter().zip(batch.columns()) {
        if col.null_count() * 2 > rows {
            debug!(column = %field.name(), nulls = col.null_count(), rows, "dropping sparse column");
            continue;
        }
        fields.push(field.as_ref().clone());
        cols.push(col.clone());
    }

    if fields.is_empty() {
        return Ok(RecordBatch::new_empty(Arc::new(Schema::empty())));
    }
    RecordBatch::try_new(Arc::new(Schema::new(fields)), cols)
}
