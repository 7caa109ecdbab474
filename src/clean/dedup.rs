use arrow::{
    array::{Array, ArrayRef, BooleanArray, StringArray},
    compute::filter_record_batch,
    error::ArrowError,
    record_batch::RecordBatch,
    util::display::array_value_to_string,
};
use std::collections::HashSet;

/// Drop exact-duplicate rows, keeping the first occurrence. Row order is
/// otherwise preserved.
pub fn drop_duplicate_rows(batch: &RecordBatch) -> Result<RecordBatch, ArrowError> {
    let mut seen: HashSet<Vec<Option<String>>> = HashSet::with_capacity(batch.num_rows());
    let mut keep = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        keep.push(seen.insert(row_key(batch, row)?));
    }

    filter_record_batch(batch, &BooleanArray::from(keep))
}

fn row_key(batch: &RecordBatch, row: usize) -> Result<Vec<Option<String>>, ArrowError> {
    batch.columns().iter().map(|col| cell_key(col, row)).collect()
}

fn cell_key(col: &ArrayRef, row: usize) -> Result<Option<String>, ArrowError> {
    if col.is_null(row) {
        return Ok(None);
    }
    if let Some(sarr) = col.as_any().downcast_ref::<StringArray>() {
        return Ok(Some(sarr.value(row).to_string()));
    }
    array_value_to_string(col.as_ref(), row).map(Some)
}
