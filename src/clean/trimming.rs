use crate::clean::utils::clean_cell;
use arrow::{
    array::{Array, ArrayRef, StringArray},
    error::ArrowError,
    record_batch::RecordBatch,
};
use std::sync::Arc;

/// Apply cell cleaning to every text column: trim whitespace, strip
/// non-ASCII, and null out cells that end up empty.
pub fn trim_text_columns(batch: &RecordBatch) -> Result<RecordBatch, ArrowError> {
    let mut cols = Vec::with_capacity(batch.num_columns());
    for arr in batch.columns() {
        if let Some(sarr) = arr.as_any().downcast_ref::<StringArray>() {
            let trimmed: StringArray = sarr.iter().map(|opt| opt.and_then(clean_cell)).collect();
            cols.push(Arc::new(trimmed) as ArrayRef);
        } else {
            cols.push(arr.clone());
        }
    }

    RecordBatch::try_new(batch.schema(), cols)
}
