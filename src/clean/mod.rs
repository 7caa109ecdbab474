// src/clean/mod.rs
pub mod columns;
pub mod convert;
pub mod date_parser;
pub mod dedup;
pub mod trimming;
pub mod utils;

use arrow::{error::ArrowError, record_batch::RecordBatch};
use tracing::debug;

/// Normalization pipeline applied to every freshly loaded batch:
/// 1) drop exact-duplicate rows,
/// 2) normalize column names (trim, lowercase, spaces → underscores),
/// 3) trim text cells and strip non-ASCII (empty cells become null),
/// 4) drop columns with more than half the rows missing,
/// 5) coerce `value` to numbers, `air_date` to dates.
///
/// Surviving columns keep their order; the type coercions replace columns
/// in place.
pub fn clean_batch(raw: &RecordBatch) -> Result<RecordBatch, ArrowError> {
    if raw.num_columns() == 0 {
        return Ok(raw.clone());
    }
    let batch = dedup::drop_duplicate_rows(raw)?;
    debug!(rows = batch.num_rows(), "deduplicated");
    let batch = columns::normalize_column_names(&batch)?;
    let batch = trimming::trim_text_columns(&batch)?;
    let batch = columns::drop_sparse_columns(&batch)?;
    convert::convert_special_columns(&batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, ArrayRef, Date32Array, Float64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;

    fn raw_batch(columns: Vec<(&str, Vec<Option<&str>>)>) -> RecordBatch {
        let fields: Vec<Field> = columns
            .iter()
            .map(|(name, _)| Field::new(*name, DataType::Utf8, true))
            .collect();
        let arrays: Vec<ArrayRef> = columns
            .into_iter()
            .map(|(_, vals)| Arc::new(StringArray::from(vals)) as ArrayRef)
            .collect();
        RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).expect("test batch")
    }

    #[test]
    fn cleans_value_and_air_date_example() -> Result<(), ArrowError> {
        let raw = raw_batch(vec![
            ("Value", vec![Some("$1,000"), Some("bad")]),
            ("Air Date", vec![Some("2020-01-01"), Some("not-a-date")]),
        ]);

        let out = clean_batch(&raw)?;
        assert_eq!(
            out.schema().fields().iter().map(|f| f.name().as_str()).collect::<Vec<_>>(),
            vec!["value", "air_date"]
        );

        let value = out.column(0).as_any().downcast_ref::<Float64Array>().unwrap();
        assert_eq!(value.value(0), 1000.0);
        assert!(value.is_null(1));

        let air_date = out.column(1).as_any().downcast_ref::<Date32Array>().unwrap();
        assert_eq!(
            date_parser::epoch_days_to_date(air_date.value(0)).unwrap().to_string(),
            "2020-01-01"
        );
        assert!(air_date.is_null(1));
        Ok(())
    }

    #[test]
    fn removes_duplicates_before_anything_else() -> Result<(), ArrowError> {
        let raw = raw_batch(vec![
            ("category", vec![Some("HISTORY"), Some("HISTORY"), Some("SCIENCE")]),
            ("question", vec![Some("q1"), Some("q1"), Some("q2")]),
        ]);

        let out = clean_batch(&raw)?;
        assert_eq!(out.num_rows(), 2);
        Ok(())
    }

    #[test]
    fn column_order_is_stable() -> Result<(), ArrowError> {
        let raw = raw_batch(vec![
            ("B Col", vec![Some("1"), Some("2")]),
            ("A Col", vec![Some("3"), Some("4")]),
            ("Value", vec![Some("5"), Some("6")]),
        ]);

        let out = clean_batch(&raw)?;
        assert_eq!(
            out.schema().fields().iter().map(|f| f.name().as_str()).collect::<Vec<_>>(),
            vec!["b_col", "a_col", "value"]
        );
        Ok(())
    }

    #[test]
    fn sparse_column_is_dropped() -> Result<(), ArrowError> {
        let raw = raw_batch(vec![
            ("keep", vec![Some("a"), Some("b"), Some("c")]),
            ("mostly empty", vec![Some("x"), None, Some("   ")]),
        ]);

        // "   " trims to empty and counts as missing, so 2 of 3 rows are null
        let out = clean_batch(&raw)?;
        assert_eq!(out.num_columns(), 1);
        assert_eq!(out.schema().field(0).name(), "keep");
        Ok(())
    }

    #[test]
    fn cleaning_typed_output_again_is_a_noop() -> Result<(), ArrowError> {
        let raw = raw_batch(vec![
            ("Value", vec![Some("$100"), Some("$200")]),
            ("Round", vec![Some("Jeopardy!"), Some("Double Jeopardy!")]),
        ]);

        let once = clean_batch(&raw)?;
        let twice = clean_batch(&once)?;
        assert_eq!(once.schema(), twice.schema());
        assert_eq!(once.num_rows(), twice.num_rows());

        let a = once.column(0).as_any().downcast_ref::<Float64Array>().unwrap();
        let b = twice.column(0).as_any().downcast_ref::<Float64Array>().unwrap();
        assert_eq!(a.value(0), b.value(0));
        assert_eq!(a.value(1), b.value(1));
        Ok(())
    }

    #[test]
    fn zero_row_input_stays_empty() -> Result<(), ArrowError> {
        let raw = raw_batch(vec![("col", vec![])]);
        let out = clean_batch(&raw)?;
        assert_eq!(out.num_rows(), 0);
        assert_eq!(out.num_columns(), 1);
        Ok(())
    }
}
