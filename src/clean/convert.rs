use crate::clean::date_parser;
use arrow::{
    array::{Array, ArrayRef, Date32Builder, Float64Builder, StringArray},
    datatypes::{DataType, Field, Schema},
    error::ArrowError,
    record_batch::RecordBatch,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

static CURRENCY: Lazy<Regex> = Lazy::new(|| Regex::new(r"[$,]").expect("currency pattern"));

/// Coerce the well-known columns to their final types: `value` becomes
/// `Float64` (currency symbols and thousands separators stripped) and
/// `air_date` becomes `Date32`. Unparseable cells become null. Columns
/// stay in place.
pub fn convert_special_columns(batch: &RecordBatch) -> Result<RecordBatch, ArrowError> {
    if batch.num_columns() == 0 {
        return Ok(batch.clone());
    }
    let mut fields: Vec<Field> = Vec::with_capacity(batch.num_columns());
    let mut cols: Vec<ArrayRef> = Vec::with_capacity(batch.num_columns());

    for (field, arr) in batch.schema().fields().iter().zip(batch.columns()) {
        match (field.name().as_str(), arr.as_any().downcast_ref::<StringArray>()) {
            ("value", Some(sarr)) => {
                let mut b = Float64Builder::with_capacity(sarr.len());
                for opt in sarr.iter() {
                    b.append_option(opt.and_then(parse_money));
                }
                fields.push(Field::new("value", DataType::Float64, true));
                cols.push(Arc::new(b.finish()) as ArrayRef);
            }
            ("air_date", Some(sarr)) => {
                let mut b = Date32Builder::with_capacity(sarr.len());
                for opt in sarr.iter() {
                    b.append_option(opt.and_then(date_parser::parse_date_days));
                }
                fields.push(Field::new("air_date", DataType::Date32, true));
                cols.push(Arc::new(b.finish()) as ArrayRef);
            }
            _ => {
                fields.push(field.as_ref().clone());
                cols.push(arr.clone());
            }
        }
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), cols)
}

fn parse_money(s: &str) -> Option<f64> {
    CURRENCY.replace_all(s, "").trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Date32Array, Float64Array};

    #[test]
    fn parse_money_strips_currency() {
        assert_eq!(parse_money("$1,000"), Some(1000.0));
        assert_eq!(parse_money("$2,500.50"), Some(2500.5));
        assert_eq!(parse_money("400"), Some(400.0));
        assert_eq!(parse_money("bad"), None);
        assert_eq!(parse_money("None"), None);
    }

    #[test]
    fn coerces_value_and_air_date() -> Result<(), ArrowError> {
        let schema = Arc::new(Schema::new(vec![
            Field::new("value", DataType::Utf8, true),
            Field::new("air_date", DataType::Utf8, true),
            Field::new("category", DataType::Utf8, true),
        ]));
        let value = StringArray::from(vec![Some("$1,000"), Some("bad")]);
        let air_date = StringArray::from(vec![Some("2020-01-01"), Some("not-a-date")]);
        let category = StringArray::from(vec![Some("HISTORY"), Some("SCIENCE")]);
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(value) as ArrayRef,
                Arc::new(air_date) as ArrayRef,
                Arc::new(category) as ArrayRef,
            ],
        )?;

        let out = convert_special_columns(&batch)?;
        assert_eq!(out.schema().field(0).data_type(), &DataType::Float64);
        assert_eq!(out.schema().field(1).data_type(), &DataType::Date32);
        assert_eq!(out.schema().field(2).data_type(), &DataType::Utf8);

        let value = out.column(0).as_any().downcast_ref::<Float64Array>().unwrap();
        assert_eq!(value.value(0), 1000.0);
        assert!(value.is_null(1));

        let air_date = out.column(1).as_any().downcast_ref::<Date32Array>().unwrap();
        assert_eq!(air_date.value(0), 18262);
        assert!(air_date.is_null(1));
        Ok(())
    }

    #[test]
    fn typed_columns_pass_through() -> Result<(), ArrowError> {
        // a second conversion pass must not touch already-coerced columns
        let schema = Arc::new(Schema::new(vec![Field::new("value", DataType::Float64, true)]));
        let col = Float64Array::from(vec![Some(1.0), None]);
        let batch = RecordBatch::try_new(schema, vec![Arc::new(col) as ArrayRef])?;

        let out = convert_special_columns(&batch)?;
        assert_eq!(out.schema().field(0).data_type(), &DataType::Float64);
        assert_eq!(out.num_rows(), 2);
        Ok(())
    }
}
