// src/db/mod.rs
use crate::clean::date_parser::epoch_days_to_date;
use crate::config::DbConfig;
use crate::error::ImportError;
use arrow::{
    array::{Array, ArrayRef, Date32Array, Float64Array, StringArray},
    datatypes::{DataType, Schema},
    record_batch::RecordBatch,
    util::display::array_value_to_string,
};
use chrono::Datelike;
use mysql::{prelude::Queryable, Conn, OptsBuilder, Params, TxOpts, Value};
use tracing::{debug, error, info};

/// Name of the synthetic index column written when the index-label flag is
/// set.
pub const ROW_INDEX_COLUMN: &str = "row_index";

const OFFENDING_ROW_SAMPLE: usize = 5;

fn server_opts(cfg: &DbConfig) -> OptsBuilder {
    OptsBuilder::new()
        .ip_or_hostname(Some(cfg.host.clone()))
        .user(Some(cfg.user.clone()))
        .pass(Some(cfg.password.clone()))
}

/// Create the destination database if it does not exist. Failures are
/// logged and swallowed; the import itself surfaces connection errors.
pub fn ensure_database(cfg: &DbConfig) {
    let database = sanitize_identifier(&cfg.database);
    match Conn::new(server_opts(cfg)) {
        Ok(mut conn) => {
            match conn.query_drop(format!("CREATE DATABASE IF NOT EXISTS `{database}`")) {
                Ok(()) => info!(%database, "database checked/created"),
                Err(e) => error!(%database, error = %e, "creating database failed"),
            }
        }
        Err(e) => error!(error = %e, "connecting for database creation failed"),
    }
}

/// Open the one connection an import run uses.
pub fn connect(cfg: &DbConfig) -> Result<Conn, ImportError> {
    let opts = server_opts(cfg).db_name(Some(sanitize_identifier(&cfg.database)));
    Conn::new(opts).map_err(ImportError::DatabaseConnection)
}

pub fn table_exists(conn: &mut Conn, table: &str) -> mysql::Result<bool> {
    let found: Option<String> = conn.exec_first(
        "SELECT table_name FROM information_schema.tables \
         WHERE table_schema = DATABASE() AND table_name = ?",
        (table,),
    )?;
    Ok(found.is_some())
}

/// Create `table` with columns matching the cleaned schema, zero rows.
pub fn create_table(
    conn: &mut Conn,
    table: &str,
    schema: &Schema,
    with_row_index: bool,
) -> mysql::Result<()> {
    let mut columns: Vec<String> = Vec::with_capacity(schema.fields().len() + 1);
    if with_row_index {
        columns.push(format!("`{ROW_INDEX_COLUMN}` BIGINT"));
    }
    for field in schema.fields() {
        columns.push(format!(
            "`{}` {}",
            sanitize_identifier(field.name()),
            sql_column_type(field.data_type())
        ));
    }
    conn.query_drop(format!("CREATE TABLE `{}` ({})", table, columns.join(", ")))
}

/// Batches committed and rows written by a successful append.
#[derive(Debug)]
pub struct AppendOutcome {
    pub batches: usize,
    pub rows: usize,
}

/// Append every row of `batch` to `table` in fixed-size chunks, one
/// transaction per chunk. A failure aborts the remaining chunks only;
/// chunks committed before it stay committed.
pub fn append_rows(
    conn: &mut Conn,
    table: &str,
    batch: &RecordBatch,
    chunk_rows: usize,
    with_row_index: bool,
) -> Result<AppendOutcome, ImportError> {
    let chunk_rows = chunk_rows.max(1);
    let insert_sql = insert_statement(table, &batch.schema(), with_row_index);
    let total = batch.num_rows();

    let mut committed = 0usize;
    let mut offset = 0usize;
    while offset < total {
        let len = chunk_rows.min(total - offset);
        let result = insert_chunk(conn, &insert_sql, batch, offset, len, with_row_index);
        if let Err(e) = result {
            error!(
                table,
                batch = committed,
                rows = len,
                error = %e,
                "insert batch failed, aborting remaining batches"
            );
            log_offending_rows(batch, offset, len);
            return Err(ImportError::Insertion {
                table: table.to_string(),
                source: e,
            });
        }
        committed += 1;
        offset += len;
        debug!(table, batch = committed, rows = len, "batch committed");
    }

    Ok(AppendOutcome {
        batches: committed,
        rows: total,
    })
}

fn insert_chunk(
    conn: &mut Conn,
    insert_sql: &str,
    batch: &RecordBatch,
    offset: usize,
    len: usize,
    with_row_index: bool,
) -> mysql::Result<()> {
    let mut tx = conn.start_transaction(TxOpts::default())?;
    tx.exec_batch(
        insert_sql,
        (offset..offset + len).map(|row| row_params(batch, row, with_row_index)),
    )?;
    tx.commit()
}

fn insert_statement(table: &str, schema: &Schema, with_row_index: bool) -> String {
    let mut columns: Vec<String> = Vec::with_capacity(schema.fields().len() + 1);
    if with_row_index {
        columns.push(format!("`{ROW_INDEX_COLUMN}`"));
    }
    for field in schema.fields() {
        columns.push(format!("`{}`", sanitize_identifier(field.name())));
    }
    let placeholders = vec!["?"; columns.len()].join(", ");
    format!(
        "INSERT INTO `{}` ({}) VALUES ({})",
        table,
        columns.join(", "),
        placeholders
    )
}

fn row_params(batch: &RecordBatch, row: usize, with_row_index: bool) -> Params {
    let mut values = Vec::with_capacity(batch.num_columns() + 1);
    if with_row_index {
        values.push(Value::from(row as u64));
    }
    for col in batch.columns() {
        values.push(cell_value(col, row));
    }
    Params::from(values)
}

fn cell_value(col: &ArrayRef, row: usize) -> Value {
    if col.is_null(row) {
        return Value::NULL;
    }
    if let Some(arr) = col.as_any().downcast_ref::<StringArray>() {
        return Value::from(arr.value(row));
    }
    if let Some(arr) = col.as_any().downcast_ref::<Float64Array>() {
        return Value::from(arr.value(row));
    }
    if let Some(arr) = col.as_any().downcast_ref::<Date32Array>() {
        if let Some(date) = epoch_days_to_date(arr.value(row)) {
            if let Ok(year) = u16::try_from(date.year()) {
                return Value::Date(year, date.month() as u8, date.day() as u8, 0, 0, 0, 0);
            }
        }
        return Value::NULL;
    }
    match array_value_to_string(col.as_ref(), row) {
        Ok(text) => Value::from(text),
        Err(_) => Value::NULL,
    }
}

fn log_offending_rows(batch: &RecordBatch, offset: usize, len: usize) {
    let schema = batch.schema();
    for row in offset..offset + len.min(OFFENDING_ROW_SAMPLE) {
        let rendered: Vec<String> = schema
            .fields()
            .iter()
            .zip(batch.columns())
            .map(|(field, col)| {
                let text = if col.is_null(row) {
                    "NULL".to_string()
                } else {
                    array_value_to_string(col.as_ref(), row).unwrap_or_else(|_| "?".into())
                };
                format!("{}={}", field.name(), text)
            })
            .collect();
        error!(row, "offending row: {}", rendered.join(", "));
    }
}

/// Restrict a name to a safe SQL identifier.
pub fn sanitize_identifier(name: &str) -> String {
    let mut out: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.is_empty() {
        out.push('t');
    }
    out
}

fn sql_column_type(data_type: &DataType) -> &'static str {
    match data_type {
        DataType::Float64 => "DOUBLE",
        DataType::Date32 => "DATE",
        _ => "TEXT",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::Field;
    use std::sync::Arc;

    #[test]
    fn sanitizes_identifiers() {
        assert_eq!(sanitize_identifier("JEOPARDY_CSV"), "jeopardy_csv");
        assert_eq!(sanitize_identifier("my-file name"), "my_file_name");
        assert_eq!(sanitize_identifier(""), "t");
    }

    #[test]
    fn maps_column_types() {
        assert_eq!(sql_column_type(&DataType::Float64), "DOUBLE");
        assert_eq!(sql_column_type(&DataType::Date32), "DATE");
        assert_eq!(sql_column_type(&DataType::Utf8), "TEXT");
    }

    #[test]
    fn builds_insert_statement() {
        let schema = Schema::new(vec![
            Field::new("value", DataType::Float64, true),
            Field::new("category", DataType::Utf8, true),
        ]);
        assert_eq!(
            insert_statement("quiz", &schema, false),
            "INSERT INTO `quiz` (`value`, `category`) VALUES (?, ?)"
        );
        assert_eq!(
            insert_statement("quiz", &schema, true),
            "INSERT INTO `quiz` (`row_index`, `value`, `category`) VALUES (?, ?, ?)"
        );
    }

    #[test]
    fn maps_cell_values() {
        let text = Arc::new(StringArray::from(vec![Some("abc"), None])) as ArrayRef;
        assert_eq!(cell_value(&text, 0), Value::Bytes(b"abc".to_vec()));
        assert_eq!(cell_value(&text, 1), Value::NULL);

        let nums = Arc::new(Float64Array::from(vec![Some(2.5)])) as ArrayRef;
        assert_eq!(cell_value(&nums, 0), Value::Double(2.5));

        let dates = Arc::new(Date32Array::from(vec![Some(18262)])) as ArrayRef;
        assert_eq!(cell_value(&dates, 0), Value::Date(2020, 1, 1, 0, 0, 0, 0));
    }
}
