// src/import/mod.rs
use crate::clean;
use crate::config::Config;
use crate::db;
use crate::error::ImportError;
use crate::load::{self, FileType};
use arrow::{record_batch::RecordBatch, util::display::array_value_to_string};
use mysql::Conn;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

pub const DEFAULT_BATCH_SIZE: usize = 5000;

const PREVIEW_ROWS: usize = 5;

/// What a completed import did.
#[derive(Debug)]
pub struct ImportReport {
    pub table: String,
    /// Rows in the file as loaded.
    pub rows_read: usize,
    /// Rows written after cleaning.
    pub rows_loaded: usize,
    pub columns: usize,
    pub batches: usize,
    pub table_created: bool,
    pub elapsed: Duration,
}

/// Destination table for a file: the stem, lowercased and restricted to a
/// safe SQL identifier.
pub fn table_name_for(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    db::sanitize_identifier(&stem)
}

/// Load `file_name` from the data directory, clean it, and append it to
/// its table, creating the table on first import.
///
/// Runs start → file-loaded → cleaned → table-ensured → rows-appended,
/// bailing out at the first failed stage. Batches committed before an
/// insertion failure stay committed.
#[instrument(level = "info", skip(cfg, conn), fields(file = %file_name, ty = %file_type))]
pub fn import_file(
    cfg: &Config,
    conn: &mut Conn,
    file_name: &str,
    file_type: &str,
    batch_size: usize,
) -> Result<ImportReport, ImportError> {
    let start = Instant::now();

    // the tag is validated before any file I/O
    let file_type = FileType::parse(file_type)?;
    let path = cfg.data_dir.join(file_name);

    let raw = load::load_file(&path, file_type)?;
    info!(rows = raw.num_rows(), columns = raw.num_columns(), "file loaded");

    let cleaned = clean::clean_batch(&raw)?;
    if cleaned.num_rows() == 0 {
        info!("no data after cleaning");
        return Err(ImportError::EmptyDataset);
    }
    info!(rows = cleaned.num_rows(), columns = cleaned.num_columns(), "cleaned");
    log_preview(&cleaned);

    let table = table_name_for(file_name);
    let exists = db::table_exists(conn, &table).map_err(|e| ImportError::Insertion {
        table: table.clone(),
        source: e,
    })?;
    if !exists {
        db::create_table(conn, &table, &cleaned.schema(), cfg.use_index_label).map_err(|e| {
            ImportError::Insertion {
                table: table.clone(),
                source: e,
            }
        })?;
        info!(table = %table, "table created");
    }

    let outcome = db::append_rows(conn, &table, &cleaned, batch_size, cfg.use_index_label)?;
    info!(
        table = %table,
        rows = outcome.rows,
        batches = outcome.batches,
        "rows appended"
    );

    Ok(ImportReport {
        table,
        rows_read: raw.num_rows(),
        rows_loaded: outcome.rows,
        columns: cleaned.num_columns(),
        batches: outcome.batches,
        table_created: !exists,
        elapsed: start.elapsed(),
    })
}

fn log_preview(batch: &RecordBatch) {
    let schema = batch.schema();
    for row in 0..batch.num_rows().min(PREVIEW_ROWS) {
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
        debug!(row, "{}", rendered.join(", "));
    }
}
