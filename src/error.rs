use std::path::PathBuf;
use thiserror::Error;

/// Everything that can terminate an import call. Each kind is reported to
/// the operator and aborts the current call; there is no retry.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("unsupported file type: {0:?}")]
    UnsupportedFileType(String),

    #[error("failed to read {}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The cleaned dataset had no rows (or no surviving columns); nothing
    /// was written to the database.
    #[error("no data after cleaning")]
    EmptyDataset,

    #[error("database connection failed")]
    DatabaseConnection(#[source] mysql::Error),

    /// A write to the destination table failed. Batches committed before
    /// the failure stay committed.
    #[error("writing to table `{table}` failed")]
    Insertion {
        table: String,
        #[source]
        source: mysql::Error,
    },

    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),
}
