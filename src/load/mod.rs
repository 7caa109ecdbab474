// src/load/mod.rs
mod csv;
mod json;
mod sheet;

use crate::error::ImportError;
use arrow::record_batch::RecordBatch;
use std::fmt;
use std::path::Path;

/// Declared input format. Parsing the tag happens before any file I/O, so
/// a bad tag never touches the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    DelimitedText,
    StructuredRecord,
    Spreadsheet,
}

impl FileType {
    pub fn parse(tag: &str) -> Result<Self, ImportError> {
        match tag {
            "delimited-text" => Ok(FileType::DelimitedText),
            "structured-record" => Ok(FileType::StructuredRecord),
            "spreadsheet" => Ok(FileType::Spreadsheet),
            other => Err(ImportError::UnsupportedFileType(other.to_string())),
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            FileType::DelimitedText => "delimited-text",
            FileType::StructuredRecord => "structured-record",
            FileType::Spreadsheet => "spreadsheet",
        };
        f.write_str(tag)
    }
}

/// Read `path` into an all-text record batch. Column types are settled
/// later by the cleaner.
pub fn load_file(path: &Path, file_type: FileType) -> Result<RecordBatch, ImportError> {
    match file_type {
        FileType::DelimitedText => csv::load_csv(path),
        FileType::StructuredRecord => json::load_json(path),
        FileType::Spreadsheet => sheet::load_sheet(path),
    }
}

pub(crate) fn read_err(
    path: &Path,
    source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> ImportError {
    ImportError::FileRead {
        path: path.to_path_buf(),
        source: source.into(),
    }
}
