use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the grades report pipeline.
#[derive(Error, Debug)]
pub enum GradesError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A report or chart artifact could not be written.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The spreadsheet library could not open or decode a workbook.
    #[error("Failed to read spreadsheet {path}: {reason}")]
    SpreadsheetRead { path: PathBuf, reason: String },

    /// The sheet is structurally unusable, e.g. it has no results column.
    #[error("Invalid sheet layout: found {columns} columns, need at least {required}")]
    FileFormat { columns: usize, required: usize },

    /// The file path carries no extractable subject code.
    #[error("Cannot extract a subject code from {0}")]
    Metadata(PathBuf),

    /// A second file mapped to an already stored (period, subject, group).
    #[error("Duplicate results for subject {subject_code}, group {group} in period {call_period}")]
    DuplicateGroup {
        call_period: String,
        subject_code: String,
        group: String,
    },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the grades crates.
pub type Result<T> = std::result::Result<T, GradesError>;
