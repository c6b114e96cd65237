use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the bloglist library crates.
#[derive(Error, Debug)]
pub enum BlogError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A maximum was requested over an empty sequence of records.
    #[error("{operation} requires at least one blog")]
    EmptyInput { operation: &'static str },

    /// A record entering the aggregation engine is missing a usable field.
    #[error("Malformed blog record at index {index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    /// A request payload failed a field-level rule.
    #[error("{0}")]
    Validation(String),

    /// A document with the given id does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// A uniqueness rule was violated (e.g. a taken username).
    #[error("{0}")]
    Conflict(String),

    /// An identifier string is not in the store's id format.
    #[error("malformatted id: {0}")]
    MalformedId(String),

    /// The data file or directory does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// No `.json` / `.jsonl` files were found under the given directory.
    #[error("No blog data files found in {0}")]
    NoDataFiles(PathBuf),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the bloglist crates.
pub type Result<T> = std::result::Result<T, BlogError>;
