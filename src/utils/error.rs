//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Rejected user selections (prompt answers or flag values)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Invalid input. Please enter 'all', 'outgoing', or 'incoming'.")]
    InvalidFilter(String),

    #[error("Invalid input. Please enter 'minute' or 'hour'.")]
    InvalidGranularity(String),

    #[error("Invalid display mode '{0}'. Please enter 'amount' or 'size'.")]
    InvalidMode(String),

    #[error("Invalid sort mode '{0}'. Please enter 'time', 'amount', or 'size'.")]
    InvalidSort(String),

    #[error("Failed to read selection: {0}")]
    Io(String),
}

/// Errors that can occur while talking to the packet store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Packet database not found: {0}")]
    NotFound(String),

    #[error("Invalid value in column {column}: {value}")]
    InvalidValue { column: &'static str, value: i64 },
}

/// Errors that can occur during in-process aggregation
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Timestamp out of range: {0} ms")]
    TimestampOutOfRange(i64),
}

/// Errors that can occur during chart generation
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Failed to serialize chart figure: {0}")]
    Figure(#[from] serde_json::Error),

    #[error("Invalid chart dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
}

/// Errors that can occur while loading the settings file
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to read file {path}: {source}")]
    ReadFailed {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("Failed to launch viewer: {0}")]
    ViewerFailed(String),
}
