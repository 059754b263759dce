//! Utility modules for configuration, error handling, and settings.

pub mod config;
pub mod error;
pub mod settings;

// Re-export commonly used error types for convenience
pub use error::{AggregateError, ChartError, OutputError, SelectionError, SettingsError, StoreError};
pub use settings::Settings;
