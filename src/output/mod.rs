//! Output writers for charts and totals reports.
//!
//! This module handles writing data to disk in various formats:
//! - HTML and SVG charts
//! - JSON totals reports
//! - Scratch pages opened in the system viewer

pub mod file;
pub mod json;
pub mod viewer;

// Re-export main functions
pub use file::{validate_path, write_artifact};
pub use json::{read_report, write_report, TotalsReport};
pub use viewer::{open_in_viewer, show_html, write_scratch_page};
