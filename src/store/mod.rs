//! Data access for the packet logger's SQLite database.
//!
//! This module handles:
//! - Opening the collector's database (read-only for analysis)
//! - Running the grouped bucket aggregation in SQL
//! - Loading raw joined events for in-process aggregation
//! - Creating the collector schema for fixtures

pub mod sqlite;
pub mod types;

// Re-export main types
pub use sqlite::{BatchRecord, PacketStore};
pub use types::{AggregateQuery, AggregateRow, DirectionFilter, PacketEvent, SortBy};
