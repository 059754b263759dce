//! Aggregation of packet batches into time-bucketed totals.
//!
//! This module transforms store rows (or raw events) into:
//! - Bucket keys at minute or hour granularity
//! - The bucket → packet name → totals mapping
//! - Summary statistics for reporting

pub mod bucket;
pub mod metrics;
pub mod totals;

// Re-export main types and functions
pub use bucket::{bucket_key, Granularity};
pub use metrics::{summarize, PacketTotal, TrafficSummary};
pub use totals::{aggregate_events, build_totals, AggregateCell, PacketTotals};
