//! The bucket → packet name → cell mapping.
//!
//! Cells exist only for (bucket, packet) pairs that had traffic. A missing
//! cell means zero, and a bucket with no cells is absent rather than empty.

use super::bucket::{bucket_key, Granularity};
use crate::store::{AggregateRow, DirectionFilter, PacketEvent};
use crate::utils::config::BYTES_PER_MB;
use crate::utils::error::AggregateError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Totals for one packet name inside one bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "CellRepr", from = "CellRepr")]
pub struct AggregateCell {
    /// Sum of `amount`
    pub total_amount: u64,
    /// Sum of `amount * size_bytes`
    pub total_bytes: u64,
}

impl AggregateCell {
    pub fn new(total_amount: u64, total_bytes: u64) -> Self {
        Self {
            total_amount,
            total_bytes,
        }
    }

    /// Volume in decimal megabytes
    pub fn volume_mb(&self) -> f64 {
        self.total_bytes as f64 / BYTES_PER_MB
    }

    /// Cell-wise sum, clamped at `u64::MAX`
    pub fn saturating_add(self, other: AggregateCell) -> AggregateCell {
        AggregateCell::new(
            self.total_amount.saturating_add(other.total_amount),
            self.total_bytes.saturating_add(other.total_bytes),
        )
    }
}

// Serialized form carries the derived megabyte figure for report readers.
#[derive(Serialize, Deserialize)]
struct CellRepr {
    total_amount: u64,
    total_bytes: u64,
    total_volume_mb: f64,
}

impl From<AggregateCell> for CellRepr {
    fn from(cell: AggregateCell) -> Self {
        Self {
            total_amount: cell.total_amount,
            total_bytes: cell.total_bytes,
            total_volume_mb: cell.volume_mb(),
        }
    }
}

impl From<CellRepr> for AggregateCell {
    fn from(repr: CellRepr) -> Self {
        Self::new(repr.total_amount, repr.total_bytes)
    }
}

/// Nested mapping: bucket → packet name → cell, both levels sorted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PacketTotals {
    buckets: BTreeMap<String, BTreeMap<String, AggregateCell>>,
}

impl PacketTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cell, summing with any existing cell for the same pair
    ///
    /// Sums saturate at `u64::MAX` instead of wrapping.
    pub fn add(&mut self, bucket: impl Into<String>, packet_name: impl Into<String>, cell: AggregateCell) {
        let slot = self
            .buckets
            .entry(bucket.into())
            .or_default()
            .entry(packet_name.into())
            .or_default();
        *slot = slot.saturating_add(cell);
    }

    pub fn get(&self, bucket: &str, packet_name: &str) -> Option<&AggregateCell> {
        self.buckets.get(bucket)?.get(packet_name)
    }

    /// Cells of one bucket, keyed by packet name
    pub fn bucket(&self, bucket: &str) -> Option<&BTreeMap<String, AggregateCell>> {
        self.buckets.get(bucket)
    }

    /// Bucket keys in ascending (chronological) order
    pub fn bucket_keys(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, AggregateCell>)> {
        self.buckets.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of buckets with traffic
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of (bucket, packet) cells
    pub fn cell_count(&self) -> usize {
        self.buckets.values().map(BTreeMap::len).sum()
    }

    /// Cell-wise sum of two mappings
    pub fn merged(&self, other: &PacketTotals) -> PacketTotals {
        let mut out = self.clone();
        for (bucket, cells) in other.iter() {
            for (name, cell) in cells {
                out.add(bucket, name.as_str(), *cell);
            }
        }
        out
    }
}

/// Build the mapping from aggregation query rows
///
/// Row order is irrelevant; the mapping is sorted on both levels.
pub fn build_totals(rows: &[AggregateRow]) -> PacketTotals {
    let mut totals = PacketTotals::new();
    for row in rows {
        totals.add(
            row.time_period.as_str(),
            row.packet_name.as_str(),
            AggregateCell::new(row.total_amount, row.total_bytes),
        );
    }

    debug!(
        "Built totals: {} buckets, {} cells from {} rows",
        totals.len(),
        totals.cell_count(),
        rows.len()
    );
    totals
}

/// Aggregate raw events in-process
///
/// Produces the same mapping as the SQL aggregation over the same events.
/// Events that fail the direction filter are skipped.
///
/// # Errors
/// * `AggregateError::TimestampOutOfRange` - a timestamp chrono cannot represent
pub fn aggregate_events(
    events: &[PacketEvent],
    granularity: Granularity,
    filter: DirectionFilter,
) -> Result<PacketTotals, AggregateError> {
    let mut totals = PacketTotals::new();

    for event in events.iter().filter(|e| filter.matches(e.outgoing)) {
        let bucket = bucket_key(event.collected_at, granularity)
            .ok_or(AggregateError::TimestampOutOfRange(event.collected_at))?;

        totals.add(
            bucket,
            event.packet_name.as_str(),
            AggregateCell::new(event.amount, event.amount.saturating_mul(event.size_bytes)),
        );
    }

    Ok(totals)
}
