//! Summary statistics over aggregated totals.
//!
//! Used for log lines and the terminal summary table.

use super::totals::PacketTotals;
use crate::utils::config::BYTES_PER_MB;
use log::debug;
use std::collections::BTreeMap;

/// Grand totals for one packet name across every bucket
#[derive(Debug, Clone, PartialEq)]
pub struct PacketTotal {
    pub packet_name: String,
    pub total_amount: u64,
    pub total_bytes: u64,
    /// Number of buckets in which the packet appeared
    pub active_buckets: usize,
}

impl PacketTotal {
    pub fn volume_mb(&self) -> f64 {
        self.total_bytes as f64 / BYTES_PER_MB
    }
}

/// Traffic statistics for a whole mapping
#[derive(Debug, Clone, Default)]
pub struct TrafficSummary {
    pub bucket_count: usize,
    pub total_amount: u64,
    pub total_bytes: u64,

    /// Per-packet totals, highest amount first (ties by name)
    pub packets: Vec<PacketTotal>,

    /// Bucket with the highest amount, and that amount
    pub busiest_bucket: Option<(String, u64)>,
}

impl TrafficSummary {
    pub fn packet_count(&self) -> usize {
        self.packets.len()
    }

    pub fn volume_mb(&self) -> f64 {
        self.total_bytes as f64 / BYTES_PER_MB
    }

    /// Share of the total amount carried by one packet, in percent
    pub fn amount_share(&self, packet: &PacketTotal) -> f64 {
        if self.total_amount > 0 {
            (packet.total_amount as f64 / self.total_amount as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Get human-readable summary
    pub fn summary(&self) -> String {
        let busiest = match &self.busiest_bucket {
            Some((bucket, amount)) => format!("{} ({} packets)", bucket, amount),
            None => "n/a".to_string(),
        };
        format!(
            "Buckets: {} | Packet types: {} | Packets: {} | Volume: {:.3} MB | Busiest: {}",
            self.bucket_count,
            self.packet_count(),
            self.total_amount,
            self.volume_mb(),
            busiest
        )
    }
}

/// Compute summary statistics
pub fn summarize(totals: &PacketTotals) -> TrafficSummary {
    if totals.is_empty() {
        return TrafficSummary::default();
    }

    let mut per_packet: BTreeMap<&str, PacketTotal> = BTreeMap::new();
    let mut busiest: Option<(&str, u64)> = None;
    let mut total_amount = 0u64;
    let mut total_bytes = 0u64;

    for (bucket, cells) in totals.iter() {
        let bucket_amount = cells
            .values()
            .fold(0u64, |sum, c| sum.saturating_add(c.total_amount));

        // Strictly greater keeps the earliest bucket on ties
        if busiest.map_or(true, |(_, best)| bucket_amount > best) {
            busiest = Some((bucket, bucket_amount));
        }

        for (name, cell) in cells {
            let entry = per_packet.entry(name.as_str()).or_insert_with(|| PacketTotal {
                packet_name: name.clone(),
                total_amount: 0,
                total_bytes: 0,
                active_buckets: 0,
            });
            entry.total_amount = entry.total_amount.saturating_add(cell.total_amount);
            entry.total_bytes = entry.total_bytes.saturating_add(cell.total_bytes);
            entry.active_buckets += 1;

            total_amount = total_amount.saturating_add(cell.total_amount);
            total_bytes = total_bytes.saturating_add(cell.total_bytes);
        }
    }

    let mut packets: Vec<PacketTotal> = per_packet.into_values().collect();
    packets.sort_by(|a, b| {
        b.total_amount
            .cmp(&a.total_amount)
            .then_with(|| a.packet_name.cmp(&b.packet_name))
    });

    debug!("Summarized {} packet types over {} buckets", packets.len(), totals.len());

    TrafficSummary {
        bucket_count: totals.len(),
        total_amount,
        total_bytes,
        packets,
        busiest_bucket: busiest.map(|(b, a)| (b.to_string(), a)),
    }
}
