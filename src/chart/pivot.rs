//! Pivot the nested totals into bucket-aligned series.
//!
//! Every series has exactly one value per bucket on the shared x-axis;
//! a bucket where the packet did not appear contributes 0. Stacked bar
//! traces need equal-length, aligned arrays.

use crate::aggregator::PacketTotals;
use std::collections::BTreeSet;

/// One packet name's values over the full bucket axis
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub packet_name: String,
    pub amounts: Vec<u64>,
    pub volumes_mb: Vec<f64>,
}

/// Shared x-axis plus one series per packet name (sorted by name)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PivotTable {
    pub buckets: Vec<String>,
    pub series: Vec<Series>,
}

impl PivotTable {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Sum of all series' amounts in each bucket
    pub fn bucket_amounts(&self) -> Vec<u64> {
        (0..self.buckets.len())
            .map(|i| {
                self.series
                    .iter()
                    .fold(0u64, |sum, s| sum.saturating_add(s.amounts[i]))
            })
            .collect()
    }
}

pub fn pivot(totals: &PacketTotals) -> PivotTable {
    let names: BTreeSet<&str> = totals
        .iter()
        .flat_map(|(_, cells)| cells.keys().map(String::as_str))
        .collect();

    let buckets: Vec<String> = totals.bucket_keys().map(str::to_string).collect();

    let series = names
        .into_iter()
        .map(|name| {
            let cells: Vec<_> = buckets
                .iter()
                .map(|bucket| totals.get(bucket, name).copied().unwrap_or_default())
                .collect();

            Series {
                packet_name: name.to_string(),
                amounts: cells.iter().map(|c| c.total_amount).collect(),
                volumes_mb: cells.iter().map(|c| c.volume_mb()).collect(),
            }
        })
        .collect();

    PivotTable { buckets, series }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::AggregateCell;

    #[test]
    fn test_zero_fill() {
        let mut totals = PacketTotals::new();
        totals.add("2024-01-01 00:01", "B", AggregateCell::new(2, 2_000_000));
        totals.add("2024-01-01 00:00", "A", AggregateCell::new(5, 500));
        totals.add("2024-01-01 00:02", "A", AggregateCell::new(1, 100));

        let table = pivot(&totals);

        assert_eq!(
            table.buckets,
            vec!["2024-01-01 00:00", "2024-01-01 00:01", "2024-01-01 00:02"]
        );
        assert_eq!(table.series.len(), 2);
        assert_eq!(table.series[0].packet_name, "A");
        assert_eq!(table.series[0].amounts, vec![5, 0, 1]);
        assert_eq!(table.series[1].packet_name, "B");
        assert_eq!(table.series[1].amounts, vec![0, 2, 0]);
        assert_eq!(table.series[1].volumes_mb, vec![0.0, 2.0, 0.0]);
        assert_eq!(table.bucket_amounts(), vec![5, 2, 1]);
    }

    #[test]
    fn test_empty() {
        let table = pivot(&PacketTotals::new());
        assert!(table.is_empty());
        assert!(table.buckets.is_empty());
    }
}
