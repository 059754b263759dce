//! Types exchanged with the packet store.

use crate::aggregator::Granularity;
use crate::utils::error::SelectionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which packets to include, based on the `packet_bound.outgoing` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionFilter {
    #[default]
    All,
    Outgoing,
    Incoming,
}

impl DirectionFilter {
    /// Value `packet_bound.outgoing` must equal, or `None` for no predicate
    pub fn outgoing_flag(self) -> Option<bool> {
        match self {
            DirectionFilter::All => None,
            DirectionFilter::Outgoing => Some(true),
            DirectionFilter::Incoming => Some(false),
        }
    }

    pub fn matches(self, outgoing: bool) -> bool {
        self.outgoing_flag().map_or(true, |flag| flag == outgoing)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DirectionFilter::All => "all",
            DirectionFilter::Outgoing => "outgoing",
            DirectionFilter::Incoming => "incoming",
        }
    }
}

impl fmt::Display for DirectionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DirectionFilter {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(DirectionFilter::All),
            "outgoing" => Ok(DirectionFilter::Outgoing),
            "incoming" => Ok(DirectionFilter::Incoming),
            other => Err(SelectionError::InvalidFilter(other.to_string())),
        }
    }
}

/// Order in which aggregate rows are emitted
///
/// Only affects `AggregateRow` order; the pivoted totals are identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Bucket ascending
    #[default]
    Time,
    /// Total amount descending
    Amount,
    /// Total volume descending
    Size,
}

impl SortBy {
    pub(crate) fn order_clause(self) -> &'static str {
        match self {
            SortBy::Time => "ORDER BY time_period ASC, packet_name ASC",
            SortBy::Amount => "ORDER BY total_amount DESC, time_period ASC, packet_name ASC",
            SortBy::Size => "ORDER BY total_bytes DESC, time_period ASC, packet_name ASC",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortBy::Time => "time",
            SortBy::Amount => "amount",
            SortBy::Size => "size",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "time" => Ok(SortBy::Time),
            "amount" => Ok(SortBy::Amount),
            "size" | "volume" => Ok(SortBy::Size),
            other => Err(SelectionError::InvalidSort(other.to_string())),
        }
    }
}

/// Parameters of one aggregation query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateQuery {
    pub granularity: Granularity,
    pub filter: DirectionFilter,
    pub sort_by: SortBy,
}

impl AggregateQuery {
    pub fn new(granularity: Granularity, filter: DirectionFilter) -> Self {
        Self {
            granularity,
            filter,
            sort_by: SortBy::Time,
        }
    }

    pub fn with_sort(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }
}

/// One `batched_packets` row joined with its `packet_bound` direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketEvent {
    pub packet_name: String,
    pub amount: u64,
    pub size_bytes: u64,
    /// Epoch milliseconds
    pub collected_at: i64,
    pub outgoing: bool,
}

/// One grouped row as emitted by the aggregation query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub packet_name: String,
    pub time_period: String,
    pub total_amount: u64,
    /// Sum of `amount * size_bytes`
    pub total_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter() {
        assert_eq!("ALL".parse::<DirectionFilter>().unwrap(), DirectionFilter::All);
        assert_eq!(" outgoing\n".parse::<DirectionFilter>().unwrap(), DirectionFilter::Outgoing);
        assert!(matches!(
            "both".parse::<DirectionFilter>(),
            Err(SelectionError::InvalidFilter(_))
        ));
    }

    #[test]
    fn test_filter_matches() {
        assert!(DirectionFilter::All.matches(true));
        assert!(DirectionFilter::All.matches(false));
        assert!(DirectionFilter::Outgoing.matches(true));
        assert!(!DirectionFilter::Outgoing.matches(false));
        assert!(DirectionFilter::Incoming.matches(false));
    }

    #[test]
    fn test_parse_sort() {
        assert_eq!("volume".parse::<SortBy>().unwrap(), SortBy::Size);
        assert!("name".parse::<SortBy>().is_err());
    }
}
