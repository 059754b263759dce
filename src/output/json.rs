//! JSON totals report.
//!
//! A report captures one aggregation run: the query parameters, the nested
//! bucket → packet → totals mapping, and the raw rows in query order.

use super::file::{ensure_parent, validate_path};
use crate::aggregator::{Granularity, PacketTotals};
use crate::store::{AggregateQuery, AggregateRow, DirectionFilter, SortBy};
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotalsReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// RFC 3339 timestamp of the run
    pub generated_at: String,

    pub granularity: Granularity,
    pub filter: DirectionFilter,

    /// Order of `rows`
    pub sort_by: SortBy,

    /// bucket → packet name → totals
    pub totals: PacketTotals,

    /// Aggregate rows exactly as the query emitted them
    pub rows: Vec<AggregateRow>,
}

impl TotalsReport {
    pub fn new(query: &AggregateQuery, totals: PacketTotals, rows: Vec<AggregateRow>) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            granularity: query.granularity,
            filter: query.filter,
            sort_by: query.sort_by,
            totals,
            rows,
        }
    }
}

/// Write a report to a pretty-printed JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_report(report: &TotalsReport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing totals report to: {}", output_path.display());

    validate_path(output_path)?;
    ensure_parent(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, report).map_err(OutputError::SerializationFailed)?;

    info!(
        "Report written successfully ({} buckets, {} rows)",
        report.totals.len(),
        report.rows.len()
    );

    Ok(())
}

/// Read a report back from a JSON file
pub fn read_report(input_path: impl AsRef<Path>) -> Result<TotalsReport, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading report from: {}", input_path.display());

    let file = File::open(input_path).map_err(|source| OutputError::ReadFailed {
        path: input_path.display().to_string(),
        source,
    })?;
    let report: TotalsReport =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Report loaded: version {}, {} buckets",
        report.version,
        report.totals.len()
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{build_totals, AggregateCell};
    use tempfile::NamedTempFile;

    fn sample_rows() -> Vec<AggregateRow> {
        vec![AggregateRow {
            packet_name: "Handshake".to_string(),
            time_period: "2024-01-01 00:00".to_string(),
            total_amount: 8,
            total_bytes: 800,
        }]
    }

    #[test]
    fn test_write_and_read_report() {
        let rows = sample_rows();
        let query = AggregateQuery::new(Granularity::Minute, DirectionFilter::Outgoing);
        let report = TotalsReport::new(&query, build_totals(&rows), rows);

        let temp_file = NamedTempFile::new().unwrap();
        write_report(&report, temp_file.path()).unwrap();
        let loaded = read_report(temp_file.path()).unwrap();

        assert_eq!(loaded.version, SCHEMA_VERSION);
        assert_eq!(loaded.filter, DirectionFilter::Outgoing);
        assert_eq!(loaded.totals, report.totals);
        assert_eq!(
            loaded.totals.get("2024-01-01 00:00", "Handshake"),
            Some(&AggregateCell::new(8, 800))
        );
    }

    #[test]
    fn test_report_json_shape() {
        let rows = sample_rows();
        let report = TotalsReport::new(&AggregateQuery::default(), build_totals(&rows), rows);
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["granularity"], "minute");
        assert_eq!(value["filter"], "all");
        assert_eq!(value["totals"]["2024-01-01 00:00"]["Handshake"]["total_volume_mb"], 0.0008);
        assert_eq!(value["rows"][0]["time_period"], "2024-01-01 00:00");
    }

    #[test]
    fn test_read_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("absent.json");

        let err = read_report(&missing).unwrap_err();
        assert!(matches!(err, OutputError::ReadFailed { .. }));
        assert!(err.to_string().starts_with("Failed to read file"));
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn test_read_invalid_json() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "{not json").unwrap();
        assert!(matches!(
            read_report(temp_file.path()),
            Err(OutputError::SerializationFailed(_))
        ));
    }
}
