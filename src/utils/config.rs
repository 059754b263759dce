//! Configuration and constants for the CLI.

/// Database file used when neither `--db` nor a settings file names one
pub const DEFAULT_DB_FILE: &str = "packet.sqlite";

/// Environment variable that points at a settings TOML file
pub const SETTINGS_ENV_VAR: &str = "PACKET_GRAPH_CONFIG";

/// Current totals report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

// Bucket formats. Both are fixed-width so lexicographic order is chronological.
pub const MINUTE_BUCKET_FORMAT: &str = "%Y-%m-%d %H:%M";
pub const HOUR_BUCKET_FORMAT: &str = "%Y-%m-%d %H";

/// Volume is reported in decimal megabytes
pub const BYTES_PER_MB: f64 = 1_000_000.0;

/// Collector tables
pub const EVENTS_TABLE: &str = "batched_packets";
pub const DIRECTION_TABLE: &str = "packet_bound";

/// Plotly bundle loaded by the interactive chart page
pub const PLOTLY_CDN_URL: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";

pub const DEFAULT_CHART_WIDTH: usize = 1200;
pub const DEFAULT_CHART_HEIGHT: usize = 600;

/// Rows shown by the text summary
pub const DEFAULT_SUMMARY_ROWS: usize = 15;
