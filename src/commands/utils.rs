use crate::output::read_report;
use crate::utils::config::{DIRECTION_TABLE, EVENTS_TABLE, SCHEMA_VERSION};
use anyhow::{Context, Result};
use std::path::Path;

/// Validate a totals report JSON file
pub fn validate_report_file(file_path: &Path) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(file_path)
        .with_context(|| format!("Failed to read report {}", file_path.display()))?;

    if report.version != SCHEMA_VERSION {
        anyhow::bail!(
            "Unsupported report version {} (expected {})",
            report.version,
            SCHEMA_VERSION
        );
    }

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Generated: {}", report.generated_at);
    println!("  Filter: {}", report.filter);
    println!("  Granularity: {}", report.granularity);
    println!("  Buckets: {}", report.totals.len());
    println!("  Cells: {}", report.totals.cell_count());
    println!("  Rows: {} (sorted by {})", report.rows.len(), report.sort_by);

    Ok(())
}

/// Display the expected database schema
pub fn display_schema(show_details: bool) {
    println!("Packet Graph Store Schema");
    println!("Report Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Table {}:", EVENTS_TABLE);
        println!("  id: integer          - Row id");
        println!("  packet_name: text    - Packet type name");
        println!("  amount: integer      - Packets seen in the flush interval");
        println!("  size_bytes: integer  - Bytes per packet");
        println!("  collected_at: integer - Flush time, epoch milliseconds");
        println!();
        println!("Table {}:", DIRECTION_TABLE);
        println!("  id: integer          - Row id");
        println!("  packet_name: text    - Packet type name");
        println!("  outgoing: integer    - 1 = sent by server, 0 = received");
        println!();
        println!("Batches are joined to directions by packet_name; batches");
        println!("without a direction row are not counted.");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Packet Graph v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Stacked bar charts of logged packet traffic.");
}
