//! Terminal summary table.

use crate::aggregator::TrafficSummary;

const BAR_WIDTH: usize = 30;
const NAME_WIDTH: usize = 36;

/// Per-packet totals as a box-drawn table with proportional bars
pub fn render_text_summary(summary: &TrafficSummary, max_rows: usize) -> String {
    let mut lines = Vec::new();

    lines.push("  PACKET TOTALS".to_string());
    lines.push(format!(
        "  ┏{}┳━━━━━━━━━━━━━━┳━━━━━━━━━━━━━━┳━━━━━━━━━┳{}┓",
        "━".repeat(NAME_WIDTH + 2),
        "━".repeat(BAR_WIDTH + 2)
    ));
    lines.push(format!(
        "  ┃ {:<name$} ┃ {:^12} ┃ {:^12} ┃ {:^7} ┃ {:<bar$} ┃",
        "Packet (Busiest First)",
        "PACKETS",
        "MB",
        "%",
        "",
        name = NAME_WIDTH,
        bar = BAR_WIDTH
    ));
    lines.push(format!(
        "  ┣{}╋━━━━━━━━━━━━━━╋━━━━━━━━━━━━━━╋━━━━━━━━━╋{}┫",
        "━".repeat(NAME_WIDTH + 2),
        "━".repeat(BAR_WIDTH + 2)
    ));

    let top_amount = summary.packets.first().map_or(0, |p| p.total_amount).max(1);

    for packet in summary.packets.iter().take(max_rows) {
        let share = summary.amount_share(packet);
        let bar_len = (packet.total_amount as f64 / top_amount as f64 * BAR_WIDTH as f64).round() as usize;

        lines.push(format!(
            "  ┃ {:<name$} ┃ {:>12} ┃ {:>12.4} ┃ {:>6.1}% ┃ {:<bar$} ┃",
            truncate(&packet.packet_name, NAME_WIDTH),
            packet.total_amount,
            packet.volume_mb(),
            share,
            "█".repeat(bar_len),
            name = NAME_WIDTH,
            bar = BAR_WIDTH
        ));
    }

    lines.push(format!(
        "  ┗{}┻━━━━━━━━━━━━━━┻━━━━━━━━━━━━━━┻━━━━━━━━━┻{}┛",
        "━".repeat(NAME_WIDTH + 2),
        "━".repeat(BAR_WIDTH + 2)
    ));

    if summary.packets.len() > max_rows {
        lines.push(format!(
            "   (Showing top {} of {} packet types)",
            max_rows,
            summary.packets.len()
        ));
    }

    lines.push(String::new());
    lines.push(format!("  {}", summary.summary()));

    lines.join("\n")
}

fn truncate(name: &str, max: usize) -> String {
    if name.chars().count() > max {
        let keep: String = name.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", keep)
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{summarize, AggregateCell, PacketTotals};

    #[test]
    fn test_summary_rows() {
        let mut totals = PacketTotals::new();
        totals.add("2024-01-01 00", "KeepAlive", AggregateCell::new(30, 300));
        totals.add("2024-01-01 00", "Chat", AggregateCell::new(10, 1_000_000));
        totals.add("2024-01-01 01", "Position", AggregateCell::new(5, 50));

        let text = render_text_summary(&summarize(&totals), 2);

        assert!(text.contains("KeepAlive"));
        assert!(text.contains("Chat"));
        assert!(!text.contains("Position"));
        assert!(text.contains("(Showing top 2 of 3 packet types)"));
        assert!(text.contains("1.0000"));
    }

    #[test]
    fn test_truncate_long_names() {
        let long = "x".repeat(50);
        let out = truncate(&long, 10);
        assert_eq!(out, "xxxxxxx...");
    }
}
