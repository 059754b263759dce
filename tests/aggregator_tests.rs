use packet_graph::aggregator::{aggregate_events, bucket_key, summarize, Granularity, PacketTotals};
use packet_graph::store::{DirectionFilter, PacketEvent};
use pretty_assertions::assert_eq;

// 2024-01-01 00:00:00 UTC
const T0: i64 = 1_704_067_200_000;

fn event(name: &str, amount: u64, size_bytes: u64, collected_at: i64, outgoing: bool) -> PacketEvent {
    PacketEvent {
        packet_name: name.to_string(),
        amount,
        size_bytes,
        collected_at,
        outgoing,
    }
}

fn handshake_events() -> Vec<PacketEvent> {
    vec![
        event("Handshake", 5, 100, T0, true),
        event("Handshake", 3, 100, T0, false),
    ]
}

#[test]
fn test_handshake_all() {
    let totals = aggregate_events(&handshake_events(), Granularity::Minute, DirectionFilter::All).unwrap();

    let json = serde_json::to_value(&totals).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "2024-01-01 00:00": {
                "Handshake": {
                    "total_amount": 8,
                    "total_bytes": 800,
                    "total_volume_mb": 0.0008
                }
            }
        })
    );
}

#[test]
fn test_handshake_outgoing() {
    let totals =
        aggregate_events(&handshake_events(), Granularity::Minute, DirectionFilter::Outgoing).unwrap();

    let cell = totals.get("2024-01-01 00:00", "Handshake").unwrap();
    assert_eq!(cell.total_amount, 5);
    assert_eq!(cell.volume_mb(), 0.0005);
    assert_eq!(totals.cell_count(), 1);
}

#[test]
fn test_bucket_boundaries() {
    assert_eq!(bucket_key(T0 + 59_999, Granularity::Minute).unwrap(), "2024-01-01 00:00");
    assert_eq!(bucket_key(T0 + 60_000, Granularity::Minute).unwrap(), "2024-01-01 00:01");
    assert_eq!(bucket_key(T0 + 3_599_999, Granularity::Hour).unwrap(), "2024-01-01 00");
    assert_eq!(bucket_key(T0 - 1_000, Granularity::Hour).unwrap(), "2023-12-31 23");
}

#[test]
fn test_per_bucket_sum_equals_filtered_total() {
    let events = vec![
        event("A", 3, 10, T0, true),
        event("B", 4, 20, T0 + 1_000, true),
        event("A", 1, 10, T0 + 120_000, true),
        event("C", 9, 5, T0 + 120_000, false),
    ];

    let totals = aggregate_events(&events, Granularity::Minute, DirectionFilter::Outgoing).unwrap();
    let bucket_sum: u64 = totals
        .iter()
        .flat_map(|(_, cells)| cells.values().map(|c| c.total_amount))
        .sum();

    assert_eq!(bucket_sum, 8);
    assert!(totals.bucket("2024-01-01 00:02").unwrap().get("C").is_none());
}

#[test]
fn test_exclusivity_in_process() {
    let events = vec![
        event("A", 3, 10, T0, true),
        event("B", 4, 20, T0, false),
        event("A", 2, 10, T0 + 3_600_000, true),
    ];

    let all = aggregate_events(&events, Granularity::Hour, DirectionFilter::All).unwrap();
    let outgoing = aggregate_events(&events, Granularity::Hour, DirectionFilter::Outgoing).unwrap();
    let incoming = aggregate_events(&events, Granularity::Hour, DirectionFilter::Incoming).unwrap();

    assert_eq!(outgoing.merged(&incoming), all);
}

#[test]
fn test_out_of_range_timestamp() {
    let events = vec![event("A", 1, 1, i64::MAX, true)];
    assert!(aggregate_events(&events, Granularity::Minute, DirectionFilter::All).is_err());
}

#[test]
fn test_summarize_totals() {
    let events = vec![
        event("Small", 1, 1_000, T0, true),
        event("Big", 10, 50, T0, true),
        event("Big", 30, 50, T0 + 60_000, true),
    ];
    let totals = aggregate_events(&events, Granularity::Minute, DirectionFilter::All).unwrap();
    let summary = summarize(&totals);

    assert_eq!(summary.bucket_count, 2);
    assert_eq!(summary.total_amount, 41);
    assert_eq!(summary.total_bytes, 3_050);
    assert_eq!(summary.packets[0].packet_name, "Big");
    assert_eq!(summary.packets[0].active_buckets, 2);
    assert_eq!(
        summary.busiest_bucket,
        Some(("2024-01-01 00:01".to_string(), 30))
    );
}

#[test]
fn test_summarize_empty() {
    let summary = summarize(&PacketTotals::new());
    assert_eq!(summary.packet_count(), 0);
    assert_eq!(summary.busiest_bucket, None);
}
