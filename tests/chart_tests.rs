use packet_graph::aggregator::{summarize, AggregateCell, Granularity, PacketTotals};
use packet_graph::chart::{
    build_figure, pivot, render_html, render_svg, render_text_summary, visibility, ChartConfig,
    DisplayMode,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn sample_totals() -> PacketTotals {
    let mut totals = PacketTotals::new();
    totals.add("2024-01-01 00:00", "KeepAlive", AggregateCell::new(10, 120));
    totals.add("2024-01-01 00:00", "PlayerPosition", AggregateCell::new(120, 4_080));
    totals.add("2024-01-01 00:01", "PlayerPosition", AggregateCell::new(80, 2_720));
    totals.add("2024-01-01 00:02", "ChatMessage", AggregateCell::new(2, 2_000_000));
    totals
}

#[test]
fn test_series_aligned_and_zero_filled() {
    let totals = sample_totals();
    let table = pivot(&totals);

    assert_eq!(table.buckets.len(), 3);
    for series in &table.series {
        assert_eq!(series.amounts.len(), table.buckets.len());
        assert_eq!(series.volumes_mb.len(), table.buckets.len());
    }

    let names: Vec<&str> = table.series.iter().map(|s| s.packet_name.as_str()).collect();
    assert_eq!(names, vec!["ChatMessage", "KeepAlive", "PlayerPosition"]);
    assert_eq!(table.series[1].amounts, vec![10, 0, 0]);
    assert_eq!(table.series[0].volumes_mb, vec![0.0, 0.0, 2.0]);
}

#[test]
fn test_stacked_heights_match_bucket_totals() {
    let totals = sample_totals();
    let table = pivot(&totals);

    let expected: Vec<u64> = totals
        .iter()
        .map(|(_, cells)| cells.values().map(|c| c.total_amount).sum())
        .collect();
    assert_eq!(table.bucket_amounts(), expected);
    assert_eq!(table.bucket_amounts().iter().sum::<u64>(), 212);
}

#[test]
fn test_figure_toggle_buttons() {
    let table = pivot(&sample_totals());
    let config = ChartConfig::new(Granularity::Minute);
    let figure = build_figure(&table, &config).unwrap();

    let buttons = &figure["layout"]["updatemenus"][0]["buttons"];
    assert_eq!(buttons[0]["label"], "Packets");
    assert_eq!(buttons[1]["label"], "Volume (MB)");
    assert_eq!(buttons[0]["args"][0]["visible"], json!(visibility(DisplayMode::Amount, 3)));
    assert_eq!(buttons[1]["args"][0]["visible"], json!(visibility(DisplayMode::Size, 3)));
    assert_eq!(buttons[1]["args"][1]["yaxis.title.text"], "Total Volume (MB)");

    assert_eq!(figure["layout"]["title"]["text"], "Packet Totals Sent Per Minute");
    assert_eq!(figure["layout"]["xaxis"]["title"]["text"], "Time (Minute)");
    assert_eq!(figure["data"].as_array().unwrap().len(), 6);
}

#[test]
fn test_volume_traces_carry_megabytes() {
    let table = pivot(&sample_totals());
    let figure = build_figure(&table, &ChartConfig::new(Granularity::Minute)).unwrap();

    // Volume group starts after the three count traces
    let chat_volume = &figure["data"][3];
    assert_eq!(chat_volume["name"], "ChatMessage");
    assert_eq!(chat_volume["y"], json!([0.0, 0.0, 2.0]));
    assert_eq!(chat_volume["customdata"], json!([0, 0, 2]));
}

#[test]
fn test_empty_totals_render() {
    let table = pivot(&PacketTotals::new());
    assert!(table.is_empty());
    assert!(table.buckets.is_empty());

    let config = ChartConfig::new(Granularity::Hour);
    let figure = build_figure(&table, &config).unwrap();
    assert_eq!(figure["data"], json!([]));
    assert_eq!(figure["layout"]["xaxis"]["tickvals"], json!([]));

    let html = render_html(&table, &config).unwrap();
    assert!(html.contains("Packet Totals Sent Per Hour"));

    let svg = render_svg(&table, &config).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("No packets recorded"));
}

#[test]
fn test_svg_follows_mode() {
    let table = pivot(&sample_totals());

    let counts = render_svg(&table, &ChartConfig::new(Granularity::Minute)).unwrap();
    assert!(counts.contains("Total Packets Sent"));
    assert_eq!(counts.matches("class=\"bar\"").count(), 4);

    let volumes = render_svg(
        &table,
        &ChartConfig::new(Granularity::Minute).with_mode(DisplayMode::Size),
    )
    .unwrap();
    assert!(volumes.contains("Total Volume (MB)"));
}

#[test]
fn test_text_summary_lists_busiest_first() {
    let summary = summarize(&sample_totals());
    let text = render_text_summary(&summary, 2);

    let position = text.find("PlayerPosition").unwrap();
    let keep_alive = text.find("KeepAlive").unwrap();
    assert!(position < keep_alive);
    assert!(!text.contains("ChatMessage"));
    assert!(text.contains("(Showing top 2 of 3 packet types)"));
}
