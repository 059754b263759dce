//! Static stacked bar chart as SVG.
//!
//! Single metric (chosen by the display mode), no scripting. Bars stack in
//! series order from the x-axis upward; the legend sits to the right.

use super::config::{ChartConfig, DisplayMode};
use super::escape_markup;
use super::pivot::PivotTable;
use crate::utils::error::ChartError;
use log::info;

const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 220.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 110.0;
const Y_TICKS: usize = 5;
const LEGEND_ROW: f64 = 18.0;

// Plotly's default qualitative palette, so both renderers agree on colours
const PALETTE: [&str; 10] = [
    "#636efa", "#EF553B", "#00cc96", "#ab63fa", "#FFA15A",
    "#19d3f3", "#FF6692", "#B6E880", "#FF97FF", "#FECB52",
];

pub fn series_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Render the static chart
///
/// # Errors
/// * `ChartError::InvalidDimensions` - too small to fit axes and legend
pub fn render_svg(pivot: &PivotTable, config: &ChartConfig) -> Result<String, ChartError> {
    let width = config.width as f64;
    let height = config.height as f64;

    if width <= MARGIN_LEFT + MARGIN_RIGHT || height <= MARGIN_TOP + MARGIN_BOTTOM {
        return Err(ChartError::InvalidDimensions {
            width: config.width,
            height: config.height,
        });
    }

    let plot_w = width - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = height - MARGIN_TOP - MARGIN_BOTTOM;
    let baseline = MARGIN_TOP + plot_h;

    let values: Vec<Vec<f64>> = pivot
        .series
        .iter()
        .map(|s| match config.mode {
            DisplayMode::Amount => s.amounts.iter().map(|&a| a as f64).collect(),
            DisplayMode::Size => s.volumes_mb.clone(),
        })
        .collect();

    let stack_max = (0..pivot.buckets.len())
        .map(|i| values.iter().map(|v| v[i]).sum::<f64>())
        .fold(0.0, f64::max);
    let y_max = nice_ceiling(stack_max);

    let mut svg = String::new();

    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        config.width, config.height, config.width, config.height
    ));
    svg.push_str(
        r#"<style>text { font: 12px sans-serif; } .bar:hover { opacity: 0.8; } .title { font-size: 16px; font-weight: bold; }</style>"#,
    );
    svg.push_str(&format!(
        r#"<rect x="0" y="0" width="{}" height="{}" fill="white"/>"#,
        config.width, config.height
    ));
    svg.push_str(&format!(
        r#"<text x="{:.1}" y="28" text-anchor="middle" class="title">{}</text>"#,
        width / 2.0,
        escape_markup(&config.title())
    ));

    // Gridlines and y labels
    for i in 0..=Y_TICKS {
        let value = y_max * i as f64 / Y_TICKS as f64;
        let y = baseline - (value / y_max) * plot_h;
        svg.push_str(&format!(
            r##"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="#e5e5e5"/>"##,
            MARGIN_LEFT,
            y,
            MARGIN_LEFT + plot_w,
            y
        ));
        svg.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" dy="4" text-anchor="end">{}</text>"#,
            MARGIN_LEFT - 8.0,
            y,
            format_tick(value)
        ));
    }

    if pivot.buckets.is_empty() {
        svg.push_str(&format!(
            r##"<text x="{:.2}" y="{:.2}" text-anchor="middle" fill="#888">No packets recorded</text>"##,
            MARGIN_LEFT + plot_w / 2.0,
            MARGIN_TOP + plot_h / 2.0
        ));
    } else {
        render_bars(&mut svg, pivot, &values, y_max, plot_w, plot_h);
        render_x_labels(&mut svg, pivot, plot_w, baseline);
    }

    // Axes
    svg.push_str(&format!(
        r##"<line x1="{l:.2}" y1="{t:.2}" x2="{l:.2}" y2="{b:.2}" stroke="#333"/><line x1="{l:.2}" y1="{b:.2}" x2="{r:.2}" y2="{b:.2}" stroke="#333"/>"##,
        l = MARGIN_LEFT,
        t = MARGIN_TOP,
        b = baseline,
        r = MARGIN_LEFT + plot_w
    ));
    svg.push_str(&format!(
        r#"<text x="{:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
        MARGIN_LEFT + plot_w / 2.0,
        height - 12.0,
        escape_markup(&config.x_axis_title())
    ));
    svg.push_str(&format!(
        r#"<text transform="translate(18 {:.2}) rotate(-90)" text-anchor="middle">{}</text>"#,
        MARGIN_TOP + plot_h / 2.0,
        config.mode.axis_title()
    ));

    render_legend(&mut svg, pivot, MARGIN_LEFT + plot_w + 20.0);

    svg.push_str("</svg>");

    info!(
        "Static chart rendered: {} buckets, {} series ({} bytes)",
        pivot.buckets.len(),
        pivot.series.len(),
        svg.len()
    );
    Ok(svg)
}

fn render_bars(
    out: &mut String,
    pivot: &PivotTable,
    values: &[Vec<f64>],
    y_max: f64,
    plot_w: f64,
    plot_h: f64,
) {
    let slot = plot_w / pivot.buckets.len() as f64;
    let bar_w = (slot * 0.8).max(1.0);

    for (i, bucket) in pivot.buckets.iter().enumerate() {
        let x = MARGIN_LEFT + i as f64 * slot + (slot - bar_w) / 2.0;
        let mut top = MARGIN_TOP + plot_h;

        for (j, series) in pivot.series.iter().enumerate() {
            let value = values[j][i];
            if value <= 0.0 {
                continue;
            }
            let h = value / y_max * plot_h;
            top -= h;
            out.push_str(&format!(
                r#"<rect class="bar" x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" stroke="rgba(255,255,255,0.3)"><title>{} @ {}: {}</title></rect>"#,
                x,
                top,
                bar_w,
                h,
                series_color(j),
                escape_markup(&series.packet_name),
                escape_markup(bucket),
                format_tick(value)
            ));
        }
    }
}

fn render_x_labels(out: &mut String, pivot: &PivotTable, plot_w: f64, baseline: f64) {
    let n = pivot.buckets.len();
    let slot = plot_w / n as f64;
    let max_labels = ((plot_w / 70.0).floor() as usize).max(1);
    let step = n.div_ceil(max_labels);

    for (i, bucket) in pivot.buckets.iter().enumerate().step_by(step) {
        let x = MARGIN_LEFT + (i as f64 + 0.5) * slot;
        out.push_str(&format!(
            r#"<text transform="translate({:.2} {:.2}) rotate(-45)" text-anchor="end" font-size="10">{}</text>"#,
            x,
            baseline + 14.0,
            escape_markup(bucket)
        ));
    }
}

fn render_legend(out: &mut String, pivot: &PivotTable, x: f64) {
    for (j, series) in pivot.series.iter().enumerate() {
        let y = MARGIN_TOP + j as f64 * LEGEND_ROW;
        out.push_str(&format!(
            r#"<rect x="{:.2}" y="{:.2}" width="12" height="12" fill="{}" rx="2"/>"#,
            x,
            y,
            series_color(j)
        ));
        out.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" font-size="10">{}</text>"#,
            x + 18.0,
            y + 10.0,
            escape_markup(&series.packet_name)
        ));
    }
}

/// Round up to 1, 2 or 5 times a power of ten
fn nice_ceiling(value: f64) -> f64 {
    if value <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(value.log10().floor());
    let normalized = value / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

fn format_tick(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else if value.abs() >= 1.0 {
        if value.fract() == 0.0 {
            format!("{:.0}", value)
        } else {
            format!("{:.1}", value)
        }
    } else {
        let decimals = ((-value.abs().log10()).floor() as usize + 1).min(6);
        format!("{:.*}", decimals, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::Granularity;
    use crate::chart::pivot::Series;

    fn table() -> PivotTable {
        PivotTable {
            buckets: vec!["2024-01-01 00:00".to_string(), "2024-01-01 00:01".to_string()],
            series: vec![
                Series {
                    packet_name: "KeepAlive".to_string(),
                    amounts: vec![3, 0],
                    volumes_mb: vec![0.003, 0.0],
                },
                Series {
                    packet_name: "Chat<1>".to_string(),
                    amounts: vec![1, 4],
                    volumes_mb: vec![0.1, 0.4],
                },
            ],
        }
    }

    #[test]
    fn test_render_bars_skip_zero_cells() {
        let svg = render_svg(&table(), &ChartConfig::new(Granularity::Minute)).unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches(r#"class="bar""#).count(), 3);
        assert!(svg.contains("Chat&lt;1&gt;"));
        assert!(svg.contains("Total Packets Sent"));
    }

    #[test]
    fn test_render_volume_mode() {
        let config = ChartConfig::new(Granularity::Minute).with_mode(DisplayMode::Size);
        let svg = render_svg(&table(), &config).unwrap();
        assert!(svg.contains("Total Volume (MB)"));
    }

    #[test]
    fn test_render_empty() {
        let svg = render_svg(&PivotTable::default(), &ChartConfig::default()).unwrap();
        assert!(svg.contains("No packets recorded"));
        assert_eq!(svg.matches(r#"class="bar""#).count(), 0);
    }

    #[test]
    fn test_too_small() {
        let config = ChartConfig::default().with_size(200, 100);
        assert!(matches!(
            render_svg(&table(), &config),
            Err(ChartError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_nice_ceiling() {
        assert_eq!(nice_ceiling(0.0), 1.0);
        assert_eq!(nice_ceiling(7.0), 10.0);
        assert_eq!(nice_ceiling(13.0), 20.0);
        assert_eq!(nice_ceiling(300.0), 500.0);
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(0.0), "0");
        assert_eq!(format_tick(40.0), "40");
        assert_eq!(format_tick(2.5), "2.5");
        assert_eq!(format_tick(0.0002), "0.0002");
    }
}
