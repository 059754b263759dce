//! Standalone interactive HTML page for the plotly figure.

use super::config::ChartConfig;
use super::escape_markup;
use super::figure::build_figure;
use super::pivot::PivotTable;
use crate::utils::config::PLOTLY_CDN_URL;
use crate::utils::error::ChartError;
use log::info;

/// Render the interactive chart page
///
/// The figure JSON is embedded inline; plotly itself is loaded from its CDN.
pub fn render_html(pivot: &PivotTable, config: &ChartConfig) -> Result<String, ChartError> {
    let figure = build_figure(pivot, config)?;

    // "</" inside a JSON string would close the script element early
    let figure_json = serde_json::to_string(&figure)?.replace("</", "<\\/");

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <script src="{cdn}"></script>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, sans-serif;
            margin: 0;
            padding: 20px;
            background: #f5f5f5;
        }}
        .container {{
            max-width: {max_width}px;
            margin: 0 auto;
            background: white;
            padding: 20px;
            border-radius: 8px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }}
        .meta {{
            color: #666;
            font-size: 13px;
            margin-bottom: 10px;
        }}
    </style>
</head>
<body>
    <div class="container">
        <div class="meta">{buckets} buckets &middot; {series} packet types</div>
        <div id="chart"></div>
    </div>
    <script>
        const figure = {figure};
        Plotly.newPlot('chart', figure.data, figure.layout, {{ responsive: true, displaylogo: false }});
    </script>
</body>
</html>
"#,
        title = escape_markup(&config.title()),
        cdn = PLOTLY_CDN_URL,
        max_width = config.width + 40,
        buckets = pivot.buckets.len(),
        series = pivot.series.len(),
        figure = figure_json,
    );

    info!("Chart page rendered ({} bytes)", html.len());
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::Granularity;
    use crate::chart::pivot::Series;

    #[test]
    fn test_page_embeds_figure() {
        let pivot = PivotTable {
            buckets: vec!["2024-01-01 00:00".to_string()],
            series: vec![Series {
                packet_name: "Handshake".to_string(),
                amounts: vec![8],
                volumes_mb: vec![0.0008],
            }],
        };
        let html = render_html(&pivot, &ChartConfig::new(Granularity::Minute)).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(PLOTLY_CDN_URL));
        assert!(html.contains("<title>Packet Totals Sent Per Minute</title>"));
        assert!(html.contains("\"name\":\"Handshake\""));
        assert!(html.contains("Plotly.newPlot('chart'"));
    }

    #[test]
    fn test_script_close_is_escaped() {
        let pivot = PivotTable {
            buckets: vec!["b".to_string()],
            series: vec![Series {
                packet_name: "</script><b>".to_string(),
                amounts: vec![1],
                volumes_mb: vec![0.0],
            }],
        };
        let html = render_html(&pivot, &ChartConfig::default()).unwrap();
        assert!(!html.contains("</script><b>"));
    }

    #[test]
    fn test_title_is_escaped() {
        let config = ChartConfig::default().with_title("A & B");
        let html = render_html(&PivotTable::default(), &config).unwrap();
        assert!(html.contains("<title>A &amp; B</title>"));
    }
}
