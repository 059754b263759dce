//! Plotly figure construction.
//!
//! Each packet name gets two stacked bar traces: a count trace and a volume
//! trace. All count traces come first, then all volume traces, so the toggle
//! buttons can flip visibility with two complementary boolean vectors. Each
//! trace carries the other metric as `customdata` for the hover label.

use super::config::{ChartConfig, DisplayMode};
use super::pivot::PivotTable;
use crate::utils::error::ChartError;
use serde_json::{json, Value};

const BAR_BORDER: &str = "rgba(255,255,255,0.3)";

const COUNT_HOVER: &str = "<b>Packet Name:</b> %{fullData.name}<br>\
<b>Time:</b> %{x}<br>\
<b>Total Packets:</b> %{y}<br>\
<b>Volume:</b> %{customdata:.4f} MB<extra></extra>";

const VOLUME_HOVER: &str = "<b>Packet Name:</b> %{fullData.name}<br>\
<b>Time:</b> %{x}<br>\
<b>Volume:</b> %{y:.4f} MB<br>\
<b>Total Packets:</b> %{customdata}<extra></extra>";

/// Visibility vector that shows exactly one metric group
///
/// Layout is `[count traces..., volume traces...]`, `n` of each.
pub fn visibility(mode: DisplayMode, n: usize) -> Vec<bool> {
    let show_counts = mode == DisplayMode::Amount;
    std::iter::repeat(show_counts)
        .take(n)
        .chain(std::iter::repeat(!show_counts).take(n))
        .collect()
}

/// Build the complete figure (`{"data": [...], "layout": {...}}`)
///
/// # Errors
/// * `ChartError::InvalidDimensions` - zero width or height
pub fn build_figure(pivot: &PivotTable, config: &ChartConfig) -> Result<Value, ChartError> {
    if config.width == 0 || config.height == 0 {
        return Err(ChartError::InvalidDimensions {
            width: config.width,
            height: config.height,
        });
    }

    let mut traces = Vec::with_capacity(pivot.series.len() * 2);

    for series in &pivot.series {
        traces.push(json!({
            "type": "bar",
            "name": series.packet_name,
            "legendgroup": series.packet_name,
            "x": pivot.buckets,
            "y": series.amounts,
            "customdata": series.volumes_mb,
            "visible": config.mode == DisplayMode::Amount,
            "hovertemplate": COUNT_HOVER,
            "marker": { "line": { "color": BAR_BORDER } },
        }));
    }

    for series in &pivot.series {
        traces.push(json!({
            "type": "bar",
            "name": series.packet_name,
            "legendgroup": series.packet_name,
            "x": pivot.buckets,
            "y": series.volumes_mb,
            "customdata": series.amounts,
            "visible": config.mode == DisplayMode::Size,
            "hovertemplate": VOLUME_HOVER,
            "marker": { "line": { "color": BAR_BORDER } },
        }));
    }

    let mut layout = json!({
        "title": { "text": config.title() },
        "width": config.width,
        "height": config.height,
        "barmode": "stack",
        "xaxis": {
            "title": { "text": config.x_axis_title() },
            "type": "category",
            "tickmode": "array",
            "tickvals": pivot.buckets,
            "ticktext": pivot.buckets,
        },
        "yaxis": { "title": { "text": config.mode.axis_title() } },
        "showlegend": true,
        "legend": {
            "x": 1,
            "y": 1,
            "traceorder": "normal",
            "orientation": "v",
            "font": { "size": 10 },
            "bgcolor": "rgba(255, 255, 255, 0.7)",
            "bordercolor": "rgba(255, 255, 255, 0.5)",
            "borderwidth": 1,
            "itemclick": "toggleothers",
            "itemsizing": "constant",
            "xanchor": "left",
            "yanchor": "top",
            "tracegroupgap": 3,
        },
        "plot_bgcolor": "white",
    });

    if !pivot.series.is_empty() {
        layout["updatemenus"] = json!([toggle_menu(config.mode, pivot.series.len())]);
    }

    Ok(json!({ "data": traces, "layout": layout }))
}

fn toggle_menu(active: DisplayMode, n: usize) -> Value {
    let button = |mode: DisplayMode| {
        json!({
            "label": mode.button_label(),
            "method": "update",
            "args": [
                { "visible": visibility(mode, n) },
                { "yaxis.title.text": mode.axis_title() },
            ],
        })
    };

    let active_index = match active {
        DisplayMode::Amount => 0,
        DisplayMode::Size => 1,
    };

    json!({
        "type": "buttons",
        "direction": "right",
        "showactive": true,
        "active": active_index,
        "x": 0,
        "y": 1.15,
        "xanchor": "left",
        "yanchor": "top",
        "buttons": [button(DisplayMode::Amount), button(DisplayMode::Size)],
    })
}
