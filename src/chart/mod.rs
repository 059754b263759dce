//! Chart rendering from aggregated totals.
//!
//! This module pivots the totals into bucket-aligned series and renders:
//! - An interactive plotly page (count/volume toggle)
//! - A static single-metric SVG
//! - A terminal summary table

pub mod config;
pub mod figure;
pub mod html;
pub mod pivot;
pub mod summary;
pub mod svg;

// Re-export main types
pub use config::{ChartConfig, DisplayMode};
pub use figure::{build_figure, visibility};
pub use html::render_html;
pub use pivot::{pivot, PivotTable, Series};
pub use summary::render_text_summary;
pub use svg::render_svg;

/// Escape text for HTML/SVG element content and attribute values
pub(crate) fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
