//! Graph command implementation.
//!
//! The graph command:
//! 1. Runs the bucket aggregation against the packet database
//! 2. Builds the totals mapping and pivots it into series
//! 3. Renders the interactive chart (and optional static chart)
//! 4. Writes outputs and opens the chart

use crate::aggregator::{build_totals, summarize, Granularity, PacketTotals, TrafficSummary};
use crate::chart::{pivot, render_html, render_svg, render_text_summary, ChartConfig, DisplayMode};
use crate::output::{open_in_viewer, show_html, write_artifact, write_report, TotalsReport};
use crate::store::{AggregateQuery, DirectionFilter, PacketStore, SortBy};
use crate::utils::config::{DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH, DEFAULT_DB_FILE, DEFAULT_SUMMARY_ROWS};
use crate::utils::settings::Settings;
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the graph command
#[derive(Debug, Clone)]
pub struct GraphArgs {
    /// Packet logger SQLite file
    pub db_path: PathBuf,

    pub filter: DirectionFilter,
    pub granularity: Granularity,

    /// Metric visible when the chart opens
    pub mode: DisplayMode,

    /// Order of the raw rows in the JSON report
    pub sort_by: SortBy,

    /// Chart title (None = derived from granularity)
    pub title: Option<String>,

    pub width: usize,
    pub height: usize,

    /// Keep the interactive page at this path instead of a scratch file
    pub output_html: Option<PathBuf>,

    /// Static SVG chart (optional)
    pub output_svg: Option<PathBuf>,

    /// JSON totals report (optional)
    pub output_json: Option<PathBuf>,

    /// Open the interactive page in the system viewer
    pub open_viewer: bool,

    /// Print text summary to stdout
    pub print_summary: bool,

    pub summary_rows: usize,
}

impl Default for GraphArgs {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            filter: DirectionFilter::All,
            granularity: Granularity::Minute,
            mode: DisplayMode::Amount,
            sort_by: SortBy::Time,
            title: None,
            width: DEFAULT_CHART_WIDTH,
            height: DEFAULT_CHART_HEIGHT,
            output_html: None,
            output_svg: None,
            output_json: None,
            open_viewer: true,
            print_summary: false,
            summary_rows: DEFAULT_SUMMARY_ROWS,
        }
    }
}

impl GraphArgs {
    /// Defaults seeded from a settings file
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let mode = settings
            .chart
            .default_mode
            .parse()
            .context("Invalid chart.default_mode in settings")?;

        Ok(Self {
            db_path: settings.database.path.clone(),
            mode,
            title: settings.chart.title.clone(),
            width: settings.chart.width,
            height: settings.chart.height,
            open_viewer: settings.chart.open_viewer,
            ..Self::default()
        })
    }

    pub fn query(&self) -> AggregateQuery {
        AggregateQuery::new(self.granularity, self.filter).with_sort(self.sort_by)
    }

    pub fn chart_config(&self) -> ChartConfig {
        let config = ChartConfig::new(self.granularity)
            .with_mode(self.mode)
            .with_size(self.width, self.height);

        match &self.title {
            Some(title) => config.with_title(title.clone()),
            None => config,
        }
    }
}

/// What a graph run produced
#[derive(Debug)]
pub struct GraphOutcome {
    pub totals: PacketTotals,
    pub summary: TrafficSummary,

    /// Interactive page location (chosen path or scratch file), if one was written
    pub html_path: Option<PathBuf>,
}

/// Validate graph arguments
///
/// Called before execute_graph so bad arguments never touch the database.
pub fn validate_args(args: &GraphArgs) -> Result<()> {
    if args.db_path.as_os_str().is_empty() {
        anyhow::bail!("Database path cannot be empty");
    }

    if args.width == 0 || args.height == 0 {
        anyhow::bail!("Chart width and height must be greater than 0");
    }

    if args.summary_rows == 0 {
        anyhow::bail!("summary_rows must be greater than 0");
    }

    if let Some(svg) = &args.output_svg {
        if args.output_html.as_ref() == Some(svg) || args.output_json.as_ref() == Some(svg) {
            anyhow::bail!("Output paths must be distinct: {}", svg.display());
        }
    }

    if let (Some(html), Some(json)) = (&args.output_html, &args.output_json) {
        if html == json {
            anyhow::bail!("Output paths must be distinct: {}", html.display());
        }
    }

    Ok(())
}

/// Execute the graph command
///
/// # Errors
/// * Missing or unreadable database
/// * Schema mismatch (tables/columns)
/// * Chart rendering or file write errors
pub fn execute_graph(args: &GraphArgs) -> Result<GraphOutcome> {
    let start_time = Instant::now();

    info!(
        "Graphing {} (filter: {}, granularity: {})",
        args.db_path.display(),
        args.filter,
        args.granularity
    );

    // Step 1: Aggregate in SQL
    info!("Step 1/4: Querying packet database...");
    let store = PacketStore::open(&args.db_path)
        .with_context(|| format!("Failed to open packet database {}", args.db_path.display()))?;

    let query = args.query();
    let rows = store
        .aggregate(&query)
        .context("Failed to aggregate packet batches")?;

    // Step 2: Build totals and series
    info!("Step 2/4: Building bucket totals...");
    let totals = build_totals(&rows);
    let summary = summarize(&totals);
    info!("Traffic: {}", summary.summary());

    let table = pivot(&totals);
    debug!(
        "Pivoted {} series over {} buckets",
        table.series.len(),
        table.buckets.len()
    );

    // Step 3: Render
    info!("Step 3/4: Rendering charts...");
    let config = args.chart_config();

    let html = if args.output_html.is_some() || args.open_viewer {
        Some(render_html(&table, &config).context("Failed to render interactive chart")?)
    } else {
        debug!("Skipping interactive chart (no output path, viewer disabled)");
        None
    };

    let svg = match &args.output_svg {
        Some(_) => Some(render_svg(&table, &config).context("Failed to render static chart")?),
        None => None,
    };

    // Step 4: Write outputs
    info!("Step 4/4: Writing outputs...");
    let mut html_path = None;

    if let Some(html) = &html {
        match &args.output_html {
            Some(path) => {
                write_artifact(html, path).context("Failed to write chart page")?;
                info!("✓ Chart page written to: {}", path.display());
                if args.open_viewer {
                    open_in_viewer(path).context("Failed to open chart")?;
                }
                html_path = Some(path.clone());
            }
            None => {
                let path = show_html(html).context("Failed to show chart")?;
                html_path = Some(path);
            }
        }
    }

    if let (Some(svg), Some(path)) = (&svg, &args.output_svg) {
        write_artifact(svg, path).context("Failed to write static chart")?;
        info!("✓ Static chart written to: {}", path.display());
    }

    if let Some(path) = &args.output_json {
        let report = TotalsReport::new(&query, totals.clone(), rows);
        write_report(&report, path).context("Failed to write totals report")?;
        info!("✓ Totals report written to: {}", path.display());
    }

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("PACKET SUMMARY");
        println!("{}", "=".repeat(80));
        println!("Database:    {}", args.db_path.display());
        println!("Filter:      {}", args.filter);
        println!("Granularity: {}", args.granularity);
        println!("\n{}", render_text_summary(&summary, args.summary_rows));
        println!("{}", "=".repeat(80));
    }

    let elapsed = start_time.elapsed();
    info!("Graph completed in {:.2}s", elapsed.as_secs_f64());

    Ok(GraphOutcome {
        totals,
        summary,
        html_path,
    })
}
