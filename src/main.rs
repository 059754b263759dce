//! Packet Graph CLI
//!
//! Charts per-packet traffic totals from a packet logger SQLite file.
//! Asks for the direction filter and time granularity when they are not
//! given as flags.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::debug;
use std::io;
use std::path::PathBuf;

use packet_graph::chart::DisplayMode;
use packet_graph::commands::{
    display_schema, display_version, execute_graph, resolve_selection, validate_args,
    validate_report_file, GraphArgs,
};
use packet_graph::store::SortBy;
use packet_graph::utils::config::SETTINGS_ENV_VAR;
use packet_graph::utils::Settings;

/// Packet Graph - stacked bar charts of logged packet traffic
#[derive(Parser, Debug)]
#[command(name = "packet-graph")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (TOML)
    #[arg(long, global = true, env = SETTINGS_ENV_VAR)]
    config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Aggregate packet batches and chart them
    Graph {
        /// Packet logger SQLite file
        #[arg(short, long)]
        db: Option<PathBuf>,

        /// Direction filter: all, outgoing or incoming (prompted if omitted)
        #[arg(short, long)]
        filter: Option<String>,

        /// Bucket size: minute or hour (prompted if omitted)
        #[arg(short, long)]
        granularity: Option<String>,

        /// Metric shown when the chart opens: amount or size
        #[arg(short, long)]
        mode: Option<DisplayMode>,

        /// Order of rows in the JSON report: time, amount or size
        #[arg(long, default_value = "time")]
        sort_by: SortBy,

        /// Chart title
        #[arg(long)]
        title: Option<String>,

        /// Chart width in pixels
        #[arg(long)]
        width: Option<usize>,

        /// Chart height in pixels
        #[arg(long)]
        height: Option<usize>,

        /// Keep the interactive HTML chart at this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output path for a static SVG chart (optional)
        #[arg(long)]
        svg: Option<PathBuf>,

        /// Output path for the JSON totals report (optional)
        #[arg(long)]
        json: Option<PathBuf>,

        /// Do not open the chart in the system viewer
        #[arg(long)]
        no_open: bool,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,

        /// Rows shown in the text summary
        #[arg(long, default_value = "15")]
        summary_rows: usize,
    },

    /// Validate a totals report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display the expected database schema
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Graph {
            db,
            filter,
            granularity,
            mode,
            sort_by,
            title,
            width,
            height,
            output,
            svg,
            json,
            no_open,
            summary,
            summary_rows,
        } => {
            let settings = load_settings(cli.config.as_ref())?;
            let mut args = GraphArgs::from_settings(&settings)?;

            if let Some(db) = db {
                args.db_path = db;
            }
            if let Some(mode) = mode {
                args.mode = mode;
            }
            if title.is_some() {
                args.title = title;
            }
            if let Some(width) = width {
                args.width = width;
            }
            if let Some(height) = height {
                args.height = height;
            }
            if no_open {
                args.open_viewer = false;
            }
            args.sort_by = sort_by;
            args.output_html = output;
            args.output_svg = svg;
            args.output_json = json;
            args.print_summary = summary;
            args.summary_rows = summary_rows;

            // Filter and granularity come last so a bad answer stops before any query
            let stdin = io::stdin();
            let mut input = stdin.lock();
            let mut prompt_out = io::stdout();
            let selection = resolve_selection(
                filter.as_deref(),
                granularity.as_deref(),
                &mut input,
                &mut prompt_out,
            )?;
            args.filter = selection.filter;
            args.granularity = selection.granularity;

            // Validate args first
            validate_args(&args)?;

            // Execute graph
            execute_graph(&args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(&file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Load the settings file, or defaults when none is configured
///
/// **Private** - internal command implementation
fn load_settings(path: Option<&PathBuf>) -> Result<Settings> {
    match path {
        Some(path) => {
            debug!("Loading settings from {}", path.display());
            Settings::load(path)
                .with_context(|| format!("Failed to load settings {}", path.display()))
        }
        None => Ok(Settings::default()),
    }
}
