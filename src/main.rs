//! tabgraph - chart a tab metric across numbered JSON snapshots.
//!
//! Reads `data-<i>.json` for every index in range, takes `cpu_usage` or
//! `rss` from the first tab of each and writes one chart per metric.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tabgraph::config::{
    LineKind, MarkerKind, Rgb, DEFAULT_COUNT, DEFAULT_DATA_DIR, DEFAULT_FILE_PREFIX,
    DEFAULT_TICK_INTERVAL,
};
use tabgraph::{build_series, export, plot, ChartStyle, Metric, SeriesConfig, SeriesSummary};
use tracing::{info, warn, Level};

/// Plot a per-tab metric across a sequence of tab snapshots
#[derive(Parser, Debug)]
#[command(name = "tabgraph")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the numbered snapshot files
    #[arg(short, long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Number of snapshot indices to read, starting at 0
    #[arg(
        short = 'n',
        long,
        default_value_t = DEFAULT_COUNT as u32,
        value_parser = clap::value_parser!(u32).range(..=i32::MAX as i64)
    )]
    count: u32,

    /// Snapshot filename prefix, followed by the index and `.json`
    #[arg(long, default_value = DEFAULT_FILE_PREFIX)]
    prefix: String,

    /// Metric to plot (repeatable, default: all)
    #[arg(short, long, value_enum)]
    metric: Vec<Metric>,

    /// Output image path (.png or .svg), only with a single metric
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for charts using their default filenames
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Chart title
    #[arg(long)]
    title: Option<String>,

    /// X axis label
    #[arg(long)]
    x_label: Option<String>,

    /// Y axis label
    #[arg(long)]
    y_label: Option<String>,

    /// Line and marker color (name, single letter or #rrggbb)
    #[arg(long)]
    color: Option<Rgb>,

    /// Marker drawn at each point
    #[arg(long, value_enum, default_value = "circle")]
    marker: MarkerKind,

    /// Line joining the points
    #[arg(long, value_enum, default_value = "solid")]
    line: LineKind,

    /// Distance between x axis ticks, in indices
    #[arg(long, default_value_t = DEFAULT_TICK_INTERVAL)]
    tick_interval: usize,

    /// Disable gridlines
    #[arg(long)]
    no_grid: bool,

    /// Also write the series to this file (.csv or .jsonl)
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Open each chart in the default image viewer once written
    #[arg(long)]
    open: bool,

    /// Skip the summary report
    #[arg(long)]
    no_summary: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn metrics(&self) -> Vec<Metric> {
        if self.metric.is_empty() {
            Metric::ALL.to_vec()
        } else {
            let mut metrics = Vec::new();
            for &metric in &self.metric {
                if !metrics.contains(&metric) {
                    metrics.push(metric);
                }
            }
            metrics
        }
    }

    fn series_config(&self) -> SeriesConfig {
        SeriesConfig {
            file_prefix: self.prefix.clone(),
            ..SeriesConfig::new(&self.data_dir, self.count as usize)
        }
    }

    fn chart_style(&self, metric: Metric, config: &SeriesConfig) -> ChartStyle {
        let mut style = ChartStyle::preset(metric, config.count, config);
        if let Some(title) = &self.title {
            style.title = title.clone();
        }
        if let Some(label) = &self.x_label {
            style.x_label = label.clone();
        }
        if let Some(label) = &self.y_label {
            style.y_label = label.clone();
        }
        if let Some(color) = self.color {
            style.color = color;
        }
        style.marker = self.marker;
        style.line = self.line;
        style.tick_interval = self.tick_interval;
        style.grid = !self.no_grid;
        style
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Format bytes as human-readable string
fn format_bytes(bytes: f64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    if bytes >= GB {
        format!("{:.2} GB", bytes / GB)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes / MB)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes / KB)
    } else {
        format!("{:.0} B", bytes)
    }
}

fn format_value(metric: Metric, value: Option<f64>) -> String {
    match (metric, value) {
        (_, None) => "-".to_string(),
        (Metric::CpuUsage, Some(v)) => format!("{:.1}%", v),
        (Metric::Rss, Some(v)) => format_bytes(v),
    }
}

fn print_summary(summaries: &[SeriesSummary], elapsed_secs: f64) {
    println!("\n{}", "=".repeat(60));
    println!("                    SERIES SUMMARY");
    println!("{}", "=".repeat(60));
    for summary in summaries {
        println!("{}:", summary.metric);
        println!(
            "  Snapshots: {} present, {} missing, {} without tabs (of {})",
            summary.present, summary.missing_files, summary.no_tab_infos, summary.count
        );
        println!(
            "  Value: min {}, max {}, avg {}",
            format_value(summary.metric, summary.min),
            format_value(summary.metric, summary.max),
            format_value(summary.metric, summary.mean)
        );
    }
    println!("Elapsed: {:.2}s", elapsed_secs);
    println!("{}", "=".repeat(60));
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let metrics = args.metrics();
    if args.output.is_some() && metrics.len() > 1 {
        bail!("--output needs a single --metric; use --output-dir for several charts");
    }

    let config = args.series_config();
    let started = Instant::now();
    info!(
        data_dir = %config.data_dir.display(),
        count = config.count,
        "reading snapshots"
    );

    let mut summaries = Vec::with_capacity(metrics.len());
    for metric in metrics.iter().copied() {
        let series = build_series(&config, metric)
            .with_context(|| format!("Failed to build {} series", metric))?;

        let output = args
            .output
            .clone()
            .unwrap_or_else(|| args.output_dir.join(metric.default_output()));
        let style = args.chart_style(metric, &config);
        plot::render(&series, &style, &output)
            .with_context(|| format!("Failed to render {} chart", metric))?;
        eprintln!("Chart written to: {}", output.display());
        if args.open {
            // Display is best effort; the chart is already on disk
            if let Err(e) = opener::open(&output) {
                warn!(path = %output.display(), error = %e, "could not open chart");
            }
        }

        if let Some(dump) = &args.dump {
            let path = if metrics.len() > 1 {
                export::path_for_metric(dump, metric)
            } else {
                dump.clone()
            };
            let rows = export::write_series(&series, &path)
                .with_context(|| format!("Failed to export {} series", metric))?;
            eprintln!("Series ({} rows) written to: {}", rows, path.display());
        }

        summaries.push(series.summary());
    }

    if !args.no_summary {
        print_summary(&summaries, started.elapsed().as_secs_f64());
    }

    Ok(())
}
