//! Run configuration: which snapshots to read, which metric to extract and
//! how the resulting chart looks.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Directory holding the numbered snapshots
pub const DEFAULT_DATA_DIR: &str = "tab_data";
/// Number of snapshot indices visited, `0..DEFAULT_COUNT`
pub const DEFAULT_COUNT: usize = 200;
pub const DEFAULT_FILE_PREFIX: &str = "data-";
pub const DEFAULT_FILE_EXTENSION: &str = "json";
/// One x tick every this many indices
pub const DEFAULT_TICK_INTERVAL: usize = 10;
/// 10x5 inch figure at 100 dpi
pub const DEFAULT_SIZE: (u32, u32) = (1000, 500);

/// Per-tab metric that can be plotted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// CPU usage of the tab process (%)
    CpuUsage,
    /// Resident set size of the tab process (bytes)
    Rss,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::CpuUsage, Metric::Rss];

    /// Key of the metric inside a `tab_infos` entry
    pub fn field(self) -> &'static str {
        match self {
            Metric::CpuUsage => "cpu_usage",
            Metric::Rss => "rss",
        }
    }

    /// Output filename used when none is given
    pub fn default_output(self) -> &'static str {
        match self {
            Metric::CpuUsage => "cpu_usage_graph.png",
            Metric::Rss => "rss_values_graph.png",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

/// Where snapshots live and how they are named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesConfig {
    pub data_dir: PathBuf,
    pub count: usize,
    pub file_prefix: String,
    pub file_extension: String,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            count: DEFAULT_COUNT,
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
        }
    }
}

impl SeriesConfig {
    pub fn new<P: Into<PathBuf>>(data_dir: P, count: usize) -> Self {
        Self {
            data_dir: data_dir.into(),
            count,
            ..Self::default()
        }
    }

    pub fn file_name(&self, index: usize) -> String {
        format!("{}{}.{}", self.file_prefix, index, self.file_extension)
    }

    /// Path of the snapshot for `index`
    pub fn path_for(&self, index: usize) -> PathBuf {
        self.data_dir.join(self.file_name(index))
    }
}

/// RGB color, parsed from a name or `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const BLUE: Rgb = Rgb(0, 0, 255);
}

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(format!("expected #rrggbb, got '{}'", s));
            }
            let channel = |range: std::ops::Range<usize>| {
                u8::from_str_radix(&hex[range], 16).map_err(|_| format!("invalid hex color '{}'", s))
            };
            return Ok(Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?));
        }

        // Single-letter names follow the usual plotting shorthands
        match s.to_ascii_lowercase().as_str() {
            "r" | "red" => Ok(Rgb::RED),
            "b" | "blue" => Ok(Rgb::BLUE),
            "g" | "green" => Ok(Rgb(0, 128, 0)),
            "c" | "cyan" => Ok(Rgb(0, 191, 191)),
            "m" | "magenta" => Ok(Rgb(191, 0, 191)),
            "y" | "yellow" => Ok(Rgb(191, 191, 0)),
            "k" | "black" => Ok(Rgb(0, 0, 0)),
            "w" | "white" => Ok(Rgb(255, 255, 255)),
            _ => Err(format!("unknown color '{}'", s)),
        }
    }
}

/// Marker drawn at every data point
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MarkerKind {
    Circle,
    Cross,
    Triangle,
    None,
}

/// Line joining consecutive data points
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LineKind {
    Solid,
    None,
}

/// Labels and styling of a rendered chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub color: Rgb,
    pub marker: MarkerKind,
    pub line: LineKind,
    pub tick_interval: usize,
    pub size: (u32, u32),
    pub grid: bool,
}

impl ChartStyle {
    /// Styling for `metric` over `count` snapshots
    pub fn preset(metric: Metric, count: usize, config: &SeriesConfig) -> Self {
        let range = format!(
            "{} to {}",
            config.file_name(0),
            config.file_name(count.saturating_sub(1))
        );
        let (title, y_label, color) = match metric {
            Metric::CpuUsage => (format!("CPU Usage from {}", range), "CPU Usage (%)", Rgb::RED),
            Metric::Rss => (format!("RSS Values from {}", range), "RSS Value (bytes)", Rgb::BLUE),
        };

        Self {
            title,
            x_label: "File Index".to_string(),
            y_label: y_label.to_string(),
            color,
            marker: MarkerKind::Circle,
            line: LineKind::Solid,
            tick_interval: DEFAULT_TICK_INTERVAL,
            size: DEFAULT_SIZE,
            grid: true,
        }
    }
}

/// Image format of a rendered chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Svg,
}

impl OutputFormat {
    /// Infer the format from the file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(OutputFormat::Png),
            "svg" => Some(OutputFormat::Svg),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths() {
        let config = SeriesConfig::default();
        assert_eq!(config.count, 200);
        assert_eq!(config.path_for(0), Path::new("tab_data/data-0.json"));
        assert_eq!(config.path_for(199), Path::new("tab_data/data-199.json"));
    }

    #[test]
    fn presets_match_metric() {
        let config = SeriesConfig::default();
        let cpu = ChartStyle::preset(Metric::CpuUsage, 200, &config);
        assert_eq!(cpu.title, "CPU Usage from data-0.json to data-199.json");
        assert_eq!(cpu.y_label, "CPU Usage (%)");
        assert_eq!(cpu.color, Rgb::RED);
        assert_eq!(cpu.tick_interval, 10);

        let rss = ChartStyle::preset(Metric::Rss, 200, &config);
        assert_eq!(rss.title, "RSS Values from data-0.json to data-199.json");
        assert_eq!(rss.y_label, "RSS Value (bytes)");
        assert_eq!(rss.color, Rgb::BLUE);
        assert_eq!(rss.x_label, "File Index");
    }

    #[test]
    fn parses_colors() {
        assert_eq!("r".parse::<Rgb>(), Ok(Rgb::RED));
        assert_eq!("Blue".parse::<Rgb>(), Ok(Rgb::BLUE));
        assert_eq!("#1a2B3c".parse::<Rgb>(), Ok(Rgb(0x1a, 0x2b, 0x3c)));
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("#zzzzzz".parse::<Rgb>().is_err());
        assert!("mauve".parse::<Rgb>().is_err());
    }

    #[test]
    fn output_format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("a.png")), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::from_path(Path::new("out/a.SVG")), Some(OutputFormat::Svg));
        assert_eq!(OutputFormat::from_path(Path::new("a.gif")), None);
        assert_eq!(OutputFormat::from_path(Path::new("graph")), None);
    }

    #[test]
    fn metric_fields() {
        assert_eq!(Metric::CpuUsage.field(), "cpu_usage");
        assert_eq!(Metric::Rss.to_string(), "rss");
        assert_eq!(Metric::Rss.default_output(), "rss_values_graph.png");
    }
}
