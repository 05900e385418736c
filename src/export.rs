//! Dumping a built series to CSV or JSON Lines.

use crate::config::Metric;
use crate::error::{PlotError, Result};
use crate::series::{SampleSource, Series};
use chrono::Utc;
use serde::Serialize;
use serde_json::Number;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// On-disk layout of an exported series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    JsonLines,
}

impl ExportFormat {
    /// `.jsonl` and `.json` select JSON Lines, anything else CSV
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("jsonl") | Some("json") => ExportFormat::JsonLines,
            _ => ExportFormat::Csv,
        }
    }
}

#[derive(Serialize)]
struct SeriesRecord<'a> {
    index: usize,
    metric: Metric,
    value: &'a Number,
    source: SampleSource,
}

/// `series.csv` becomes `series-rss.csv` for [`Metric::Rss`]
pub fn path_for_metric(path: &Path, metric: Metric) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "series".to_string());
    let name = match path.extension() {
        Some(ext) => format!("{}-{}.{}", stem, metric.field(), ext.to_string_lossy()),
        None => format!("{}-{}", stem, metric.field()),
    };
    path.with_file_name(name)
}

/// Write every sample of `series` to `path`, returning the number of rows.
pub fn write_series<P: AsRef<Path>>(series: &Series, path: P) -> Result<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PlotError::write(path, e))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(|e| PlotError::write(path, e))?;
    let mut writer = BufWriter::new(file);

    let written = match ExportFormat::from_path(path) {
        ExportFormat::Csv => write_csv(&mut writer, series),
        ExportFormat::JsonLines => write_json_lines(&mut writer, series),
    }
    .and_then(|rows| writer.flush().map(|_| rows))
    .map_err(|e| PlotError::write(path, e))?;

    Ok(written)
}

fn write_csv(writer: &mut BufWriter<File>, series: &Series) -> io::Result<usize> {
    writeln!(writer, "# tabgraph series export")?;
    writeln!(writer, "# Metric: {}", series.metric())?;
    writeln!(writer, "# Exported: {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(writer, "index,value,source")?;

    for (index, sample) in series.samples().iter().enumerate() {
        writeln!(writer, "{},{},{}", index, sample.value, sample.source.as_str())?;
    }
    Ok(series.len())
}

fn write_json_lines(writer: &mut BufWriter<File>, series: &Series) -> io::Result<usize> {
    for (index, sample) in series.samples().iter().enumerate() {
        let record = SeriesRecord {
            index,
            metric: series.metric(),
            value: &sample.value,
            source: sample.source,
        };
        serde_json::to_writer(&mut *writer, &record)?;
        writeln!(writer)?;
    }
    Ok(series.len())
}
