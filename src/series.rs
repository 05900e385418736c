//! Building a metric series across the numbered snapshots.

use crate::config::{Metric, SeriesConfig};
use crate::error::{PlotError, Result};
use crate::snapshot::load_snapshot;
use serde::Serialize;
use serde_json::Number;
use tracing::{debug, trace};

/// Where a series value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SampleSource {
    /// Read from the first tab of the snapshot
    Present,
    /// No snapshot file for this index
    MissingFile,
    /// Snapshot exists but carries no `tab_infos` entries
    NoTabInfos,
}

impl SampleSource {
    pub fn as_str(self) -> &'static str {
        match self {
            SampleSource::Present => "present",
            SampleSource::MissingFile => "missing-file",
            SampleSource::NoTabInfos => "no-tab-infos",
        }
    }
}

/// A single point of a series
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub value: Number,
    pub source: SampleSource,
}

impl Sample {
    fn absent(source: SampleSource) -> Self {
        Self {
            value: Number::from(0),
            source,
        }
    }

    pub fn as_f64(&self) -> f64 {
        self.value.as_f64().unwrap_or_default()
    }
}

/// Values of one metric, one per snapshot index.
///
/// Indices with no data hold `0`; their [`SampleSource`] tells them apart
/// from a measured zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    metric: Metric,
    samples: Vec<Sample>,
}

impl Series {
    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    /// Raw values in index order
    pub fn values(&self) -> impl Iterator<Item = &Number> + '_ {
        self.samples.iter().map(|s| &s.value)
    }

    /// `(index, value)` pairs ready for plotting
    pub fn points(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.samples
            .iter()
            .enumerate()
            .map(|(i, s)| (i, s.as_f64()))
    }

    pub fn summary(&self) -> SeriesSummary {
        let mut summary = SeriesSummary {
            metric: self.metric,
            count: self.samples.len(),
            present: 0,
            missing_files: 0,
            no_tab_infos: 0,
            min: None,
            max: None,
            mean: None,
        };

        let mut sum = 0.0;
        for sample in &self.samples {
            match sample.source {
                SampleSource::Present => {
                    let v = sample.as_f64();
                    summary.present += 1;
                    sum += v;
                    summary.min = Some(summary.min.map_or(v, |m: f64| m.min(v)));
                    summary.max = Some(summary.max.map_or(v, |m: f64| m.max(v)));
                }
                SampleSource::MissingFile => summary.missing_files += 1,
                SampleSource::NoTabInfos => summary.no_tab_infos += 1,
            }
        }
        if summary.present > 0 {
            summary.mean = Some(sum / summary.present as f64);
        }

        summary
    }
}

/// Aggregate statistics of a series. Min, max and mean cover present samples only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub metric: Metric,
    pub count: usize,
    pub present: usize,
    pub missing_files: usize,
    pub no_tab_infos: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

/// Build the series of `metric` over snapshots `0..config.count`.
///
/// Missing files and snapshots without tabs contribute `0`. A snapshot that
/// cannot be read or parsed aborts the build.
pub fn build_series(config: &SeriesConfig, metric: Metric) -> Result<Series> {
    let mut samples = Vec::with_capacity(config.count);

    for index in 0..config.count {
        let path = config.path_for(index);
        let sample = match load_snapshot(&path)? {
            None => {
                trace!(index, path = %path.display(), "snapshot missing");
                Sample::absent(SampleSource::MissingFile)
            }
            Some(snapshot) => match snapshot
                .metric(metric)
                .map_err(|reason| PlotError::parse(&path, reason))?
            {
                Some(value) => Sample {
                    value,
                    source: SampleSource::Present,
                },
                None => {
                    debug!(index, path = %path.display(), "snapshot has no tab_infos");
                    Sample::absent(SampleSource::NoTabInfos)
                }
            },
        };
        samples.push(sample);
    }

    debug!(
        metric = %metric,
        present = samples.iter().filter(|s| s.source == SampleSource::Present).count(),
        total = samples.len(),
        "series built"
    );

    Ok(Series { metric, samples })
}
