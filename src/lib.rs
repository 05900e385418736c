//! tabgraph - plot a per-tab metric across numbered JSON tab snapshots.
//!
//! Snapshots `data-0.json .. data-{N-1}.json` are read in index order, the
//! chosen metric is taken from the first `tab_infos` entry of each, and the
//! resulting series is drawn as a line chart.

pub mod config;
pub mod error;
pub mod export;
pub mod plot;
pub mod series;
pub mod snapshot;

pub use config::{ChartStyle, Metric, SeriesConfig};
pub use error::PlotError;
pub use series::{build_series, SampleSource, Series, SeriesSummary};
