//! Chart rendering for a built series.

use crate::config::{ChartStyle, LineKind, MarkerKind, OutputFormat, Rgb};
use crate::error::{PlotError, Result};
use crate::series::{Sample, Series};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontStyle;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing::info;

/// Font used for captions and axis labels, so bitmap output needs no system fonts
static SANS_SERIF: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");

/// Register the bundled font under the family names charts use
fn register_fonts() -> std::result::Result<(), &'static str> {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    let registered = *REGISTERED.get_or_init(|| {
        plotters::style::register_font("sans-serif", FontStyle::Normal, SANS_SERIF).is_ok()
    });
    if registered {
        Ok(())
    } else {
        Err("bundled font could not be loaded")
    }
}

impl From<Rgb> for RGBColor {
    fn from(c: Rgb) -> Self {
        RGBColor(c.0, c.1, c.2)
    }
}

/// Render `series` as a line chart and write it to `path`.
///
/// The image format follows the extension (`.png` or `.svg`). An existing
/// file is overwritten and missing parent directories are created.
pub fn render<P: AsRef<Path>>(series: &Series, style: &ChartStyle, path: P) -> Result<()> {
    let path = path.as_ref();
    let format = OutputFormat::from_path(path)
        .ok_or_else(|| PlotError::write(path, "unsupported output format, expected .png or .svg"))?;
    let len = i32::try_from(series.len())
        .map_err(|_| PlotError::write(path, format!("{} points exceed the plottable range", series.len())))?;
    register_fonts().map_err(|e| PlotError::write(path, e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PlotError::write(path, e))?;
    }

    match format {
        OutputFormat::Png => {
            let root = BitMapBackend::new(path, style.size).into_drawing_area();
            draw_chart(&root, series, len, style).map_err(|e| PlotError::write(path, e))?;
        }
        OutputFormat::Svg => {
            let root = SVGBackend::new(path, style.size).into_drawing_area();
            draw_chart(&root, series, len, style).map_err(|e| PlotError::write(path, e))?;
        }
    }

    info!(metric = %series.metric(), path = %path.display(), "chart written");
    Ok(())
}

/// Y range covering every value, always including zero
fn y_bounds(series: &Series) -> (f64, f64) {
    let (min, max) = series
        .points()
        .fold((0.0_f64, 0.0_f64), |(lo, hi), (_, y)| (lo.min(y), hi.max(y)));
    let top = if max > 0.0 { max * 1.1 } else { 1.0 };
    (min * 1.1, top)
}

/// Index of every `interval`-th point, starting at zero
fn tick_positions(len: i32, interval: usize) -> Vec<i32> {
    (0..len.max(1)).step_by(interval.max(1)).collect()
}

fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    series: &Series,
    len: i32,
    style: &ChartStyle,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let color: RGBColor = style.color.into();
    let points: Vec<(i32, f64)> = (0..len)
        .zip(series.samples().iter().map(Sample::as_f64))
        .collect();
    let last = (len - 1).max(1);
    let (y_min, y_max) = y_bounds(series);

    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(root)
        .caption(&style.title, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(
            (0..last).with_key_points(tick_positions(len, style.tick_interval)),
            y_min..y_max,
        )?;

    let mut mesh = chart.configure_mesh();
    mesh.x_desc(style.x_label.as_str())
        .y_desc(style.y_label.as_str())
        .y_labels(10);
    if !style.grid {
        mesh.disable_mesh();
    }
    mesh.draw()?;

    if style.line == LineKind::Solid {
        chart.draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?;
    }

    match style.marker {
        MarkerKind::Circle => {
            chart.draw_series(points.iter().map(|&p| Circle::new(p, 3, color.filled())))?;
        }
        MarkerKind::Cross => {
            chart.draw_series(points.iter().map(|&p| Cross::new(p, 3, color)))?;
        }
        MarkerKind::Triangle => {
            chart.draw_series(points.iter().map(|&p| TriangleMarker::new(p, 4, color.filled())))?;
        }
        MarkerKind::None => {}
    }

    root.present()?;
    Ok(())
}
