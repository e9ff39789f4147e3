//! Scatter plots of sweep and trace results, rendered to SVG.

use std::fs;
use std::ops::Range;
use std::path::Path;

use plotters::prelude::*;
use tracing::info;

use crate::error::{ExplorerError, Result};
use crate::sweep::SweepResult;
use crate::trace::Trace;

pub const DEFAULT_SIZE: (u32, u32) = (1200, 700);

const COLORS: [RGBColor; 3] = [BLUE, RED, GREEN];

/// One labelled point set.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

/// A scatter chart: caption, axis labels and one or more series.
#[derive(Debug, Clone, PartialEq)]
pub struct Scatter {
    pub caption: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<ScatterSeries>,
}

impl Scatter {
    /// `(k, n)` for every swept parameter.
    pub fn from_sweep(result: &SweepResult) -> Self {
        Self {
            caption: format!("Steps to d ≥ 0 over {} values of k", result.len()),
            x_label: "k".into(),
            y_label: "n".into(),
            series: vec![ScatterSeries {
                label: "n(k)".into(),
                points: result.points(),
            }],
        }
    }

    /// Whichever of `(n, s)` and `(n, 0.5^(k/n))` the trace recorded.
    pub fn from_trace(trace: &Trace) -> Self {
        let as_points = |v: &[(u64, f64)]| -> Vec<(f64, f64)> {
            v.iter().map(|&(n, y)| (n as f64, y)).collect()
        };

        let mut series = Vec::new();
        if !trace.running_sum.is_empty() {
            series.push(ScatterSeries {
                label: "s".into(),
                points: as_points(&trace.running_sum),
            });
        }
        if !trace.decay.is_empty() {
            series.push(ScatterSeries {
                label: "0.5^(k/n)".into(),
                points: as_points(&trace.decay),
            });
        }
        Self {
            caption: format!("Trace at k = {}", trace.k),
            x_label: "n".into(),
            y_label: "value".into(),
            series,
        }
    }

    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    /// Padded `(x, y)` plotting ranges covering every point.
    ///
    /// Non-finite coordinates are rejected; plotters cannot lay out an
    /// infinite axis.
    fn bounds(&self) -> Result<(Range<f64>, Range<f64>)> {
        let mut pts = self.series.iter().flat_map(|s| s.points.iter());
        if let Some(&(x, y)) = pts.clone().find(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(ExplorerError::Plot(format!("non-finite point ({x}, {y})")));
        }
        let &(x0, y0) = pts
            .next()
            .ok_or_else(|| ExplorerError::Plot("no points to plot".into()))?;
        let (mut x_min, mut x_max, mut y_min, mut y_max) = (x0, x0, y0, y0);
        for &(x, y) in pts {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
        Ok((padded(x_min, x_max), padded(y_min, y_max)))
    }
}

fn padded(lo: f64, hi: f64) -> Range<f64> {
    let span = hi - lo;
    let pad = if span > 0.0 { 0.05 * span } else { 1.0 };
    (lo - pad)..(hi + pad)
}

fn plot_err<E: std::fmt::Display>(e: E) -> ExplorerError {
    ExplorerError::Plot(e.to_string())
}

/// Render `scatter` to an SVG document.
pub fn render_svg(scatter: &Scatter, size: (u32, u32)) -> Result<String> {
    let (x_range, y_range) = scatter.bounds()?;

    let mut out = String::new();
    {
        let root = SVGBackend::with_string(&mut out, size).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&scatter.caption, ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_range)
            .map_err(plot_err)?;

        chart
            .configure_mesh()
            .x_desc(scatter.x_label.as_str())
            .y_desc(scatter.y_label.as_str())
            .draw()
            .map_err(plot_err)?;

        for (i, series) in scatter.series.iter().enumerate() {
            let color = COLORS[i % COLORS.len()];
            chart
                .draw_series(
                    series
                        .points
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), 3, color.filled())),
                )
                .map_err(plot_err)?
                .label(series.label.as_str())
                .legend(move |(x, y)| Circle::new((x, y), 3, color.filled()));
        }

        if scatter.series.len() > 1 {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(plot_err)?;
        }

        root.present().map_err(plot_err)?;
    }
    Ok(out)
}

/// Render `scatter` and write it to `path`, creating parent directories.
pub fn write_svg(scatter: &Scatter, path: &Path) -> Result<()> {
    let svg = render_svg(scatter, DEFAULT_SIZE)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, svg)?;
    info!(path = %path.display(), points = scatter.point_count(), "plot written");
    Ok(())
}
