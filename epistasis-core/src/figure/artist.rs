//! Drawable primitives held by an [`Axes`](super::Axes).

use serde::{Deserialize, Serialize};

use super::style::Style;
use crate::color::Color;
use crate::model::ErrorBounds;
use crate::stats::finite_range;

/// Data-space rectangle `(x_min, x_max, y_min, y_max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

impl Bounds {
    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            x: (self.x.0.min(other.x.0), self.x.1.max(other.x.1)),
            y: (self.y.0.min(other.y.0), self.y.1.max(other.y.1)),
        }
    }

    fn from_ranges(x: Option<(f64, f64)>, y: Option<(f64, f64)>) -> Option<Bounds> {
        Some(Bounds { x: x?, y: y? })
    }
}

/// Vertical bars centred on `x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub x: Vec<f64>,
    pub heights: Vec<f64>,
    pub width: f64,
    /// One color per bar.
    pub colors: Vec<Color>,
    /// Error bar lengths below/above each bar top.
    pub yerr: Option<ErrorBounds>,
    pub ecolor: Color,
    /// Cap half-width in points.
    pub capsize: f64,
    /// Outline color; `None` draws no outline.
    pub edge: Option<Color>,
}

/// Image-like grid of colored cells spanning `extent = [x0, x1, y0, y1]`.
/// Row 0 is drawn at the top (`y1`); `None` cells are transparent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellGrid {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<Option<Color>>,
    pub extent: [f64; 4],
}

impl CellGrid {
    pub fn new(rows: usize, cols: usize, extent: [f64; 4]) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
            extent,
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Color> {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col]
        } else {
            None
        }
    }

    pub fn set(&mut self, row: usize, col: usize, color: Option<Color>) {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col] = color;
        }
    }

    /// Data-space rectangle `(x0, x1, y0, y1)` of a cell.
    pub fn cell_rect(&self, row: usize, col: usize) -> (f64, f64, f64, f64) {
        let [x0, x1, y0, y1] = self.extent;
        let w = (x1 - x0) / self.cols.max(1) as f64;
        let h = (y1 - y0) / self.rows.max(1) as f64;
        let left = x0 + col as f64 * w;
        let top = y1 - row as f64 * h;
        (left, left + w, top - h, top)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Artist {
    /// Polyline and/or markers through `(xs[i], ys[i])`.
    Line { xs: Vec<f64>, ys: Vec<f64>, style: Style },
    Bars(BarSeries),
    /// Points with vertical error bars.
    ErrorBars {
        xs: Vec<f64>,
        ys: Vec<f64>,
        yerr: ErrorBounds,
        style: Style,
        capsize: f64,
    },
    /// Horizontal line at `y` from `xmin` to `xmax`.
    HLine { y: f64, xmin: f64, xmax: f64, style: Style },
    /// Free line segment; does not take part in autoscaling.
    Segment { x: (f64, f64), y: (f64, f64), style: Style },
    /// Stem plot: a stem from the baseline to each point.
    Stem {
        xs: Vec<f64>,
        ys: Vec<f64>,
        stem: Style,
        baseline: Option<Style>,
    },
    /// Text anchored at its lower-left corner; not autoscaled.
    Text {
        x: f64,
        y: f64,
        text: String,
        size: f64,
        color: Color,
    },
    Cells(CellGrid),
    Line3D { points: Vec<[f64; 3]>, style: Style },
    /// One marker per point; colors cycle when fewer colors than points.
    Scatter3D {
        points: Vec<[f64; 3]>,
        colors: Vec<Color>,
        size: f64,
    },
    Arrow3D {
        from: [f64; 3],
        to: [f64; 3],
        color: Color,
        width: f64,
    },
}

impl Artist {
    /// 2D data bounds used for autoscaling. Segments, text and 3D artists
    /// do not contribute.
    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            Artist::Line { xs, ys, .. } => Bounds::from_ranges(finite_range(xs), finite_range(ys)),
            Artist::Bars(bars) => {
                let half = bars.width / 2.0;
                let x = finite_range(&bars.x).map(|(lo, hi)| (lo - half, hi + half));
                let mut ys: Vec<f64> = bars.heights.clone();
                ys.push(0.0);
                if let Some(err) = &bars.yerr {
                    for (i, h) in bars.heights.iter().enumerate() {
                        if let Some(up) = err.upper.get(i) {
                            ys.push(h + up);
                        }
                        if let Some(low) = err.lower.get(i) {
                            ys.push(h - low);
                        }
                    }
                }
                Bounds::from_ranges(x, finite_range(&ys))
            }
            Artist::ErrorBars { xs, ys, yerr, .. } => {
                let mut span: Vec<f64> = ys.clone();
                for (i, y) in ys.iter().enumerate() {
                    if let Some(up) = yerr.upper.get(i) {
                        span.push(y + up);
                    }
                    if let Some(low) = yerr.lower.get(i) {
                        span.push(y - low);
                    }
                }
                Bounds::from_ranges(finite_range(xs), finite_range(&span))
            }
            Artist::HLine { y, xmin, xmax, .. } => {
                Bounds::from_ranges(finite_range(&[*xmin, *xmax]), finite_range(&[*y]))
            }
            Artist::Stem { xs, ys, .. } => {
                let mut span = ys.clone();
                span.push(0.0);
                Bounds::from_ranges(finite_range(xs), finite_range(&span))
            }
            Artist::Cells(grid) => {
                let [x0, x1, y0, y1] = grid.extent;
                Some(Bounds {
                    x: (x0.min(x1), x0.max(x1)),
                    y: (y0.min(y1), y0.max(y1)),
                })
            }
            Artist::Segment { .. }
            | Artist::Text { .. }
            | Artist::Line3D { .. }
            | Artist::Scatter3D { .. }
            | Artist::Arrow3D { .. } => None,
        }
    }

    /// 3D points of a 3D artist.
    pub fn points3d(&self) -> Vec<[f64; 3]> {
        match self {
            Artist::Line3D { points, .. } | Artist::Scatter3D { points, .. } => points.clone(),
            Artist::Arrow3D { from, to, .. } => vec![*from, *to],
            _ => Vec::new(),
        }
    }
}
