//! A single plotting panel: artists plus axis decoration.

use serde::{Deserialize, Serialize};

use super::artist::{Artist, BarSeries, Bounds, CellGrid};
use super::style::{LineStyle, Style};
use super::ticks::{autoscale, nice_ticks};
use crate::color::Color;
use crate::model::ErrorBounds;

/// Upper bound on tick intervals along an axis.
pub const MAX_TICKS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    Cartesian2d,
    Cartesian3d,
}

/// Camera angle of a 3D panel, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewAngle {
    pub azimuth: f64,
    pub elevation: f64,
}

impl Default for ViewAngle {
    fn default() -> Self {
        Self {
            azimuth: -60.0,
            elevation: 30.0,
        }
    }
}

/// Which frame edges are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spines {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl Default for Spines {
    fn default() -> Self {
        Self {
            top: true,
            right: true,
            bottom: true,
            left: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axes {
    pub title: Option<String>,
    pub title_size: f64,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub xlabel_size: f64,
    pub ylabel_size: f64,
    pub xlim: Option<(f64, f64)>,
    pub ylim: Option<(f64, f64)>,
    pub zlim: Option<(f64, f64)>,
    /// Draw the frame (spines) at all.
    pub frame_on: bool,
    /// `false` hides ticks, labels and frame entirely.
    pub axis_on: bool,
    pub x_axis_visible: bool,
    pub y_axis_visible: bool,
    pub spines: Spines,
    pub projection: Projection,
    pub view: ViewAngle,
    artists: Vec<Artist>,
}

impl Default for Axes {
    fn default() -> Self {
        Self::new()
    }
}

impl Axes {
    pub fn new() -> Self {
        Self {
            title: None,
            title_size: 12.0,
            xlabel: None,
            ylabel: None,
            xlabel_size: 10.0,
            ylabel_size: 10.0,
            xlim: None,
            ylim: None,
            zlim: None,
            frame_on: true,
            axis_on: true,
            x_axis_visible: true,
            y_axis_visible: true,
            spines: Spines::default(),
            projection: Projection::Cartesian2d,
            view: ViewAngle::default(),
            artists: Vec::new(),
        }
    }

    pub fn new_3d() -> Self {
        Self {
            projection: Projection::Cartesian3d,
            ..Self::new()
        }
    }

    // ─── Drawing ──────────────────────────────────────────────────

    pub fn push(&mut self, artist: Artist) -> &mut Self {
        self.artists.push(artist);
        self
    }

    /// Line/markers through `(xs[i], ys[i])`.
    pub fn plot(&mut self, xs: &[f64], ys: &[f64], style: Style) -> &mut Self {
        self.push(Artist::Line {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            style,
        })
    }

    /// Line/markers of `ys` against their index.
    pub fn plot_series(&mut self, ys: &[f64], style: Style) -> &mut Self {
        let xs: Vec<f64> = (0..ys.len()).map(|i| i as f64).collect();
        self.plot(&xs, ys, style)
    }

    pub fn bar(&mut self, bars: BarSeries) -> &mut Self {
        self.push(Artist::Bars(bars))
    }

    pub fn errorbar(
        &mut self,
        xs: &[f64],
        ys: &[f64],
        yerr: ErrorBounds,
        style: Style,
        capsize: f64,
    ) -> &mut Self {
        self.push(Artist::ErrorBars {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            yerr,
            style,
            capsize,
        })
    }

    pub fn stem(&mut self, xs: &[f64], ys: &[f64], stem: Style, baseline: Option<Style>) -> &mut Self {
        self.push(Artist::Stem {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            stem,
            baseline,
        })
    }

    pub fn hlines(&mut self, y: f64, xmin: f64, xmax: f64, style: Style) -> &mut Self {
        self.push(Artist::HLine { y, xmin, xmax, style })
    }

    /// Free segment that does not affect autoscaling.
    pub fn add_segment(&mut self, x: (f64, f64), y: (f64, f64), style: Style) -> &mut Self {
        self.push(Artist::Segment { x, y, style })
    }

    pub fn text(&mut self, x: f64, y: f64, text: &str, size: f64) -> &mut Self {
        self.push(Artist::Text {
            x,
            y,
            text: text.to_string(),
            size,
            color: Color::BLACK,
        })
    }

    pub fn cells(&mut self, grid: CellGrid) -> &mut Self {
        self.push(Artist::Cells(grid))
    }

    pub fn scatter3d(&mut self, points: Vec<[f64; 3]>, colors: Vec<Color>, size: f64) -> &mut Self {
        self.push(Artist::Scatter3D { points, colors, size })
    }

    pub fn plot3d(&mut self, points: Vec<[f64; 3]>, style: Style) -> &mut Self {
        self.push(Artist::Line3D { points, style })
    }

    pub fn arrow3d(&mut self, from: [f64; 3], to: [f64; 3], color: Color, width: f64) -> &mut Self {
        self.push(Artist::Arrow3D {
            from,
            to,
            color,
            width,
        })
    }

    // ─── Decoration ───────────────────────────────────────────────

    pub fn set_title(&mut self, title: &str) -> &mut Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn set_xlabel(&mut self, label: &str) -> &mut Self {
        self.xlabel = Some(label.to_string());
        self
    }

    pub fn set_ylabel(&mut self, label: &str) -> &mut Self {
        self.ylabel = Some(label.to_string());
        self
    }

    pub fn set_label_size(&mut self, size: f64) -> &mut Self {
        self.xlabel_size = size;
        self.ylabel_size = size;
        self
    }

    pub fn set_xlim(&mut self, lo: f64, hi: f64) -> &mut Self {
        self.xlim = Some((lo, hi));
        self
    }

    pub fn set_ylim(&mut self, lo: f64, hi: f64) -> &mut Self {
        self.ylim = Some((lo, hi));
        self
    }

    /// `[x_min, x_max, y_min, y_max]`, like `Axes.axis(list)`.
    pub fn axis(&mut self, limits: [f64; 4]) -> &mut Self {
        self.xlim = Some((limits[0], limits[1]));
        self.ylim = Some((limits[2], limits[3]));
        self
    }

    pub fn set_frame_on(&mut self, on: bool) -> &mut Self {
        self.frame_on = on;
        self
    }

    /// Hide ticks, labels and frame.
    pub fn axis_off(&mut self) -> &mut Self {
        self.axis_on = false;
        self.frame_on = false;
        self
    }

    /// Hide the top and right spines, keeping ticks on the bottom/left.
    pub fn despine(&mut self) -> &mut Self {
        self.spines.top = false;
        self.spines.right = false;
        self
    }

    // ─── Inspection ───────────────────────────────────────────────

    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    /// `(xs, ys, style)` of every line/marker series, in drawing order.
    pub fn lines(&self) -> Vec<(&[f64], &[f64], &Style)> {
        self.artists
            .iter()
            .filter_map(|a| match a {
                Artist::Line { xs, ys, style } => Some((xs.as_slice(), ys.as_slice(), style)),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<(f64, f64, &str)> {
        self.artists
            .iter()
            .filter_map(|a| match a {
                Artist::Text { x, y, text, .. } => Some((*x, *y, text.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Union of the autoscaling bounds of all artists.
    pub fn data_bounds(&self) -> Option<Bounds> {
        self.artists
            .iter()
            .filter_map(Artist::bounds)
            .reduce(Bounds::union)
    }

    /// Explicit x limits, or autoscaled data bounds.
    pub fn effective_xlim(&self) -> (f64, f64) {
        self.xlim.unwrap_or_else(|| match self.data_bounds() {
            Some(b) => autoscale(b.x.0, b.x.1),
            None => (0.0, 1.0),
        })
    }

    /// Explicit y limits, or autoscaled data bounds.
    pub fn effective_ylim(&self) -> (f64, f64) {
        self.ylim.unwrap_or_else(|| match self.data_bounds() {
            Some(b) => autoscale(b.y.0, b.y.1),
            None => (0.0, 1.0),
        })
    }

    /// 3D limits per axis from explicit limits or the 3D artists.
    pub fn effective_limits3d(&self) -> [(f64, f64); 3] {
        let points: Vec<[f64; 3]> = self.artists.iter().flat_map(Artist::points3d).collect();
        let range = |k: usize| {
            let vals: Vec<f64> = points.iter().map(|p| p[k]).collect();
            match crate::stats::finite_range(&vals) {
                Some((lo, hi)) => autoscale(lo, hi),
                None => (-1.0, 1.0),
            }
        };
        [
            self.xlim.unwrap_or_else(|| range(0)),
            self.ylim.unwrap_or_else(|| range(1)),
            self.zlim.unwrap_or_else(|| range(2)),
        ]
    }

    pub fn xticks(&self) -> Vec<f64> {
        let (lo, hi) = self.effective_xlim();
        nice_ticks(lo, hi, MAX_TICKS)
    }

    pub fn yticks(&self) -> Vec<f64> {
        let (lo, hi) = self.effective_ylim();
        nice_ticks(lo, hi, MAX_TICKS)
    }
}

/// Dashed black style for reference lines.
pub fn dashed(width: f64) -> Style {
    Style::line(Color::BLACK)
        .with_line(LineStyle::Dashed)
        .with_width(width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_keeps_inputs_verbatim() {
        let mut ax = Axes::new();
        ax.plot(&[1.0, 2.0], &[3.0, 4.0], Style::points(Color::BLUE));
        let lines = ax.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, &[1.0, 2.0]);
        assert_eq!(lines[0].1, &[3.0, 4.0]);
    }

    #[test]
    fn plot_series_uses_index_as_x() {
        let mut ax = Axes::new();
        ax.plot_series(&[5.0, 6.0, 7.0], Style::default());
        assert_eq!(ax.lines()[0].0, &[0.0, 1.0, 2.0]);
    }

    #[test]
    fn explicit_limits_override_autoscale() {
        let mut ax = Axes::new();
        ax.plot(&[0.0, 10.0], &[0.0, 10.0], Style::default());
        assert_eq!(ax.effective_xlim(), (-0.5, 10.5));
        ax.axis([0.0, 1.0, -2.0, 2.0]);
        assert_eq!(ax.effective_xlim(), (0.0, 1.0));
        assert_eq!(ax.effective_ylim(), (-2.0, 2.0));
    }

    #[test]
    fn empty_axes_default_to_unit_range() {
        let ax = Axes::new();
        assert_eq!(ax.effective_xlim(), (0.0, 1.0));
        assert!(ax.data_bounds().is_none());
    }

    #[test]
    fn limits3d_cover_points() {
        let mut ax = Axes::new_3d();
        ax.scatter3d(vec![[0.0, 0.0, 0.0], [1.0, 2.0, 3.0]], vec![Color::RED], 10.0);
        let [x, y, z] = ax.effective_limits3d();
        assert!(x.0 < 0.0 && x.1 > 1.0);
        assert!(y.1 > 2.0);
        assert!(z.1 > 3.0);
    }

    #[test]
    fn despine_hides_top_and_right() {
        let mut ax = Axes::new();
        ax.despine();
        assert!(!ax.spines.top && !ax.spines.right);
        assert!(ax.spines.bottom && ax.spines.left);
    }
}
