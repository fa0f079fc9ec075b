//! Bar chart of epistatic coefficients over a site-by-term grid.
//!
//! The top panel draws one bar per coefficient, colored by interaction order
//! when significant and gray otherwise, with stars stacked under each bar for
//! every p-value cutoff it passes. The bottom panel is a sites × terms grid
//! marking which sites each term involves.
//!
//! [`InteractionLayout`] holds the pure computation (p-values, colors, stars,
//! bar geometry) so it can be inspected without drawing anything.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use epistasis_core::color::{default_order_colors, Color};
use epistasis_core::figure::{dashed, BarSeries, CellGrid, Figure, Style};
use epistasis_core::model::{label_order, EpistasisModel, ErrorBounds, Label};
use epistasis_core::stats::{max_abs, two_sided_p};

use crate::error::{check_len, PlotError};

/// Bar width in term units.
pub const BAR_WIDTH: f64 = 0.8;

/// Font size of significance stars, in points.
const STAR_SIZE: f64 = 10.0;

// ─── Options ─────────────────────────────────────────────────────────

/// How p-values are derived from z-scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Significance {
    /// Raw p-values multiplied by the number of coefficients.
    #[serde(rename = "bon")]
    Bonferroni,
    /// Raw two-sided p-values.
    #[serde(rename = "p")]
    Raw,
    /// Every term is colored and no stars are drawn.
    #[serde(rename = "none")]
    Ignore,
}

impl Significance {
    /// Parse an optional mode; `None` means [`Significance::Ignore`].
    pub fn parse(mode: Option<&str>) -> Result<Self, PlotError> {
        match mode {
            None => Ok(Significance::Ignore),
            Some(s) => s.parse(),
        }
    }
}

impl FromStr for Significance {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bon" => Ok(Significance::Bonferroni),
            "p" => Ok(Significance::Raw),
            "none" | "" => Ok(Significance::Ignore),
            other => Err(PlotError::UnknownSignificance(other.to_string())),
        }
    }
}

impl fmt::Display for Significance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Significance::Bonferroni => "bon",
            Significance::Raw => "p",
            Significance::Ignore => "none",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionOptions {
    /// One color per interaction order; `None` draws every bar gray.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_colors: Option<Vec<Color>>,
    pub significance: Significance,
    /// A term is significant when its p-value is below this.
    pub significance_cutoff: f64,
    /// Error bar length in standard errors. Zero disables significance.
    /// Clipped or unbounded error bars are drawn `(1 + y_scalar)` times the
    /// tallest bar long.
    pub sigmas: f64,
    /// Plot log-transformed coefficients.
    pub log_space: bool,
    /// Y range is `±y_scalar` times the tallest bar.
    pub y_scalar: f64,
    pub y_axis_name: String,
    pub figsize: (f64, f64),
    /// Height of the bar panel relative to the grid panel.
    pub height_ratio: f64,
    /// Star thresholds, least to most significant.
    pub star_cutoffs: Vec<f64>,
    /// Vertical gap between stacked stars as a fraction of the y range.
    pub star_spacer: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ybounds: Option<(f64, f64)>,
    /// Outline every bar in black.
    pub bar_borders: bool,
    pub capsize: f64,
    /// Draw the site grid under the bars.
    pub xgrid: bool,
    /// Color every term by order regardless of significance.
    pub colorall: bool,
}

impl Default for InteractionOptions {
    fn default() -> Self {
        Self {
            order_colors: Some(default_order_colors()),
            significance: Significance::Bonferroni,
            significance_cutoff: 0.05,
            sigmas: 1.0,
            log_space: false,
            y_scalar: 1.5,
            y_axis_name: "interaction".to_string(),
            figsize: (8.0, 10.0),
            height_ratio: 12.0,
            star_cutoffs: vec![0.05, 0.01, 0.001],
            star_spacer: 0.0075,
            ybounds: None,
            bar_borders: false,
            capsize: 2.0,
            xgrid: true,
            colorall: false,
        }
    }
}

impl InteractionOptions {
    /// Significance mode and sigma multiplier after reconciling the two:
    /// zero sigmas ignore significance, and ignoring significance zeroes
    /// the sigmas.
    pub fn effective(&self) -> (Significance, f64) {
        if self.sigmas == 0.0 || self.significance == Significance::Ignore {
            (Significance::Ignore, 0.0)
        } else {
            (self.significance, self.sigmas)
        }
    }

    /// Gray for insignificant terms at index 0, then one color per order.
    pub fn palette(&self, highest_order: usize) -> Result<Vec<Color>, PlotError> {
        match &self.order_colors {
            None => Ok(vec![Color::GRAY; highest_order + 1]),
            Some(colors) if colors.len() < highest_order => Err(PlotError::TooFewOrderColors {
                needed: highest_order,
                given: colors.len(),
            }),
            Some(colors) => {
                let mut palette = Vec::with_capacity(colors.len() + 1);
                palette.push(Color::GRAY);
                palette.extend_from_slice(colors);
                Ok(palette)
            }
        }
    }
}

// ─── Significance primitives ─────────────────────────────────────────

/// Number of leading `cutoffs` that `p` is below. Counting stops at the
/// first cutoff `p` does not pass.
pub fn star_count(p: f64, cutoffs: &[f64]) -> usize {
    cutoffs.iter().take_while(|&&cutoff| p < cutoff).count()
}

/// Palette slot of a term: `order - 1` when significant (or when coloring
/// everything), `None` for the insignificant gray.
pub fn color_index(order: usize, p: f64, cutoff: f64, colorall: bool) -> Option<usize> {
    if colorall || p < cutoff {
        Some(order.saturating_sub(1))
    } else {
        None
    }
}

/// Color of a palette slot from [`color_index`].
pub fn palette_color(palette: &[Color], index: Option<usize>) -> Color {
    let slot = index.map_or(0, |k| k + 1);
    palette.get(slot).copied().unwrap_or(Color::GRAY)
}

/// `|(beta - center) / sigma|`; NaN when both are zero.
fn z_scores(beta: &[f64], sigma: &[f64], center: f64) -> Vec<f64> {
    beta.iter()
        .zip(sigma)
        .map(|(b, s)| ((b - center) / s).abs())
        .collect()
}

/// Two-sided p-value of a z-score; an undefined z-score is never
/// significant.
fn p_value(z: f64) -> f64 {
    if z.is_nan() {
        1.0
    } else {
        two_sided_p(z)
    }
}

fn log_with_base(x: f64, base: f64) -> f64 {
    x.ln() / base.ln()
}

// ─── Layout ──────────────────────────────────────────────────────────

/// Everything the interaction chart draws, in term order (intercept
/// excluded).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionLayout {
    pub labels: Vec<Label>,
    /// Significance mode after reconciling with `sigmas`.
    pub significance: Significance,
    pub sigmas: f64,
    pub p_values: Vec<f64>,
    /// Effective significance cutoff (1 when significance is ignored).
    pub cutoff: f64,
    pub color_index: Vec<Option<usize>>,
    pub palette: Vec<Color>,
    pub colors: Vec<Color>,
    pub star_counts: Vec<usize>,
    pub heights: Vec<f64>,
    pub yerr: Option<ErrorBounds>,
    pub y_range: (f64, f64),
    /// Term indices where the interaction order changes.
    pub order_breaks: Vec<usize>,
    /// Distinct sites in ascending order; grid row `r` is `sites[r]`.
    pub sites: Vec<usize>,
    pub grid: CellGrid,
}

/// Per-term inputs shared by both entry points.
struct Terms {
    labels: Vec<Label>,
    z: Vec<f64>,
    heights: Vec<f64>,
    yerr: Option<ErrorBounds>,
}

impl InteractionLayout {
    /// Layout of a model's coefficients.
    ///
    /// Log-transformed models are tested for significance on their
    /// untransformed coefficients, as multiplicative effects around 1.
    pub fn from_model<M: EpistasisModel + ?Sized>(
        model: &M,
        opts: &InteractionOptions,
    ) -> Result<Self, PlotError> {
        let ints = model.interactions();
        ints.validate()?;
        let (_, sigmas) = opts.effective();
        let skip = usize::from(ints.labels.first().is_some_and(|l| l.as_slice() == [0]));
        let labels = ints.labels[skip..].to_vec();

        if opts.log_space && !model.log_transform() {
            return Err(PlotError::LogScaling);
        }
        let raw = || {
            ints.raw
                .as_ref()
                .ok_or(PlotError::Missing("untransformed interaction values"))
        };
        let errors = || {
            if ints.err.is_empty() {
                Err(PlotError::Missing("interaction standard errors"))
            } else {
                Ok(&ints.err)
            }
        };

        let z = if sigmas == 0.0 {
            Vec::new()
        } else if model.log_transform() {
            let raw = raw()?;
            z_scores(&raw.values[skip..], &raw.err.upper[skip..], 1.0)
        } else {
            z_scores(&ints.values[skip..], &errors()?.upper[skip..], 0.0)
        };

        let (heights, yerr) = if sigmas == 0.0 {
            let heights = if opts.log_space || !model.log_transform() {
                ints.values[skip..].to_vec()
            } else {
                raw()?.values[skip..].to_vec()
            };
            (heights, None)
        } else if opts.log_space {
            let raw = raw()?;
            let base = model.log_base();
            let values = &raw.values[skip..];
            let upper = values
                .iter()
                .zip(&raw.err.upper[skip..])
                .map(|(v, e)| log_with_base(1.0 + sigmas * e / v, base))
                .collect();
            let lower = values
                .iter()
                .zip(&raw.err.lower[skip..])
                .map(|(v, e)| log_with_base(1.0 - sigmas * e / v, base).abs())
                .collect();
            (ints.values[skip..].to_vec(), Some(ErrorBounds { lower, upper }))
        } else if model.log_transform() {
            let raw = raw()?;
            let err = ErrorBounds {
                lower: raw.err.lower[skip..].to_vec(),
                upper: raw.err.upper[skip..].to_vec(),
            };
            (raw.values[skip..].to_vec(), Some(err.scaled(sigmas)))
        } else {
            let all = errors()?;
            let err = ErrorBounds {
                lower: all.lower[skip..].to_vec(),
                upper: all.upper[skip..].to_vec(),
            };
            (ints.values[skip..].to_vec(), Some(err.scaled(sigmas)))
        };

        Self::assemble(
            Terms {
                labels,
                z,
                heights,
                yerr,
            },
            opts,
            false,
        )
    }

    /// Layout of raw coefficient arrays.
    ///
    /// A leading `[0]` label is dropped together with its value and errors.
    /// In log space, bars are `log10(beta)` and significance is tested
    /// around 1 using the error on the side facing 1. Error bars longer than
    /// `y_scalar` times the tallest bar are clipped.
    pub fn from_arrays(
        beta: &[f64],
        labels: &[Label],
        err: &ErrorBounds,
        opts: &InteractionOptions,
    ) -> Result<Self, PlotError> {
        check_len("interaction labels", beta.len(), labels.len())?;
        let (_, sigmas) = opts.effective();
        let skip = usize::from(labels.first().is_some_and(|l| l.as_slice() == [0]));
        let beta = &beta[skip..];
        let labels = labels[skip..].to_vec();

        let (lower, upper) = if err.is_empty() {
            if sigmas != 0.0 {
                return Err(PlotError::Missing("interaction standard errors"));
            }
            (Vec::new(), Vec::new())
        } else {
            check_len("interaction upper errors", beta.len() + skip, err.upper.len())?;
            check_len("interaction lower errors", beta.len() + skip, err.lower.len())?;
            (err.lower[skip..].to_vec(), err.upper[skip..].to_vec())
        };

        let z = if sigmas == 0.0 {
            Vec::new()
        } else if opts.log_space {
            let facing: Vec<f64> = beta
                .iter()
                .enumerate()
                .map(|(i, &b)| if b > 1.0 { lower[i] } else { upper[i] })
                .collect();
            z_scores(beta, &facing, 1.0)
        } else {
            z_scores(beta, &upper, 0.0)
        };

        let heights: Vec<f64> = if opts.log_space {
            beta.iter().map(|b| b.log10()).collect()
        } else {
            beta.to_vec()
        };
        if heights.iter().any(|h| !h.is_finite()) {
            warn!("non-finite interaction values will not be drawn");
        }

        let yerr = if sigmas == 0.0 {
            None
        } else if opts.log_space {
            let upper = beta
                .iter()
                .zip(&upper)
                .map(|(b, e)| sigmas * (1.0 + e / b).log10())
                .collect();
            let lower = beta
                .iter()
                .zip(&lower)
                .map(|(b, e)| sigmas * (1.0 - e / b).log10().abs())
                .collect();
            Some(ErrorBounds { lower, upper })
        } else {
            Some(ErrorBounds { lower, upper }.scaled(sigmas))
        };

        Self::assemble(
            Terms {
                labels,
                z,
                heights,
                yerr,
            },
            opts,
            true,
        )
    }

    fn assemble(terms: Terms, opts: &InteractionOptions, clip: bool) -> Result<Self, PlotError> {
        let Terms {
            labels,
            z,
            heights,
            yerr,
        } = terms;
        let n = labels.len();
        if n == 0 {
            return Err(PlotError::EmptyData("interaction terms"));
        }
        let (significance, sigmas) = opts.effective();
        let highest_order = labels.iter().map(|l| label_order(l)).max().unwrap_or(0);
        let palette = opts.palette(highest_order)?;

        let (p_values, cutoff): (Vec<f64>, f64) = match significance {
            Significance::Ignore => (vec![0.0; n], 1.0),
            Significance::Raw => (z.iter().map(|&z| p_value(z)).collect(), opts.significance_cutoff),
            Significance::Bonferroni => (
                z.iter().map(|&z| p_value(z) * n as f64).collect(),
                opts.significance_cutoff,
            ),
        };

        let color_index: Vec<Option<usize>> = labels
            .iter()
            .zip(&p_values)
            .map(|(l, &p)| color_index(label_order(l), p, cutoff, opts.colorall))
            .collect();
        let colors: Vec<Color> = color_index
            .iter()
            .map(|&idx| palette_color(&palette, idx))
            .collect();

        let tallest = max_abs(&heights);
        let y_range = match opts.ybounds {
            Some(bounds) => bounds,
            None if tallest > 0.0 => (-opts.y_scalar * tallest, opts.y_scalar * tallest),
            None => (-1.0, 1.0),
        };

        let yerr = yerr.map(|err| {
            let cap = (1.0 + opts.y_scalar) * tallest;
            let limit = opts.y_scalar * tallest;
            let mut clipped = 0usize;
            let mut fix = |e: f64| {
                if !e.is_finite() || (clip && e > limit) {
                    clipped += 1;
                    cap
                } else {
                    e
                }
            };
            let lower: Vec<f64> = err.lower.iter().map(|&e| fix(e)).collect();
            let upper: Vec<f64> = err.upper.iter().map(|&e| fix(e)).collect();
            if clipped > 0 {
                warn!(clipped, cap, "error bars clipped to the plot range");
            }
            ErrorBounds { lower, upper }
        });

        let star_counts: Vec<usize> = if sigmas != 0.0 {
            p_values
                .iter()
                .map(|&p| star_count(p, &opts.star_cutoffs))
                .collect()
        } else {
            vec![0; n]
        };

        let mut order_breaks = Vec::new();
        let mut previous = 1;
        for (i, label) in labels.iter().enumerate() {
            if label.len() != previous {
                order_breaks.push(i);
                previous = label.len();
            }
        }

        let mut sites: Vec<usize> = labels.iter().flatten().copied().collect();
        sites.sort_unstable();
        sites.dedup();
        let mut grid = CellGrid::new(sites.len(), n, [0.0, n as f64, 0.0, sites.len() as f64]);
        for (col, label) in labels.iter().enumerate() {
            for site in label {
                if let Ok(row) = sites.binary_search(site) {
                    grid.set(row, col, Some(colors[col]));
                }
            }
        }

        debug!(
            terms = n,
            highest_order,
            significant = color_index.iter().filter(|c| c.is_some()).count(),
            %significance,
            "interaction layout"
        );

        Ok(Self {
            labels,
            significance,
            sigmas,
            p_values,
            cutoff,
            color_index,
            palette,
            colors,
            star_counts,
            heights,
            yerr,
            y_range,
            order_breaks,
            sites,
            grid,
        })
    }

    pub fn num_terms(&self) -> usize {
        self.labels.len()
    }

    /// Center of bar `i` on the x axis.
    pub fn bar_x(i: usize) -> f64 {
        i as f64 + 0.5
    }

    /// Data-space positions of the stars under bar `i`.
    pub fn star_positions(&self, i: usize, star_spacer: f64) -> Vec<(f64, f64)> {
        let (ymin, ymax) = self.y_range;
        let offset = star_spacer * (ymax - ymin);
        let count = self.star_counts.get(i).copied().unwrap_or(0);
        (0..count)
            .map(|j| (Self::bar_x(i), ymin + j as f64 * offset))
            .collect()
    }

    /// Build the bar panel, and the grid panel below it when `xgrid` is set.
    pub fn figure(&self, opts: &InteractionOptions) -> Figure {
        let n = self.num_terms();
        let (ymin, ymax) = self.y_range;
        let mut fig = if opts.xgrid {
            Figure::stacked(opts.figsize, vec![opts.height_ratio, 1.0])
        } else {
            Figure::new(opts.figsize)
        };

        let bars = fig.axes_mut();
        bars.bar(BarSeries {
            x: (0..n).map(Self::bar_x).collect(),
            heights: self.heights.clone(),
            width: BAR_WIDTH,
            colors: self.colors.clone(),
            yerr: self.yerr.clone(),
            ecolor: Color::BLACK,
            capsize: opts.capsize,
            edge: opts.bar_borders.then_some(Color::BLACK),
        });
        bars.hlines(0.0, 0.0, n as f64, dashed(1.0));
        bars.set_ylabel(&opts.y_axis_name);
        bars.ylabel_size = 14.0;
        bars.axis([-1.0, n as f64 + 1.0, ymin, ymax]);
        bars.set_frame_on(false);
        bars.x_axis_visible = false;

        let ticks = bars.yticks();
        if ticks.len() >= 3 {
            bars.add_segment(
                (-1.0, -1.0),
                (ticks[1], ticks[ticks.len() - 2]),
                Style::line(Color::BLACK).with_width(1.0),
            );
        }
        for &i in &self.order_breaks {
            bars.add_segment((i as f64, i as f64), (ymin, ymax), dashed(1.0));
        }
        if self.sigmas != 0.0 {
            for i in 0..n {
                for (x, y) in self.star_positions(i, opts.star_spacer) {
                    bars.text(x, y, "*", STAR_SIZE);
                }
            }
        }

        if let Some(grid_axes) = fig.panel_mut(1) {
            let rows = self.sites.len() as f64;
            grid_axes.cells(self.grid.clone());
            let edge = Style::line(Color::BLACK).with_width(1.0);
            for i in 0..=n {
                grid_axes.add_segment((i as f64, i as f64), (0.0, rows), edge);
            }
            for r in 0..=self.sites.len() {
                grid_axes.add_segment((0.0, n as f64), (r as f64, r as f64), edge);
            }
            grid_axes.axis([-1.0, n as f64 + 1.0, 0.0, rows.max(1.0)]);
            grid_axes.axis_off();
        }
        fig
    }
}

// ─── Entry points ────────────────────────────────────────────────────

/// Interaction bar chart of a model's coefficients.
pub fn bar_with_xbox<M: EpistasisModel + ?Sized>(
    model: &M,
    opts: &InteractionOptions,
) -> Result<Figure, PlotError> {
    let layout = InteractionLayout::from_model(model, opts)?;
    Ok(layout.figure(opts))
}

/// Interaction bar chart from raw arrays. Pass symmetric errors as
/// [`ErrorBounds::symmetric`].
pub fn interactions(
    beta: &[f64],
    labels: &[Label],
    err: &ErrorBounds,
    opts: &InteractionOptions,
) -> Result<Figure, PlotError> {
    let layout = InteractionLayout::from_arrays(beta, labels, err, opts)?;
    Ok(layout.figure(opts))
}

/// Plots available for any epistasis model.
pub struct EpistasisPlotting<'a, M: EpistasisModel + ?Sized> {
    model: &'a M,
}

impl<'a, M: EpistasisModel + ?Sized> EpistasisPlotting<'a, M> {
    pub fn new(model: &'a M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &'a M {
        self.model
    }

    pub fn interactions(&self, opts: &InteractionOptions) -> Result<Figure, PlotError> {
        bar_with_xbox(self.model, opts)
    }
}
