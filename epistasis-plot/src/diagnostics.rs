//! Known-vs-learned plots for any pair of arrays, independent of a model.

use serde::{Deserialize, Serialize};

use epistasis_core::color::Color;
use epistasis_core::figure::{Figure, Marker, Style};
use epistasis_core::stats::{finite_range, linspace};

use crate::error::{check_len, non_empty, PlotError};

/// Resolution of the known-vs-learned plots.
pub const DIAGNOSTIC_DPI: u32 = 300;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationOptions {
    pub title: String,
    pub figsize: (f64, f64),
}

impl Default for CorrelationOptions {
    fn default() -> Self {
        Self {
            title: "Known vs. Learned".to_string(),
            figsize: (6.0, 6.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResidualPlotOptions {
    pub title: String,
    pub figsize: (f64, f64),
}

impl Default for ResidualPlotOptions {
    fn default() -> Self {
        Self {
            title: "Residual Plot".to_string(),
            figsize: (6.0, 4.0),
        }
    }
}

fn check_pair(learned: &[f64], known: &[f64]) -> Result<(), PlotError> {
    non_empty("known", known)?;
    check_len("learned", known.len(), learned.len())
}

/// Learned values against known values with a 1:1 line.
pub fn correlation(learned: &[f64], known: &[f64], opts: &CorrelationOptions) -> Result<Figure, PlotError> {
    check_pair(learned, known)?;
    let mut fig = Figure::new(opts.figsize).with_dpi(DIAGNOSTIC_DPI);
    let ax = fig.axes_mut();
    ax.plot(known, learned, Style::points(Color::BLUE));
    if let Some((lo, hi)) = finite_range(known) {
        let x = linspace(lo, hi, 1000);
        ax.plot(&x, &x, Style::line(Color::RED).with_width(1.0));
    }
    ax.set_xlabel("Known").set_ylabel("Learned").set_label_size(14.0);
    ax.set_title(&opts.title);
    ax.title_size = 14.0;
    ax.despine();
    Ok(fig)
}

/// Stem plot of `learned - known` at each known value.
pub fn residuals(learned: &[f64], known: &[f64], opts: &ResidualPlotOptions) -> Result<Figure, PlotError> {
    check_pair(learned, known)?;
    let diff: Vec<f64> = learned.iter().zip(known).map(|(l, k)| l - k).collect();
    let mut fig = Figure::new(opts.figsize).with_dpi(DIAGNOSTIC_DPI);
    let ax = fig.axes_mut();
    ax.stem(
        known,
        &diff,
        Style::line(Color::BLUE).with_marker(Marker::Point),
        Some(Style::line(Color::RED)),
    );
    ax.set_title(&opts.title);
    ax.title_size = 20.0;
    ax.set_xlabel("True").set_ylabel("Residuals");
    Ok(fig)
}
