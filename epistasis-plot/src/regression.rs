//! Diagnostic plots for models that predict phenotypes.
//!
//! Every plot comes in two flavours: `draw_*` draws onto a caller's
//! [`Axes`], the plain method builds a new [`Figure`] around it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use epistasis_core::color::{Color, CYCLE};
use epistasis_core::figure::{Axes, Figure, LineStyle, Style};
use epistasis_core::model::{EpistasisModel, ErrorBounds, RegressionModel};
use epistasis_core::stats::{argsort, finite_range, linspace, max_abs};

use crate::error::{check_len, non_empty, PlotError};
use crate::interactions::{bar_with_xbox, InteractionOptions};

/// Figure size used by the per-model plots, in inches.
pub const DEFAULT_FIGSIZE: (f64, f64) = (6.0, 4.0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResidualOptions {
    pub figsize: (f64, f64),
    /// Stem plot instead of a line.
    pub stem: bool,
    /// `[x_min, x_max, y_min, y_max]` applied last.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis: Option<[f64; 4]>,
    pub style: Style,
}

impl Default for ResidualOptions {
    fn default() -> Self {
        Self {
            figsize: DEFAULT_FIGSIZE,
            stem: false,
            axis: None,
            style: Style::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BestFitOptions {
    pub figsize: (f64, f64),
    /// Draw measurement errors around the observations.
    pub errorbars: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis: Option<[f64; 4]>,
    /// Style of the observations.
    pub style: Style,
}

impl Default for BestFitOptions {
    fn default() -> Self {
        Self {
            figsize: DEFAULT_FIGSIZE,
            errorbars: false,
            axis: None,
            style: Style::points(CYCLE[0]),
        }
    }
}

// ─── Shared helpers ──────────────────────────────────────────────────

/// Observed phenotypes and predictions, checked to line up.
fn observed_and_predicted<M: RegressionModel + ?Sized>(model: &M) -> Result<(Vec<f64>, Vec<f64>), PlotError> {
    let observed = model.phenotypes().to_vec();
    let predicted = model.predict();
    non_empty("phenotypes", &observed)?;
    check_len("predictions", observed.len(), predicted.len())?;
    Ok((observed, predicted))
}

/// Error bounds of `sd` mapped into log10 space around `reference`.
pub(crate) fn log_error_bounds(sd: &[f64], reference: &[f64]) -> ErrorBounds {
    let upper = sd
        .iter()
        .zip(reference)
        .map(|(s, r)| (1.0 + s / r).log10())
        .collect();
    let lower = sd
        .iter()
        .zip(reference)
        .map(|(s, r)| (1.0 - s / r).log10().abs())
        .collect();
    ErrorBounds { lower, upper }
}

/// Residuals against `xs`, sorted by `xs`, with symmetric y limits.
///
/// `marker_series` draws the non-stem series as an error-bar series
/// without bars.
pub(crate) fn draw_residual_series(
    ax: &mut Axes,
    xs: &[f64],
    residuals: &[f64],
    opts: &ResidualOptions,
    marker_series: bool,
) {
    let order = argsort(xs);
    let sorted_x: Vec<f64> = order.iter().map(|&i| xs[i]).collect();
    let sorted_r: Vec<f64> = order.iter().map(|&i| residuals[i]).collect();
    let ylim = max_abs(residuals);

    if opts.stem {
        ax.stem(
            &sorted_x,
            &sorted_r,
            Style::line(Color::BLUE).with_width(1.5),
            Some(Style::line(Color::RED).with_width(1.0)),
        );
    } else {
        if marker_series {
            ax.errorbar(&sorted_x, &sorted_r, ErrorBounds::default(), opts.style, 0.0);
        } else {
            ax.plot(&sorted_x, &sorted_r, opts.style);
        }
        if let Some((lo, hi)) = finite_range(&sorted_x) {
            ax.hlines(
                0.0,
                lo,
                hi,
                Style::line(Color::BLACK).with_line(LineStyle::Dotted),
            );
        }
    }
    if ylim > 0.0 {
        ax.set_ylim(-ylim, ylim);
    }
    if let Some(limits) = opts.axis {
        ax.axis(limits);
    }
}

fn in_new_figure(
    figsize: (f64, f64),
    draw: impl FnOnce(&mut Axes) -> Result<(), PlotError>,
) -> Result<Figure, PlotError> {
    let mut fig = Figure::new(figsize);
    draw(fig.axes_mut())?;
    Ok(fig)
}

// ─── RegressionPlotting ──────────────────────────────────────────────

pub struct RegressionPlotting<'a, M: RegressionModel + ?Sized> {
    model: &'a M,
}

impl<'a, M: RegressionModel + ?Sized> RegressionPlotting<'a, M> {
    pub fn new(model: &'a M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &'a M {
        self.model
    }

    pub fn interactions(&self, opts: &InteractionOptions) -> Result<Figure, PlotError> {
        bar_with_xbox(self.model, opts)
    }

    /// Known phenotypes against predictions with a 1:1 reference line.
    pub fn correlation(&self, figsize: (f64, f64)) -> Result<Figure, PlotError> {
        in_new_figure(figsize, |ax| self.draw_correlation(ax))
    }

    pub fn draw_correlation(&self, ax: &mut Axes) -> Result<(), PlotError> {
        let (known, predicted) = observed_and_predicted(self.model)?;
        ax.plot(&known, &predicted, Style::points(Color::BLUE));
        if let Some((lo, hi)) = finite_range(&known) {
            let line = linspace(lo, hi, 10);
            ax.plot(&line, &line, Style::line(Color::RED));
        }
        ax.set_xlabel("known");
        ax.set_ylabel("learned");
        Ok(())
    }

    /// Known and predicted phenotypes as lines over the genotype index.
    pub fn predicted_phenotypes(&self, figsize: (f64, f64)) -> Result<Figure, PlotError> {
        in_new_figure(figsize, |ax| self.draw_predicted_phenotypes(ax))
    }

    pub fn draw_predicted_phenotypes(&self, ax: &mut Axes) -> Result<(), PlotError> {
        let (known, predicted) = observed_and_predicted(self.model)?;
        ax.plot_series(&known, Style::line(Color::BLUE));
        ax.plot_series(&predicted, Style::line(Color::RED));
        ax.set_ylabel("phenotypes");
        ax.set_xlabel("genotypes");
        Ok(())
    }

    /// Prediction minus observation, ordered by prediction.
    pub fn residuals(&self, opts: &ResidualOptions) -> Result<Figure, PlotError> {
        in_new_figure(opts.figsize, |ax| self.draw_residuals(ax, opts))
    }

    pub fn draw_residuals(&self, ax: &mut Axes, opts: &ResidualOptions) -> Result<(), PlotError> {
        let (observed, theory) = observed_and_predicted(self.model)?;
        let residuals: Vec<f64> = theory.iter().zip(&observed).map(|(t, o)| t - o).collect();
        debug!(points = residuals.len(), stem = opts.stem, "residual plot");
        draw_residual_series(ax, &theory, &residuals, opts, false);
        Ok(())
    }

    /// Observations against predictions with the fitted line through them.
    pub fn best_fit(&self, opts: &BestFitOptions) -> Result<Figure, PlotError> {
        in_new_figure(opts.figsize, |ax| self.draw_best_fit(ax, opts))
    }

    pub fn draw_best_fit(&self, ax: &mut Axes, opts: &BestFitOptions) -> Result<(), PlotError> {
        let (observed, theory) = observed_and_predicted(self.model)?;
        if opts.errorbars {
            let sd = self.model.stdeviations().ok_or(PlotError::Missing("stdeviations"))?;
            check_len("stdeviations", observed.len(), sd.len())?;
            let bounds = if self.model.log_transform() {
                log_error_bounds(sd, self.model.raw_phenotypes())
            } else {
                ErrorBounds::symmetric(sd.to_vec())
            };
            ax.errorbar(&theory, &observed, bounds, opts.style, 0.0);
        } else {
            ax.plot(&theory, &observed, opts.style);
        }
        let mut sorted = theory;
        sorted.sort_by(f64::total_cmp);
        ax.plot(&sorted, &sorted, Style::line(Color::RED).with_width(2.0));
        if let Some(limits) = opts.axis {
            ax.axis(limits);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epistasis_core::model::{FittedModel, Interactions};
    use epistasis_core::Artist;

    fn model() -> FittedModel {
        FittedModel {
            genotypes: vec!["00".into(), "01".into(), "10".into(), "11".into()],
            phenotypes: vec![0.1, 0.6, 0.4, 1.3],
            raw_phenotypes: None,
            predictions: vec![0.2, 0.5, 0.45, 1.2],
            stdeviations: Some(vec![0.05; 4]),
            interactions: Interactions::new(
                vec![vec![0], vec![1], vec![2], vec![1, 2]],
                vec![0.2, 0.25, 0.3, 0.45],
                ErrorBounds::symmetric(vec![0.05; 4]),
            ),
            log_transform: false,
            log_base: 10.0,
            length: None,
            nonlinear: None,
        }
    }

    #[test]
    fn correlation_plots_known_against_predicted() {
        let m = model();
        let fig = RegressionPlotting::new(&m).correlation(DEFAULT_FIGSIZE).unwrap();
        let lines = fig.axes().lines();
        assert_eq!(lines[0].0, m.phenotypes.as_slice());
        assert_eq!(lines[0].1, m.predictions.as_slice());
        assert_eq!(lines[1].0.len(), 10);
        assert_eq!(lines[1].0[0], 0.1);
        assert_eq!(lines[1].0[9], 1.3);
        assert_eq!(fig.axes().xlabel.as_deref(), Some("known"));
    }

    #[test]
    fn predicted_phenotypes_uses_genotype_index() {
        let m = model();
        let fig = RegressionPlotting::new(&m).predicted_phenotypes(DEFAULT_FIGSIZE).unwrap();
        let lines = fig.axes().lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].0, &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(lines[1].2.color, Color::RED);
    }

    #[test]
    fn residuals_are_sorted_and_symmetric() {
        let m = model();
        let fig = RegressionPlotting::new(&m).residuals(&ResidualOptions::default()).unwrap();
        let ax = fig.axes();
        let (xs, ys, _) = ax.lines()[0];
        assert_eq!(xs, &[0.2, 0.45, 0.5, 1.2]);
        let expected = [0.1, 0.05, -0.1, -0.1];
        for (y, e) in ys.iter().zip(expected) {
            assert!((y - e).abs() < 1e-12);
        }
        let (lo, hi) = ax.ylim.unwrap();
        assert!((lo + 0.1).abs() < 1e-12 && (hi - 0.1).abs() < 1e-12);
        assert!(ax.artists().iter().any(|a| matches!(a, Artist::HLine { .. })));
    }

    #[test]
    fn stem_residuals_and_axis_override() {
        let m = model();
        let opts = ResidualOptions {
            stem: true,
            axis: Some([0.0, 2.0, -1.0, 1.0]),
            ..Default::default()
        };
        let fig = RegressionPlotting::new(&m).residuals(&opts).unwrap();
        let ax = fig.axes();
        assert!(matches!(ax.artists()[0], Artist::Stem { .. }));
        assert_eq!(ax.ylim, Some((-1.0, 1.0)));
    }

    #[test]
    fn best_fit_with_errorbars() {
        let m = model();
        let opts = BestFitOptions {
            errorbars: true,
            ..Default::default()
        };
        let fig = RegressionPlotting::new(&m).best_fit(&opts).unwrap();
        let ax = fig.axes();
        assert!(matches!(ax.artists()[0], Artist::ErrorBars { ref yerr, .. } if yerr.upper == vec![0.05; 4]));
        let (xs, ys, style) = ax.lines()[0];
        assert_eq!(xs, ys);
        assert_eq!(xs, &[0.2, 0.45, 0.5, 1.2]);
        assert_eq!(style.line_width, 2.0);
    }

    #[test]
    fn best_fit_errorbars_need_stdeviations() {
        let mut m = model();
        m.stdeviations = None;
        let opts = BestFitOptions {
            errorbars: true,
            ..Default::default()
        };
        assert!(matches!(
            RegressionPlotting::new(&m).best_fit(&opts),
            Err(PlotError::Missing("stdeviations"))
        ));
    }

    #[test]
    fn log_error_bounds_are_asymmetric() {
        let b = log_error_bounds(&[0.5], &[1.0]);
        assert!((b.upper[0] - 1.5f64.log10()).abs() < 1e-12);
        assert!((b.lower[0] - 0.5f64.log10().abs()).abs() < 1e-12);
    }

    #[test]
    fn mismatched_predictions_are_rejected() {
        let mut m = model();
        m.predictions.pop();
        assert!(matches!(
            RegressionPlotting::new(&m).correlation(DEFAULT_FIGSIZE),
            Err(PlotError::LengthMismatch { what: "predictions", .. })
        ));
    }
}
