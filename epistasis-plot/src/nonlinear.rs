//! Plots for models with a nonlinear scale on top of the linear epistatic
//! stage.

use serde::{Deserialize, Serialize};
use tracing::debug;

use epistasis_core::color::Color;
use epistasis_core::figure::{Axes, Figure, Style};
use epistasis_core::model::{ErrorBounds, NonlinearModel};
use epistasis_core::stats::{finite_range, linspace};

use crate::error::{check_len, non_empty, PlotError};
use crate::interactions::{bar_with_xbox, InteractionOptions};
use crate::regression::{
    draw_residual_series, log_error_bounds, BestFitOptions, RegressionPlotting, ResidualOptions,
    DEFAULT_FIGSIZE,
};

/// Samples drawn along the nonlinear function.
pub const FUNCTION_SAMPLES: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NonlinearFunctionOptions {
    /// `(min, max)` of the sampled x range; defaults to the range of X·β.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xbounds: Option<(f64, f64)>,
    pub style: Style,
    pub figsize: (f64, f64),
}

impl Default for NonlinearFunctionOptions {
    fn default() -> Self {
        Self {
            xbounds: None,
            style: Style::default(),
            figsize: DEFAULT_FIGSIZE,
        }
    }
}

pub struct NonlinearPlotting<'a, M: NonlinearModel + ?Sized> {
    model: &'a M,
}

impl<'a, M: NonlinearModel + ?Sized> NonlinearPlotting<'a, M> {
    pub fn new(model: &'a M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &'a M {
        self.model
    }

    /// Regression plots (correlation, predicted phenotypes, ...) of the
    /// same model.
    pub fn as_regression(&self) -> RegressionPlotting<'a, M> {
        RegressionPlotting::new(self.model)
    }

    pub fn interactions(&self, opts: &InteractionOptions) -> Result<Figure, PlotError> {
        bar_with_xbox(self.model, opts)
    }

    /// Observed phenotypes against the linear stage X·β.
    pub fn linear_phenotypes(&self) -> Result<Figure, PlotError> {
        let known = self.model.phenotypes();
        let linear = self.model.linear_phenotypes();
        non_empty("phenotypes", known)?;
        check_len("linear phenotypes", known.len(), linear.len())?;

        let mut fig = Figure::new((6.4, 4.8));
        let ax = fig.axes_mut();
        ax.plot(&linear, known, Style::points(Color::BLUE));
        ax.set_xlabel("linear phenotypes");
        ax.set_ylabel("nonlinear phenotypes");
        Ok(fig)
    }

    /// The fitted nonlinear function sampled over `xbounds` or over the
    /// range of X·β.
    pub fn nonlinear_function(&self, opts: &NonlinearFunctionOptions) -> Result<Figure, PlotError> {
        let mut fig = Figure::new(opts.figsize);
        self.draw_nonlinear_function(fig.axes_mut(), opts)?;
        Ok(fig)
    }

    pub fn draw_nonlinear_function(
        &self,
        ax: &mut Axes,
        opts: &NonlinearFunctionOptions,
    ) -> Result<(), PlotError> {
        let (lo, hi) = match opts.xbounds {
            Some(bounds) => bounds,
            None => {
                let mut linear = self.model.linear_phenotypes();
                if self.model.linear_log_transform() {
                    for x in &mut linear {
                        *x = 10f64.powf(*x);
                    }
                }
                finite_range(&linear).ok_or(PlotError::EmptyData("linear phenotypes"))?
            }
        };
        let params = self.model.parameters();
        let xs = linspace(lo, hi, FUNCTION_SAMPLES);
        let ys: Vec<f64> = xs.iter().map(|&x| self.model.evaluate(x, params)).collect();
        debug!(lo, hi, params = params.len(), "nonlinear function");
        ax.plot(&xs, &ys, opts.style);
        Ok(())
    }

    /// Observations against the linear predictor with the nonlinear
    /// function drawn through them.
    pub fn best_fit(&self, opts: &BestFitOptions) -> Result<Figure, PlotError> {
        let mut fig = Figure::new(opts.figsize);
        self.draw_best_fit(fig.axes_mut(), opts)?;
        Ok(fig)
    }

    pub fn draw_best_fit(&self, ax: &mut Axes, opts: &BestFitOptions) -> Result<(), PlotError> {
        let observed = self.model.phenotypes();
        let linear = self.model.linear();
        non_empty("phenotypes", observed)?;
        check_len("linear predictions", observed.len(), linear.len())?;

        if opts.errorbars {
            let sd = self.model.stdeviations().ok_or(PlotError::Missing("stdeviations"))?;
            check_len("stdeviations", observed.len(), sd.len())?;
            let bounds = if self.model.linear_log_transform() {
                log_error_bounds(sd, observed)
            } else {
                ErrorBounds::symmetric(sd.to_vec())
            };
            ax.errorbar(&linear, observed, bounds, opts.style, 0.0);
        } else {
            ax.plot(&linear, observed, opts.style);
        }

        let curve = NonlinearFunctionOptions {
            style: Style::line(Color::RED).with_width(2.0),
            ..Default::default()
        };
        self.draw_nonlinear_function(ax, &curve)?;

        if let Some(limits) = opts.axis {
            ax.axis(limits);
        }
        Ok(())
    }

    /// Prediction minus observation, ordered by the linear predictor.
    pub fn residuals(&self, opts: &ResidualOptions) -> Result<Figure, PlotError> {
        let mut fig = Figure::new(opts.figsize);
        self.draw_residuals(fig.axes_mut(), opts)?;
        Ok(fig)
    }

    pub fn draw_residuals(&self, ax: &mut Axes, opts: &ResidualOptions) -> Result<(), PlotError> {
        let observed = self.model.phenotypes();
        let theory = self.model.predict();
        let linear = self.model.linear();
        non_empty("phenotypes", observed)?;
        check_len("predictions", observed.len(), theory.len())?;
        check_len("linear predictions", observed.len(), linear.len())?;

        let residuals: Vec<f64> = theory.iter().zip(observed).map(|(t, o)| t - o).collect();
        draw_residual_series(ax, &linear, &residuals, opts, true);
        Ok(())
    }
}
