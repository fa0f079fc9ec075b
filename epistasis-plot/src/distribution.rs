//! Density and cumulative plots of a test-statistic distribution.

use serde::{Deserialize, Serialize};

use epistasis_core::figure::{Figure, Style};
use epistasis_core::stats::{linspace, Distribution};

use crate::error::PlotError;
use crate::regression::DEFAULT_FIGSIZE;

const SAMPLES: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributionOptions {
    /// Lower quantile of the plotted range.
    pub percent_start: f64,
    /// Upper quantile of the plotted range.
    pub percent_end: f64,
    pub figsize: (f64, f64),
    pub style: Style,
}

impl Default for DistributionOptions {
    fn default() -> Self {
        Self {
            percent_start: 0.0001,
            percent_end: 0.9999,
            figsize: DEFAULT_FIGSIZE,
            style: Style::default(),
        }
    }
}

impl DistributionOptions {
    fn validate(&self) -> Result<(), PlotError> {
        let in_unit = |q: f64| q > 0.0 && q < 1.0;
        if in_unit(self.percent_start) && in_unit(self.percent_end) && self.percent_start < self.percent_end {
            Ok(())
        } else {
            Err(PlotError::Config(format!(
                "quantile range ({}, {}) must satisfy 0 < start < end < 1",
                self.percent_start, self.percent_end
            )))
        }
    }
}

/// Plots of an F distribution, or of anything else with quantiles.
pub struct FDistributionPlotting<D: Distribution> {
    dist: D,
}

impl<D: Distribution> FDistributionPlotting<D> {
    pub fn new(dist: D) -> Self {
        Self { dist }
    }

    pub fn distribution(&self) -> &D {
        &self.dist
    }

    /// Probability density between the two quantiles.
    pub fn pdf(&self, opts: &DistributionOptions) -> Result<Figure, PlotError> {
        let mut fig = self.curve(opts, |x| self.dist.pdf(x))?;
        let ax = fig.axes_mut();
        ax.set_title("Probability density function");
        ax.set_xlabel("F-statistic");
        ax.set_ylabel("Probability density");
        Ok(fig)
    }

    /// Cumulative probability between the two quantiles.
    pub fn cdf(&self, opts: &DistributionOptions) -> Result<Figure, PlotError> {
        let mut fig = self.curve(opts, |x| self.dist.cdf(x))?;
        let ax = fig.axes_mut();
        ax.set_title("Cumulative distribution function");
        ax.set_xlabel("F-statistic");
        ax.set_ylabel("Cumulative probability");
        Ok(fig)
    }

    fn curve(&self, opts: &DistributionOptions, f: impl Fn(f64) -> f64) -> Result<Figure, PlotError> {
        opts.validate()?;
        let xs = linspace(self.dist.ppf(opts.percent_start), self.dist.ppf(opts.percent_end), SAMPLES);
        let ys: Vec<f64> = xs.iter().map(|&x| f(x)).collect();
        let mut fig = Figure::new(opts.figsize);
        fig.axes_mut().plot(&xs, &ys, opts.style);
        Ok(fig)
    }
}
