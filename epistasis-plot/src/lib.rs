//! Epistasis Plot: figure builders for fitted epistasis models.
//!
//! This crate builds on `epistasis-core` to provide:
//! - Interaction bar charts with significance stars and a site grid
//! - Regression and nonlinear diagnostics (correlation, residuals, best fit)
//! - F-distribution density/cumulative curves
//! - Magnitude-vs-order summaries and 3D principal-component views
//! - Known-vs-learned plots for bare arrays
//! - TOML plot configuration and SVG rendering through plotters

pub mod config;
pub mod diagnostics;
pub mod distribution;
pub mod error;
pub mod interactions;
pub mod magnitude;
pub mod nonlinear;
pub mod pca;
pub mod regression;
pub mod render;

pub use config::PlotConfig;
pub use diagnostics::{correlation, residuals, CorrelationOptions, ResidualPlotOptions};
pub use distribution::{DistributionOptions, FDistributionPlotting};
pub use error::PlotError;
pub use interactions::{
    bar_with_xbox, interactions, EpistasisPlotting, InteractionLayout, InteractionOptions, Significance,
};
pub use magnitude::{magnitude_vs_order, order_magnitudes, MagnitudeOptions, OrderMagnitude};
pub use nonlinear::{NonlinearFunctionOptions, NonlinearPlotting};
pub use pca::{principal_components, PcaOptions};
pub use regression::{BestFitOptions, RegressionPlotting, ResidualOptions};
pub use render::{render_to_file, render_to_string};
