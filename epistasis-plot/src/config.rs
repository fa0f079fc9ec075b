//! Plot configuration loaded from TOML.
//!
//! Every table is optional; missing keys keep their defaults:
//!
//! ```toml
//! dpi = 150
//! font_family = "serif"
//!
//! [interactions]
//! significance = "p"
//! order_colors = ["red", "orange", "#2ca02c"]
//!
//! [pca]
//! arrow_color = "black"
//! view = { azimuth = 30.0, elevation = 20.0 }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use epistasis_core::color::Color;
use epistasis_core::figure::Figure;

use crate::diagnostics::{CorrelationOptions, ResidualPlotOptions};
use crate::distribution::DistributionOptions;
use crate::error::PlotError;
use crate::interactions::InteractionOptions;
use crate::magnitude::MagnitudeOptions;
use crate::nonlinear::NonlinearFunctionOptions;
use crate::pca::PcaOptions;
use crate::regression::{BestFitOptions, ResidualOptions};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Overrides every figure's own resolution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dpi: Option<u32>,
    pub font_family: String,
    pub background: Color,

    pub interactions: InteractionOptions,
    pub residuals: ResidualOptions,
    pub best_fit: BestFitOptions,
    pub nonlinear_function: NonlinearFunctionOptions,
    pub magnitude: MagnitudeOptions,
    pub distribution: DistributionOptions,
    pub pca: PcaOptions,
    pub correlation: CorrelationOptions,
    pub residual_plot: ResidualPlotOptions,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            dpi: None,
            font_family: "sans-serif".to_string(),
            background: Color::WHITE,
            interactions: InteractionOptions::default(),
            residuals: ResidualOptions::default(),
            best_fit: BestFitOptions::default(),
            nonlinear_function: NonlinearFunctionOptions::default(),
            magnitude: MagnitudeOptions::default(),
            distribution: DistributionOptions::default(),
            pca: PcaOptions::default(),
            correlation: CorrelationOptions::default(),
            residual_plot: ResidualPlotOptions::default(),
        }
    }
}

impl PlotConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, PlotError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, PlotError> {
        toml::from_str(content).map_err(|e| PlotError::Config(format!("parse plot config: {e}")))
    }

    pub fn to_toml(&self) -> Result<String, PlotError> {
        toml::to_string_pretty(self).map_err(|e| PlotError::Config(format!("serialize plot config: {e}")))
    }

    /// Resolution a figure is rendered at.
    pub fn dpi_for(&self, figure: &Figure) -> u32 {
        self.dpi.unwrap_or(figure.dpi).max(1)
    }
}
