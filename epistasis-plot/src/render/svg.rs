//! SVG output. Uses plotters' SVG backend so no system fonts are needed.

use plotters::prelude::*;
use std::path::Path;
use tracing::info;

use epistasis_core::figure::Figure;

use super::{draw_figure, render_err};
use crate::config::PlotConfig;
use crate::error::PlotError;

/// Pixel size of `figure` at the configured dpi.
pub fn pixel_size(figure: &Figure, config: &PlotConfig) -> (u32, u32) {
    let dpi = config.dpi_for(figure);
    let px = |inches: f64| (inches * dpi as f64).round().max(1.0) as u32;
    (px(figure.size.0), px(figure.size.1))
}

/// Renders `figure` to an SVG document.
pub fn render_to_string(figure: &Figure, config: &PlotConfig) -> Result<String, PlotError> {
    let size = pixel_size(figure, config);
    let mut out = String::new();
    {
        let root = SVGBackend::with_string(&mut out, size).into_drawing_area();
        draw_figure(&root, figure, config, config.dpi_for(figure))?;
        root.present().map_err(render_err)?;
    }
    Ok(out)
}

/// Renders `figure` to an SVG file at `path`.
pub fn render_to_file(figure: &Figure, path: &Path, config: &PlotConfig) -> Result<(), PlotError> {
    let svg = render_to_string(figure, config)?;
    std::fs::write(path, svg)?;
    info!(path = %path.display(), panels = figure.panels.len(), "wrote figure");
    Ok(())
}
