//! 3D view of a PCA-reduced genotype-phenotype map.

use serde::{Deserialize, Serialize};
use tracing::warn;

use epistasis_core::color::{cycle_color, Color};
use epistasis_core::figure::{Axes, Figure, Style, ViewAngle};
use epistasis_core::pca::PcaModel;

use crate::error::PlotError;

/// Length of a component arrow relative to its loadings.
pub const ARROW_SCALE: f64 = 0.03;
/// Marker area of projected genotypes, in points².
pub const POINT_SIZE: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PcaOptions {
    /// Draw the first three principal axes as arrows through the origin.
    pub with_components: bool,
    /// Number of projected coordinates used; the rest are drawn at zero.
    pub dimensions: usize,
    pub figsize: (f64, f64),
    pub arrow_color: Color,
    pub view: ViewAngle,
}

impl Default for PcaOptions {
    fn default() -> Self {
        Self {
            with_components: true,
            dimensions: 3,
            figsize: (6.0, 6.0),
            arrow_color: Color::RED,
            view: ViewAngle::default(),
        }
    }
}

fn point3(coords: &[f64], dimensions: usize) -> Result<[f64; 3], PlotError> {
    if coords.len() < dimensions {
        return Err(PlotError::LengthMismatch {
            what: "projected coordinates",
            expected: dimensions,
            got: coords.len(),
        });
    }
    let mut p = [0.0; 3];
    for (k, slot) in p.iter_mut().enumerate().take(dimensions) {
        *slot = coords[k];
    }
    Ok(p)
}

pub fn principal_components<M: PcaModel + ?Sized>(model: &M, opts: &PcaOptions) -> Result<Figure, PlotError> {
    if opts.dimensions > 3 {
        return Err(PlotError::TooManyDimensions(opts.dimensions));
    }
    let projected = model.projected();
    if projected.is_empty() {
        return Err(PlotError::EmptyData("projected genotypes"));
    }

    let mut ax = Axes::new_3d();
    ax.view = opts.view;

    if opts.with_components {
        let components = model.components();
        if components.len() < 3 {
            return Err(PlotError::LengthMismatch {
                what: "principal components",
                expected: 3,
                got: components.len(),
            });
        }
        for component in &components[..3] {
            let tip = point3(component, 3)?.map(|v| v * ARROW_SCALE);
            ax.arrow3d(tip.map(|v| -v), tip, opts.arrow_color, 2.0);
        }
    }

    let points = projected
        .iter()
        .map(|p| point3(p, opts.dimensions))
        .collect::<Result<Vec<_>, _>>()?;
    let colors = (0..points.len()).map(cycle_color).collect();
    ax.scatter3d(points.clone(), colors, POINT_SIZE);

    let edge_style = Style::line(Color::GRAY).with_width(2.0);
    for (a, b) in model.edges() {
        match (points.get(a), points.get(b)) {
            (Some(&pa), Some(&pb)) => {
                ax.plot3d(vec![pa, pb], edge_style);
            }
            _ => warn!(a, b, points = points.len(), "skipping edge to unknown genotype"),
        }
    }

    Ok(Figure::with_axes(opts.figsize, ax))
}
