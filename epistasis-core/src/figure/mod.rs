//! Backend-independent figure description.
//!
//! Plot builders fill a [`Figure`] with [`Axes`] panels and [`Artist`]s; a
//! renderer turns it into pixels. Keeping the scene graph as plain data lets
//! tests inspect exactly what a plot would draw.

pub mod artist;
pub mod axes;
pub mod style;
pub mod ticks;

pub use artist::{Artist, BarSeries, Bounds, CellGrid};
pub use axes::{dashed, Axes, Projection, Spines, ViewAngle, MAX_TICKS};
pub use style::{LineStyle, Marker, Style};
pub use ticks::{autoscale, format_tick, nice_step, nice_ticks};

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Dots per inch used when a plot does not choose its own.
pub const DEFAULT_DPI: u32 = 100;

/// How panels share the figure area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Layout {
    /// One panel filling the figure.
    Single,
    /// Panels stacked top to bottom with relative heights, sharing x.
    Stacked { height_ratios: Vec<f64> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    /// Width and height in inches.
    pub size: (f64, f64),
    pub dpi: u32,
    pub layout: Layout,
    pub panels: Vec<Axes>,
}

impl Figure {
    /// Single 2D panel.
    pub fn new(size: (f64, f64)) -> Self {
        Self::with_axes(size, Axes::new())
    }

    pub fn with_axes(size: (f64, f64), axes: Axes) -> Self {
        Self {
            size,
            dpi: DEFAULT_DPI,
            layout: Layout::Single,
            panels: vec![axes],
        }
    }

    /// Panels stacked vertically, one per ratio.
    pub fn stacked(size: (f64, f64), height_ratios: Vec<f64>) -> Self {
        let panels = height_ratios.iter().map(|_| Axes::new()).collect();
        Self {
            size,
            dpi: DEFAULT_DPI,
            layout: Layout::Stacked { height_ratios },
            panels,
        }
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Pixel size at the figure's dpi.
    pub fn pixel_size(&self) -> (u32, u32) {
        let px = |inches: f64| (inches * self.dpi as f64).round().max(1.0) as u32;
        (px(self.size.0), px(self.size.1))
    }

    /// First panel. Every figure has at least one.
    pub fn axes(&self) -> &Axes {
        &self.panels[0]
    }

    pub fn axes_mut(&mut self) -> &mut Axes {
        &mut self.panels[0]
    }

    pub fn panel(&self, i: usize) -> Option<&Axes> {
        self.panels.get(i)
    }

    pub fn panel_mut(&mut self, i: usize) -> Option<&mut Axes> {
        self.panels.get_mut(i)
    }

    /// Fractions of the figure height given to each panel, top first.
    pub fn panel_fractions(&self) -> Vec<f64> {
        match &self.layout {
            Layout::Single => vec![1.0; self.panels.len().min(1)],
            Layout::Stacked { height_ratios } => {
                let total: f64 = height_ratios.iter().sum();
                if total <= 0.0 {
                    let n = height_ratios.len().max(1) as f64;
                    return height_ratios.iter().map(|_| 1.0 / n).collect();
                }
                height_ratios.iter().map(|r| r / total).collect()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        serde_json::from_str(json).map_err(|e| ModelError::InvalidFormat(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn pixel_size_follows_dpi() {
        let fig = Figure::new((6.0, 4.0));
        assert_eq!(fig.pixel_size(), (600, 400));
        assert_eq!(fig.with_dpi(300).pixel_size(), (1800, 1200));
    }

    #[test]
    fn stacked_fractions_normalize() {
        let fig = Figure::stacked((8.0, 10.0), vec![12.0, 1.0]);
        assert_eq!(fig.panels.len(), 2);
        let f = fig.panel_fractions();
        assert!((f[0] - 12.0 / 13.0).abs() < 1e-12);
        assert!((f[0] + f[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn json_roundtrip_preserves_artists() {
        let mut fig = Figure::new((6.0, 4.0));
        fig.axes_mut()
            .plot(&[0.0, 1.0], &[1.0, 2.0], Style::points(Color::BLUE))
            .set_xlabel("known");
        let json = fig.to_json().unwrap();
        let back = Figure::from_json(&json).unwrap();
        assert_eq!(back, fig);
    }
}
