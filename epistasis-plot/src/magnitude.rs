//! Average coefficient magnitude per interaction order.

use serde::{Deserialize, Serialize};
use tracing::debug;

use epistasis_core::color::Color;
use epistasis_core::figure::{dashed, Figure, LineStyle, Marker, Style};
use epistasis_core::model::{EpistasisModel, ErrorBounds};
use epistasis_core::stats::{mean, population_std};

use crate::error::PlotError;
use crate::regression::DEFAULT_FIGSIZE;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagnitudeOptions {
    /// Average signed coefficients instead of absolute values.
    pub keep_sign: bool,
    pub marker: Marker,
    pub color: Color,
    pub line: LineStyle,
    pub xlabel: String,
    pub ylabel: String,
    pub title: String,
    pub figsize: (f64, f64),
    /// Population standard deviation as error bars.
    pub errorbars: bool,
}

impl Default for MagnitudeOptions {
    fn default() -> Self {
        Self {
            keep_sign: false,
            marker: Marker::Circle,
            color: Color::BLUE,
            line: LineStyle::None,
            xlabel: "Order".to_string(),
            ylabel: "Magnitude".to_string(),
            title: String::new(),
            figsize: DEFAULT_FIGSIZE,
            errorbars: true,
        }
    }
}

/// Mean and spread of the coefficients of one order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderMagnitude {
    pub order: usize,
    pub mean: f64,
    pub std: f64,
}

/// Per-order statistics for orders `1..=length`; orders without
/// coefficients are skipped.
pub fn order_magnitudes<M: EpistasisModel + ?Sized>(model: &M, keep_sign: bool) -> Vec<OrderMagnitude> {
    let interactions = model.interactions();
    (1..=model.length())
        .filter_map(|order| {
            let coeffs: Vec<f64> = interactions
                .order(order)
                .into_iter()
                .map(|(_, v)| if keep_sign { v } else { v.abs() })
                .collect();
            Some(OrderMagnitude {
                order,
                mean: mean(&coeffs)?,
                std: population_std(&coeffs)?,
            })
        })
        .collect()
}

pub fn magnitude_vs_order<M: EpistasisModel + ?Sized>(
    model: &M,
    opts: &MagnitudeOptions,
) -> Result<Figure, PlotError> {
    let stats = order_magnitudes(model, opts.keep_sign);
    if stats.is_empty() {
        return Err(PlotError::EmptyData("interaction orders"));
    }
    let orders: Vec<f64> = stats.iter().map(|s| s.order as f64).collect();
    let magnitudes: Vec<f64> = stats.iter().map(|s| s.mean).collect();
    let style = Style::markers(opts.color, opts.marker).with_line(opts.line);

    let mut fig = Figure::new(opts.figsize);
    let ax = fig.axes_mut();
    if opts.errorbars {
        let errors = ErrorBounds::symmetric(stats.iter().map(|s| s.std).collect());
        ax.errorbar(&orders, &magnitudes, errors, style, 0.0);
    } else {
        ax.plot(&orders, &magnitudes, style);
    }

    let (lo, hi) = ax.effective_ylim();
    let ylimit = lo.abs().max(hi.abs());
    let first = orders[0];
    let last = orders[orders.len() - 1];
    let (xmin, xmax) = if first == last {
        (first - 0.5, last + 0.5)
    } else {
        (first, last)
    };
    ax.axis([xmin, xmax, -ylimit, ylimit]);
    if opts.keep_sign {
        ax.hlines(0.0, xmin, xmax, dashed(1.0));
    }
    ax.set_xlabel(&opts.xlabel);
    ax.set_ylabel(&opts.ylabel);
    if !opts.title.is_empty() {
        ax.set_title(&opts.title);
    }
    debug!(orders = stats.len(), ylimit, "magnitude vs order");
    Ok(fig)
}

#[cfg(test)]
mod tests {
    use super::*;
    use epistasis_core::model::{FittedModel, Interactions};
    use epistasis_core::Artist;

    fn model() -> FittedModel {
        FittedModel {
            genotypes: vec![],
            phenotypes: vec![0.0; 8],
            raw_phenotypes: None,
            predictions: vec![],
            stdeviations: None,
            interactions: Interactions::new(
                vec![vec![0], vec![1], vec![2], vec![3], vec![1, 2], vec![2, 3]],
                vec![5.0, 1.0, -3.0, 2.0, -0.5, 0.5],
                ErrorBounds::symmetric(vec![0.1; 6]),
            ),
            log_transform: false,
            log_base: 10.0,
            length: Some(3),
            nonlinear: None,
        }
    }

    #[test]
    fn magnitudes_use_absolute_values_by_default() {
        let stats = order_magnitudes(&model(), false);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].order, 1);
        assert!((stats[0].mean - 2.0).abs() < 1e-12);
        assert!((stats[1].mean - 0.5).abs() < 1e-12);
        assert_eq!(stats[1].std, 0.0);
    }

    #[test]
    fn signed_magnitudes_cancel() {
        let stats = order_magnitudes(&model(), true);
        assert_eq!(stats[0].mean, 0.0);
        assert_eq!(stats[1].mean, 0.0);
        assert!((stats[1].std - 0.5).abs() < 1e-12);
    }

    #[test]
    fn figure_has_symmetric_limits() {
        let fig = magnitude_vs_order(&model(), &MagnitudeOptions::default()).unwrap();
        let ax = fig.axes();
        let (lo, hi) = ax.ylim.unwrap();
        assert_eq!(lo, -hi);
        assert!(hi > 2.0);
        assert_eq!(ax.xlim, Some((1.0, 2.0)));
        assert!(matches!(ax.artists()[0], Artist::ErrorBars { .. }));
        assert_eq!(ax.xlabel.as_deref(), Some("Order"));
    }

    #[test]
    fn zero_line_only_with_sign() {
        let plain = magnitude_vs_order(&model(), &MagnitudeOptions::default()).unwrap();
        assert!(!plain.axes().artists().iter().any(|a| matches!(a, Artist::HLine { .. })));
        let opts = MagnitudeOptions {
            keep_sign: true,
            errorbars: false,
            ..Default::default()
        };
        let signed = magnitude_vs_order(&model(), &opts).unwrap();
        assert!(signed.axes().artists().iter().any(|a| matches!(a, Artist::HLine { .. })));
        assert!(matches!(signed.axes().artists()[0], Artist::Line { .. }));
    }

    #[test]
    fn single_order_is_widened() {
        let mut m = model();
        m.length = Some(1);
        let fig = magnitude_vs_order(&m, &MagnitudeOptions::default()).unwrap();
        assert_eq!(fig.axes().xlim, Some((0.5, 1.5)));
    }
}
