//! Errors raised while building or rendering a plot.

use epistasis_core::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("a log scale cannot be used because the genotype-phenotype map was never log-transformed")]
    LogScaling,

    #[error("significance argument {0:?} not recognized (expected \"bon\", \"p\" or none)")]
    UnknownSignificance(String),

    #[error("order_colors has too few entries (at least {needed} needed, got {given})")]
    TooFewOrderColors { needed: usize, given: usize },

    #[error("cannot plot {0} dimensions; at most 3 are supported")]
    TooManyDimensions(usize),

    #[error("length mismatch: {what} has {got} entries, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("no data to plot: {0} is empty")]
    EmptyData(&'static str),

    #[error("model does not provide {0}")]
    Missing(&'static str),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("render failed: {0}")]
    Render(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),
}

/// Fails with [`PlotError::LengthMismatch`] unless `got == expected`.
pub(crate) fn check_len(what: &'static str, expected: usize, got: usize) -> Result<(), PlotError> {
    if expected == got {
        Ok(())
    } else {
        Err(PlotError::LengthMismatch {
            what,
            expected,
            got,
        })
    }
}

/// Fails with [`PlotError::EmptyData`] when `values` is empty.
pub(crate) fn non_empty(what: &'static str, values: &[f64]) -> Result<(), PlotError> {
    if values.is_empty() {
        Err(PlotError::EmptyData(what))
    } else {
        Ok(())
    }
}
