//! Errors raised while validating model data handed over by upstream fitters.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("unknown color: {0:?}")]
    UnknownColor(String),

    #[error("length mismatch: {what} has {got} entries, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{0} is empty")]
    Empty(&'static str),

    #[error("model has no nonlinear function")]
    NotNonlinear,

    #[error("invalid genotype {genotype:?}: expected {expected} characters")]
    GenotypeLength { genotype: String, expected: usize },

    #[error("invalid format string {0:?}")]
    InvalidFormat(String),
}
