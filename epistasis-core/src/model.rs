//! Fitted-model inputs consumed by the plots.
//!
//! Fitting lives upstream. Plots only see a model through these traits:
//! - [`EpistasisModel`]: phenotypes plus epistatic coefficients
//! - [`RegressionModel`]: adds predicted phenotypes
//! - [`NonlinearModel`]: adds the linear stage and the nonlinear function
//!
//! [`FittedModel`] is the serde carrier that upstream tools hand over as JSON.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Site coordinates of one epistatic coefficient. `[0]` is the intercept;
/// other labels list 1-based site indices (`[1, 3]` = pairwise 1×3).
pub type Label = Vec<usize>;

/// Interaction order of a label: number of sites involved, 0 for the
/// intercept.
pub fn label_order(label: &[usize]) -> usize {
    if label == [0] {
        0
    } else {
        label.len()
    }
}

/// Asymmetric error bounds, both stored as positive distances.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ErrorBounds {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl ErrorBounds {
    pub fn symmetric(err: Vec<f64>) -> Self {
        Self {
            lower: err.clone(),
            upper: err,
        }
    }

    pub fn len(&self) -> usize {
        self.upper.len()
    }

    pub fn is_empty(&self) -> bool {
        self.upper.is_empty()
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            lower: self.lower.iter().map(|e| e * factor).collect(),
            upper: self.upper.iter().map(|e| e * factor).collect(),
        }
    }
}

/// Untransformed coefficients of a model fit in log space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInteractions {
    pub values: Vec<f64>,
    pub err: ErrorBounds,
}

/// Epistatic coefficients with their labels and standard errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interactions {
    pub labels: Vec<Label>,
    pub values: Vec<f64>,
    #[serde(default)]
    pub err: ErrorBounds,
    /// Present only when the phenotypes were log-transformed before fitting.
    #[serde(default)]
    pub raw: Option<RawInteractions>,
}

impl Interactions {
    pub fn new(labels: Vec<Label>, values: Vec<f64>, err: ErrorBounds) -> Self {
        Self {
            labels,
            values,
            err,
            raw: None,
        }
    }

    pub fn with_raw(mut self, raw: RawInteractions) -> Self {
        self.raw = Some(raw);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Highest interaction order among the labels.
    pub fn highest_order(&self) -> usize {
        self.labels.iter().map(|l| label_order(l)).max().unwrap_or(0)
    }

    /// `(label, value)` pairs of the given order, in label order.
    pub fn order(&self, order: usize) -> Vec<(&Label, f64)> {
        self.labels
            .iter()
            .zip(self.values.iter())
            .filter(|(l, _)| label_order(l) == order)
            .map(|(l, &v)| (l, v))
            .collect()
    }

    /// Checks that labels, values and error bounds line up.
    pub fn validate(&self) -> Result<(), ModelError> {
        let n = self.labels.len();
        if n == 0 {
            return Err(ModelError::Empty("interaction labels"));
        }
        check_len("interaction values", n, self.values.len())?;
        if !self.err.is_empty() {
            check_len("interaction upper errors", n, self.err.upper.len())?;
            check_len("interaction lower errors", n, self.err.lower.len())?;
        }
        if let Some(raw) = &self.raw {
            check_len("raw interaction values", n, raw.values.len())?;
            check_len("raw interaction upper errors", n, raw.err.upper.len())?;
            check_len("raw interaction lower errors", n, raw.err.lower.len())?;
        }
        Ok(())
    }
}

pub(crate) fn check_len(what: &'static str, expected: usize, got: usize) -> Result<(), ModelError> {
    if expected == got {
        Ok(())
    } else {
        Err(ModelError::LengthMismatch {
            what,
            expected,
            got,
        })
    }
}

// ─── Model traits ────────────────────────────────────────────────────

/// Anything carrying phenotypes and epistatic coefficients.
pub trait EpistasisModel {
    /// Observed phenotypes (log-transformed if [`Self::log_transform`]).
    fn phenotypes(&self) -> &[f64];

    /// Epistatic coefficients, intercept first.
    fn interactions(&self) -> &Interactions;

    /// Whether phenotypes were log-transformed before fitting.
    fn log_transform(&self) -> bool {
        false
    }

    fn log_base(&self) -> f64 {
        10.0
    }

    /// Phenotypes before any log transform.
    fn raw_phenotypes(&self) -> &[f64] {
        self.phenotypes()
    }

    /// Measurement standard deviations, if known.
    fn stdeviations(&self) -> Option<&[f64]> {
        None
    }

    /// Number of sites in the genotypes.
    fn length(&self) -> usize;
}

/// A model that predicts phenotypes.
pub trait RegressionModel: EpistasisModel {
    fn predict(&self) -> Vec<f64>;
}

/// A model with a linear epistatic stage feeding a nonlinear function.
pub trait NonlinearModel: RegressionModel {
    /// Linear-stage predictions used as the nonlinear function's input.
    fn linear(&self) -> Vec<f64>;

    /// X·β of the linear stage.
    fn linear_phenotypes(&self) -> Vec<f64>;

    /// Whether the linear stage was fit in log space.
    fn linear_log_transform(&self) -> bool {
        false
    }

    /// Fitted parameters of the nonlinear function.
    fn parameters(&self) -> &[f64];

    /// Evaluate the nonlinear function at `x`.
    fn evaluate(&self, x: f64, params: &[f64]) -> f64;
}

// ─── Serde carrier ───────────────────────────────────────────────────

/// Nonlinear scale functions a [`FittedModel`] can carry.
///
/// Parameter order follows each variant's formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonlinearFunction {
    /// f(x) = x
    Identity,
    /// f(x) = a·x^b + c
    Power,
    /// f(x) = a·exp(b·x) + c
    Exponential,
    /// f(x) = a·x / (b + x)
    Saturating,
}

impl NonlinearFunction {
    pub fn evaluate(&self, x: f64, p: &[f64]) -> f64 {
        let at = |i: usize, default: f64| p.get(i).copied().unwrap_or(default);
        match self {
            NonlinearFunction::Identity => x,
            NonlinearFunction::Power => at(0, 1.0) * x.powf(at(1, 1.0)) + at(2, 0.0),
            NonlinearFunction::Exponential => at(0, 1.0) * (at(1, 1.0) * x).exp() + at(2, 0.0),
            NonlinearFunction::Saturating => at(0, 1.0) * x / (at(1, 1.0) + x),
        }
    }
}

/// The nonlinear stage of a fitted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonlinearFit {
    pub function: NonlinearFunction,
    pub parameters: Vec<f64>,
    /// Linear-stage predictions for each genotype.
    pub linear: Vec<f64>,
    /// X·β for each genotype.
    pub linear_phenotypes: Vec<f64>,
    #[serde(default)]
    pub linear_log_transform: bool,
}

/// Arrays produced by an upstream fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
    /// Genotype strings, one per phenotype (optional, used for labels and
    /// the genotype graph).
    #[serde(default)]
    pub genotypes: Vec<String>,
    pub phenotypes: Vec<f64>,
    /// Phenotypes before any log transform; defaults to `phenotypes`.
    #[serde(default)]
    pub raw_phenotypes: Option<Vec<f64>>,
    #[serde(default)]
    pub predictions: Vec<f64>,
    #[serde(default)]
    pub stdeviations: Option<Vec<f64>>,
    pub interactions: Interactions,
    #[serde(default)]
    pub log_transform: bool,
    #[serde(default = "default_log_base")]
    pub log_base: f64,
    /// Number of sites; inferred from labels when absent.
    #[serde(default)]
    pub length: Option<usize>,
    #[serde(default)]
    pub nonlinear: Option<NonlinearFit>,
}

fn default_log_base() -> f64 {
    10.0
}

impl FittedModel {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Validates that every array agrees on the number of genotypes.
    pub fn validate(&self) -> Result<(), ModelError> {
        let n = self.phenotypes.len();
        if n == 0 {
            return Err(ModelError::Empty("phenotypes"));
        }
        self.interactions.validate()?;
        if !self.predictions.is_empty() {
            check_len("predictions", n, self.predictions.len())?;
        }
        if !self.genotypes.is_empty() {
            check_len("genotypes", n, self.genotypes.len())?;
        }
        if let Some(raw) = &self.raw_phenotypes {
            check_len("raw phenotypes", n, raw.len())?;
        }
        if let Some(sd) = &self.stdeviations {
            check_len("stdeviations", n, sd.len())?;
        }
        if let Some(nl) = &self.nonlinear {
            check_len("linear predictions", n, nl.linear.len())?;
            check_len("linear phenotypes", n, nl.linear_phenotypes.len())?;
        }
        Ok(())
    }

    pub fn is_nonlinear(&self) -> bool {
        self.nonlinear.is_some()
    }
}

impl EpistasisModel for FittedModel {
    fn phenotypes(&self) -> &[f64] {
        &self.phenotypes
    }

    fn interactions(&self) -> &Interactions {
        &self.interactions
    }

    fn log_transform(&self) -> bool {
        self.log_transform
    }

    fn log_base(&self) -> f64 {
        self.log_base
    }

    fn raw_phenotypes(&self) -> &[f64] {
        self.raw_phenotypes.as_deref().unwrap_or(&self.phenotypes)
    }

    fn stdeviations(&self) -> Option<&[f64]> {
        self.stdeviations.as_deref()
    }

    fn length(&self) -> usize {
        self.length.unwrap_or_else(|| {
            self.interactions
                .labels
                .iter()
                .flatten()
                .copied()
                .max()
                .unwrap_or(0)
        })
    }
}

impl RegressionModel for FittedModel {
    fn predict(&self) -> Vec<f64> {
        self.predictions.clone()
    }
}

impl NonlinearModel for FittedModel {
    fn linear(&self) -> Vec<f64> {
        self.nonlinear
            .as_ref()
            .map(|nl| nl.linear.clone())
            .unwrap_or_else(|| self.predictions.clone())
    }

    fn linear_phenotypes(&self) -> Vec<f64> {
        self.nonlinear
            .as_ref()
            .map(|nl| nl.linear_phenotypes.clone())
            .unwrap_or_else(|| self.predictions.clone())
    }

    fn linear_log_transform(&self) -> bool {
        self.nonlinear
            .as_ref()
            .map(|nl| nl.linear_log_transform)
            .unwrap_or(false)
    }

    fn parameters(&self) -> &[f64] {
        self.nonlinear
            .as_ref()
            .map(|nl| nl.parameters.as_slice())
            .unwrap_or(&[])
    }

    fn evaluate(&self, x: f64, params: &[f64]) -> f64 {
        match &self.nonlinear {
            Some(nl) => nl.function.evaluate(x, params),
            None => x,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_site_interactions() -> Interactions {
        Interactions::new(
            vec![vec![0], vec![1], vec![2], vec![1, 2]],
            vec![1.0, 0.5, -0.25, 0.1],
            ErrorBounds::symmetric(vec![0.1, 0.1, 0.1, 0.2]),
        )
    }

    #[test]
    fn label_order_treats_zero_as_intercept() {
        assert_eq!(label_order(&[0]), 0);
        assert_eq!(label_order(&[3]), 1);
        assert_eq!(label_order(&[1, 2, 4]), 3);
    }

    #[test]
    fn order_filters_labels() {
        let ints = two_site_interactions();
        let first = ints.order(1);
        assert_eq!(first.len(), 2);
        assert_eq!(first[1], (&vec![2], -0.25));
        assert_eq!(ints.order(2), vec![(&vec![1, 2], 0.1)]);
        assert!(ints.order(3).is_empty());
        assert_eq!(ints.highest_order(), 2);
    }

    #[test]
    fn validate_catches_mismatched_errors() {
        let mut ints = two_site_interactions();
        assert!(ints.validate().is_ok());
        ints.err.upper.pop();
        assert!(matches!(
            ints.validate(),
            Err(ModelError::LengthMismatch { what: "interaction upper errors", expected: 4, got: 3 })
        ));
    }

    #[test]
    fn nonlinear_functions_evaluate() {
        assert_eq!(NonlinearFunction::Identity.evaluate(2.0, &[]), 2.0);
        assert_eq!(NonlinearFunction::Power.evaluate(2.0, &[3.0, 2.0, 1.0]), 13.0);
        assert!((NonlinearFunction::Exponential.evaluate(0.0, &[2.0, 5.0, 1.0]) - 3.0).abs() < 1e-12);
        assert_eq!(NonlinearFunction::Saturating.evaluate(1.0, &[4.0, 1.0]), 2.0);
    }

    #[test]
    fn fitted_model_deserializes_with_defaults() {
        let json = r#"{
            "phenotypes": [0.1, 0.4, 0.5, 1.2],
            "predictions": [0.1, 0.5, 0.4, 1.2],
            "interactions": {
                "labels": [[0], [1], [2], [1, 2]],
                "values": [0.1, 0.35, 0.35, 0.4]
            }
        }"#;
        let model = FittedModel::from_json(json).unwrap();
        assert!(model.validate().is_ok());
        assert!(!model.log_transform());
        assert_eq!(model.log_base(), 10.0);
        assert_eq!(model.length(), 2);
        assert_eq!(model.raw_phenotypes(), model.phenotypes());
        assert!(model.stdeviations().is_none());
        assert!(!model.is_nonlinear());
        assert_eq!(model.linear(), model.predict());
    }

    #[test]
    fn fitted_model_validate_rejects_short_predictions() {
        let model = FittedModel {
            genotypes: vec![],
            phenotypes: vec![1.0, 2.0],
            raw_phenotypes: None,
            predictions: vec![1.0],
            stdeviations: None,
            interactions: two_site_interactions(),
            log_transform: false,
            log_base: 10.0,
            length: None,
            nonlinear: None,
        };
        assert!(matches!(
            model.validate(),
            Err(ModelError::LengthMismatch { what: "predictions", .. })
        ));
    }
}
