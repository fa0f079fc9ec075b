//! Seeded synthetic genotype-phenotype maps for demos, benches and tests.
//!
//! Builds a complete binary map over `length` sites with random epistatic
//! coefficients that shrink with interaction order, so the interaction plot
//! shows a realistic mix of significant and insignificant terms.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::model::{ErrorBounds, FittedModel, Interactions, Label, NonlinearFit, NonlinearFunction};
use crate::pca::PcaProjection;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticSpec {
    pub length: usize,
    pub order: usize,
    pub seed: u64,
    /// Measurement noise added to each phenotype.
    pub noise: f64,
    /// Standard error reported for each coefficient.
    pub coef_err: f64,
    /// Pass the linear stage through an exponential scale.
    pub nonlinear: bool,
}

impl Default for SyntheticSpec {
    fn default() -> Self {
        Self {
            length: 4,
            order: 3,
            seed: 42,
            noise: 0.05,
            coef_err: 0.08,
            nonlinear: false,
        }
    }
}

/// All binary genotypes of `length` sites, in counting order.
pub fn binary_genotypes(length: usize) -> Vec<String> {
    (0..1usize << length)
        .map(|n| {
            (0..length)
                .map(|site| if (n >> (length - 1 - site)) & 1 == 1 { '1' } else { '0' })
                .collect()
        })
        .collect()
}

/// Interaction labels up to `order`, intercept first, grouped by order and
/// lexicographic within an order.
pub fn interaction_labels(length: usize, order: usize) -> Vec<Label> {
    let mut labels = vec![vec![0]];
    for k in 1..=order.min(length) {
        let mut combo: Vec<usize> = (1..=k).collect();
        loop {
            labels.push(combo.clone());
            // Advance to the next k-combination of 1..=length.
            let mut i = k;
            while i > 0 && combo[i - 1] == length - k + i {
                i -= 1;
            }
            if i == 0 {
                break;
            }
            combo[i - 1] += 1;
            for j in i..k {
                combo[j] = combo[j - 1] + 1;
            }
        }
    }
    labels
}

fn involves_all(genotype: &[u8], label: &[usize]) -> bool {
    label == [0]
        || label
            .iter()
            .all(|&site| site.checked_sub(1).and_then(|i| genotype.get(i)) == Some(&1))
}

fn gaussian(rng: &mut StdRng) -> f64 {
    // Box-Muller; 1 - u keeps the log argument in (0, 1].
    let u: f64 = rng.gen();
    let v: f64 = rng.gen();
    (-2.0 * (1.0 - u).ln()).sqrt() * (2.0 * std::f64::consts::PI * v).cos()
}

/// Deterministic synthetic model for the given spec.
pub fn synthetic_model(spec: &SyntheticSpec) -> FittedModel {
    let mut rng = StdRng::seed_from_u64(spec.seed);
    let genotypes = binary_genotypes(spec.length);
    let labels = interaction_labels(spec.length, spec.order);

    let values: Vec<f64> = labels
        .iter()
        .map(|label| {
            if label == &[0] {
                1.0
            } else {
                let scale = 0.6 / label.len() as f64;
                rng.gen_range(-scale..scale)
            }
        })
        .collect();
    let err = ErrorBounds::symmetric(vec![spec.coef_err; labels.len()]);

    let bits: Vec<Vec<u8>> = genotypes
        .iter()
        .map(|g| g.bytes().map(|b| b - b'0').collect())
        .collect();
    let linear: Vec<f64> = bits
        .iter()
        .map(|g| {
            labels
                .iter()
                .zip(values.iter())
                .filter(|(label, _)| involves_all(g, label))
                .map(|(_, v)| v)
                .sum()
        })
        .collect();

    let (predictions, nonlinear) = if spec.nonlinear {
        let function = NonlinearFunction::Exponential;
        let parameters = vec![1.0, 0.8, 0.0];
        let predictions: Vec<f64> = linear
            .iter()
            .map(|&x| function.evaluate(x, &parameters))
            .collect();
        let fit = NonlinearFit {
            function,
            parameters,
            linear: linear.clone(),
            linear_phenotypes: linear.clone(),
            linear_log_transform: false,
        };
        (predictions, Some(fit))
    } else {
        (linear.clone(), None)
    };

    let phenotypes: Vec<f64> = predictions
        .iter()
        .map(|p| p + spec.noise * gaussian(&mut rng))
        .collect();

    FittedModel {
        genotypes,
        phenotypes,
        raw_phenotypes: None,
        predictions,
        stdeviations: Some(vec![spec.noise.max(f64::EPSILON); linear.len()]),
        interactions: Interactions::new(labels, values, err),
        log_transform: false,
        log_base: 10.0,
        length: Some(spec.length),
        nonlinear,
    }
}

/// Random three-axis projection of a model's genotypes, with the
/// Hamming-1 graph as edges.
pub fn synthetic_projection(model: &FittedModel, seed: u64) -> PcaProjection {
    let mut rng = StdRng::seed_from_u64(seed);
    let length = model.genotypes.first().map(|g| g.len()).unwrap_or(0).max(1);
    let components: Vec<Vec<f64>> = (0..3)
        .map(|_| (0..length).map(|_| rng.gen_range(-1.0..1.0)).collect())
        .collect();
    let projected = model
        .genotypes
        .iter()
        .map(|g| {
            let bits: Vec<f64> = g.bytes().map(|b| f64::from(b - b'0')).collect();
            components
                .iter()
                .map(|c| c.iter().zip(bits.iter()).map(|(w, x)| w * x).sum())
                .collect()
        })
        .collect();
    PcaProjection {
        components,
        projected,
        genotypes: model.genotypes.clone(),
        edges: None,
    }
}
