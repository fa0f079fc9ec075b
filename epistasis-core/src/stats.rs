//! Statistics primitives used to derive significance and distribution curves.
//!
//! Implemented from first principles:
//! - Lanczos approximation for ln(Gamma)
//! - Regularized incomplete beta function (Lentz continued fraction)
//! - Complementary error function and the standard normal CDF
//! - F-distribution PDF/CDF/PPF
//! - Small array helpers (linspace, argsort, mean, std)

use serde::{Deserialize, Serialize};

/// Largest |z| used for p-values; beyond this 2·(1 − Φ(z)) underflows
/// double precision when computed as a difference.
pub const Z_SCORE_CAP: f64 = 8.2;

// ─── Special functions ───────────────────────────────────────────────

/// Lanczos approximation for ln(Gamma(x)), g=7, n=9.
pub fn ln_gamma(x: f64) -> f64 {
    #[allow(clippy::excessive_precision)]
    const LANCZOS: [f64; 9] = [
        0.99999999999980993,
        676.5203681218851,
        -1259.1392167224028,
        771.32342877765313,
        -176.61502916214059,
        12.507343278686905,
        -0.13857109526572012,
        9.9843695780195716e-6,
        1.5056327351493116e-7,
    ];
    const G: f64 = 7.0;
    let pi = std::f64::consts::PI;

    if x < 0.5 {
        // Reflection: Gamma(x) * Gamma(1 - x) = pi / sin(pi x)
        let s = (pi * x).sin();
        if s.abs() < 1e-300 {
            return f64::INFINITY;
        }
        return pi.ln() - s.abs().ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let series = LANCZOS
        .iter()
        .enumerate()
        .skip(1)
        .fold(LANCZOS[0], |acc, (i, &c)| acc + c / (x + i as f64));
    let t = x + G + 0.5;

    0.5 * (2.0 * pi).ln() + (x + 0.5) * t.ln() - t + series.ln()
}

/// ln(B(a, b)).
pub fn ln_beta(a: f64, b: f64) -> f64 {
    ln_gamma(a) + ln_gamma(b) - ln_gamma(a + b)
}

/// Regularized incomplete beta function I_x(a, b).
pub fn regularized_incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if !(0.0..=1.0).contains(&x) {
        return f64::NAN;
    }
    if x == 0.0 || x == 1.0 {
        return x;
    }
    // The continued fraction converges fast below the mean; mirror otherwise.
    if x > (a + 1.0) / (a + b + 2.0) {
        return 1.0 - regularized_incomplete_beta(b, a, 1.0 - x);
    }

    let front = (a * x.ln() + b * (1.0 - x).ln() - ln_beta(a, b) - a.ln()).exp();
    front * beta_continued_fraction(a, b, x)
}

fn beta_continued_fraction(a: f64, b: f64, x: f64) -> f64 {
    const MAX_ITER: usize = 300;
    const EPS: f64 = 1e-14;
    const TINY: f64 = 1e-30;

    let guard = |v: f64| if v.abs() < TINY { TINY } else { v };

    let mut c = 1.0;
    let mut d = 1.0 / guard(1.0 - (a + b) * x / (a + 1.0));
    let mut f = d;

    for m in 1..=MAX_ITER {
        let m = m as f64;

        let even = m * (b - m) * x / ((a + 2.0 * m - 1.0) * (a + 2.0 * m));
        d = 1.0 / guard(1.0 + even * d);
        c = guard(1.0 + even / c);
        f *= c * d;

        let odd = -((a + m) * (a + b + m) * x) / ((a + 2.0 * m) * (a + 2.0 * m + 1.0));
        d = 1.0 / guard(1.0 + odd * d);
        c = guard(1.0 + odd / c);
        let delta = c * d;
        f *= delta;

        if (delta - 1.0).abs() < EPS {
            break;
        }
    }
    f
}

/// Complementary error function (Chebyshev fit, relative error < 1.2e-7).
pub fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -z * z - 1.26551223
        + t * (1.00002368
            + t * (0.37409196
                + t * (0.09678418
                    + t * (-0.18628806
                        + t * (0.27886807
                            + t * (-1.13520398
                                + t * (1.48851587 + t * (-0.82215223 + t * 0.17087277))))))));
    let ans = t * poly.exp();
    if x >= 0.0 {
        ans
    } else {
        2.0 - ans
    }
}

/// Standard normal CDF Φ(z).
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * erfc(-z / std::f64::consts::SQRT_2)
}

/// Standard normal survival function 1 − Φ(z), computed without cancellation.
pub fn normal_sf(z: f64) -> f64 {
    0.5 * erfc(z / std::f64::consts::SQRT_2)
}

/// Two-sided p-value for a z-score: 2·(1 − Φ(|z|)).
///
/// `|z|` is capped at [`Z_SCORE_CAP`].
pub fn two_sided_p(z: f64) -> f64 {
    let z = z.abs().min(Z_SCORE_CAP);
    2.0 * normal_sf(z)
}

// ─── Distributions ───────────────────────────────────────────────────

/// A univariate continuous distribution that can be plotted.
pub trait Distribution {
    fn pdf(&self, x: f64) -> f64;
    fn cdf(&self, x: f64) -> f64;

    /// Inverse CDF. The default bisects [`Distribution::cdf`] over
    /// [`Distribution::support_hint`], widening the bracket as needed.
    fn ppf(&self, q: f64) -> f64 {
        if !(0.0..=1.0).contains(&q) {
            return f64::NAN;
        }
        let (mut lo, mut hi) = self.support_hint();
        let mut widen = 0;
        while self.cdf(hi) < q && widen < 200 {
            hi = lo + (hi - lo) * 2.0;
            widen += 1;
        }
        widen = 0;
        while self.cdf(lo) > q && widen < 200 {
            lo = hi - (hi - lo) * 2.0;
            widen += 1;
        }
        for _ in 0..200 {
            let mid = 0.5 * (lo + hi);
            if self.cdf(mid) < q {
                lo = mid;
            } else {
                hi = mid;
            }
            if (hi - lo).abs() <= 1e-12 * (1.0 + mid.abs()) {
                break;
            }
        }
        0.5 * (lo + hi)
    }

    /// Initial bracket for [`Distribution::ppf`].
    fn support_hint(&self) -> (f64, f64);
}

/// Fisher-Snedecor F distribution with `dfn` numerator and `dfd`
/// denominator degrees of freedom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FDistribution {
    pub dfn: f64,
    pub dfd: f64,
}

impl FDistribution {
    pub fn new(dfn: f64, dfd: f64) -> Self {
        Self { dfn, dfd }
    }
}

impl Distribution for FDistribution {
    fn pdf(&self, x: f64) -> f64 {
        let (d1, d2) = (self.dfn, self.dfd);
        if x < 0.0 || d1 <= 0.0 || d2 <= 0.0 {
            return 0.0;
        }
        if x == 0.0 {
            return match d1.partial_cmp(&2.0) {
                Some(std::cmp::Ordering::Less) => f64::INFINITY,
                Some(std::cmp::Ordering::Equal) => 1.0,
                _ => 0.0,
            };
        }
        let ln_pdf = 0.5 * (d1 * (d1 * x).ln() + d2 * d2.ln() - (d1 + d2) * (d1 * x + d2).ln())
            - x.ln()
            - ln_beta(d1 / 2.0, d2 / 2.0);
        ln_pdf.exp()
    }

    fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        let (d1, d2) = (self.dfn, self.dfd);
        regularized_incomplete_beta(d1 / 2.0, d2 / 2.0, d1 * x / (d1 * x + d2))
    }

    fn ppf(&self, q: f64) -> f64 {
        if !(0.0..=1.0).contains(&q) {
            return f64::NAN;
        }
        if q == 0.0 {
            return 0.0;
        }
        if q == 1.0 {
            return f64::INFINITY;
        }
        let mut hi = 1.0;
        while self.cdf(hi) < q && hi < 1e12 {
            hi *= 2.0;
        }
        let mut lo = 0.0;
        for _ in 0..200 {
            let mid = 0.5 * (lo + hi);
            if self.cdf(mid) < q {
                lo = mid;
            } else {
                hi = mid;
            }
            if hi - lo <= 1e-12 * (1.0 + mid) {
                break;
            }
        }
        0.5 * (lo + hi)
    }

    fn support_hint(&self) -> (f64, f64) {
        (0.0, 1.0)
    }
}

/// Normal distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Normal {
    pub mean: f64,
    pub sd: f64,
}

impl Normal {
    pub fn standard() -> Self {
        Self { mean: 0.0, sd: 1.0 }
    }
}

impl Distribution for Normal {
    fn pdf(&self, x: f64) -> f64 {
        let z = (x - self.mean) / self.sd;
        (-0.5 * z * z).exp() / (self.sd * (2.0 * std::f64::consts::PI).sqrt())
    }

    fn cdf(&self, x: f64) -> f64 {
        normal_cdf((x - self.mean) / self.sd)
    }

    fn support_hint(&self) -> (f64, f64) {
        (self.mean - 10.0 * self.sd, self.mean + 10.0 * self.sd)
    }
}

// ─── Array helpers ───────────────────────────────────────────────────

/// `n` evenly spaced samples over `[start, stop]`, endpoints included.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Indices that sort `values` ascending (stable, NaN last).
pub fn argsort(values: &[f64]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..values.len()).collect();
    idx.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    idx
}

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by n).
pub fn population_std(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(var.sqrt())
}

/// `(min, max)` over the finite entries; `None` if there are none.
pub fn finite_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Largest absolute finite value, or 0 for an empty slice.
pub fn max_abs(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0, |acc, v| acc.max(v.abs()))
}
