//! Property tests for the interaction chart.
//!
//! Uses proptest to verify:
//! 1. Star counts equal the number of leading cutoffs a p-value passes
//! 2. Bar colors follow interaction order when significant, gray otherwise
//! 3. Both entry points agree on the same coefficients
//! 4. The site grid marks exactly the sites of each term

use epistasis_core::color::{default_order_colors, Color};
use epistasis_core::model::{ErrorBounds, FittedModel, Interactions, Label};
use epistasis_core::stats::two_sided_p;
use epistasis_plot::interactions::{InteractionLayout, InteractionOptions, Significance};
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

/// Labels over 4 sites up to order 3, sorted by order like a real model.
fn arb_labels() -> impl Strategy<Value = Vec<Label>> {
    let all: Vec<Label> = vec![
        vec![1],
        vec![2],
        vec![3],
        vec![4],
        vec![1, 2],
        vec![1, 3],
        vec![2, 4],
        vec![3, 4],
        vec![1, 2, 3],
        vec![2, 3, 4],
    ];
    proptest::sample::subsequence(all, 1..=10)
}

fn arb_terms() -> impl Strategy<Value = (Vec<Label>, Vec<f64>, Vec<f64>)> {
    arb_labels().prop_flat_map(|labels| {
        let n = labels.len();
        (
            Just(labels),
            prop::collection::vec(-2.0..2.0_f64, n),
            prop::collection::vec(0.01..1.0_f64, n),
        )
    })
}

fn arb_significance() -> impl Strategy<Value = Significance> {
    prop_oneof![Just(Significance::Bonferroni), Just(Significance::Raw)]
}

fn with_intercept(labels: &[Label], beta: &[f64], err: &[f64]) -> (Vec<Label>, Vec<f64>, Vec<f64>) {
    let mut l = vec![vec![0]];
    l.extend_from_slice(labels);
    let mut b = vec![1.0];
    b.extend_from_slice(beta);
    let mut e = vec![0.1];
    e.extend_from_slice(err);
    (l, b, e)
}

fn fitted(labels: Vec<Label>, beta: Vec<f64>, err: Vec<f64>) -> FittedModel {
    FittedModel {
        genotypes: vec![],
        phenotypes: vec![0.0],
        raw_phenotypes: None,
        predictions: vec![],
        stdeviations: None,
        interactions: Interactions::new(labels, beta, ErrorBounds::symmetric(err)),
        log_transform: false,
        log_base: 10.0,
        length: Some(4),
        nonlinear: None,
    }
}

// ── 1. Stars ─────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn star_count_matches_leading_cutoffs((labels, beta, err) in arb_terms(), significance in arb_significance()) {
        let opts = InteractionOptions { significance, ..Default::default() };
        let layout = InteractionLayout::from_arrays(&beta, &labels, &ErrorBounds::symmetric(err), &opts).unwrap();
        for (i, &p) in layout.p_values.iter().enumerate() {
            let mut expected = 0;
            for &cutoff in &opts.star_cutoffs {
                if p < cutoff {
                    expected += 1;
                } else {
                    break;
                }
            }
            prop_assert_eq!(layout.star_counts[i], expected);
        }
    }

    #[test]
    fn p_values_follow_z_scores((labels, beta, err) in arb_terms(), significance in arb_significance()) {
        let opts = InteractionOptions { significance, ..Default::default() };
        let n = beta.len() as f64;
        let layout = InteractionLayout::from_arrays(&beta, &labels, &ErrorBounds::symmetric(err.clone()), &opts).unwrap();
        for i in 0..beta.len() {
            let raw = two_sided_p(beta[i] / err[i]);
            let expected = match significance {
                Significance::Bonferroni => raw * n,
                _ => raw,
            };
            prop_assert!((layout.p_values[i] - expected).abs() <= 1e-12 * expected.max(1.0));
        }
    }

    #[test]
    fn ignored_significance_draws_no_stars((labels, beta, err) in arb_terms()) {
        let opts = InteractionOptions { sigmas: 0.0, ..Default::default() };
        let layout = InteractionLayout::from_arrays(&beta, &labels, &ErrorBounds::symmetric(err), &opts).unwrap();
        prop_assert!(layout.star_counts.iter().all(|&c| c == 0));
        prop_assert!(layout.yerr.is_none());
    }
}

// ── 2. Colors ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn color_index_is_order_minus_one_when_significant((labels, beta, err) in arb_terms(), significance in arb_significance()) {
        let opts = InteractionOptions { significance, ..Default::default() };
        let layout = InteractionLayout::from_arrays(&beta, &labels, &ErrorBounds::symmetric(err), &opts).unwrap();
        let palette = default_order_colors();
        for (i, label) in labels.iter().enumerate() {
            let significant = layout.p_values[i] < opts.significance_cutoff;
            let expected = significant.then(|| label.len() - 1);
            prop_assert_eq!(layout.color_index[i], expected);
            let color = match expected {
                Some(k) => palette[k],
                None => Color::GRAY,
            };
            prop_assert_eq!(layout.colors[i], color);
        }
    }

    #[test]
    fn colorall_colors_every_term((labels, beta, err) in arb_terms()) {
        let opts = InteractionOptions { colorall: true, ..Default::default() };
        let layout = InteractionLayout::from_arrays(&beta, &labels, &ErrorBounds::symmetric(err), &opts).unwrap();
        for (i, label) in labels.iter().enumerate() {
            prop_assert_eq!(layout.color_index[i], Some(label.len() - 1));
        }
    }
}

// ── 3. Entry points agree ────────────────────────────────────────────

proptest! {
    #[test]
    fn model_and_arrays_agree((labels, beta, err) in arb_terms()) {
        let (l, b, e) = with_intercept(&labels, &beta, &err);
        let opts = InteractionOptions::default();
        let from_arrays = InteractionLayout::from_arrays(&b, &l, &ErrorBounds::symmetric(e.clone()), &opts).unwrap();
        let from_model = InteractionLayout::from_model(&fitted(l, b, e), &opts).unwrap();
        prop_assert_eq!(&from_arrays.labels, &labels);
        prop_assert_eq!(&from_model.labels, &labels);
        prop_assert_eq!(&from_arrays.p_values, &from_model.p_values);
        prop_assert_eq!(&from_arrays.color_index, &from_model.color_index);
        prop_assert_eq!(&from_arrays.heights, &from_model.heights);
    }
}

// ── 4. Site grid ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn grid_marks_exactly_the_term_sites((labels, beta, err) in arb_terms()) {
        let layout = InteractionLayout::from_arrays(&beta, &labels, &ErrorBounds::symmetric(err), &InteractionOptions::default()).unwrap();
        for (col, label) in labels.iter().enumerate() {
            for (row, site) in layout.sites.iter().enumerate() {
                let cell = layout.grid.get(row, col);
                if label.contains(site) {
                    prop_assert_eq!(cell, Some(layout.colors[col]));
                } else {
                    prop_assert_eq!(cell, None);
                }
            }
        }
    }
}

// ── Fixed cases ──────────────────────────────────────────────────────

#[test]
fn known_stars_and_colors() {
    // z = 10 (capped), 2.5, 0.5 with raw p-values.
    let labels = vec![vec![1], vec![1, 2], vec![1, 2, 3]];
    let beta = [1.0, 0.25, 0.05];
    let err = ErrorBounds::symmetric(vec![0.1; 3]);
    let opts = InteractionOptions {
        significance: Significance::Raw,
        ..Default::default()
    };
    let layout = InteractionLayout::from_arrays(&beta, &labels, &err, &opts).unwrap();
    assert_eq!(layout.star_counts, vec![3, 1, 0]);
    assert_eq!(layout.color_index, vec![Some(0), Some(1), None]);
    assert_eq!(layout.colors[0], Color::RED);
    assert_eq!(layout.colors[2], Color::GRAY);
}
