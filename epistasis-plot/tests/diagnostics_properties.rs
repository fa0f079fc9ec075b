//! Known-vs-learned plots draw exactly the arrays they are given.

use epistasis_core::Artist;
use epistasis_plot::diagnostics::{correlation, residuals, CorrelationOptions, ResidualPlotOptions};
use epistasis_plot::PlotError;
use proptest::prelude::*;

fn arb_pair() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (1usize..64).prop_flat_map(|n| {
        (
            prop::collection::vec(-1e3..1e3_f64, n),
            prop::collection::vec(-1e3..1e3_f64, n),
        )
    })
}

proptest! {
    #[test]
    fn correlation_plots_inputs_verbatim((learned, known) in arb_pair()) {
        let fig = correlation(&learned, &known, &CorrelationOptions::default()).unwrap();
        let lines = fig.axes().lines();
        prop_assert_eq!(lines[0].0, known.as_slice());
        prop_assert_eq!(lines[0].1, learned.as_slice());
    }

    #[test]
    fn residuals_plot_known_against_difference((learned, known) in arb_pair()) {
        let fig = residuals(&learned, &known, &ResidualPlotOptions::default()).unwrap();
        match &fig.axes().artists()[0] {
            Artist::Stem { xs, ys, .. } => {
                prop_assert_eq!(xs, &known);
                for i in 0..known.len() {
                    prop_assert_eq!(ys[i], learned[i] - known[i]);
                }
            }
            other => prop_assert!(false, "expected a stem plot, got {:?}", other),
        }
    }

    #[test]
    fn unequal_lengths_fail((learned, known) in arb_pair(), extra in -1.0..1.0_f64) {
        let mut longer = learned.clone();
        longer.push(extra);
        let err = correlation(&longer, &known, &CorrelationOptions::default()).unwrap_err();
        let is_mismatch = matches!(err, PlotError::LengthMismatch { .. });
        prop_assert!(is_mismatch);
    }
}

#[test]
fn custom_titles_are_used() {
    let opts = CorrelationOptions {
        title: "Holdout".to_string(),
        ..Default::default()
    };
    let fig = correlation(&[1.0, 2.0], &[1.0, 2.0], &opts).unwrap();
    assert_eq!(fig.axes().title.as_deref(), Some("Holdout"));
    assert_eq!(fig.size, (6.0, 6.0));
}
