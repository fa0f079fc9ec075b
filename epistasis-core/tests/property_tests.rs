//! Property tests for core invariants.
//!
//! Uses proptest to verify:
//! 1. p-values are probabilities and shrink as |z| grows
//! 2. F-distribution ppf inverts cdf
//! 3. Ticks bracket the range on a uniform step
//! 4. Format strings never panic and color parsing round-trips

use epistasis_core::color::Color;
use epistasis_core::figure::{nice_ticks, Style};
use epistasis_core::stats::{two_sided_p, Distribution, FDistribution};
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_z() -> impl Strategy<Value = f64> {
    -20.0..20.0_f64
}

fn arb_dof() -> impl Strategy<Value = f64> {
    (1u32..60).prop_map(f64::from)
}

fn arb_range() -> impl Strategy<Value = (f64, f64)> {
    (-1e4..1e4_f64, 1e-3..1e4_f64).prop_map(|(lo, span)| (lo, lo + span))
}

fn arb_color() -> impl Strategy<Value = Color> {
    (any::<u8>(), any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b, a)| Color::rgba(r, g, b, a))
}

// ── 1. p-values ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn p_values_are_probabilities(z in arb_z()) {
        let p = two_sided_p(z);
        prop_assert!(p > 0.0);
        prop_assert!(p <= 1.0 + 1e-12);
    }

    #[test]
    fn p_values_shrink_with_magnitude(a in 0.0..8.0_f64, delta in 0.01..4.0_f64) {
        prop_assert!(two_sided_p(a + delta) <= two_sided_p(a));
    }

    #[test]
    fn p_values_are_symmetric(z in arb_z()) {
        prop_assert!((two_sided_p(z) - two_sided_p(-z)).abs() < 1e-15);
    }
}

// ── 2. F distribution ────────────────────────────────────────────────

proptest! {
    #[test]
    fn f_ppf_inverts_cdf(dfn in arb_dof(), dfd in arb_dof(), q in 0.01..0.99_f64) {
        let f = FDistribution::new(dfn, dfd);
        let x = f.ppf(q);
        prop_assert!(x > 0.0);
        prop_assert!((f.cdf(x) - q).abs() < 1e-6);
    }

    #[test]
    fn f_cdf_is_monotone(dfn in arb_dof(), dfd in arb_dof(), x in 0.01..20.0_f64, dx in 0.01..5.0_f64) {
        let f = FDistribution::new(dfn, dfd);
        prop_assert!(f.cdf(x + dx) >= f.cdf(x) - 1e-12);
    }
}

// ── 3. Ticks ─────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn ticks_bracket_range((lo, hi) in arb_range(), max_ticks in 2usize..12) {
        let ticks = nice_ticks(lo, hi, max_ticks);
        prop_assert!(ticks.len() >= 2);
        prop_assert!(ticks[0] <= lo + 1e-9 * lo.abs().max(1.0));
        prop_assert!(*ticks.last().unwrap() >= hi - 1e-9 * hi.abs().max(1.0));
        let step = ticks[1] - ticks[0];
        for w in ticks.windows(2) {
            prop_assert!(((w[1] - w[0]) - step).abs() <= 1e-6 * step.abs().max(1.0));
        }
    }
}

// ── 4. Styles and colors ─────────────────────────────────────────────

proptest! {
    #[test]
    fn format_strings_never_panic(fmt in "[bgrcmykw.os^x+*:-]{0,4}") {
        let _ = Style::from_fmt(&fmt);
    }

    #[test]
    fn colors_roundtrip_through_display(c in arb_color()) {
        let parsed: Color = c.to_string().parse().unwrap();
        prop_assert_eq!(parsed, c);
    }
}
