//! Axis limits and tick placement.

/// Fraction of the data range added on each side by [`autoscale`].
pub const AUTOSCALE_MARGIN: f64 = 0.05;

/// Pad `[lo, hi]` by [`AUTOSCALE_MARGIN`] on each side.
///
/// A degenerate range is widened so the axis never collapses.
pub fn autoscale(lo: f64, hi: f64) -> (f64, f64) {
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if hi - lo <= f64::EPSILON * lo.abs().max(hi.abs()).max(1.0) {
        let pad = if lo == 0.0 { 1.0 } else { lo.abs() * AUTOSCALE_MARGIN };
        return (lo - pad, hi + pad);
    }
    let pad = (hi - lo) * AUTOSCALE_MARGIN;
    (lo - pad, hi + pad)
}

/// Step from the 1-2-2.5-5-10 ladder giving at most `max_ticks` intervals
/// over `span`.
pub fn nice_step(span: f64, max_ticks: usize) -> f64 {
    let raw = span.abs() / max_ticks.max(1) as f64;
    if raw <= 0.0 || !raw.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    for m in [1.0, 2.0, 2.5, 5.0, 10.0] {
        let step = m * magnitude;
        if step >= raw * (1.0 - 1e-9) {
            return step;
        }
    }
    10.0 * magnitude
}

/// Ticks on multiples of a nice step, starting at or below `lo` and ending
/// at or above `hi`.
///
/// The first and last ticks may fall outside `[lo, hi]`, so `ticks[1]` and
/// `ticks[len - 2]` are the outermost ticks guaranteed to lie inside the
/// view whenever the range spans at least two steps.
pub fn nice_ticks(lo: f64, hi: f64, max_ticks: usize) -> Vec<f64> {
    if !lo.is_finite() || !hi.is_finite() {
        return Vec::new();
    }
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    if hi == lo {
        return vec![lo];
    }
    let step = nice_step(hi - lo, max_ticks);
    let scale = 10f64.powi(step_decimals(step) as i32);
    let first = (lo / step - 1e-9).floor() as i64;
    let last = (hi / step + 1e-9).ceil() as i64;
    (first..=last)
        .map(|k| {
            // Snap away representation noise such as 0.30000000000000004.
            let t = (k as f64 * step * scale).round() / scale;
            if t == 0.0 {
                0.0
            } else {
                t
            }
        })
        .collect()
}

/// Decimal places needed to print multiples of `step` exactly.
fn step_decimals(step: f64) -> usize {
    (0..=6)
        .find(|&d| {
            let s = step * 10f64.powi(d);
            (s - s.round()).abs() < 1e-6
        })
        .unwrap_or(6) as usize
}

/// Short label for a tick value.
pub fn format_tick(value: f64, step: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let decimals = step_decimals(step);
    format!("{value:.decimals$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn autoscale_pads_five_percent() {
        let (lo, hi) = autoscale(0.0, 10.0);
        assert!((lo + 0.5).abs() < 1e-12);
        assert!((hi - 10.5).abs() < 1e-12);
    }

    #[test]
    fn autoscale_widens_degenerate_ranges() {
        assert_eq!(autoscale(0.0, 0.0), (-1.0, 1.0));
        let (lo, hi) = autoscale(2.0, 2.0);
        assert!(lo < 2.0 && hi > 2.0);
        assert_eq!(autoscale(f64::NAN, 1.0), (0.0, 1.0));
    }

    #[test]
    fn step_ladder() {
        assert_eq!(nice_step(10.0, 10), 1.0);
        assert_eq!(nice_step(3.0, 8), 0.5);
        assert_eq!(nice_step(9.0, 4), 2.5);
        assert_eq!(nice_step(0.0, 4), 1.0);
    }

    #[test]
    fn ticks_bracket_the_range() {
        let ticks = nice_ticks(-1.3, 1.7, 6);
        assert_eq!(ticks, vec![-1.5, -1.0, -0.5, 0.0, 0.5, 1.0, 1.5, 2.0]);
        assert!(ticks[0] <= -1.3);
        assert!(*ticks.last().unwrap() >= 1.7);
    }

    #[test]
    fn inner_ticks_lie_within_view() {
        let ticks = nice_ticks(-1.5, 1.5, 6);
        let n = ticks.len();
        assert!(n >= 3);
        assert!(ticks[1] >= -1.5 && ticks[n - 2] <= 1.5);
    }

    #[test]
    fn ticks_are_snapped() {
        let ticks = nice_ticks(0.0, 0.9, 9);
        assert!(ticks.contains(&0.3));
    }

    #[test]
    fn formatting_follows_step_precision() {
        assert_eq!(format_tick(2.0, 1.0), "2");
        assert_eq!(format_tick(0.5, 0.5), "0.5");
        assert_eq!(format_tick(0.25, 0.25), "0.25");
        assert_eq!(format_tick(0.0, 0.1), "0");
    }
}
