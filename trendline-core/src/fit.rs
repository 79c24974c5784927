//! Two-point line fitting and tolerance-based anchor matching.
//!
//! Anchor test for a bar `k` with actual price `p` and predicted `y = slope*k + intercept`:
//!
//! ```text
//! |p - y| / max(|y|, 1e-12) <= tol
//! ```
//!
//! Bars without a pivot are masked as NaN and never match.

use crate::domain::{Anchor, PivotSet};

/// Floor for relative-change denominators (anchor matching and zigzag).
pub const MIN_DENOMINATOR: f64 = 1e-12;

/// Closed-form line through `(i0, y0)` and `(i1, y1)` as `(slope, intercept)`.
///
/// A degenerate pair (`i0 == i1`) yields a flat line through `y0`.
pub fn fit_line(i0: usize, y0: f64, i1: usize, y1: f64) -> (f64, f64) {
    if i0 == i1 {
        return (0.0, y0);
    }
    let slope = (y1 - y0) / (i1 as f64 - i0 as f64);
    (slope, y0 - slope * i0 as f64)
}

/// Relative deviation of `actual` from `predicted`.
pub fn relative_deviation(actual: f64, predicted: f64) -> f64 {
    (actual - predicted).abs() / predicted.abs().max(MIN_DENOMINATOR)
}

fn is_anchor(actual: f64, predicted: f64, tol: f64) -> bool {
    let rel = relative_deviation(actual, predicted);
    rel.is_finite() && rel <= tol
}

/// Dense series of length `n` holding pivot prices at pivot indices and NaN elsewhere.
pub fn masked_series(n: usize, pivots: &PivotSet) -> Vec<f64> {
    let mut out = vec![f64::NAN; n];
    for p in pivots.iter() {
        if let Some(slot) = out.get_mut(p.index) {
            *slot = p.price;
        }
    }
    out
}

/// Bar indices of `masked_prices` within `tol` of the line.
///
/// Evaluates every bar; NaN (non-pivot) bars are skipped.
pub fn anchors_for_line(slope: f64, intercept: f64, masked_prices: &[f64], tol: f64) -> Vec<usize> {
    masked_prices
        .iter()
        .enumerate()
        .filter(|&(k, &price)| is_anchor(price, slope * k as f64 + intercept, tol))
        .map(|(k, _)| k)
        .collect()
}

/// Pivots of `pivots` within `tol` of the line, in index order.
///
/// Same result as [`anchors_for_line`] over [`masked_series`], without
/// materializing the dense series.
pub fn pivot_anchors(slope: f64, intercept: f64, pivots: &PivotSet, tol: f64) -> Vec<Anchor> {
    pivots
        .iter()
        .filter(|p| is_anchor(p.price, slope * p.index as f64 + intercept, tol))
        .map(|p| (p.index, p.price))
        .collect()
}

/// Number of pivots within `tol` of the line.
pub fn count_anchors(slope: f64, intercept: f64, pivots: &PivotSet, tol: f64) -> usize {
    pivots
        .iter()
        .filter(|p| is_anchor(p.price, slope * p.index as f64 + intercept, tol))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Side;

    #[test]
    fn fit_line_through_two_lows() {
        let (m, b) = fit_line(10, 100.0, 40, 130.0);
        assert_eq!(m, 1.0);
        assert_eq!(b, 90.0);
        assert_eq!(m * 10.0 + b, 100.0);
        assert_eq!(m * 40.0 + b, 130.0);
    }

    #[test]
    fn fit_line_degenerate_pair_is_flat() {
        assert_eq!(fit_line(7, 42.0, 7, 99.0), (0.0, 42.0));
    }

    #[test]
    fn fit_line_handles_descending_indices() {
        let (m, b) = fit_line(40, 130.0, 10, 100.0);
        assert!((m - 1.0).abs() < 1e-12);
        assert!((b - 90.0).abs() < 1e-9);
    }

    #[test]
    fn anchor_within_tolerance_is_accepted() {
        let mut masked = vec![f64::NAN; 10];
        masked[3] = 50.4;
        masked[6] = 51.0;
        let hits = anchors_for_line(0.0, 50.0, &masked, 0.01);
        assert_eq!(hits, vec![3]);
        assert!((relative_deviation(50.4, 50.0) - 0.008).abs() < 1e-12);
        assert!((relative_deviation(51.0, 50.0) - 0.02).abs() < 1e-12);
    }

    #[test]
    fn nan_price_is_never_an_anchor() {
        assert!(is_anchor(50.0, 50.0, 0.0));
        assert!(!is_anchor(f64::NAN, 50.0, 1.0));
        assert!(!is_anchor(50.0, f64::INFINITY, 1.0));
    }

    #[test]
    fn zero_prediction_uses_floor() {
        assert_eq!(relative_deviation(0.0, 0.0), 0.0);
        assert!(relative_deviation(1.0, 0.0) > 1e9);
    }

    #[test]
    fn sparse_and_dense_matching_agree() {
        let series = [10.0, 10.5, 10.1, 11.0, 10.2, 10.0, 12.0, 10.05];
        let set = PivotSet::from_indices(Side::Low, &[0, 2, 4, 5, 7], &series);
        let masked = masked_series(series.len(), &set);
        let dense = anchors_for_line(0.0, 10.0, &masked, 0.012);
        let sparse: Vec<usize> = pivot_anchors(0.0, 10.0, &set, 0.012)
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(dense, sparse);
        assert_eq!(dense, vec![0, 2, 5, 7]);
        assert_eq!(count_anchors(0.0, 10.0, &set, 0.012), 4);
    }
}
