//! Trend-line search over one side's pivots.
//!
//! Every pivot pair `(a, b)` with at least one pivot between them and an
//! endpoint span of `min_span` bars or more is fitted, matched against the
//! side's full pivot set, and kept when it collects `min_anchors` anchors.
//! Survivors are ranked by descending `(score, span)`; equal keys keep their
//! enumeration order.
//!
//! Cost is O(P²) pairs times O(P) matching, with P the pivot count.

use std::cmp::Ordering;

use crate::domain::{Line, LineKind, PivotSet, Side};
use crate::fit::{fit_line, pivot_anchors};

/// Thresholds a candidate must meet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchParams {
    pub tolerance: f64,
    pub min_anchors: usize,
    pub min_span: usize,
}

/// Trend-line kind produced for a side.
pub fn trend_kind(side: Side) -> LineKind {
    match side {
        Side::High => LineKind::Resistance,
        Side::Low => LineKind::Support,
    }
}

/// Ranked trend lines through `pivots`. Fewer than three pivots yields nothing.
pub fn trend_lines(pivots: &PivotSet, params: &SearchParams) -> Vec<Line> {
    let count = pivots.len();
    let mut results = Vec::new();
    if count < 3 {
        return results;
    }

    let idx = pivots.indices();
    let vals = pivots.prices();
    let kind = trend_kind(pivots.side());

    for a in 0..count - 2 {
        for b in a + 2..count {
            let (i0, i1) = (idx[a], idx[b]);
            // Span prune before fitting.
            if i1 - i0 < params.min_span {
                continue;
            }
            let (slope, intercept) = fit_line(i0, vals[a], i1, vals[b]);
            let anchors = pivot_anchors(slope, intercept, pivots, params.tolerance);
            if anchors.len() < params.min_anchors {
                continue;
            }
            results.push(Line::new(kind, slope, intercept, i0, i1, anchors));
        }
    }

    log::debug!(
        "{} side: {} pivots, {} candidate lines",
        pivots.side(),
        count,
        results.len()
    );

    results.sort_by(rank_descending);
    results
}

/// Ordering for `sort_by`: higher score first, then longer span.
fn rank_descending(x: &Line, y: &Line) -> Ordering {
    y.score()
        .total_cmp(&x.score())
        .then_with(|| y.span().cmp(&x.span()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(tolerance: f64, min_anchors: usize, min_span: usize) -> SearchParams {
        SearchParams {
            tolerance,
            min_anchors,
            min_span,
        }
    }

    fn flat_lows() -> PivotSet {
        // Three touches of 100 plus one outlier.
        let mut series = vec![150.0; 60];
        series[5] = 100.0;
        series[20] = 100.5;
        series[35] = 120.0;
        series[50] = 100.2;
        PivotSet::from_indices(Side::Low, &[5, 20, 35, 50], &series)
    }

    #[test]
    fn fewer_than_three_pivots_yields_nothing() {
        let set = PivotSet::from_indices(Side::High, &[0, 49], &[1.0; 50]);
        assert!(trend_lines(&set, &params(0.5, 1, 0)).is_empty());
    }

    #[test]
    fn finds_flat_support_through_three_touches() {
        let lines = trend_lines(&flat_lows(), &params(0.01, 3, 20));
        assert!(!lines.is_empty());
        let best = &lines[0];
        assert_eq!(best.kind, LineKind::Support);
        assert_eq!((best.i0, best.i1), (5, 50));
        assert_eq!(best.anchor_count(), 3);
        assert!(best.anchors.iter().all(|&(k, _)| k != 35));
    }

    #[test]
    fn adjacent_pivots_are_never_endpoints() {
        for line in trend_lines(&flat_lows(), &params(1.0, 1, 0)) {
            let a = flat_lows().indices().iter().position(|&i| i == line.i0).unwrap();
            let b = flat_lows().indices().iter().position(|&i| i == line.i1).unwrap();
            assert!(b >= a + 2);
        }
    }

    #[test]
    fn min_span_filters_short_pairs() {
        let lines = trend_lines(&flat_lows(), &params(1.0, 1, 40));
        assert!(lines.iter().all(|l| l.span() >= 40));
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn min_anchors_filters_weak_lines() {
        assert!(trend_lines(&flat_lows(), &params(0.01, 4, 0)).is_empty());
    }

    #[test]
    fn results_are_ranked_by_score_then_span() {
        let lines = trend_lines(&flat_lows(), &params(1.0, 1, 0));
        for pair in lines.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(a.score() > b.score() || (a.score() == b.score() && a.span() >= b.span()));
        }
    }

    #[test]
    fn high_side_produces_resistance() {
        let mut series = vec![50.0; 40];
        for &i in &[4, 14, 24, 34] {
            series[i] = 60.0;
        }
        let set = PivotSet::from_indices(Side::High, &[4, 14, 24, 34], &series);
        let lines = trend_lines(&set, &params(0.001, 3, 10));
        assert!(lines.iter().all(|l| l.kind == LineKind::Resistance));
        assert_eq!(lines[0].anchor_count(), 4);
        assert_eq!((lines[0].i0, lines[0].i1), (4, 34));
    }
}
