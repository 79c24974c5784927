//! Channel synthesis: the best parallel counterpart of a trend line on the
//! opposite side.
//!
//! With the slope fixed, each opposite pivot implies one intercept
//! (`price - slope * index`). The intercept collecting the most anchors among
//! the opposite pivots wins; the first such pivot wins ties.

use crate::domain::{Line, LineKind, PivotSet, Side};
use crate::fit::count_anchors;

/// Intercept of the parallel line with the most anchor hits, or `None` when
/// `opposite` is empty.
pub fn best_parallel_intercept(opposite: &PivotSet, slope: f64, tol: f64) -> Option<f64> {
    let mut best: Option<(usize, f64)> = None;
    for p in opposite.iter() {
        let intercept = p.price - slope * p.index as f64;
        let hits = count_anchors(slope, intercept, opposite, tol);
        if best.map_or(true, |(best_hits, _)| hits > best_hits) {
            best = Some((hits, intercept));
        }
    }
    best.map(|(_, intercept)| intercept)
}

/// Channel pair built from `trend` and the best parallel line through `opposite`.
///
/// Returns the trend line's own member first, then the synthesized one. Both
/// members share the trend line's slope and window and carry no anchors.
pub fn channel_from(trend: &Line, opposite: &PivotSet, tol: f64) -> Option<[Line; 2]> {
    let intercept = best_parallel_intercept(opposite, trend.slope, tol)?;
    let (own_kind, other_kind) = match opposite.side().opposite() {
        Side::High => (LineKind::ChannelUpper, LineKind::ChannelLower),
        Side::Low => (LineKind::ChannelLower, LineKind::ChannelUpper),
    };
    Some([
        Line::new(own_kind, trend.slope, trend.intercept, trend.i0, trend.i1, Vec::new()),
        Line::new(other_kind, trend.slope, intercept, trend.i0, trend.i1, Vec::new()),
    ])
}

/// Both channel passes: top resistance against lows, then top support against highs.
pub fn channels(
    top_upper: Option<&Line>,
    top_lower: Option<&Line>,
    high_pivots: &PivotSet,
    low_pivots: &PivotSet,
    tol: f64,
) -> Vec<Line> {
    let mut out = Vec::new();
    if let Some(pair) = top_upper.and_then(|upper| channel_from(upper, low_pivots, tol)) {
        out.extend(pair);
    }
    if let Some(pair) = top_lower.and_then(|lower| channel_from(lower, high_pivots, tol)) {
        out.extend(pair);
    }
    out
}
