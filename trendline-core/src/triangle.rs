//! Triangle pairing: upper/lower trend lines clipped to their shared window.
//!
//! A pair qualifies when the overlap `[max(i0), min(i1)]` spans at least
//! [`MIN_OVERLAP`] bars and the slopes differ by more than [`SLOPE_EPSILON`].
//! Converging, diverging and same-direction pairs all qualify.

use crate::domain::{Line, LineKind};

/// Minimum overlap length in bars.
pub const MIN_OVERLAP: usize = 10;

/// Slopes closer than this are treated as parallel.
pub const SLOPE_EPSILON: f64 = 1e-9;

/// Shared window of two lines, if it spans at least [`MIN_OVERLAP`] bars.
pub fn overlap_window(a: &Line, b: &Line) -> Option<(usize, usize)> {
    let left = a.i0.max(b.i0);
    let right = a.i1.min(b.i1);
    (right >= left && right - left >= MIN_OVERLAP).then_some((left, right))
}

/// Triangle lines for every qualifying (upper, lower) combination, upper first.
///
/// Each member keeps its source line's slope, intercept and anchors.
pub fn triangles(uppers: &[Line], lowers: &[Line]) -> Vec<Line> {
    let mut out = Vec::new();
    for upper in uppers {
        for lower in lowers {
            let Some((left, right)) = overlap_window(upper, lower) else {
                continue;
            };
            if (upper.slope - lower.slope).abs() <= SLOPE_EPSILON {
                continue;
            }
            out.push(clipped(upper, LineKind::TriangleUpper, left, right));
            out.push(clipped(lower, LineKind::TriangleLower, left, right));
        }
    }
    out
}

fn clipped(source: &Line, kind: LineKind, i0: usize, i1: usize) -> Line {
    Line::new(kind, source.slope, source.intercept, i0, i1, source.anchors.clone())
}
