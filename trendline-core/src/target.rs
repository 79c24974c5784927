//! Target projection: the dominant trend's slope carried through the most
//! recent opposite-side pivot.

use crate::domain::{Line, LineKind, PivotSet};

/// At most one target line.
///
/// Prefers the top resistance projected from the latest low pivot; otherwise
/// the top support projected from the latest high pivot. The target keeps
/// the source trend line's window and carries no anchors.
pub fn project_target(
    top_upper: Option<&Line>,
    top_lower: Option<&Line>,
    high_pivots: &PivotSet,
    low_pivots: &PivotSet,
) -> Option<Line> {
    let (trend, through) = match (top_upper, top_lower) {
        (Some(upper), _) if !low_pivots.is_empty() => (upper, low_pivots.last()?),
        (_, Some(lower)) if !high_pivots.is_empty() => (lower, high_pivots.last()?),
        _ => return None,
    };
    let intercept = through.price - trend.slope * through.index as f64;
    Some(Line::new(
        LineKind::Target,
        trend.slope,
        intercept,
        trend.i0,
        trend.i1,
        Vec::new(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Side;

    fn pivots(side: Side, points: &[(usize, f64)]) -> PivotSet {
        let n = points.iter().map(|p| p.0).max().unwrap_or(0) + 1;
        let mut series = vec![0.0; n];
        let idx: Vec<usize> = points
            .iter()
            .map(|&(i, p)| {
                series[i] = p;
                i
            })
            .collect();
        PivotSet::from_indices(side, &idx, &series)
    }

    #[test]
    fn projects_upper_slope_through_latest_low() {
        let upper = Line::new(LineKind::Resistance, 0.5, 100.0, 5, 45, vec![]);
        let lows = pivots(Side::Low, &[(10, 90.0), (30, 95.0)]);
        let target = project_target(Some(&upper), None, &PivotSet::empty(Side::High), &lows).unwrap();
        assert_eq!(target.kind, LineKind::Target);
        assert_eq!(target.slope, 0.5);
        assert_eq!(target.price_at(30), 95.0);
        assert_eq!((target.i0, target.i1), (5, 45));
    }

    #[test]
    fn upper_without_lows_uses_lower_trend() {
        let upper = Line::new(LineKind::Resistance, 0.5, 100.0, 5, 45, vec![]);
        let lower = Line::new(LineKind::Support, -0.2, 80.0, 5, 45, vec![]);
        let highs = pivots(Side::High, &[(12, 110.0)]);
        let lows = PivotSet::empty(Side::Low);
        let target = project_target(Some(&upper), Some(&lower), &highs, &lows).unwrap();
        assert_eq!(target.slope, -0.2);
        assert!(project_target(Some(&upper), None, &highs, &lows).is_none());
    }

    #[test]
    fn lower_trend_projects_through_latest_high() {
        let lower = Line::new(LineKind::Support, -0.2, 80.0, 5, 45, vec![]);
        let highs = pivots(Side::High, &[(12, 110.0), (40, 104.0)]);
        let target = project_target(None, Some(&lower), &highs, &PivotSet::empty(Side::Low)).unwrap();
        assert_eq!(target.slope, -0.2);
        assert!((target.price_at(40) - 104.0).abs() < 1e-9);
    }

    #[test]
    fn nothing_to_project() {
        let empty_hi = PivotSet::empty(Side::High);
        let empty_lo = PivotSet::empty(Side::Low);
        assert!(project_target(None, None, &empty_hi, &empty_lo).is_none());
    }
}
