//! Pivot extraction.
//!
//! A pivot must pass both filters: it is a swing extremum of its window AND a
//! zigzag turning point at the configured deviation. Either filter alone lets
//! through noise the other rejects.

pub mod swing;
pub mod zigzag;

pub use swing::swing_extrema;
pub use zigzag::zigzag;

use crate::domain::{PivotSet, Side};

/// Filtered pivots for both sides of the series.
#[derive(Debug, Clone, PartialEq)]
pub struct Pivots {
    pub highs: PivotSet,
    pub lows: PivotSet,
}

impl Pivots {
    pub fn side(&self, side: Side) -> &PivotSet {
        match side {
            Side::High => &self.highs,
            Side::Low => &self.lows,
        }
    }
}

/// Intersect swing extrema with zigzag indices, per side.
pub fn extract_pivots(highs: &[f64], lows: &[f64], swing_window: usize, zz_dev: f64) -> Pivots {
    let (swing_hi, swing_lo) = swing_extrema(highs, lows, swing_window);
    let hi_idx = intersect_sorted(&swing_hi, &zigzag(highs, zz_dev));
    let lo_idx = intersect_sorted(&swing_lo, &zigzag(lows, zz_dev));

    Pivots {
        highs: PivotSet::from_indices(Side::High, &hi_idx, highs),
        lows: PivotSet::from_indices(Side::Low, &lo_idx, lows),
    }
}

/// Merge-walk intersection of two ascending index lists.
fn intersect_sorted(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}
