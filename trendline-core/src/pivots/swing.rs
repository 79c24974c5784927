//! Swing extrema: bars that are the highest high (or lowest low) of the
//! symmetric window of `w` bars on each side.
//!
//! Ties count as extrema (`>=` / `<=`). Bars within `w` of either end of the
//! series are never reported.

/// High-side and low-side swing indices, each ascending.
pub fn swing_extrema(highs: &[f64], lows: &[f64], w: usize) -> (Vec<usize>, Vec<usize>) {
    let n = highs.len().min(lows.len());
    let mut hi_idx = Vec::new();
    let mut lo_idx = Vec::new();
    if w == 0 || n <= w.saturating_mul(2) {
        return (hi_idx, lo_idx);
    }

    for i in w..n - w {
        if is_window_extreme(highs, i, w, |center, other| center >= other) {
            hi_idx.push(i);
        }
        if is_window_extreme(lows, i, w, |center, other| center <= other) {
            lo_idx.push(i);
        }
    }
    (hi_idx, lo_idx)
}

fn is_window_extreme(series: &[f64], i: usize, w: usize, beats: impl Fn(f64, f64) -> bool) -> bool {
    let center = series[i];
    series[i - w..i].iter().all(|&v| beats(center, v))
        && series[i + 1..=i + w].iter().all(|&v| beats(center, v))
}
