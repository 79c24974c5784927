//! Deterministic synthetic high/low series for demos, tests and benchmarks.
//!
//! Results computed on synthetic data say nothing about a real market; they
//! only exercise the detector on shapes with known answers.

/// Broadening formation: flat bars (high 100, low 99) with single-bar high
/// spikes every 15 bars from bar 10 rising along `105 + 2/15 * (i - 10)`, and
/// single-bar low troughs every 15 bars from bar 17 falling along
/// `95 - 0.1 * (i - 17)`.
///
/// Every spike lies on one resistance line and every trough on one support
/// line; each new extreme clears the previous one by more than 1%.
pub fn broadening_spikes(n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut highs = vec![100.0; n];
    let mut lows = vec![99.0; n];
    let last = n.saturating_sub(3);
    for i in (10..last).step_by(15) {
        highs[i] = 105.0 + 2.0 * (i - 10) as f64 / 15.0;
    }
    for i in (17..last).step_by(15) {
        lows[i] = 95.0 - 0.1 * (i - 17) as f64;
    }
    (highs, lows)
}

/// Smooth oscillation around `base`: `high = mid + spread`, `low = mid - spread`
/// with `mid = base + amplitude * sin(2π i / period)`.
pub fn sine_wave(n: usize, base: f64, amplitude: f64, period: f64, spread: f64) -> (Vec<f64>, Vec<f64>) {
    let step = std::f64::consts::TAU / period.max(1.0);
    (0..n)
        .map(|i| {
            let mid = base + amplitude * (i as f64 * step).sin();
            (mid + spread, mid - spread)
        })
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadening_spikes_respect_high_low_order() {
        let (highs, lows) = broadening_spikes(200);
        assert!(highs.iter().zip(&lows).all(|(h, l)| h >= l));
        assert_eq!(highs[10], 105.0);
        assert_eq!(highs[25], 107.0);
        assert_eq!(lows[17], 95.0);
        assert!((lows[32] - 93.5).abs() < 1e-12);
    }

    #[test]
    fn broadening_spikes_tolerates_tiny_lengths() {
        let (highs, lows) = broadening_spikes(2);
        assert_eq!(highs.len(), 2);
        assert_eq!(lows.len(), 2);
    }

    #[test]
    fn sine_wave_has_requested_spread() {
        let (highs, lows) = sine_wave(50, 100.0, 5.0, 20.0, 0.5);
        assert!(highs.iter().zip(&lows).all(|(h, l)| (h - l - 1.0).abs() < 1e-12));
    }
}
