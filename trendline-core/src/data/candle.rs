//! Candle: one OHLCV bar with its timestamp.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Smallest gap left between low and high when repairing a bar.
pub const HIGH_LOW_EPSILON: f64 = 1e-8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Lift every `high` that does not exceed its `low` to `low + 1e-8`.
///
/// Returns how many candles were changed. The detector rejects `high < low`,
/// so callers repair before detecting.
pub fn repair_high_low(candles: &mut [Candle]) -> usize {
    let mut repaired = 0;
    for candle in candles.iter_mut() {
        if candle.low >= candle.high {
            candle.high = candle.low + HIGH_LOW_EPSILON;
            repaired += 1;
        }
    }
    if repaired > 0 {
        log::warn!("repaired {repaired} candles with low >= high");
    }
    repaired
}

/// Split candles into the detector's `(highs, lows)` arrays.
pub fn high_low_series(candles: &[Candle]) -> (Vec<f64>, Vec<f64>) {
    candles.iter().map(|c| (c.high, c.low)).unzip()
}

/// Parse a timestamp in any of the accepted forms:
/// epoch milliseconds, RFC 3339, `YYYY-MM-DD[ T]HH:MM[:SS]`, or `YYYY-MM-DD`.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if let Ok(ms) = s.parse::<i64>() {
        return DateTime::from_timestamp_millis(ms).map(|dt| dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Index of the candle whose time is closest to `time`; earliest wins ties.
pub fn nearest_index(candles: &[Candle], time: NaiveDateTime) -> Option<usize> {
    candles
        .iter()
        .enumerate()
        .min_by_key(|(_, c)| (c.time - time).num_milliseconds().unsigned_abs())
        .map(|(i, _)| i)
}
