//! Manually drawn line, specified by two timestamps and the side to snap to.

use serde::{Deserialize, Serialize};

use super::ManualError;
use crate::data::{nearest_index, parse_timestamp, Candle};
use crate::domain::{Line, LineKind, Side};

pub const DEFAULT_MANUAL_COLOR: &str = "#93c5fd";

fn default_kind() -> LineKind {
    LineKind::Support
}

fn default_side() -> Side {
    Side::Low
}

fn default_color() -> String {
    DEFAULT_MANUAL_COLOR.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualLineSpec {
    #[serde(rename = "type", default = "default_kind")]
    pub kind: LineKind,
    /// Price array the endpoints snap to.
    #[serde(default = "default_side")]
    pub side: Side,
    pub from: String,
    pub to: String,
    #[serde(default = "default_color")]
    pub color: String,
}

impl ManualLineSpec {
    pub fn new(kind: LineKind, side: Side, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            kind,
            side,
            from: from.into(),
            to: to.into(),
            color: default_color(),
        }
    }

    /// Snap both timestamps to their nearest candles and fit a line through
    /// the chosen side's prices there.
    ///
    /// Endpoints are swapped when `to` lands on or before `from`. Coinciding
    /// endpoints produce a flat line (`dx` floored at one bar).
    pub fn resolve(&self, candles: &[Candle]) -> Result<Line, ManualError> {
        let from = parse_timestamp(&self.from).ok_or_else(|| ManualError::Timestamp(self.from.clone()))?;
        let to = parse_timestamp(&self.to).ok_or_else(|| ManualError::Timestamp(self.to.clone()))?;
        let mut i0 = nearest_index(candles, from).ok_or(ManualError::NoCandles)?;
        let mut i1 = nearest_index(candles, to).ok_or(ManualError::NoCandles)?;
        if i1 <= i0 {
            std::mem::swap(&mut i0, &mut i1);
        }

        let price = |i: usize| match self.side {
            Side::High => candles[i].high,
            Side::Low => candles[i].low,
        };
        let (y0, y1) = (price(i0), price(i1));
        let dx = (i1 - i0).max(1) as f64;
        let slope = (y1 - y0) / dx;
        let intercept = y0 - slope * i0 as f64;

        Ok(Line::new(self.kind, slope, intercept, i0, i1, Vec::new()).with_color(self.color.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn hourly(n: usize) -> Vec<Candle> {
        let start = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        (0..n)
            .map(|i| Candle {
                time: start + chrono::Duration::hours(i as i64),
                open: 100.0,
                high: 110.0 + i as f64,
                low: 90.0 + 2.0 * i as f64,
                close: 100.0,
                volume: 0.0,
            })
            .collect()
    }

    #[test]
    fn resolves_low_side_between_nearest_candles() {
        let spec = ManualLineSpec::new(LineKind::Support, Side::Low, "2025-08-01T02:10", "2025-08-01T07:50");
        let line = spec.resolve(&hourly(12)).unwrap();
        assert_eq!((line.i0, line.i1), (2, 8));
        assert_eq!(line.price_at(2), 94.0);
        assert_eq!(line.price_at(8), 106.0);
        assert_eq!(line.color.as_deref(), Some(DEFAULT_MANUAL_COLOR));
        assert!(line.anchors.is_empty());
    }

    #[test]
    fn reversed_endpoints_are_swapped() {
        let spec = ManualLineSpec::new(LineKind::Resistance, Side::High, "2025-08-01T09:00", "2025-08-01T01:00");
        let line = spec.resolve(&hourly(12)).unwrap();
        assert_eq!((line.i0, line.i1), (1, 9));
        assert_eq!(line.slope, 1.0);
    }

    #[test]
    fn coinciding_endpoints_give_flat_line() {
        let spec = ManualLineSpec::new(LineKind::Support, Side::High, "2025-08-01T03:00", "2025-08-01T03:00");
        let line = spec.resolve(&hourly(6)).unwrap();
        assert_eq!(line.slope, 0.0);
        assert_eq!(line.intercept, 113.0);
    }

    #[test]
    fn bad_timestamp_and_empty_candles_fail() {
        let spec = ManualLineSpec::new(LineKind::Support, Side::Low, "later", "2025-08-01");
        assert!(matches!(spec.resolve(&hourly(3)), Err(ManualError::Timestamp(_))));
        let spec = ManualLineSpec::new(LineKind::Support, Side::Low, "2025-08-01", "2025-08-02");
        assert!(matches!(spec.resolve(&[]), Err(ManualError::NoCandles)));
    }

    #[test]
    fn json_defaults_fill_missing_fields() {
        let spec: ManualLineSpec =
            serde_json::from_str(r#"{"from": "2025-08-01", "to": "2025-08-02"}"#).unwrap();
        assert_eq!(spec.kind, LineKind::Support);
        assert_eq!(spec.side, Side::Low);
        assert_eq!(spec.color, DEFAULT_MANUAL_COLOR);
    }
}
