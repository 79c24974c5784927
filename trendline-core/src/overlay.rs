//! Map index-space line records onto candle timestamps for a renderer.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::data::Candle;
use crate::domain::{Line, LineKind};

/// Anchors mapped per line.
pub const MAX_ANCHORS_PER_SEGMENT: usize = 50;

/// One drawable segment in time/price space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: LineKind,
    pub color: String,
    pub t0: NaiveDateTime,
    pub t1: NaiveDateTime,
    pub y0: f64,
    pub y1: f64,
    pub anchors: Vec<(NaiveDateTime, f64)>,
}

/// Segments for every drawable line, in input order.
///
/// Lines whose window falls outside the candles or has `i1 <= i0` are
/// skipped. Endpoint and anchor prices are clamped into the series'
/// `[min low, max high]` range.
pub fn overlay_segments(candles: &[Candle], lines: &[Line]) -> Vec<Segment> {
    let n = candles.len();
    let Some((y_min, y_max)) = price_range(candles) else {
        return Vec::new();
    };
    let clamp = |y: f64| y.clamp(y_min, y_max);

    lines
        .iter()
        .filter(|line| line.i0 < n && line.i1 < n && line.i1 > line.i0)
        .map(|line| Segment {
            kind: line.kind,
            color: line
                .color
                .clone()
                .unwrap_or_else(|| line.kind.default_color().to_string()),
            t0: candles[line.i0].time,
            t1: candles[line.i1].time,
            y0: clamp(line.price_at(line.i0)),
            y1: clamp(line.price_at(line.i1)),
            anchors: line
                .anchors
                .iter()
                .take(MAX_ANCHORS_PER_SEGMENT)
                .filter(|&&(k, _)| k < n)
                .map(|&(k, y)| (candles[k].time, clamp(y)))
                .collect(),
        })
        .collect()
}

fn price_range(candles: &[Candle]) -> Option<(f64, f64)> {
    if candles.is_empty() {
        return None;
    }
    let lo = candles.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
    let hi = candles.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
    (lo <= hi).then_some((lo, hi))
}
