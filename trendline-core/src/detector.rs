//! Orchestrator: pivots → per-side search → channels, triangles, target.
//!
//! Output order is fixed: resistances, supports, channel pairs, triangle
//! pairs, target. The `max_lines` budget gives `ceil(max_lines / 2)` slots to
//! resistances and `floor(max_lines / 2)` to supports; channels, triangles and
//! the target are derived from the truncated lists.
//!
//! The detector is a pure function of its inputs and holds no state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::channel::channels;
use crate::domain::{Line, LineSummary, Side};
use crate::pivots::extract_pivots;
use crate::search::{trend_lines, SearchParams};
use crate::target::project_target;
use crate::triangle::triangles;

/// Series shorter than this produce no lines.
pub const MIN_BARS: usize = 10;

pub const DEFAULT_MAX_LINES: usize = 5;
pub const DEFAULT_TOLERANCE: f64 = 0.01;
pub const DEFAULT_MIN_ANCHORS: usize = 3;
pub const DEFAULT_MIN_SPAN: usize = 20;
pub const DEFAULT_ZZ_DEV: f64 = 0.012;
pub const DEFAULT_SWING_WINDOW: usize = 3;

/// Input contract violations.
#[derive(Debug, Error, PartialEq)]
pub enum DetectError {
    #[error("highs and lows differ in length ({highs} vs {lows})")]
    LengthMismatch { highs: usize, lows: usize },

    #[error("non-finite {side} price {value} at bar {index}")]
    NonFinite { side: Side, index: usize, value: f64 },

    #[error("high {high} below low {low} at bar {index}")]
    InvertedBar { index: usize, high: f64, low: f64 },

    #[error("invalid parameters: {0}")]
    InvalidParams(String),
}

/// Detection thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectParams {
    /// Cap on trend lines, split between resistances and supports.
    pub max_lines: usize,
    /// Relative anchor-matching threshold.
    pub tolerance: f64,
    /// Anchors a trend line needs, endpoints included.
    pub min_anchors: usize,
    /// Minimum endpoint distance in bars.
    pub min_span: usize,
    /// Zigzag relative-deviation threshold.
    pub zz_dev: f64,
    /// Bars on each side of a swing extremum.
    pub swing_window: usize,
}

impl Default for DetectParams {
    fn default() -> Self {
        Self {
            max_lines: DEFAULT_MAX_LINES,
            tolerance: DEFAULT_TOLERANCE,
            min_anchors: DEFAULT_MIN_ANCHORS,
            min_span: DEFAULT_MIN_SPAN,
            zz_dev: DEFAULT_ZZ_DEV,
            swing_window: DEFAULT_SWING_WINDOW,
        }
    }
}

impl DetectParams {
    /// Soft thresholds for interactive use, where some lines should almost always appear.
    pub fn lenient() -> Self {
        Self {
            max_lines: 7,
            tolerance: 0.02,
            min_anchors: 2,
            min_span: 10,
            zz_dev: 0.008,
            swing_window: DEFAULT_SWING_WINDOW,
        }
    }

    pub fn validate(&self) -> Result<(), DetectError> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(DetectError::InvalidParams(format!(
                "tolerance must be finite and >= 0, got {}",
                self.tolerance
            )));
        }
        if !self.zz_dev.is_finite() || self.zz_dev < 0.0 {
            return Err(DetectError::InvalidParams(format!(
                "zz_dev must be finite and >= 0, got {}",
                self.zz_dev
            )));
        }
        if self.min_anchors == 0 {
            return Err(DetectError::InvalidParams("min_anchors must be >= 1".into()));
        }
        if self.swing_window == 0 {
            return Err(DetectError::InvalidParams("swing_window must be >= 1".into()));
        }
        Ok(())
    }

    /// Content hash of the parameters: BLAKE3 hex of their JSON encoding.
    ///
    /// Identical parameters always hash identically, so a result can be
    /// traced back to the thresholds that produced it.
    pub fn fingerprint(&self) -> String {
        // Numeric fields only; serde_json writes non-finite floats as null.
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }

    fn search(&self) -> SearchParams {
        SearchParams {
            tolerance: self.tolerance,
            min_anchors: self.min_anchors,
            min_span: self.min_span,
        }
    }
}

/// Lines found in one invocation plus their per-kind counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub lines: Vec<Line>,
    pub summary: LineSummary,
}

impl Detection {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn from_lines(lines: Vec<Line>) -> Self {
        let summary = LineSummary::from_lines(&lines);
        Self { lines, summary }
    }
}

/// Check the input contract: equal lengths, finite prices, `high >= low`.
pub fn validate_series(highs: &[f64], lows: &[f64]) -> Result<(), DetectError> {
    check_lengths(highs, lows)?;
    check_prices(highs, lows)
}

fn check_lengths(highs: &[f64], lows: &[f64]) -> Result<(), DetectError> {
    if highs.len() != lows.len() {
        return Err(DetectError::LengthMismatch {
            highs: highs.len(),
            lows: lows.len(),
        });
    }
    Ok(())
}

fn check_prices(highs: &[f64], lows: &[f64]) -> Result<(), DetectError> {
    for (index, (&high, &low)) in highs.iter().zip(lows).enumerate() {
        if !high.is_finite() {
            return Err(DetectError::NonFinite {
                side: Side::High,
                index,
                value: high,
            });
        }
        if !low.is_finite() {
            return Err(DetectError::NonFinite {
                side: Side::Low,
                index,
                value: low,
            });
        }
        if high < low {
            return Err(DetectError::InvertedBar { index, high, low });
        }
    }
    Ok(())
}

/// Find trend lines, channels, triangles and a target over a high/low series.
///
/// Series shorter than [`MIN_BARS`] yield an empty detection without further
/// validation of prices or parameters.
pub fn find_best_lines(
    highs: &[f64],
    lows: &[f64],
    params: &DetectParams,
) -> Result<Detection, DetectError> {
    // A length mismatch is reported even for series too short to search.
    check_lengths(highs, lows)?;
    if highs.len() < MIN_BARS {
        return Ok(Detection::default());
    }
    check_prices(highs, lows)?;
    params.validate()?;

    let pivots = extract_pivots(highs, lows, params.swing_window, params.zz_dev);
    log::debug!(
        "{} bars: {} high pivots, {} low pivots",
        highs.len(),
        pivots.highs.len(),
        pivots.lows.len()
    );

    let search = params.search();
    let mut uppers = trend_lines(&pivots.highs, &search);
    let mut lowers = trend_lines(&pivots.lows, &search);
    uppers.truncate(params.max_lines.div_ceil(2));
    lowers.truncate(params.max_lines / 2);

    let channel_lines = channels(
        uppers.first(),
        lowers.first(),
        &pivots.highs,
        &pivots.lows,
        params.tolerance,
    );
    let triangle_lines = triangles(&uppers, &lowers);
    let target = project_target(uppers.first(), lowers.first(), &pivots.highs, &pivots.lows);

    let mut lines = uppers;
    lines.append(&mut lowers);
    lines.extend(channel_lines);
    lines.extend(triangle_lines);
    lines.extend(target);

    Ok(Detection::from_lines(lines))
}
