//! Trendline Core: automatic trend-line detection over high/low price bars.
//!
//! This crate contains:
//! - Domain types (pivots, line records, per-kind summaries)
//! - Pivot extraction (zigzag deviation filter ∩ swing-window filter)
//! - Two-point line fitting and tolerance-based anchor matching
//! - Per-side trend-line search, channel synthesis, triangle pairing, target projection
//! - The `find_best_lines` orchestrator and the caller-level fallback policy
//! - TOML configuration, CSV candle loading, manual lines, and overlay mapping
//!
//! The detector works in bar-index space and is a pure function of its inputs.

pub mod channel;
pub mod config;
pub mod data;
pub mod detector;
pub mod domain;
pub mod fallback;
pub mod fit;
pub mod manual;
pub mod overlay;
pub mod pivots;
pub mod search;
pub mod synthetic;
pub mod target;
pub mod triangle;

pub use config::{apply_overrides, ConfigError, DetectConfig};
pub use detector::{find_best_lines, DetectError, DetectParams, Detection};
pub use domain::{Anchor, Line, LineKind, LineSummary, Pivot, PivotSet, Side};
pub use fallback::{FallbackOutcome, FallbackPolicy, ParamPreset};
