//! Caller-level relaxation policy.
//!
//! The detector never retries on its own. A [`FallbackPolicy`] holds at most
//! two threshold presets and runs them in order until one yields lines:
//!
//! 1. The caller's thresholds.
//! 2. Optionally, the same thresholds relaxed once ([`ParamPreset::relaxed`]).
//!
//! There is no further escalation.

use serde::{Deserialize, Serialize};

use crate::detector::{find_best_lines, DetectError, DetectParams, Detection};

/// The four thresholds the fallback policy is allowed to vary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamPreset {
    pub tolerance: f64,
    pub min_anchors: usize,
    pub min_span: usize,
    pub zz_dev: f64,
}

impl ParamPreset {
    pub fn from_params(params: &DetectParams) -> Self {
        Self {
            tolerance: params.tolerance,
            min_anchors: params.min_anchors,
            min_span: params.min_span,
            zz_dev: params.zz_dev,
        }
    }

    /// One relaxation step: wider tolerance, one anchor fewer, two bars
    /// shorter span, three-quarters of the zigzag deviation, each clamped.
    pub fn relaxed(&self) -> Self {
        Self {
            tolerance: (self.tolerance * 2.0).max(0.015),
            min_anchors: self.min_anchors.saturating_sub(1).max(2),
            min_span: self.min_span.saturating_sub(2).max(8),
            zz_dev: (self.zz_dev * 0.75).max(0.004),
        }
    }

    /// `base` with this preset's thresholds.
    pub fn apply(&self, base: &DetectParams) -> DetectParams {
        DetectParams {
            tolerance: self.tolerance,
            min_anchors: self.min_anchors,
            min_span: self.min_span,
            zz_dev: self.zz_dev,
            ..base.clone()
        }
    }
}

/// Ordered presets tried until the first non-empty detection.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackPolicy {
    primary: ParamPreset,
    relaxed: Option<ParamPreset>,
}

/// Result of running a [`FallbackPolicy`].
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackOutcome {
    pub detection: Detection,
    /// Preset that produced `detection`.
    pub preset: ParamPreset,
    /// Zero-based position of `preset` in the policy.
    pub attempt: usize,
    pub fallback_used: bool,
}

impl FallbackPolicy {
    /// Run `preset` once, no retry.
    pub fn single(preset: ParamPreset) -> Self {
        Self {
            primary: preset,
            relaxed: None,
        }
    }

    /// Run `preset`, then `preset.relaxed()` if nothing was found.
    pub fn with_relaxation(preset: ParamPreset) -> Self {
        Self {
            primary: preset,
            relaxed: Some(preset.relaxed()),
        }
    }

    /// Explicit pair of presets.
    pub fn pair(primary: ParamPreset, fallback: ParamPreset) -> Self {
        Self {
            primary,
            relaxed: Some(fallback),
        }
    }

    pub fn presets(&self) -> Vec<ParamPreset> {
        std::iter::once(self.primary).chain(self.relaxed).collect()
    }

    /// Detect with each preset in turn over `base`'s remaining parameters.
    ///
    /// Engine errors are returned immediately. When every preset comes back
    /// empty the last (empty) detection is returned.
    pub fn detect(
        &self,
        highs: &[f64],
        lows: &[f64],
        base: &DetectParams,
    ) -> Result<FallbackOutcome, DetectError> {
        let mut outcome = run_preset(highs, lows, base, self.primary, 0)?;
        if outcome.detection.is_empty() {
            if let Some(relaxed) = self.relaxed {
                outcome = run_preset(highs, lows, base, relaxed, 1)?;
                log::info!(
                    "fallback (tol={}, anchors={}, span={}, zz={}) found {} lines",
                    relaxed.tolerance,
                    relaxed.min_anchors,
                    relaxed.min_span,
                    relaxed.zz_dev,
                    outcome.detection.lines.len()
                );
            }
        }
        Ok(outcome)
    }
}

fn run_preset(
    highs: &[f64],
    lows: &[f64],
    base: &DetectParams,
    preset: ParamPreset,
    attempt: usize,
) -> Result<FallbackOutcome, DetectError> {
    let detection = find_best_lines(highs, lows, &preset.apply(base))?;
    Ok(FallbackOutcome {
        detection,
        preset,
        attempt,
        fallback_used: attempt > 0,
    })
}
