//! Detection configuration: TOML file and `key=value` overrides.
//!
//! ```toml
//! [detect]
//! max_lines = 7
//! tolerance = 0.02
//! min_anchors = 2
//!
//! [fallback]
//! enabled = true
//! ```
//!
//! Missing tables and fields take their defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::detector::{DetectError, DetectParams};
use crate::fallback::{FallbackPolicy, ParamPreset};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Invalid(#[from] DetectError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Retry once with relaxed thresholds when nothing is found.
    pub enabled: bool,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectConfig {
    pub detect: DetectParams,
    pub fallback: FallbackConfig,
}

impl DetectConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.detect.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn policy(&self) -> FallbackPolicy {
        let preset = ParamPreset::from_params(&self.detect);
        if self.fallback.enabled {
            FallbackPolicy::with_relaxation(preset)
        } else {
            FallbackPolicy::single(preset)
        }
    }
}

/// Apply `tol=`, `anchors=`, `span=` and `zz=` overrides.
///
/// Keys are case-insensitive. Arguments without `=`, unknown keys and
/// unparsable values are skipped and returned so the caller can report them.
pub fn apply_overrides<S: AsRef<str>>(params: &mut DetectParams, args: &[S]) -> Vec<String> {
    let mut skipped = Vec::new();
    for arg in args {
        let arg = arg.as_ref();
        let Some((key, value)) = arg.split_once('=') else {
            skipped.push(arg.to_string());
            continue;
        };
        let value = value.trim();
        let applied = match key.trim().to_ascii_lowercase().as_str() {
            "tol" => value.parse().map(|v| params.tolerance = v).is_ok(),
            "anchors" => value.parse().map(|v| params.min_anchors = v).is_ok(),
            "span" => value.parse().map(|v| params.min_span = v).is_ok(),
            "zz" => value.parse().map(|v| params.zz_dev = v).is_ok(),
            _ => false,
        };
        if !applied {
            skipped.push(arg.to_string());
        }
    }
    skipped
}
