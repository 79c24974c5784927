//! Manually authored lines: specs, the per-owner JSON store, and presets.
//!
//! Manual lines share the engine's [`Line`](crate::domain::Line) record shape
//! and carry a color, so a renderer overlays them exactly like detected lines.

pub mod preset;
pub mod resolve;
pub mod store;

pub use preset::{PresetBook, PresetEntry};
pub use resolve::{ManualLineSpec, DEFAULT_MANUAL_COLOR};
pub use store::{ManualLineStore, StoredLine};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManualError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line store JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("preset TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unrecognized timestamp '{0}'")]
    Timestamp(String),

    #[error("no candles to snap manual line endpoints to")]
    NoCandles,

    #[error("invalid owner id '{0}'")]
    InvalidOwner(String),
}
