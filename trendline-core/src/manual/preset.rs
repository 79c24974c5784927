//! Preset lines drawn on every chart of a symbol/timeframe.
//!
//! ```toml
//! [[preset]]
//! symbol = "BTC/USDT"
//! timeframe = "1h"
//! type = "resistance"
//! side = "high"
//! from = "2025-07-13T00:00"
//! to = "2025-08-08T00:00"
//! color = "#c9ccd3"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::resolve::{ManualLineSpec, DEFAULT_MANUAL_COLOR};
use super::ManualError;
use crate::data::{normalize_timeframe, Candle};
use crate::domain::{Line, LineKind, Side};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetEntry {
    pub symbol: String,
    pub timeframe: String,
    #[serde(rename = "type")]
    pub kind: LineKind,
    pub side: Side,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub color: Option<String>,
}

impl PresetEntry {
    pub fn to_manual(&self) -> ManualLineSpec {
        ManualLineSpec {
            kind: self.kind,
            side: self.side,
            from: self.from.clone(),
            to: self.to.clone(),
            color: self
                .color
                .clone()
                .unwrap_or_else(|| DEFAULT_MANUAL_COLOR.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PresetBook {
    #[serde(default, rename = "preset")]
    pub entries: Vec<PresetEntry>,
}

impl PresetBook {
    pub fn from_file(path: &Path) -> Result<Self, ManualError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManualError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ManualError> {
        Ok(toml::from_str(content)?)
    }

    /// Presets for `symbol`/`timeframe`, resolved against `candles`.
    ///
    /// Symbols compare case-insensitively; timeframes compare after alias
    /// normalization.
    pub fn lines_for(&self, symbol: &str, timeframe: &str, candles: &[Candle]) -> Result<Vec<Line>, ManualError> {
        let tf = normalize_timeframe(timeframe);
        self.entries
            .iter()
            .filter(|e| e.symbol.eq_ignore_ascii_case(symbol) && normalize_timeframe(&e.timeframe) == tf)
            .map(|e| e.to_manual().resolve(candles))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const BOOK: &str = r##"
        [[preset]]
        symbol = "BTC/USDT"
        timeframe = "1h"
        type = "resistance"
        side = "high"
        from = "2025-08-01T01:00"
        to = "2025-08-01T05:00"
        color = "#c9ccd3"

        [[preset]]
        symbol = "BTC/USDT"
        timeframe = "15m"
        type = "support"
        side = "low"
        from = "2025-08-01T00:00"
        to = "2025-08-01T03:00"
    "##;

    fn candles() -> Vec<Candle> {
        let start = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        (0..8)
            .map(|i| Candle {
                time: start + chrono::Duration::hours(i),
                open: 1.0,
                high: 10.0 + i as f64,
                low: 5.0,
                close: 1.0,
                volume: 0.0,
            })
            .collect()
    }

    #[test]
    fn parses_entries() {
        let book = PresetBook::from_toml(BOOK).unwrap();
        assert_eq!(book.entries.len(), 2);
        assert_eq!(book.entries[1].color, None);
        assert_eq!(book.entries[1].to_manual().color, DEFAULT_MANUAL_COLOR);
    }

    #[test]
    fn selects_by_symbol_and_normalized_timeframe() {
        let book = PresetBook::from_toml(BOOK).unwrap();
        let lines = book.lines_for("btc/usdt", "1H", &candles()).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].kind, LineKind::Resistance);
        assert_eq!((lines[0].i0, lines[0].i1), (1, 5));
        assert_eq!(lines[0].color.as_deref(), Some("#c9ccd3"));
        assert!(book.lines_for("ETH/USDT", "1h", &candles()).unwrap().is_empty());
    }

    #[test]
    fn empty_book_is_valid() {
        assert!(PresetBook::from_toml("").unwrap().entries.is_empty());
    }
}
