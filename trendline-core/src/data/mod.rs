//! Candle input: CSV loading, high/low repair, timeframes

pub mod candle;
pub mod loader;
pub mod timeframe;

pub use candle::{high_low_series, nearest_index, parse_timestamp, repair_high_low, Candle};
pub use loader::{load_candles_csv, read_candles_csv, DataError};
pub use timeframe::{lookback_bars, normalize_timeframe};
