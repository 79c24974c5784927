//! CSV candle loading.
//!
//! Expects a header row with `time,open,high,low,close` and an optional
//! `volume` column (capitalized names and `date` for `time` are accepted).
//! Rows are returned in file order; the detector treats that order as
//! chronological.

use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::candle::{parse_timestamp, Candle};

#[derive(Debug, Error)]
pub enum DataError {
    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: unrecognized timestamp '{value}'")]
    Timestamp { row: usize, value: String },

    #[error("no candles in input")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Time", alias = "date", alias = "Date", alias = "timestamp")]
    time: String,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(default, alias = "Volume")]
    volume: f64,
}

pub fn load_candles_csv(path: &Path) -> Result<Vec<Candle>, DataError> {
    let file = std::fs::File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_candles_csv(file)
}

pub fn read_candles_csv<R: Read>(reader: R) -> Result<Vec<Candle>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut candles = Vec::new();
    for (i, record) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = record?;
        // Row 1 is the header.
        let time = parse_timestamp(&row.time).ok_or_else(|| DataError::Timestamp {
            row: i + 2,
            value: row.time.clone(),
        })?;
        candles.push(Candle {
            time,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        });
    }

    if candles.is_empty() {
        return Err(DataError::Empty);
    }
    Ok(candles)
}
