//! JSON-file store of manual lines, one file per owner.
//!
//! `<dir>/<owner>.json` holds `{"lines": [...]}`; each entry is a line record
//! tagged with an upper-cased `symbol` and lower-cased `timeframe`. A missing
//! file reads as an empty store.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::ManualError;
use crate::domain::Line;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredLine {
    #[serde(flatten)]
    pub line: Line,
    pub symbol: String,
    pub timeframe: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    lines: Vec<StoredLine>,
}

#[derive(Debug, Clone)]
pub struct ManualLineStore {
    dir: PathBuf,
}

impl ManualLineStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn add(&self, owner: &str, symbol: &str, timeframe: &str, line: Line) -> Result<(), ManualError> {
        let mut file = self.load(owner)?;
        file.lines.push(StoredLine {
            line,
            symbol: symbol.to_uppercase(),
            timeframe: timeframe.to_lowercase(),
        });
        self.save(owner, &file)
    }

    pub fn list(&self, owner: &str, symbol: &str, timeframe: &str) -> Result<Vec<Line>, ManualError> {
        let (sym, tf) = (symbol.to_uppercase(), timeframe.to_lowercase());
        Ok(self
            .load(owner)?
            .lines
            .into_iter()
            .filter(|s| s.symbol == sym && s.timeframe == tf)
            .map(|s| s.line)
            .collect())
    }

    /// Remove every line for `symbol`/`timeframe`; returns how many were removed.
    pub fn clear(&self, owner: &str, symbol: &str, timeframe: &str) -> Result<usize, ManualError> {
        let (sym, tf) = (symbol.to_uppercase(), timeframe.to_lowercase());
        let mut file = self.load(owner)?;
        let before = file.lines.len();
        file.lines.retain(|s| !(s.symbol == sym && s.timeframe == tf));
        let removed = before - file.lines.len();
        self.save(owner, &file)?;
        Ok(removed)
    }

    fn path_for(&self, owner: &str) -> Result<PathBuf, ManualError> {
        let valid = !owner.is_empty()
            && owner
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ManualError::InvalidOwner(owner.to_string()));
        }
        Ok(self.dir.join(format!("{owner}.json")))
    }

    fn load(&self, owner: &str) -> Result<StoreFile, ManualError> {
        let path = self.path_for(owner)?;
        if !path.exists() {
            return Ok(StoreFile::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|source| ManualError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, owner: &str, file: &StoreFile) -> Result<(), ManualError> {
        let path = self.path_for(owner)?;
        std::fs::create_dir_all(&self.dir).map_err(|source| ManualError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let json = serde_json::to_string_pretty(file)?;
        std::fs::write(&path, json).map_err(|source| ManualError::Io { path, source })
    }
}
