//! High-score persistence
//!
//! The session reads one scalar at startup and writes it back at most once
//! per game. [`FileHighScoreStore`] keeps the values in a small JSON object
//! keyed by slot name; [`MemoryHighScoreStore`] keeps them in process.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Slot holding this game's best score
pub const HIGH_SCORE_KEY: &str = "snakeHighScore";

/// Key-value store for high scores
pub trait HighScoreStore {
    /// Read the value stored under `key`, `None` if it was never set
    fn get(&self, key: &str) -> Result<Option<u32>>;

    /// Persist `value` under `key`
    fn set(&mut self, key: &str, value: u32) -> Result<()>;
}

/// High scores stored as a JSON object on disk
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.grid_snake/high_score.json`, or the working directory when no
    /// home directory is known
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|home| home.join(".grid_snake"))
            .unwrap_or_default()
            .join("high_score.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, u32>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read high scores from {:?}", self.path))?;
        let scores = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse high scores in {:?}", self.path))?;
        Ok(scores)
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn get(&self, key: &str) -> Result<Option<u32>> {
        Ok(self.read_all()?.get(key).copied())
    }

    fn set(&mut self, key: &str, value: u32) -> Result<()> {
        // Create parent directories if needed
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
        }

        // Keep any other slots already in the file; never overwrite one we
        // could not read
        let mut scores = self.read_all()?;
        scores.insert(key.to_string(), value);

        let json =
            serde_json::to_string_pretty(&scores).context("Failed to serialize high scores")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write high scores to {:?}", self.path))?;

        Ok(())
    }
}

/// In-process store for tests and replays
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScoreStore {
    scores: BTreeMap<String, u32>,
    writes: usize,
}

impl MemoryHighScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with one value
    pub fn with_score(key: &str, value: u32) -> Self {
        let mut scores = BTreeMap::new();
        scores.insert(key.to_string(), value);
        Self { scores, writes: 0 }
    }

    /// Number of `set` calls so far
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn get(&self, key: &str) -> Result<Option<u32>> {
        Ok(self.scores.get(key).copied())
    }

    fn set(&mut self, key: &str, value: u32) -> Result<()> {
        self.scores.insert(key.to_string(), value);
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileHighScoreStore::new(dir.path().join("scores.json"));
        assert_eq!(store.get(HIGH_SCORE_KEY).unwrap(), None);
    }

    #[test]
    fn test_set_then_get() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("scores.json");
        let mut store = FileHighScoreStore::new(&path);

        store.set(HIGH_SCORE_KEY, 120).unwrap();
        assert!(path.exists());

        let reopened = FileHighScoreStore::new(&path);
        assert_eq!(reopened.get(HIGH_SCORE_KEY).unwrap(), Some(120));
    }

    #[test]
    fn test_set_keeps_other_slots() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.json");
        std::fs::write(&path, r#"{ "otherGame": 7 }"#).unwrap();

        let mut store = FileHighScoreStore::new(&path);
        store.set(HIGH_SCORE_KEY, 30).unwrap();

        assert_eq!(store.get("otherGame").unwrap(), Some(7));
        assert_eq!(store.get(HIGH_SCORE_KEY).unwrap(), Some(30));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileHighScoreStore::new(&path);
        assert!(store.get(HIGH_SCORE_KEY).is_err());
    }

    #[test]
    fn test_set_leaves_corrupt_file_alone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.json");
        let corrupt = r#"{"snakeHighScore":500,"otherGame":7,}"#;
        std::fs::write(&path, corrupt).unwrap();

        let mut store = FileHighScoreStore::new(&path);
        assert!(store.set(HIGH_SCORE_KEY, 10).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), corrupt);
    }

    #[test]
    fn test_memory_store_counts_writes() {
        let mut store = MemoryHighScoreStore::with_score(HIGH_SCORE_KEY, 40);
        assert_eq!(store.get(HIGH_SCORE_KEY).unwrap(), Some(40));
        assert_eq!(store.writes(), 0);

        store.set(HIGH_SCORE_KEY, 50).unwrap();
        assert_eq!(store.get(HIGH_SCORE_KEY).unwrap(), Some(50));
        assert_eq!(store.writes(), 1);
    }
}
