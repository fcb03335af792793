//! Persistence collaborator
//!
//! Every record lives under its own key as a JSON document. Backends only
//! move documents around; the typed load/save operations are provided on top
//! of them by the `Store` trait.
//!
//! Loads never fail: a missing document yields the default and a malformed
//! one is logged and replaced by the default. Writes report errors and are
//! merge-only where it matters (`append_score` ignores a known record id).

pub mod envelope;
pub mod file;
pub mod memory;

pub use envelope::{Envelope, FORMAT_VERSION};
pub use file::JsonFileStore;
pub use memory::MemoryStore;

use std::collections::BTreeSet;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::achievements::Achievement;
use crate::highscores::ScoreRecord;
use crate::settings::Settings;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported save format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("no local data directory available")]
    NoDataDir,
}

/// Document keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    ScoreHistory,
    Achievements,
    HighScore,
    UnlockedLevels,
    CompletedLevels,
    CurrencyBalance,
    CodexEntries,
    Settings,
}

impl Key {
    pub const ALL: [Key; 8] = [
        Key::ScoreHistory,
        Key::Achievements,
        Key::HighScore,
        Key::UnlockedLevels,
        Key::CompletedLevels,
        Key::CurrencyBalance,
        Key::CodexEntries,
        Key::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Key::ScoreHistory => "score_history",
            Key::Achievements => "achievements",
            Key::HighScore => "high_score",
            Key::UnlockedLevels => "unlocked_levels",
            Key::CompletedLevels => "completed_levels",
            Key::CurrencyBalance => "currency_balance",
            Key::CodexEntries => "codex_entries",
            Key::Settings => "settings",
        }
    }
}

/// Document store with typed record operations
pub trait Store {
    /// Read the raw document under `key`, `None` if it was never written
    fn read(&self, key: Key) -> Result<Option<Value>, StoreError>;

    /// Replace the document under `key`
    fn write(&mut self, key: Key, value: Value) -> Result<(), StoreError>;

    fn load_score_history(&self) -> Vec<ScoreRecord> {
        load_or_default(self, Key::ScoreHistory)
    }

    /// Append a finished session; a record id already stored is ignored
    ///
    /// Returns whether the record was added.
    fn append_score(&mut self, record: &ScoreRecord) -> Result<bool, StoreError> {
        let mut history = self.load_score_history();
        if history.iter().any(|r| r.id == record.id) {
            log::debug!("Score record {} already stored", record.id);
            return Ok(false);
        }
        history.push(record.clone());
        self.save_score_history(&history)?;
        Ok(true)
    }

    /// Replace the whole history (leaderboard edits)
    fn save_score_history(&mut self, records: &[ScoreRecord]) -> Result<(), StoreError> {
        save_value(self, Key::ScoreHistory, &records)
    }

    fn load_achievements(&self) -> Vec<Achievement> {
        load_or_default(self, Key::Achievements)
    }

    fn save_achievements(&mut self, achievements: &[Achievement]) -> Result<(), StoreError> {
        save_value(self, Key::Achievements, &achievements)
    }

    fn load_high_score(&self) -> u64 {
        load_or_default(self, Key::HighScore)
    }

    fn save_high_score(&mut self, score: u64) -> Result<(), StoreError> {
        save_value(self, Key::HighScore, &score)
    }

    fn load_unlocked_levels(&self) -> BTreeSet<u32> {
        load_or(self, Key::UnlockedLevels, || BTreeSet::from([1]))
    }

    fn save_unlocked_levels(&mut self, levels: &BTreeSet<u32>) -> Result<(), StoreError> {
        save_value(self, Key::UnlockedLevels, levels)
    }

    fn load_completed_levels(&self) -> BTreeSet<u32> {
        load_or_default(self, Key::CompletedLevels)
    }

    fn save_completed_levels(&mut self, levels: &BTreeSet<u32>) -> Result<(), StoreError> {
        save_value(self, Key::CompletedLevels, levels)
    }

    fn load_currency_balance(&self) -> u64 {
        load_or_default(self, Key::CurrencyBalance)
    }

    fn save_currency_balance(&mut self, balance: u64) -> Result<(), StoreError> {
        save_value(self, Key::CurrencyBalance, &balance)
    }

    fn load_codex_entries(&self) -> BTreeSet<String> {
        load_or_default(self, Key::CodexEntries)
    }

    fn save_codex_entries(&mut self, entries: &BTreeSet<String>) -> Result<(), StoreError> {
        save_value(self, Key::CodexEntries, entries)
    }

    fn load_settings(&self) -> Settings {
        load_or_default::<Settings, _>(self, Key::Settings).sanitized()
    }

    fn save_settings(&mut self, settings: &Settings) -> Result<(), StoreError> {
        save_value(self, Key::Settings, settings)
    }
}

fn load_or_default<T, S>(store: &S, key: Key) -> T
where
    T: DeserializeOwned + Default,
    S: Store + ?Sized,
{
    load_or(store, key, T::default)
}

fn load_or<T, S>(store: &S, key: Key, fallback: impl FnOnce() -> T) -> T
where
    T: DeserializeOwned,
    S: Store + ?Sized,
{
    let value = match store.read(key) {
        Ok(Some(value)) => value,
        Ok(None) => return fallback(),
        Err(e) => {
            log::warn!("Failed to read {}: {}, using defaults", key.as_str(), e);
            return fallback();
        }
    };
    match serde_json::from_value(value) {
        Ok(loaded) => loaded,
        Err(e) => {
            log::warn!("Malformed {}: {}, using defaults", key.as_str(), e);
            fallback()
        }
    }
}

fn save_value<T, S>(store: &mut S, key: Key, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
    S: Store + ?Sized,
{
    let value = serde_json::to_value(value)?;
    store.write(key, value)
}
