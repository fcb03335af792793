//! Score history and leaderboard
//!
//! Every finished session appends one `ScoreRecord`. The history is kept in
//! the order games were played; leaderboard views sort a borrowed copy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One finished session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub id: Uuid,
    pub player_name: String,
    pub score: u64,
    pub level: u32,
    pub timestamp: DateTime<Utc>,
    pub peppers_collected: u32,
}

impl ScoreRecord {
    pub fn new(player_name: impl Into<String>, score: u64, level: u32, peppers_collected: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            player_name: player_name.into(),
            score,
            level,
            timestamp: Utc::now(),
            peppers_collected,
        }
    }
}

/// Leaderboard sort keys (all descending)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Score,
    Level,
    Date,
    Peppers,
}

/// Aggregates over the whole history
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CareerStats {
    pub games_played: u32,
    pub total_peppers: u64,
    pub total_score: u64,
    pub highest_level: u32,
    pub best_score: u64,
    pub average_score: u64,
    /// Percentage of games that scored anything
    pub win_rate: u32,
    /// One player level per 1000 career points, minimum 1
    pub player_level: u64,
}

/// Chronological score history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreHistory {
    pub records: Vec<ScoreRecord>,
}

impl ScoreHistory {
    pub fn new(records: Vec<ScoreRecord>) -> Self {
        Self { records }
    }

    /// Append a record unless one with the same id is already present
    pub fn append(&mut self, record: ScoreRecord) -> bool {
        if self.contains(record.id) {
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.records.iter().any(|r| r.id == id)
    }

    /// Remove one record; returns whether it existed
    pub fn delete(&mut self, id: Uuid) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        self.records.len() != before
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Put a new player name on every record
    pub fn rename_player(&mut self, name: &str) {
        for record in &mut self.records {
            record.player_name = name.to_string();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Records sorted for display
    pub fn sorted(&self, order: SortOrder) -> Vec<&ScoreRecord> {
        let mut view: Vec<&ScoreRecord> = self.records.iter().collect();
        // Stable sort: ties keep play order
        match order {
            SortOrder::Score => view.sort_by(|a, b| b.score.cmp(&a.score)),
            SortOrder::Level => view.sort_by(|a, b| b.level.cmp(&a.level)),
            SortOrder::Date => view.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
            SortOrder::Peppers => view.sort_by(|a, b| b.peppers_collected.cmp(&a.peppers_collected)),
        }
        view
    }

    /// Best record by score
    pub fn top(&self) -> Option<&ScoreRecord> {
        self.sorted(SortOrder::Score).into_iter().next()
    }

    pub fn stats(&self) -> CareerStats {
        let games_played = self.records.len() as u32;
        if games_played == 0 {
            return CareerStats {
                player_level: 1,
                ..CareerStats::default()
            };
        }
        let total_score: u64 = self.records.iter().map(|r| r.score).sum();
        let wins = self.records.iter().filter(|r| r.score > 0).count() as u32;
        CareerStats {
            games_played,
            total_peppers: self.records.iter().map(|r| u64::from(r.peppers_collected)).sum(),
            total_score,
            highest_level: self.records.iter().map(|r| r.level).max().unwrap_or(0),
            best_score: self.records.iter().map(|r| r.score).max().unwrap_or(0),
            average_score: total_score / u64::from(games_played),
            win_rate: wins * 100 / games_played,
            player_level: (total_score / 1000).max(1),
        }
    }
}
