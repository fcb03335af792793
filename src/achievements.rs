//! Achievements
//!
//! Progress is recomputed from career totals after every finished session.
//! Counters (games played, peppers) use the running total over the whole
//! score history; records (score, level) use the best value ever observed.
//! Progress never goes down and an unlocked achievement stays unlocked.

use serde::{Deserialize, Serialize};

use crate::highscores::CareerStats;

/// What an achievement measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AchievementKind {
    GamesPlayed,
    PeppersCollected,
    BestScore,
    HighestLevel,
}

impl AchievementKind {
    /// Current career value for this kind
    fn measure(self, stats: &CareerStats, high_score: u64) -> u64 {
        match self {
            AchievementKind::GamesPlayed => u64::from(stats.games_played),
            AchievementKind::PeppersCollected => stats.total_peppers,
            AchievementKind::BestScore => stats.best_score.max(high_score),
            AchievementKind::HighestLevel => u64::from(stats.highest_level),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    /// Stable identity across saves
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub kind: AchievementKind,
    pub requirement: u64,
    pub progress: u64,
    pub unlocked: bool,
}

impl Achievement {
    fn new(
        id: &str,
        title: &str,
        description: &str,
        icon: &str,
        kind: AchievementKind,
        requirement: u64,
    ) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            kind,
            requirement,
            progress: 0,
            unlocked: false,
        }
    }

    /// Progress as a fraction in 0..=1
    pub fn fraction(&self) -> f32 {
        if self.requirement == 0 {
            return 1.0;
        }
        (self.progress as f32 / self.requirement as f32).min(1.0)
    }
}

/// The achievement set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievements {
    pub entries: Vec<Achievement>,
}

impl Default for Achievements {
    fn default() -> Self {
        use AchievementKind::*;
        Self {
            entries: vec![
                Achievement::new("first_steps", "First Steps", "Play your first game", "🎮", GamesPlayed, 1),
                Achievement::new("spice_collector", "Spice Collector", "Collect 10 peppers", "🌶️", PeppersCollected, 10),
                Achievement::new("high_scorer", "High Scorer", "Reach 1000 points", "🏆", BestScore, 1000),
                Achievement::new("addicted", "Addicted", "Play 10 games", "🔥", GamesPlayed, 10),
                Achievement::new("master_collector", "Master Collector", "Collect 50 peppers", "⭐", PeppersCollected, 50),
                Achievement::new("ultimate_champion", "Ultimate Champion", "Reach 5000 points", "👑", BestScore, 5000),
                Achievement::new("level_master", "Level Master", "Reach level 5", "🚀", HighestLevel, 5),
                Achievement::new("perfect_game", "Perfect Game", "Score over 2000 points", "💎", BestScore, 2000),
            ],
        }
    }
}

impl Achievements {
    /// Rebuild the set from stored entries
    ///
    /// The definitions always come from the defaults; stored progress and
    /// unlock flags are carried over by id. Unknown ids are dropped and
    /// missing ones start fresh.
    pub fn from_saved(saved: Vec<Achievement>) -> Self {
        let mut achievements = Self::default();
        for entry in &mut achievements.entries {
            if let Some(old) = saved.iter().find(|s| s.id == entry.id) {
                entry.progress = old.progress.min(entry.requirement);
                entry.unlocked = old.unlocked || entry.progress >= entry.requirement;
            }
        }
        achievements
    }

    /// Fold new career totals into progress
    ///
    /// Returns the titles unlocked by this call.
    pub fn recompute(&mut self, stats: &CareerStats, high_score: u64) -> Vec<String> {
        let mut newly_unlocked = Vec::new();
        for entry in &mut self.entries {
            let measured = entry.kind.measure(stats, high_score).min(entry.requirement);
            entry.progress = entry.progress.max(measured);
            if !entry.unlocked && entry.progress >= entry.requirement {
                entry.unlocked = true;
                log::info!("Achievement unlocked: {}", entry.title);
                newly_unlocked.push(entry.title.clone());
            }
        }
        newly_unlocked
    }

    pub fn get(&self, id: &str) -> Option<&Achievement> {
        self.entries.iter().find(|a| a.id == id)
    }

    pub fn unlocked_count(&self) -> usize {
        self.entries.iter().filter(|a| a.unlocked).count()
    }
}
