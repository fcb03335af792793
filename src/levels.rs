//! Stage progression
//!
//! Stages 1..=15. Stage 1 is always unlocked; completing a stage unlocks the
//! next one.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_STAGE;

const STAGE_TITLES: [&str; MAX_STAGE as usize] = [
    "Beginner",
    "Warming Up",
    "Getting Hot",
    "Spicy!",
    "Fire Starter",
    "Heat Wave",
    "Inferno",
    "Volcano",
    "Meltdown",
    "Impossible",
    "Nightmare",
    "Hellfire",
    "Apocalypse",
    "Legendary",
    "Mythic",
];

/// Clamp a requested stage into 1..=15
#[inline]
pub fn clamp_stage(stage: i64) -> u32 {
    stage.clamp(1, i64::from(MAX_STAGE)) as u32
}

/// Display title for a stage (clamped)
pub fn stage_title(stage: u32) -> &'static str {
    let index = stage.clamp(1, MAX_STAGE) as usize - 1;
    STAGE_TITLES[index]
}

/// Unlocked and completed stages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub unlocked: BTreeSet<u32>,
    pub completed: BTreeSet<u32>,
}

impl Default for LevelProgress {
    fn default() -> Self {
        Self {
            unlocked: BTreeSet::from([1]),
            completed: BTreeSet::new(),
        }
    }
}

impl LevelProgress {
    /// Build from stored sets, dropping out-of-range stages
    pub fn new(unlocked: impl IntoIterator<Item = u32>, completed: impl IntoIterator<Item = u32>) -> Self {
        let mut progress = Self {
            unlocked: unlocked.into_iter().collect(),
            completed: completed.into_iter().collect(),
        };
        progress.normalize();
        progress
    }

    fn normalize(&mut self) {
        let in_range = |s: &u32| (1..=MAX_STAGE).contains(s);
        self.unlocked.retain(in_range);
        self.completed.retain(in_range);
        self.unlocked.insert(1);
        // A completed stage was necessarily playable
        self.unlocked.extend(self.completed.iter().copied());
    }

    pub fn is_unlocked(&self, stage: u32) -> bool {
        self.unlocked.contains(&stage)
    }

    pub fn is_completed(&self, stage: u32) -> bool {
        self.completed.contains(&stage)
    }

    /// Mark a stage completed and unlock the next one
    ///
    /// Returns the newly unlocked stage, if any.
    pub fn complete(&mut self, stage: u32) -> Option<u32> {
        if !(1..=MAX_STAGE).contains(&stage) {
            return None;
        }
        self.completed.insert(stage);
        self.unlocked.insert(stage);
        let next = stage + 1;
        if next <= MAX_STAGE && self.unlocked.insert(next) {
            log::info!("Stage {} unlocked: {}", next, stage_title(next));
            Some(next)
        } else {
            None
        }
    }

    /// Highest stage the player may start
    pub fn highest_unlocked(&self) -> u32 {
        self.unlocked.iter().next_back().copied().unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_unlocks_first_stage() {
        let progress = LevelProgress::default();
        assert!(progress.is_unlocked(1));
        assert!(!progress.is_unlocked(2));
        assert_eq!(progress.highest_unlocked(), 1);
    }

    #[test]
    fn test_complete_unlocks_next() {
        let mut progress = LevelProgress::default();
        assert_eq!(progress.complete(1), Some(2));
        assert!(progress.is_completed(1));
        assert!(progress.is_unlocked(2));
        // Replaying adds nothing new
        assert_eq!(progress.complete(1), None);
    }

    #[test]
    fn test_last_stage_has_no_successor() {
        let mut progress = LevelProgress::new(1..=15, []);
        assert_eq!(progress.complete(15), None);
        assert!(progress.is_completed(15));
        assert_eq!(progress.complete(16), None);
    }

    #[test]
    fn test_new_normalizes() {
        let progress = LevelProgress::new([0, 3, 99], [5]);
        assert_eq!(progress.unlocked, BTreeSet::from([1, 3, 5]));
        assert_eq!(progress.completed, BTreeSet::from([5]));
    }

    #[test]
    fn test_titles_and_clamp() {
        assert_eq!(stage_title(1), "Beginner");
        assert_eq!(stage_title(4), "Spicy!");
        assert_eq!(stage_title(15), "Mythic");
        assert_eq!(stage_title(0), "Beginner");
        assert_eq!(clamp_stage(-3), 1);
        assert_eq!(clamp_stage(0), 1);
        assert_eq!(clamp_stage(7), 7);
        assert_eq!(clamp_stage(40), 15);
    }
}
