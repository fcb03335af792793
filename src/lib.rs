//! Pepper Rush - catch the peppers, dodge the skulls
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, kinematics, collisions, game state)
//! - `game`: Session owner that serializes input and drives persistence
//! - `persistence`: Store collaborator (in-memory and JSON file backends)
//! - `tuning`: Data-driven game balance
//! - `highscores`, `achievements`, `levels`, `codex`, `settings`: persisted records

pub mod achievements;
pub mod codex;
pub mod game;
pub mod highscores;
pub mod levels;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::{BasketView, Command, Game, GameError, PepperView, SessionSummary, Snapshot};
pub use highscores::{CareerStats, ScoreHistory, ScoreRecord, SortOrder};
pub use persistence::{JsonFileStore, MemoryStore, Store, StoreError};
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta accepted by the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Score needed per in-game level
    pub const POINTS_PER_LEVEL: u64 = 500;
    /// Difficulty gained per effective level
    pub const DIFFICULTY_PER_LEVEL: f32 = 0.3;

    /// Number of selectable stages
    pub const MAX_STAGE: u32 = 15;

    /// Name recorded on scores when the player never set one
    pub const DEFAULT_PLAYER_NAME: &str = "Player";
}

/// Difficulty multiplier for an effective level (`level * 0.3 + 1.0`)
///
/// Levels below 1 are treated as level 1.
#[inline]
pub fn difficulty_multiplier(level: u32) -> f32 {
    level.max(1) as f32 * consts::DIFFICULTY_PER_LEVEL + 1.0
}

/// In-game level reached with a given score
#[inline]
pub fn level_for_score(score: u64) -> u32 {
    (score / consts::POINTS_PER_LEVEL) as u32 + 1
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_score_boundaries() {
        assert_eq!(level_for_score(0), 1);
        assert_eq!(level_for_score(499), 1);
        assert_eq!(level_for_score(500), 2);
        assert_eq!(level_for_score(999), 2);
        assert_eq!(level_for_score(1000), 3);
    }

    #[test]
    fn test_difficulty_multiplier_clamps_level() {
        assert!((difficulty_multiplier(1) - 1.3).abs() < 1e-6);
        assert!((difficulty_multiplier(0) - 1.3).abs() < 1e-6);
        assert!((difficulty_multiplier(10) - 4.0).abs() < 1e-6);
    }
}
