//! Game state and transition rules
//!
//! `GameState` is the authoritative record of a session. Every mutation goes
//! through the transition methods below, which refuse to act outside the
//! phase they are valid in.

use serde::{Deserialize, Serialize};

use super::pepper::Tier;
use crate::tuning::Tuning;
use crate::{difficulty_multiplier, level_for_score};

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Created, waiting for `start`
    NotStarted,
    /// Active gameplay
    Running,
    /// Everything suspended until resumed
    Paused,
    /// Session ended (terminal)
    GameOver,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    OutOfLives,
    OutOfTime,
}

/// Things that happened during a tick, drained by the session owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Spawned { id: u32, tier: Tier, good: bool },
    Collected { id: u32, tier: Tier, points: u64 },
    Hit { id: u32, lives_left: u32 },
    Expired { id: u32 },
    LevelUp { level: u32 },
    NewHighScore { score: u64 },
    Countdown { remaining: u32 },
    DirectionReversed,
    Paused,
    Resumed,
    GameOver { reason: GameOverReason },
}

/// Authoritative session record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub score: u64,
    pub lives: u32,
    /// Derived from score: `score / 500 + 1`
    pub level: u32,
    /// Selected stage (1..=15), adds to difficulty
    pub stage: u32,
    pub peppers_collected: u32,
    /// Countdown ticks left
    pub time_remaining: u32,
    pub phase: GamePhase,
    /// Cumulative currency, carried across sessions
    pub encyclopedia_points: u64,
    /// Best score ever, carried across sessions
    pub high_score: u64,
    pub game_over_reason: Option<GameOverReason>,
    /// Pending events (drained each step)
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// High score at session start, for the one-shot announcement
    starting_high_score: u64,
    announced_high_score: bool,
}

impl GameState {
    /// Create a fresh state for a stage
    pub fn new(stage: u32, tuning: &Tuning) -> Self {
        Self {
            score: 0,
            lives: tuning.starting_lives,
            level: 1,
            stage: stage.clamp(1, crate::consts::MAX_STAGE),
            peppers_collected: 0,
            time_remaining: tuning.session_seconds,
            phase: GamePhase::NotStarted,
            encyclopedia_points: 0,
            high_score: 0,
            game_over_reason: None,
            events: Vec::new(),
            starting_high_score: 0,
            announced_high_score: false,
        }
    }

    /// Seed the carried-over records loaded from the store
    pub fn with_records(mut self, high_score: u64, encyclopedia_points: u64) -> Self {
        self.high_score = high_score;
        self.starting_high_score = high_score;
        self.encyclopedia_points = encyclopedia_points;
        self
    }

    /// NotStarted -> Running
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::NotStarted {
            return false;
        }
        self.phase = GamePhase::Running;
        true
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Level used for difficulty: stage offset plus in-game level
    pub fn difficulty_level(&self) -> u32 {
        (self.stage.max(1) - 1) + self.level.max(1)
    }

    /// Speed multiplier for spawns (inverse for the basket)
    pub fn difficulty(&self) -> f32 {
        difficulty_multiplier(self.difficulty_level())
    }

    /// Catch a good pepper
    pub fn collect_good(&mut self, tier: Tier) -> bool {
        if !self.is_running() {
            return false;
        }
        let points = tier.points();
        self.score = self.score.saturating_add(points);
        self.peppers_collected = self.peppers_collected.saturating_add(1);
        self.encyclopedia_points = self.encyclopedia_points.saturating_add(points);

        let level = level_for_score(self.score);
        if level != self.level {
            self.level = level;
            self.events.push(GameEvent::LevelUp { level });
        }

        if self.score > self.high_score {
            self.high_score = self.score;
            if !self.announced_high_score && self.score > self.starting_high_score {
                self.announced_high_score = true;
                self.events.push(GameEvent::NewHighScore { score: self.score });
            }
        }
        true
    }

    /// Catch a bad item
    pub fn collect_bad(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.end(GameOverReason::OutOfLives);
        }
        true
    }

    /// One countdown tick
    pub fn tick_timer(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        self.events.push(GameEvent::Countdown {
            remaining: self.time_remaining,
        });
        if self.time_remaining == 0 {
            self.end(GameOverReason::OutOfTime);
        }
        true
    }

    /// Running <-> Paused
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            GamePhase::Running => {
                self.phase = GamePhase::Paused;
                self.events.push(GameEvent::Paused);
                true
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Running;
                self.events.push(GameEvent::Resumed);
                true
            }
            GamePhase::NotStarted | GamePhase::GameOver => false,
        }
    }

    /// Enter the terminal phase
    ///
    /// Only reached from the lives or timer floor. Returns true only for
    /// the call that performed the transition.
    fn end(&mut self, reason: GameOverReason) -> bool {
        if self.is_over() {
            return false;
        }
        self.phase = GamePhase::GameOver;
        self.game_over_reason = Some(reason);
        self.events.push(GameEvent::GameOver { reason });
        true
    }
}
