//! Session owner
//!
//! `Game` owns the simulation world, the command queue and the persisted
//! records. Frame time is fed in through `update`, which runs fixed
//! simulation steps off an accumulator. Taps, pause and quit are queued and
//! consumed at the start of the next step. When a session reaches game over
//! it is finalized exactly once: the score record is appended, the high
//! score and encyclopedia balance are saved and achievements recomputed.
//! Quitting or starting another stage drops a live session without writing
//! anything.

use std::collections::VecDeque;

use glam::Vec2;
use thiserror::Error;
use uuid::Uuid;

use crate::achievements::Achievements;
use crate::codex::{Codex, CodexError};
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::highscores::{CareerStats, ScoreHistory, ScoreRecord, SortOrder};
use crate::levels::{LevelProgress, clamp_stage, stage_title};
use crate::persistence::{Store, StoreError};
use crate::settings::Settings;
use crate::sim::{Direction, GameEvent, GameOverReason, GameState, TickInput, Tier, World, tick};
use crate::tuning::{Tuning, TuningError};

/// Player input, queued until the next fixed step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Reverse the basket
    Tap,
    TogglePause,
    /// Leave the session unrecorded
    Quit,
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("stage {0} is locked")]
    StageLocked(u32),
    #[error("no finished session")]
    NoFinishedSession,
    #[error("a session is in progress")]
    SessionInProgress,
    #[error(transparent)]
    Codex(#[from] CodexError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Read-only view of one pepper
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PepperView {
    pub id: u32,
    pub pos: Vec2,
    pub tier: Tier,
    pub good: bool,
    pub rotation: f32,
}

/// Read-only view of the basket
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasketView {
    pub pos: Vec2,
    pub size: Vec2,
    pub direction: Direction,
    /// Reverse feedback still showing
    pub flashing: bool,
}

/// Everything a presentation layer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    pub stage: u32,
    pub time_remaining: u32,
    pub peppers_collected: u32,
    pub high_score: u64,
    pub encyclopedia_points: u64,
    pub paused: bool,
    pub game_over: bool,
    pub peppers: Vec<PepperView>,
    pub basket: BasketView,
}

/// Result of a finalized session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub record: ScoreRecord,
    pub reason: GameOverReason,
    pub stage: u32,
    pub new_high_score: bool,
    /// Titles of achievements unlocked by this session
    pub unlocked_achievements: Vec<String>,
}

pub struct Game<S: Store> {
    store: S,
    tuning: Tuning,
    settings: Settings,
    history: ScoreHistory,
    achievements: Achievements,
    levels: LevelProgress,
    codex: Codex,
    high_score: u64,
    balance: u64,

    world: Option<World>,
    commands: VecDeque<Command>,
    accumulator: f32,
    finalized: bool,
    last_summary: Option<SessionSummary>,

    seed: u64,
    sessions_started: u64,
}

impl<S: Store> Game<S> {
    /// Load every record from the store
    pub fn new(store: S, tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;

        let history = ScoreHistory::new(store.load_score_history());
        let achievements = Achievements::from_saved(store.load_achievements());
        let levels = LevelProgress::new(store.load_unlocked_levels(), store.load_completed_levels());
        let codex = Codex::new(store.load_codex_entries());
        let settings = store.load_settings();
        let high_score = store.load_high_score();
        let balance = store.load_currency_balance();

        log::info!(
            "Loaded records: {} scores, high score {}, balance {}, stages {:?}",
            history.len(),
            high_score,
            balance,
            levels.unlocked
        );

        Ok(Self {
            store,
            tuning,
            settings,
            history,
            achievements,
            levels,
            codex,
            high_score,
            balance,
            world: None,
            commands: VecDeque::new(),
            accumulator: 0.0,
            finalized: false,
            last_summary: None,
            seed,
            sessions_started: 0,
        })
    }

    /// Start a fresh session at a stage
    ///
    /// Stages below 1 start stage 1. Any session still in progress is
    /// abandoned first; its clocks and queued commands are dropped before the
    /// new session begins.
    pub fn start_stage(&mut self, stage: i32) -> Result<(), GameError> {
        let stage = clamp_stage(i64::from(stage));
        if !self.levels.is_unlocked(stage) {
            return Err(GameError::StageLocked(stage));
        }

        self.abandon_session();

        let seed = self.seed.wrapping_add(self.sessions_started);
        self.sessions_started += 1;

        let mut world = World::new(seed, stage, &self.tuning);
        world.state = GameState::new(stage, &self.tuning).with_records(self.high_score, self.balance);
        world.start();

        self.world = Some(world);
        self.commands.clear();
        self.accumulator = 0.0;
        self.finalized = false;
        self.last_summary = None;

        log::info!("Stage {} ({}) started, seed {}", stage, stage_title(stage), seed);
        Ok(())
    }

    /// Queue an input for the next fixed step
    pub fn post(&mut self, command: Command) {
        if self.world.as_ref().is_some_and(|w| !w.state.is_over()) {
            self.commands.push_back(command);
        }
    }

    /// Run simulation steps for a frame; returns the events they produced
    pub fn update(&mut self, frame_dt: f32) -> Vec<GameEvent> {
        let Some(world) = self.world.as_mut() else {
            return Vec::new();
        };

        let dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += dt;

        let mut quit = false;
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            if self.commands.front() == Some(&Command::Quit) {
                quit = true;
                break;
            }
            let input = next_input(&mut self.commands);
            tick(world, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        let events = world.drain_events();
        for event in &events {
            match event {
                GameEvent::LevelUp { level } => log::info!("Level up: {}", level),
                GameEvent::NewHighScore { score } => log::info!("New high score: {}", score),
                GameEvent::GameOver { reason } => log::info!("Game over: {:?}", reason),
                _ => {}
            }
        }

        if quit {
            self.abandon_session();
        } else if world.state.is_over() {
            self.end_session();
        }
        events
    }

    /// Drop a live session without recording it
    ///
    /// Its peppers, clocks and queued commands go with it; the score, high
    /// score and points it earned are discarded. A session already over is
    /// persisted instead of dropped. Returns true if a live session was
    /// dropped.
    pub fn abandon_session(&mut self) -> bool {
        self.end_session();
        let live = self.is_session_active();
        if live {
            self.world = None;
            log::info!("Session abandoned, nothing recorded");
        }
        self.commands.clear();
        self.accumulator = 0.0;
        live
    }

    /// Persist a finished session
    ///
    /// Only the first call after game over writes anything; later calls and
    /// calls while the session is still live are no-ops. Returns true for
    /// the call that persisted.
    pub fn end_session(&mut self) -> bool {
        let Some(world) = self.world.as_mut() else {
            return false;
        };
        if self.finalized || !world.state.is_over() {
            return false;
        }
        let Some(reason) = world.state.game_over_reason else {
            return false;
        };
        self.finalized = true;
        world.clear_peppers();
        self.commands.clear();

        let state = &world.state;
        let new_high_score = state.high_score > self.high_score;
        self.high_score = self.high_score.max(state.high_score);
        self.balance = state.encyclopedia_points;

        let record = ScoreRecord::new(
            self.settings.player_name.clone(),
            state.score,
            state.level,
            state.peppers_collected,
        );
        let stage = state.stage;

        log::info!(
            "Session over ({:?}): score {}, level {}, {} peppers",
            reason,
            record.score,
            record.level,
            record.peppers_collected
        );

        if let Err(e) = self.store.append_score(&record) {
            log::warn!("Failed to save score record: {}", e);
        }
        self.history.append(record.clone());
        self.save_carried_records();

        let unlocked_achievements = self.achievements.recompute(&self.history.stats(), self.high_score);
        if let Err(e) = self.store.save_achievements(&self.achievements.entries) {
            log::warn!("Failed to save achievements: {}", e);
        }

        self.last_summary = Some(SessionSummary {
            record,
            reason,
            stage,
            new_high_score,
            unlocked_achievements,
        });
        true
    }

    fn save_carried_records(&mut self) {
        if let Err(e) = self.store.save_high_score(self.high_score) {
            log::warn!("Failed to save high score: {}", e);
        }
        if let Err(e) = self.store.save_currency_balance(self.balance) {
            log::warn!("Failed to save encyclopedia balance: {}", e);
        }
    }

    /// Mark the finished session's stage completed
    ///
    /// Returns the stage it unlocked, if any.
    pub fn complete_stage(&mut self) -> Result<Option<u32>, GameError> {
        let stage = match &self.last_summary {
            Some(summary) if self.finalized => summary.stage,
            _ => return Err(GameError::NoFinishedSession),
        };
        let unlocked = self.levels.complete(stage);
        self.store.save_completed_levels(&self.levels.completed)?;
        self.store.save_unlocked_levels(&self.levels.unlocked)?;
        Ok(unlocked)
    }

    /// Spend encyclopedia points on a catalog entry
    ///
    /// Returns the points spent.
    pub fn unlock_codex_entry(&mut self, id: &str) -> Result<u64, GameError> {
        if self.is_session_active() {
            return Err(GameError::SessionInProgress);
        }
        let cost = self.codex.unlock(id, &mut self.balance)?;
        self.store.save_codex_entries(&self.codex.unlocked)?;
        self.store.save_currency_balance(self.balance)?;
        log::info!("Codex entry {} unlocked for {}, balance {}", id, cost, self.balance);
        Ok(cost)
    }

    // === Leaderboard ===

    pub fn leaderboard(&self, order: SortOrder) -> Vec<&ScoreRecord> {
        self.history.sorted(order)
    }

    pub fn career_stats(&self) -> CareerStats {
        self.history.stats()
    }

    /// Remove one score; returns whether it existed
    pub fn delete_score(&mut self, id: Uuid) -> Result<bool, GameError> {
        if self.is_session_active() {
            return Err(GameError::SessionInProgress);
        }
        if !self.history.delete(id) {
            return Ok(false);
        }
        self.store.save_score_history(&self.history.records)?;
        Ok(true)
    }

    /// Wipe the history and the high score
    pub fn clear_scores(&mut self) -> Result<(), GameError> {
        if self.is_session_active() {
            return Err(GameError::SessionInProgress);
        }
        self.history.clear();
        self.high_score = 0;
        self.store.save_score_history(&self.history.records)?;
        self.store.save_high_score(0)?;
        log::info!("Score history cleared");
        Ok(())
    }

    /// Change the player name, including on past scores
    pub fn rename_player(&mut self, name: &str) -> Result<(), GameError> {
        self.settings.set_player_name(name);
        self.history.rename_player(&self.settings.player_name);
        self.store.save_settings(&self.settings)?;
        self.store.save_score_history(&self.history.records)?;
        Ok(())
    }

    pub fn reset_achievements(&mut self) -> Result<(), GameError> {
        self.achievements = Achievements::default();
        self.store.save_achievements(&self.achievements.entries)?;
        Ok(())
    }

    pub fn update_settings(&mut self, settings: Settings) -> Result<(), GameError> {
        self.settings = settings.sanitized();
        self.store.save_settings(&self.settings)?;
        Ok(())
    }

    // === Accessors ===

    pub fn snapshot(&self) -> Option<Snapshot> {
        let world = self.world.as_ref()?;
        let state = &world.state;
        let basket = &world.basket;
        Some(Snapshot {
            score: state.score,
            lives: state.lives,
            level: state.level,
            stage: state.stage,
            time_remaining: state.time_remaining,
            peppers_collected: state.peppers_collected,
            high_score: state.high_score,
            encyclopedia_points: state.encyclopedia_points,
            paused: state.is_paused(),
            game_over: state.is_over(),
            peppers: world
                .peppers
                .iter()
                .map(|p| PepperView {
                    id: p.id,
                    pos: p.pos,
                    tier: p.tier,
                    good: p.good,
                    rotation: p.rotation,
                })
                .collect(),
            basket: BasketView {
                pos: basket.pos(),
                size: basket.size,
                direction: basket.direction,
                flashing: basket.flash > 0.0,
            },
        })
    }

    pub fn is_session_active(&self) -> bool {
        self.world.as_ref().is_some_and(|w| !w.state.is_over())
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn world_mut(&mut self) -> Option<&mut World> {
        self.world.as_mut()
    }

    pub fn last_summary(&self) -> Option<&SessionSummary> {
        self.last_summary.as_ref()
    }

    pub fn history(&self) -> &ScoreHistory {
        &self.history
    }

    pub fn achievements(&self) -> &Achievements {
        &self.achievements
    }

    pub fn levels(&self) -> &LevelProgress {
        &self.levels
    }

    pub fn codex(&self) -> &Codex {
        &self.codex
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn high_score(&self) -> u64 {
        match &self.world {
            Some(world) if !self.finalized => world.state.high_score.max(self.high_score),
            _ => self.high_score,
        }
    }

    /// Encyclopedia points, including those earned by a live session
    pub fn balance(&self) -> u64 {
        match &self.world {
            Some(world) if !self.finalized => world.state.encyclopedia_points,
            _ => self.balance,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the store, abandoning any session in progress
    pub fn into_store(mut self) -> S {
        self.abandon_session();
        self.store
    }
}

/// Pop the commands one tick can apply in their posted order
///
/// A tick applies pause, then tap, each at most once. Commands that would
/// run out of order or repeat wait for the next step; a quit is left at the
/// front for the owner.
fn next_input(commands: &mut VecDeque<Command>) -> TickInput {
    let mut input = TickInput::default();
    while let Some(&command) = commands.front() {
        let slot = match command {
            Command::TogglePause if !input.tap => &mut input.pause,
            Command::Tap => &mut input.tap,
            Command::TogglePause | Command::Quit => break,
        };
        if *slot {
            break;
        }
        *slot = true;
        commands.pop_front();
    }
    input
}
