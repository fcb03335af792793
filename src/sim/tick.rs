//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation deterministically. The frame
//! physics, the spawn cadence and the countdown cadence all run inside
//! `tick`, in a fixed order, so they never race each other:
//!
//! 1. commands (pause, tap)
//! 2. kinematics (peppers, basket)
//! 3. collisions, oldest pepper first
//! 4. expiry
//! 5. spawn opportunity
//! 6. countdown
//!
//! Collisions therefore land before the countdown can end the session.

use glam::Vec2;

use super::basket::Basket;
use super::clock::GameClock;
use super::collision::{Effect, bounce_off_walls, resolve};
use super::pepper::Pepper;
use super::spawn::SpawnPolicy;
use super::state::{GameEvent, GameState};
use crate::tuning::Tuning;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Reverse the basket
    pub tap: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Everything a running session simulates
#[derive(Debug, Clone)]
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    pub state: GameState,
    /// Active peppers (sorted by id for determinism)
    pub peppers: Vec<Pepper>,
    pub basket: Basket,
    pub clock: GameClock,
    spawner: SpawnPolicy,
    field: Vec2,
    pepper_radius: f32,
    wall_restitution: f32,
    linear_damping: f32,
    angular_damping: f32,
}

impl World {
    /// Create a world for a stage; call `start` to begin play
    pub fn new(seed: u64, stage: u32, tuning: &Tuning) -> Self {
        Self {
            seed,
            state: GameState::new(stage, tuning),
            peppers: Vec::new(),
            basket: Basket::new(tuning),
            clock: GameClock::new(tuning),
            spawner: SpawnPolicy::new(seed, tuning),
            field: Vec2::new(tuning.field_width, tuning.field_height),
            pepper_radius: tuning.pepper_radius,
            wall_restitution: tuning.wall_restitution,
            linear_damping: tuning.linear_damping,
            angular_damping: tuning.angular_damping,
        }
    }

    pub fn start(&mut self) -> bool {
        self.state.start()
    }

    #[inline]
    pub fn pepper_radius(&self) -> f32 {
        self.pepper_radius
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }

    /// Drop every pepper (session over or torn down)
    pub fn clear_peppers(&mut self) {
        self.peppers.clear();
    }

    fn integrate(&mut self, dt: f32) {
        let linear_keep = (1.0 - self.linear_damping * dt).max(0.0);
        let angular_keep = (1.0 - self.angular_damping * dt).max(0.0);
        for pepper in &mut self.peppers {
            pepper.pos += pepper.vel * dt;
            pepper.vel *= linear_keep;
            pepper.rotation = (pepper.rotation + pepper.angular_vel * dt)
                .rem_euclid(std::f32::consts::TAU);
            pepper.angular_vel *= angular_keep;
            bounce_off_walls(pepper, self.field, self.pepper_radius, self.wall_restitution);
        }
        let difficulty = self.state.difficulty();
        self.basket.advance(dt, difficulty);
    }

    fn apply_collisions(&mut self) {
        let effects = resolve(&self.basket, &self.peppers, self.pepper_radius);
        for effect in effects {
            if !self.state.is_running() {
                break;
            }
            let id = effect.pepper_id();
            match effect {
                Effect::Collect { tier, .. } => {
                    self.state.events.push(GameEvent::Collected {
                        id,
                        tier,
                        points: tier.points(),
                    });
                    self.state.collect_good(tier);
                    log::debug!("Caught {} pepper #{}", tier.as_str(), id);
                }
                Effect::Hit { .. } => {
                    let lives_left = self.state.lives.saturating_sub(1);
                    self.state.events.push(GameEvent::Hit { id, lives_left });
                    self.state.collect_bad();
                    log::debug!("Caught bad item #{} ({} lives left)", id, lives_left);
                }
            }
            self.peppers.retain(|p| p.id != id);
        }
    }

    fn expire(&mut self, now: f32) {
        let events = &mut self.state.events;
        self.peppers.retain(|p| {
            let expired = p.is_expired(now);
            if expired {
                events.push(GameEvent::Expired { id: p.id });
            }
            !expired
        });
    }
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &TickInput, dt: f32) {
    if input.pause {
        world.state.toggle_pause();
    }

    // Paused, over or not started: nothing advances
    if !world.state.is_running() {
        return;
    }

    if input.tap {
        world.basket.reverse();
        world.state.events.push(GameEvent::DirectionReversed);
    }

    let ticks = world.clock.advance(dt);
    let now = world.clock.elapsed;

    world.integrate(dt);

    world.apply_collisions();
    if world.state.is_over() {
        world.clear_peppers();
        return;
    }

    world.expire(now);

    if ticks.spawn
        && let Some(pepper) = world.spawner.tick(now, &world.state)
    {
        world.state.events.push(GameEvent::Spawned {
            id: pepper.id,
            tier: pepper.tier,
            good: pepper.good,
        });
        world.peppers.push(pepper);
    }

    if ticks.countdown {
        world.state.tick_timer();
        if world.state.is_over() {
            world.clear_peppers();
        }
    }
}
