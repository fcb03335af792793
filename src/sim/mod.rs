//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by pepper ID)
//! - No persistence or platform dependencies

pub mod basket;
pub mod clock;
pub mod collision;
pub mod pepper;
pub mod spawn;
pub mod state;
pub mod tick;

pub use basket::{Basket, Direction};
pub use clock::{ClockTicks, GameClock};
pub use collision::{Effect, circle_rect_overlap, resolve};
pub use pepper::{Pepper, Tier};
pub use spawn::SpawnPolicy;
pub use state::{GameEvent, GameOverReason, GamePhase, GameState};
pub use tick::{TickInput, World, tick};
