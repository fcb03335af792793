//! Simulation clock
//!
//! Converts fixed simulation steps into the two slower cadences the game
//! needs: spawn opportunities and countdown ticks. Both are measured in
//! simulation time, so they are independent of frame rate and stop while the
//! clock is not advanced (paused or over).

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Cadences that fired during one `advance`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockTicks {
    pub spawn: bool,
    pub countdown: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameClock {
    /// Simulation seconds since the session started running
    pub elapsed: f32,
    spawn_interval: f32,
    countdown_interval: f32,
    spawn_acc: f32,
    countdown_acc: f32,
}

impl GameClock {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            elapsed: 0.0,
            spawn_interval: tuning.spawn_interval,
            countdown_interval: tuning.countdown_interval,
            spawn_acc: 0.0,
            countdown_acc: 0.0,
        }
    }

    /// Advance by one step
    ///
    /// Each cadence fires at most once per call; any extra whole intervals
    /// are dropped rather than queued for catch-up.
    pub fn advance(&mut self, dt: f32) -> ClockTicks {
        let dt = dt.max(0.0);
        self.elapsed += dt;
        self.spawn_acc += dt;
        self.countdown_acc += dt;

        let mut ticks = ClockTicks::default();
        if self.spawn_acc >= self.spawn_interval {
            ticks.spawn = true;
            self.spawn_acc = (self.spawn_acc - self.spawn_interval) % self.spawn_interval;
        }
        if self.countdown_acc >= self.countdown_interval {
            ticks.countdown = true;
            self.countdown_acc =
                (self.countdown_acc - self.countdown_interval) % self.countdown_interval;
        }
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    #[test]
    fn test_one_second_cadence_at_sim_rate() {
        let mut clock = GameClock::new(&Tuning::default());
        let mut spawns = 0;
        let mut countdowns = 0;
        // 10 simulated seconds plus a little slack for float drift
        for _ in 0..601 {
            let ticks = clock.advance(SIM_DT);
            spawns += ticks.spawn as u32;
            countdowns += ticks.countdown as u32;
        }
        assert_eq!(spawns, 10);
        assert_eq!(countdowns, 10);
    }

    #[test]
    fn test_large_step_drops_backlog() {
        let mut clock = GameClock::new(&Tuning::default());
        let ticks = clock.advance(5.5);
        assert!(ticks.spawn);
        assert!(ticks.countdown);
        // The four extra intervals are gone; only the half second remains
        let ticks = clock.advance(0.4);
        assert_eq!(ticks, ClockTicks::default());
        let ticks = clock.advance(0.2);
        assert!(ticks.spawn && ticks.countdown);
    }

    #[test]
    fn test_independent_intervals() {
        let tuning = Tuning {
            spawn_interval: 0.5,
            ..Tuning::default()
        };
        let mut clock = GameClock::new(&tuning);
        let first = clock.advance(0.5);
        assert!(first.spawn && !first.countdown);
        let second = clock.advance(0.5);
        assert!(second.spawn && second.countdown);
    }
}
