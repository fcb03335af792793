//! Spawn policy
//!
//! Decides what comes out of the emitter each spawn opportunity. All
//! randomness comes from a seeded PCG stream so a session replays exactly
//! from its seed.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::pepper::{Pepper, Tier};
use super::state::GameState;
use crate::polar_to_cartesian;
use crate::tuning::Tuning;

#[derive(Debug, Clone)]
pub struct SpawnPolicy {
    rng: Pcg32,
    next_id: u32,
    /// Where every pepper starts (field center)
    emission_point: Vec2,
    speed_min: f32,
    speed_max: f32,
    max_angular_speed: f32,
    good_chance: f32,
    ttl: f32,
}

impl SpawnPolicy {
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            emission_point: Vec2::new(tuning.field_width / 2.0, tuning.field_height / 2.0),
            speed_min: tuning.spawn_speed_min,
            speed_max: tuning.spawn_speed_max,
            max_angular_speed: tuning.max_angular_speed,
            good_chance: tuning.good_chance,
            ttl: tuning.pepper_ttl,
        }
    }

    #[inline]
    pub fn emission_point(&self) -> Vec2 {
        self.emission_point
    }

    /// One spawn opportunity
    ///
    /// Produces nothing unless the session is running; a skipped opportunity
    /// is gone for good.
    pub fn tick(&mut self, now: f32, state: &GameState) -> Option<Pepper> {
        if !state.is_running() {
            return None;
        }

        let good = self.rng.random::<f32>() < self.good_chance;
        let tier = Tier::ALL[self.rng.random_range(0..Tier::ALL.len())];

        let speed = self.rng.random_range(self.speed_min..=self.speed_max) * state.difficulty();
        let heading = self.rng.random_range(0.0..std::f32::consts::TAU);
        let angular_vel = self
            .rng
            .random_range(-self.max_angular_speed..=self.max_angular_speed);

        let id = self.next_id;
        self.next_id += 1;

        Some(Pepper {
            id,
            tier,
            good,
            pos: self.emission_point,
            vel: polar_to_cartesian(speed, heading),
            rotation: 0.0,
            angular_vel,
            spawned_at: now,
            ttl: self.ttl,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_state() -> GameState {
        let mut state = GameState::new(1, &Tuning::default());
        state.start();
        state
    }

    #[test]
    fn test_spawn_suppressed_while_paused() {
        let tuning = Tuning::default();
        let mut policy = SpawnPolicy::new(7, &tuning);
        let mut state = running_state();
        state.toggle_pause();
        for i in 0..1000 {
            assert!(policy.tick(i as f32, &state).is_none());
        }
    }

    #[test]
    fn test_spawn_suppressed_when_not_running() {
        let tuning = Tuning::default();
        let mut policy = SpawnPolicy::new(7, &tuning);
        let mut state = GameState::new(1, &tuning);
        assert!(policy.tick(0.0, &state).is_none());
        state.start();
        for _ in 0..tuning.starting_lives {
            state.collect_bad();
        }
        assert!(state.is_over());
        assert!(policy.tick(1.0, &state).is_none());
    }

    #[test]
    fn test_spawn_kinematics_within_ranges() {
        let tuning = Tuning::default();
        let mut policy = SpawnPolicy::new(42, &tuning);
        let state = running_state();
        let difficulty = state.difficulty();
        for i in 0..500 {
            let pepper = policy.tick(i as f32, &state).expect("running state spawns");
            assert_eq!(pepper.pos, policy.emission_point());
            let speed = pepper.vel.length();
            assert!(speed >= tuning.spawn_speed_min * difficulty - 0.01);
            assert!(speed <= tuning.spawn_speed_max * difficulty + 0.01);
            assert!(pepper.angular_vel.abs() <= tuning.max_angular_speed);
            assert_eq!(pepper.ttl, tuning.pepper_ttl);
            assert_eq!(pepper.spawned_at, i as f32);
        }
    }

    #[test]
    fn test_ids_are_creation_ordered() {
        let tuning = Tuning::default();
        let mut policy = SpawnPolicy::new(1, &tuning);
        let state = running_state();
        let ids: Vec<u32> = (0..5)
            .filter_map(|i| policy.tick(i as f32, &state))
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_goodness_ratio_and_tier_spread() {
        let tuning = Tuning::default();
        let mut policy = SpawnPolicy::new(2024, &tuning);
        let state = running_state();
        let samples = 10_000;
        let mut good = 0;
        let mut per_tier = [0u32; 5];
        for i in 0..samples {
            let pepper = policy.tick(i as f32, &state).unwrap();
            good += pepper.good as u32;
            per_tier[(pepper.tier.rank() - 1) as usize] += 1;
        }
        let ratio = good as f32 / samples as f32;
        assert!((0.77..=0.83).contains(&ratio), "good ratio {ratio}");
        for count in per_tier {
            assert!((1700..=2300).contains(&count), "tier count {count}");
        }
    }

    #[test]
    fn test_same_seed_same_stream() {
        let tuning = Tuning::default();
        let state = running_state();
        let mut a = SpawnPolicy::new(99, &tuning);
        let mut b = SpawnPolicy::new(99, &tuning);
        for i in 0..20 {
            let pa = a.tick(i as f32, &state).unwrap();
            let pb = b.tick(i as f32, &state).unwrap();
            assert_eq!(pa.tier, pb.tier);
            assert_eq!(pa.good, pb.good);
            assert_eq!(pa.vel, pb.vel);
        }
    }
}
