//! Falling pepper entities
//!
//! A pepper is either a collectible (worth its tier's points) or a bad item
//! that costs a life. Goodness and tier are fixed at creation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Heat tier, ordered by increasing severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Mild,
    Medium,
    Hot,
    VeryHot,
    Extreme,
}

impl Tier {
    /// All tiers, mildest first
    pub const ALL: [Tier; 5] = [
        Tier::Mild,
        Tier::Medium,
        Tier::Hot,
        Tier::VeryHot,
        Tier::Extreme,
    ];

    /// Points awarded for catching a good pepper of this tier
    pub fn points(self) -> u64 {
        match self {
            Tier::Mild => 10,
            Tier::Medium => 25,
            Tier::Hot => 50,
            Tier::VeryHot => 100,
            Tier::Extreme => 200,
        }
    }

    /// 1-based severity rank
    pub fn rank(self) -> u8 {
        self as u8 + 1
    }

    /// Tier for a 1-based rank
    pub fn from_rank(rank: u8) -> Option<Self> {
        Self::ALL.get(usize::from(rank).checked_sub(1)?).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Mild => "Mild",
            Tier::Medium => "Medium",
            Tier::Hot => "Hot",
            Tier::VeryHot => "Very Hot",
            Tier::Extreme => "Extreme",
        }
    }
}

/// A spawned pepper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pepper {
    /// Creation-ordered id (older peppers have smaller ids)
    pub id: u32,
    pub tier: Tier,
    /// Collectible (true) or penalty item (false)
    pub good: bool,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Current spin angle (radians)
    pub rotation: f32,
    /// Spin speed (radians/sec)
    pub angular_vel: f32,
    /// Simulation time at spawn (seconds)
    pub spawned_at: f32,
    /// Lifetime in seconds
    pub ttl: f32,
}

impl Pepper {
    /// Seconds this pepper has been alive at time `now`
    pub fn age(&self, now: f32) -> f32 {
        (now - self.spawned_at).max(0.0)
    }

    /// Whether the pepper has outlived its TTL at time `now`
    pub fn is_expired(&self, now: f32) -> bool {
        self.age(now) >= self.ttl
    }

    /// Points this pepper is worth when caught (0 for bad items)
    pub fn points(&self) -> u64 {
        if self.good { self.tier.points() } else { 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_are_monotonic_in_severity() {
        let points: Vec<u64> = Tier::ALL.iter().map(|t| t.points()).collect();
        assert_eq!(points, vec![10, 25, 50, 100, 200]);
        assert!(points.windows(2).all(|w| w[0] < w[1]));
        assert!(Tier::Mild < Tier::Extreme);
    }

    #[test]
    fn test_rank_round_trip() {
        assert_eq!(Tier::Mild.rank(), 1);
        assert_eq!(Tier::Extreme.rank(), 5);
        assert_eq!(Tier::from_rank(3), Some(Tier::Hot));
        assert_eq!(Tier::from_rank(0), None);
        assert_eq!(Tier::from_rank(6), None);
    }

    #[test]
    fn test_expiry() {
        let pepper = Pepper {
            id: 1,
            tier: Tier::Hot,
            good: false,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            rotation: 0.0,
            angular_vel: 0.0,
            spawned_at: 2.0,
            ttl: 6.0,
        };
        assert!(!pepper.is_expired(7.9));
        assert!(pepper.is_expired(8.0));
        assert_eq!(pepper.points(), 0);
    }
}
