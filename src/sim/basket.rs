//! Basket motion
//!
//! The basket patrols a rectangle inset from the field edges. Its position is
//! tracked as a distance along the loop, starting at the bottom-left corner
//! and running right along the bottom edge, up the right edge, left along the
//! top and back down. A tap reverses the direction of travel in place.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Direction of travel around the patrol loop (y axis up)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Bottom edge left-to-right first
    CounterClockwise,
    Clockwise,
}

impl Direction {
    #[inline]
    fn sign(self) -> f32 {
        match self {
            Direction::CounterClockwise => 1.0,
            Direction::Clockwise => -1.0,
        }
    }

    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Direction::CounterClockwise => Direction::Clockwise,
            Direction::Clockwise => Direction::CounterClockwise,
        }
    }
}

/// The player's basket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Basket {
    /// Distance travelled along the loop, in `[0, perimeter)`
    pub distance: f32,
    pub direction: Direction,
    /// Collision rectangle size
    pub size: Vec2,
    /// Remaining tap acknowledgement time (presentation only)
    pub flash: f32,
    /// Patrol rectangle corners
    min: Vec2,
    max: Vec2,
    base_speed: f32,
    flash_duration: f32,
}

impl Basket {
    /// Basket at the middle of the bottom edge
    pub fn new(tuning: &Tuning) -> Self {
        let min = Vec2::new(tuning.margin_x, tuning.margin_y);
        let max = Vec2::new(
            tuning.field_width - tuning.margin_x,
            tuning.field_height - tuning.margin_y,
        );
        Self {
            distance: (max.x - min.x) / 2.0,
            direction: Direction::CounterClockwise,
            size: Vec2::new(tuning.basket_width, tuning.basket_height),
            flash: 0.0,
            min,
            max,
            base_speed: tuning.basket_base_speed(),
            flash_duration: tuning.basket_flash_seconds,
        }
    }

    /// Loop length
    pub fn perimeter(&self) -> f32 {
        let span = self.max - self.min;
        2.0 * (span.x + span.y)
    }

    /// Travel speed at a difficulty multiplier (slower as difficulty rises)
    pub fn speed(&self, difficulty: f32) -> f32 {
        self.base_speed / difficulty.max(1.0)
    }

    /// Reverse direction; applies from the next `advance`
    pub fn reverse(&mut self) {
        self.direction = self.direction.reversed();
        self.flash = self.flash_duration;
    }

    /// Move along the loop
    pub fn advance(&mut self, dt: f32, difficulty: f32) {
        let perimeter = self.perimeter();
        if perimeter > 0.0 {
            let step = self.direction.sign() * self.speed(difficulty) * dt;
            self.distance = (self.distance + step).rem_euclid(perimeter);
        }
        self.flash = (self.flash - dt).max(0.0);
    }

    /// Center of the basket
    pub fn pos(&self) -> Vec2 {
        let span = self.max - self.min;
        let mut d = self.distance;

        if d <= span.x {
            return Vec2::new(self.min.x + d, self.min.y);
        }
        d -= span.x;
        if d <= span.y {
            return Vec2::new(self.max.x, self.min.y + d);
        }
        d -= span.y;
        if d <= span.x {
            return Vec2::new(self.max.x - d, self.max.y);
        }
        d -= span.x;
        Vec2::new(self.min.x, (self.max.y - d).max(self.min.y))
    }

    /// Half the collision rectangle
    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.size / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 0.05
    }

    #[test]
    fn test_starts_bottom_center() {
        let basket = Basket::new(&Tuning::default());
        assert!(approx(basket.pos(), Vec2::new(195.0, 80.0)));
        assert_eq!(basket.direction, Direction::CounterClockwise);
    }

    #[test]
    fn test_path_corners() {
        let mut basket = Basket::new(&Tuning::default());
        basket.distance = 0.0;
        assert!(approx(basket.pos(), Vec2::new(50.0, 80.0)));
        basket.distance = 290.0;
        assert!(approx(basket.pos(), Vec2::new(340.0, 80.0)));
        basket.distance = 290.0 + 684.0;
        assert!(approx(basket.pos(), Vec2::new(340.0, 764.0)));
        basket.distance = 290.0 * 2.0 + 684.0;
        assert!(approx(basket.pos(), Vec2::new(50.0, 764.0)));
        basket.distance = 290.0 * 2.0 + 684.0 * 1.5;
        assert!(approx(basket.pos(), Vec2::new(50.0, 422.0)));
    }

    #[test]
    fn test_full_lap_at_base_difficulty() {
        let tuning = Tuning::default();
        let mut basket = Basket::new(&tuning);
        let start = basket.pos();
        // 10 second lap at difficulty 1.0
        for _ in 0..100 {
            basket.advance(0.1, 1.0);
        }
        assert!(approx(basket.pos(), start));
    }

    #[test]
    fn test_reverse_retraces_path() {
        let mut basket = Basket::new(&Tuning::default());
        let start = basket.pos();
        basket.advance(0.5, 1.0);
        assert!(basket.pos().x > start.x);
        basket.reverse();
        assert_eq!(basket.direction, Direction::Clockwise);
        assert!(basket.flash > 0.0);
        basket.advance(0.5, 1.0);
        assert!(approx(basket.pos(), start));
        assert_eq!(basket.flash, 0.0);
    }

    #[test]
    fn test_wraps_below_zero() {
        let mut basket = Basket::new(&Tuning::default());
        basket.distance = 1.0;
        basket.reverse();
        basket.advance(0.1, 1.0);
        assert!(basket.distance > basket.perimeter() - 20.0);
        assert!(basket.distance < basket.perimeter());
    }

    #[test]
    fn test_higher_difficulty_is_slower() {
        let basket = Basket::new(&Tuning::default());
        assert!(basket.speed(2.5) < basket.speed(1.3));
        // Degenerate multipliers never speed the basket up
        assert_eq!(basket.speed(0.0), basket.speed(1.0));
    }
}
