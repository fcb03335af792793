//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads lives here so balance can be
//! tweaked from a JSON file without touching code.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid tuning values
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("`{field}` must be {requirement} (got {value})")]
    OutOfRange {
        field: &'static str,
        requirement: &'static str,
        value: f32,
    },
}

/// Gameplay balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Play-field size (origin at bottom-left)
    pub field_width: f32,
    pub field_height: f32,
    /// Inset of the basket patrol rectangle from the field edges
    pub margin_x: f32,
    pub margin_y: f32,

    /// Basket collision rectangle
    pub basket_width: f32,
    pub basket_height: f32,
    /// Seconds for one full lap of the patrol at difficulty 1.0
    pub basket_lap_seconds: f32,
    /// Length of the tap acknowledgement flash (presentation only)
    pub basket_flash_seconds: f32,

    /// Pepper collision radius
    pub pepper_radius: f32,
    /// Seconds an uncollected pepper stays alive
    pub pepper_ttl: f32,
    /// Base launch speed range, scaled by difficulty
    pub spawn_speed_min: f32,
    pub spawn_speed_max: f32,
    /// Spin range (radians/sec, symmetric)
    pub max_angular_speed: f32,
    /// Probability that a spawn is a good pepper
    pub good_chance: f32,
    /// Velocity kept after bouncing off a field wall
    pub wall_restitution: f32,
    /// Linear velocity decay per second
    pub linear_damping: f32,
    /// Angular velocity decay per second
    pub angular_damping: f32,

    /// Seconds between spawn opportunities
    pub spawn_interval: f32,
    /// Seconds between countdown ticks
    pub countdown_interval: f32,
    /// Countdown length in ticks
    pub session_seconds: u32,
    /// Lives at session start
    pub starting_lives: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: 390.0,
            field_height: 844.0,
            margin_x: 50.0,
            margin_y: 80.0,

            basket_width: 80.0,
            basket_height: 60.0,
            basket_lap_seconds: 10.0,
            basket_flash_seconds: 0.2,

            pepper_radius: 20.0,
            pepper_ttl: 6.0,
            spawn_speed_min: 200.0,
            spawn_speed_max: 400.0,
            max_angular_speed: 5.0,
            good_chance: 0.8,
            wall_restitution: 0.7,
            linear_damping: 0.05,
            angular_damping: 0.1,

            spawn_interval: 1.0,
            countdown_interval: 1.0,
            session_seconds: 60,
            starting_lives: 3,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("field_width", self.field_width)?;
        positive("field_height", self.field_height)?;
        non_negative("margin_x", self.margin_x)?;
        non_negative("margin_y", self.margin_y)?;
        if self.margin_x * 2.0 >= self.field_width {
            return Err(out_of_range("margin_x", "less than half the field width", self.margin_x));
        }
        if self.margin_y * 2.0 >= self.field_height {
            return Err(out_of_range("margin_y", "less than half the field height", self.margin_y));
        }

        positive("basket_width", self.basket_width)?;
        positive("basket_height", self.basket_height)?;
        positive("basket_lap_seconds", self.basket_lap_seconds)?;
        non_negative("basket_flash_seconds", self.basket_flash_seconds)?;

        positive("pepper_radius", self.pepper_radius)?;
        positive("pepper_ttl", self.pepper_ttl)?;
        non_negative("spawn_speed_min", self.spawn_speed_min)?;
        if self.spawn_speed_max < self.spawn_speed_min {
            return Err(out_of_range(
                "spawn_speed_max",
                "at least spawn_speed_min",
                self.spawn_speed_max,
            ));
        }
        non_negative("max_angular_speed", self.max_angular_speed)?;
        unit("good_chance", self.good_chance)?;
        unit("wall_restitution", self.wall_restitution)?;
        non_negative("linear_damping", self.linear_damping)?;
        non_negative("angular_damping", self.angular_damping)?;

        positive("spawn_interval", self.spawn_interval)?;
        positive("countdown_interval", self.countdown_interval)?;
        if self.session_seconds == 0 {
            return Err(out_of_range("session_seconds", "at least 1", 0.0));
        }
        if self.starting_lives == 0 {
            return Err(out_of_range("starting_lives", "at least 1", 0.0));
        }
        Ok(())
    }

    /// Length of the basket patrol loop
    pub fn patrol_perimeter(&self) -> f32 {
        let w = self.field_width - 2.0 * self.margin_x;
        let h = self.field_height - 2.0 * self.margin_y;
        2.0 * (w + h)
    }

    /// Basket speed (units/sec) before difficulty scaling
    pub fn basket_base_speed(&self) -> f32 {
        self.patrol_perimeter() / self.basket_lap_seconds
    }
}

fn out_of_range(field: &'static str, requirement: &'static str, value: f32) -> TuningError {
    TuningError::OutOfRange {
        field,
        requirement,
        value,
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    // Written as a negated comparison so NaN is rejected too
    if !(value > 0.0) {
        return Err(out_of_range(field, "positive", value));
    }
    Ok(())
}

fn non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if !(value >= 0.0) {
        return Err(out_of_range(field, "non-negative", value));
    }
    Ok(())
}

fn unit(field: &'static str, value: f32) -> Result<(), TuningError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(out_of_range(field, "within 0..=1", value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_from_json_partial_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "spawn_interval": 0.5, "starting_lives": 5 }"#)
            .expect("valid tuning");
        assert_eq!(tuning.spawn_interval, 0.5);
        assert_eq!(tuning.starting_lives, 5);
        assert_eq!(tuning.session_seconds, 60);
        assert_eq!(tuning.pepper_ttl, 6.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Tuning::from_json(r#"{ "good_chance": 1.5 }"#).unwrap_err();
        assert!(matches!(err, TuningError::OutOfRange { field: "good_chance", .. }));

        let err = Tuning::from_json(r#"{ "spawn_speed_min": 500.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::OutOfRange { field: "spawn_speed_max", .. }));

        let err = Tuning::from_json(r#"{ "margin_x": 300.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::OutOfRange { field: "margin_x", .. }));

        assert!(matches!(
            Tuning::from_json("not json").unwrap_err(),
            TuningError::Parse(_)
        ));
    }

    #[test]
    fn test_basket_base_speed() {
        let tuning = Tuning::default();
        // (290 + 684) * 2 = 1948 units per 10 second lap
        assert!((tuning.patrol_perimeter() - 1948.0).abs() < 1e-3);
        assert!((tuning.basket_base_speed() - 194.8).abs() < 1e-3);
    }
}
