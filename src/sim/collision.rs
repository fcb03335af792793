//! Collision detection and response
//!
//! The basket is an axis-aligned rectangle, peppers are circles. Contact
//! resolution is a pure function from the current geometry to an ordered list
//! of effects; applying them is the caller's job.

use glam::Vec2;

use super::basket::Basket;
use super::pepper::{Pepper, Tier};

/// Outcome of the basket touching a pepper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Good pepper caught: score its tier
    Collect { id: u32, tier: Tier },
    /// Bad item caught: lose a life
    Hit { id: u32 },
}

impl Effect {
    pub fn pepper_id(&self) -> u32 {
        match *self {
            Effect::Collect { id, .. } | Effect::Hit { id } => id,
        }
    }

    fn for_pepper(pepper: &Pepper) -> Self {
        if pepper.good {
            Effect::Collect {
                id: pepper.id,
                tier: pepper.tier,
            }
        } else {
            Effect::Hit { id: pepper.id }
        }
    }
}

/// Circle vs axis-aligned rectangle overlap
#[inline]
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect_center: Vec2, half_extents: Vec2) -> bool {
    let closest = center.clamp(rect_center - half_extents, rect_center + half_extents);
    (center - closest).length_squared() <= radius * radius
}

/// Effects for every pepper touching the basket, oldest pepper first
///
/// Each pepper yields at most one effect.
pub fn resolve(basket: &Basket, peppers: &[Pepper], pepper_radius: f32) -> Vec<Effect> {
    let basket_pos = basket.pos();
    let half = basket.half_extents();

    let mut touching: Vec<&Pepper> = peppers
        .iter()
        .filter(|p| circle_rect_overlap(p.pos, pepper_radius, basket_pos, half))
        .collect();
    touching.sort_by_key(|p| p.id);
    touching.dedup_by_key(|p| p.id);

    touching.into_iter().map(Effect::for_pepper).collect()
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Keep a pepper inside the field, bouncing off the walls
///
/// Returns true if a wall was hit.
pub fn bounce_off_walls(pepper: &mut Pepper, field: Vec2, radius: f32, restitution: f32) -> bool {
    let mut hit = false;
    let walls = [
        (pepper.pos.x - radius < 0.0, Vec2::X),
        (pepper.pos.x + radius > field.x, Vec2::NEG_X),
        (pepper.pos.y - radius < 0.0, Vec2::Y),
        (pepper.pos.y + radius > field.y, Vec2::NEG_Y),
    ];
    for (outside, normal) in walls {
        // Only reflect when still moving into the wall
        if outside && pepper.vel.dot(normal) < 0.0 {
            pepper.vel = reflect_velocity(pepper.vel, normal) * restitution;
            hit = true;
        }
    }
    let lo = Vec2::splat(radius).min(field / 2.0);
    let hi = (field - Vec2::splat(radius)).max(field / 2.0);
    pepper.pos = pepper.pos.clamp(lo, hi);
    hit
}
