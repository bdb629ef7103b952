//! Wall reflection and striker/coin contact
//!
//! Both responses are deliberately simple: walls flip a velocity component
//! without pushing the disc back inside, and disc contact exchanges a fixed
//! impulse without separating the discs. A disc can therefore sit past a wall
//! or inside another disc for several ticks, and the response fires again on
//! each of them.

use glam::Vec2;

use super::state::{Board, Disc};
use crate::{distance, polar_to_cartesian, vector_angle};

/// Which axes a disc is touching or past a wall on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WallContact {
    pub x: bool,
    pub y: bool,
}

impl WallContact {
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

/// Per-axis test: extent below the low wall or above the high wall
pub fn wall_contact(pos: Vec2, radius: f32, board: &Board) -> WallContact {
    let lo = board.interior_min();
    let hi = board.interior_max();
    let outside = |c: f32| c - radius < lo || c + radius > hi;
    WallContact {
        x: outside(pos.x),
        y: outside(pos.y),
    }
}

/// Negate the velocity component on every axis in wall contact
///
/// The same negation fires whichever side was crossed, so a disc still
/// past the wall on the next tick flips back toward it.
pub fn reflect_off_walls(disc: &mut Disc, radius: f32, board: &Board) -> WallContact {
    let contact = wall_contact(disc.pos, radius, board);
    if contact.x {
        disc.vel.x = -disc.vel.x;
    }
    if contact.y {
        disc.vel.y = -disc.vel.y;
    }
    contact
}

/// Result of a striker/coin contact check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the discs touch or overlap
    pub hit: bool,
    /// Angle of the striker -> coin vector (radians)
    pub angle: f32,
    /// Unit vector along `angle`
    pub normal: Vec2,
    /// Overlap depth (0 at exact contact)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            angle: 0.0,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Contact when center distance <= sum of radii
pub fn disc_disc_collision(
    striker_pos: Vec2,
    striker_radius: f32,
    coin_pos: Vec2,
    coin_radius: f32,
) -> CollisionResult {
    let dist = distance(striker_pos, coin_pos);
    let reach = striker_radius + coin_radius;
    if dist > reach {
        return CollisionResult::miss();
    }

    // Coincident centers give atan2(0, 0) = 0, i.e. push along +x
    let angle = vector_angle(striker_pos, coin_pos);
    CollisionResult {
        hit: true,
        angle,
        normal: polar_to_cartesian(1.0, angle),
        penetration: reach - dist,
    }
}

/// Fixed impulse along the contact normal: coin gains it, striker loses it
pub fn apply_impulse(striker: &mut Disc, coin: &mut Disc, result: &CollisionResult, magnitude: f32) {
    if !result.hit {
        return;
    }
    let impulse = result.normal * magnitude;
    coin.vel += impulse;
    striker.vel -= impulse;
}
