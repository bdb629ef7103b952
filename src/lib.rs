//! Carrom - a tiny carrom board physics toy
//!
//! Core modules:
//! - `sim`: Deterministic simulation (discs, walls, collisions, aim gesture)
//! - `renderer`: WebGPU rendering pipeline and render-side disc mapping
//! - `platform`: Browser input bookkeeping
//! - `tuning`: Data-driven physics constants

pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal delay between simulation ticks (ms)
    pub const TICK_INTERVAL_MS: f32 = 16.0;
    /// Fixed simulation timestep in seconds (host loop accumulator unit)
    pub const SIM_DT: f32 = TICK_INTERVAL_MS / 1000.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Outer board edge length
    pub const BOARD_SIZE: f32 = 600.0;
    /// Inset from the outer edge to the playable interior
    pub const BOARD_MARGIN: f32 = 50.0;

    /// Disc radii
    pub const STRIKER_RADIUS: f32 = 15.0;
    pub const COIN_RADIUS: f32 = 10.0;

    /// Per-tick multiplicative velocity decay
    pub const FRICTION: f32 = 0.98;
    /// Maximum speed a shot can give the striker
    pub const SPEED_LIMIT: f32 = 15.0;
    /// Drag distance is divided by this to get shot strength
    pub const SHOT_DISTANCE_DIVISOR: f32 = 10.0;
    /// Fixed velocity exchanged on striker/coin contact
    pub const COLLISION_IMPULSE: f32 = 2.0;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// Angle of the vector from `from` to `to` (atan2, radians)
#[inline]
pub fn vector_angle(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
