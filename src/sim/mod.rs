//! Deterministic simulation module
//!
//! All board physics lives here. This module must be pure and deterministic:
//! - Fixed per-tick displacement (no elapsed-time scaling)
//! - Stable iteration order (striker, then coins by index)
//! - No rendering or platform dependencies

pub mod aim;
pub mod collision;
pub mod state;
pub mod tick;

pub use aim::{AimGesture, PointerEvent, shot_strength, shot_velocity};
pub use collision::{
    CollisionResult, WallContact, apply_impulse, disc_disc_collision, reflect_off_walls,
    wall_contact,
};
pub use state::{Board, CarromState, Disc, DiscId, DiscKind, SimEvent};
pub use tick::{TickInput, apply_pointer, step, tick};
