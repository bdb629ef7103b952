//! Aim-and-release gesture
//!
//! Idle --press--> Dragging --drag--> Dragging --release--> Idle (shot fired).
//! Only the release point matters for the shot; the press point is kept as
//! the notional aim origin.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Disc;
use crate::tuning::Tuning;
use crate::{distance, polar_to_cartesian, vector_angle};

/// Pointer input in board coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down(Vec2),
    Drag(Vec2),
    Up(Vec2),
}

/// Transient aim state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum AimGesture {
    #[default]
    Idle,
    Dragging {
        /// Where the press happened
        press: Vec2,
        /// Live pointer, set by the first drag
        pointer: Option<Vec2>,
    },
}

impl AimGesture {
    pub fn press(&mut self, point: Vec2) {
        *self = AimGesture::Dragging {
            press: point,
            pointer: None,
        };
    }

    /// Track the pointer. A drag with no prior press starts the gesture there.
    pub fn drag(&mut self, point: Vec2) {
        match self {
            AimGesture::Dragging { pointer, .. } => *pointer = Some(point),
            AimGesture::Idle => {
                *self = AimGesture::Dragging {
                    press: point,
                    pointer: Some(point),
                }
            }
        }
    }

    /// End the gesture and give the striker its shot velocity.
    ///
    /// Fires from any state: a release always shoots. The striker's current
    /// velocity is replaced, not added to.
    pub fn release(&mut self, point: Vec2, striker: &mut Disc, tuning: &Tuning) -> Vec2 {
        *self = AimGesture::Idle;
        striker.vel = shot_velocity(striker.pos, point, tuning);
        striker.vel
    }

    /// Segment from the striker's current center to the live pointer
    pub fn aim_line(&self, striker_pos: Vec2) -> Option<(Vec2, Vec2)> {
        match self {
            AimGesture::Dragging {
                pointer: Some(p), ..
            } => Some((striker_pos, *p)),
            _ => None,
        }
    }
}

/// `min(distance / divisor, speed_limit)`
pub fn shot_strength(striker_pos: Vec2, release: Vec2, tuning: &Tuning) -> f32 {
    (distance(striker_pos, release) / tuning.shot_distance_divisor).min(tuning.speed_limit)
}

/// Velocity pointing from the striker toward the release point
pub fn shot_velocity(striker_pos: Vec2, release: Vec2, tuning: &Tuning) -> Vec2 {
    let angle = vector_angle(striker_pos, release);
    polar_to_cartesian(shot_strength(striker_pos, release, tuning), angle)
}
