//! Data-driven physics constants
//!
//! Defaults mirror `consts`. A JSON override can be supplied through
//! LocalStorage on the web build; it is validated before use.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Invalid tuning values
#[derive(Debug, Error)]
pub enum TuningError {
    /// A value was NaN or infinite
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },

    /// A value that must be strictly positive was not
    #[error("{field} must be > 0, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    /// Friction outside the open interval (0, 1)
    #[error("friction must be in (0, 1), got {0}")]
    FrictionOutOfRange(f32),

    /// Margin leaves no playable interior
    #[error("board margin {margin} leaves no interior on a board of size {size}")]
    MarginTooLarge { margin: f32, size: f32 },

    /// Malformed JSON override
    #[error("invalid tuning json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Physics tuning, shared by every disc
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Outer board edge length
    pub board_size: f32,
    /// Inset of the playable interior
    pub board_margin: f32,
    pub striker_radius: f32,
    pub coin_radius: f32,
    /// Per-tick velocity multiplier (0 < f < 1)
    pub friction: f32,
    /// Cap on shot speed
    pub speed_limit: f32,
    /// Drag distance divisor for shot strength
    pub shot_distance_divisor: f32,
    /// Velocity exchanged on striker/coin contact
    pub collision_impulse: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            board_size: BOARD_SIZE,
            board_margin: BOARD_MARGIN,
            striker_radius: STRIKER_RADIUS,
            coin_radius: COIN_RADIUS,
            friction: FRICTION,
            speed_limit: SPEED_LIMIT,
            shot_distance_divisor: SHOT_DISTANCE_DIVISOR,
            collision_impulse: COLLISION_IMPULSE,
        }
    }
}

impl Tuning {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "carrom_tuning";

    /// Parse a JSON override; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check every value is usable by the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        let fields = [
            ("board_size", self.board_size),
            ("board_margin", self.board_margin),
            ("striker_radius", self.striker_radius),
            ("coin_radius", self.coin_radius),
            ("friction", self.friction),
            ("speed_limit", self.speed_limit),
            ("shot_distance_divisor", self.shot_distance_divisor),
            ("collision_impulse", self.collision_impulse),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(TuningError::NotFinite { field, value });
            }
        }

        let positive = [
            ("board_size", self.board_size),
            ("striker_radius", self.striker_radius),
            ("coin_radius", self.coin_radius),
            ("speed_limit", self.speed_limit),
            ("shot_distance_divisor", self.shot_distance_divisor),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        if self.friction <= 0.0 || self.friction >= 1.0 {
            return Err(TuningError::FrictionOutOfRange(self.friction));
        }

        if self.board_margin < 0.0 || self.board_margin * 2.0 >= self.board_size {
            return Err(TuningError::MarginTooLarge {
                margin: self.board_margin,
                size: self.board_size,
            });
        }

        Ok(())
    }

    /// Load a tuning override from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning override from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring tuning override: {}", e),
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
