//! Board state and core simulation types
//!
//! Everything the physics step reads or writes lives here. Nothing in this
//! file knows about rendering.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aim::AimGesture;
use crate::tuning::Tuning;

/// Which kind of disc (selects the shared radius)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscKind {
    Striker,
    Coin,
}

/// Stable identity of a disc on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiscId {
    Striker,
    /// Index into `CarromState::coins`
    Coin(usize),
}

impl DiscId {
    pub fn kind(&self) -> DiscKind {
        match self {
            DiscId::Striker => DiscKind::Striker,
            DiscId::Coin(_) => DiscKind::Coin,
        }
    }
}

/// A disc: position and per-tick velocity, nothing else
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Disc {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Disc {
    /// A disc at rest
    pub fn at(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
        }
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Move by one tick's worth of velocity
    #[inline]
    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }

    /// Multiplicative damping on both axes
    #[inline]
    pub fn apply_friction(&mut self, friction: f32) {
        self.vel *= friction;
    }
}

/// Square board with an inset playable interior
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Board {
    /// Outer edge length
    pub size: f32,
    /// Inset from each outer edge
    pub margin: f32,
}

impl Board {
    pub fn new(size: f32, margin: f32) -> Self {
        Self { size, margin }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(tuning.board_size, tuning.board_margin)
    }

    /// Low wall coordinate (same on both axes)
    #[inline]
    pub fn interior_min(&self) -> f32 {
        self.margin
    }

    /// High wall coordinate (same on both axes)
    #[inline]
    pub fn interior_max(&self) -> f32 {
        self.size - self.margin
    }

    pub fn center(&self) -> Vec2 {
        Vec2::splat(self.size / 2.0)
    }
}

/// Something notable that happened during a tick (for logging/effects)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// Striker velocity replaced by a shot
    Shot { velocity: Vec2 },
    /// Velocity reflected on one or both axes
    WallBounce { disc: DiscId, x: bool, y: bool },
    /// Striker/coin impulse applied
    Collision { coin: usize, angle: f32 },
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarromState {
    pub tuning: Tuning,
    pub board: Board,
    pub striker: Disc,
    /// Coins, updated in order after the striker
    pub coins: Vec<Disc>,
    /// Current aim gesture
    pub aim: AimGesture,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events from the most recent tick
    #[serde(skip)]
    pub events: Vec<SimEvent>,
}

impl CarromState {
    /// Default layout: striker near the bottom, one coin at the center
    pub fn new(tuning: Tuning) -> Self {
        let board = Board::from_tuning(&tuning);
        let center = board.center();
        let striker = Disc::at(Vec2::new(center.x, board.size - 100.0));
        let coins = vec![Disc::at(center)];
        Self::with_discs(tuning, striker, coins)
    }

    /// Explicit layout (used by tests and demos)
    pub fn with_discs(tuning: Tuning, striker: Disc, coins: Vec<Disc>) -> Self {
        Self {
            tuning,
            board: Board::from_tuning(&tuning),
            striker,
            coins,
            aim: AimGesture::Idle,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Shared radius for a kind of disc
    pub fn radius_of(&self, kind: DiscKind) -> f32 {
        match kind {
            DiscKind::Striker => self.tuning.striker_radius,
            DiscKind::Coin => self.tuning.coin_radius,
        }
    }

    pub fn disc(&self, id: DiscId) -> Option<&Disc> {
        match id {
            DiscId::Striker => Some(&self.striker),
            DiscId::Coin(i) => self.coins.get(i),
        }
    }

    /// All discs, striker first then coins in order
    pub fn discs(&self) -> impl Iterator<Item = (DiscId, &Disc)> {
        std::iter::once((DiscId::Striker, &self.striker)).chain(
            self.coins
                .iter()
                .enumerate()
                .map(|(i, c)| (DiscId::Coin(i), c)),
        )
    }

    /// True when every disc is slower than `max_speed`
    ///
    /// Friction never reaches exact zero, so callers pick a threshold.
    pub fn is_settled(&self, max_speed: f32) -> bool {
        self.discs().all(|(_, d)| d.speed() < max_speed)
    }
}
