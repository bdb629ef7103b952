//! Screen <-> board coordinate mapping
//!
//! The square board is scaled to fit the shorter screen side and centered
//! along the longer one. The shader applies the same transform.

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Screen size in pixels
    pub size: Vec2,
    /// Board edge length in board units
    pub board_size: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, board_size: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            board_size,
        }
    }

    /// `None` for an empty or non-finite screen, which has no usable scale
    pub fn try_new(width: f32, height: f32, board_size: f32) -> Option<Self> {
        let usable = |v: f32| v.is_finite() && v > 0.0;
        if usable(width) && usable(height) && usable(board_size) {
            Some(Self::new(width, height, board_size))
        } else {
            None
        }
    }

    /// Pixels per board unit
    pub fn scale(&self) -> f32 {
        self.size.min_element() / self.board_size
    }

    /// Screen position of the board origin
    pub fn offset(&self) -> Vec2 {
        (self.size - Vec2::splat(self.board_size * self.scale())) / 2.0
    }

    pub fn screen_to_board(&self, p: Vec2) -> Vec2 {
        (p - self.offset()) / self.scale()
    }
}
