//! Raw pointer callbacks -> simulation pointer events

use glam::Vec2;

use crate::sim::PointerEvent;

/// Tracks the primary button so only held moves become drags
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerTracker {
    down: bool,
}

impl PointerTracker {
    pub fn is_down(&self) -> bool {
        self.down
    }

    pub fn press(&mut self, p: Vec2) -> Option<PointerEvent> {
        if !p.is_finite() {
            return None;
        }
        self.down = true;
        Some(PointerEvent::Down(p))
    }

    /// Hover moves with no button held are dropped
    pub fn moved(&mut self, p: Vec2) -> Option<PointerEvent> {
        if !self.down || !p.is_finite() {
            return None;
        }
        Some(PointerEvent::Drag(p))
    }

    pub fn release(&mut self, p: Vec2) -> Option<PointerEvent> {
        self.down = false;
        if !p.is_finite() {
            return None;
        }
        Some(PointerEvent::Up(p))
    }

    /// Browser took the pointer away (pointercancel / lostpointercapture).
    /// No shot is fired; the next press starts a fresh gesture.
    pub fn cancel(&mut self) {
        self.down = false;
    }
}

/// Canvas backing-store size for a CSS size and device pixel ratio
pub fn backing_size(client_w: i32, client_h: i32, dpr: f64) -> (u32, u32) {
    let scale = |v: i32| (v.max(0) as f64 * dpr).round() as u32;
    (scale(client_w), scale(client_h))
}
