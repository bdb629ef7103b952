//! Retained scene and the disc -> drawable mapping
//!
//! The simulation never holds render handles. After each tick the host calls
//! `SceneSync::sync`, which creates a drawable the first time it sees a disc
//! and moves it afterwards.

use std::collections::HashMap;

use glam::Vec2;

use crate::sim::{Board, CarromState, DiscId, DiscKind};

/// What a render backend must provide
pub trait RenderSurface {
    type Handle: Copy;

    /// Create a filled circle for a disc
    fn create_circle(&mut self, center: Vec2, radius: f32, kind: DiscKind) -> Self::Handle;

    /// Move/resize an existing circle
    fn update_circle(&mut self, handle: Self::Handle, center: Vec2, radius: f32);

    /// Show the aim segment, or remove it with `None`
    fn set_aim_line(&mut self, line: Option<(Vec2, Vec2)>);
}

/// A filled circle in board coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
    pub kind: DiscKind,
}

/// Everything the GPU pipeline draws in one frame
#[derive(Debug, Clone)]
pub struct Scene {
    pub board: Board,
    circles: Vec<Circle>,
    aim_line: Option<(Vec2, Vec2)>,
}

impl Scene {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            circles: Vec::new(),
            aim_line: None,
        }
    }

    pub fn circles(&self) -> &[Circle] {
        &self.circles
    }

    pub fn aim_line(&self) -> Option<(Vec2, Vec2)> {
        self.aim_line
    }
}

impl RenderSurface for Scene {
    type Handle = usize;

    fn create_circle(&mut self, center: Vec2, radius: f32, kind: DiscKind) -> usize {
        self.circles.push(Circle {
            center,
            radius,
            kind,
        });
        self.circles.len() - 1
    }

    fn update_circle(&mut self, handle: usize, center: Vec2, radius: f32) {
        if let Some(circle) = self.circles.get_mut(handle) {
            circle.center = center;
            circle.radius = radius;
        }
    }

    fn set_aim_line(&mut self, line: Option<(Vec2, Vec2)>) {
        self.aim_line = line;
    }
}

/// Render-side map from disc identity to drawable handle
#[derive(Debug)]
pub struct SceneSync<H> {
    handles: HashMap<DiscId, H>,
}

impl<H: Copy> Default for SceneSync<H> {
    fn default() -> Self {
        Self {
            handles: HashMap::new(),
        }
    }
}

impl<H: Copy> SceneSync<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push current disc positions and the aim line to the surface
    pub fn sync<S>(&mut self, state: &CarromState, surface: &mut S)
    where
        S: RenderSurface<Handle = H>,
    {
        for (id, disc) in state.discs() {
            let radius = state.radius_of(id.kind());
            match self.handles.get(&id) {
                Some(&handle) => surface.update_circle(handle, disc.pos, radius),
                None => {
                    let handle = surface.create_circle(disc.pos, radius, id.kind());
                    self.handles.insert(id, handle);
                }
            }
        }
        surface.set_aim_line(state.aim.aim_line(state.striker.pos));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{PointerEvent, TickInput, tick};
    use crate::tuning::Tuning;

    #[test]
    fn test_sync_creates_once_then_updates() {
        let mut state = CarromState::new(Tuning::default());
        let mut scene = Scene::new(state.board);
        let mut sync = SceneSync::new();

        sync.sync(&state, &mut scene);
        assert_eq!(scene.circles().len(), 2);
        assert_eq!(scene.circles()[0].kind, DiscKind::Striker);
        assert_eq!(scene.circles()[0].radius, 15.0);
        assert_eq!(scene.circles()[1].radius, 10.0);

        state.striker.pos = Vec2::new(123.0, 456.0);
        sync.sync(&state, &mut scene);
        assert_eq!(scene.circles().len(), 2);
        assert_eq!(scene.circles()[0].center, Vec2::new(123.0, 456.0));
    }

    #[test]
    fn test_aim_line_drawn_and_removed() {
        let mut state = CarromState::new(Tuning::default());
        let mut scene = Scene::new(state.board);
        let mut sync = SceneSync::new();

        let mut input = TickInput::default();
        input.push(PointerEvent::Down(Vec2::new(300.0, 500.0)));
        input.push(PointerEvent::Drag(Vec2::new(250.0, 420.0)));
        tick(&mut state, &input);
        sync.sync(&state, &mut scene);
        assert_eq!(
            scene.aim_line(),
            Some((state.striker.pos, Vec2::new(250.0, 420.0)))
        );

        input.clear();
        input.push(PointerEvent::Up(Vec2::new(250.0, 420.0)));
        tick(&mut state, &input);
        sync.sync(&state, &mut scene);
        assert_eq!(scene.aim_line(), None);
    }

    #[test]
    fn test_unknown_handle_is_ignored() {
        let mut scene = Scene::new(Board::new(600.0, 50.0));
        scene.update_circle(7, Vec2::ZERO, 1.0);
        assert!(scene.circles().is_empty());
    }
}
