//! Fixed-cadence simulation tick
//!
//! `step` is the pure physics update; `tick` applies queued pointer input
//! first so input and physics never interleave mid-step.

use super::aim::PointerEvent;
use super::collision::{apply_impulse, disc_disc_collision, reflect_off_walls};
use super::state::{CarromState, Disc, DiscId, DiscKind, SimEvent};

/// Input gathered since the previous tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer events in arrival order
    pub pointer: Vec<PointerEvent>,
}

impl TickInput {
    pub fn push(&mut self, event: PointerEvent) {
        self.pointer.push(event);
    }

    pub fn clear(&mut self) {
        self.pointer.clear();
    }
}

/// Apply one pointer event to the aim gesture (and the striker on release)
pub fn apply_pointer(state: &mut CarromState, event: PointerEvent) {
    match event {
        PointerEvent::Down(p) => state.aim.press(p),
        PointerEvent::Drag(p) => state.aim.drag(p),
        PointerEvent::Up(p) => {
            let velocity = state.aim.release(p, &mut state.striker, &state.tuning);
            state.events.push(SimEvent::Shot { velocity });
        }
    }
}

/// Apply queued input, then advance one tick
pub fn tick(state: &mut CarromState, input: &TickInput) {
    state.events.clear();
    for event in &input.pointer {
        apply_pointer(state, *event);
    }
    advance(state);
}

/// Advance the board by one tick with no input
pub fn step(state: &mut CarromState) {
    state.events.clear();
    advance(state);
}

fn advance(state: &mut CarromState) {
    state.time_ticks += 1;

    let friction = state.tuning.friction;
    let striker_radius = state.radius_of(DiscKind::Striker);
    let coin_radius = state.radius_of(DiscKind::Coin);
    let board = state.board;

    // Striker first, then coins in order
    let move_disc = |id: DiscId, disc: &mut Disc, radius: f32, events: &mut Vec<SimEvent>| {
        disc.integrate();
        disc.apply_friction(friction);
        let contact = reflect_off_walls(disc, radius, &board);
        if contact.any() {
            events.push(SimEvent::WallBounce {
                disc: id,
                x: contact.x,
                y: contact.y,
            });
        }
    };

    move_disc(DiscId::Striker, &mut state.striker, striker_radius, &mut state.events);
    for (i, coin) in state.coins.iter_mut().enumerate() {
        move_disc(DiscId::Coin(i), coin, coin_radius, &mut state.events);
    }

    let impulse = state.tuning.collision_impulse;
    for (i, coin) in state.coins.iter_mut().enumerate() {
        let result = disc_disc_collision(state.striker.pos, striker_radius, coin.pos, coin_radius);
        if result.hit {
            apply_impulse(&mut state.striker, coin, &result, impulse);
            log::trace!("striker hit coin {} at angle {:.3}", i, result.angle);
            state.events.push(SimEvent::Collision {
                coin: i,
                angle: result.angle,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::AimGesture;
    use crate::tuning::Tuning;
    use glam::Vec2;
    use proptest::prelude::*;

    fn state_with(striker: Disc, coins: Vec<Disc>) -> CarromState {
        CarromState::with_discs(Tuning::default(), striker, coins)
    }

    #[test]
    fn test_rest_is_fixed_point() {
        let mut state = CarromState::new(Tuning::default());
        let before = (state.striker, state.coins.clone());
        for _ in 0..100 {
            step(&mut state);
        }
        assert_eq!(state.striker, before.0);
        assert_eq!(state.coins, before.1);
        assert_eq!(state.time_ticks, 100);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_integrate_then_friction() {
        let mut state = state_with(
            Disc {
                pos: Vec2::new(300.0, 400.0),
                vel: Vec2::new(3.0, -4.0),
            },
            vec![],
        );
        step(&mut state);
        // Position moves by the pre-friction velocity
        assert_eq!(state.striker.pos, Vec2::new(303.0, 396.0));
        assert!((state.striker.vel - Vec2::new(3.0 * 0.98, -4.0 * 0.98)).length() < 1e-6);
    }

    #[test]
    fn test_speed_decays_without_stopping() {
        let mut state = state_with(
            Disc {
                pos: Vec2::new(300.0, 300.0),
                vel: Vec2::new(0.5, 0.0),
            },
            vec![],
        );
        let mut last = state.striker.speed();
        for _ in 0..200 {
            step(&mut state);
            let speed = state.striker.speed();
            assert!(speed < last);
            assert!(speed > 0.0);
            last = speed;
        }
    }

    #[test]
    fn test_low_wall_flips_velocity() {
        // Next position 62 - 15 = 47 < 50
        let mut state = state_with(
            Disc {
                pos: Vec2::new(64.0, 300.0),
                vel: Vec2::new(-2.0, 0.0),
            },
            vec![],
        );
        step(&mut state);
        assert_eq!(state.striker.pos.x, 62.0);
        assert!((state.striker.vel.x - 2.0 * 0.98).abs() < 1e-6);
        assert_eq!(
            state.events,
            vec![SimEvent::WallBounce {
                disc: DiscId::Striker,
                x: true,
                y: false
            }]
        );
    }

    #[test]
    fn test_coin_bounces_off_high_wall() {
        let mut state = state_with(
            Disc::at(Vec2::new(100.0, 100.0)),
            vec![Disc {
                pos: Vec2::new(300.0, 538.0),
                vel: Vec2::new(0.0, 3.0),
            }],
        );
        step(&mut state);
        assert_eq!(state.coins[0].pos.y, 541.0);
        assert!(state.coins[0].vel.y < 0.0);
    }

    #[test]
    fn test_wall_overlap_is_not_corrected() {
        // Far past the wall and moving further out: flips each tick, never clamped
        let mut state = state_with(
            Disc {
                pos: Vec2::new(40.0, 300.0),
                vel: Vec2::new(-1.0, 0.0),
            },
            vec![],
        );
        step(&mut state);
        assert_eq!(state.striker.pos.x, 39.0);
        assert!(state.striker.vel.x > 0.0);
        step(&mut state);
        assert!(state.striker.pos.x < 40.0);
        assert!(state.striker.vel.x < 0.0);
    }

    #[test]
    fn test_collision_at_exact_contact() {
        let striker_vel = Vec2::new(0.0, -1.0);
        // After integration the striker sits exactly 25 below the coin
        let mut state = state_with(
            Disc {
                pos: Vec2::new(300.0, 326.0),
                vel: striker_vel,
            },
            vec![Disc::at(Vec2::new(300.0, 300.0))],
        );
        step(&mut state);

        let theta = -std::f32::consts::FRAC_PI_2;
        let push = Vec2::new(theta.cos(), theta.sin()) * 2.0;
        let striker_pre = striker_vel * 0.98;
        assert!((state.coins[0].vel - push).length() < 1e-5);
        assert!((state.striker.vel - (striker_pre - push)).length() < 1e-5);
        assert!(matches!(state.events.last(), Some(SimEvent::Collision { coin: 0, .. })));
    }

    #[test]
    fn test_overlap_fires_every_tick() {
        // Striker parked on top of the coin keeps pushing it
        let mut state = state_with(
            Disc::at(Vec2::new(300.0, 310.0)),
            vec![Disc::at(Vec2::new(300.0, 300.0))],
        );
        step(&mut state);
        let first = state.coins[0].vel;
        assert!(first.y < 0.0);
        step(&mut state);
        let collisions = state
            .events
            .iter()
            .filter(|e| matches!(e, SimEvent::Collision { .. }))
            .count();
        assert_eq!(collisions, 1);
        assert!(state.coins[0].vel.y < first.y);
    }

    #[test]
    fn test_shot_up_hits_center_coin() {
        let mut state = state_with(
            Disc::at(Vec2::new(300.0, 400.0)),
            vec![Disc::at(Vec2::new(300.0, 300.0))],
        );
        let mut input = TickInput::default();
        input.push(PointerEvent::Down(Vec2::new(300.0, 400.0)));
        input.push(PointerEvent::Drag(Vec2::new(300.0, 300.0)));
        input.push(PointerEvent::Up(Vec2::new(300.0, 300.0)));
        tick(&mut state, &input);
        assert_eq!(state.aim, AimGesture::Idle);
        assert!(matches!(state.events.first(), Some(SimEvent::Shot { .. })));

        // Run until the first contact tick
        let mut hit = false;
        for _ in 0..50 {
            let striker_before = state.striker.vel;
            step(&mut state);
            if state
                .events
                .iter()
                .any(|e| matches!(e, SimEvent::Collision { .. }))
            {
                let gap = crate::distance(state.striker.pos, state.coins[0].pos);
                assert!(gap <= 25.0);
                let angle = crate::vector_angle(state.striker.pos, state.coins[0].pos);
                let push = Vec2::new(angle.cos(), angle.sin()) * 2.0;
                // Coin was at rest, so it carries exactly the impulse
                assert!((state.coins[0].vel - push).length() < 1e-4);
                assert!((state.striker.vel - (striker_before * 0.98 - push)).length() < 1e-4);
                // Coin heads up the board, away from the striker
                assert!(state.coins[0].vel.y < 0.0);
                hit = true;
                break;
            }
        }
        assert!(hit, "striker never reached the coin");
    }

    #[test]
    fn test_shot_while_moving_replaces_velocity() {
        let mut state = state_with(
            Disc {
                pos: Vec2::new(300.0, 400.0),
                vel: Vec2::new(8.0, 0.0),
            },
            vec![],
        );
        let mut input = TickInput::default();
        input.push(PointerEvent::Up(Vec2::new(300.0, 350.0)));
        tick(&mut state, &input);
        // Shot velocity (0, -5) integrated then damped
        assert!((state.striker.pos - Vec2::new(300.0, 395.0)).length() < 1e-4);
        assert!((state.striker.vel - Vec2::new(0.0, -5.0 * 0.98)).length() < 1e-4);
    }

    #[test]
    fn test_each_coin_checked_against_striker() {
        let mut state = state_with(
            Disc::at(Vec2::new(300.0, 300.0)),
            vec![
                Disc::at(Vec2::new(320.0, 300.0)),
                Disc::at(Vec2::new(280.0, 300.0)),
                Disc::at(Vec2::new(450.0, 450.0)),
            ],
        );
        step(&mut state);
        assert!(state.coins[0].vel.x > 0.0);
        assert!(state.coins[1].vel.x < 0.0);
        assert_eq!(state.coins[2].vel, Vec2::ZERO);
        // Opposite impulses cancel on the striker
        assert!(state.striker.vel.length() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_friction_law(vx in -15.0f32..15.0, vy in -15.0f32..15.0) {
            // Centered with room to move: no wall or coin contact
            let mut state = state_with(
                Disc { pos: Vec2::new(300.0, 300.0), vel: Vec2::new(vx, vy) },
                vec![],
            );
            step(&mut state);
            prop_assert!((state.striker.vel.x - vx * 0.98).abs() < 1e-5);
            prop_assert!((state.striker.vel.y - vy * 0.98).abs() < 1e-5);
        }

        #[test]
        fn prop_wall_flip_keeps_magnitude(speed in 0.1f32..5.0) {
            // Heading into the low x wall, contact on the next tick
            let mut state = state_with(
                Disc { pos: Vec2::new(65.0, 300.0), vel: Vec2::new(-speed, 0.0) },
                vec![],
            );
            step(&mut state);
            prop_assert!(state.striker.vel.x > 0.0);
            prop_assert!((state.striker.vel.x - speed * 0.98).abs() < 1e-5);
        }
    }
}
