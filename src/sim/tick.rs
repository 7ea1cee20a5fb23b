//! Per-frame simulation tick and viewport resize reaction
//!
//! The viewport size is passed in on every call; nothing here caches it.

use glam::Vec2;

use super::bounds::{EdgeContact, clamp_upper, reflect};
use super::state::{BounceState, Body};

/// Advance one body by its velocity and reflect it off the viewport edges
pub fn step_body(body: &mut Body, viewport: Vec2) -> EdgeContact {
    let max = body.max_pos(viewport);
    body.pos += body.vel;
    reflect(&mut body.pos, &mut body.vel, max)
}

/// Advance every body by one tick, in construction order
pub fn tick(state: &mut BounceState, viewport: Vec2) {
    state.time_ticks += 1;
    for body in &mut state.bodies {
        step_body(body, viewport);
    }
}

/// Pull bodies back inside a viewport that shrank.
///
/// Only the upper bound is corrected; velocities and sizes are left alone,
/// so a viewport that grew leaves every body where it was.
pub fn resize(state: &mut BounceState, viewport: Vec2) {
    for body in &mut state.bodies {
        body.pos = clamp_upper(body.pos, body.max_pos(viewport));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn single(pos: Vec2, vel: Vec2, size: f32) -> BounceState {
        BounceState {
            seed: 0,
            time_ticks: 0,
            bodies: vec![Body::new(pos, vel, size)],
        }
    }

    #[test]
    fn test_tick_reflects_at_right_edge() {
        let mut state = single(Vec2::new(790.0, 100.0), Vec2::new(2.0, 0.5), 60.0);
        tick(&mut state, Vec2::new(800.0, 600.0));

        let body = state.bodies[0];
        assert_eq!(body.vel.x, -2.0);
        assert_eq!(body.pos.x, 740.0);
        // y axis untouched by the x contact
        assert_eq!(body.vel.y, 0.5);
        assert_eq!(body.pos.y, 100.5);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_tick_reflects_at_top_edge() {
        let mut state = single(Vec2::new(100.0, 1.0), Vec2::new(1.0, -1.5), 60.0);
        tick(&mut state, Vec2::new(800.0, 600.0));

        let body = state.bodies[0];
        assert_eq!(body.pos.y, 0.0);
        assert_eq!(body.vel.y, 1.5);
        assert_eq!(body.vel.x, 1.0);
    }

    #[test]
    fn test_velocity_conserved_without_contact() {
        let vel = Vec2::new(1.2, -0.8);
        let mut state = single(Vec2::new(300.0, 300.0), vel, 60.0);
        for _ in 0..10 {
            tick(&mut state, Vec2::new(800.0, 600.0));
        }
        assert_eq!(state.bodies[0].vel, vel);
        assert!((state.bodies[0].pos - Vec2::new(312.0, 292.0)).length() < 1e-3);
    }

    #[test]
    fn test_body_returns_after_reflection() {
        let mut state = single(Vec2::new(739.0, 10.0), Vec2::new(1.5, 0.0), 60.0);
        let viewport = Vec2::new(800.0, 600.0);
        tick(&mut state, viewport);
        assert_eq!(state.bodies[0].pos.x, 740.0);
        tick(&mut state, viewport);
        assert_eq!(state.bodies[0].pos.x, 738.5);
        assert_eq!(state.bodies[0].vel.x, -1.5);
    }

    #[test]
    fn test_tick_uses_current_viewport() {
        let mut state = single(Vec2::new(300.0, 10.0), Vec2::new(1.0, 0.0), 60.0);
        // Viewport shrank under the body without a resize reaction
        tick(&mut state, Vec2::new(320.0, 600.0));
        assert_eq!(state.bodies[0].pos.x, 260.0);
        assert_eq!(state.bodies[0].vel.x, -1.0);
    }

    #[test]
    fn test_resize_shrink_clamps() {
        let mut state = single(Vec2::new(500.0, 200.0), Vec2::new(1.0, 1.0), 60.0);
        resize(&mut state, Vec2::new(400.0, 600.0));
        assert_eq!(state.bodies[0].pos, Vec2::new(340.0, 200.0));
        assert_eq!(state.bodies[0].vel, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_resize_growth_is_noop() {
        let mut state = single(Vec2::new(100.0, 50.0), Vec2::new(-1.0, 0.3), 60.0);
        let before = state.clone();
        resize(&mut state, Vec2::new(800.0, 600.0));
        assert_eq!(state, before);
    }

    #[test]
    fn test_tick_empty_state() {
        let mut state = BounceState::empty(1);
        tick(&mut state, Vec2::new(800.0, 600.0));
        assert!(state.is_empty());
        assert_eq!(state.time_ticks, 1);
    }

    proptest! {
        #[test]
        fn prop_bodies_stay_in_bounds(
            width in 1.0f32..2000.0,
            height in 1.0f32..2000.0,
            size in 1.0f32..200.0,
            fx in 0.0f32..1.0,
            fy in 0.0f32..1.0,
            vx in -50.0f32..50.0,
            vy in -50.0f32..50.0,
            ticks in 1usize..300,
        ) {
            let viewport = Vec2::new(width, height);
            let mut body = Body::new(Vec2::ZERO, Vec2::new(vx, vy), size);
            body.pos = body.max_pos(viewport) * Vec2::new(fx, fy);
            let mut state = BounceState { seed: 0, time_ticks: 0, bodies: vec![body] };

            for _ in 0..ticks {
                tick(&mut state, viewport);
                prop_assert!(state.bodies[0].in_bounds(viewport));
            }
        }

        #[test]
        fn prop_crossing_far_edge_reflects(
            size in 1.0f32..100.0,
            gap in 0.0f32..5.0,
            vx in 5.01f32..20.0,
        ) {
            let viewport = Vec2::new(800.0, 600.0);
            let max_x = viewport.x - size;
            let mut state = BounceState {
                seed: 0,
                time_ticks: 0,
                bodies: vec![Body::new(Vec2::new(max_x - gap, 100.0), Vec2::new(vx, 0.0), size)],
            };
            tick(&mut state, viewport);
            prop_assert_eq!(state.bodies[0].vel.x, -vx);
            prop_assert_eq!(state.bodies[0].pos.x, max_x);
        }

        #[test]
        fn prop_resize_restores_bounds(
            size in 1.0f32..100.0,
            fx in 0.0f32..1.0,
            fy in 0.0f32..1.0,
            shrink_w in 100.0f32..1000.0,
            shrink_h in 100.0f32..1000.0,
        ) {
            let before = Vec2::new(1000.0, 1000.0);
            let after = Vec2::new(shrink_w, shrink_h);
            let mut body = Body::new(Vec2::ZERO, Vec2::ONE, size);
            body.pos = body.max_pos(before) * Vec2::new(fx, fy);
            let mut state = BounceState { seed: 0, time_ticks: 0, bodies: vec![body] };

            resize(&mut state, after);
            prop_assert!(state.bodies[0].in_bounds(after));
        }
    }
}
