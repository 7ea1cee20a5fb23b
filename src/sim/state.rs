//! Simulation state and core types
//!
//! Everything needed to reproduce a run lives here: the seed and the bodies.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// A circular body drifting over the viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner, in viewport pixels
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    /// Diameter in pixels, fixed for the body's lifetime
    pub size: f32,
}

impl Body {
    pub fn new(pos: Vec2, vel: Vec2, size: f32) -> Self {
        Self { pos, vel, size }
    }

    /// Largest valid position on each axis for the given viewport.
    ///
    /// Floors at zero so a body larger than the viewport pins to the origin.
    #[inline]
    pub fn max_pos(&self, viewport: Vec2) -> Vec2 {
        (viewport - Vec2::splat(self.size)).max(Vec2::ZERO)
    }

    /// Whether the body satisfies `0 <= pos <= viewport - size` on both axes
    pub fn in_bounds(&self, viewport: Vec2) -> bool {
        let max = self.max_pos(viewport);
        self.pos.cmpge(Vec2::ZERO).all() && self.pos.cmple(max).all()
    }
}

/// Knobs for initial placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnParams {
    /// Size used when a footprint reports no width
    pub fallback_size: f32,
    /// Velocity components are uniform in [-max_speed, max_speed)
    pub max_speed: f32,
}

impl Default for SpawnParams {
    fn default() -> Self {
        Self {
            fallback_size: FALLBACK_BODY_SIZE,
            max_speed: MAX_INITIAL_SPEED,
        }
    }
}

impl SpawnParams {
    /// Body size for a handle footprint (width is the diameter)
    pub fn size_for(&self, footprint: Vec2) -> f32 {
        if footprint.x.is_finite() && footprint.x > 0.0 {
            footprint.x
        } else {
            self.fallback_size
        }
    }
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BounceState {
    /// Seed the bodies were spawned from
    pub seed: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Bodies in construction order
    pub bodies: Vec<Body>,
}

impl BounceState {
    /// State with no bodies
    pub fn empty(seed: u64) -> Self {
        Self {
            seed,
            time_ticks: 0,
            bodies: Vec::new(),
        }
    }

    /// Spawn one body per footprint at a random position inside the viewport
    /// with a random velocity.
    pub fn spawn(footprints: &[Vec2], viewport: Vec2, params: &SpawnParams, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let bodies = footprints
            .iter()
            .map(|&footprint| {
                let size = params.size_for(footprint);
                let span = (viewport - Vec2::splat(size)).max(Vec2::ZERO);
                let pos = Vec2::new(rng.random::<f32>() * span.x, rng.random::<f32>() * span.y);
                let vel = Vec2::new(
                    (rng.random::<f32>() - 0.5) * 2.0 * params.max_speed,
                    (rng.random::<f32>() - 0.5) * 2.0 * params.max_speed,
                );
                Body::new(pos, vel, size)
            })
            .collect();

        Self {
            seed,
            time_ticks: 0,
            bodies,
        }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}
