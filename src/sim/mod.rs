//! Deterministic simulation module
//!
//! All motion logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (construction order)
//! - No rendering or platform dependencies

pub mod bounds;
pub mod state;
pub mod tick;

pub use bounds::{EdgeContact, clamp_upper, reflect, reflect_axis};
pub use state::{BounceState, Body, SpawnParams};
pub use tick::{resize, step_body, tick};
