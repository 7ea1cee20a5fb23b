//! Bounce Field - bouncing circles over a viewport
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, edge reflection, resize clamp)
//! - `platform`: Viewport, frame scheduling and visual handle capabilities
//! - `frame_loop`: Cancellable repeating task on top of a frame scheduler
//! - `simulator`: Attach/detach lifecycle tying the pieces together
//! - `settings`: Persisted preferences

pub mod error;
pub mod frame_loop;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod simulator;

pub use error::Error;
pub use frame_loop::FrameLoop;
pub use settings::Settings;
pub use simulator::Simulator;

/// Simulation configuration constants
pub mod consts {
    /// Body size used when a handle reports no width (layout not committed yet)
    pub const FALLBACK_BODY_SIZE: f32 = 60.0;
    /// Velocity components are drawn from [-MAX_INITIAL_SPEED, MAX_INITIAL_SPEED)
    pub const MAX_INITIAL_SPEED: f32 = 1.5;
    /// Elements the simulator drives when attached by selector
    pub const DEFAULT_SELECTOR: &str = ".bounce-circle";
}
