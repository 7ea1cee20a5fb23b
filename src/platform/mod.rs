//! Platform abstraction layer
//!
//! The simulator only talks to its host through three capabilities:
//! - `Viewport`: current size plus resize notifications
//! - `FrameScheduler`: one-shot per-frame callbacks that can be cancelled
//! - `VisualHandle`: something on screen with a footprint and a position
//!
//! `headless` implements them in memory (tests, native demo); `web`
//! implements them on top of the browser window and DOM.

use glam::Vec2;

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use headless::{HeadlessViewport, ManualScheduler, MemoryHandle};

/// Callback run once on the next frame
pub type FrameCallback = Box<dyn FnOnce()>;
/// Callback run on every viewport resize
pub type ResizeCallback = Box<dyn FnMut()>;

/// Host id of a requested frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub u64);

/// Host id of a resize subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// The rectangle bodies must stay inside
pub trait Viewport {
    /// Current size in pixels
    fn size(&self) -> Vec2;

    /// Register a resize callback. None if the host refused it.
    fn subscribe_resize(&self, callback: ResizeCallback) -> Option<ListenerId>;

    /// Remove a resize callback. Unknown ids are ignored.
    fn unsubscribe_resize(&self, id: ListenerId);
}

/// Host per-frame scheduling primitive (requestAnimationFrame-shaped)
pub trait FrameScheduler {
    /// Run `callback` once on the next frame. None if the host refused it.
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameId>;

    /// Cancel a requested frame. Unknown or already-run ids are ignored.
    fn cancel_frame(&self, id: FrameId);
}

/// On-screen representation driven by one body
pub trait VisualHandle {
    /// Current rendered width and height
    fn footprint(&self) -> Vec2;

    /// Move the handle. Returns false when the handle is gone and the write
    /// was skipped.
    fn set_position(&self, pos: Vec2) -> bool;
}

/// Why the page is being hidden (`pagehide`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageHide {
    /// Kept in the back/forward cache; may be shown again as-is
    Cached,
    /// Being discarded
    Unloading,
}

impl PageHide {
    /// From `PageTransitionEvent.persisted`
    pub fn from_persisted(persisted: bool) -> Self {
        if persisted { Self::Cached } else { Self::Unloading }
    }

    /// Only a discarded page tears the simulator down. A cached page keeps
    /// it attached so the circles move again when restored.
    pub fn detaches(self) -> bool {
        self == Self::Unloading
    }
}

/// Format a coordinate as a CSS pixel length
pub fn px(value: f32) -> String {
    format!("{}px", value)
}
