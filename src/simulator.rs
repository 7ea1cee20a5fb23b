//! Bounce simulator lifecycle
//!
//! `attach` reads each handle's footprint, spawns the bodies, writes their
//! first positions, subscribes to viewport resizes and starts the frame
//! loop. `detach` (or dropping the simulator) undoes all of it; after it
//! returns no handle is written again.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;

use crate::frame_loop::FrameLoop;
use crate::platform::{FrameScheduler, ListenerId, Viewport, VisualHandle};
use crate::settings::Settings;
use crate::sim::{BounceState, resize, tick};

/// State reachable from host callbacks
struct Shared<V, H> {
    viewport: Rc<V>,
    state: RefCell<BounceState>,
    handles: Vec<H>,
    attached: Cell<bool>,
    skipped_writes: Cell<u64>,
}

impl<V: Viewport, H: VisualHandle> Shared<V, H> {
    fn on_frame(&self) {
        if !self.attached.get() {
            return;
        }
        let viewport = self.viewport.size();
        let mut state = self.state.borrow_mut();
        tick(&mut state, viewport);
        self.write_positions(&state);
    }

    fn on_resize(&self) {
        if !self.attached.get() {
            return;
        }
        let viewport = self.viewport.size();
        let mut state = self.state.borrow_mut();
        resize(&mut state, viewport);
        log::debug!("Viewport resized to {}x{}", viewport.x, viewport.y);
        self.write_positions(&state);
    }

    /// Push every body position to its handle, skipping handles that are gone
    fn write_positions(&self, state: &BounceState) {
        let skipped = state
            .bodies
            .iter()
            .zip(&self.handles)
            .filter(|(body, handle)| !handle.set_position(body.pos))
            .count();
        if skipped > 0 {
            log::trace!("{} of {} handle writes skipped", skipped, state.bodies.len());
            self.skipped_writes.set(self.skipped_writes.get() + skipped as u64);
        }
    }
}

/// An attached simulator. Dropping it detaches.
pub struct Simulator<V, S, H>
where
    V: Viewport + 'static,
    S: FrameScheduler + 'static,
    H: VisualHandle + 'static,
{
    shared: Rc<Shared<V, H>>,
    frame_loop: Option<FrameLoop<S>>,
    resize_listener: Option<ListenerId>,
}

impl<V, S, H> Simulator<V, S, H>
where
    V: Viewport + 'static,
    S: FrameScheduler + 'static,
    H: VisualHandle + 'static,
{
    /// Spawn one body per handle and start animating
    pub fn attach(viewport: Rc<V>, scheduler: Rc<S>, handles: Vec<H>, settings: &Settings) -> Self {
        let seed = settings.resolve_seed();
        let footprints: Vec<Vec2> = handles.iter().map(VisualHandle::footprint).collect();
        let state = BounceState::spawn(&footprints, viewport.size(), &settings.spawn_params(), seed);
        Self::attach_state(viewport, scheduler, handles, state, !settings.reduced_motion)
    }

    /// Attach with existing bodies (e.g. a snapshot), paired with handles by
    /// index. Positions are pulled inside the current viewport first.
    pub fn attach_state(
        viewport: Rc<V>,
        scheduler: Rc<S>,
        handles: Vec<H>,
        mut state: BounceState,
        animate: bool,
    ) -> Self {
        if state.bodies.len() != handles.len() {
            log::warn!(
                "{} bodies for {} handles, extras are ignored",
                state.bodies.len(),
                handles.len()
            );
            state.bodies.truncate(handles.len());
        }

        let size = viewport.size();
        for body in &mut state.bodies {
            body.pos = body.pos.clamp(Vec2::ZERO, body.max_pos(size));
        }

        let body_count = state.bodies.len();
        let seed = state.seed;
        let shared = Rc::new(Shared {
            viewport: viewport.clone(),
            state: RefCell::new(state),
            handles,
            attached: Cell::new(true),
            skipped_writes: Cell::new(0),
        });
        shared.write_positions(&shared.state.borrow());

        let weak = Rc::downgrade(&shared);
        let resize_listener = viewport.subscribe_resize(Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.on_resize();
            }
        }));
        if resize_listener.is_none() {
            log::warn!("Resize listener refused, bodies won't follow a shrinking viewport");
        }

        let frame_loop = if animate {
            let weak = Rc::downgrade(&shared);
            Some(FrameLoop::start(scheduler, move || {
                if let Some(shared) = weak.upgrade() {
                    shared.on_frame();
                }
            }))
        } else {
            log::info!("Reduced motion: bodies placed, not animated");
            None
        };

        log::info!("Attached {} bodies (seed {})", body_count, seed);

        Self {
            shared,
            frame_loop,
            resize_listener,
        }
    }

    /// Stop animating and release the resize listener
    pub fn detach(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if !self.shared.attached.replace(false) {
            return;
        }
        if let Some(frame_loop) = self.frame_loop.take() {
            frame_loop.stop();
        }
        if let Some(id) = self.resize_listener.take() {
            self.shared.viewport.unsubscribe_resize(id);
        }
        log::info!("Detached after {} ticks", self.shared.state.borrow().time_ticks);
    }

    pub fn is_animating(&self) -> bool {
        self.frame_loop.as_ref().is_some_and(FrameLoop::is_running)
    }

    pub fn body_count(&self) -> usize {
        self.shared.state.borrow().len()
    }

    /// Writes dropped so far because their handle was gone
    pub fn skipped_writes(&self) -> u64 {
        self.shared.skipped_writes.get()
    }

    /// Copy of the current simulation state
    pub fn snapshot(&self) -> BounceState {
        self.shared.state.borrow().clone()
    }
}

impl<V, S, H> Drop for Simulator<V, S, H>
where
    V: Viewport + 'static,
    S: FrameScheduler + 'static,
    H: VisualHandle + 'static,
{
    fn drop(&mut self) {
        self.shutdown();
    }
}
