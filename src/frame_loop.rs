//! Repeating per-frame task on top of a one-shot frame scheduler
//!
//! Each frame runs the step and requests the next frame. `stop` cancels the
//! pending request; a callback the host already dispatched sees the loop
//! stopped and returns without running the step.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::platform::{FrameId, FrameScheduler};

struct LoopShared {
    running: Cell<bool>,
    pending: Cell<Option<FrameId>>,
    frames: Cell<u64>,
    step: RefCell<Box<dyn FnMut()>>,
}

/// A cancellable repeating task. Dropping it stops it.
pub struct FrameLoop<S: FrameScheduler + 'static> {
    scheduler: Rc<S>,
    shared: Rc<LoopShared>,
}

impl<S: FrameScheduler + 'static> FrameLoop<S> {
    /// Start running `step` once per frame
    pub fn start(scheduler: Rc<S>, step: impl FnMut() + 'static) -> Self {
        let shared = Rc::new(LoopShared {
            running: Cell::new(true),
            pending: Cell::new(None),
            frames: Cell::new(0),
            step: RefCell::new(Box::new(step)),
        });
        request_next(&scheduler, &shared);
        Self { scheduler, shared }
    }

    /// Stop the loop. No step runs after this returns.
    pub fn stop(&self) {
        if !self.shared.running.replace(false) {
            return;
        }
        if let Some(id) = self.shared.pending.take() {
            self.scheduler.cancel_frame(id);
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.get()
    }

    /// Number of steps run so far
    pub fn frames(&self) -> u64 {
        self.shared.frames.get()
    }
}

impl<S: FrameScheduler + 'static> Drop for FrameLoop<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn request_next<S: FrameScheduler + 'static>(scheduler: &Rc<S>, shared: &Rc<LoopShared>) {
    let weak_scheduler = Rc::downgrade(scheduler);
    let weak_shared = Rc::downgrade(shared);

    let requested = scheduler.request_frame(Box::new(move || {
        let (Some(scheduler), Some(shared)) = (weak_scheduler.upgrade(), weak_shared.upgrade())
        else {
            return;
        };
        if !shared.running.get() {
            return;
        }
        shared.pending.set(None);
        shared.frames.set(shared.frames.get() + 1);
        (shared.step.borrow_mut())();

        if shared.running.get() {
            request_next(&scheduler, &shared);
        }
    }));

    match requested {
        Some(id) => shared.pending.set(Some(id)),
        None => log::warn!("Frame request refused, loop stalled"),
    }
}
