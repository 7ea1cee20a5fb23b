//! In-memory host: a viewport you resize by hand, a scheduler you step by
//! hand, and handles that record every write.
//!
//! Everything is single-threaded (`Rc`/`Cell`), like the browser host.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;

use super::{FrameCallback, FrameId, FrameScheduler, ListenerId, ResizeCallback, Viewport, VisualHandle};

/// Viewport with a settable size
pub struct HeadlessViewport {
    size: Cell<Vec2>,
    listeners: RefCell<Vec<(ListenerId, ResizeCallback)>>,
    /// Ids unsubscribed while their callbacks were out being notified
    removed_while_notifying: RefCell<Vec<ListenerId>>,
    notifying: Cell<bool>,
    next_id: Cell<u64>,
}

impl HeadlessViewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Cell::new(Vec2::new(width, height)),
            listeners: RefCell::new(Vec::new()),
            removed_while_notifying: RefCell::new(Vec::new()),
            notifying: Cell::new(false),
            next_id: Cell::new(1),
        }
    }

    /// Change the size and notify every subscriber.
    ///
    /// Callbacks may subscribe or unsubscribe (e.g. drop a simulator) while
    /// being notified; new subscribers are first called on the next resize.
    pub fn resize(&self, width: f32, height: f32) {
        self.size.set(Vec2::new(width, height));

        let mut notified = std::mem::take(&mut *self.listeners.borrow_mut());
        self.notifying.set(true);
        for (_, callback) in notified.iter_mut() {
            callback();
        }
        self.notifying.set(false);

        let removed = std::mem::take(&mut *self.removed_while_notifying.borrow_mut());
        notified.retain(|(id, _)| !removed.contains(id));
        let mut listeners = self.listeners.borrow_mut();
        let added = std::mem::take(&mut *listeners);
        notified.extend(added);
        *listeners = notified;
    }

    /// Change the size without notifying anyone (a resize the host hasn't
    /// delivered yet)
    pub fn set_size_silently(&self, width: f32, height: f32) {
        self.size.set(Vec2::new(width, height));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl Viewport for HeadlessViewport {
    fn size(&self) -> Vec2 {
        self.size.get()
    }

    fn subscribe_resize(&self, callback: ResizeCallback) -> Option<ListenerId> {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, callback));
        Some(id)
    }

    fn unsubscribe_resize(&self, id: ListenerId) {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(l, _)| *l != id);
        if listeners.len() == before && self.notifying.get() {
            // Taken out by the ongoing `resize`
            self.removed_while_notifying.borrow_mut().push(id);
        }
    }
}

/// Frame scheduler stepped explicitly with `run_frame`
#[derive(Default)]
pub struct ManualScheduler {
    pending: RefCell<Vec<(FrameId, FrameCallback)>>,
    next_id: Cell<u64>,
    refuse: Cell<bool>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every frame requested so far. Frames requested while running
    /// wait for the next call. Returns how many callbacks ran.
    pub fn run_frame(&self) -> usize {
        let due = std::mem::take(&mut *self.pending.borrow_mut());
        let count = due.len();
        for (_, callback) in due {
            callback();
        }
        count
    }

    /// Run `n` frames
    pub fn run_frames(&self, n: usize) {
        for _ in 0..n {
            self.run_frame();
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Remove the queued callbacks without running them, as if the host had
    /// already dispatched them. Cancelling their ids afterwards has no effect.
    pub fn take_pending(&self) -> Vec<FrameCallback> {
        std::mem::take(&mut *self.pending.borrow_mut())
            .into_iter()
            .map(|(_, callback)| callback)
            .collect()
    }

    /// Make subsequent `request_frame` calls fail
    pub fn set_refuse(&self, refuse: bool) {
        self.refuse.set(refuse);
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameId> {
        if self.refuse.get() {
            return None;
        }
        let id = FrameId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.pending.borrow_mut().push((id, callback));
        Some(id)
    }

    fn cancel_frame(&self, id: FrameId) {
        self.pending.borrow_mut().retain(|(f, _)| *f != id);
    }
}

#[derive(Debug)]
struct HandleInner {
    footprint: Vec2,
    connected: Cell<bool>,
    writes: RefCell<Vec<Vec2>>,
}

/// Handle that records its writes. Clones share the same record.
#[derive(Debug, Clone)]
pub struct MemoryHandle {
    inner: Rc<HandleInner>,
}

impl MemoryHandle {
    /// Square handle `size` pixels wide
    pub fn new(size: f32) -> Self {
        Self::with_footprint(Vec2::splat(size))
    }

    pub fn with_footprint(footprint: Vec2) -> Self {
        Self {
            inner: Rc::new(HandleInner {
                footprint,
                connected: Cell::new(true),
                writes: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Every accepted write, oldest first
    pub fn writes(&self) -> Vec<Vec2> {
        self.inner.writes.borrow().clone()
    }

    pub fn write_count(&self) -> usize {
        self.inner.writes.borrow().len()
    }

    pub fn last_position(&self) -> Option<Vec2> {
        self.inner.writes.borrow().last().copied()
    }

    /// Detach from the "document": later writes are skipped
    pub fn remove(&self) {
        self.inner.connected.set(false);
    }
}

impl VisualHandle for MemoryHandle {
    fn footprint(&self) -> Vec2 {
        self.inner.footprint
    }

    fn set_position(&self, pos: Vec2) -> bool {
        if !self.inner.connected.get() {
            return false;
        }
        self.inner.writes.borrow_mut().push(pos);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_notifies_until_unsubscribed() {
        let viewport = HeadlessViewport::new(800.0, 600.0);
        let hits = Rc::new(Cell::new(0));

        let counter = hits.clone();
        let id = viewport
            .subscribe_resize(Box::new(move || counter.set(counter.get() + 1)))
            .unwrap();
        viewport.resize(400.0, 300.0);
        assert_eq!(hits.get(), 1);
        assert_eq!(viewport.size(), Vec2::new(400.0, 300.0));

        viewport.unsubscribe_resize(id);
        viewport.resize(200.0, 100.0);
        assert_eq!(hits.get(), 1);
        assert_eq!(viewport.listener_count(), 0);
    }

    #[test]
    fn test_scheduler_runs_once_and_cancels() {
        let scheduler = ManualScheduler::new();
        let hits = Rc::new(Cell::new(0));

        let counter = hits.clone();
        scheduler.request_frame(Box::new(move || counter.set(counter.get() + 1)));
        let counter = hits.clone();
        let cancelled = scheduler
            .request_frame(Box::new(move || counter.set(counter.get() + 10)))
            .unwrap();
        scheduler.cancel_frame(cancelled);

        assert_eq!(scheduler.run_frame(), 1);
        assert_eq!(hits.get(), 1);
        assert_eq!(scheduler.run_frame(), 0);
    }

    #[test]
    fn test_scheduler_refuse() {
        let scheduler = ManualScheduler::new();
        scheduler.set_refuse(true);
        assert!(scheduler.request_frame(Box::new(|| {})).is_none());
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_memory_handle_skips_after_remove() {
        let handle = MemoryHandle::new(60.0);
        let observer = handle.clone();
        assert!(handle.set_position(Vec2::new(1.0, 2.0)));
        handle.remove();
        assert!(!handle.set_position(Vec2::new(3.0, 4.0)));
        assert_eq!(observer.writes(), vec![Vec2::new(1.0, 2.0)]);
    }

    #[test]
    fn test_unsubscribe_during_resize() {
        let viewport = Rc::new(HeadlessViewport::new(800.0, 600.0));
        let hits = Rc::new(Cell::new(0));

        let counter = hits.clone();
        let victim = viewport
            .subscribe_resize(Box::new(move || counter.set(counter.get() + 1)))
            .unwrap();
        let host = Rc::downgrade(&viewport);
        viewport.subscribe_resize(Box::new(move || {
            if let Some(host) = host.upgrade() {
                host.unsubscribe_resize(victim);
            }
        }));

        viewport.resize(400.0, 300.0);
        assert_eq!(hits.get(), 1);
        assert_eq!(viewport.listener_count(), 1);

        viewport.resize(200.0, 100.0);
        assert_eq!(hits.get(), 1);
    }
}
