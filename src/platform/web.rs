//! Browser host: window size and `resize` events, `requestAnimationFrame`,
//! and absolutely positioned DOM elements.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, Window};

use super::{
    FrameCallback, FrameId, FrameScheduler, ListenerId, ResizeCallback, Viewport, VisualHandle, px,
};
use crate::error::Error;
use crate::settings::Settings;
use crate::simulator::Simulator;

/// Simulator driving DOM elements
pub type WebSimulator = Simulator<WindowViewport, AnimationFrames, DomHandle>;

fn window() -> Result<Window, Error> {
    web_sys::window().ok_or(Error::NoWindow)
}

/// The browser window as a viewport
pub struct WindowViewport {
    window: Window,
    listeners: RefCell<HashMap<u64, Closure<dyn FnMut()>>>,
    next_id: Cell<u64>,
}

impl WindowViewport {
    pub fn new() -> Result<Self, Error> {
        Ok(Self {
            window: window()?,
            listeners: RefCell::new(HashMap::new()),
            next_id: Cell::new(1),
        })
    }
}

impl Viewport for WindowViewport {
    fn size(&self) -> Vec2 {
        let width = self.window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let height = self.window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Vec2::new(width as f32, height as f32)
    }

    fn subscribe_resize(&self, callback: ResizeCallback) -> Option<ListenerId> {
        let closure = Closure::wrap(callback);
        if let Err(e) = self
            .window
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
        {
            log::warn!("Failed to add resize listener: {:?}", e);
            return None;
        }
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners.borrow_mut().insert(id, closure);
        Some(ListenerId(id))
    }

    fn unsubscribe_resize(&self, id: ListenerId) {
        if let Some(closure) = self.listeners.borrow_mut().remove(&id.0) {
            let _ = self
                .window
                .remove_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        }
    }
}

impl Drop for WindowViewport {
    fn drop(&mut self) {
        for (_, closure) in self.listeners.borrow_mut().drain() {
            let _ = self
                .window
                .remove_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        }
    }
}

/// `requestAnimationFrame` as a frame scheduler
pub struct AnimationFrames {
    window: Window,
}

impl AnimationFrames {
    pub fn new() -> Result<Self, Error> {
        Ok(Self { window: window()? })
    }
}

impl FrameScheduler for AnimationFrames {
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameId> {
        // Frees itself after running; a cancelled frame's closure is leaked
        let closure = Closure::once_into_js(move |_time: f64| callback());
        match self.window.request_animation_frame(closure.unchecked_ref()) {
            Ok(handle) => Some(FrameId(handle as u32 as u64)),
            Err(e) => {
                log::warn!("requestAnimationFrame failed: {:?}", e);
                None
            }
        }
    }

    fn cancel_frame(&self, id: FrameId) {
        let _ = self.window.cancel_animation_frame(id.0 as u32 as i32);
    }
}

/// An absolutely positioned element
#[derive(Debug, Clone)]
pub struct DomHandle {
    element: HtmlElement,
}

impl DomHandle {
    pub fn new(element: HtmlElement) -> Self {
        Self { element }
    }
}

impl VisualHandle for DomHandle {
    fn footprint(&self) -> Vec2 {
        Vec2::new(
            self.element.offset_width() as f32,
            self.element.offset_height() as f32,
        )
    }

    fn set_position(&self, pos: Vec2) -> bool {
        if !self.element.is_connected() {
            return false;
        }
        let style = self.element.style();
        style.set_property("left", &px(pos.x)).is_ok() && style.set_property("top", &px(pos.y)).is_ok()
    }
}

/// Every element matching `selector`, in document order
pub fn query_handles(selector: &str) -> Result<Vec<DomHandle>, Error> {
    let document = window()?.document().ok_or(Error::NoDocument)?;
    let nodes = document.query_selector_all(selector)?;
    let handles = (0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .map(DomHandle::new)
        .collect();
    Ok(handles)
}

/// Whether the user asked the browser for reduced motion
pub fn prefers_reduced_motion() -> bool {
    web_sys::window()
        .and_then(|w| w.match_media("(prefers-reduced-motion: reduce)").ok().flatten())
        .is_some_and(|query| query.matches())
}

/// Attach a simulator to every element matching `settings.selector`
pub fn attach_to_selector(settings: &Settings) -> Result<WebSimulator, Error> {
    settings.validate()?;
    let handles = query_handles(&settings.selector)?;
    if handles.is_empty() {
        log::info!("No elements match {:?}", settings.selector);
    }
    Ok(Simulator::attach(
        Rc::new(WindowViewport::new()?),
        Rc::new(AnimationFrames::new()?),
        handles,
        settings,
    ))
}

/// Bouncing elements, for host pages that manage the lifecycle themselves
#[wasm_bindgen]
pub struct BounceField {
    simulator: Option<WebSimulator>,
}

#[wasm_bindgen]
impl BounceField {
    /// Start bouncing every element matching `selector`
    #[wasm_bindgen(constructor)]
    pub fn new(selector: &str) -> Result<BounceField, JsValue> {
        let mut settings = Settings::load();
        settings.selector = selector.to_string();
        settings.reduced_motion |= prefers_reduced_motion();
        let simulator = attach_to_selector(&settings)?;
        Ok(BounceField {
            simulator: Some(simulator),
        })
    }

    /// Stop bouncing. Safe to call more than once.
    pub fn detach(&mut self) {
        if let Some(simulator) = self.simulator.take() {
            simulator.detach();
        }
    }

    #[wasm_bindgen(getter, js_name = bodyCount)]
    pub fn body_count(&self) -> usize {
        self.simulator.as_ref().map_or(0, WebSimulator::body_count)
    }
}
