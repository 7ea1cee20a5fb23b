//! Bounce Field entry point
//!
//! On the web: attaches to the page's circles and detaches when the page is
//! unloaded (a `pagehide` that doesn't go to the back/forward cache).
//! Natively: runs a headless demo and logs the body traces.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_page {
    use std::cell::RefCell;

    use wasm_bindgen::prelude::*;

    use bounce_field::Settings;
    use bounce_field::platform::PageHide;
    use bounce_field::platform::web::{WebSimulator, attach_to_selector, prefers_reduced_motion};

    thread_local! {
        static ACTIVE: RefCell<Option<WebSimulator>> = const { RefCell::new(None) };
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger init failed: {}", e).into());
        }

        let mut settings = Settings::load();
        settings.reduced_motion |= prefers_reduced_motion();

        let simulator = attach_to_selector(&settings)?;
        ACTIVE.with(|active| *active.borrow_mut() = Some(simulator));

        setup_teardown()?;
        Ok(())
    }

    fn setup_teardown() -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::PageTransitionEvent| {
            let hide = PageHide::from_persisted(event.persisted());
            if !hide.detaches() {
                log::debug!("Page cached, staying attached");
                return;
            }
            ACTIVE.with(|active| {
                if let Some(simulator) = active.borrow_mut().take() {
                    simulator.detach();
                }
            });
        });
        window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_page::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::rc::Rc;

    use bounce_field::platform::{HeadlessViewport, ManualScheduler, MemoryHandle};
    use bounce_field::{Settings, Simulator};

    env_logger::init();

    let settings = Settings::load();
    log::info!("Bounce Field (headless) starting...");
    match settings.to_json() {
        Ok(json) => log::debug!("{}={}", Settings::ENV_VAR, json),
        Err(e) => log::warn!("Settings not serializable: {}", e),
    }

    let viewport = Rc::new(HeadlessViewport::new(800.0, 600.0));
    let scheduler = Rc::new(ManualScheduler::new());
    let handles: Vec<MemoryHandle> = [60.0, 60.0, 80.0, 40.0, 0.0]
        .into_iter()
        .map(MemoryHandle::new)
        .collect();

    let simulator = Simulator::attach(viewport.clone(), scheduler.clone(), handles.clone(), &settings);

    scheduler.run_frames(240);
    log::info!("Shrinking viewport to 400x300");
    viewport.resize(400.0, 300.0);
    scheduler.run_frames(240);

    match serde_json::to_string_pretty(&simulator.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Snapshot serialization failed: {}", e),
    }
    for (index, handle) in handles.iter().enumerate() {
        log::info!(
            "Body {}: {} writes, last at {:?}",
            index,
            handle.write_count(),
            handle.last_position()
        );
    }

    simulator.detach();
}
