use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;

/// Continuous `requestAnimationFrame` loop, gated to a minimum interval
/// between ticks so decorative animation can run below display refresh.
///
/// Dropping the loop cancels the pending frame — no tick can fire after
/// the owning view is torn down.
pub struct FrameLoop {
    inner: Rc<Inner>,
}

struct Inner {
    window: Option<web_sys::Window>,
    raf_id: Cell<Option<i32>>,
    last_tick: Cell<f64>,
    interval_ms: f64,
    callback: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl FrameLoop {
    pub fn new(interval_ms: f64, mut tick: impl FnMut() + 'static) -> Self {
        let inner = Rc::new(Inner {
            window: web_sys::window(),
            raf_id: Cell::new(None),
            last_tick: Cell::new(0.0),
            interval_ms,
            callback: RefCell::new(None),
        });

        let inner_cb = inner.clone();
        let cb = Closure::<dyn FnMut()>::new(move || {
            inner_cb.raf_id.set(None);
            let now = js_sys::Date::now();
            if now - inner_cb.last_tick.get() >= inner_cb.interval_ms {
                inner_cb.last_tick.set(now);
                tick();
            }
            Self::schedule(&inner_cb);
        });
        *inner.callback.borrow_mut() = Some(cb);

        Self { inner }
    }

    /// Begin the loop. Idempotent while a frame is already pending.
    pub fn start(&self) {
        Self::schedule(&self.inner);
    }

    fn schedule(inner: &Rc<Inner>) {
        if inner.raf_id.get().is_some() {
            return;
        }
        let Some(window) = inner.window.as_ref() else {
            return;
        };
        let cb_ref = inner.callback.borrow();
        if let Some(ref cb) = *cb_ref
            && let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref())
        {
            inner.raf_id.set(Some(id));
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let Some(raf_id) = self.inner.raf_id.replace(None)
            && let Some(window) = self.inner.window.as_ref()
        {
            let _ = window.cancel_animation_frame(raf_id);
        }
        // Break the callback->inner reference cycle on teardown.
        self.inner.callback.borrow_mut().take();
    }
}
