use std::cell::RefCell;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use crate::app::radar_icon;

const SCAN_TEXTS: [&str; 5] = [
    "INITIALIZING TRAVEL LOG",
    "SCANNING COORDINATES",
    "LOADING CITY DATA",
    "RENDERING MAP INTERFACE",
    "SYSTEM READY",
];

const PROGRESS_TICK_MS: i32 = 30;
const PROGRESS_STEP: u32 = 2;
const TEXT_TICK_MS: i32 = 400;
const COMPLETE_DELAY_MS: i32 = 500;

struct IntervalBinding {
    window: web_sys::Window,
    interval_id: i32,
    _callback: Closure<dyn FnMut()>,
}

thread_local! {
    static PROGRESS_BINDING: RefCell<Option<IntervalBinding>> = const { RefCell::new(None) };
    static TEXT_BINDING: RefCell<Option<IntervalBinding>> = const { RefCell::new(None) };
}

fn replace_binding(
    slot: &'static std::thread::LocalKey<RefCell<Option<IntervalBinding>>>,
    binding: Option<IntervalBinding>,
) {
    slot.with(|cell| {
        if let Some(old) = cell.borrow_mut().take() {
            old.window.clear_interval_with_handle(old.interval_id);
        }
        *cell.borrow_mut() = binding;
    });
}

/// Stop an interval from inside its own callback. Clears the timer handle
/// but leaves the closure in its slot; the closure is dropped later, when
/// the binding is replaced or the splash unmounts.
fn stop_interval(slot: &'static std::thread::LocalKey<RefCell<Option<IntervalBinding>>>) {
    slot.with(|cell| {
        if let Some(binding) = cell.borrow().as_ref() {
            binding.window.clear_interval_with_handle(binding.interval_id);
        }
    });
}

fn bind_interval(
    window: &web_sys::Window,
    period_ms: i32,
    callback: Closure<dyn FnMut()>,
) -> Option<IntervalBinding> {
    let interval_id = window
        .set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            period_ms,
        )
        .ok()?;
    Some(IntervalBinding {
        window: window.clone(),
        interval_id,
        _callback: callback,
    })
}

/// Boot overlay: animated progress bar plus a cycling status line, then a
/// short hold before handing control to the main layout.
#[component]
pub fn SplashScreen(on_complete: Callback<()>) -> impl IntoView {
    let progress: RwSignal<u32> = RwSignal::new(0);
    let text_index: RwSignal<usize> = RwSignal::new(0);

    Effect::new(move || {
        let Some(window) = web_sys::window() else {
            progress.set(100);
            on_complete.run(());
            return;
        };

        let text_cb = Closure::<dyn FnMut()>::new(move || {
            text_index.update(|i| *i = (*i + 1) % SCAN_TEXTS.len());
        });
        replace_binding(&TEXT_BINDING, bind_interval(&window, TEXT_TICK_MS, text_cb));

        let progress_window = window.clone();
        let progress_cb = Closure::<dyn FnMut()>::new(move || {
            let next = progress.get_untracked() + PROGRESS_STEP;
            if next < 100 {
                progress.set(next);
                return;
            }
            progress.set(100);
            stop_interval(&PROGRESS_BINDING);
            stop_interval(&TEXT_BINDING);

            let done = Closure::once(move || on_complete.run(()));
            let _ = progress_window.set_timeout_with_callback_and_timeout_and_arguments_0(
                done.as_ref().unchecked_ref(),
                COMPLETE_DELAY_MS,
            );
            done.forget();
        });
        replace_binding(
            &PROGRESS_BINDING,
            bind_interval(&window, PROGRESS_TICK_MS, progress_cb),
        );
    });

    on_cleanup(|| {
        replace_binding(&PROGRESS_BINDING, None);
        replace_binding(&TEXT_BINDING, None);
    });

    view! {
        <div style="position: fixed; inset: 0; z-index: 50; display: flex; align-items: center; justify-content: center; background: #000;">
            <div style="position: absolute; inset: 0; background: radial-gradient(circle, rgba(30, 58, 138, 0.2) 0%, transparent 60%);" />
            <div style="position: relative; z-index: 10; display: flex; flex-direction: column; align-items: center; gap: 32px;">
                <div style="position: relative; color: #22d3ee;">
                    <div class="ping" style="position: absolute; inset: 0; opacity: 0.2;">
                        {radar_icon("96", "")}
                    </div>
                    {radar_icon("96", "spin-slow")}
                </div>
                <div style="display: flex; flex-direction: column; align-items: center; gap: 16px;">
                    <h1 style="font-size: 2.2rem; font-weight: 100; letter-spacing: 0.3em; color: #22d3ee; text-transform: uppercase; margin: 0;">
                        "Travel Command"
                    </h1>
                    <div style="width: 320px; height: 4px; background: #1f2937; border-radius: 2px; overflow: hidden;">
                        <div
                            style="height: 100%; background: linear-gradient(to right, #06b6d4, #3b82f6); transition: width 0.3s ease; box-shadow: 0 0 12px rgba(6, 182, 212, 0.5);"
                            style:width=move || format!("{}%", progress.get())
                        />
                    </div>
                    <p class="pulse" style="color: #67e8f9; font-family: monospace; font-size: 0.85rem; letter-spacing: 0.1em; margin: 0;">
                        {move || SCAN_TEXTS[text_index.get() % SCAN_TEXTS.len()]}
                    </p>
                </div>
            </div>
        </div>
    }
}
