use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;

use waypoint_shared::City;

use crate::glass::GlassPanel;
use crate::theme::Theme;

const COUNTER_ANIMATION_MS: f64 = 1000.0;
const COUNTER_TICK_MS: i32 = 16;
/// Reference total for the exploration meter.
const TRACKED_CITY_TOTAL: f64 = 200.0;

struct CounterBinding {
    window: web_sys::Window,
    interval_id: i32,
    _callback: Closure<dyn FnMut()>,
}

thread_local! {
    static COUNTER_BINDING: RefCell<Option<CounterBinding>> = const { RefCell::new(None) };
}

/// Stop the counter interval from inside its own tick. Clears the timer
/// but leaves the closure in the slot; it is dropped when the binding is
/// replaced or the panel unmounts.
fn stop_counter_interval() {
    COUNTER_BINDING.with(|slot| {
        if let Some(binding) = slot.borrow().as_ref() {
            binding.window.clear_interval_with_handle(binding.interval_id);
        }
    });
}

fn replace_counter_binding(binding: Option<CounterBinding>) {
    COUNTER_BINDING.with(|slot| {
        if let Some(old) = slot.borrow_mut().take() {
            old.window.clear_interval_with_handle(old.interval_id);
        }
        *slot.borrow_mut() = binding;
    });
}

/// Serialize the current collection and offer it as a JSON download.
/// Pure one-shot export; no in-memory state is touched.
fn export_travel_log(cities: &[City]) {
    let Ok(json) = serde_json::to_string_pretty(cities) else {
        return;
    };
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(&json));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type("application/json");
    let Ok(blob) = web_sys::Blob::new_with_str_sequence_and_options(&parts, &options) else {
        return;
    };
    let Ok(url) = web_sys::Url::create_object_url_with_blob(&blob) else {
        return;
    };

    if let Ok(el) = document.create_element("a")
        && let Ok(anchor) = el.dyn_into::<web_sys::HtmlAnchorElement>()
    {
        anchor.set_href(&url);
        anchor.set_download("travel-history.json");
        anchor.click();
    }
    let _ = web_sys::Url::revoke_object_url(&url);
}

/// Aggregate panel: animated visited counter, exploration meter, totals,
/// and the export button.
#[component]
pub fn StatsPanel() -> impl IntoView {
    let cities: RwSignal<Vec<City>> = expect_context();
    let theme: RwSignal<Theme> = expect_context();

    let visited_count = Memo::new(move |_| cities.with(|all| all.iter().filter(|c| c.visited).count()));
    let total_count = Memo::new(move |_| cities.with(|all| all.len()));
    let remaining_count = move || total_count.get().saturating_sub(visited_count.get());
    let progress_percent = move || {
        ((visited_count.get() as f64 / TRACKED_CITY_TOTAL) * 100.0).min(100.0)
    };

    let animated: RwSignal<usize> = RwSignal::new(0);

    // Animate the visited counter toward each new target.
    Effect::new(move || {
        let target = visited_count.get();
        animated.set(0);
        if target == 0 {
            replace_counter_binding(None);
            return;
        }
        let Some(window) = web_sys::window() else {
            animated.set(target);
            return;
        };

        let increment = target as f64 / (COUNTER_ANIMATION_MS / COUNTER_TICK_MS as f64);
        let progress = Rc::new(Cell::new(0.0f64));
        let callback = Closure::<dyn FnMut()>::new(move || {
            let next = progress.get() + increment;
            progress.set(next);
            if next >= target as f64 {
                animated.set(target);
                stop_counter_interval();
            } else {
                animated.set(next.floor() as usize);
            }
        });

        match window.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            COUNTER_TICK_MS,
        ) {
            Ok(interval_id) => replace_counter_binding(Some(CounterBinding {
                window: window.clone(),
                interval_id,
                _callback: callback,
            })),
            Err(_) => animated.set(target),
        }
    });

    on_cleanup(|| {
        replace_counter_binding(None);
    });

    let on_export = move |_| cities.with_untracked(|all| export_travel_log(all));

    view! {
        <GlassPanel style="padding: 24px;">
            <div style="display: flex; flex-direction: column; gap: 24px;">
                <div style="text-align: center;">
                    <div
                        style="font-size: 3.6rem; font-weight: 100; font-variant-numeric: tabular-nums; margin-bottom: 8px;"
                        style:color=move || theme.get().accent()
                    >
                        {move || animated.get()}
                    </div>
                    <div style="font-size: 0.8rem; color: #9ca3af; font-family: monospace; letter-spacing: 0.1em; text-transform: uppercase;">
                        "Cities Visited"
                    </div>
                </div>

                <div style="display: flex; flex-direction: column; gap: 12px;">
                    <div style="display: flex; align-items: center; justify-content: space-between; font-size: 0.85rem;">
                        <span style="color: #9ca3af; font-family: monospace;">"India Explored"</span>
                        <span
                            style="font-family: monospace; font-weight: 700;"
                            style:color=move || theme.get().accent()
                        >
                            {move || format!("{:.1}%", progress_percent())}
                        </span>
                    </div>
                    <div style="position: relative; height: 12px; background: #1f2937; border-radius: 6px; overflow: hidden;">
                        <div
                            style="position: absolute; inset: 0 auto 0 0; transition: width 1s ease-out;"
                            style:width=move || format!("{}%", progress_percent())
                            style:background=move || {
                                format!(
                                    "linear-gradient(to right, {}, {})",
                                    theme.get().accent(),
                                    theme.get().gradient_end(),
                                )
                            }
                            style:box-shadow=move || format!("0 0 10px {}", theme.get().accent())
                        />
                    </div>
                </div>

                <div style="display: grid; grid-template-columns: 1fr 1fr; gap: 16px;">
                    <StatTile label="Total Cities" value=Signal::derive(move || total_count.get()) />
                    <StatTile label="Remaining" value=Signal::derive(remaining_count) />
                </div>

                <button
                    style="width: 100%; display: flex; align-items: center; justify-content: center; gap: 8px; padding: 12px; border-radius: 6px; background: transparent; cursor: pointer; font-family: monospace; font-size: 0.85rem; transition: all 0.3s ease;"
                    style:border=move || format!("1px solid {}", theme.get().border())
                    style:color=move || theme.get().accent()
                    on:click=on_export
                >
                    // Download icon
                    <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" width="16" height="16">
                        <path d="M21 15v4a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2v-4" />
                        <polyline points="7 10 12 15 17 10" />
                        <line x1="12" x2="12" y1="15" y2="3" />
                    </svg>
                    <span>"Export Travel Log"</span>
                </button>
            </div>
        </GlassPanel>
    }
}

#[component]
fn StatTile(label: &'static str, value: Signal<usize>) -> impl IntoView {
    let theme: RwSignal<Theme> = expect_context();

    view! {
        <div style="display: flex; align-items: center; gap: 12px; padding: 12px; background: rgba(0, 0, 0, 0.3); border-radius: 6px; border: 1px solid #374151;">
            <div>
                <div
                    style="font-size: 1.6rem; font-weight: 100;"
                    style:color=move || theme.get().accent()
                >
                    {move || value.get()}
                </div>
                <div style="font-size: 0.7rem; color: #9ca3af; font-family: monospace;">{label}</div>
            </div>
        </div>
    }
}
