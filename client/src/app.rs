use std::cell::RefCell;

use gloo_storage::Storage;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use waypoint_shared::City;

use crate::cities;
use crate::city_list::CityList;
use crate::glass::GlassPanel;
use crate::map_view::MapView;
use crate::particles::ParticleBackground;
use crate::splash::SplashScreen;
use crate::stats::StatsPanel;
use crate::theme::{THEME_STORAGE_KEY, Theme, ThemeToggle};

/// Published sheet the dashboard reads its city list from.
const SHEET_URL: &str =
    "https://docs.google.com/spreadsheets/d/17qIOCxerf5C_YHIzUx6n4NFI3IorMJicLGxkAy35LQU/edit?usp=sharing";

/// Below this viewport width, decorative map effects are suppressed.
const MOBILE_BREAKPOINT_PX: f64 = 768.0;

/// Newtype wrappers to give same-typed signals distinct types for Leptos
/// context (without them, `provide_context` overwrites one with the other).
#[derive(Clone, Copy)]
pub(crate) struct Selected(pub RwSignal<Option<String>>);
#[derive(Clone, Copy)]
pub(crate) struct IsMobile(pub RwSignal<bool>);

struct ResizeBinding {
    window: web_sys::Window,
    _handler: Closure<dyn Fn()>,
}

thread_local! {
    static RESIZE_BINDING: RefCell<Option<ResizeBinding>> = const { RefCell::new(None) };
}

fn viewport_is_mobile() -> bool {
    web_sys::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|v| v.as_f64())
        .map(|w| w <= MOBILE_BREAKPOINT_PX)
        .unwrap_or(false)
}

/// Root application component. Provides global reactive signals via context.
#[component]
pub fn App() -> impl IntoView {
    let cities: RwSignal<Vec<City>> = RwSignal::new(Vec::new());
    let loading: RwSignal<bool> = RwSignal::new(true);
    let load_error: RwSignal<Option<String>> = RwSignal::new(None);
    let load_nonce: RwSignal<u64> = RwSignal::new(0);
    let selected: RwSignal<Option<String>> = RwSignal::new(None);
    let show_splash: RwSignal<bool> = RwSignal::new(true);
    let is_mobile: RwSignal<bool> = RwSignal::new(viewport_is_mobile());
    let saved: Theme = gloo_storage::LocalStorage::get(THEME_STORAGE_KEY).unwrap_or_default();
    let theme: RwSignal<Theme> = RwSignal::new(saved);

    provide_context(cities);
    provide_context(theme);
    provide_context(Selected(selected));
    provide_context(IsMobile(is_mobile));

    // Persist the theme preference on any change.
    Effect::new(move || {
        let _ = gloo_storage::LocalStorage::set(THEME_STORAGE_KEY, &theme.get());
    });

    // Single data load per mount. The nonce inside load_cities keeps a
    // stale completion from overwriting a newer one.
    Effect::new(move || {
        cities::load_cities(SHEET_URL, cities, loading, load_error, load_nonce);
    });

    // Track the mobile breakpoint across window resizes.
    Effect::new(move || {
        let Some(window) = web_sys::window() else {
            return;
        };

        RESIZE_BINDING.with(|slot| {
            if let Some(old) = slot.borrow_mut().take() {
                let _ = old.window.remove_event_listener_with_callback(
                    "resize",
                    old._handler.as_ref().unchecked_ref(),
                );
            }
        });

        let handler = Closure::<dyn Fn()>::new(move || {
            is_mobile.set(viewport_is_mobile());
        });
        if window
            .add_event_listener_with_callback("resize", handler.as_ref().unchecked_ref())
            .is_ok()
        {
            RESIZE_BINDING.with(|slot| {
                *slot.borrow_mut() = Some(ResizeBinding {
                    window: window.clone(),
                    _handler: handler,
                });
            });
        }
    });

    view! {
        {move || {
            if show_splash.get() {
                view! { <SplashScreen on_complete=Callback::new(move |_| show_splash.set(false)) /> }.into_any()
            } else {
                view! {
                    <div style="min-height: 100vh; position: relative; overflow: hidden;">
                        <ParticleBackground />
                        <ThemeToggle />
                        <div style="position: relative; z-index: 10; max-width: 1400px; margin: 0 auto; padding: 32px 16px; height: 100vh; display: flex; flex-direction: column;">
                            <Header />
                            {move || {
                                if loading.get() {
                                    view! { <LoadingView /> }.into_any()
                                } else if let Some(message) = load_error.get() {
                                    view! { <ErrorView message /> }.into_any()
                                } else {
                                    view! { <Dashboard /> }.into_any()
                                }
                            }}
                        </div>
                    </div>
                }
                .into_any()
            }
        }}
    }
}

/// Inline radar icon used by the header and loading view.
pub(crate) fn radar_icon(size: &'static str, class: &'static str) -> impl IntoView {
    view! {
        <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" width=size height=size class=class>
            <path d="M19.07 4.93A10 10 0 0 0 6.99 3.34" />
            <path d="M4 6h.01" />
            <path d="M2.29 9.62a10 10 0 1 0 19.02-1.27" />
            <path d="M16.24 7.76a6 6 0 1 0-8.01 8.91" />
            <path d="M12 18h.01" />
            <path d="M17.99 11.66a6 6 0 0 1-2.22 4.75" />
            <circle cx="12" cy="12" r="2" />
            <path d="m13.41 10.59 5.66-5.66" />
        </svg>
    }
}

#[component]
fn Header() -> impl IntoView {
    let theme: RwSignal<Theme> = expect_context();

    view! {
        <header style="margin-bottom: 24px;">
            <div
                style="display: flex; align-items: center; justify-content: center; gap: 16px; margin-bottom: 8px;"
                style:color=move || theme.get().accent()
            >
                {radar_icon("32", "pulse")}
                <h1 style="font-size: 3rem; font-weight: 100; letter-spacing: 0.3em; text-transform: uppercase; margin: 0;">
                    "Travel Command"
                </h1>
            </div>
            <p style="text-align: center; color: #9ca3af; font-family: monospace; font-size: 0.85rem; letter-spacing: 0.1em; margin: 0;">
                "INDIAN TRAVEL NAVIGATION SYSTEM"
            </p>
        </header>
    }
}

#[component]
fn LoadingView() -> impl IntoView {
    let theme: RwSignal<Theme> = expect_context();

    view! {
        <div style="flex: 1; display: flex; align-items: center; justify-content: center;">
            <div
                style="text-align: center; display: flex; flex-direction: column; align-items: center; gap: 16px;"
                style:color=move || theme.get().accent()
            >
                {radar_icon("64", "spin")}
                <p class="pulse" style="font-family: monospace; font-size: 0.85rem; letter-spacing: 0.08em;">
                    "LOADING TRAVEL DATA..."
                </p>
            </div>
        </div>
    }
}

#[component]
fn ErrorView(message: String) -> impl IntoView {
    view! {
        <div style="flex: 1; display: flex; align-items: center; justify-content: center;">
            <GlassPanel style="padding: 32px;">
                <p style="color: #f87171; font-family: monospace; margin: 0;">
                    "ERROR: " {message}
                </p>
            </GlassPanel>
        </div>
    }
}

#[component]
fn Dashboard() -> impl IntoView {
    let IsMobile(is_mobile) = expect_context();

    let grid_style = move || {
        if is_mobile.get() {
            "flex: 1; display: grid; grid-template-columns: 1fr; gap: 24px; overflow-y: auto;"
        } else {
            "flex: 1; display: grid; grid-template-columns: 3fr 6fr 3fr; gap: 24px; overflow: hidden;"
        }
    };

    view! {
        <div style=grid_style>
            <div style="overflow-y: auto;">
                <StatsPanel />
            </div>
            <GlassPanel style="height: 100%; padding: 16px; min-height: 420px;">
                <MapView />
            </GlassPanel>
            <div style="overflow: hidden;">
                <CityList />
            </div>
        </div>
    }
}
