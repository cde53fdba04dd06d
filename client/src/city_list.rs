use leptos::prelude::*;
use wasm_bindgen::JsCast;

use waypoint_shared::City;

use crate::app::Selected;
use crate::glass::GlassPanel;
use crate::theme::Theme;

/// Searchable, sortable list of every loaded city. Clicking a row selects
/// the city on the map.
#[component]
pub fn CityList() -> impl IntoView {
    let cities: RwSignal<Vec<City>> = expect_context();
    let Selected(selected) = expect_context();
    let theme: RwSignal<Theme> = expect_context();

    let search_query: RwSignal<String> = RwSignal::new(String::new());
    let sort_ascending: RwSignal<bool> = RwSignal::new(true);

    let filtered = Memo::new(move |_| {
        let query = search_query.get().to_lowercase();
        let ascending = sort_ascending.get();
        let mut rows: Vec<String> = cities.with(|all| {
            all.iter()
                .filter(|city| city.name.to_lowercase().contains(&query))
                .map(|city| city.name.clone())
                .collect()
        });
        rows.sort_by(|a, b| if ascending { a.cmp(b) } else { b.cmp(a) });
        rows
    });

    let on_input = move |e: leptos::ev::Event| {
        let Some(target) = e.target() else {
            return;
        };
        let Ok(input) = target.dyn_into::<web_sys::HtmlInputElement>() else {
            return;
        };
        search_query.set(input.value());
    };

    view! {
        <GlassPanel style="padding: 24px; height: 100%; display: flex; flex-direction: column;">
            <div style="display: flex; align-items: center; justify-content: space-between; margin-bottom: 24px;">
                <h2
                    style="font-size: 1.2rem; font-weight: 100; letter-spacing: 0.1em; text-transform: uppercase; margin: 0;"
                    style:color=move || theme.get().accent()
                >
                    "Cities Visited"
                </h2>
                <div
                    style="font-family: monospace; font-size: 1.4rem;"
                    style:color=move || theme.get().accent()
                >
                    {move || cities.with(|c| c.len())}
                </div>
            </div>

            <div style="margin-bottom: 16px; display: flex; flex-direction: column; gap: 12px;">
                <input
                    type="text"
                    placeholder="Search cities..."
                    style="width: 100%; padding: 8px 16px; background: rgba(0, 0, 0, 0.5); border-radius: 6px; font-family: monospace; font-size: 0.85rem; outline: none;"
                    style:border=move || format!("1px solid {}", theme.get().border())
                    style:color=move || theme.get().accent()
                    prop:value=move || search_query.get()
                    on:input=on_input
                />
                <button
                    style="display: flex; align-items: center; gap: 8px; padding: 8px 12px; border-radius: 6px; background: transparent; cursor: pointer; font-family: monospace; font-size: 0.85rem; transition: all 0.3s ease;"
                    style:border=move || format!("1px solid {}", theme.get().border())
                    style:color=move || theme.get().accent()
                    on:click=move |_| sort_ascending.update(|asc| *asc = !*asc)
                >
                    {move || if sort_ascending.get() { "A \u{2192} Z" } else { "Z \u{2192} A" }}
                </button>
            </div>

            <div style="flex: 1; overflow-y: auto; display: flex; flex-direction: column; gap: 8px;">
                <For
                    each=move || filtered.get()
                    key=|name| name.clone()
                    children=move |name| {
                        let row_name = name.clone();
                        let is_selected = {
                            let name = name.clone();
                            Memo::new(move |_| selected.get().as_deref() == Some(name.as_str()))
                        };
                        view! {
                            <div
                                style="display: flex; align-items: center; gap: 12px; padding: 12px; border-radius: 6px; cursor: pointer; transition: all 0.3s ease;"
                                style:border=move || format!("1px solid {}", theme.get().border())
                                style:background=move || {
                                    if is_selected.get() {
                                        theme.get().wash().to_string()
                                    } else {
                                        "rgba(0, 0, 0, 0.2)".to_string()
                                    }
                                }
                                on:click=move |_| selected.set(Some(row_name.clone()))
                            >
                                // Map-pin icon
                                <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" width="16" height="16" style:color=move || theme.get().accent()>
                                    <path d="M20 10c0 4.993-5.539 10.193-7.399 11.799a1 1 0 0 1-1.202 0C9.539 20.193 4 14.993 4 10a8 8 0 0 1 16 0" />
                                    <circle cx="12" cy="10" r="3" />
                                </svg>
                                <div
                                    style="font-family: monospace; font-size: 0.85rem;"
                                    style:color=move || theme.get().accent()
                                >
                                    {name.clone()}
                                </div>
                            </div>
                        }
                    }
                />
            </div>
        </GlassPanel>
    }
}
