use std::fmt::Write as FmtWrite;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{PointerEvent, WheelEvent};

use waypoint_shared::City;
use waypoint_shared::geo::{BoundarySet, MapProjection};

use crate::app::{IsMobile, Selected};
use crate::theme::Theme;
use crate::viewport::Viewport;

/// Fixed drawing surface the projection is fitted to.
const MAP_WIDTH: f64 = 800.0;
const MAP_HEIGHT: f64 = 900.0;

const VISITED_COLOR: &str = "#ef4444";
const UNVISITED_COLOR: &str = "#84cc16";

/// A city with surface coordinates under the fitted projection.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedCity {
    pub city: City,
    pub x: f64,
    pub y: f64,
}

/// Project the whole collection. A city whose coordinates fall outside the
/// projection's domain gets no marker.
pub fn project_cities(projection: &MapProjection, cities: &[City]) -> Vec<ProjectedCity> {
    cities
        .iter()
        .filter_map(|city| {
            projection
                .project(city.lat, city.lng)
                .map(|(x, y)| ProjectedCity {
                    city: city.clone(),
                    x,
                    y,
                })
        })
        .collect()
}

/// Selection effect of a marker click.
fn select_city(selected: RwSignal<Option<String>>, name: &str) {
    selected.set(Some(name.to_string()));
}

/// Navigation effect of a marker click: open the city's image link in a
/// new browsing context. Always runs after `select_city`, in that order.
fn open_image_link(link: Option<&str>) {
    let Some(url) = link else {
        return;
    };
    let Some(window) = web_sys::window() else {
        return;
    };
    let _ = window.open_with_url_and_target(url, "_blank");
}

/// Static SVG markup for the boundary layer: defs (glow filter, grid
/// pattern), the background grid, and one path per boundary feature. The
/// grid and glow are dropped below the mobile breakpoint; projection and
/// interaction are unaffected.
fn boundary_layer_html(paths: &[(String, String, String)], theme: Theme, is_mobile: bool) -> String {
    let accent = theme.accent();
    let mut html = String::new();

    let _ = write!(
        html,
        r##"<defs><filter id="glow"><feGaussianBlur stdDeviation="2" result="coloredBlur" /><feMerge><feMergeNode in="coloredBlur" /><feMergeNode in="SourceGraphic" /></feMerge></filter><pattern id="grid" width="20" height="20" patternUnits="userSpaceOnUse"><path d="M 20 0 L 0 0 0 20" fill="none" stroke="{accent}" stroke-width="0.3" opacity="0.1" /></pattern></defs>"##
    );
    if !is_mobile {
        let _ = write!(
            html,
            r##"<rect width="{MAP_WIDTH}" height="{MAP_HEIGHT}" fill="url(#grid)" />"##
        );
    }

    let stroke_width = if is_mobile { "0.8" } else { "1" };
    let filter_attr = if is_mobile { "" } else { r##" filter="url(#glow)""## };
    for (_, label, d) in paths {
        if d.is_empty() {
            continue;
        }
        let _ = write!(
            html,
            r##"<path d="{d}" fill="rgba(0, 0, 0, 0.6)" stroke="{accent}" stroke-width="{stroke_width}"{filter_attr}><title>{label}</title></path>"##
        );
    }
    html
}

/// Interactive map: boundary polygons underneath, city markers on top,
/// inside a pannable, zoomable container.
#[component]
pub fn MapView() -> impl IntoView {
    let cities: RwSignal<Vec<City>> = expect_context();
    let Selected(selected) = expect_context();
    let theme: RwSignal<Theme> = expect_context();
    let IsMobile(is_mobile) = expect_context();

    // One projection per mounted surface, shared by polygons and markers so
    // they stay spatially coherent.
    let projection = MapProjection::fit(MAP_WIDTH, MAP_HEIGHT, BoundarySet::bundled());
    let boundary_paths: StoredValue<Vec<(String, String, String)>> = StoredValue::new(
        BoundarySet::bundled()
            .features()
            .iter()
            .map(|feature| {
                (
                    feature.id.clone(),
                    feature.label(),
                    projection.polygon_path(feature),
                )
            })
            .collect(),
    );

    let viewport: RwSignal<Viewport> = RwSignal::new(Viewport::default());
    let hovered: RwSignal<Option<String>> = RwSignal::new(None);

    let projected = Memo::new(move |_| cities.with(|list| project_cities(&projection, list)));

    let on_wheel = move |e: WheelEvent| {
        e.prevent_default();
        viewport.update(|vp| vp.zoom(e.delta_y()));
    };

    let on_pointer_down = move |e: PointerEvent| {
        viewport.update(|vp| vp.begin_drag(e.client_x() as f64, e.client_y() as f64));
        if let Some(target) = e.target()
            && let Ok(el) = target.dyn_into::<web_sys::Element>()
        {
            el.set_pointer_capture(e.pointer_id()).ok();
        }
    };

    let on_pointer_move = move |e: PointerEvent| {
        if viewport.with_untracked(|vp| vp.dragging) {
            viewport.update(|vp| vp.drag_to(e.client_x() as f64, e.client_y() as f64));
        }
    };

    let release_drag = move || {
        if viewport.with_untracked(|vp| vp.dragging) {
            viewport.update(|vp| vp.end_drag());
        }
    };

    view! {
        <div
            style="position: relative; width: 100%; height: 100%; overflow: hidden; border-radius: 8px;"
            style:cursor=move || if viewport.get().dragging { "grabbing" } else { "grab" }
            on:wheel=on_wheel
            on:pointerdown=on_pointer_down
            on:pointermove=on_pointer_move
            on:pointerup=move |_| release_drag()
            on:pointerleave=move |_| release_drag()
        >
            <svg
                viewBox=format!("0 0 {MAP_WIDTH} {MAP_HEIGHT}")
                style="width: 100%; height: 100%;"
                style:transform=move || viewport.get().transform_css()
                style:transition=move || {
                    if viewport.get().dragging { "none" } else { "transform 0.3s ease" }
                }
            >
                <g inner_html=move || {
                    boundary_paths.with_value(|paths| {
                        boundary_layer_html(paths, theme.get(), is_mobile.get())
                    })
                } />
                <For
                    each=move || projected.get()
                    key=|pc| pc.city.name.clone()
                    children=move |pc| view! { <CityMarker projected=pc hovered /> }
                />
            </svg>
        </div>
    }
}

/// One city marker: highlight rings on hover/selection, a visited-coded
/// core dot, and a hover label.
#[component]
fn CityMarker(projected: ProjectedCity, hovered: RwSignal<Option<String>>) -> impl IntoView {
    let Selected(selected) = expect_context();
    let theme: RwSignal<Theme> = expect_context();

    let ProjectedCity { city, x, y } = projected;
    let color = if city.visited {
        VISITED_COLOR
    } else {
        UNVISITED_COLOR
    };
    let name = city.name;
    let image_link = city.image_link;

    let is_hovered = {
        let name = name.clone();
        Memo::new(move |_| hovered.get().as_deref() == Some(name.as_str()))
    };
    let is_selected = {
        let name = name.clone();
        Memo::new(move |_| selected.get().as_deref() == Some(name.as_str()))
    };

    let on_click = {
        let name = name.clone();
        move |_| {
            select_city(selected, &name);
            open_image_link(image_link.as_deref());
        }
    };
    let on_enter = {
        let name = name.clone();
        move |_| hovered.set(Some(name.clone()))
    };
    let on_leave = move |_| hovered.set(None);

    let label = name.clone();
    let label_width = format!("{}", label.len() * 8 + 16);

    view! {
        <g
            style="cursor: pointer;"
            on:click=on_click
            on:mouseenter=on_enter
            on:mouseleave=on_leave
        >
            {move || (is_hovered.get() || is_selected.get()).then(|| view! {
                <g>
                    <circle
                        class="ping"
                        cx=format!("{x}") cy=format!("{y}") r="12"
                        fill="none"
                        stroke=theme.get().accent()
                        style="stroke-width: 2; opacity: 0.3;"
                    />
                    <circle
                        cx=format!("{x}") cy=format!("{y}") r="8"
                        fill="none"
                        stroke=theme.get().accent()
                        style="stroke-width: 1; opacity: 0.5;"
                    />
                </g>
            })}
            <circle
                cx=format!("{x}") cy=format!("{y}") r="4"
                fill=color
                style=move || {
                    let radius = if is_hovered.get() || is_selected.get() { 8 } else { 4 };
                    format!("filter: drop-shadow(0 0 {radius}px {color}); transition: all 0.3s ease;")
                }
            />
            <circle
                cx=format!("{x}") cy=format!("{y}") r="6"
                fill="none"
                stroke=color
                style="stroke-width: 1.5; opacity: 0.8; transition: all 0.3s ease;"
            />
            {move || is_hovered.get().then(|| view! {
                <g>
                    <rect
                        x=format!("{}", x + 10.0) y=format!("{}", y - 15.0)
                        width=label_width.clone() height="30" rx="4"
                        fill="rgba(0, 0, 0, 0.9)"
                        stroke=theme.get().accent()
                        style="stroke-width: 1;"
                    />
                    <text
                        x=format!("{}", x + 18.0) y=format!("{}", y + 4.0)
                        fill=theme.get().accent()
                        style="font-size: 12px; font-family: monospace; font-weight: 300;"
                    >
                        {label.clone()}
                    </text>
                </g>
            })}
        </g>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(name: &str, lat: f64, lng: f64) -> City {
        City {
            name: name.into(),
            lat,
            lng,
            visited: false,
            image_link: None,
        }
    }

    #[test]
    fn unprojectable_cities_get_no_marker() {
        let projection = MapProjection::fit(MAP_WIDTH, MAP_HEIGHT, BoundarySet::bundled());
        let cities = vec![city("Delhi", 28.6, 77.2), city("NorthPole", 90.0, 0.0)];
        let projected = project_cities(&projection, &cities);
        assert_eq!(projected.len(), 1);
        assert_eq!(projected[0].city.name, "Delhi");
        assert!(projected[0].x.is_finite() && projected[0].y.is_finite());
    }

    #[test]
    fn projecting_twice_is_deterministic() {
        let projection = MapProjection::fit(MAP_WIDTH, MAP_HEIGHT, BoundarySet::bundled());
        let cities = vec![city("Delhi", 28.6, 77.2)];
        assert_eq!(
            project_cities(&projection, &cities),
            project_cities(&projection, &cities)
        );
    }

    #[test]
    fn boundary_layer_drops_decorations_on_mobile() {
        let paths = vec![(
            "A-B-0".to_string(),
            "A - B".to_string(),
            "M0,0L1,1Z".to_string(),
        )];
        let desktop = boundary_layer_html(&paths, Theme::NeonBlue, false);
        assert!(desktop.contains("url(#grid)"));
        assert!(desktop.contains("url(#glow)"));
        assert!(desktop.contains("<title>A - B</title>"));

        let mobile = boundary_layer_html(&paths, Theme::NeonBlue, true);
        assert!(!mobile.contains("url(#grid)"));
        assert!(!mobile.contains("url(#glow)"));
        assert!(mobile.contains("stroke-width=\"0.8\""));
    }

    #[test]
    fn boundary_layer_skips_empty_paths() {
        let paths = vec![("A-B-0".to_string(), "A - B".to_string(), String::new())];
        let html = boundary_layer_html(&paths, Theme::CyberPurple, false);
        assert!(!html.contains("<path d=\"\""));
    }
}
