use std::cell::Cell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use waypoint_shared::City;
use waypoint_shared::sheet::{self, CommaSplit, LoadError, ParsedCities};

const FETCH_TIMEOUT_MS: u32 = 10_000;

/// Fetch the published sheet as CSV and parse it into city records.
///
/// Exactly one network request per invocation and no retry — a failure is
/// surfaced to the caller immediately. The timeout aborting the request is
/// the only cancellation path.
pub async fn fetch_cities(sheet_url: &str) -> Result<ParsedCities, LoadError> {
    let sheet_id = sheet::extract_sheet_id(sheet_url).ok_or(LoadError::InvalidUrl)?;
    let csv_url = sheet::csv_export_url(sheet_id);
    web_sys::console::log_1(&format!("Fetching cities from: {csv_url}").into());

    let controller = web_sys::AbortController::new()
        .map_err(|_| LoadError::Network("failed to create abort controller".into()))?;
    let timed_out = Rc::new(Cell::new(false));
    let timeout = Timeout::new(FETCH_TIMEOUT_MS, {
        let controller = controller.clone();
        let timed_out = timed_out.clone();
        move || {
            timed_out.set(true);
            controller.abort();
        }
    });

    let response = gloo_net::http::Request::get(&csv_url)
        .abort_signal(Some(&controller.signal()))
        .send()
        .await;
    // Resolved either way — cancel the pending abort.
    drop(timeout);

    let response = match response {
        Ok(response) => response,
        Err(_) if timed_out.get() => return Err(LoadError::Timeout),
        Err(e) => return Err(LoadError::Network(format!("fetch error: {e}"))),
    };
    if !response.ok() {
        return Err(LoadError::FetchFailed(response.status()));
    }
    let text = response
        .text()
        .await
        .map_err(|e| LoadError::Network(format!("read error: {e}")))?;

    sheet::parse_cities(&text, &CommaSplit)
}

/// Kick off one city load and apply the outcome to the given signals.
///
/// A request-generation counter serializes overlapping loads: a completion
/// is dropped unless its generation is still current, so a superseded load
/// can never overwrite a newer one out of order.
pub fn load_cities(
    sheet_url: &str,
    cities: RwSignal<Vec<City>>,
    loading: RwSignal<bool>,
    error: RwSignal<Option<String>>,
    nonce: RwSignal<u64>,
) {
    let request = nonce.get_untracked().wrapping_add(1);
    nonce.set(request);
    loading.set(true);
    error.set(None);

    let url = sheet_url.to_string();
    spawn_local(async move {
        let result = fetch_cities(&url).await;
        if nonce.get_untracked() != request {
            return;
        }

        match result {
            Ok(parsed) => {
                for skip in &parsed.skipped {
                    web_sys::console::warn_1(&skip.to_string().into());
                }
                web_sys::console::log_1(
                    &format!("Loaded {} cities from the sheet", parsed.cities.len()).into(),
                );
                cities.set(parsed.cities);
            }
            Err(e) => {
                web_sys::console::warn_1(&format!("City load failed: {e}").into());
                error.set(Some(e.to_string()));
            }
        }
        loading.set(false);
    });
}
