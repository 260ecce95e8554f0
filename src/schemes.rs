use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use kvartal_core::{resolve_scheme, SchemeRequest, SchemeSet, SchemeSource};

use crate::storage;

/// What a plan view can be showing. `Missing` (nothing configured at any
/// layer) and `Unavailable` (configured but the locator failed) are
/// distinct on purpose so the operator can tell them apart.
#[derive(Clone, PartialEq)]
pub(crate) enum PlanState {
    Loading,
    Missing,
    Ready(String),
    Unavailable(String),
}

pub(crate) async fn load_plan(
    request: SchemeRequest<'_>,
    defaults: &SchemeSet,
    overrides: &SchemeSet,
) -> PlanState {
    let Some(reference) = resolve_scheme(request, defaults, overrides) else {
        return PlanState::Missing;
    };
    match SchemeSource::classify(reference) {
        None => PlanState::Missing,
        Some(SchemeSource::Inline(markup)) => PlanState::Ready(markup),
        Some(SchemeSource::Locator(url)) => match fetch_text(&url).await {
            Ok(markup) => PlanState::Ready(markup),
            Err(message) => PlanState::Unavailable(message),
        },
    }
}

async fn fetch_text(url: &str) -> Result<String, String> {
    let window = web_sys::window().ok_or_else(|| "missing window".to_string())?;
    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(storage::js_err)?;
    let response: Response = response
        .dyn_into()
        .map_err(|_| "unexpected fetch result".to_string())?;
    if !response.ok() {
        return Err(format!("{url} responded {}", response.status()));
    }
    let body = JsFuture::from(response.text().map_err(storage::js_err)?)
        .await
        .map_err(storage::js_err)?;
    body.as_string()
        .ok_or_else(|| "plan body is not text".to_string())
}
