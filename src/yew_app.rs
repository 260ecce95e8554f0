use std::collections::BTreeSet;
use std::rc::Rc;

use gloo::console;
use gloo::events::EventListener;
use gloo::timers::callback::Interval;
use js_sys::Date;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Event, File, HtmlInputElement, HtmlSelectElement, InputEvent, MouseEvent};
use yew::prelude::*;

use kvartal_core::catalog::{floor_range, BlockCatalogEntry, BLOCK_CATALOG, FLOOR_MIN};
use kvartal_core::report::{build_report, render_csv, LabelTable};
use kvartal_core::{
    default_schemes, floor_hint, BackupDocument, PositionKey, SchemeRequest, SchemeSet,
};

use crate::labels;
use crate::schemes::{self, PlanState};
use crate::storage;
use crate::stores;
use crate::svg_plan::SvgPlan;

const AUTO_ADVANCE_DEFAULT_MS: u32 = 10_000;

fn now_ms_u64() -> u64 {
    Date::now().max(0.0) as u64
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .map(|window| window.confirm_with_message(message).unwrap_or(false))
        .unwrap_or(false)
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

async fn read_file_text(file: File) -> Result<String, String> {
    let text = wasm_bindgen_futures::JsFuture::from(file.text())
        .await
        .map_err(|_| "failed to read file".to_string())?;
    text.as_string()
        .ok_or_else(|| "file is not text".to_string())
}

fn download_text(filename: &str, mime: &str, contents: &str) -> Result<(), String> {
    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(contents));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(mime);
    let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &options)
        .map_err(storage::js_err)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(storage::js_err)?;
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| "missing document".to_string())?;
    let anchor: web_sys::HtmlAnchorElement = document
        .create_element("a")
        .map_err(storage::js_err)?
        .dyn_into()
        .map_err(|_| "anchor element".to_string())?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();
    let _ = web_sys::Url::revoke_object_url(&url);
    Ok(())
}

fn timestamp_slug() -> String {
    let iso = String::from(Date::new_0().to_iso_string());
    iso.get(..19).unwrap_or(&iso).replace([':', 'T'], "-")
}

fn format_timestamp(ms: u64) -> String {
    String::from(Date::new(&JsValue::from_f64(ms as f64)).to_iso_string())
}

#[derive(Clone, PartialEq)]
enum Slide {
    Master,
    Block(&'static BlockCatalogEntry),
}

impl Slide {
    fn title(&self) -> String {
        match self {
            Slide::Master => format!("Master plan, {} blocks", BLOCK_CATALOG.len()),
            Slide::Block(entry) => entry.title.to_string(),
        }
    }
}

fn build_slides() -> Vec<Slide> {
    std::iter::once(Slide::Master)
        .chain(BLOCK_CATALOG.iter().map(Slide::Block))
        .collect()
}

#[derive(Clone, PartialEq)]
struct AssignContext {
    block: String,
    floor: u32,
    position: String,
}

#[derive(Properties, PartialEq)]
struct PlanViewProps {
    /// `None` requests the master overview.
    #[prop_or_default]
    block_id: Option<String>,
    #[prop_or(FLOOR_MIN)]
    floor: u32,
    overrides: Rc<SchemeSet>,
    #[prop_or_default]
    occupied_ids: BTreeSet<String>,
    #[prop_or(false)]
    operator_enabled: bool,
    #[prop_or_default]
    on_apartment_click: Callback<String>,
}

/// Resolves and loads the artwork for one request and hands it to
/// `SvgPlan`. Loads are keyed by a sequence number; a response that
/// arrives after a newer request started is discarded.
#[function_component(PlanView)]
fn plan_view(props: &PlanViewProps) -> Html {
    let plan = use_state(|| PlanState::Loading);
    let request_seq = use_mut_ref(|| 0u64);

    {
        let plan = plan.clone();
        let request_seq = request_seq.clone();
        use_effect_with(
            (props.block_id.clone(), props.floor, props.overrides.clone()),
            move |(block_id, floor, overrides)| {
                let seq = {
                    let mut seq = request_seq.borrow_mut();
                    *seq += 1;
                    *seq
                };
                plan.set(PlanState::Loading);
                let block_id = block_id.clone();
                let floor = *floor;
                let overrides = overrides.clone();
                spawn_local(async move {
                    let defaults = default_schemes();
                    let request = match block_id.as_deref() {
                        Some(block) => SchemeRequest::BlockFloor { block, floor },
                        None => SchemeRequest::Master,
                    };
                    let next = schemes::load_plan(request, &defaults, &overrides).await;
                    if *request_seq.borrow() != seq {
                        return;
                    }
                    plan.set(next);
                });
            },
        );
    }

    match &*plan {
        PlanState::Loading => html! { <div class="plan-note">{"Loading plan…"}</div> },
        PlanState::Missing => html! { <div class="plan-note">{"No plan configured"}</div> },
        PlanState::Unavailable(message) => html! {
            <div class="plan-note plan-error">{ format!("Plan unavailable: {message}") }</div>
        },
        PlanState::Ready(svg_text) => html! {
            <SvgPlan
                svg_text={svg_text.clone()}
                occupied_ids={props.occupied_ids.clone()}
                operator_enabled={props.operator_enabled}
                on_apartment_click={props.on_apartment_click.clone()}
            />
        },
    }
}

#[derive(Properties, PartialEq)]
struct ModalProps {
    open: bool,
    title: AttrValue,
    on_close: Callback<MouseEvent>,
    #[prop_or_default]
    children: Html,
}

#[function_component(Modal)]
fn modal(props: &ModalProps) -> Html {
    if !props.open {
        return html! {};
    }
    html! {
        <div class="modal-backdrop">
            <div class="modal">
                <div class="modal-head">
                    <div class="modal-title">{ props.title.clone() }</div>
                    <button class="btn" onclick={props.on_close.clone()}>{"✕"}</button>
                </div>
                <div class="modal-body">{ props.children.clone() }</div>
            </div>
        </div>
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum SchemeScope {
    Master,
    BlockDefault,
    BlockFloor,
}

#[derive(Clone, PartialEq)]
struct SchemeSave {
    scope: SchemeScope,
    block: String,
    floor: u32,
    reference: String,
}

#[derive(Properties, PartialEq)]
struct SchemeReplaceProps {
    on_save: Callback<SchemeSave>,
}

/// Replace-artwork form: pick a scope, then either upload an SVG file
/// (stored inline) or point at a locator URL.
#[function_component(SchemeReplace)]
fn scheme_replace(props: &SchemeReplaceProps) -> Html {
    let scope = use_state(|| SchemeScope::Master);
    let block = use_state(|| BLOCK_CATALOG[0].id.to_string());
    let floor = use_state(|| FLOOR_MIN);
    let locator = use_state(String::new);

    let on_scope_change = {
        let scope = scope.clone();
        Callback::from(move |event: Event| {
            let select: HtmlSelectElement = event.target_unchecked_into();
            scope.set(match select.value().as_str() {
                "block-default" => SchemeScope::BlockDefault,
                "block-floor" => SchemeScope::BlockFloor,
                _ => SchemeScope::Master,
            });
        })
    };
    let on_block_change = {
        let block = block.clone();
        Callback::from(move |event: Event| {
            let select: HtmlSelectElement = event.target_unchecked_into();
            block.set(select.value());
        })
    };
    let on_floor_change = {
        let floor = floor.clone();
        Callback::from(move |event: Event| {
            let select: HtmlSelectElement = event.target_unchecked_into();
            if let Ok(value) = select.value().parse::<u32>() {
                floor.set(value);
            }
        })
    };
    let on_file = {
        let on_save = props.on_save.clone();
        let scope = scope.clone();
        let block = block.clone();
        let floor = floor.clone();
        Callback::from(move |event: Event| {
            let input: HtmlInputElement = event.target_unchecked_into();
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            input.set_value("");
            let save = SchemeSave {
                scope: *scope,
                block: (*block).clone(),
                floor: *floor,
                reference: String::new(),
            };
            let on_save = on_save.clone();
            spawn_local(async move {
                match read_file_text(file).await {
                    Ok(markup) if markup.trim_start().starts_with('<') => {
                        on_save.emit(SchemeSave {
                            reference: markup,
                            ..save
                        });
                    }
                    Ok(_) => alert("That file does not look like SVG markup."),
                    Err(message) => alert(&format!("Could not read file: {message}")),
                }
            });
        })
    };
    let on_locator_input = {
        let locator = locator.clone();
        Callback::from(move |event: InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            locator.set(input.value());
        })
    };
    let on_apply_locator = {
        let on_save = props.on_save.clone();
        let scope = scope.clone();
        let block = block.clone();
        let floor = floor.clone();
        let locator = locator.clone();
        Callback::from(move |_: MouseEvent| {
            let reference = (*locator).trim().to_string();
            if reference.is_empty() {
                return;
            }
            on_save.emit(SchemeSave {
                scope: *scope,
                block: (*block).clone(),
                floor: *floor,
                reference,
            });
            locator.set(String::new());
        })
    };

    let block_options: Html = BLOCK_CATALOG
        .iter()
        .map(|entry| {
            html! {
                <option value={entry.id} selected={*block == entry.id}>{ entry.title }</option>
            }
        })
        .collect();
    let floor_options: Html = floor_range()
        .map(|value| {
            html! {
                <option value={value.to_string()} selected={*floor == value}>{ value }</option>
            }
        })
        .collect();

    html! {
        <div class="scheme-replace">
            <div class="form-row">
                <div class="label">{"Scope"}</div>
                <select class="input" onchange={on_scope_change}>
                    <option value="master" selected={*scope == SchemeScope::Master}>{"Master overview"}</option>
                    <option value="block-default" selected={*scope == SchemeScope::BlockDefault}>{"Block default"}</option>
                    <option value="block-floor" selected={*scope == SchemeScope::BlockFloor}>{"Block + floor"}</option>
                </select>
            </div>
            if *scope != SchemeScope::Master {
                <div class="form-row">
                    <div class="label">{"Block"}</div>
                    <select class="input" onchange={on_block_change}>{ block_options }</select>
                </div>
            }
            if *scope == SchemeScope::BlockFloor {
                <div class="form-row">
                    <div class="label">{"Floor"}</div>
                    <select class="input" onchange={on_floor_change}>{ floor_options }</select>
                </div>
            }
            <div class="form-row">
                <div class="label">{"SVG file"}</div>
                <input class="input" type="file" accept=".svg,image/svg+xml" onchange={on_file} />
            </div>
            <div class="form-row">
                <div class="label">{"…or URL"}</div>
                <input
                    class="input"
                    placeholder="schemes/blocks/b01.svg"
                    value={(*locator).clone()}
                    oninput={on_locator_input}
                />
                <button class="btn" onclick={on_apply_locator}>{"Apply"}</button>
            </div>
            <div class="hint">
                {"Apartments in the SVG need ids like "}<b>{"apt_f01_a01"}</b>
                {" so the operator can click them."}
            </div>
        </div>
    }
}

#[function_component(App)]
pub(crate) fn app() -> Html {
    let slides = use_memo((), |_| build_slides());
    let slide_index = use_state(|| 0usize);
    let floor = use_state(|| FLOOR_MIN);
    let overrides = use_state(|| Rc::new(stores::load_scheme_overrides()));
    let occupancy_rev = use_state(|| 0u64);
    let operator = use_state(|| false);

    let presentation = use_state(|| false);
    let presentation_index = use_state(|| 0usize);
    let auto_play = use_state(|| false);
    let auto_ms = use_state(|| AUTO_ADVANCE_DEFAULT_MS);

    let login_open = use_state(|| false);
    let login_input = use_state(String::new);
    let login_error = use_state(|| false);

    let assign_ctx = use_state(|| None::<AssignContext>);
    let full_name = use_state(String::new);

    let scheme_open = use_state(|| false);
    let password_open = use_state(|| false);
    let current_password = use_state(String::new);
    let new_password = use_state(String::new);

    let slides_len = slides.len();
    let modal_open = *login_open || assign_ctx.is_some() || *scheme_open || *password_open;

    // Global keys: Enter starts the presentation, Escape leaves it,
    // arrows/space move, A toggles auto-advance. Modals swallow keys.
    {
        let presentation = presentation.clone();
        let presentation_index = presentation_index.clone();
        let auto_play = auto_play.clone();
        use_effect_with(
            (*presentation, *presentation_index, *auto_play, modal_open),
            move |(in_presentation, index, playing, modal_open)| {
                let in_presentation = *in_presentation;
                let index = *index;
                let playing = *playing;
                let modal_open = *modal_open;
                let listener = web_sys::window()
                    .and_then(|window| window.document())
                    .map(|document| {
                        EventListener::new(&document, "keydown", move |event| {
                            let Some(event) = event.dyn_ref::<web_sys::KeyboardEvent>() else {
                                return;
                            };
                            if modal_open {
                                return;
                            }
                            let key = event.key();
                            if !in_presentation {
                                if key == "Enter" {
                                    event.prevent_default();
                                    presentation_index.set(0);
                                    auto_play.set(false);
                                    presentation.set(true);
                                }
                                return;
                            }
                            match key.as_str() {
                                "Escape" => {
                                    event.prevent_default();
                                    presentation.set(false);
                                    auto_play.set(false);
                                }
                                "ArrowLeft" => {
                                    event.prevent_default();
                                    presentation_index
                                        .set((index + slides_len - 1) % slides_len);
                                }
                                "ArrowRight" | " " => {
                                    event.prevent_default();
                                    presentation_index.set((index + 1) % slides_len);
                                }
                                "a" | "A" => {
                                    event.prevent_default();
                                    auto_play.set(!playing);
                                }
                                _ => {}
                            }
                        })
                    });
                move || drop(listener)
            },
        );
    }

    // Auto-advance timer; dropped whenever the mode ends so nothing
    // keeps firing into a dismantled overlay.
    {
        let presentation_index = presentation_index.clone();
        use_effect_with(
            (*presentation, *auto_play, *auto_ms, *presentation_index),
            move |(in_presentation, playing, interval_ms, index)| {
                let mut timer = None;
                if *in_presentation && *playing {
                    let index = *index;
                    timer = Some(Interval::new(*interval_ms, move || {
                        presentation_index.set((index + 1) % slides_len);
                    }));
                }
                move || drop(timer)
            },
        );
    }

    let on_prev = {
        let slide_index = slide_index.clone();
        let floor = floor.clone();
        let current = *slide_index;
        Callback::from(move |_: MouseEvent| {
            if current > 0 {
                slide_index.set(current - 1);
                floor.set(FLOOR_MIN);
            }
        })
    };
    let on_next = {
        let slide_index = slide_index.clone();
        let floor = floor.clone();
        let current = *slide_index;
        Callback::from(move |_: MouseEvent| {
            if current + 1 < slides_len {
                slide_index.set(current + 1);
                floor.set(FLOOR_MIN);
            }
        })
    };
    let on_floor_change = {
        let floor = floor.clone();
        Callback::from(move |event: Event| {
            let select: HtmlSelectElement = event.target_unchecked_into();
            if let Ok(value) = select.value().parse::<u32>() {
                floor.set(value);
            }
        })
    };

    let on_open_login = {
        let login_open = login_open.clone();
        let login_input = login_input.clone();
        let login_error = login_error.clone();
        Callback::from(move |_: MouseEvent| {
            login_input.set(String::new());
            login_error.set(false);
            login_open.set(true);
        })
    };
    let on_login_input = {
        let login_input = login_input.clone();
        Callback::from(move |event: InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            login_input.set(input.value());
        })
    };
    let on_login = {
        let login_open = login_open.clone();
        let login_input = login_input.clone();
        let login_error = login_error.clone();
        let operator = operator.clone();
        Callback::from(move |_: MouseEvent| {
            let settings = stores::load_settings();
            if settings.verify_password((*login_input).trim()) {
                operator.set(true);
                login_open.set(false);
                login_input.set(String::new());
                login_error.set(false);
            } else {
                login_error.set(true);
            }
        })
    };
    let on_lock = {
        let operator = operator.clone();
        Callback::from(move |_: MouseEvent| operator.set(false))
    };

    let on_name_input = {
        let full_name = full_name.clone();
        Callback::from(move |event: InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            full_name.set(input.value());
        })
    };
    let close_assign = {
        let assign_ctx = assign_ctx.clone();
        Callback::from(move |_: MouseEvent| assign_ctx.set(None))
    };
    let on_confirm_assign = {
        let assign_ctx = assign_ctx.clone();
        let full_name = full_name.clone();
        let occupancy_rev = occupancy_rev.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(ctx) = (*assign_ctx).clone() else {
                return;
            };
            let name = (*full_name).trim().to_string();
            if name.is_empty() {
                return;
            }
            let key = match PositionKey::new(ctx.block, ctx.floor, ctx.position) {
                Ok(key) => key,
                Err(err) => {
                    console::warn!(format!("assign rejected: {err}"));
                    assign_ctx.set(None);
                    return;
                }
            };
            match stores::assign_occupancy(&key, &name, now_ms_u64()) {
                Ok(()) => {
                    assign_ctx.set(None);
                    occupancy_rev.set(now_ms_u64());
                }
                Err(err) => alert(&err.to_string()),
            }
        })
    };

    let on_open_schemes = {
        let scheme_open = scheme_open.clone();
        Callback::from(move |_: MouseEvent| scheme_open.set(true))
    };
    let close_schemes = {
        let scheme_open = scheme_open.clone();
        Callback::from(move |_: MouseEvent| scheme_open.set(false))
    };
    let on_scheme_save = {
        let overrides = overrides.clone();
        Callback::from(move |save: SchemeSave| {
            let mut set = stores::load_scheme_overrides();
            match save.scope {
                SchemeScope::Master => set.set_master(save.reference),
                SchemeScope::BlockDefault => set.set_block_default(save.block, save.reference),
                SchemeScope::BlockFloor => {
                    set.set_block_floor(save.block, save.floor, save.reference)
                }
            }
            stores::save_scheme_overrides(&set);
            overrides.set(Rc::new(set));
            alert("Plan saved on this device.");
        })
    };

    let on_export = Callback::from(move |_: MouseEvent| {
        match stores::export_backup().to_json() {
            Ok(json) => {
                let filename = format!("backup_{}.json", timestamp_slug());
                if let Err(message) =
                    download_text(&filename, "application/json;charset=utf-8", &json)
                {
                    alert(&format!("Export failed: {message}"));
                }
            }
            Err(err) => alert(&format!("Export failed: {err}")),
        }
    });
    let on_import = {
        let overrides = overrides.clone();
        let occupancy_rev = occupancy_rev.clone();
        Callback::from(move |event: Event| {
            let input: HtmlInputElement = event.target_unchecked_into();
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            input.set_value("");
            let overrides = overrides.clone();
            let occupancy_rev = occupancy_rev.clone();
            spawn_local(async move {
                let raw = match read_file_text(file).await {
                    Ok(raw) => raw,
                    Err(message) => {
                        alert(&format!("Import failed: {message}"));
                        return;
                    }
                };
                match BackupDocument::from_json(&raw) {
                    Ok(document) => {
                        stores::apply_backup(&document);
                        overrides.set(Rc::new(stores::load_scheme_overrides()));
                        occupancy_rev.set(now_ms_u64());
                        alert("Import complete.");
                    }
                    Err(err) => alert(&format!("Import failed: {err}")),
                }
            });
        })
    };
    let on_report = Callback::from(move |_: MouseEvent| {
        spawn_local(async move {
            let defaults = default_schemes();
            let overrides = stores::load_scheme_overrides();
            let mut label_table = LabelTable::new();
            for entry in BLOCK_CATALOG {
                let request = SchemeRequest::BlockFloor {
                    block: entry.id,
                    floor: FLOOR_MIN,
                };
                if let PlanState::Ready(svg_text) =
                    schemes::load_plan(request, &defaults, &overrides).await
                {
                    let table = labels::unit_labels(&svg_text, entry.id);
                    if !table.is_empty() {
                        label_table.insert(entry.id.to_string(), table);
                    }
                }
            }
            let rows = build_report(&stores::load_occupancy(), &label_table);
            let csv = render_csv(&rows, format_timestamp);
            let filename = format!("occupancy_{}.csv", timestamp_slug());
            if let Err(message) = download_text(&filename, "text/csv;charset=utf-8", &csv) {
                alert(&format!("Report failed: {message}"));
            }
        });
    });

    let on_open_password = {
        let password_open = password_open.clone();
        let current_password = current_password.clone();
        let new_password = new_password.clone();
        Callback::from(move |_: MouseEvent| {
            current_password.set(String::new());
            new_password.set(String::new());
            password_open.set(true);
        })
    };
    let close_password = {
        let password_open = password_open.clone();
        Callback::from(move |_: MouseEvent| password_open.set(false))
    };
    let on_current_password_input = {
        let current_password = current_password.clone();
        Callback::from(move |event: InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            current_password.set(input.value());
        })
    };
    let on_new_password_input = {
        let new_password = new_password.clone();
        Callback::from(move |event: InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            new_password.set(input.value());
        })
    };
    let on_change_password = {
        let password_open = password_open.clone();
        let current_password = current_password.clone();
        let new_password = new_password.clone();
        Callback::from(move |_: MouseEvent| {
            let mut settings = stores::load_settings();
            if !settings.verify_password((*current_password).trim()) {
                alert("Current password is incorrect.");
                return;
            }
            let next = (*new_password).trim().to_string();
            if next.is_empty() {
                alert("New password must not be empty.");
                return;
            }
            settings.set_password(&next);
            stores::save_settings(&settings);
            password_open.set(false);
            current_password.set(String::new());
            new_password.set(String::new());
            alert("Password changed.");
        })
    };
    let close_login = {
        let login_open = login_open.clone();
        Callback::from(move |_: MouseEvent| login_open.set(false))
    };

    if *presentation {
        let slide = slides[*presentation_index % slides_len].clone();
        let body = match &slide {
            Slide::Master => html! { <PlanView overrides={(*overrides).clone()} /> },
            Slide::Block(entry) => html! {
                <PlanView
                    block_id={Some(entry.id.to_string())}
                    overrides={(*overrides).clone()}
                    occupied_ids={stores::occupied_ids_for_block(entry.id)}
                />
            },
        };
        return html! {
            <div class="ppt-overlay">
                <div class="ppt-top">
                    <div class="ppt-title">{ slide.title() }</div>
                    <div class="ppt-hint">{"←/→ or Space · A autoplay · Esc exit"}</div>
                </div>
                <div class="ppt-body">{ body }</div>
            </div>
        };
    }

    let current = slides[*slide_index].clone();
    let content = match &current {
        Slide::Master => html! { <PlanView overrides={(*overrides).clone()} /> },
        Slide::Block(entry) => {
            let request_assign = {
                let assign_ctx = assign_ctx.clone();
                let full_name = full_name.clone();
                let occupancy_rev = occupancy_rev.clone();
                let block = entry.id.to_string();
                let current_floor = *floor;
                Callback::from(move |position: String| {
                    let floor = floor_hint(&position).unwrap_or(current_floor);
                    let key = match PositionKey::new(block.clone(), floor, position.clone()) {
                        Ok(key) => key,
                        Err(err) => {
                            console::warn!(format!("apartment id rejected: {err}"));
                            return;
                        }
                    };
                    if let Some(existing) = stores::occupancy_record(&key) {
                        let message = format!(
                            "Apartment already assigned to {}.\nRelease it?",
                            existing.name
                        );
                        if confirm(&message) {
                            stores::release_occupancy(&key);
                            occupancy_rev.set(now_ms_u64());
                        }
                        return;
                    }
                    full_name.set(String::new());
                    assign_ctx.set(Some(AssignContext {
                        block: block.clone(),
                        floor,
                        position,
                    }));
                })
            };
            let floor_options: Html = floor_range()
                .map(|value| {
                    html! {
                        <option value={value.to_string()} selected={*floor == value}>
                            { format!("Floor {value}") }
                        </option>
                    }
                })
                .collect();
            html! {
                <div class="floor-card">
                    <div class="floor-picker">
                        <select class="input" onchange={on_floor_change.clone()}>
                            { floor_options }
                        </select>
                    </div>
                    <PlanView
                        block_id={Some(entry.id.to_string())}
                        floor={*floor}
                        overrides={(*overrides).clone()}
                        occupied_ids={stores::occupied_ids_for_block(entry.id)}
                        operator_enabled={*operator}
                        on_apartment_click={request_assign}
                    />
                </div>
            }
        }
    };

    let actions = if *operator {
        html! {
            <>
                <button class="btn" onclick={on_export}>{"Export backup"}</button>
                <label class="btn">
                    {"Import backup"}
                    <input
                        type="file"
                        accept="application/json,.json"
                        style="display:none"
                        onchange={on_import}
                    />
                </label>
                <button class="btn" onclick={on_open_schemes}>{"Replace plans"}</button>
                <button class="btn" onclick={on_report}>{"Occupancy report"}</button>
                <button class="btn" onclick={on_open_password}>{"Change password"}</button>
                <button class="btn" onclick={on_lock}>{"Lock"}</button>
            </>
        }
    } else {
        html! { <button class="btn" onclick={on_open_login}>{"Operator login"}</button> }
    };

    let assign_hint = (*assign_ctx).clone().map(|ctx| {
        html! {
            <div class="hint">
                {"Block "}<b>{ ctx.block }</b>{", floor "}<b>{ ctx.floor }</b>
            </div>
        }
    });

    html! {
        <div class="app">
            <div class="operator-bar">
                <div class="brand">{"Kvartal — residential sales deck"}</div>
                <div class="actions">{ actions }</div>
            </div>
            <div class="carousel">
                <button class="btn nav" onclick={on_prev} disabled={*slide_index == 0}>{"‹"}</button>
                <div class="slide">
                    <div class="slide-title">
                        { format!("Slide {} of {}: {}", *slide_index + 1, slides_len, current.title()) }
                    </div>
                    { content }
                </div>
                <button
                    class="btn nav"
                    onclick={on_next}
                    disabled={*slide_index + 1 == slides_len}
                >{"›"}</button>
            </div>

            <Modal open={assign_ctx.is_some()} title="Assign apartment" on_close={close_assign.clone()}>
                <div class="form-row">
                    <div class="label">{"Full name"}</div>
                    <input
                        class="input"
                        value={(*full_name).clone()}
                        oninput={on_name_input}
                        placeholder="e.g. Ivanov Ivan Ivanovich"
                    />
                </div>
                { assign_hint.unwrap_or_default() }
                <div class="form-actions">
                    <button
                        class="btn"
                        onclick={on_confirm_assign}
                        disabled={full_name.trim().is_empty()}
                    >{"Save"}</button>
                    <button class="btn" onclick={close_assign}>{"Cancel"}</button>
                </div>
            </Modal>

            <Modal open={*scheme_open} title="Replace plan artwork" on_close={close_schemes}>
                <SchemeReplace on_save={on_scheme_save} />
            </Modal>

            <Modal open={*login_open} title="Operator login" on_close={close_login}>
                <div class="form-row">
                    <div class="label">{"Password"}</div>
                    <input
                        class="input"
                        type="password"
                        value={(*login_input).clone()}
                        oninput={on_login_input}
                    />
                </div>
                if *login_error {
                    <div class="hint error">{"Wrong password."}</div>
                }
                <div class="form-actions">
                    <button class="btn" onclick={on_login}>{"Unlock"}</button>
                </div>
            </Modal>

            <Modal open={*password_open} title="Change password" on_close={close_password}>
                <div class="form-row">
                    <div class="label">{"Current"}</div>
                    <input
                        class="input"
                        type="password"
                        value={(*current_password).clone()}
                        oninput={on_current_password_input}
                    />
                </div>
                <div class="form-row">
                    <div class="label">{"New"}</div>
                    <input
                        class="input"
                        type="password"
                        value={(*new_password).clone()}
                        oninput={on_new_password_input}
                    />
                </div>
                <div class="form-actions">
                    <button class="btn" onclick={on_change_password}>{"Save"}</button>
                </div>
            </Modal>
        </div>
    }
}
