use std::collections::BTreeSet;

use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::Element;
use yew::prelude::*;

const APT_SELECTOR: &str = "[id^='apt_']";
const DRAWABLE_SELECTOR: &str = "path,rect,polygon,polyline,circle,ellipse";

#[derive(Properties, PartialEq)]
pub(crate) struct SvgPlanProps {
    pub(crate) svg_text: String,
    #[prop_or_default]
    pub(crate) occupied_ids: BTreeSet<String>,
    #[prop_or(false)]
    pub(crate) operator_enabled: bool,
    #[prop_or_default]
    pub(crate) on_apartment_click: Callback<String>,
}

/// Injects plan markup and owns everything that happens inside it:
/// fit-to-container normalization, occupied highlighting, and click
/// delegation for apartment regions.
#[function_component(SvgPlan)]
pub(crate) fn svg_plan(props: &SvgPlanProps) -> Html {
    let container = use_node_ref();

    {
        let container = container.clone();
        use_effect_with(props.svg_text.clone(), move |svg_text| {
            if let Some(root) = container.cast::<Element>() {
                root.set_inner_html(svg_text);
                normalize_svg(&root);
                enable_hit_targets(&root);
            }
        });
    }

    {
        let container = container.clone();
        use_effect_with(
            (
                props.svg_text.clone(),
                props.occupied_ids.clone(),
                props.operator_enabled,
            ),
            move |(_, occupied_ids, operator_enabled)| {
                if let Some(root) = container.cast::<Element>() {
                    paint_occupied(&root, occupied_ids, *operator_enabled);
                }
            },
        );
    }

    {
        let container = container.clone();
        let on_click = props.on_apartment_click.clone();
        use_effect_with(
            (props.svg_text.clone(), props.operator_enabled),
            move |(_, operator_enabled)| {
                let mut listener = None;
                if *operator_enabled {
                    if let Some(root) = container.cast::<Element>() {
                        let root_for_handler = root.clone();
                        listener = Some(EventListener::new(&root, "click", move |event| {
                            let Some(target) = event.target() else {
                                return;
                            };
                            let Ok(element) = target.dyn_into::<Element>() else {
                                return;
                            };
                            let Ok(Some(hit)) = element.closest(APT_SELECTOR) else {
                                return;
                            };
                            if root_for_handler.contains(Some(hit.as_ref())) {
                                on_click.emit(hit.id());
                            }
                        }));
                    }
                }
                move || drop(listener)
            },
        );
    }

    if props.svg_text.is_empty() {
        return html! { <div class="plan-note">{"No plan to show"}</div> };
    }
    html! {
        <div class="plan-fit">
            <div ref={container} class="plan-svg"></div>
        </div>
    }
}

/// The artwork ships with hard-coded pixel dimensions; strip them and
/// make sure a viewBox exists so the plan scales to its container.
fn normalize_svg(root: &Element) {
    let Ok(Some(svg)) = root.query_selector("svg") else {
        return;
    };
    let width = attr_dimension(&svg, "width");
    let height = attr_dimension(&svg, "height");
    let _ = svg.remove_attribute("width");
    let _ = svg.remove_attribute("height");
    if svg.get_attribute("viewBox").is_none() {
        if let (Some(width), Some(height)) = (width, height) {
            let _ = svg.set_attribute("viewBox", &format!("0 0 {width} {height}"));
        }
    }
    let _ = svg.set_attribute(
        "style",
        "width:100%;height:100%;max-width:100%;max-height:100%;display:block;overflow:visible;touch-action:manipulation;",
    );
}

fn attr_dimension(svg: &Element, name: &str) -> Option<f64> {
    let raw = svg.get_attribute(name)?;
    raw.trim().trim_end_matches("px").parse::<f64>().ok()
}

fn enable_hit_targets(root: &Element) {
    for element in select_all(root, APT_SELECTOR) {
        if let Some(styled) = element.dyn_ref::<web_sys::SvgElement>() {
            let _ = styled.style().set_property("pointer-events", "all");
        }
    }
}

fn paint_occupied(root: &Element, occupied_ids: &BTreeSet<String>, operator_enabled: bool) {
    for element in select_all(root, "[data-occupied='1']") {
        paint(&element, false, operator_enabled);
    }
    for element in select_all(root, APT_SELECTOR) {
        if occupied_ids.contains(&element.id()) {
            paint(&element, true, operator_enabled);
        }
    }
}

fn paint(element: &Element, on: bool, operator_enabled: bool) {
    for target in paint_targets(element) {
        let Some(styled) = target.dyn_ref::<web_sys::SvgElement>() else {
            continue;
        };
        let style = styled.style();
        if on {
            let _ = target.set_attribute("data-occupied", "1");
            let _ = style.set_property_with_priority("fill", "#ff0d00", "important");
            let _ = style.set_property_with_priority("fill-opacity", "0.55", "important");
            let _ = style.set_property_with_priority("stroke", "#ff3b30", "important");
            let _ = style.set_property_with_priority("stroke-opacity", "0.9", "important");
            let cursor = if operator_enabled { "pointer" } else { "default" };
            let _ = style.set_property_with_priority("cursor", cursor, "important");
        } else {
            let _ = target.remove_attribute("data-occupied");
            for name in ["fill", "fill-opacity", "stroke", "stroke-opacity", "cursor"] {
                let _ = style.remove_property(name);
            }
        }
    }
}

/// An apartment region is usually a group; the highlight goes on the
/// drawable shapes inside it, or on the element itself when it is one.
fn paint_targets(element: &Element) -> Vec<Element> {
    if element.matches(DRAWABLE_SELECTOR).unwrap_or(false) {
        return vec![element.clone()];
    }
    let targets = select_all(element, DRAWABLE_SELECTOR);
    if targets.is_empty() {
        vec![element.clone()]
    } else {
        targets
    }
}

fn select_all(root: &Element, selector: &str) -> Vec<Element> {
    let mut elements = Vec::new();
    let Ok(list) = root.query_selector_all(selector) else {
        return elements;
    };
    for index in 0..list.length() {
        if let Some(element) = list
            .item(index)
            .and_then(|node| node.dyn_into::<Element>().ok())
        {
            elements.push(element);
        }
    }
    elements
}
