use std::collections::BTreeMap;

use wasm_bindgen::JsCast;
use web_sys::{DomParser, Element, SupportedType};

/// Best-effort table of unit labels for one block's artwork, keyed by
/// position id. Two passes: captions placed directly after their
/// apartment rect in document order, then captions matched by geometry
/// for artwork that groups its text elsewhere. Anything that fails to
/// parse just yields fewer labels.
pub(crate) fn unit_labels(svg_text: &str, block_id: &str) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();
    if svg_text.trim().is_empty() {
        return labels;
    }
    let Ok(parser) = DomParser::new() else {
        return labels;
    };
    let Ok(document) = parser.parse_from_string(svg_text, SupportedType::ImageSvgXml) else {
        return labels;
    };
    let Ok(Some(svg)) = document.query_selector("svg") else {
        return labels;
    };
    adjacent_text_labels(&svg, &mut labels);
    geometry_labels(&svg, block_id, &mut labels);
    labels
}

/// Artwork convention: `<rect id="apt_f01_a01">` followed immediately by
/// `<text class="tiny">` holding the unit number.
fn adjacent_text_labels(svg: &Element, labels: &mut BTreeMap<String, String>) {
    let children = svg.children();
    if children.length() < 2 {
        return;
    }
    for index in 0..children.length() - 1 {
        let (Some(current), Some(next)) = (children.item(index), children.item(index + 1)) else {
            continue;
        };
        if !current.tag_name().eq_ignore_ascii_case("rect") {
            continue;
        }
        let Some(id) = current.get_attribute("id") else {
            continue;
        };
        if !id.starts_with("apt_") {
            continue;
        }
        if !next.tag_name().eq_ignore_ascii_case("text") {
            continue;
        }
        let class = next.get_attribute("class").unwrap_or_default();
        if !class.split_whitespace().any(|name| name == "tiny") {
            continue;
        }
        let label = normalize_text(&next.text_content().unwrap_or_default());
        if !label.is_empty() {
            labels.entry(id).or_insert(label);
        }
    }
}

struct PlanRect {
    id: String,
    data_name: String,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

impl PlanRect {
    fn center(&self) -> (f64, f64) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    fn admits(&self, x: f64, y: f64) -> bool {
        // Text baselines sit inside or a little below their rect.
        x >= self.x - 8.0 && x <= self.x + self.w + 8.0 && y >= self.y - 20.0 && y <= self.y + self.h + 60.0
    }
}

fn geometry_labels(svg: &Element, block_id: &str, labels: &mut BTreeMap<String, String>) {
    let rects = collect_rects(svg);
    if rects.is_empty() {
        return;
    }
    for text in select_all(svg, "text") {
        let caption = normalize_text(&text.text_content().unwrap_or_default());
        let class = text.get_attribute("class").unwrap_or_default();
        if !looks_like_unit_caption(&caption, &class) {
            continue;
        }
        let Some((x, y)) = parse_translate(&text.get_attribute("transform").unwrap_or_default())
        else {
            continue;
        };
        let hit = rects
            .iter()
            .find(|rect| rect.admits(x, y))
            .or_else(|| nearest_rect(&rects, x, y));
        let Some(hit) = hit else {
            continue;
        };
        for alias in alias_keys(block_id, &hit.id, &hit.data_name) {
            labels.entry(alias).or_insert_with(|| caption.clone());
        }
    }
}

fn collect_rects(svg: &Element) -> Vec<PlanRect> {
    let mut rects = Vec::new();
    for element in select_all(svg, "rect[id^='apt_']") {
        let Some(id) = element.get_attribute("id") else {
            continue;
        };
        let (Some(x), Some(y)) = (attr_f64(&element, "x"), attr_f64(&element, "y")) else {
            continue;
        };
        rects.push(PlanRect {
            id,
            data_name: element.get_attribute("data-name").unwrap_or_default(),
            x,
            y,
            w: attr_f64(&element, "width").unwrap_or(0.0),
            h: attr_f64(&element, "height").unwrap_or(0.0),
        });
    }
    rects
}

fn nearest_rect<'a>(rects: &'a [PlanRect], x: f64, y: f64) -> Option<&'a PlanRect> {
    rects.iter().min_by(|a, b| {
        let da = squared_distance(a.center(), (x, y));
        let db = squared_distance(b.center(), (x, y));
        da.total_cmp(&db)
    })
}

fn squared_distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    dx * dx + dy * dy
}

/// Unit captions read like "2 ком.74.60м2(49кв)" in the shipped artwork;
/// newer plans mark them with a caption class instead. Bare numbers are
/// floor marks, never unit labels.
fn looks_like_unit_caption(text: &str, class: &str) -> bool {
    if text.is_empty() || text.chars().all(|ch| ch.is_ascii_digit()) {
        return false;
    }
    if text.contains("ком.") && (text.contains("м2(") || text.contains("м²(")) {
        return true;
    }
    class
        .split_whitespace()
        .any(|name| matches!(name, "tiny" | "label" | "cls-5"))
}

/// `transform="translate(2.59 834.81)"`, with either space or comma
/// separators.
fn parse_translate(transform: &str) -> Option<(f64, f64)> {
    let start = transform.find("translate(")?;
    let rest = &transform[start + "translate(".len()..];
    let end = rest.find(')')?;
    let mut parts = rest[..end]
        .split(|ch: char| ch == ',' || ch.is_whitespace())
        .filter(|part| !part.is_empty());
    let x = parts.next()?.parse::<f64>().ok()?;
    let y = parts.next()?.parse::<f64>().ok()?;
    Some((x, y))
}

/// Artwork ids come in block-prefixed (`apt_b02_f07_a05`) and bare
/// (`apt_f07_a05`) forms, via `id` or `data-name`; index the label under
/// every spelling so lookups hit regardless of which one got stored.
fn alias_keys(block_id: &str, rect_id: &str, data_name: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    let mut push = |value: String, keys: &mut Vec<String>| {
        if !value.is_empty() && !keys.contains(&value) {
            keys.push(value);
        }
    };
    let block_prefix = format!("apt_{block_id}_");
    for candidate in [rect_id.trim(), data_name.trim()] {
        push(candidate.to_string(), &mut keys);
        if let Some(bare) = candidate.strip_prefix(&block_prefix) {
            push(format!("apt_{bare}"), &mut keys);
        } else if let Some(suffix) = candidate.strip_prefix("apt_") {
            push(format!("apt_{block_id}_{suffix}"), &mut keys);
        }
    }
    keys
}

fn attr_f64(element: &Element, name: &str) -> Option<f64> {
    element.get_attribute(name)?.trim().parse::<f64>().ok()
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
