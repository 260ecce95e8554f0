use wasm_bindgen::JsValue;
use web_sys::Storage;

pub(crate) fn local_storage() -> Option<Storage> {
    web_sys::window().and_then(|window| window.local_storage().ok().flatten())
}

pub(crate) fn get(key: &str) -> Option<String> {
    let storage = local_storage()?;
    storage
        .get_item(key)
        .ok()
        .flatten()
        .filter(|raw| !raw.is_empty())
}

pub(crate) fn set(key: &str, value: &str) -> Result<(), String> {
    let Some(storage) = local_storage() else {
        return Err("local storage unavailable".to_string());
    };
    storage.set_item(key, value).map_err(js_err)
}

pub(crate) fn js_err(error: JsValue) -> String {
    if let Some(value) = error.as_string() {
        return value;
    }
    if let Ok(json) = js_sys::JSON::stringify(&error) {
        if let Some(value) = json.as_string() {
            return value;
        }
    }
    "js error".to_string()
}
