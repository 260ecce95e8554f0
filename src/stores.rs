use std::collections::BTreeSet;

use gloo::console;
use serde::de::DeserializeOwned;
use serde::Serialize;

use kvartal_core::{
    AssignError, BackupDocument, OccupancyMap, OccupancyRecord, OperatorSettings, PositionKey,
    SchemeSet,
};

use crate::storage;

// Stable key names; existing installs carry data under them.
pub(crate) const OCCUPANCY_KEY: &str = "apt_presentation_occupancy_v1";
pub(crate) const SCHEMES_KEY: &str = "apt_presentation_schemes_v2";
pub(crate) const SETTINGS_KEY: &str = "apt_presentation_settings_v1";

/// A corrupt payload never reaches the UI as an error; the store recovers
/// to its empty default and says so on the console.
fn load_or_default<T>(key: &str) -> T
where
    T: Default + DeserializeOwned,
{
    let Some(raw) = storage::get(key) else {
        return T::default();
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            console::warn!(format!("{key}: corrupt payload, using defaults ({err})"));
            T::default()
        }
    }
}

fn save_json<T: Serialize>(key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => {
            if let Err(message) = storage::set(key, &raw) {
                console::warn!(format!("{key}: save failed: {message}"));
            }
        }
        Err(err) => {
            console::warn!(format!("{key}: encode failed: {err}"));
        }
    }
}

pub(crate) fn load_occupancy() -> OccupancyMap {
    load_or_default(OCCUPANCY_KEY)
}

pub(crate) fn save_occupancy(map: &OccupancyMap) {
    save_json(OCCUPANCY_KEY, map);
}

pub(crate) fn occupancy_record(key: &PositionKey) -> Option<OccupancyRecord> {
    load_occupancy().get(key).cloned()
}

pub(crate) fn assign_occupancy(
    key: &PositionKey,
    name: &str,
    now_ms: u64,
) -> Result<(), AssignError> {
    let mut map = load_occupancy();
    map.assign(key, name, now_ms)?;
    save_occupancy(&map);
    Ok(())
}

pub(crate) fn release_occupancy(key: &PositionKey) {
    let mut map = load_occupancy();
    map.release(key);
    save_occupancy(&map);
}

pub(crate) fn occupied_ids_for_block(block: &str) -> BTreeSet<String> {
    load_occupancy().ids_for_block(block)
}

pub(crate) fn load_scheme_overrides() -> SchemeSet {
    load_or_default(SCHEMES_KEY)
}

/// Whole-set replace; callers load, mutate their copy, and hand the full
/// structure back.
pub(crate) fn save_scheme_overrides(set: &SchemeSet) {
    save_json(SCHEMES_KEY, set);
}

pub(crate) fn load_settings() -> OperatorSettings {
    load_or_default(SETTINGS_KEY)
}

pub(crate) fn save_settings(settings: &OperatorSettings) {
    save_json(SETTINGS_KEY, settings);
}

pub(crate) fn export_backup() -> BackupDocument {
    BackupDocument::snapshot(load_occupancy(), load_scheme_overrides(), load_settings())
}

/// Restores an imported document. Only sections present in the document
/// are written back, so a document without occupancy leaves the current
/// assignments alone.
pub(crate) fn apply_backup(document: &BackupDocument) {
    let mut occupancy = load_occupancy();
    let mut scheme_overrides = load_scheme_overrides();
    let mut settings = load_settings();
    document.apply_to(&mut occupancy, &mut scheme_overrides, &mut settings);
    if document.occupancy.is_some() {
        save_occupancy(&occupancy);
    }
    if document.scheme_overrides.is_some() {
        save_scheme_overrides(&scheme_overrides);
    }
    if document.settings.is_some() {
        save_settings(&settings);
    }
}
