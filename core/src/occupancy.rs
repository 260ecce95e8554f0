use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::key::{PositionKey, KEY_DELIMITER};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssignError {
    #[error("occupant name must not be empty")]
    EmptyName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyRecord {
    pub name: String,
    #[serde(rename = "assignedAt")]
    pub assigned_at: u64,
}

/// The full occupancy state: one record per assigned apartment, keyed by
/// the stored `block|floor|position` form. Serializes directly to the
/// persisted map shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OccupancyMap {
    records: BTreeMap<String, OccupancyRecord>,
}

impl OccupancyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &PositionKey) -> Option<&OccupancyRecord> {
        self.records.get(&key.storage_key())
    }

    /// Writes the record for `key`, replacing any existing one. Callers
    /// that want confirm-before-overwrite must check `get` first; the
    /// store itself only rejects blank names.
    pub fn assign(
        &mut self,
        key: &PositionKey,
        name: &str,
        now_ms: u64,
    ) -> Result<(), AssignError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AssignError::EmptyName);
        }
        self.records.insert(
            key.storage_key(),
            OccupancyRecord {
                name: name.to_string(),
                assigned_at: now_ms,
            },
        );
        Ok(())
    }

    /// Removes the record for `key`. Releasing a free apartment is a no-op.
    pub fn release(&mut self, key: &PositionKey) {
        self.records.remove(&key.storage_key());
    }

    /// Occupied position ids across every floor of `block`, deduplicated.
    /// A position id reused on two floors of the same block collapses to
    /// one entry here; artwork ids are floor-scoped in practice.
    pub fn ids_for_block(&self, block: &str) -> BTreeSet<String> {
        let prefix = format!("{block}{KEY_DELIMITER}");
        self.records
            .keys()
            .filter(|stored| stored.starts_with(&prefix))
            .filter_map(|stored| stored.splitn(3, KEY_DELIMITER).nth(2))
            .filter(|position| !position.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OccupancyRecord)> {
        self.records
            .iter()
            .map(|(stored, record)| (stored.as_str(), record))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
