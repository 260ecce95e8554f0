use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::occupancy::OccupancyMap;
use crate::scheme::SchemeSet;
use crate::settings::OperatorSettings;

pub const BACKUP_VERSION: u32 = 2;

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("backup must be a JSON object")]
    NotAnObject,
    #[error("backup is not valid JSON: {0}")]
    Malformed(String),
    #[error("backup version {0} is newer than this application understands")]
    UnsupportedVersion(u32),
    #[error("backup encode failed: {0}")]
    Encode(String),
}

/// The portable export of everything mutable. Each section is optional on
/// the wire: a missing section means "leave that store alone" on restore,
/// a present-but-empty one means "erase it".
///
/// Documents written by the oldest builds used `v` and `schemes` as field
/// names; both still decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupDocument {
    #[serde(default = "default_version", alias = "v")]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupancy: Option<OccupancyMap>,
    #[serde(
        rename = "schemeOverrides",
        alias = "schemes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub scheme_overrides: Option<SchemeSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<OperatorSettings>,
}

fn default_version() -> u32 {
    BACKUP_VERSION
}

impl BackupDocument {
    /// Full snapshot for export: every section present, current version.
    pub fn snapshot(
        occupancy: OccupancyMap,
        scheme_overrides: SchemeSet,
        settings: OperatorSettings,
    ) -> Self {
        Self {
            version: BACKUP_VERSION,
            occupancy: Some(occupancy),
            scheme_overrides: Some(scheme_overrides),
            settings: Some(settings),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, BackupError> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|err| BackupError::Malformed(err.to_string()))?;
        if !value.is_object() {
            return Err(BackupError::NotAnObject);
        }
        let document: BackupDocument = serde_json::from_value(value)
            .map_err(|err| BackupError::Malformed(err.to_string()))?;
        if document.version > BACKUP_VERSION {
            return Err(BackupError::UnsupportedVersion(document.version));
        }
        Ok(document)
    }

    pub fn to_json(&self) -> Result<String, BackupError> {
        serde_json::to_string_pretty(self).map_err(|err| BackupError::Encode(err.to_string()))
    }

    /// Restores this document into live state. Each present section fully
    /// replaces its target; absent sections leave their target untouched.
    pub fn apply_to(
        &self,
        occupancy: &mut OccupancyMap,
        scheme_overrides: &mut SchemeSet,
        settings: &mut OperatorSettings,
    ) {
        if let Some(next) = &self.occupancy {
            *occupancy = next.clone();
        }
        if let Some(next) = &self.scheme_overrides {
            *scheme_overrides = next.clone();
        }
        if let Some(next) = &self.settings {
            *settings = next.clone();
        }
    }
}
