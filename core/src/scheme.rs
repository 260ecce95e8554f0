use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Artwork references for one block: an optional block-wide plan plus
/// floor-specific plans keyed by the decimal floor string, matching the
/// persisted JSON shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BlockSchemes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default)]
    pub floors: BTreeMap<String, String>,
}

impl BlockSchemes {
    pub fn floor(&self, floor: u32) -> Option<&str> {
        self.floors
            .get(&floor.to_string())
            .map(String::as_str)
            .filter(|reference| !reference.trim().is_empty())
    }
}

/// Older payloads stored a block entry as a bare artwork reference; it
/// reads back as a block-wide default with no floor entries. Normalizing
/// here, at the wire boundary, means nothing downstream ever sees the
/// legacy shape.
#[derive(Deserialize)]
#[serde(untagged)]
enum BlockSchemesWire {
    Bare(String),
    Shaped {
        #[serde(default)]
        default: Option<String>,
        #[serde(default)]
        floors: BTreeMap<String, String>,
    },
}

impl<'de> Deserialize<'de> for BlockSchemes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match BlockSchemesWire::deserialize(deserializer)? {
            BlockSchemesWire::Bare(reference) => BlockSchemes {
                default: Some(reference),
                floors: BTreeMap::new(),
            },
            BlockSchemesWire::Shaped { default, floors } => BlockSchemes { default, floors },
        })
    }
}

/// A full scheme layer: the built-in defaults and the operator's override
/// set are both this shape. Absent entries mean "fall through", never
/// "blank".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemeSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub blocks: BTreeMap<String, BlockSchemes>,
}

impl SchemeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_master(&mut self, reference: impl Into<String>) {
        self.master = Some(reference.into());
    }

    pub fn set_block_default(&mut self, block: impl Into<String>, reference: impl Into<String>) {
        self.blocks.entry(block.into()).or_default().default = Some(reference.into());
    }

    pub fn set_block_floor(
        &mut self,
        block: impl Into<String>,
        floor: u32,
        reference: impl Into<String>,
    ) {
        self.blocks
            .entry(block.into())
            .or_default()
            .floors
            .insert(floor.to_string(), reference.into());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeRequest<'a> {
    Master,
    BlockFloor { block: &'a str, floor: u32 },
}

/// Picks the single artwork reference to display.
///
/// For a block+floor request the order is: override floor, override block
/// default, default floor, default block default. The override block
/// default deliberately outranks a floor-specific built-in: an operator
/// who replaced a block's plan sees their replacement on every floor
/// unless they also uploaded a floor-specific override.
pub fn resolve_scheme<'a>(
    request: SchemeRequest<'_>,
    defaults: &'a SchemeSet,
    overrides: &'a SchemeSet,
) -> Option<&'a str> {
    match request {
        SchemeRequest::Master => {
            non_empty(&overrides.master).or_else(|| non_empty(&defaults.master))
        }
        SchemeRequest::BlockFloor { block, floor } => {
            let over = overrides.blocks.get(block);
            let base = defaults.blocks.get(block);
            over.and_then(|schemes| schemes.floor(floor))
                .or_else(|| over.and_then(|schemes| non_empty(&schemes.default)))
                .or_else(|| base.and_then(|schemes| schemes.floor(floor)))
                .or_else(|| base.and_then(|schemes| non_empty(&schemes.default)))
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .filter(|reference| !reference.trim().is_empty())
}

/// How to turn a resolved reference into displayable markup: inline
/// payloads are used verbatim, locators are fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemeSource {
    Inline(String),
    Locator(String),
}

impl SchemeSource {
    pub fn classify(reference: &str) -> Option<SchemeSource> {
        let trimmed = reference.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed.starts_with('<') {
            Some(SchemeSource::Inline(trimmed.to_string()))
        } else {
            Some(SchemeSource::Locator(trimmed.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_bare_string_block_normalizes() {
        let set: SchemeSet =
            serde_json::from_str(r#"{"blocks":{"b02":"<svg>old</svg>"}}"#).unwrap();
        let block = &set.blocks["b02"];
        assert_eq!(block.default.as_deref(), Some("<svg>old</svg>"));
        assert!(block.floors.is_empty());
    }

    #[test]
    fn shaped_block_keeps_floors() {
        let set: SchemeSet = serde_json::from_str(
            r#"{"blocks":{"b01":{"default":"blocks/b01.svg","floors":{"3":"<svg/>"}}}}"#,
        )
        .unwrap();
        let block = &set.blocks["b01"];
        assert_eq!(block.default.as_deref(), Some("blocks/b01.svg"));
        assert_eq!(block.floor(3), Some("<svg/>"));
        assert_eq!(block.floor(4), None);
    }

    #[test]
    fn classify_splits_inline_from_locator() {
        assert_eq!(
            SchemeSource::classify("  <svg viewBox=\"0 0 1 1\"/>"),
            Some(SchemeSource::Inline("<svg viewBox=\"0 0 1 1\"/>".to_string()))
        );
        assert_eq!(
            SchemeSource::classify("schemes/master.svg"),
            Some(SchemeSource::Locator("schemes/master.svg".to_string()))
        );
        assert_eq!(SchemeSource::classify("   "), None);
    }
}
