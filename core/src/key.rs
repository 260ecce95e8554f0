use std::fmt;

use thiserror::Error;

/// Separator used when a key is flattened into its stored string form.
/// Components are rejected up front if they contain it, so a stored key
/// always splits back into exactly three parts.
pub const KEY_DELIMITER: char = '|';

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PositionKeyError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field} must not contain '|'")]
    Delimiter { field: &'static str },
    #[error("storage key must have block, floor and position parts")]
    Malformed,
    #[error("floor component is not a number: {0}")]
    BadFloor(String),
}

/// Address of one apartment slot: which block, which floor, which region
/// of that floor's artwork.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PositionKey {
    block: String,
    floor: u32,
    position: String,
}

impl PositionKey {
    pub fn new(
        block: impl Into<String>,
        floor: u32,
        position: impl Into<String>,
    ) -> Result<Self, PositionKeyError> {
        let block = block.into();
        let position = position.into();
        check_component("block", &block)?;
        check_component("position", &position)?;
        Ok(Self {
            block,
            floor,
            position,
        })
    }

    pub fn block(&self) -> &str {
        &self.block
    }

    pub fn floor(&self) -> u32 {
        self.floor
    }

    pub fn position(&self) -> &str {
        &self.position
    }

    /// Stored string form, `block|floor|position`.
    pub fn storage_key(&self) -> String {
        format!("{}|{}|{}", self.block, self.floor, self.position)
    }

    pub fn parse(raw: &str) -> Result<Self, PositionKeyError> {
        let mut parts = raw.splitn(3, KEY_DELIMITER);
        let (Some(block), Some(floor), Some(position)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(PositionKeyError::Malformed);
        };
        let floor = floor
            .parse::<u32>()
            .map_err(|_| PositionKeyError::BadFloor(floor.to_string()))?;
        Self::new(block, floor, position)
    }
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.block, self.floor, self.position)
    }
}

fn check_component(field: &'static str, value: &str) -> Result<(), PositionKeyError> {
    if value.trim().is_empty() {
        return Err(PositionKeyError::Empty { field });
    }
    if value.contains(KEY_DELIMITER) {
        return Err(PositionKeyError::Delimiter { field });
    }
    Ok(())
}

/// Best-effort floor read from an artwork position id.
///
/// Artwork ids carry the floor as a delimited `f<digits>` component
/// (`apt_f03_a02`, `apt_b02_f07_a05`), and that source is more reliable
/// than whatever floor the surrounding view happens to show.
pub fn floor_hint(position_id: &str) -> Option<u32> {
    let bytes = position_id.as_bytes();
    for start in 0..bytes.len() {
        if bytes[start] != b'f' && bytes[start] != b'F' {
            continue;
        }
        if start > 0 && bytes[start - 1].is_ascii_alphanumeric() {
            continue;
        }
        let mut end = start + 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() && end - start <= 2 {
            end += 1;
        }
        let digits = end - start - 1;
        if digits == 0 || digits > 2 {
            continue;
        }
        if end < bytes.len() && bytes[end].is_ascii_alphanumeric() {
            continue;
        }
        if let Ok(floor) = position_id[start + 1..end].parse::<u32>() {
            if floor >= 1 {
                return Some(floor);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_key_round_trips() {
        let key = PositionKey::new("b01", 3, "apt_f03_a02").unwrap();
        assert_eq!(key.storage_key(), "b01|3|apt_f03_a02");
        let parsed = PositionKey::parse(&key.storage_key()).unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn delimiter_in_component_is_rejected() {
        assert_eq!(
            PositionKey::new("b01", 1, "apt|evil"),
            Err(PositionKeyError::Delimiter { field: "position" })
        );
        assert_eq!(
            PositionKey::new("b|1", 1, "apt_01"),
            Err(PositionKeyError::Delimiter { field: "block" })
        );
    }

    #[test]
    fn empty_component_is_rejected() {
        assert_eq!(
            PositionKey::new("  ", 1, "apt_01"),
            Err(PositionKeyError::Empty { field: "block" })
        );
    }

    #[test]
    fn parse_rejects_extra_parts() {
        // splitn folds the tail into the position, which then fails the
        // delimiter check instead of silently keeping a corrupt key.
        assert_eq!(
            PositionKey::parse("b01|2|apt_01|junk"),
            Err(PositionKeyError::Delimiter { field: "position" })
        );
    }

    #[test]
    fn parse_rejects_bad_floor() {
        assert!(matches!(
            PositionKey::parse("b01|three|apt_01"),
            Err(PositionKeyError::BadFloor(_))
        ));
    }

    #[test]
    fn floor_hint_reads_delimited_f_component() {
        assert_eq!(floor_hint("apt_f03_a02"), Some(3));
        assert_eq!(floor_hint("apt_b02_f07_a05"), Some(7));
        assert_eq!(floor_hint("f15"), Some(15));
        assert_eq!(floor_hint("apt_F12_a01"), Some(12));
    }

    #[test]
    fn floor_hint_ignores_non_floor_text() {
        assert_eq!(floor_hint("floor_plan"), None);
        assert_eq!(floor_hint("apt_f123_a01"), None);
        assert_eq!(floor_hint("apt_f00_a01"), None);
        assert_eq!(floor_hint("loft_a02"), None);
    }
}
