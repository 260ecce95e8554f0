use std::ops::RangeInclusive;

use crate::scheme::SchemeSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockCatalogEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub plan_src: &'static str,
}

pub const FLOOR_MIN: u32 = 1;
pub const FLOOR_MAX: u32 = 15;

pub const MASTER_PLAN_SRC: &str = "schemes/master.svg";

pub const BLOCK_CATALOG: &[BlockCatalogEntry] = &[
    BlockCatalogEntry {
        id: "b01",
        title: "Block 1",
        plan_src: "schemes/blocks/b01.svg",
    },
    BlockCatalogEntry {
        id: "b02",
        title: "Block 2",
        plan_src: "schemes/blocks/b02.svg",
    },
    BlockCatalogEntry {
        id: "b03",
        title: "Block 3",
        plan_src: "schemes/blocks/b03.svg",
    },
    BlockCatalogEntry {
        id: "b04",
        title: "Block 4",
        plan_src: "schemes/blocks/b04.svg",
    },
    BlockCatalogEntry {
        id: "b05",
        title: "Block 5",
        plan_src: "schemes/blocks/b05.svg",
    },
    BlockCatalogEntry {
        id: "b06",
        title: "Block 6",
        plan_src: "schemes/blocks/b06.svg",
    },
    BlockCatalogEntry {
        id: "b07",
        title: "Block 7",
        plan_src: "schemes/blocks/b07.svg",
    },
    BlockCatalogEntry {
        id: "b08",
        title: "Block 8",
        plan_src: "schemes/blocks/b08.svg",
    },
    BlockCatalogEntry {
        id: "b09",
        title: "Block 9",
        plan_src: "schemes/blocks/b09.svg",
    },
    BlockCatalogEntry {
        id: "b10",
        title: "Block 10",
        plan_src: "schemes/blocks/b10.svg",
    },
    BlockCatalogEntry {
        id: "b11",
        title: "Block 11",
        plan_src: "schemes/blocks/b11.svg",
    },
];

pub fn block_by_id(id: &str) -> Option<&'static BlockCatalogEntry> {
    let trimmed = id.trim();
    BLOCK_CATALOG
        .iter()
        .find(|entry| entry.id.eq_ignore_ascii_case(trimmed))
}

pub fn floor_range() -> RangeInclusive<u32> {
    FLOOR_MIN..=FLOOR_MAX
}

/// The built-in scheme layer: one master overview, one plan per block, no
/// floor-specific entries. Immutable at runtime; operator replacements
/// live in the override set and win through the resolver.
pub fn default_schemes() -> SchemeSet {
    let mut set = SchemeSet::new();
    set.set_master(MASTER_PLAN_SRC);
    for entry in BLOCK_CATALOG {
        set.set_block_default(entry.id, entry.plan_src);
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_covers_eleven_blocks() {
        assert_eq!(BLOCK_CATALOG.len(), 11);
        assert!(block_by_id("b07").is_some());
        assert!(block_by_id(" B07 ").is_some());
        assert!(block_by_id("b12").is_none());
    }

    #[test]
    fn default_schemes_have_master_and_all_blocks() {
        let defaults = default_schemes();
        assert_eq!(defaults.master.as_deref(), Some(MASTER_PLAN_SRC));
        assert_eq!(defaults.blocks.len(), BLOCK_CATALOG.len());
        for entry in BLOCK_CATALOG {
            let block = &defaults.blocks[entry.id];
            assert_eq!(block.default.as_deref(), Some(entry.plan_src));
            assert!(block.floors.is_empty());
        }
    }
}
