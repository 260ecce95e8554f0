use kvartal_core::{AssignError, OccupancyMap, PositionKey};

fn key(block: &str, floor: u32, position: &str) -> PositionKey {
    PositionKey::new(block, floor, position).unwrap()
}

#[test]
fn assign_then_get_then_release_lifecycle() {
    let mut map = OccupancyMap::new();
    let slot = key("b01", 3, "apt_f03_a02");

    map.assign(&slot, "Ivanov I.I.", 1_700_000_000_000).unwrap();
    let record = map.get(&slot).expect("assigned record");
    assert_eq!(record.name, "Ivanov I.I.");
    assert_eq!(record.assigned_at, 1_700_000_000_000);
    assert!(map.ids_for_block("b01").contains("apt_f03_a02"));

    map.release(&slot);
    assert!(map.get(&slot).is_none());
    assert!(!map.ids_for_block("b01").contains("apt_f03_a02"));
}

#[test]
fn assign_trims_the_name() {
    let mut map = OccupancyMap::new();
    let slot = key("b01", 1, "apt_f01_a01");
    map.assign(&slot, "  Petrova A.S.  ", 10).unwrap();
    assert_eq!(map.get(&slot).unwrap().name, "Petrova A.S.");
}

#[test]
fn blank_name_is_rejected_and_leaves_state_alone() {
    let mut map = OccupancyMap::new();
    let slot = key("b01", 1, "apt_f01_a01");
    assert_eq!(map.assign(&slot, "   ", 10), Err(AssignError::EmptyName));
    assert!(map.is_empty());
}

#[test]
fn release_of_absent_key_is_a_no_op() {
    let mut map = OccupancyMap::new();
    map.release(&key("b05", 9, "apt_f09_a03"));
    assert!(map.is_empty());
}

#[test]
fn assign_over_existing_record_overwrites() {
    let mut map = OccupancyMap::new();
    let slot = key("b01", 2, "apt_f02_a04");
    map.assign(&slot, "First Buyer", 100).unwrap();
    map.assign(&slot, "Second Buyer", 200).unwrap();
    let record = map.get(&slot).unwrap();
    assert_eq!(record.name, "Second Buyer");
    assert_eq!(record.assigned_at, 200);
    assert_eq!(map.len(), 1);
}

#[test]
fn ids_for_block_spans_floors_and_dedups() {
    let mut map = OccupancyMap::new();
    map.assign(&key("b01", 1, "apt_f01_a01"), "A", 1).unwrap();
    map.assign(&key("b01", 2, "apt_f02_a01"), "B", 2).unwrap();
    // Same position id on two floors collapses to one entry.
    map.assign(&key("b01", 3, "apt_f02_a01"), "C", 3).unwrap();
    map.assign(&key("b02", 1, "apt_f01_a09"), "D", 4).unwrap();

    let ids = map.ids_for_block("b01");
    assert_eq!(ids.len(), 2);
    assert!(ids.contains("apt_f01_a01"));
    assert!(ids.contains("apt_f02_a01"));
    assert!(!ids.contains("apt_f01_a09"));
}

#[test]
fn block_prefix_does_not_leak_into_longer_ids() {
    let mut map = OccupancyMap::new();
    map.assign(&key("b1", 1, "apt_f01_a01"), "A", 1).unwrap();
    map.assign(&key("b11", 1, "apt_f01_a02"), "B", 2).unwrap();
    let ids = map.ids_for_block("b1");
    assert_eq!(ids.len(), 1);
    assert!(ids.contains("apt_f01_a01"));
}

#[test]
fn wire_shape_matches_the_persisted_format() {
    let mut map = OccupancyMap::new();
    map.assign(&key("b01", 3, "apt_f03_a02"), "Ivanov I.I.", 1000)
        .unwrap();
    let encoded = serde_json::to_value(&map).unwrap();
    assert_eq!(
        encoded,
        serde_json::json!({
            "b01|3|apt_f03_a02": { "name": "Ivanov I.I.", "assignedAt": 1000 }
        })
    );
    let decoded: OccupancyMap = serde_json::from_value(encoded).unwrap();
    assert_eq!(decoded, map);
}
