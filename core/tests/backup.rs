use kvartal_core::{
    BackupDocument, BackupError, OccupancyMap, OperatorSettings, PositionKey, SchemeSet,
    BACKUP_VERSION,
};

fn sample_occupancy() -> OccupancyMap {
    let mut map = OccupancyMap::new();
    let slot = PositionKey::new("b01", 3, "apt_f03_a02").unwrap();
    map.assign(&slot, "Ivanov I.I.", 1_700_000_000_000).unwrap();
    map
}

fn sample_overrides() -> SchemeSet {
    let mut set = SchemeSet::new();
    set.set_master("<svg>master</svg>");
    set.set_block_floor("b02", 7, "<svg>floor seven</svg>");
    set
}

#[test]
fn export_import_round_trip_is_lossless() {
    let mut settings = OperatorSettings::default();
    settings.set_password("new secret");
    let document =
        BackupDocument::snapshot(sample_occupancy(), sample_overrides(), settings.clone());

    let encoded = document.to_json().unwrap();
    let decoded = BackupDocument::from_json(&encoded).unwrap();
    assert_eq!(decoded, document);
    // Byte-for-byte stability of the persisted form, not just value equality.
    assert_eq!(decoded.to_json().unwrap(), encoded);

    let mut occupancy = OccupancyMap::new();
    let mut overrides = SchemeSet::new();
    let mut restored_settings = OperatorSettings::default();
    decoded.apply_to(&mut occupancy, &mut overrides, &mut restored_settings);
    assert_eq!(occupancy, sample_occupancy());
    assert_eq!(overrides, sample_overrides());
    assert_eq!(restored_settings, settings);
}

#[test]
fn missing_section_leaves_the_store_untouched() {
    let document = BackupDocument::from_json(r#"{"version":2}"#).unwrap();
    assert!(document.occupancy.is_none());

    let mut occupancy = sample_occupancy();
    let mut overrides = sample_overrides();
    let mut settings = OperatorSettings::default();
    document.apply_to(&mut occupancy, &mut overrides, &mut settings);
    assert_eq!(occupancy, sample_occupancy());
    assert_eq!(overrides, sample_overrides());
}

#[test]
fn empty_occupancy_section_erases_prior_state() {
    let document = BackupDocument::from_json(r#"{"version":2,"occupancy":{}}"#).unwrap();
    assert_eq!(document.occupancy, Some(OccupancyMap::new()));

    let mut occupancy = sample_occupancy();
    let mut overrides = sample_overrides();
    let mut settings = OperatorSettings::default();
    document.apply_to(&mut occupancy, &mut overrides, &mut settings);
    assert!(occupancy.is_empty());
    assert_eq!(overrides, sample_overrides());
}

#[test]
fn non_object_payloads_are_refused() {
    for raw in ["[1,2,3]", "42", "\"backup\"", "null", "true"] {
        assert!(matches!(
            BackupDocument::from_json(raw),
            Err(BackupError::NotAnObject)
        ));
    }
    assert!(matches!(
        BackupDocument::from_json("{not json"),
        Err(BackupError::Malformed(_))
    ));
}

#[test]
fn future_versions_are_refused_instead_of_guessed_at() {
    let raw = format!(r#"{{"version":{}}}"#, BACKUP_VERSION + 1);
    assert!(matches!(
        BackupDocument::from_json(&raw),
        Err(BackupError::UnsupportedVersion(_))
    ));
}

#[test]
fn legacy_field_names_and_block_shapes_still_decode() {
    let raw = r#"{
        "v": 1,
        "occupancy": {
            "b02|7|apt_f07_a05": { "name": "Sidorov P.K.", "assignedAt": 123 }
        },
        "schemes": { "blocks": { "b02": "<svg>old plan</svg>" } },
        "settings": { "operatorPasswordHash": "abc", "kioskLabel": "east wing" }
    }"#;
    let document = BackupDocument::from_json(raw).unwrap();
    assert_eq!(document.version, 1);

    let overrides = document.scheme_overrides.as_ref().unwrap();
    let block = &overrides.blocks["b02"];
    assert_eq!(block.default.as_deref(), Some("<svg>old plan</svg>"));
    assert!(block.floors.is_empty());

    let settings = document.settings.as_ref().unwrap();
    assert_eq!(settings.password_hash, "abc");
    assert_eq!(settings.extra["kioskLabel"], "east wing");

    let slot = PositionKey::new("b02", 7, "apt_f07_a05").unwrap();
    assert_eq!(
        document.occupancy.as_ref().unwrap().get(&slot).unwrap().name,
        "Sidorov P.K."
    );
}

#[test]
fn version_defaults_when_absent() {
    let document = BackupDocument::from_json("{}").unwrap();
    assert_eq!(document.version, BACKUP_VERSION);
}
