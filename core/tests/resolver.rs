use kvartal_core::{default_schemes, resolve_scheme, SchemeRequest, SchemeSet};

fn block_floor(block: &str, floor: u32) -> SchemeRequest<'_> {
    SchemeRequest::BlockFloor { block, floor }
}

#[test]
fn override_floor_wins_over_everything() {
    let mut defaults = SchemeSet::new();
    defaults.set_block_default("b03", "default-block");
    defaults.set_block_floor("b03", 5, "default-floor");
    let mut overrides = SchemeSet::new();
    overrides.set_block_default("b03", "override-block");
    overrides.set_block_floor("b03", 5, "override-floor");

    assert_eq!(
        resolve_scheme(block_floor("b03", 5), &defaults, &overrides),
        Some("override-floor")
    );
}

#[test]
fn override_block_default_beats_floor_specific_default() {
    // The tricky rung: an uploaded block plan must show even on floors
    // that have a floor-specific built-in.
    let mut defaults = SchemeSet::new();
    defaults.set_block_floor("b03", 5, "default-floor");
    let mut overrides = SchemeSet::new();
    overrides.set_block_default("b03", "override-block");

    assert_eq!(
        resolve_scheme(block_floor("b03", 5), &defaults, &overrides),
        Some("override-block")
    );
}

#[test]
fn default_floor_beats_default_block() {
    let mut defaults = SchemeSet::new();
    defaults.set_block_default("b03", "default-block");
    defaults.set_block_floor("b03", 5, "default-floor");

    assert_eq!(
        resolve_scheme(block_floor("b03", 5), &defaults, &SchemeSet::new()),
        Some("default-floor")
    );
    assert_eq!(
        resolve_scheme(block_floor("b03", 6), &defaults, &SchemeSet::new()),
        Some("default-block")
    );
}

#[test]
fn no_entry_at_any_level_resolves_to_nothing() {
    assert_eq!(
        resolve_scheme(block_floor("b09", 4), &SchemeSet::new(), &SchemeSet::new()),
        None
    );
    assert_eq!(
        resolve_scheme(SchemeRequest::Master, &SchemeSet::new(), &SchemeSet::new()),
        None
    );
}

#[test]
fn master_prefers_override() {
    let mut defaults = SchemeSet::new();
    defaults.set_master("default-master");
    let mut overrides = SchemeSet::new();
    overrides.set_master("override-master");

    assert_eq!(
        resolve_scheme(SchemeRequest::Master, &defaults, &overrides),
        Some("override-master")
    );
    assert_eq!(
        resolve_scheme(SchemeRequest::Master, &defaults, &SchemeSet::new()),
        Some("default-master")
    );
}

#[test]
fn blank_entries_fall_through_instead_of_blanking_the_plan() {
    let mut defaults = SchemeSet::new();
    defaults.set_block_default("b03", "default-block");
    let mut overrides = SchemeSet::new();
    overrides.set_block_floor("b03", 5, "   ");
    overrides.set_block_default("b03", "");

    assert_eq!(
        resolve_scheme(block_floor("b03", 5), &defaults, &overrides),
        Some("default-block")
    );
}

#[test]
fn built_in_defaults_resolve_for_every_catalog_block() {
    let defaults = default_schemes();
    let overrides = SchemeSet::new();
    for entry in kvartal_core::BLOCK_CATALOG {
        let resolved = resolve_scheme(block_floor(entry.id, 1), &defaults, &overrides);
        assert_eq!(resolved, Some(entry.plan_src));
    }
}
