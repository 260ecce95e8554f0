use std::collections::BTreeMap;

use crate::key::{floor_hint, PositionKey};
use crate::occupancy::OccupancyMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub block: String,
    pub floor: u32,
    pub unit: String,
    pub occupant: String,
    pub assigned_at: u64,
}

/// Unit labels per block, keyed by artwork position id. Built by the UI
/// from whatever the current artwork exposes; may be sparse or empty.
pub type LabelTable = BTreeMap<String, BTreeMap<String, String>>;

/// Derives the occupancy report. This is a best-effort view: a key that
/// does not parse still produces a row with the raw stored key as its
/// unit, and a position with no label shows its position id.
pub fn build_report(occupancy: &OccupancyMap, labels: &LabelTable) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = occupancy
        .iter()
        .map(|(stored, record)| {
            let (block, floor, position) = match PositionKey::parse(stored) {
                Ok(key) => {
                    // Trust the floor baked into the artwork id over the
                    // key component; slides assign from whatever floor is
                    // on screen.
                    let floor = floor_hint(key.position()).unwrap_or_else(|| key.floor());
                    (
                        key.block().to_string(),
                        floor,
                        key.position().to_string(),
                    )
                }
                Err(_) => (String::new(), floor_hint(stored).unwrap_or(1), stored.to_string()),
            };
            let unit = labels
                .get(&block)
                .and_then(|table| table.get(&position))
                .cloned()
                .unwrap_or_else(|| position.clone());
            ReportRow {
                block,
                floor,
                unit,
                occupant: record.name.clone(),
                assigned_at: record.assigned_at,
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        (a.block.as_str(), a.floor, a.unit.as_str()).cmp(&(
            b.block.as_str(),
            b.floor,
            b.unit.as_str(),
        ))
    });
    rows
}

/// Renders rows as RFC 4180 CSV. Timestamp formatting is supplied by the
/// caller; the browser shell formats with the JS clock, tests pass the
/// raw number through.
pub fn render_csv<F>(rows: &[ReportRow], format_timestamp: F) -> String
where
    F: Fn(u64) -> String,
{
    let mut out = String::from("Block,Floor,Unit,Occupant,Assigned at\r\n");
    for row in rows {
        let fields = [
            csv_field(&row.block),
            csv_field(&row.floor.to_string()),
            csv_field(&row.unit),
            csv_field(&row.occupant),
            csv_field(&format_timestamp(row.assigned_at)),
        ];
        out.push_str(&fields.join(","));
        out.push_str("\r\n");
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occupancy_with(entries: &[(&str, u32, &str, &str)]) -> OccupancyMap {
        let mut map = OccupancyMap::new();
        for (block, floor, position, name) in entries {
            let key = PositionKey::new(*block, *floor, *position).unwrap();
            map.assign(&key, name, 1_000).unwrap();
        }
        map
    }

    #[test]
    fn report_prefers_label_and_falls_back_to_position_id() {
        let occupancy = occupancy_with(&[
            ("b01", 3, "apt_f03_a02", "Ivanov I.I."),
            ("b01", 2, "apt_f02_a01", "Petrova A.S."),
        ]);
        let mut labels = LabelTable::new();
        labels
            .entry("b01".to_string())
            .or_default()
            .insert("apt_f03_a02".to_string(), "No. 17".to_string());

        let rows = build_report(&occupancy, &labels);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].unit, "apt_f02_a01");
        assert_eq!(rows[1].unit, "No. 17");
        assert_eq!(rows[1].floor, 3);
    }

    #[test]
    fn artwork_floor_outranks_key_floor() {
        // Assigned from the floor-1 slide, but the artwork says floor 7.
        let occupancy = occupancy_with(&[("b02", 1, "apt_f07_a05", "Sidorov P.K.")]);
        let rows = build_report(&occupancy, &LabelTable::new());
        assert_eq!(rows[0].floor, 7);
    }

    #[test]
    fn csv_quotes_awkward_fields() {
        let rows = vec![ReportRow {
            block: "b01".to_string(),
            floor: 1,
            unit: "No. 1".to_string(),
            occupant: "Ivanov, Ivan \"Vanya\"".to_string(),
            assigned_at: 42,
        }];
        let csv = render_csv(&rows, |ts| ts.to_string());
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Block,Floor,Unit,Occupant,Assigned at"));
        assert_eq!(
            lines.next(),
            Some("b01,1,No. 1,\"Ivanov, Ivan \"\"Vanya\"\"\",42")
        );
    }
}
