//! Synthetic placeholder datasets.
//!
//! Substituted when an expected file is missing from the extracted
//! archive: five practices P0001..P0005 in five networks N001..N005 with
//! regions B01..B05, alternating TPP/EMIS suppliers, and five point
//! geometries stepping north-east from central London. The shapes match
//! the real datasets exactly (canonical headers, `code`/`name`
//! properties), so everything downstream runs unchanged.

use geojson::{Geometry, JsonObject, Value};
use serde_json::json;

use crate::constants::{columns, synthetic};
use crate::geo::{FeatureSet, GeoFeature};
use crate::table::Table;

/// Placeholder practice-to-network spreadsheet table.
pub fn synthetic_practices() -> Table {
    let mut table = Table::new(vec![
        columns::PRACTICE_CODE.to_string(),
        columns::PCN_CODE.to_string(),
        columns::REGION_CODE.to_string(),
    ]);
    for i in 1..=synthetic::COUNT {
        table.push_row(vec![
            format!("P{i:04}"),
            format!("N{i:03}"),
            format!("B{i:02}"),
        ]);
    }
    table
}

/// Placeholder per-practice supplier table.
pub fn synthetic_suppliers() -> Table {
    let mut table = Table::new(vec![
        columns::PRACTICE_CODE.to_string(),
        columns::SUPPLIER.to_string(),
    ]);
    for i in 1..=synthetic::COUNT {
        let supplier = if i % 2 == 0 { "EMIS" } else { "TPP" };
        table.push_row(vec![format!("P{i:04}"), supplier.to_string()]);
    }
    table
}

/// Placeholder network boundary set of five point features.
pub fn synthetic_features() -> FeatureSet {
    let features = (1..=synthetic::COUNT)
        .map(|i| {
            let code = format!("N{i:03}");
            let mut properties = JsonObject::new();
            properties.insert("code".to_string(), json!(code));
            properties.insert("name".to_string(), json!(format!("PCN{i:03}")));
            let step = i as f64 * synthetic::COORD_STEP;
            GeoFeature {
                code,
                geometry: Geometry::new(Value::Point(vec![
                    synthetic::BASE_LON + step,
                    synthetic::BASE_LAT + step,
                ])),
                properties,
            }
        })
        .collect();
    FeatureSet::new(features)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_tables_have_canonical_shape_and_five_rows() {
        let practices = synthetic_practices();
        assert_eq!(practices.headers(), ["practice_code", "pcn_code", "ICB"]);
        assert_eq!(practices.len(), 5);
        assert_eq!(practices.rows()[0], vec!["P0001", "N001", "B01"]);

        let suppliers = synthetic_suppliers();
        assert_eq!(suppliers.headers(), ["practice_code", "system_supplier"]);
        assert_eq!(suppliers.len(), 5);
        // 1-based odd rows are TPP, even rows EMIS.
        assert_eq!(suppliers.rows()[0][1], "TPP");
        assert_eq!(suppliers.rows()[1][1], "EMIS");
    }

    #[test]
    fn synthetic_features_carry_matching_codes() {
        let features = synthetic_features();
        assert_eq!(features.len(), 5);
        let codes: Vec<&str> = features
            .features()
            .iter()
            .map(|f| f.code.as_str())
            .collect();
        assert_eq!(codes, ["N001", "N002", "N003", "N004", "N005"]);
    }
}
