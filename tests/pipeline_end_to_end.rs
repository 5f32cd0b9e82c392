//! Full pipeline runs over generated publication archives.

mod common;

use std::fs;

use pcn_supplier_map::{pipeline, DatasetKind, PipelineConfig};
use tempfile::tempdir;

use common::{build_zip, xlsx_bytes, zip_bytes};

const GEO_DOC: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "properties": {"code": "N001", "name": "PCN001"},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [-0.2, 51.4], [-0.1, 51.4], [-0.1, 51.5], [-0.2, 51.5], [-0.2, 51.4]
                ]]
            }
        }
    ]
}"#;

fn practice_sheet() -> Vec<u8> {
    xlsx_bytes(
        "PCN Core Partner Details",
        &[
            vec![
                "Partner\nOrganisation\nCode",
                "PCN Code",
                "Practice\nParent\nSub ICB Loc Code",
            ],
            vec!["P0001", "N001", "B01"],
            vec!["P0002", "N001", "B01"],
            vec!["P0003", "N002", "B02"],
        ],
    )
}

// P0001 appears twice; the later row (TPP) must win. P0003 has no
// supplier observation at all.
const SUPPLIER_CSV: &str = "practice_code,system_supplier\n\
P0001,EMIS\n\
P0002,EMIS\n\
P0001,TPP\n";

fn test_config(root: &std::path::Path) -> PipelineConfig {
    PipelineConfig {
        work_dir: root.join("extracted"),
        output_table_path: root.join("output/counts.csv"),
        output_image_path: root.join("output/map.png"),
        image_width: 400,
        image_height: 400,
        ..PipelineConfig::default()
    }
}

#[test]
fn full_archive_produces_expected_table_and_map() {
    let temp = tempdir().unwrap();
    let archive = temp.path().join("data.zip");
    // The geo document ships nested inside a secondary zip, as in the
    // real publication.
    let inner = zip_bytes(&[("pcn_map.json", GEO_DOC.as_bytes())]);
    build_zip(
        &archive,
        &[
            ("ePCN.xlsx", practice_sheet().as_slice()),
            ("POMI_APR2023_to_SEP2023.csv", SUPPLIER_CSV.as_bytes()),
            ("boundaries.zip", inner.as_slice()),
        ],
    );

    let config = test_config(temp.path());
    let report = pipeline::run(&config, &archive).unwrap();

    assert!(!report.used_fallback());
    assert_eq!(report.practice_count, 3);
    assert_eq!(report.observation_count, 3);
    assert_eq!(report.network_count, 2);
    assert_eq!(report.total_supplier_a, 1); // EMIS, on P0002
    assert_eq!(report.total_supplier_b, 1); // TPP, on P0001 via last-row-wins

    let table = fs::read_to_string(&config.output_table_path).unwrap();
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines[0], "pcn_code,EMIS,TPP,ICB");
    assert_eq!(lines[1], "N001,1,1,B01");
    // N002 has no geometry and no resolved supplier but still appears.
    assert_eq!(lines[2], "N002,0,0,B02");
    assert_eq!(lines.len(), 3);

    let image = fs::read(&config.output_image_path).unwrap();
    assert!(!image.is_empty());
    assert_eq!(&image[1..4], b"PNG".as_slice());
}

#[test]
fn missing_tabular_file_falls_back_and_still_writes_outputs() {
    let temp = tempdir().unwrap();
    let archive = temp.path().join("data.zip");
    build_zip(
        &archive,
        &[
            ("ePCN.xlsx", practice_sheet().as_slice()),
            ("pcn_map.json", GEO_DOC.as_bytes()),
        ],
    );

    let config = test_config(temp.path());
    let report = pipeline::run(&config, &archive).unwrap();

    assert!(report.used_fallback());
    assert_eq!(report.fallbacks.len(), 1);
    assert_eq!(report.fallbacks[0].dataset, DatasetKind::Tabular);
    // The placeholder supplies five observations for P0001..P0005.
    assert_eq!(report.observation_count, 5);

    let table = fs::read_to_string(&config.output_table_path).unwrap();
    assert!(table.lines().count() > 1);
    let image = fs::read(&config.output_image_path).unwrap();
    assert!(!image.is_empty());
}

#[test]
fn missing_everything_still_runs_fully_on_placeholders() {
    let temp = tempdir().unwrap();
    let archive = temp.path().join("data.zip");
    build_zip(&archive, &[("readme.txt", b"nothing useful here")]);

    let config = test_config(temp.path());
    let report = pipeline::run(&config, &archive).unwrap();

    assert_eq!(report.fallbacks.len(), 3);
    assert_eq!(report.network_count, 5);
    // Placeholders alternate TPP/EMIS over five practices.
    assert_eq!(report.total_supplier_a, 2);
    assert_eq!(report.total_supplier_b, 3);

    let table = fs::read_to_string(&config.output_table_path).unwrap();
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines[0], "pcn_code,EMIS,TPP,ICB");
    assert_eq!(lines.len(), 6);
    assert!(config.output_image_path.is_file());
}

#[test]
fn fallback_disabled_fails_on_missing_dataset_without_writing_outputs() {
    let temp = tempdir().unwrap();
    let archive = temp.path().join("data.zip");
    build_zip(&archive, &[("readme.txt", b"empty publication")]);

    let config = PipelineConfig {
        allow_fallback: false,
        ..test_config(temp.path())
    };
    assert!(pipeline::run(&config, &archive).is_err());
    assert!(!config.output_table_path.exists());
    assert!(!config.output_image_path.exists());
}

#[test]
fn corrupt_archive_aborts_before_any_output() {
    let temp = tempdir().unwrap();
    let archive = temp.path().join("data.zip");
    fs::write(&archive, b"not a zip at all").unwrap();

    let config = test_config(temp.path());
    let err = pipeline::run(&config, &archive).unwrap_err();
    assert!(matches!(err, pcn_supplier_map::PipelineError::Archive { .. }));
    assert!(!config.output_table_path.exists());
}
