#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use serde_json::json;
use std::fs;
use tempfile::tempdir;

#[allow(deprecated)]
fn cli() -> Command {
    let mut cmd = Command::cargo_bin("gistagum").expect("gistagum binary");
    cmd.env_remove("GISTAGUM_HOLIDAYS")
        .env_remove("GISTAGUM_COORD_DIR")
        .env_remove("GISTAGUM_COMBINED_OUTPUT")
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn working_days_prints_count() {
    cli()
        .args(["working-days", "2026-01-05", "2026-01-09"])
        .assert()
        .success()
        .stdout("5\n");
}

#[test]
fn working_days_reversed_range_is_zero() {
    cli()
        .args(["working-days", "2026-01-09", "2026-01-05"])
        .assert()
        .success()
        .stdout("0\n");
}

#[test]
fn fallback_none_ignores_uncurated_holidays() {
    cli()
        .args(["working-days", "2027-03-22", "2027-03-26", "--fallback", "none"])
        .assert()
        .success()
        .stdout("5\n");
    cli()
        .args(["working-days", "2027-03-22", "2027-03-26"])
        .assert()
        .success()
        .stdout("3\n");
}

#[test]
fn holidays_file_extends_curated_years() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("holidays.json");
    fs::write(&path, r#"{ "2027": ["2027-03-23"] }"#).unwrap();

    cli()
        .args(["working-days", "2027-03-22", "2027-03-26", "--holidays"])
        .arg(&path)
        .assert()
        .success()
        .stdout("4\n");
}

#[test]
fn holidays_command_reports_origin() {
    cli()
        .args(["holidays", "2026"])
        .assert()
        .success()
        .stdout(str_contains("Holidays for 2026 (curated table): 20"));
    cli()
        .args(["holidays", "2027"])
        .assert()
        .success()
        .stdout(str_contains("fallback source 'philippine-rules'"));
}

#[test]
fn timeline_reports_variance() {
    cli()
        .args([
            "timeline",
            "--start",
            "2026-01-05",
            "--end",
            "2026-01-16",
            "--today",
            "2026-01-09",
            "--progress",
            "2026-01-09=60",
        ])
        .assert()
        .success()
        .stdout(str_contains("Expected progress  : 50.00%"))
        .stdout(str_contains("ahead of schedule"));
}

#[test]
fn timeline_rejects_bad_progress_argument() {
    cli()
        .args([
            "timeline",
            "--start",
            "2026-01-05",
            "--end",
            "2026-01-16",
            "--progress",
            "sixty",
        ])
        .assert()
        .failure();
}

#[test]
fn combine_geojson_reports_summary() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("coord");
    fs::create_dir_all(&input).unwrap();
    let polygon = json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {},
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[125.8, 7.4], [125.81, 7.4], [125.81, 7.41], [125.8, 7.4]]]
            }
        }]
    });
    fs::write(input.join("SanMiguel.geojson"), polygon.to_string()).unwrap();
    fs::write(input.join("broken.geojson"), "{").unwrap();
    let output = dir.path().join("out").join("combined.geojson");

    cli()
        .arg("combine-geojson")
        .arg("--input-dir")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(str_contains("Processed: SanMiguel.geojson -> San Miguel"))
        .stdout(str_contains("Error processing broken.geojson"))
        .stdout(str_contains("Total features: 1"))
        .stdout(str_contains("Error files: 1"))
        .stdout(str_contains("Output file is valid GeoJSON"));

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written["type"], "FeatureCollection");
    assert_eq!(written["features"][0]["properties"]["id"], 1);
    assert_eq!(written["features"][0]["properties"]["name"], "San Miguel");
}

#[test]
fn combine_geojson_fails_when_output_is_empty() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("coord");
    fs::create_dir_all(&input).unwrap();
    let output = dir.path().join("combined.geojson");

    cli()
        .arg("combine-geojson")
        .arg("--input-dir")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .failure()
        .stdout(str_contains("Output file validation failed"));
}

#[test]
fn combine_geojson_reads_config_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("shapes");
    fs::create_dir_all(&input).unwrap();
    let line_only = json!({
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "properties": {},
              "geometry": { "type": "LineString", "coordinates": [[125.8, 7.4], [125.9, 7.5]] } },
            { "type": "Feature", "properties": {},
              "geometry": { "type": "Polygon",
                            "coordinates": [[[125.8, 7.4], [125.81, 7.4],
                                             [125.81, 7.41], [125.8, 7.4]]] } }
        ]
    });
    fs::write(input.join("Busaon.geojson"), line_only.to_string()).unwrap();
    let output = dir.path().join("merged.geojson");
    let config = dir.path().join("combiner.json");
    fs::write(
        &config,
        json!({ "input_dir": input, "output_path": output }).to_string(),
    )
    .unwrap();

    cli()
        .arg("combine-geojson")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(str_contains("Skipped features: 1"));
    assert!(output.exists());
}
