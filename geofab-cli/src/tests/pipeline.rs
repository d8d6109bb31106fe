//! Pipeline integration tests covering the extract command flow.

use super::helpers::{config_in, power_grid_bytes, utf8_root};
use super::*;
use geofab_core::{NoopDiagnostics, RecordingDiagnostics};
use geofab_data::archive::{ArchiveError, StubArchiveSource, block_on_for_tests};
use geofab_data::WayFilter;
use rstest::rstest;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

#[rstest]
fn extract_pipeline_writes_enriched_rows() {
    let working = TempDir::new().expect("temp dir");
    let root = utf8_root(&working);
    let config = config_in(&root, WayFilter::key("power"));
    let source = StubArchiveSource::ok(power_grid_bytes());
    let diagnostics = RecordingDiagnostics::default();

    let report = block_on_for_tests(execute(&config, &source, &diagnostics))
        .expect("pipeline should succeed");

    assert_eq!(report.ways, 3);
    assert_eq!(
        report.archive,
        root.join("earth_data").join("pbf").join("power-grid.osm.pbf")
    );
    let written = fs::read_to_string(&report.output).expect("read output");
    let rows: Vec<Value> = serde_json::from_str(&written).expect("output is JSON");
    assert_eq!(rows.len(), 3);
    let first = rows[0].as_object().expect("row is an object");
    let keys: Vec<&str> = first.keys().map(String::as_str).collect();
    assert!(keys.contains(&"lonlat") && keys.contains(&"Area"), "{keys:?}");
    assert!(rows[0]["Area"].as_i64().is_some_and(|area| area > 0));
    assert_eq!(rows[0]["id"], 100);
    assert_eq!(rows[1]["Area"], 0);
    assert_eq!(rows[2]["tags"]["power"], "tower");
    assert!(
        diagnostics
            .messages_at(log::Level::Info)
            .iter()
            .any(|message| message == &format!("wrote 3 ways to {}", report.output))
    );
}

#[rstest]
fn second_run_reuses_cached_archive() {
    let working = TempDir::new().expect("temp dir");
    let root = utf8_root(&working);
    let config = config_in(&root, WayFilter::key_values("power", ["line"]));
    let source = StubArchiveSource::ok(power_grid_bytes());

    block_on_for_tests(execute(&config, &source, &NoopDiagnostics)).expect("first run");
    let report =
        block_on_for_tests(execute(&config, &source, &NoopDiagnostics)).expect("second run");

    assert_eq!(source.requests(), 1);
    assert_eq!(report.ways, 1);
}

#[rstest]
fn refused_download_surfaces_archive_error() {
    let working = TempDir::new().expect("temp dir");
    let root = utf8_root(&working);
    let config = config_in(&root, WayFilter::All);
    let source = StubArchiveSource::status(503);

    let err = block_on_for_tests(execute(&config, &source, &NoopDiagnostics))
        .expect_err("refusal should fail the run");

    match err {
        CliError::Archive(ArchiveError::NotDownloaded { file_name, .. }) => {
            assert_eq!(file_name, "power-grid.osm.pbf");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(!config.output.exists());
}

#[rstest]
fn dangling_reference_fails_enrichment() {
    let working = TempDir::new().expect("temp dir");
    let root = utf8_root(&working);
    let config = config_in(&root, WayFilter::All);
    let source = StubArchiveSource::ok(power_grid_bytes());

    let err = block_on_for_tests(execute(&config, &source, &NoopDiagnostics))
        .expect_err("way 104 references a missing node");

    assert!(matches!(err, CliError::Enrich(_)), "{err:?}");
    assert!(err.to_string().contains("99"), "{err}");
}
