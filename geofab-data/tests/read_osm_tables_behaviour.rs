//! Behavioural tests for the `read_osm_tables` entry point.

use camino::{Utf8Path, Utf8PathBuf};
use geofab_core::{NodeId, RecordingDiagnostics, WayId};
use geofab_data::{OsmReadError, OsmTables, WayFilter, read_osm_tables};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::{cell::RefCell, fs, io::Write, path::PathBuf};
use tempfile::{NamedTempFile, TempPath};

mod support;

use support::{decode_fixture, utf8_path};

type ReadResultCell = RefCell<Option<Result<OsmTables, OsmReadError>>>;

enum FixtureTarget {
    Existing(TempPath),
    Missing(Utf8PathBuf),
}

impl FixtureTarget {
    fn path(&self) -> &Utf8Path {
        match self {
            Self::Existing(temp) => utf8_path(temp),
            Self::Missing(path) => path.as_path(),
        }
    }
}

#[fixture]
fn target_fixture() -> RefCell<Option<FixtureTarget>> {
    RefCell::new(None)
}

#[fixture]
fn way_filter() -> RefCell<WayFilter> {
    RefCell::new(WayFilter::All)
}

#[fixture]
fn diagnostics() -> RecordingDiagnostics {
    RecordingDiagnostics::default()
}

#[fixture]
fn read_result() -> ReadResultCell {
    RefCell::new(None)
}

fn expect_tables(result: &ReadResultCell) -> OsmTables {
    result
        .borrow()
        .as_ref()
        .expect("reading was attempted")
        .as_ref()
        .expect("expected successful read")
        .clone()
}

fn way_ids(tables: &OsmTables) -> Vec<i64> {
    tables.ways.ids().iter().map(|id| id.0).collect()
}

#[given("the power grid fixture")]
fn power_grid(#[from(target_fixture)] target: &RefCell<Option<FixtureTarget>>) {
    let fixture = decode_fixture(&support::fixtures_dir(), "power_grid");
    *target.borrow_mut() = Some(FixtureTarget::Existing(fixture));
}

#[given("a path to a missing PBF file")]
fn missing_file(#[from(target_fixture)] target: &RefCell<Option<FixtureTarget>>) {
    let path = support::fixtures_dir().join("missing.osm.pbf");
    *target.borrow_mut() = Some(FixtureTarget::Missing(path));
}

#[given("a file containing invalid PBF data")]
fn invalid_file(#[from(target_fixture)] target: &RefCell<Option<FixtureTarget>>) {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(b"not a pbf file").expect("write invalid data");
    file.flush().expect("flush invalid data");
    *target.borrow_mut() = Some(FixtureTarget::Existing(file.into_temp_path()));
}

#[given("a filter on the power tag")]
fn power_filter(#[from(way_filter)] filter: &RefCell<WayFilter>) {
    *filter.borrow_mut() = WayFilter::key("power");
}

#[given("a filter on power lines")]
fn power_line_filter(#[from(way_filter)] filter: &RefCell<WayFilter>) {
    *filter.borrow_mut() = WayFilter::key_values("power", ["line"]);
}

#[given("a filter accepting every way")]
fn all_filter(#[from(way_filter)] filter: &RefCell<WayFilter>) {
    *filter.borrow_mut() = WayFilter::All;
}

#[when("I read the OSM tables")]
fn read_tables(
    #[from(target_fixture)] target: &RefCell<Option<FixtureTarget>>,
    #[from(way_filter)] filter: &RefCell<WayFilter>,
    #[from(diagnostics)] diagnostics: &RecordingDiagnostics,
    #[from(read_result)] result: &ReadResultCell,
) {
    let target_ref = target.borrow();
    let path = target_ref
        .as_ref()
        .expect("target fixture should be initialised")
        .path();
    let outcome = read_osm_tables(path, &filter.borrow(), diagnostics);
    *result.borrow_mut() = Some(outcome);
}

#[then("ways 100, 101 and 103 are returned in file order")]
fn power_ways(#[from(read_result)] result: &ReadResultCell) {
    let tables = expect_tables(result);
    assert_eq!(way_ids(&tables), vec![100, 101, 103]);
    let refs = tables.ways.refs().expect("refs column present");
    assert_eq!(refs[0], vec![NodeId(1), NodeId(2), NodeId(3)]);
    assert_eq!(
        tables.ways.tags()[1].get("power").map(String::as_str),
        Some("line")
    );
}

#[then("only their referenced nodes are loaded")]
fn referenced_nodes(#[from(read_result)] result: &ReadResultCell) {
    let tables = expect_tables(result);
    assert_eq!(tables.nodes.len(), 5);
    assert!(!tables.nodes.contains(NodeId(6)));
    let corner = tables.nodes.lonlat(NodeId(3)).expect("node 3 loaded");
    support::assert_close(corner.x, 1.0);
    support::assert_close(corner.y, 1.0);
}

#[then("only way 101 is returned")]
fn power_lines(#[from(read_result)] result: &ReadResultCell) {
    let tables = expect_tables(result);
    assert_eq!(tables.ways.ids(), &[WayId(101)]);
    assert_eq!(tables.nodes.len(), 2);
}

#[then("five ways are returned")]
fn all_ways(#[from(read_result)] result: &ReadResultCell) {
    let tables = expect_tables(result);
    assert_eq!(way_ids(&tables), vec![100, 101, 102, 103, 104]);
}

#[then("a warning reports 1 missing node")]
fn missing_node_warning(#[from(diagnostics)] diagnostics: &RecordingDiagnostics) {
    let warnings = diagnostics.warnings();
    assert_eq!(warnings.len(), 1, "{warnings:?}");
    assert!(
        warnings[0].starts_with("1 referenced nodes missing from"),
        "{warnings:?}"
    );
}

#[then("an open error is returned")]
fn open_error(#[from(read_result)] result: &ReadResultCell) {
    let borrowed = result.borrow();
    match borrowed.as_ref().expect("reading was attempted") {
        Err(OsmReadError::Open { path, .. }) => assert!(path.ends_with("missing.osm.pbf")),
        other => panic!("expected open error, got {other:?}"),
    }
}

#[then("a decode error is returned")]
fn decode_error(#[from(read_result)] result: &ReadResultCell) {
    let borrowed = result.borrow();
    match borrowed.as_ref().expect("reading was attempted") {
        Err(OsmReadError::Decode { .. }) => {}
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[test]
fn scenario_indices_follow_feature_order() {
    let feature =
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/features/read_osm_tables.feature");
    let contents = fs::read_to_string(&feature).unwrap_or_else(|err| {
        panic!("failed to read feature file {feature:?}: {err}");
    });
    let titles: Vec<String> = contents
        .lines()
        .filter_map(|line| line.trim().strip_prefix("Scenario: "))
        .map(|title| title.to_owned())
        .collect();
    let expected = [
        "keeping only power ways",
        "restricting the filter to specific values",
        "warning about nodes absent from the file",
        "reporting a missing file",
        "reporting invalid PBF data",
    ];
    assert_eq!(
        titles, expected,
        "scenario order changed in feature file: {titles:?}"
    );
}

macro_rules! register_scenario {
    ($name:ident, $index:literal) => {
        #[scenario(path = "tests/features/read_osm_tables.feature", index = $index)]
        fn $name(
            target_fixture: RefCell<Option<FixtureTarget>>,
            way_filter: RefCell<WayFilter>,
            diagnostics: RecordingDiagnostics,
            read_result: ReadResultCell,
        ) {
            let _ = (target_fixture, way_filter, diagnostics, read_result);
        }
    };
}

register_scenario!(keeping_only_power_ways, 0);
register_scenario!(restricting_filter_values, 1);
register_scenario!(warning_about_missing_nodes, 2);
register_scenario!(reporting_a_missing_file, 3);
register_scenario!(reporting_invalid_data, 4);
