//! Test helpers for decoding fixtures and building extract configurations.

use super::*;
use base64::{Engine as _, engine::general_purpose};
use camino::{Utf8Path, Utf8PathBuf};
use geofab_data::{ArchiveUrl, FetchProgress, WayFilter};
use std::fs;

pub(super) const REGION_URL: &str = "https://download.geofabrik.de/europe/power-grid.osm.pbf";

/// Decode the shared power grid fixture into raw PBF bytes.
pub(super) fn power_grid_bytes() -> Vec<u8> {
    let encoded_path = Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../geofab-data/tests/fixtures/power_grid.osm.pbf.b64");
    let encoded = fs::read_to_string(&encoded_path)
        .unwrap_or_else(|err| panic!("failed to read fixture {encoded_path}: {err}"));
    let cleaned: String = encoded
        .chars()
        .filter(|ch| !ch.is_ascii_whitespace())
        .collect();
    general_purpose::STANDARD
        .decode(cleaned.as_bytes())
        .unwrap_or_else(|err| panic!("failed to decode fixture {encoded_path}: {err}"))
}

/// Configuration writing to `root` with progress hidden.
pub(super) fn config_in(root: &Utf8Path, filter: WayFilter) -> ExtractConfig {
    ExtractConfig {
        url: ArchiveUrl::new(REGION_URL),
        data_dir: root.join("earth_data"),
        update: false,
        insecure: false,
        timeout: None,
        filter,
        output: root.join("out").join("ways.json"),
        progress: FetchProgress::Hidden,
    }
}

pub(super) fn utf8_root(dir: &tempfile::TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("temp dir should be UTF-8")
}
