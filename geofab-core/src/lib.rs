//! Core domain types and geometry pipeline for geofab.
//!
//! Responsibilities:
//! - Model the Node and Way tables produced by an OSM reader.
//! - Resolve way references into lon/lat coordinate sequences.
//! - Build point or polygon geometries, measure their projected area and
//!   derive a representative centroid.
//! - Attach the derived `lonlat` and `Area` columns to a way table.
//!
//! Boundaries:
//! - No I/O. Downloading archives and decoding PBF files live in
//!   `geofab-data`.
//! - Diagnostics are reported through the injected [`Diagnostics`] sink, never
//!   through global state.
//!
//! Invariants:
//! - Row order is preserved from input table to enriched output.
//! - Coordinates use `x = longitude`, `y = latitude` (WGS84).

#![forbid(unsafe_code)]

mod diagnostics;
mod enrich;
mod geometry;
mod projection;
mod resolve;
mod table;

pub use diagnostics::{
    Diagnostics, DiagnosticEvent, LogDiagnostics, NoopDiagnostics, RecordingDiagnostics,
};
pub use enrich::{EnrichError, EnrichedWay, EnrichedWayTable, enrich_ways};
pub use geometry::{BuiltGeometry, GeometryError, WayGeometry, build_geometry, round_area};
pub use projection::{WGS84_SEMI_MAJOR_AXIS, to_web_mercator};
pub use resolve::{ResolveError, resolve_refs};
pub use table::{Node, NodeId, NodeTable, Tags, WayId, WayTable, WayTableError};
