//! Facade crate for geofab.
//!
//! This crate re-exports the way geometry pipeline and, behind the `data`
//! feature, the Geofabrik archive cache and PBF reader.

#![forbid(unsafe_code)]

pub use geofab_core::{
    Diagnostics, EnrichError, EnrichedWay, EnrichedWayTable, LogDiagnostics, Node, NodeId,
    NodeTable, Tags, WayId, WayTable, build_geometry, enrich_ways, resolve_refs,
};

#[cfg(feature = "data")]
pub use geofab_data::{
    ArchiveCache, ArchiveError, ArchiveSource, ArchiveUrl, HttpArchiveSource,
    HttpArchiveSourceConfig, OsmReadError, OsmTables, WayFilter, read_osm_tables,
};
