//! Data acquisition for geofab.
//!
//! - [`archive`] fetches Geofabrik extracts over HTTP and caches them beneath
//!   a data directory.
//! - [`pbf`] decodes a cached extract into the node and way tables consumed by
//!   [`geofab_core::enrich_ways`].
#![forbid(unsafe_code)]

pub mod archive;
pub mod pbf;

pub use archive::{
    ArchiveCache, ArchiveError, ArchiveSource, ArchiveUrl, FetchProgress, HttpArchiveSource,
    HttpArchiveSourceConfig, TransportError, fetch_archive,
};
pub use pbf::{OsmReadError, OsmTables, WayFilter, read_osm_tables};
