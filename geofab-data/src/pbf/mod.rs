//! Decode OSM PBF files into the node and way tables used by enrichment.
//!
//! Reading happens in two sequential passes so way rows keep file order:
//! the first collects matching ways and the node ids they reference, the
//! second collects coordinates for exactly those nodes.

use std::collections::{BTreeSet, HashSet};

use camino::{Utf8Path, Utf8PathBuf};
use geofab_core::{Diagnostics, Node, NodeId, NodeTable, Tags, WayId, WayTable};
use osmpbf::{Element, ElementReader};
use thiserror::Error;

/// Which ways to keep while reading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WayFilter {
    /// Keep every way.
    #[default]
    All,
    /// Keep ways carrying `key`, optionally restricted to `values`.
    Tag {
        /// Tag key that must be present.
        key: String,
        /// Accepted values; empty accepts any value.
        values: BTreeSet<String>,
    },
}

impl WayFilter {
    /// Keep ways carrying `key` with any value.
    pub fn key(key: impl Into<String>) -> Self {
        Self::Tag {
            key: key.into(),
            values: BTreeSet::new(),
        }
    }

    /// Keep ways whose `key` tag takes one of `values`.
    pub fn key_values<I, V>(key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::Tag {
            key: key.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether a way with `tags` passes the filter.
    #[must_use]
    pub fn matches(&self, tags: &Tags) -> bool {
        match self {
            Self::All => true,
            Self::Tag { key, values } => tags
                .get(key)
                .is_some_and(|value| values.is_empty() || values.contains(value)),
        }
    }
}

/// Node and way tables decoded from a PBF file.
#[derive(Debug, Clone, PartialEq)]
pub struct OsmTables {
    /// Coordinates of every node referenced by a kept way.
    pub nodes: NodeTable,
    /// Kept ways in file order.
    pub ways: WayTable,
}

/// Errors returned when reading an OSM PBF file.
#[derive(Debug, Error)]
pub enum OsmReadError {
    /// The file could not be opened.
    #[error("failed to open OSM PBF file at {path}")]
    Open {
        /// Error reported by the decoder.
        #[source]
        source: osmpbf::Error,
        /// File that was opened.
        path: Utf8PathBuf,
    },
    /// The file contents could not be decoded.
    #[error("failed to decode OSM PBF data at {path}")]
    Decode {
        /// Error reported by the decoder.
        #[source]
        source: osmpbf::Error,
        /// File being decoded.
        path: Utf8PathBuf,
    },
}

/// Read the ways passing `filter` and the nodes they reference.
///
/// # Errors
///
/// Returns [`OsmReadError::Open`] when the file cannot be opened and
/// [`OsmReadError::Decode`] when a block fails to decode.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use geofab_core::LogDiagnostics;
/// use geofab_data::pbf::{WayFilter, read_osm_tables};
///
/// # fn main() -> Result<(), geofab_data::pbf::OsmReadError> {
/// let tables = read_osm_tables(
///     Utf8Path::new("earth_data/pbf/monaco-latest.osm.pbf"),
///     &WayFilter::key("power"),
///     &LogDiagnostics::default(),
/// )?;
/// assert_eq!(tables.ways.len(), tables.ways.ids().len());
/// # Ok(())
/// # }
/// ```
pub fn read_osm_tables(
    path: &Utf8Path,
    filter: &WayFilter,
    diagnostics: &dyn Diagnostics,
) -> Result<OsmTables, OsmReadError> {
    let mut ways = WayTable::new();
    let mut wanted: HashSet<i64> = HashSet::new();
    open(path)?
        .for_each(|element| {
            if let Element::Way(way) = element {
                let tags: Tags = way
                    .tags()
                    .map(|(key, value)| (key.to_owned(), value.to_owned()))
                    .collect();
                if !filter.matches(&tags) {
                    return;
                }
                let refs: Vec<NodeId> = way.refs().map(NodeId).collect();
                wanted.extend(refs.iter().map(|id| id.0));
                ways.push(WayId(way.id()), tags, refs);
            }
        })
        .map_err(|source| decode_error(source, path))?;

    let mut nodes = NodeTable::new();
    if !wanted.is_empty() {
        open(path)?
            .for_each(|element| {
                let (id, lon, lat) = match element {
                    Element::Node(node) => (node.id(), node.lon(), node.lat()),
                    Element::DenseNode(node) => (node.id(), node.lon(), node.lat()),
                    Element::Way(_) | Element::Relation(_) => return,
                };
                if wanted.remove(&id) {
                    nodes.insert(Node::new(NodeId(id), lon, lat));
                }
            })
            .map_err(|source| decode_error(source, path))?;
    }

    if !wanted.is_empty() {
        diagnostics.warn(&format!(
            "{} referenced nodes missing from {path}",
            wanted.len()
        ));
    }
    diagnostics.debug(&format!(
        "read {} ways and {} nodes from {path}",
        ways.len(),
        nodes.len()
    ));
    Ok(OsmTables { nodes, ways })
}

fn open(path: &Utf8Path) -> Result<ElementReader<std::io::BufReader<std::fs::File>>, OsmReadError> {
    ElementReader::from_path(path).map_err(|source| OsmReadError::Open {
        source,
        path: path.to_path_buf(),
    })
}

fn decode_error(source: osmpbf::Error, path: &Utf8Path) -> OsmReadError {
    OsmReadError::Decode {
        source,
        path: path.to_path_buf(),
    }
}
