//! Node and Way tables as produced by an OSM reader.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use geo::Coord;
use thiserror::Error;

/// OpenStreetMap tags attached to an element.
pub type Tags = BTreeMap<String, String>;

/// Identifier of an OSM node.
///
/// Displays as the decimal string used to key node lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct NodeId(pub i64);

impl From<i64> for NodeId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an OSM way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct WayId(pub i64);

impl From<i64> for WayId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for WayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single node with its WGS84 position (`x = longitude`, `y = latitude`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    /// Node identifier.
    pub id: NodeId,
    /// Longitude/latitude pair.
    pub lonlat: Coord<f64>,
}

impl Node {
    /// Construct a node from raw longitude and latitude values.
    #[must_use]
    pub const fn new(id: NodeId, lon: f64, lat: f64) -> Self {
        Self {
            id,
            lonlat: Coord { x: lon, y: lat },
        }
    }
}

/// Lookup table from node id to position.
///
/// # Examples
///
/// ```
/// use geofab_core::{Node, NodeId, NodeTable};
///
/// let nodes: NodeTable = [Node::new(NodeId(1), 13.4, 52.5)].into_iter().collect();
/// assert_eq!(nodes.lonlat(NodeId(1)).map(|c| c.x), Some(13.4));
/// assert!(nodes.lonlat(NodeId(2)).is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeTable {
    nodes: HashMap<NodeId, Coord<f64>>,
}

impl NodeTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, returning the position previously stored for its id.
    pub fn insert(&mut self, node: Node) -> Option<Coord<f64>> {
        self.nodes.insert(node.id, node.lonlat)
    }

    /// Position of the node with `id`, if present.
    #[must_use]
    pub fn lonlat(&self, id: NodeId) -> Option<Coord<f64>> {
        self.nodes.get(&id).copied()
    }

    /// Whether the table holds `id`.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of nodes held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl FromIterator<Node> for NodeTable {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl Extend<Node> for NodeTable {
    fn extend<I: IntoIterator<Item = Node>>(&mut self, iter: I) {
        for node in iter {
            self.insert(node);
        }
    }
}

/// Errors raised when assembling a [`WayTable`] from columns.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WayTableError {
    /// A column did not have one entry per row.
    #[error("{column} column has {actual} entries but the table has {expected} rows")]
    LengthMismatch {
        /// Name of the offending column.
        column: &'static str,
        /// Row count implied by the id column.
        expected: usize,
        /// Entries found in the offending column.
        actual: usize,
    },
}

/// Column-oriented table of ways.
///
/// The `refs` column is optional: readers that cannot supply node
/// references produce a table without it, and enrichment degrades
/// to empty derived columns for such tables.
#[derive(Debug, Clone, PartialEq)]
pub struct WayTable {
    ids: Vec<WayId>,
    tags: Vec<Tags>,
    refs: Option<Vec<Vec<NodeId>>>,
}

impl Default for WayTable {
    fn default() -> Self {
        Self::new()
    }
}

impl WayTable {
    /// Create an empty table carrying a `refs` column.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ids: Vec::new(),
            tags: Vec::new(),
            refs: Some(Vec::new()),
        }
    }

    /// Assemble a table from its columns.
    ///
    /// # Errors
    ///
    /// Returns [`WayTableError::LengthMismatch`] when `tags` or `refs` do not
    /// hold exactly one entry per id.
    pub fn from_columns(
        ids: Vec<WayId>,
        tags: Vec<Tags>,
        refs: Option<Vec<Vec<NodeId>>>,
    ) -> Result<Self, WayTableError> {
        let expected = ids.len();
        if tags.len() != expected {
            return Err(WayTableError::LengthMismatch {
                column: "tags",
                expected,
                actual: tags.len(),
            });
        }
        if let Some(column) = &refs
            && column.len() != expected
        {
            return Err(WayTableError::LengthMismatch {
                column: "refs",
                expected,
                actual: column.len(),
            });
        }
        Ok(Self { ids, tags, refs })
    }

    /// Append a way. `refs` is discarded when the table has no `refs` column.
    pub fn push(&mut self, id: WayId, tags: Tags, refs: Vec<NodeId>) {
        self.ids.push(id);
        self.tags.push(tags);
        if let Some(column) = &mut self.refs {
            column.push(refs);
        }
    }

    /// Remove the `refs` column.
    #[must_use]
    pub fn without_refs(mut self) -> Self {
        self.refs = None;
        self
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The id column.
    #[must_use]
    pub fn ids(&self) -> &[WayId] {
        &self.ids
    }

    /// The tags column.
    #[must_use]
    pub fn tags(&self) -> &[Tags] {
        &self.tags
    }

    /// The `refs` column, if the table has one.
    #[must_use]
    pub fn refs(&self) -> Option<&[Vec<NodeId>]> {
        self.refs.as_deref()
    }

    /// Whether the table carries a `refs` column.
    #[must_use]
    pub const fn has_refs(&self) -> bool {
        self.refs.is_some()
    }
}

impl FromIterator<(WayId, Tags, Vec<NodeId>)> for WayTable {
    fn from_iter<I: IntoIterator<Item = (WayId, Tags, Vec<NodeId>)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (id, tags, refs) in iter {
            table.push(id, tags, refs);
        }
        table
    }
}
