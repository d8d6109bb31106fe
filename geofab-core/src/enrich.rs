//! Way enrichment: attach `lonlat` and `Area` columns to a way table.

use geo::Coord;
use thiserror::Error;

use crate::{
    Diagnostics, GeometryError, NodeId, NodeTable, ResolveError, Tags, WayId, WayTable,
    build_geometry, resolve_refs,
};

/// Errors raised while enriching a way table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnrichError {
    /// Node references could not be resolved.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    /// A row's coordinates could not form a geometry.
    #[error("way {way}: {source}")]
    Geometry {
        /// Way whose geometry failed.
        way: WayId,
        /// Underlying geometry failure.
        #[source]
        source: GeometryError,
    },
}

/// A way table extended with derived `lonlat` and `Area` columns.
///
/// Both derived columns hold exactly one entry per row, except when the
/// input lacked a `refs` column, in which case both are empty.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedWayTable {
    lonlat: Vec<Coord<f64>>,
    area: Vec<i64>,
    ways: WayTable,
}

impl EnrichedWayTable {
    /// Representative coordinate per row.
    #[must_use]
    pub fn lonlat(&self) -> &[Coord<f64>] {
        &self.lonlat
    }

    /// Web Mercator area per row, rounded to the nearest ten.
    #[must_use]
    pub fn area(&self) -> &[i64] {
        &self.area
    }

    /// The original way table.
    #[must_use]
    pub const fn ways(&self) -> &WayTable {
        &self.ways
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ways.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ways.is_empty()
    }

    /// Whether the derived columns were attached.
    #[must_use]
    pub fn has_geometry(&self) -> bool {
        self.ways.has_refs() && self.lonlat.len() == self.ways.len()
    }

    /// Iterate rows in table order.
    pub fn rows(&self) -> impl Iterator<Item = EnrichedWay<'_>> + '_ {
        let refs = self.ways.refs();
        self.ways
            .ids()
            .iter()
            .zip(self.ways.tags())
            .enumerate()
            .map(move |(index, (id, tags))| EnrichedWay {
                lonlat: self.lonlat.get(index).copied(),
                area: self.area.get(index).copied(),
                id: *id,
                tags,
                refs: refs.and_then(|column| column.get(index)).map(Vec::as_slice),
            })
    }

    /// Split into the derived columns and the original table.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Coord<f64>>, Vec<i64>, WayTable) {
        (self.lonlat, self.area, self.ways)
    }
}

/// Borrowed view of a single enriched row.
///
/// Serialises with the derived columns leading: `lonlat`, `Area`, then the
/// original columns.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EnrichedWay<'a> {
    /// Representative coordinate, absent when geometry was not derived.
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_lonlat"))]
    pub lonlat: Option<Coord<f64>>,
    /// Web Mercator area, absent when geometry was not derived.
    #[cfg_attr(feature = "serde", serde(rename = "Area"))]
    pub area: Option<i64>,
    /// Way identifier.
    pub id: WayId,
    /// Way tags.
    pub tags: &'a Tags,
    /// Node references, absent when the table has no `refs` column.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub refs: Option<&'a [NodeId]>,
}

#[cfg(feature = "serde")]
fn serialize_lonlat<S>(value: &Option<Coord<f64>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serde::Serialize::serialize(&value.map(|coord| [coord.x, coord.y]), serializer)
}

/// Resolve, build and attach geometry-derived columns for every way.
///
/// Row order is preserved and no rows are dropped. A table without a `refs`
/// column is returned with empty derived columns after a warning.
///
/// # Errors
///
/// Returns [`EnrichError::Resolve`] when a reference is missing from
/// `nodes`, and [`EnrichError::Geometry`] when a way has no references.
///
/// # Examples
///
/// ```
/// use geofab_core::{Node, NodeId, NodeTable, NoopDiagnostics, WayId, WayTable, enrich_ways};
///
/// let nodes: NodeTable = [
///     Node::new(NodeId(1), 0.0, 0.0),
///     Node::new(NodeId(2), 1.0, 0.0),
///     Node::new(NodeId(3), 1.0, 1.0),
/// ]
/// .into_iter()
/// .collect();
/// let mut ways = WayTable::new();
/// ways.push(WayId(10), Default::default(), vec![NodeId(1), NodeId(2), NodeId(3)]);
/// ways.push(WayId(11), Default::default(), vec![NodeId(1)]);
///
/// let enriched = enrich_ways(ways, &nodes, &NoopDiagnostics)?;
/// assert_eq!(enriched.len(), 2);
/// assert!(enriched.area()[0] > 0);
/// assert_eq!(enriched.area()[1], 0);
/// # Ok::<(), geofab_core::EnrichError>(())
/// ```
pub fn enrich_ways(
    ways: WayTable,
    nodes: &NodeTable,
    diagnostics: &dyn Diagnostics,
) -> Result<EnrichedWayTable, EnrichError> {
    let sequences = resolve_refs(&ways, nodes, diagnostics)?;
    let mut lonlat = Vec::with_capacity(sequences.len());
    let mut area = Vec::with_capacity(sequences.len());
    for (way, coords) in ways.ids().iter().zip(&sequences) {
        let built =
            build_geometry(coords).map_err(|source| EnrichError::Geometry { way: *way, source })?;
        lonlat.push(built.centroid);
        area.push(built.area);
    }
    Ok(EnrichedWayTable { lonlat, area, ways })
}
