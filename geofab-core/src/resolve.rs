//! Resolution of way node references into coordinate sequences.

use geo::Coord;
use thiserror::Error;

use crate::{Diagnostics, NodeId, NodeTable, WayId, WayTable};

/// Errors raised while resolving node references.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A way referenced a node absent from the node table.
    ///
    /// This signals an upstream integrity defect; the reader is expected to
    /// supply every referenced node.
    #[error("way {way} references node {node} which is missing from the node table")]
    MissingNode {
        /// Way holding the dangling reference.
        way: WayId,
        /// Node that could not be found.
        node: NodeId,
    },
}

/// Map every way's `refs` to lon/lat coordinates, one sequence per row.
///
/// Each sequence has the same length and order as the row's `refs`. When
/// the table has no `refs` column a warning is reported and no sequences
/// are produced.
///
/// # Errors
///
/// Returns [`ResolveError::MissingNode`] for the first reference that the
/// node table cannot satisfy.
///
/// # Examples
///
/// ```
/// use geofab_core::{Node, NodeId, NodeTable, NoopDiagnostics, WayId, WayTable, resolve_refs};
///
/// let nodes: NodeTable = [Node::new(NodeId(1), 0.0, 0.0), Node::new(NodeId(2), 1.0, 0.0)]
///     .into_iter()
///     .collect();
/// let mut ways = WayTable::new();
/// ways.push(WayId(7), Default::default(), vec![NodeId(2), NodeId(1)]);
///
/// let sequences = resolve_refs(&ways, &nodes, &NoopDiagnostics)?;
/// assert_eq!(sequences[0][0].x, 1.0);
/// # Ok::<(), geofab_core::ResolveError>(())
/// ```
pub fn resolve_refs(
    ways: &WayTable,
    nodes: &NodeTable,
    diagnostics: &dyn Diagnostics,
) -> Result<Vec<Vec<Coord<f64>>>, ResolveError> {
    let Some(refs) = ways.refs() else {
        diagnostics.warn("refs column not found");
        return Ok(Vec::new());
    };

    ways.ids()
        .iter()
        .zip(refs)
        .map(|(way, row)| resolve_row(*way, row, nodes))
        .collect()
}

fn resolve_row(
    way: WayId,
    refs: &[NodeId],
    nodes: &NodeTable,
) -> Result<Vec<Coord<f64>>, ResolveError> {
    refs.iter()
        .map(|node| {
            nodes
                .lonlat(*node)
                .ok_or(ResolveError::MissingNode { way, node: *node })
        })
        .collect()
}
