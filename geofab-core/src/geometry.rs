//! Point/polygon classification, projected area and centroid derivation.

use geo::{Area, Centroid, Coord, Geometry, LineString, MapCoords, Point, Polygon};
use thiserror::Error;

use crate::projection::to_web_mercator;

/// Minimum number of coordinates required to form a polygon ring.
const MIN_POLYGON_COORDS: usize = 3;

/// Errors raised when building a geometry from a coordinate sequence.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// The coordinate sequence held no coordinates.
    #[error("cannot build a geometry from an empty coordinate sequence")]
    EmptyCoordinates,
}

/// Geometry derived from a way's resolved coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum WayGeometry {
    /// Degenerate way with fewer than three coordinates.
    Point(Point<f64>),
    /// Way with at least three coordinates; the ring is closed implicitly.
    Polygon(Polygon<f64>),
}

impl WayGeometry {
    /// Classify `coords` as a point or polygon.
    ///
    /// Sequences of one or two coordinates collapse to a point at the first
    /// coordinate; the second coordinate of a pair is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::EmptyCoordinates`] for an empty sequence.
    pub fn from_coords(coords: &[Coord<f64>]) -> Result<Self, GeometryError> {
        let first = coords.first().ok_or(GeometryError::EmptyCoordinates)?;
        if coords.len() < MIN_POLYGON_COORDS {
            return Ok(Self::Point(Point::from(*first)));
        }
        Ok(Self::Polygon(Polygon::new(
            LineString::from(coords.to_vec()),
            Vec::new(),
        )))
    }

    /// Whether this is a polygon.
    #[must_use]
    pub const fn is_polygon(&self) -> bool {
        matches!(self, Self::Polygon(_))
    }

    /// Reproject every coordinate from WGS84 lon/lat into Web Mercator.
    #[must_use]
    pub fn to_web_mercator(&self) -> Self {
        match self {
            Self::Point(point) => Self::Point(point.map_coords(to_web_mercator)),
            Self::Polygon(polygon) => Self::Polygon(polygon.map_coords(to_web_mercator)),
        }
    }

    /// Unsigned area in the units of the current coordinate frame.
    #[must_use]
    pub fn unsigned_area(&self) -> f64 {
        match self {
            Self::Point(point) => point.unsigned_area(),
            Self::Polygon(polygon) => polygon.unsigned_area(),
        }
    }

    /// Representative coordinate in the current coordinate frame.
    ///
    /// A polygon whose ring has no defined centroid falls back to its first
    /// vertex.
    #[must_use]
    pub fn centroid(&self) -> Coord<f64> {
        match self {
            Self::Point(point) => point.centroid().0,
            Self::Polygon(polygon) => polygon
                .centroid()
                .map(|point| point.0)
                .or_else(|| polygon.exterior().0.first().copied())
                .unwrap_or_default(),
        }
    }
}

impl From<WayGeometry> for Geometry<f64> {
    fn from(value: WayGeometry) -> Self {
        match value {
            WayGeometry::Point(point) => Self::Point(point),
            WayGeometry::Polygon(polygon) => Self::Polygon(polygon),
        }
    }
}

/// Output of [`build_geometry`].
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltGeometry {
    /// Geometry in WGS84 lon/lat.
    pub geometry: WayGeometry,
    /// Web Mercator area in square metres, rounded to the nearest ten.
    pub area: i64,
    /// Centroid in WGS84 (`x = longitude`, `y = latitude`).
    pub centroid: Coord<f64>,
}

/// Build a geometry from a coordinate sequence and derive its area and
/// centroid.
///
/// The area is measured after projecting to Web Mercator, while the centroid
/// stays in lon/lat so downstream consumers receive geographic coordinates.
///
/// # Errors
///
/// Returns [`GeometryError::EmptyCoordinates`] for an empty sequence.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use geofab_core::build_geometry;
///
/// let triangle = [
///     Coord { x: 0.0, y: 0.0 },
///     Coord { x: 1.0, y: 0.0 },
///     Coord { x: 1.0, y: 1.0 },
/// ];
/// let built = build_geometry(&triangle)?;
/// assert!(built.geometry.is_polygon());
/// assert!(built.area > 0);
/// assert!((built.centroid.x - 2.0 / 3.0).abs() < 1e-9);
/// # Ok::<(), geofab_core::GeometryError>(())
/// ```
pub fn build_geometry(coords: &[Coord<f64>]) -> Result<BuiltGeometry, GeometryError> {
    let geometry = WayGeometry::from_coords(coords)?;
    let area = round_area(geometry.to_web_mercator().unsigned_area());
    let centroid = geometry.centroid();
    Ok(BuiltGeometry {
        geometry,
        area,
        centroid,
    })
}

/// Round an area to the nearest multiple of ten, ties to even, as an integer.
///
/// # Examples
///
/// ```
/// use geofab_core::round_area;
///
/// assert_eq!(round_area(1234.0), 1230);
/// assert_eq!(round_area(1236.0), 1240);
/// assert_eq!(round_area(25.0), 20);
/// assert_eq!(round_area(0.0), 0);
/// ```
#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    reason = "rounding is floating-point maths and the result is saturated into i64"
)]
#[must_use]
pub fn round_area(area: f64) -> i64 {
    ((area / 10.0).round_ties_even() * 10.0) as i64
}
