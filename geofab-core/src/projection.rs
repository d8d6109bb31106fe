//! Spherical Web Mercator (EPSG:3857) forward projection.

use geo::Coord;

/// WGS84 equatorial radius in metres, used as the sphere radius.
pub const WGS84_SEMI_MAJOR_AXIS: f64 = 6_378_137.0;

/// Project a WGS84 lon/lat coordinate (degrees) into Web Mercator metres.
///
/// High latitudes are projected as-is, so polar areas keep their true
/// Mercator extent. Latitude is limited to the geographic range ±90°, where
/// the northing stays finite because `tan(π/2)` is finite in `f64`.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use geofab_core::to_web_mercator;
///
/// let projected = to_web_mercator(Coord { x: 180.0, y: 0.0 });
/// assert!((projected.x - 20_037_508.342_789_244).abs() < 1e-6);
/// assert!(projected.y.abs() < 1e-9);
/// ```
#[expect(
    clippy::float_arithmetic,
    reason = "map projection is floating-point maths"
)]
#[must_use]
pub fn to_web_mercator(lonlat: Coord<f64>) -> Coord<f64> {
    // asinh(tan φ) == ln(tan(π/4 + φ/2)), and stays odd-symmetric at the poles.
    let lat = lonlat.y.clamp(-90.0, 90.0).to_radians();
    Coord {
        x: WGS84_SEMI_MAJOR_AXIS * lonlat.x.to_radians(),
        y: WGS84_SEMI_MAJOR_AXIS * lat.tan().asinh(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::f64::consts::FRAC_PI_4;

    #[rstest]
    fn projects_origin_to_origin() {
        let projected = to_web_mercator(Coord { x: 0.0, y: 0.0 });
        assert!(projected.x.abs() < 1e-9);
        assert!(projected.y.abs() < 1e-9);
    }

    #[rstest]
    fn projects_paris_close_to_reference() {
        // Paris: 2.35°E, 48.85°N
        let projected = to_web_mercator(Coord { x: 2.35, y: 48.85 });
        assert!((projected.x - 261_600.0).abs() < 1_000.0, "x={}", projected.x);
        assert!((projected.y - 6_250_000.0).abs() < 10_000.0, "y={}", projected.y);
    }

    #[rstest]
    fn poles_project_to_finite_symmetric_northings() {
        let north = to_web_mercator(Coord { x: 0.0, y: 90.0 });
        let south = to_web_mercator(Coord { x: 0.0, y: -90.0 });
        assert!(north.y.is_finite() && south.y.is_finite());
        assert!((north.y + south.y).abs() < 1e-6);
        assert!(north.y > 20_037_508.342_789_244);
    }

    #[rstest]
    fn high_latitudes_are_not_flattened(#[values(86.0, -86.0, 89.5)] lat: f64) {
        let projected = to_web_mercator(Coord { x: 0.0, y: lat });
        let expected =
            WGS84_SEMI_MAJOR_AXIS * (FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
        assert!(
            (projected.y - expected).abs() < 1e-3,
            "lat={lat}: {} vs {expected}",
            projected.y
        );
        assert!(projected.y.abs() > 20_037_508.342_789_244);
    }
}
