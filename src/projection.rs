//! Coordinate utilities for geographic drift computations.
//!
//! Particle state is kept in WGS84 longitude/latitude. Velocities arrive in
//! meters per second, so advection needs a local conversion between meters and
//! degrees. A flat-Earth tangent plane is accurate enough for the step sizes
//! involved (well under a kilometer per time step).
//!
//! # Example
//!
//! ```
//! use drift_rs::projection::LocalProjection;
//!
//! let proj = LocalProjection::new(21.46, 89.54);
//! let (lon, lat) = proj.displace(89.54, 21.46, 1000.0, 0.0);
//! assert!(lon > 89.54);
//! assert!((lat - 21.46).abs() < 1e-12);
//! ```

use std::f64::consts::PI;

/// Mean meridional meter-per-degree factor (WGS84).
pub const METERS_PER_DEG_LAT: f64 = 111_132.0;

/// Equatorial meter-per-degree factor for longitude (scaled by cos(lat)).
pub const METERS_PER_DEG_LON_EQ: f64 = 111_320.0;

/// Geographic bounding box in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBoundingBox {
    /// Minimum longitude (western edge) in degrees
    pub min_lon: f64,
    /// Minimum latitude (southern edge) in degrees
    pub min_lat: f64,
    /// Maximum longitude (eastern edge) in degrees
    pub max_lon: f64,
    /// Maximum latitude (northern edge) in degrees
    pub max_lat: f64,
}

impl GeoBoundingBox {
    /// Create a new bounding box.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Bounding box covering the whole globe.
    pub fn global() -> Self {
        Self::new(-180.0, -90.0, 180.0, 90.0)
    }

    /// Check if a point is within this bounding box.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }

    /// Get the center of the bounding box as (lon, lat).
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lon + self.max_lon) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }

    /// Expand the bounding box by a factor (1.1 = 10% expansion).
    pub fn expand(&self, factor: f64) -> Self {
        let lon_range = self.max_lon - self.min_lon;
        let lat_range = self.max_lat - self.min_lat;
        let lon_margin = lon_range * (factor - 1.0) / 2.0;
        let lat_margin = lat_range * (factor - 1.0) / 2.0;

        Self {
            min_lon: self.min_lon - lon_margin,
            min_lat: self.min_lat - lat_margin,
            max_lon: self.max_lon + lon_margin,
            max_lat: self.max_lat + lat_margin,
        }
    }

    /// Grow the box to include a point.
    pub fn include(&mut self, lon: f64, lat: f64) {
        self.min_lon = self.min_lon.min(lon);
        self.max_lon = self.max_lon.max(lon);
        self.min_lat = self.min_lat.min(lat);
        self.max_lat = self.max_lat.max(lat);
    }

    /// Smallest box containing a set of points, or `None` for an empty set.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut iter = points.into_iter();
        let (lon0, lat0) = iter.next()?;
        let mut bbox = Self::new(lon0, lat0, lon0, lat0);
        for (lon, lat) in iter {
            bbox.include(lon, lat);
        }
        Some(bbox)
    }
}

/// Local tangent plane projection.
///
/// Centered on a reference point; fast and accurate for the sub-degree
/// displacements taken during a drift step.
#[derive(Debug, Clone, Copy)]
pub struct LocalProjection {
    /// Reference latitude in degrees
    ref_lat: f64,
    /// Reference longitude in degrees
    ref_lon: f64,
    /// Meters per degree of longitude at the reference latitude
    m_per_deg_lon: f64,
}

impl LocalProjection {
    /// Create a projection centered on (lat, lon).
    pub fn new(ref_lat: f64, ref_lon: f64) -> Self {
        let m_per_deg_lon = METERS_PER_DEG_LON_EQ * (ref_lat * PI / 180.0).cos();
        Self {
            ref_lat,
            ref_lon,
            m_per_deg_lon,
        }
    }

    /// Convert geographic coordinates to local (x, y) in meters.
    pub fn geo_to_xy(&self, lon: f64, lat: f64) -> (f64, f64) {
        let x = (lon - self.ref_lon) * self.m_per_deg_lon;
        let y = (lat - self.ref_lat) * METERS_PER_DEG_LAT;
        (x, y)
    }

    /// Convert local (x, y) in meters back to geographic coordinates.
    pub fn xy_to_geo(&self, x: f64, y: f64) -> (f64, f64) {
        let lon = self.ref_lon + x / self.m_per_deg_lon;
        let lat = self.ref_lat + y / METERS_PER_DEG_LAT;
        (lon, lat)
    }

    /// Displace a geographic point by (dx, dy) meters.
    ///
    /// Uses the meter-per-degree factors at the point itself rather than the
    /// projection center, so it stays accurate far from the reference.
    pub fn displace(&self, lon: f64, lat: f64, dx: f64, dy: f64) -> (f64, f64) {
        displace(lon, lat, dx, dy)
    }
}

/// Displace a geographic point by (dx, dy) meters using local scale factors.
pub fn displace(lon: f64, lat: f64, dx: f64, dy: f64) -> (f64, f64) {
    let m_per_deg_lon = METERS_PER_DEG_LON_EQ * (lat * PI / 180.0).cos();
    // Guard the pole singularity; drift domains never reach it.
    let m_per_deg_lon = m_per_deg_lon.max(1.0);
    (lon + dx / m_per_deg_lon, lat + dy / METERS_PER_DEG_LAT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_contains() {
        let bbox = GeoBoundingBox::new(8.0, 63.5, 9.5, 64.0);
        assert!(bbox.contains(8.9, 63.8));
        assert!(!bbox.contains(10.0, 63.8));
        assert!(!bbox.contains(8.9, 65.0));
    }

    #[test]
    fn test_bbox_expand() {
        let bbox = GeoBoundingBox::new(0.0, 0.0, 1.0, 1.0).expand(1.2);
        assert!((bbox.min_lon - (-0.1)).abs() < 1e-12);
        assert!((bbox.max_lat - 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_bbox_from_points() {
        let bbox = GeoBoundingBox::from_points([(1.0, 2.0), (3.0, -1.0), (2.0, 0.5)]).unwrap();
        assert_eq!(bbox.min_lon, 1.0);
        assert_eq!(bbox.max_lon, 3.0);
        assert_eq!(bbox.min_lat, -1.0);
        assert_eq!(bbox.max_lat, 2.0);
        assert!(GeoBoundingBox::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_projection_roundtrip() {
        use approx::assert_relative_eq;

        let proj = LocalProjection::new(63.75, 8.75);
        let (x, y) = proj.geo_to_xy(8.9, 63.8);
        let (lon, lat) = proj.xy_to_geo(x, y);
        assert_relative_eq!(lon, 8.9, max_relative = 1e-9);
        assert_relative_eq!(lat, 63.8, max_relative = 1e-9);
    }

    #[test]
    fn test_displace_eastward() {
        use approx::assert_relative_eq;

        // 1 km east at the equator is roughly 0.009 degrees of longitude
        let (lon, lat) = displace(0.0, 0.0, 1000.0, 0.0);
        assert_relative_eq!(lon, 1000.0 / METERS_PER_DEG_LON_EQ, max_relative = 1e-9);
        assert_eq!(lat, 0.0);
    }

    #[test]
    fn test_displace_shrinks_with_latitude() {
        use approx::assert_relative_eq;

        let (lon_eq, _) = displace(0.0, 0.0, 1000.0, 0.0);
        let (lon_60, _) = displace(0.0, 60.0, 1000.0, 0.0);
        // Same eastward distance spans about twice the longitude at 60N
        assert_relative_eq!(lon_60 / lon_eq, 2.0, max_relative = 0.01);
    }
}
