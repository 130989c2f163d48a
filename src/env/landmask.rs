//! Coastline landmask.
//!
//! Loads land polygons from a GSHHS (Global Self-consistent Hierarchical
//! High-resolution Geography) shapefile and provides land/water classification
//! for the stranding test. Also usable as a field provider answering for
//! `land_binary_mask`.
//!
//! # Example
//!
//! ```ignore
//! use drift_rs::env::Landmask;
//! use drift_rs::projection::GeoBoundingBox;
//!
//! let bbox = GeoBoundingBox::new(88.0, 20.5, 91.0, 23.0);
//! let mask = Landmask::from_shapefile("data/GSHHS_f_L1.shp", &bbox)?;
//! assert!(!mask.is_land(89.0, 20.8));
//! ```

use std::path::Path;

use chrono::{DateTime, Utc};
use geo::{Contains, Coord, LineString, MultiPolygon, Point, Polygon};
use shapefile::{Reader, Shape};
use thiserror::Error;

use crate::env::{FieldProvider, Variable};
use crate::projection::GeoBoundingBox;

/// Error type for landmask loading.
#[derive(Debug, Error)]
pub enum LandmaskError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Shapefile parsing error
    #[error("shapefile error: {0}")]
    Shapefile(String),
}

impl From<shapefile::Error> for LandmaskError {
    fn from(e: shapefile::Error) -> Self {
        LandmaskError::Shapefile(e.to_string())
    }
}

/// Land polygons with point-in-polygon classification.
pub struct Landmask {
    /// Land mass polygons (GSHHS level 1 = ocean/land boundary)
    land_polygons: MultiPolygon<f64>,
    /// Bounding box of loaded data
    bbox: GeoBoundingBox,
    /// Number of polygons loaded
    polygon_count: usize,
}

impl Landmask {
    /// Load land polygons from a GSHHS shapefile.
    ///
    /// Only polygons intersecting the given bounding box are kept; everything
    /// outside the box is treated as open water.
    pub fn from_shapefile<P: AsRef<Path>>(
        path: P,
        bbox: &GeoBoundingBox,
    ) -> Result<Self, LandmaskError> {
        let mut reader = Reader::from_path(path)?;
        let mut polygons = Vec::new();

        for result in reader.iter_shapes_and_records() {
            let (shape, _record) = result?;

            match shape {
                Shape::Polygon(polygon) => {
                    for ring in polygon.rings() {
                        let coords: Vec<Coord<f64>> = ring
                            .points()
                            .iter()
                            .map(|p| Coord { x: p.x, y: p.y })
                            .collect();

                        if coords_intersect_bbox(&coords, bbox) {
                            let exterior = LineString::from(coords);
                            polygons.push(Polygon::new(exterior, vec![]));
                        }
                    }
                }
                _ => {} // Ignore non-polygon shapes
            }
        }

        // An empty set is valid: the domain may be all water.
        Ok(Self::with_polygons(MultiPolygon(polygons), *bbox))
    }

    /// Build a landmask directly from polygons (lon/lat vertex order).
    pub fn from_polygons(polygons: MultiPolygon<f64>, bbox: GeoBoundingBox) -> Self {
        Self::with_polygons(polygons, bbox)
    }

    /// A landmask with no land at all.
    pub fn all_water() -> Self {
        Self::with_polygons(MultiPolygon(vec![]), GeoBoundingBox::global())
    }

    /// A rectangular island, convenient for tests.
    pub fn rectangle(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        let exterior = LineString::from(vec![
            Coord {
                x: min_lon,
                y: min_lat,
            },
            Coord {
                x: max_lon,
                y: min_lat,
            },
            Coord {
                x: max_lon,
                y: max_lat,
            },
            Coord {
                x: min_lon,
                y: max_lat,
            },
            Coord {
                x: min_lon,
                y: min_lat,
            },
        ]);
        Self::with_polygons(
            MultiPolygon(vec![Polygon::new(exterior, vec![])]),
            GeoBoundingBox::global(),
        )
    }

    fn with_polygons(land_polygons: MultiPolygon<f64>, bbox: GeoBoundingBox) -> Self {
        let polygon_count = land_polygons.0.len();
        Self {
            land_polygons,
            bbox,
            polygon_count,
        }
    }

    /// Check if a point is on land.
    ///
    /// Points outside the loaded bounding box are assumed to be open water.
    pub fn is_land(&self, lon: f64, lat: f64) -> bool {
        if !self.bbox.contains(lon, lat) {
            return false;
        }
        let point = Point::new(lon, lat);
        self.land_polygons.contains(&point)
    }

    /// Check if a point is in water.
    pub fn is_water(&self, lon: f64, lat: f64) -> bool {
        !self.is_land(lon, lat)
    }

    /// Walk the segment from `from` to `to`, returning the first sampled
    /// point that lies on land.
    ///
    /// `precision_deg` is the sampling step in degrees; 0.001 corresponds to
    /// roughly 100 m. A coarser precision is faster but may step across
    /// narrow spits of land.
    pub fn first_land_crossing(
        &self,
        from: (f64, f64),
        to: (f64, f64),
        precision_deg: f64,
    ) -> Option<(f64, f64)> {
        if self.polygon_count == 0 {
            return None;
        }
        let (lon0, lat0) = from;
        let (lon1, lat1) = to;
        let span = ((lon1 - lon0).abs()).max((lat1 - lat0).abs());
        let steps = (span / precision_deg.max(1e-6)).ceil() as usize;
        let steps = steps.clamp(1, 10_000);

        for i in 1..=steps {
            let f = i as f64 / steps as f64;
            let lon = lon0 + f * (lon1 - lon0);
            let lat = lat0 + f * (lat1 - lat0);
            if self.is_land(lon, lat) {
                return Some((lon, lat));
            }
        }
        None
    }

    /// Get the bounding box of this landmask.
    pub fn bbox(&self) -> &GeoBoundingBox {
        &self.bbox
    }

    /// Get the number of polygons loaded.
    pub fn polygon_count(&self) -> usize {
        self.polygon_count
    }
}

impl FieldProvider for Landmask {
    fn name(&self) -> &str {
        "landmask"
    }

    fn offered_variables(&self) -> Vec<Variable> {
        vec![Variable::LandBinaryMask]
    }

    fn sample(&self, variable: Variable, _time: DateTime<Utc>, lon: f64, lat: f64) -> Option<f64> {
        match variable {
            Variable::LandBinaryMask => Some(if self.is_land(lon, lat) { 1.0 } else { 0.0 }),
            _ => None,
        }
    }
}

/// Check if any coordinate falls inside the bounding box.
fn coords_intersect_bbox(coords: &[Coord<f64>], bbox: &GeoBoundingBox) -> bool {
    coords.iter().any(|c| bbox.contains(c.x, c.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_water_has_no_land() {
        let mask = Landmask::all_water();
        assert!(!mask.is_land(0.0, 0.0));
        assert!(mask.is_water(89.5, 21.5));
        assert_eq!(mask.polygon_count(), 0);
    }

    #[test]
    fn test_rectangle_island() {
        let mask = Landmask::rectangle(10.0, 10.0, 11.0, 11.0);
        assert!(mask.is_land(10.5, 10.5));
        assert!(!mask.is_land(9.9, 10.5));
        assert!(!mask.is_land(10.5, 11.1));
    }

    #[test]
    fn test_segment_crossing_detected() {
        let mask = Landmask::rectangle(10.0, 10.0, 11.0, 11.0);
        // Segment passing straight through the island
        let hit = mask.first_land_crossing((9.5, 10.5), (11.5, 10.5), 0.001);
        let (lon, lat) = hit.expect("crossing expected");
        assert!((lat - 10.5).abs() < 1e-9);
        assert!(lon >= 10.0 && lon <= 10.01);
    }

    #[test]
    fn test_segment_clear_of_land() {
        let mask = Landmask::rectangle(10.0, 10.0, 11.0, 11.0);
        assert!(mask
            .first_land_crossing((9.0, 9.0), (9.0, 12.0), 0.001)
            .is_none());
    }

    #[test]
    fn test_land_binary_mask_provider() {
        use chrono::TimeZone;
        let mask = Landmask::rectangle(10.0, 10.0, 11.0, 11.0);
        let t = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();
        assert_eq!(
            mask.sample(Variable::LandBinaryMask, t, 10.5, 10.5),
            Some(1.0)
        );
        assert_eq!(
            mask.sample(Variable::LandBinaryMask, t, 9.0, 10.5),
            Some(0.0)
        );
        assert_eq!(mask.sample(Variable::XWind, t, 9.0, 10.5), None);
    }
}
