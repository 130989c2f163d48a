//! Trajectory map rendering.
//!
//! Rasterizes the drift domain: water and land shading from the landmask,
//! element tracks colored by final status, the release point marked. The
//! same renderer produces single-snapshot frames for the animation.

use image::{Rgb, RgbImage};

use crate::ensemble::ElementStatus;
use crate::env::Landmask;
use crate::projection::GeoBoundingBox;
use crate::simulation::RunResult;

use super::raster::Canvas;

pub(crate) const WATER: Rgb<u8> = Rgb([198, 219, 239]);
pub(crate) const LAND: Rgb<u8> = Rgb([222, 214, 188]);
const TRACK: Rgb<u8> = Rgb([120, 120, 120]);
const SURFACE: Rgb<u8> = Rgb([20, 20, 20]);
const SUBMERGED: Rgb<u8> = Rgb([31, 119, 180]);
const STRANDED: Rgb<u8> = Rgb([214, 39, 40]);
const RELEASE: Rgb<u8> = Rgb([44, 160, 44]);

/// Map from geographic coordinates to pixels.
struct MapTransform {
    bbox: GeoBoundingBox,
    width: u32,
    height: u32,
}

impl MapTransform {
    fn new(bbox: GeoBoundingBox, width: u32, height: u32) -> Self {
        Self {
            bbox,
            width,
            height,
        }
    }

    fn to_pixel(&self, lon: f64, lat: f64) -> (i64, i64) {
        let fx = (lon - self.bbox.min_lon) / (self.bbox.max_lon - self.bbox.min_lon).max(1e-12);
        let fy = (lat - self.bbox.min_lat) / (self.bbox.max_lat - self.bbox.min_lat).max(1e-12);
        let x = (fx * (self.width as f64 - 1.0)).round() as i64;
        // Latitude grows upward, pixel rows grow downward.
        let y = ((1.0 - fy) * (self.height as f64 - 1.0)).round() as i64;
        (x, y)
    }

    fn to_geo(&self, x: u32, y: u32) -> (f64, f64) {
        let fx = x as f64 / (self.width as f64 - 1.0).max(1.0);
        let fy = 1.0 - y as f64 / (self.height as f64 - 1.0).max(1.0);
        (
            self.bbox.min_lon + fx * (self.bbox.max_lon - self.bbox.min_lon),
            self.bbox.min_lat + fy * (self.bbox.max_lat - self.bbox.min_lat),
        )
    }
}

fn status_color(status: ElementStatus) -> Rgb<u8> {
    match status {
        ElementStatus::Surface => SURFACE,
        ElementStatus::Submerged => SUBMERGED,
        ElementStatus::Stranded => STRANDED,
    }
}

/// Plot bounding box: all positions, padded, never degenerate.
pub(crate) fn plot_bbox(result: &RunResult) -> Option<GeoBoundingBox> {
    let mut bbox = result.bounding_box()?.expand(1.3);
    // A spill that barely moved still deserves a visible domain.
    let min_span = 0.02;
    if bbox.max_lon - bbox.min_lon < min_span {
        let (center, _) = bbox.center();
        bbox.min_lon = center - min_span / 2.0;
        bbox.max_lon = center + min_span / 2.0;
    }
    if bbox.max_lat - bbox.min_lat < min_span {
        let (_, center) = bbox.center();
        bbox.min_lat = center - min_span / 2.0;
        bbox.max_lat = center + min_span / 2.0;
    }
    Some(bbox)
}

/// Render the full-run trajectory map, or a single snapshot when `frame` is
/// given (used for animation frames).
pub(crate) fn render_map(
    result: &RunResult,
    landmask: Option<&Landmask>,
    bbox: GeoBoundingBox,
    width: u32,
    height: u32,
    frame: Option<usize>,
) -> RgbImage {
    let transform = MapTransform::new(bbox, width, height);
    let mut canvas = Canvas::new(width, height, WATER);

    // Land shading, one landmask query per pixel.
    if let Some(mask) = landmask {
        for y in 0..height {
            for x in 0..width {
                let (lon, lat) = transform.to_geo(x, y);
                if mask.is_land(lon, lat) {
                    canvas.put(x as i64, y as i64, LAND);
                }
            }
        }
    }

    let n_elements = result.snapshots.first().map(|s| s.lon.len()).unwrap_or(0);
    let last_frame = frame.unwrap_or(result.snapshots.len().saturating_sub(1));

    // Tracks up to the rendered frame.
    for i in 0..n_elements {
        let mut prev: Option<(i64, i64)> = None;
        for snapshot in result.snapshots.iter().take(last_frame + 1) {
            let (x, y) = transform.to_pixel(snapshot.lon[i], snapshot.lat[i]);
            if let Some((px, py)) = prev {
                canvas.draw_line(px, py, x, y, TRACK);
            }
            prev = Some((x, y));
        }
    }

    // Element markers at the rendered frame.
    if let Some(snapshot) = result.snapshots.get(last_frame) {
        for i in 0..n_elements {
            let (x, y) = transform.to_pixel(snapshot.lon[i], snapshot.lat[i]);
            canvas.draw_disc(x, y, 2, status_color(snapshot.status[i]));
        }
    }

    // Release point.
    if let Some(first) = result.snapshots.first() {
        if !first.lon.is_empty() {
            let (x, y) = transform.to_pixel(first.lon[0], first.lat[0]);
            canvas.draw_disc(x, y, 3, RELEASE);
        }
    }

    canvas.into_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DriftConfig;
    use crate::ensemble::SeedSpec;
    use crate::env::{UniformFlowProvider, Variable};
    use crate::simulation::{OilDriftSimulation, RunParams};
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::Arc;

    fn small_result() -> RunResult {
        let start = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();
        let mut sim = OilDriftSimulation::new(DriftConfig::default());
        sim.register_provider(
            Arc::new(UniformFlowProvider::new(0.5, 0.2, 0.0, 0.0)),
            &Variable::MANDATORY,
        )
        .unwrap();
        sim.seed_elements(
            SeedSpec::new(89.5, 21.5, start, "GENERIC MEDIUM CRUDE").with_number(10),
        )
        .unwrap();
        sim.run(RunParams::new(start + Duration::hours(3))).unwrap()
    }

    #[test]
    fn test_map_transform_roundtrip() {
        let bbox = GeoBoundingBox::new(89.0, 21.0, 90.0, 22.0);
        let transform = MapTransform::new(bbox, 100, 100);
        let (x, y) = transform.to_pixel(89.5, 21.5);
        let (lon, lat) = transform.to_geo(x as u32, y as u32);
        assert!((lon - 89.5).abs() < 0.02);
        assert!((lat - 21.5).abs() < 0.02);
    }

    #[test]
    fn test_latitude_up_is_pixel_up() {
        let bbox = GeoBoundingBox::new(0.0, 0.0, 1.0, 1.0);
        let transform = MapTransform::new(bbox, 100, 100);
        let (_, y_south) = transform.to_pixel(0.5, 0.1);
        let (_, y_north) = transform.to_pixel(0.5, 0.9);
        assert!(y_north < y_south);
    }

    #[test]
    fn test_render_produces_marks() {
        let result = small_result();
        let bbox = plot_bbox(&result).unwrap();
        let image = render_map(&result, None, bbox, 200, 150, None);

        assert_eq!(image.dimensions(), (200, 150));
        // Something other than plain water must be on the canvas
        let non_water = image.pixels().filter(|p| **p != WATER).count();
        assert!(non_water > 0);
    }

    #[test]
    fn test_land_is_shaded() {
        let result = small_result();
        let bbox = plot_bbox(&result).unwrap();
        // Put land over the eastern half of the domain
        let mask = Landmask::rectangle(bbox.center().0, bbox.min_lat, bbox.max_lon, bbox.max_lat);
        let image = render_map(&result, Some(&mask), bbox, 100, 80, None);

        let land_pixels = image.pixels().filter(|p| **p == LAND).count();
        assert!(land_pixels > 100);
    }
}
