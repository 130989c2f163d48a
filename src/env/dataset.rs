//! Gridded dataset adapter.
//!
//! Wraps a NetCDF dataset (local file or opened remote handle) and exposes a
//! selection of its variables under canonical names. The mapping from native
//! variable names (`uo`, `VHM0`, `eastward_wind`, ...) to the canonical
//! vocabulary is explicit per dataset, so the same adapter serves current,
//! wind and wave products from different producers.
//!
//! Handles the usual gridded-product quirks:
//! - Regular (1D lat/lon) and curvilinear (2D lat/lon) grids
//! - Packed data (`i16` with `scale_factor`/`add_offset`)
//! - Fill values mapped to NaN
//! - 4D variables reduced to the surface layer
//! - CF time units ("seconds/hours/days since ...")
//!
//! # Example
//!
//! ```ignore
//! use drift_rs::env::{GriddedDataset, Variable, VariableMapping};
//!
//! let mapping = VariableMapping::new()
//!     .map("uo", Variable::XSeaWaterVelocity)
//!     .map("vo", Variable::YSeaWaterVelocity);
//! let currents = GriddedDataset::from_file("currents.nc", "currents", mapping)?;
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;
use tracing::{debug, warn};

use crate::env::{FieldProvider, Variable};
use crate::projection::GeoBoundingBox;

/// Error type for dataset adapter construction.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// NetCDF library error
    #[error("NetCDF error: {0}")]
    NetCDF(#[from] netcdf::Error),

    /// Dataset has no recognizable lat/lon coordinates
    #[error("dataset '{0}' has no lat/lon coordinates")]
    MissingCoordinates(String),

    /// A mapped native variable is absent from the dataset
    #[error("dataset '{dataset}' has no variable '{native}' (mapped to '{canonical}')")]
    MissingVariable {
        /// Dataset name
        dataset: String,
        /// Native variable name from the mapping
        native: String,
        /// Canonical target
        canonical: Variable,
    },

    /// The mapping table is empty
    #[error("dataset '{0}' opened with an empty variable mapping")]
    EmptyMapping(String),

    /// Time axis missing or empty
    #[error("dataset '{0}' has no usable time axis")]
    MissingTime(String),
}

/// Table translating native variable names to canonical variables.
#[derive(Debug, Clone, Default)]
pub struct VariableMapping {
    entries: Vec<(String, Variable)>,
}

impl VariableMapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a native-name to canonical-variable entry.
    pub fn map(mut self, native: impl Into<String>, canonical: Variable) -> Self {
        self.entries.push((native.into(), canonical));
        self
    }

    /// Canonical variables this mapping produces.
    pub fn canonical_variables(&self) -> Vec<Variable> {
        self.entries.iter().map(|(_, v)| *v).collect()
    }

    /// Entries as (native, canonical) pairs.
    pub fn entries(&self) -> &[(String, Variable)] {
        &self.entries
    }

    /// Whether the mapping has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Grid coordinate layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GridKind {
    /// Regular lat/lon grid (1D coordinate axes)
    Regular,
    /// Curvilinear grid (2D lat/lon arrays)
    Curvilinear,
}

/// Fill value used by CF-convention producers.
const FILL_VALUE_F32: f32 = 9.96921e+36;

/// A gridded environmental dataset exposing canonical variables.
pub struct GriddedDataset {
    name: String,
    grid_kind: GridKind,
    /// Latitude array [n_y][n_x]
    lat: Vec<Vec<f64>>,
    /// Longitude array [n_y][n_x]
    lon: Vec<Vec<f64>>,
    /// Time axis in seconds since the Unix epoch
    time: Vec<f64>,
    /// Field data per canonical variable, [time][y][x]
    fields: Vec<(Variable, Vec<Vec<Vec<f32>>>)>,
    /// Grid dimensions (n_y, n_x)
    dims: (usize, usize),
    /// Geographic bounding box
    bbox: GeoBoundingBox,
}

impl GriddedDataset {
    /// Open a NetCDF file and adapt it with the given variable mapping.
    pub fn from_file(
        path: impl AsRef<std::path::Path>,
        name: impl Into<String>,
        mapping: VariableMapping,
    ) -> Result<Self, DatasetError> {
        let file = netcdf::open(path)?;
        Self::from_netcdf(&file, name, mapping)
    }

    /// Adapt an already-open NetCDF handle (local or remote).
    pub fn from_netcdf(
        file: &netcdf::File,
        name: impl Into<String>,
        mapping: VariableMapping,
    ) -> Result<Self, DatasetError> {
        let name = name.into();
        if mapping.is_empty() {
            return Err(DatasetError::EmptyMapping(name));
        }

        let (lat_name, lon_name) =
            detect_coord_names(file).ok_or_else(|| DatasetError::MissingCoordinates(name.clone()))?;

        let lat_var = file
            .variable(lat_name)
            .ok_or_else(|| DatasetError::MissingCoordinates(name.clone()))?;
        let lon_var = file
            .variable(lon_name)
            .ok_or_else(|| DatasetError::MissingCoordinates(name.clone()))?;

        let lat_dims = lat_var.dimensions();
        let (grid_kind, n_y, n_x, lat, lon) = if lat_dims.len() == 2 {
            let n_y = lat_dims[0].len();
            let n_x = lat_dims[1].len();
            let lat_flat: Vec<f64> = lat_var.get_values(..)?;
            let lon_flat: Vec<f64> = lon_var.get_values(..)?;
            (
                GridKind::Curvilinear,
                n_y,
                n_x,
                reshape_2d(&lat_flat, n_y, n_x),
                reshape_2d(&lon_flat, n_y, n_x),
            )
        } else {
            let lat_1d: Vec<f64> = lat_var.get_values(..)?;
            let lon_1d: Vec<f64> = lon_var.get_values(..)?;
            let n_y = lat_1d.len();
            let n_x = lon_1d.len();
            let mut lat = vec![vec![0.0; n_x]; n_y];
            let mut lon = vec![vec![0.0; n_x]; n_y];
            for j in 0..n_y {
                for i in 0..n_x {
                    lat[j][i] = lat_1d[j];
                    lon[j][i] = lon_1d[i];
                }
            }
            (GridKind::Regular, n_y, n_x, lat, lon)
        };

        let bbox = compute_bbox(&lat, &lon);
        let time = read_time_axis(file).ok_or_else(|| DatasetError::MissingTime(name.clone()))?;
        let n_time = time.len();

        let mut fields = Vec::with_capacity(mapping.entries().len());
        for (native, canonical) in mapping.entries() {
            match read_field(file, native, n_time, n_y, n_x)? {
                Some(data) => fields.push((*canonical, data)),
                None => {
                    return Err(DatasetError::MissingVariable {
                        dataset: name,
                        native: native.clone(),
                        canonical: *canonical,
                    });
                }
            }
        }

        debug!(
            dataset = %name,
            grid = ?grid_kind,
            n_y,
            n_x,
            n_time,
            "adapted gridded dataset"
        );

        Ok(Self {
            name,
            grid_kind,
            lat,
            lon,
            time,
            fields,
            dims: (n_y, n_x),
            bbox,
        })
    }

    /// Dataset name used in diagnostics.
    pub fn dataset_name(&self) -> &str {
        &self.name
    }

    /// Number of time steps.
    pub fn n_times(&self) -> usize {
        self.time.len()
    }

    /// Grid dimensions (n_y, n_x).
    pub fn dims(&self) -> (usize, usize) {
        self.dims
    }

    /// One-line summary of the data coverage.
    pub fn summary(&self) -> String {
        let vars: Vec<&str> = self.fields.iter().map(|(v, _)| v.as_str()).collect();
        format!(
            "{}: {}x{} grid, {} times, lon [{:.2}, {:.2}], lat [{:.2}, {:.2}], vars: {}",
            self.name,
            self.dims.0,
            self.dims.1,
            self.time.len(),
            self.bbox.min_lon,
            self.bbox.max_lon,
            self.bbox.min_lat,
            self.bbox.max_lat,
            vars.join(", ")
        )
    }

    /// Sample one canonical variable at a time index and geographic point.
    fn sample_at_index(&self, variable: Variable, t_idx: usize, lon: f64, lat: f64) -> Option<f64> {
        let data = self
            .fields
            .iter()
            .find(|(v, _)| *v == variable)
            .map(|(_, d)| d)?;

        let (j0, i0, fy, fx) = self.find_cell(lon, lat)?;
        let j1 = (j0 + 1).min(self.dims.0 - 1);
        let i1 = (i0 + 1).min(self.dims.1 - 1);

        interp_2d(&data[t_idx], j0, j1, i0, i1, fy, fx).map(|v| v as f64)
    }

    /// Find the grid cell containing a point, with bilinear factors.
    fn find_cell(&self, target_lon: f64, target_lat: f64) -> Option<(usize, usize, f64, f64)> {
        let (n_y, n_x) = self.dims;

        if self.grid_kind == GridKind::Regular && n_y > 0 && n_x > 0 {
            let lat_1d: Vec<f64> = (0..n_y).map(|j| self.lat[j][0]).collect();
            let lon_1d: Vec<f64> = (0..n_x).map(|i| self.lon[0][i]).collect();

            let (j0, _j1, fy) = find_bracket(&lat_1d, target_lat)?;
            let (i0, _i1, fx) = find_bracket(&lon_1d, target_lon)?;
            return Some((j0, i0, fy, fx));
        }

        // Curvilinear grid: scan for the nearest cell whose bounding box holds
        // the point.
        let mut best_dist = f64::INFINITY;
        let mut best_cell = None;

        for j in 0..n_y.saturating_sub(1) {
            for i in 0..n_x.saturating_sub(1) {
                let lon00 = self.lon[j][i];
                let lon01 = self.lon[j][i + 1];
                let lon10 = self.lon[j + 1][i];
                let lon11 = self.lon[j + 1][i + 1];
                let lat00 = self.lat[j][i];
                let lat01 = self.lat[j][i + 1];
                let lat10 = self.lat[j + 1][i];
                let lat11 = self.lat[j + 1][i + 1];

                let min_lon = lon00.min(lon01).min(lon10).min(lon11);
                let max_lon = lon00.max(lon01).max(lon10).max(lon11);
                let min_lat = lat00.min(lat01).min(lat10).min(lat11);
                let max_lat = lat00.max(lat01).max(lat10).max(lat11);

                if target_lon < min_lon
                    || target_lon > max_lon
                    || target_lat < min_lat
                    || target_lat > max_lat
                {
                    continue;
                }

                let center_lon = (lon00 + lon01 + lon10 + lon11) / 4.0;
                let center_lat = (lat00 + lat01 + lat10 + lat11) / 4.0;
                let dist = (target_lon - center_lon).powi(2) + (target_lat - center_lat).powi(2);

                if dist < best_dist {
                    best_dist = dist;
                    let fx = ((target_lon - lon00) / (lon01 - lon00).max(1e-10)).clamp(0.0, 1.0);
                    let fy = ((target_lat - lat00) / (lat10 - lat00).max(1e-10)).clamp(0.0, 1.0);
                    best_cell = Some((j, i, fy, fx));
                }
            }
        }

        best_cell
    }
}

impl FieldProvider for GriddedDataset {
    fn name(&self) -> &str {
        &self.name
    }

    fn offered_variables(&self) -> Vec<Variable> {
        self.fields.iter().map(|(v, _)| *v).collect()
    }

    fn coverage(&self) -> Option<GeoBoundingBox> {
        Some(self.bbox)
    }

    fn time_coverage(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let first = *self.time.first()?;
        let last = *self.time.last()?;
        Some((epoch_to_datetime(first)?, epoch_to_datetime(last)?))
    }

    fn sample(&self, variable: Variable, time: DateTime<Utc>, lon: f64, lat: f64) -> Option<f64> {
        if self.time.is_empty() {
            return None;
        }
        let t = time.timestamp() as f64 + f64::from(time.timestamp_subsec_millis()) / 1000.0;
        let (t0, t1, ft) = find_bracket(&self.time, t)?;

        let v0 = self.sample_at_index(variable, t0, lon, lat)?;
        if t0 == t1 || ft < 1e-10 {
            return Some(v0);
        }
        let v1 = self.sample_at_index(variable, t1, lon, lat)?;
        Some(v0 * (1.0 - ft) + v1 * ft)
    }
}

/// Detect lat/lon coordinate variable names.
fn detect_coord_names(file: &netcdf::File) -> Option<(&'static str, &'static str)> {
    let lat_names = ["lat", "latitude", "nav_lat", "lat_rho"];
    let lon_names = ["lon", "longitude", "nav_lon", "lon_rho"];

    for &lat_name in &lat_names {
        if file.variable(lat_name).is_some() {
            for &lon_name in &lon_names {
                if file.variable(lon_name).is_some() {
                    return Some((lat_name, lon_name));
                }
            }
        }
    }
    None
}

/// Read the time axis and convert it to seconds since the Unix epoch.
fn read_time_axis(file: &netcdf::File) -> Option<Vec<f64>> {
    let time_names = ["time", "ocean_time", "Time"];
    for name in time_names {
        if let Some(var) = file.variable(name) {
            let raw: Vec<f64> = var.get_values(..).ok()?;
            if raw.is_empty() {
                continue;
            }
            let units = get_attr_str(&var, "units");
            let values = match units.as_deref().and_then(parse_cf_time_units) {
                Some((scale, offset)) => raw.iter().map(|&t| t * scale + offset).collect(),
                None => {
                    warn!(
                        variable = name,
                        "time units not recognized; assuming epoch seconds"
                    );
                    raw
                }
            };
            return Some(values);
        }
    }
    None
}

/// Parse CF time units into (scale to seconds, epoch offset in seconds).
///
/// Accepts "seconds/minutes/hours/days since YYYY-MM-DD[ hh:mm:ss]".
fn parse_cf_time_units(units: &str) -> Option<(f64, f64)> {
    let mut parts = units.splitn(2, " since ");
    let unit = parts.next()?.trim().to_ascii_lowercase();
    let origin = parts.next()?.trim();

    let scale = match unit.as_str() {
        "seconds" | "second" | "s" => 1.0,
        "minutes" | "minute" | "min" => 60.0,
        "hours" | "hour" | "h" => 3600.0,
        "days" | "day" | "d" => 86400.0,
        _ => return None,
    };

    // Strip a trailing timezone marker if present.
    let origin = origin.trim_end_matches(" UTC").trim_end_matches('Z');
    let datetime = NaiveDateTime::parse_from_str(origin, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(origin, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(origin, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    Some((scale, datetime.and_utc().timestamp() as f64))
}

fn epoch_to_datetime(secs: f64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(secs as i64, 0).single()
}

/// Read a field as [time][y][x] with packed-data handling, or `None` if the
/// variable is absent.
fn read_field(
    file: &netcdf::File,
    native: &str,
    n_time: usize,
    n_y: usize,
    n_x: usize,
) -> Result<Option<Vec<Vec<Vec<f32>>>>, DatasetError> {
    let var = match file.variable(native) {
        Some(v) => v,
        None => return Ok(None),
    };

    let scale = get_attr_f64(&var, "scale_factor").unwrap_or(1.0);
    let offset = get_attr_f64(&var, "add_offset").unwrap_or(0.0);
    let fill_i16 = get_attr_i16(&var, "_FillValue").unwrap_or(i16::MAX);
    let fill_f32 = get_attr_f32(&var, "_FillValue").unwrap_or(FILL_VALUE_F32);

    let dims: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();

    // Packed i16 first, then plain f32.
    let flat: Vec<f32> = if let Ok(raw) = var.get_values::<i16, _>(..) {
        raw.iter()
            .map(|&v| {
                if v == fill_i16 {
                    f32::NAN
                } else {
                    (v as f64 * scale + offset) as f32
                }
            })
            .collect()
    } else {
        let raw: Vec<f32> = var.get_values(..)?;
        raw.iter()
            .map(|&v| {
                if !v.is_finite() || v == fill_f32 || v.abs() > 1e30 {
                    f32::NAN
                } else {
                    (v as f64 * scale + offset) as f32
                }
            })
            .collect()
    };

    Ok(Some(reshape_to_3d(&flat, &dims, n_time, n_y, n_x)))
}

/// Reshape a flat array to [time][y][x], taking the surface layer from 4D data.
fn reshape_to_3d(
    flat: &[f32],
    dims: &[usize],
    n_time: usize,
    n_y: usize,
    n_x: usize,
) -> Vec<Vec<Vec<f32>>> {
    let mut result = vec![vec![vec![f32::NAN; n_x]; n_y]; n_time];

    match dims.len() {
        2 => {
            for j in 0..n_y {
                for i in 0..n_x {
                    let idx = j * n_x + i;
                    if idx < flat.len() {
                        result[0][j][i] = flat[idx];
                    }
                }
            }
        }
        3 => {
            for t in 0..n_time {
                for j in 0..n_y {
                    for i in 0..n_x {
                        let idx = t * n_y * n_x + j * n_x + i;
                        if idx < flat.len() {
                            result[t][j][i] = flat[idx];
                        }
                    }
                }
            }
        }
        4 => {
            // [time][depth][y][x]: depth index 0 is the surface
            let n_depth = dims[1];
            for t in 0..n_time {
                for j in 0..n_y {
                    for i in 0..n_x {
                        let idx = t * n_depth * n_y * n_x + j * n_x + i;
                        if idx < flat.len() {
                            result[t][j][i] = flat[idx];
                        }
                    }
                }
            }
        }
        _ => {}
    }

    result
}

fn get_attr_str(var: &netcdf::Variable, name: &str) -> Option<String> {
    var.attribute_value(name)
        .and_then(|r| r.ok())
        .and_then(|v| match v {
            netcdf::AttributeValue::Str(s) => Some(s),
            _ => None,
        })
}

fn get_attr_f64(var: &netcdf::Variable, name: &str) -> Option<f64> {
    var.attribute_value(name)
        .and_then(|r| r.ok())
        .and_then(|v| match v {
            netcdf::AttributeValue::Double(d) => Some(d),
            netcdf::AttributeValue::Float(f) => Some(f as f64),
            _ => None,
        })
}

fn get_attr_i16(var: &netcdf::Variable, name: &str) -> Option<i16> {
    var.attribute_value(name)
        .and_then(|r| r.ok())
        .and_then(|v| match v {
            netcdf::AttributeValue::Short(s) => Some(s),
            netcdf::AttributeValue::Int(i) => Some(i as i16),
            _ => None,
        })
}

fn get_attr_f32(var: &netcdf::Variable, name: &str) -> Option<f32> {
    var.attribute_value(name)
        .and_then(|r| r.ok())
        .and_then(|v| match v {
            netcdf::AttributeValue::Float(f) => Some(f),
            netcdf::AttributeValue::Double(d) => Some(d as f32),
            _ => None,
        })
}

/// Reshape a flat array to 2D.
fn reshape_2d(flat: &[f64], n_y: usize, n_x: usize) -> Vec<Vec<f64>> {
    let mut result = vec![vec![0.0; n_x]; n_y];
    for j in 0..n_y {
        for i in 0..n_x {
            let idx = j * n_x + i;
            if idx < flat.len() {
                result[j][i] = flat[idx];
            }
        }
    }
    result
}

/// Compute a bounding box from lat/lon arrays.
fn compute_bbox(lat: &[Vec<f64>], lon: &[Vec<f64>]) -> GeoBoundingBox {
    let mut bbox = GeoBoundingBox::new(
        f64::INFINITY,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::NEG_INFINITY,
    );
    for (lat_row, lon_row) in lat.iter().zip(lon.iter()) {
        for (&la, &lo) in lat_row.iter().zip(lon_row.iter()) {
            if la.is_finite() && lo.is_finite() {
                bbox.include(lo, la);
            }
        }
    }
    bbox
}

/// Find bracketing indices and interpolation factor along a coordinate axis.
///
/// Handles ascending and descending axes; values outside the range clamp to
/// the nearest end.
fn find_bracket(coords: &[f64], value: f64) -> Option<(usize, usize, f64)> {
    if coords.is_empty() {
        return None;
    }
    if coords.len() == 1 {
        return Some((0, 0, 0.0));
    }

    let ascending = coords[1] > coords[0];

    for i in 0..coords.len() - 1 {
        let (c0, c1) = if ascending {
            (coords[i], coords[i + 1])
        } else {
            (coords[i + 1], coords[i])
        };

        if c0 <= value && value <= c1 {
            let f = (value - c0) / (c1 - c0).max(1e-10);
            return if ascending {
                Some((i, i + 1, f))
            } else {
                Some((i + 1, i, 1.0 - f))
            };
        }
    }

    if value <= coords[0].min(coords[coords.len() - 1]) {
        Some((0, 0, 0.0))
    } else {
        let n = coords.len() - 1;
        Some((n, n, 0.0))
    }
}

/// Bilinear interpolation on a 2D slice, skipping NaN corners.
fn interp_2d(
    data: &[Vec<f32>],
    j0: usize,
    j1: usize,
    i0: usize,
    i1: usize,
    fy: f64,
    fx: f64,
) -> Option<f32> {
    let v00 = data[j0][i0];
    let v01 = data[j0][i1];
    let v10 = data[j1][i0];
    let v11 = data[j1][i1];

    if !v00.is_finite() || !v01.is_finite() || !v10.is_finite() || !v11.is_finite() {
        // Near a mask edge; fall back to the first valid corner.
        for &v in &[v00, v01, v10, v11] {
            if v.is_finite() {
                return Some(v);
            }
        }
        return None;
    }

    let fx = fx as f32;
    let fy = fy as f32;
    let v0 = v00 * (1.0 - fx) + v01 * fx;
    let v1 = v10 * (1.0 - fx) + v11 * fx;
    Some(v0 * (1.0 - fy) + v1 * fy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cf_time_units() {
        let (scale, offset) = parse_cf_time_units("seconds since 1970-01-01 00:00:00").unwrap();
        assert_eq!(scale, 1.0);
        assert_eq!(offset, 0.0);

        let (scale, offset) = parse_cf_time_units("hours since 1970-01-02").unwrap();
        assert_eq!(scale, 3600.0);
        assert_eq!(offset, 86400.0);

        let (scale, _) = parse_cf_time_units("days since 2024-07-15T00:00:00Z").unwrap();
        assert_eq!(scale, 86400.0);

        assert!(parse_cf_time_units("fortnights since 1970-01-01").is_none());
        assert!(parse_cf_time_units("seconds").is_none());
    }

    #[test]
    fn test_find_bracket_ascending() {
        let coords = [0.0, 1.0, 2.0, 3.0];
        let (i0, i1, f) = find_bracket(&coords, 1.5).unwrap();
        assert_eq!((i0, i1), (1, 2));
        assert!((f - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_find_bracket_descending() {
        let coords = [3.0, 2.0, 1.0, 0.0];
        let (i0, i1, f) = find_bracket(&coords, 2.5).unwrap();
        // Bracket between index 1 (value 2.0) and index 0 (value 3.0)
        assert_eq!((i0, i1), (1, 0));
        assert!((f - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_find_bracket_clamps() {
        let coords = [0.0, 1.0];
        assert_eq!(find_bracket(&coords, -5.0).unwrap(), (0, 0, 0.0));
        assert_eq!(find_bracket(&coords, 5.0).unwrap(), (1, 1, 0.0));
    }

    #[test]
    fn test_interp_2d_skips_nan() {
        let data = vec![vec![f32::NAN, 2.0], vec![4.0, 8.0]];
        let v = interp_2d(&data, 0, 1, 0, 1, 0.5, 0.5).unwrap();
        // First finite corner wins near a mask edge
        assert_eq!(v, 2.0);
    }

    #[test]
    fn test_interp_2d_bilinear() {
        let data = vec![vec![0.0, 2.0], vec![4.0, 6.0]];
        let v = interp_2d(&data, 0, 1, 0, 1, 0.5, 0.5).unwrap();
        assert!((v - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_mapping_rejected() {
        assert!(VariableMapping::new().is_empty());
        let m = VariableMapping::new().map("uo", Variable::XSeaWaterVelocity);
        assert_eq!(m.canonical_variables(), vec![Variable::XSeaWaterVelocity]);
    }
}
