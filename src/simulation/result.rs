//! Run results: snapshots and the oil mass budget.

use chrono::{DateTime, Utc};

use crate::ensemble::{ElementStatus, Ensemble};
use crate::projection::GeoBoundingBox;

/// Oil mass partition over the output time steps.
///
/// One entry per output step, in kilograms. Surface, submerged and stranded
/// entries partition the retained oil; evaporated and biodegraded grow
/// monotonically; the five compartments sum to the released mass.
#[derive(Debug, Clone, Default)]
pub struct MassBudget {
    /// Oil floating in the slick
    pub mass_surface: Vec<f64>,
    /// Oil entrained in the water column
    pub mass_submerged: Vec<f64>,
    /// Oil fixed on the coastline
    pub mass_stranded: Vec<f64>,
    /// Oil lost to evaporation
    pub mass_evaporated: Vec<f64>,
    /// Oil lost to biodegradation
    pub mass_biodegraded: Vec<f64>,
    /// Maximum emulsion bulk density over the ensemble (kg/m3)
    pub oil_density: Vec<f64>,
}

impl MassBudget {
    /// Append one sample taken from the current ensemble state.
    pub(crate) fn push_sample(&mut self, ensemble: &Ensemble) {
        self.mass_surface
            .push(ensemble.mass_with_status(ElementStatus::Surface));
        self.mass_submerged
            .push(ensemble.mass_with_status(ElementStatus::Submerged));
        self.mass_stranded
            .push(ensemble.mass_with_status(ElementStatus::Stranded));
        self.mass_evaporated.push(ensemble.total_evaporated());
        self.mass_biodegraded.push(ensemble.total_biodegraded());
        self.oil_density.push(ensemble.max_bulk_density());
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.mass_surface.len()
    }

    /// Whether the budget holds no samples.
    pub fn is_empty(&self) -> bool {
        self.mass_surface.is_empty()
    }

    /// Retained (surface + submerged) oil mass per sample.
    pub fn retained(&self) -> Vec<f64> {
        self.mass_surface
            .iter()
            .zip(self.mass_submerged.iter())
            .map(|(a, b)| a + b)
            .collect()
    }

    /// Maximum bulk density reached over the run (kg/m3).
    pub fn max_density(&self) -> f64 {
        self.oil_density.iter().copied().fold(0.0, f64::max)
    }

    /// Total mass across all compartments at a sample.
    pub fn total_at(&self, i: usize) -> f64 {
        self.mass_surface[i]
            + self.mass_submerged[i]
            + self.mass_stranded[i]
            + self.mass_evaporated[i]
            + self.mass_biodegraded[i]
    }
}

/// Element positions and status at one output step.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Longitude per element (degrees east)
    pub lon: Vec<f64>,
    /// Latitude per element (degrees north)
    pub lat: Vec<f64>,
    /// Vertical position per element (m)
    pub z: Vec<f64>,
    /// Status per element
    pub status: Vec<ElementStatus>,
}

impl Snapshot {
    pub(crate) fn capture(ensemble: &Ensemble) -> Self {
        Self {
            lon: ensemble.lon.clone(),
            lat: ensemble.lat.clone(),
            z: ensemble.z.clone(),
            status: ensemble.status.clone(),
        }
    }
}

/// Complete result of a drift run.
///
/// Read-only after the run; consumed by the output reporter.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Output timestamps, first entry is the release time
    pub times: Vec<DateTime<Utc>>,
    /// Element states per output step
    pub snapshots: Vec<Snapshot>,
    /// Mass budget series
    pub budget: MassBudget,
    /// Substance name for titles and diagnostics
    oil_name: String,
}

impl RunResult {
    pub(crate) fn new(
        times: Vec<DateTime<Utc>>,
        snapshots: Vec<Snapshot>,
        budget: MassBudget,
        oil_name: String,
    ) -> Self {
        Self {
            times,
            snapshots,
            budget,
            oil_name,
        }
    }

    /// Name of the simulated substance.
    pub fn oil_name(&self) -> &str {
        &self.oil_name
    }

    /// Number of output steps.
    pub fn n_outputs(&self) -> usize {
        self.times.len()
    }

    /// Hours elapsed since the first output timestamp, per output step.
    pub fn elapsed_hours(&self) -> Vec<f64> {
        let Some(first) = self.times.first().copied() else {
            return Vec::new();
        };
        self.times
            .iter()
            .map(|t| (*t - first).num_seconds() as f64 / 3600.0)
            .collect()
    }

    /// Bounding box of every element position over the whole run.
    pub fn bounding_box(&self) -> Option<GeoBoundingBox> {
        GeoBoundingBox::from_points(
            self.snapshots
                .iter()
                .flat_map(|s| s.lon.iter().copied().zip(s.lat.iter().copied())),
        )
    }
}
