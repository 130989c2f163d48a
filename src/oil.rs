//! Oil substance properties.
//!
//! A small registry of generic oil types with the bulk properties the
//! weathering parameterizations need. Rates are first-order coefficients; the
//! registry is keyed by the display name used when seeding.

use thiserror::Error;

/// Error type for substance lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OilError {
    /// Substance name not in the registry
    #[error("unknown oil type: '{0}'")]
    UnknownOil(String),
}

/// Bulk properties of an oil substance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OilType {
    /// Display name, also the registry key
    pub name: &'static str,
    /// Fresh-oil density (kg/m3)
    pub density: f64,
    /// Dynamic viscosity at 20 degC (Pa s)
    pub viscosity: f64,
    /// Mass fraction that can evaporate
    pub volatile_fraction: f64,
    /// First-order evaporation rate at 15 degC (1/s)
    pub evaporation_rate: f64,
    /// First-order biodegradation rate at the surface (1/s)
    pub biodegradation_rate_surface: f64,
    /// First-order biodegradation rate when submerged (1/s)
    pub biodegradation_rate_submerged: f64,
    /// Maximum water fraction of the emulsion
    pub max_water_fraction: f64,
}

impl OilType {
    /// Look up a substance by name.
    pub fn by_name(name: &str) -> Result<&'static OilType, OilError> {
        OIL_TYPES
            .iter()
            .find(|o| o.name == name)
            .ok_or_else(|| OilError::UnknownOil(name.to_string()))
    }

    /// Names of all registered substances.
    pub fn names() -> Vec<&'static str> {
        OIL_TYPES.iter().map(|o| o.name).collect()
    }
}

/// Registered substances.
///
/// Rates correspond to half-lives of roughly half a day (volatiles at 15 degC)
/// and one to several weeks (biodegradation); heavier products evaporate less
/// and degrade slower.
pub const OIL_TYPES: &[OilType] = &[
    OilType {
        name: "GENERIC LIGHT CRUDE",
        density: 850.0,
        viscosity: 0.005,
        volatile_fraction: 0.45,
        evaporation_rate: 2.0e-5,
        biodegradation_rate_surface: 1.2e-7,
        biodegradation_rate_submerged: 4.0e-7,
        max_water_fraction: 0.6,
    },
    OilType {
        name: "GENERIC MEDIUM CRUDE",
        density: 900.0,
        viscosity: 0.05,
        volatile_fraction: 0.30,
        evaporation_rate: 1.5e-5,
        biodegradation_rate_surface: 1.0e-7,
        biodegradation_rate_submerged: 3.0e-7,
        max_water_fraction: 0.7,
    },
    OilType {
        name: "GENERIC HEAVY CRUDE",
        density: 960.0,
        viscosity: 1.3,
        volatile_fraction: 0.15,
        evaporation_rate: 8.0e-6,
        biodegradation_rate_surface: 6.0e-8,
        biodegradation_rate_submerged: 1.5e-7,
        max_water_fraction: 0.8,
    },
    OilType {
        name: "GENERIC BUNKER C",
        density: 985.0,
        viscosity: 45.0,
        volatile_fraction: 0.05,
        evaporation_rate: 3.0e-6,
        biodegradation_rate_surface: 2.0e-8,
        biodegradation_rate_submerged: 5.0e-8,
        max_water_fraction: 0.5,
    },
];
