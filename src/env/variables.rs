//! Canonical physical-variable vocabulary.
//!
//! Providers answer for variables by their CF standard names. Dataset adapters
//! translate native variable names (`uo`, `VHM0`, ...) into this vocabulary, so
//! two datasets covering the same physics can be swapped without touching the
//! drift kernel.

use std::fmt;
use std::str::FromStr;

/// Canonical environmental variables sampled during a drift run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Variable {
    /// Eastward ocean current component (m/s)
    XSeaWaterVelocity,
    /// Northward ocean current component (m/s)
    YSeaWaterVelocity,
    /// Vertical ocean velocity, positive up (m/s)
    UpwardSeaWaterVelocity,
    /// Eastward 10 m wind component (m/s)
    XWind,
    /// Northward 10 m wind component (m/s)
    YWind,
    /// Sea surface height above geoid (m)
    SeaSurfaceHeight,
    /// Sea water temperature (degC)
    SeaWaterTemperature,
    /// Sea water salinity (PSU)
    SeaWaterSalinity,
    /// Significant wave height (m)
    SeaSurfaceWaveSignificantHeight,
    /// Eastward Stokes drift component (m/s)
    SeaSurfaceWaveStokesDriftXVelocity,
    /// Northward Stokes drift component (m/s)
    SeaSurfaceWaveStokesDriftYVelocity,
    /// Wave period at the spectral peak (s)
    SeaSurfaceWavePeriodAtVarianceSpectralDensityMaximum,
    /// Mean wave period from the second spectral moment (s)
    SeaSurfaceWaveMeanPeriodFromVarianceSpectralDensitySecondFrequencyMoment,
    /// Ocean mixed layer thickness (m)
    OceanMixedLayerThickness,
    /// Sea floor depth below sea level (m)
    SeaFloorDepthBelowSeaLevel,
    /// Land mask: 1 on land, 0 in water
    LandBinaryMask,
}

impl Variable {
    /// All canonical variables, in a stable order.
    pub const ALL: [Variable; 16] = [
        Variable::XSeaWaterVelocity,
        Variable::YSeaWaterVelocity,
        Variable::UpwardSeaWaterVelocity,
        Variable::XWind,
        Variable::YWind,
        Variable::SeaSurfaceHeight,
        Variable::SeaWaterTemperature,
        Variable::SeaWaterSalinity,
        Variable::SeaSurfaceWaveSignificantHeight,
        Variable::SeaSurfaceWaveStokesDriftXVelocity,
        Variable::SeaSurfaceWaveStokesDriftYVelocity,
        Variable::SeaSurfaceWavePeriodAtVarianceSpectralDensityMaximum,
        Variable::SeaSurfaceWaveMeanPeriodFromVarianceSpectralDensitySecondFrequencyMoment,
        Variable::OceanMixedLayerThickness,
        Variable::SeaFloorDepthBelowSeaLevel,
        Variable::LandBinaryMask,
    ];

    /// Variables a run cannot start without (unless a fallback constant covers
    /// them): horizontal currents and 10 m wind.
    pub const MANDATORY: [Variable; 4] = [
        Variable::XSeaWaterVelocity,
        Variable::YSeaWaterVelocity,
        Variable::XWind,
        Variable::YWind,
    ];

    /// CF standard name for this variable.
    pub fn as_str(&self) -> &'static str {
        match self {
            Variable::XSeaWaterVelocity => "x_sea_water_velocity",
            Variable::YSeaWaterVelocity => "y_sea_water_velocity",
            Variable::UpwardSeaWaterVelocity => "upward_sea_water_velocity",
            Variable::XWind => "x_wind",
            Variable::YWind => "y_wind",
            Variable::SeaSurfaceHeight => "sea_surface_height",
            Variable::SeaWaterTemperature => "sea_water_temperature",
            Variable::SeaWaterSalinity => "sea_water_salinity",
            Variable::SeaSurfaceWaveSignificantHeight => "sea_surface_wave_significant_height",
            Variable::SeaSurfaceWaveStokesDriftXVelocity => {
                "sea_surface_wave_stokes_drift_x_velocity"
            }
            Variable::SeaSurfaceWaveStokesDriftYVelocity => {
                "sea_surface_wave_stokes_drift_y_velocity"
            }
            Variable::SeaSurfaceWavePeriodAtVarianceSpectralDensityMaximum => {
                "sea_surface_wave_period_at_variance_spectral_density_maximum"
            }
            Variable::SeaSurfaceWaveMeanPeriodFromVarianceSpectralDensitySecondFrequencyMoment => {
                "sea_surface_wave_mean_period_from_variance_spectral_density_second_frequency_moment"
            }
            Variable::OceanMixedLayerThickness => "ocean_mixed_layer_thickness",
            Variable::SeaFloorDepthBelowSeaLevel => "sea_floor_depth_below_sea_level",
            Variable::LandBinaryMask => "land_binary_mask",
        }
    }

    /// Whether this is a secondary wave-detail variable.
    ///
    /// Wave details degrade to fallback constants when their provider is
    /// unavailable; they never block a run.
    pub fn is_wave_detail(&self) -> bool {
        matches!(
            self,
            Variable::SeaSurfaceWaveSignificantHeight
                | Variable::SeaSurfaceWaveStokesDriftXVelocity
                | Variable::SeaSurfaceWaveStokesDriftYVelocity
                | Variable::SeaSurfaceWavePeriodAtVarianceSpectralDensityMaximum
                | Variable::SeaSurfaceWaveMeanPeriodFromVarianceSpectralDensitySecondFrequencyMoment
        )
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown variable name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown canonical variable name: {0}")]
pub struct UnknownVariable(pub String);

impl FromStr for Variable {
    type Err = UnknownVariable;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variable::ALL
            .iter()
            .find(|v| v.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownVariable(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_all_names() {
        for v in Variable::ALL {
            assert_eq!(v.as_str().parse::<Variable>().unwrap(), v);
        }
    }

    #[test]
    fn test_unknown_name_rejected() {
        let err = "sea_surface_vibes".parse::<Variable>().unwrap_err();
        assert!(err.to_string().contains("sea_surface_vibes"));
    }

    #[test]
    fn test_mandatory_are_not_wave_details() {
        for v in Variable::MANDATORY {
            assert!(!v.is_wave_detail());
        }
        assert!(Variable::SeaSurfaceWaveSignificantHeight.is_wave_detail());
    }
}
