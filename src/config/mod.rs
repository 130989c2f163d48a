//! Simulation configuration.
//!
//! [`DriftConfig`] is the typed, validated option set applied to a simulation
//! before the run: process toggles, fallback constants for variables no
//! provider covers, trajectory uncertainty magnitudes and the coastline
//! interaction policy.
//!
//! Two ways to build one:
//! - set the typed fields directly, or
//! - drive the dotted-key surface, e.g.
//!   `config.set("processes:evaporation", true)?`. Keys are validated against
//!   the recognized schema and rejected immediately when unknown, ill-typed or
//!   out of range; nothing is silently ignored.
//!
//! The configuration is built once at startup and handed to the simulation by
//! value; it is immutable for the rest of the run.

mod schema;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::env::Variable;

pub use schema::{KeySpec, ValueKind, COASTLINE_ACTIONS, FALLBACK_PREFIX, KNOWN_KEYS};

/// Error type for configuration assembly.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Key not in the recognized schema
    #[error("unrecognized configuration key: '{0}'")]
    UnknownKey(String),

    /// Value type does not match the key's schema
    #[error("configuration key '{key}' expects a {expected} value")]
    InvalidType {
        /// Offending key
        key: String,
        /// Expected value shape
        expected: &'static str,
    },

    /// Numeric value outside the allowed range
    #[error("configuration key '{key}' value {value} outside [{min}, {max}]")]
    OutOfRange {
        /// Offending key
        key: String,
        /// Rejected value
        value: f64,
        /// Inclusive lower bound
        min: f64,
        /// Inclusive upper bound
        max: f64,
    },

    /// String value not among the allowed choices
    #[error("configuration key '{key}' does not accept '{value}' (choices: {choices:?})")]
    InvalidChoice {
        /// Offending key
        key: String,
        /// Rejected value
        value: String,
        /// Allowed strings
        choices: &'static [&'static str],
    },
}

/// Dynamic value for the dotted-key configuration surface.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// Boolean toggle
    Bool(bool),
    /// Numeric value
    Number(f64),
    /// Enumerated string
    Str(String),
}

impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        ConfigValue::Bool(v)
    }
}

impl From<f64> for ConfigValue {
    fn from(v: f64) -> Self {
        ConfigValue::Number(v)
    }
}

impl From<i64> for ConfigValue {
    fn from(v: i64) -> Self {
        ConfigValue::Number(v as f64)
    }
}

impl From<&str> for ConfigValue {
    fn from(v: &str) -> Self {
        ConfigValue::Str(v.to_string())
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(b) => write!(f, "{b}"),
            ConfigValue::Number(n) => write!(f, "{n}"),
            ConfigValue::Str(s) => f.write_str(s),
        }
    }
}

/// Policy applied when a particle trajectory intersects the coastline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoastlineAction {
    /// Fix the element at the first land intersection
    #[default]
    Stranding,
    /// Restore the element to its pre-step position
    Previous,
}

impl CoastlineAction {
    /// String form used by the dotted-key surface.
    pub fn as_str(&self) -> &'static str {
        match self {
            CoastlineAction::Stranding => "stranding",
            CoastlineAction::Previous => "previous",
        }
    }
}

impl FromStr for CoastlineAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stranding" => Ok(CoastlineAction::Stranding),
            "previous" => Ok(CoastlineAction::Previous),
            _ => Err(()),
        }
    }
}

/// Per-process enable flags.
#[derive(Debug, Clone, Copy)]
pub struct ProcessFlags {
    /// Wave entrainment of surface oil into the water column
    pub dispersion: bool,
    /// Evaporation of the volatile fraction
    pub evaporation: bool,
    /// Water-in-oil emulsification
    pub emulsification: bool,
    /// Microbial degradation
    pub biodegradation: bool,
}

impl Default for ProcessFlags {
    fn default() -> Self {
        Self {
            dispersion: true,
            evaporation: true,
            emulsification: true,
            biodegradation: true,
        }
    }
}

/// Complete simulation configuration.
#[derive(Debug, Clone)]
pub struct DriftConfig {
    /// Weathering/transport process toggles
    pub processes: ProcessFlags,
    /// Vertical-mixing enable flag
    pub vertical_mixing: bool,
    /// Vertical-mixing internal sub-timestep (s)
    pub vertical_mixing_timestep: f64,
    /// Stochastic current perturbation magnitude (m/s)
    pub current_uncertainty: f64,
    /// Stochastic wind perturbation magnitude (m/s)
    pub wind_uncertainty: f64,
    /// Coastline interaction policy
    pub coastline_action: CoastlineAction,
    /// Sampling step for the land-intersection test (degrees)
    pub coastline_approximation_precision: f64,
    /// Default wind drift factor applied to seeded elements
    pub wind_drift_factor: f64,
    /// Seed for the trajectory-perturbation RNG
    pub rng_seed: u64,
    /// Fallback constants per canonical variable
    pub fallbacks: BTreeMap<Variable, f64>,
}

impl Default for DriftConfig {
    fn default() -> Self {
        let mut fallbacks = BTreeMap::new();
        fallbacks.insert(Variable::SeaWaterTemperature, 10.0);
        fallbacks.insert(Variable::SeaWaterSalinity, 34.0);
        fallbacks.insert(Variable::SeaSurfaceHeight, 0.0);
        fallbacks.insert(Variable::UpwardSeaWaterVelocity, 0.0);
        fallbacks.insert(Variable::OceanMixedLayerThickness, 50.0);
        fallbacks.insert(Variable::SeaSurfaceWaveSignificantHeight, 0.0);
        fallbacks.insert(Variable::SeaSurfaceWaveStokesDriftXVelocity, 0.0);
        fallbacks.insert(Variable::SeaSurfaceWaveStokesDriftYVelocity, 0.0);
        fallbacks.insert(
            Variable::SeaSurfaceWavePeriodAtVarianceSpectralDensityMaximum,
            8.0,
        );
        fallbacks.insert(
            Variable::SeaSurfaceWaveMeanPeriodFromVarianceSpectralDensitySecondFrequencyMoment,
            6.0,
        );

        Self {
            processes: ProcessFlags::default(),
            vertical_mixing: true,
            vertical_mixing_timestep: 60.0,
            current_uncertainty: 0.0,
            wind_uncertainty: 0.0,
            coastline_action: CoastlineAction::default(),
            coastline_approximation_precision: 0.001,
            wind_drift_factor: 0.02,
            rng_seed: 0,
            fallbacks,
        }
    }
}

impl DriftConfig {
    /// Create a configuration with the default option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one dotted-key option.
    ///
    /// Fails fast on unknown keys, ill-typed values, out-of-range numbers and
    /// unknown enumerated strings.
    pub fn set(&mut self, key: &str, value: impl Into<ConfigValue>) -> Result<(), ConfigError> {
        let value = value.into();

        // Dynamic fallback-constant keys first.
        if let Some(suffix) = key.strip_prefix(FALLBACK_PREFIX) {
            let variable: Variable = suffix
                .parse()
                .map_err(|_| ConfigError::UnknownKey(key.to_string()))?;
            let number = expect_number(key, &value, None)?;
            self.fallbacks.insert(variable, number);
            return Ok(());
        }

        let spec = schema::lookup(key).ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

        match spec.kind {
            ValueKind::Bool => {
                let flag = match value {
                    ConfigValue::Bool(b) => b,
                    _ => {
                        return Err(ConfigError::InvalidType {
                            key: key.to_string(),
                            expected: "boolean",
                        });
                    }
                };
                self.apply_bool(key, flag);
            }
            ValueKind::Number => {
                let number = expect_number(key, &value, spec.range)?;
                self.apply_number(key, number);
            }
            ValueKind::Choice(choices) => {
                let s = match value {
                    ConfigValue::Str(s) => s,
                    _ => {
                        return Err(ConfigError::InvalidType {
                            key: key.to_string(),
                            expected: "string",
                        });
                    }
                };
                if !choices.contains(&s.as_str()) {
                    return Err(ConfigError::InvalidChoice {
                        key: key.to_string(),
                        value: s,
                        choices,
                    });
                }
                self.apply_choice(key, &s);
            }
        }
        Ok(())
    }

    /// Current value of a dotted key, if recognized.
    pub fn get(&self, key: &str) -> Option<ConfigValue> {
        if let Some(suffix) = key.strip_prefix(FALLBACK_PREFIX) {
            let variable: Variable = suffix.parse().ok()?;
            return self
                .fallbacks
                .get(&variable)
                .map(|v| ConfigValue::Number(*v));
        }
        let value = match key {
            "processes:dispersion" => ConfigValue::Bool(self.processes.dispersion),
            "processes:evaporation" => ConfigValue::Bool(self.processes.evaporation),
            "processes:emulsification" => ConfigValue::Bool(self.processes.emulsification),
            "processes:biodegradation" => ConfigValue::Bool(self.processes.biodegradation),
            "drift:vertical_mixing" => ConfigValue::Bool(self.vertical_mixing),
            "vertical_mixing:timestep" => ConfigValue::Number(self.vertical_mixing_timestep),
            "drift:current_uncertainty" => ConfigValue::Number(self.current_uncertainty),
            "drift:wind_uncertainty" => ConfigValue::Number(self.wind_uncertainty),
            "general:coastline_action" => {
                ConfigValue::Str(self.coastline_action.as_str().to_string())
            }
            "general:coastline_approximation_precision" => {
                ConfigValue::Number(self.coastline_approximation_precision)
            }
            "seed:wind_drift_factor" => ConfigValue::Number(self.wind_drift_factor),
            "seed:rng_seed" => ConfigValue::Number(self.rng_seed as f64),
            _ => return None,
        };
        Some(value)
    }

    /// Fallback constant for a variable, if configured.
    pub fn fallback_for(&self, variable: Variable) -> Option<f64> {
        self.fallbacks.get(&variable).copied()
    }

    fn apply_bool(&mut self, key: &str, flag: bool) {
        match key {
            "processes:dispersion" => self.processes.dispersion = flag,
            "processes:evaporation" => self.processes.evaporation = flag,
            "processes:emulsification" => self.processes.emulsification = flag,
            "processes:biodegradation" => self.processes.biodegradation = flag,
            "drift:vertical_mixing" => self.vertical_mixing = flag,
            _ => unreachable!("schema and apply tables out of sync for '{key}'"),
        }
    }

    fn apply_number(&mut self, key: &str, number: f64) {
        match key {
            "vertical_mixing:timestep" => self.vertical_mixing_timestep = number,
            "drift:current_uncertainty" => self.current_uncertainty = number,
            "drift:wind_uncertainty" => self.wind_uncertainty = number,
            "general:coastline_approximation_precision" => {
                self.coastline_approximation_precision = number
            }
            "seed:wind_drift_factor" => self.wind_drift_factor = number,
            "seed:rng_seed" => self.rng_seed = number as u64,
            _ => unreachable!("schema and apply tables out of sync for '{key}'"),
        }
    }

    fn apply_choice(&mut self, key: &str, s: &str) {
        match key {
            "general:coastline_action" => {
                // Validated against COASTLINE_ACTIONS above.
                self.coastline_action = s.parse().unwrap_or_default();
            }
            _ => unreachable!("schema and apply tables out of sync for '{key}'"),
        }
    }
}

fn expect_number(
    key: &str,
    value: &ConfigValue,
    range: Option<(f64, f64)>,
) -> Result<f64, ConfigError> {
    let number = match value {
        ConfigValue::Number(n) => *n,
        _ => {
            return Err(ConfigError::InvalidType {
                key: key.to_string(),
                expected: "numeric",
            });
        }
    };
    if let Some((min, max)) = range {
        if !(number >= min && number <= max) {
            return Err(ConfigError::OutOfRange {
                key: key.to_string(),
                value: number,
                min,
                max,
            });
        }
    }
    Ok(number)
}
