//! Environmental data access for drift simulations.
//!
//! This module provides:
//! - **Canonical variables**: the CF-named vocabulary the kernel samples
//! - **Providers**: constant values, analytic flows, gridded datasets
//! - **Landmask**: coastline polygons for stranding tests
//! - **Environment**: the prioritized provider registry with fallback constants
//!
//! Providers are registered with an explicit capability declaration: the exact
//! set of canonical variables they may answer for. The first registered
//! provider offering a variable and covering the query wins; a configuration
//! fallback constant is used when no provider answers; a missing variable with
//! no fallback is a hard error surfaced before the run starts.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

mod landmask;
mod provider;
mod variables;

#[cfg(feature = "netcdf")]
mod dataset;
#[cfg(feature = "netcdf")]
mod remote;

pub use landmask::{Landmask, LandmaskError};
pub use provider::{ConstantProvider, FieldProvider, UniformFlowProvider};
pub use variables::{UnknownVariable, Variable};

#[cfg(feature = "netcdf")]
pub use dataset::{DatasetError, GriddedDataset, VariableMapping};
#[cfg(feature = "netcdf")]
pub use remote::{Credentials, RemoteError, RemoteSource, PASSWORD_ENV, USERNAME_ENV};

/// Error type for provider registration and field resolution.
#[derive(Debug, Error)]
pub enum EnvError {
    /// A provider was registered without declaring any variables
    #[error("provider '{0}' registered with an empty variable set")]
    EmptyRegistration(String),

    /// A registration claimed a variable the provider does not offer
    #[error("provider '{provider}' does not offer variable '{variable}'")]
    NotOffered {
        /// Provider name
        provider: String,
        /// Claimed variable
        variable: Variable,
    },

    /// No provider or fallback constant covers a variable
    #[error("no provider or fallback constant covers variable '{0}'")]
    MissingVariable(Variable),
}

/// One registered provider with its capability declaration.
struct Registration {
    provider: Arc<dyn FieldProvider>,
    variables: Vec<Variable>,
}

/// Prioritized registry of environmental field providers.
///
/// Resolution order is registration order; fallback constants come last.
#[derive(Default)]
pub struct Environment {
    registrations: Vec<Registration>,
    fallbacks: BTreeMap<Variable, f64>,
}

impl Environment {
    /// Create an empty environment with no fallbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the fallback constant table.
    pub fn set_fallbacks(&mut self, fallbacks: BTreeMap<Variable, f64>) {
        self.fallbacks = fallbacks;
    }

    /// Set a single fallback constant.
    pub fn set_fallback(&mut self, variable: Variable, value: f64) {
        self.fallbacks.insert(variable, value);
    }

    /// Fallback constant for a variable, if configured.
    pub fn fallback(&self, variable: Variable) -> Option<f64> {
        self.fallbacks.get(&variable).copied()
    }

    /// Register a provider restricted to an explicit variable set.
    ///
    /// Registration fails if the set is empty or names a variable the
    /// provider does not offer, so overlapping providers can coexist without
    /// ambiguity about who answers what.
    pub fn register(
        &mut self,
        provider: Arc<dyn FieldProvider>,
        variables: &[Variable],
    ) -> Result<(), EnvError> {
        if variables.is_empty() {
            return Err(EnvError::EmptyRegistration(provider.name().to_string()));
        }
        let offered = provider.offered_variables();
        for v in variables {
            if !offered.contains(v) {
                return Err(EnvError::NotOffered {
                    provider: provider.name().to_string(),
                    variable: *v,
                });
            }
        }
        debug!(
            provider = provider.name(),
            variables = ?variables,
            "registered field provider"
        );
        self.registrations.push(Registration {
            provider,
            variables: variables.to_vec(),
        });
        Ok(())
    }

    /// Register a provider for everything it offers.
    pub fn register_all(&mut self, provider: Arc<dyn FieldProvider>) -> Result<(), EnvError> {
        let offered = provider.offered_variables();
        self.register(provider, &offered)
    }

    /// Number of registered providers.
    pub fn provider_count(&self) -> usize {
        self.registrations.len()
    }

    /// Whether some provider is registered for a variable.
    pub fn has_provider_for(&self, variable: Variable) -> bool {
        self.registrations
            .iter()
            .any(|r| r.variables.contains(&variable))
    }

    /// Whether a variable is resolvable at all (provider or fallback).
    pub fn covers(&self, variable: Variable) -> bool {
        self.has_provider_for(variable) || self.fallbacks.contains_key(&variable)
    }

    /// Sample a variable at a point in time and space.
    ///
    /// The first registered provider declaring the variable and returning a
    /// finite value wins. With no answer and no fallback constant this is a
    /// [`EnvError::MissingVariable`] error.
    pub fn sample(
        &self,
        variable: Variable,
        time: DateTime<Utc>,
        lon: f64,
        lat: f64,
    ) -> Result<f64, EnvError> {
        for registration in &self.registrations {
            if !registration.variables.contains(&variable) {
                continue;
            }
            if let Some(bbox) = registration.provider.coverage() {
                if !bbox.contains(lon, lat) {
                    continue;
                }
            }
            if let Some(value) = registration.provider.sample(variable, time, lon, lat) {
                if value.is_finite() {
                    return Ok(value);
                }
            }
        }
        self.fallbacks
            .get(&variable)
            .copied()
            .ok_or(EnvError::MissingVariable(variable))
    }

    /// Check that every required variable is resolvable before a run starts.
    ///
    /// Returns the first uncovered variable as an error; a run must fail here,
    /// not halfway through the time loop.
    pub fn validate(&self, required: &[Variable]) -> Result<(), EnvError> {
        for v in required {
            if !self.covers(*v) {
                return Err(EnvError::MissingVariable(*v));
            }
        }
        Ok(())
    }

    /// Names of registered providers, in priority order.
    pub fn provider_names(&self) -> Vec<String> {
        self.registrations
            .iter()
            .map(|r| r.provider.name().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_registration_rejected() {
        let mut env = Environment::new();
        let provider = Arc::new(ConstantProvider::new("empty"));
        let err = env.register(provider, &[]).unwrap_err();
        assert!(matches!(err, EnvError::EmptyRegistration(_)));
    }

    #[test]
    fn test_registration_must_match_offered() {
        let mut env = Environment::new();
        let provider =
            Arc::new(ConstantProvider::new("temp").with(Variable::SeaWaterTemperature, 26.0));
        let err = env.register(provider, &[Variable::XWind]).unwrap_err();
        assert!(matches!(
            err,
            EnvError::NotOffered {
                variable: Variable::XWind,
                ..
            }
        ));
    }

    #[test]
    fn test_first_provider_wins() {
        let mut env = Environment::new();
        let first = Arc::new(ConstantProvider::new("first").with(Variable::XWind, 1.0));
        let second = Arc::new(ConstantProvider::new("second").with(Variable::XWind, 2.0));
        env.register(first, &[Variable::XWind]).unwrap();
        env.register(second, &[Variable::XWind]).unwrap();

        let value = env.sample(Variable::XWind, t0(), 0.0, 0.0).unwrap();
        assert_eq!(value, 1.0);
    }

    #[test]
    fn test_restricted_registration_hides_other_variables() {
        let mut env = Environment::new();
        let provider = Arc::new(
            ConstantProvider::new("both")
                .with(Variable::XWind, 1.0)
                .with(Variable::YWind, 2.0),
        );
        // Registered only for XWind: YWind must not resolve through it.
        env.register(provider, &[Variable::XWind]).unwrap();

        assert!(env.sample(Variable::XWind, t0(), 0.0, 0.0).is_ok());
        let err = env.sample(Variable::YWind, t0(), 0.0, 0.0).unwrap_err();
        assert!(matches!(err, EnvError::MissingVariable(Variable::YWind)));
    }

    #[test]
    fn test_fallback_used_when_no_provider() {
        let mut env = Environment::new();
        env.set_fallback(Variable::SeaSurfaceWaveSignificantHeight, 1.0);
        let value = env
            .sample(Variable::SeaSurfaceWaveSignificantHeight, t0(), 0.0, 0.0)
            .unwrap();
        assert_eq!(value, 1.0);
    }

    #[test]
    fn test_validate_reports_missing_variable() {
        let env = Environment::new();
        let err = env.validate(&Variable::MANDATORY).unwrap_err();
        assert!(matches!(err, EnvError::MissingVariable(_)));
    }

    #[test]
    fn test_validate_accepts_fallback_coverage() {
        let mut env = Environment::new();
        for v in Variable::MANDATORY {
            env.set_fallback(v, 0.0);
        }
        assert!(env.validate(&Variable::MANDATORY).is_ok());
    }
}
