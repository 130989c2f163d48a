//! Environmental field providers.
//!
//! A provider is a named source of time/space-varying physical fields. The
//! simplest implementation returns fixed values; gridded dataset adapters live
//! in [`crate::env::dataset`] behind the `netcdf` feature.

use chrono::{DateTime, Utc};

use crate::env::Variable;
use crate::projection::GeoBoundingBox;

/// A source of environmental field data.
///
/// Implementations return `None` from [`sample`](FieldProvider::sample) when
/// the query falls outside their coverage; the resolver then tries the next
/// registered provider and finally the fallback constants.
pub trait FieldProvider: Send + Sync {
    /// Human-readable provider name, used in diagnostics.
    fn name(&self) -> &str;

    /// Variables this provider is able to answer for.
    fn offered_variables(&self) -> Vec<Variable>;

    /// Geographic coverage, `None` meaning global.
    fn coverage(&self) -> Option<GeoBoundingBox> {
        None
    }

    /// Temporal coverage as (first, last), `None` meaning unbounded.
    fn time_coverage(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        None
    }

    /// Sample one variable at a point in time and space.
    fn sample(&self, variable: Variable, time: DateTime<Utc>, lon: f64, lat: f64) -> Option<f64>;
}

/// Provider returning fixed values for a set of variables.
///
/// The analog of driving a simulation with constant forcing; also handy in
/// tests and as the carrier for scenario constants such as water temperature
/// and salinity.
#[derive(Debug, Clone, Default)]
pub struct ConstantProvider {
    name: String,
    values: Vec<(Variable, f64)>,
}

impl ConstantProvider {
    /// Create an empty constant provider.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    /// Set the value returned for a variable.
    pub fn with(mut self, variable: Variable, value: f64) -> Self {
        self.set(variable, value);
        self
    }

    /// Set the value returned for a variable.
    pub fn set(&mut self, variable: Variable, value: f64) {
        if let Some(entry) = self.values.iter_mut().find(|(v, _)| *v == variable) {
            entry.1 = value;
        } else {
            self.values.push((variable, value));
        }
    }

    /// Value currently configured for a variable.
    pub fn get(&self, variable: Variable) -> Option<f64> {
        self.values
            .iter()
            .find(|(v, _)| *v == variable)
            .map(|(_, x)| *x)
    }
}

impl FieldProvider for ConstantProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn offered_variables(&self) -> Vec<Variable> {
        self.values.iter().map(|(v, _)| *v).collect()
    }

    fn sample(&self, variable: Variable, _time: DateTime<Utc>, _lon: f64, _lat: f64) -> Option<f64> {
        self.get(variable)
    }
}

/// Provider answering for currents and wind with a steady uniform flow.
///
/// Intended for integration tests and demos without network access: the flow
/// field is analytic, so expected trajectories can be written down exactly.
#[derive(Debug, Clone)]
pub struct UniformFlowProvider {
    name: String,
    /// Eastward current (m/s)
    pub u: f64,
    /// Northward current (m/s)
    pub v: f64,
    /// Eastward wind (m/s)
    pub wind_u: f64,
    /// Northward wind (m/s)
    pub wind_v: f64,
}

impl UniformFlowProvider {
    /// Steady uniform current and wind.
    pub fn new(u: f64, v: f64, wind_u: f64, wind_v: f64) -> Self {
        Self {
            name: "uniform_flow".to_string(),
            u,
            v,
            wind_u,
            wind_v,
        }
    }
}

impl FieldProvider for UniformFlowProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn offered_variables(&self) -> Vec<Variable> {
        vec![
            Variable::XSeaWaterVelocity,
            Variable::YSeaWaterVelocity,
            Variable::XWind,
            Variable::YWind,
        ]
    }

    fn sample(&self, variable: Variable, _time: DateTime<Utc>, _lon: f64, _lat: f64) -> Option<f64> {
        match variable {
            Variable::XSeaWaterVelocity => Some(self.u),
            Variable::YSeaWaterVelocity => Some(self.v),
            Variable::XWind => Some(self.wind_u),
            Variable::YWind => Some(self.wind_v),
            _ => None,
        }
    }
}
