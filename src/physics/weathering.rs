//! Oil weathering: evaporation, biodegradation, emulsification.
//!
//! Mass moves between compartments, never in or out of the ensemble: oil lost
//! to evaporation and biodegradation is credited to the per-element weathered
//! masses, so the compartment total is conserved to round-off. Stranded oil
//! keeps weathering at surface rates.

use chrono::{DateTime, Utc};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::DriftConfig;
use crate::ensemble::{ElementStatus, Ensemble};
use crate::env::{EnvError, Environment, Variable};

use super::EMULSIFICATION_RATE;

/// Per-element weathering increments for one step.
#[derive(Debug, Clone, Copy)]
struct WeatherDelta {
    /// Oil mass moved to the evaporated compartment (kg)
    evaporated: f64,
    /// Oil mass moved to the biodegraded compartment (kg)
    biodegraded: f64,
    /// Updated emulsion water fraction
    water_fraction: f64,
}

/// Apply one step of weathering to every element.
pub fn weather_elements(
    ensemble: &mut Ensemble,
    env: &Environment,
    config: &DriftConfig,
    time: DateTime<Utc>,
    dt: f64,
) -> Result<(), EnvError> {
    let n = ensemble.len();

    let state: &Ensemble = ensemble;
    let compute = |i: usize| -> Result<WeatherDelta, EnvError> {
        compute_delta(state, env, config, time, dt, i)
    };

    #[cfg(feature = "parallel")]
    let deltas: Vec<WeatherDelta> = (0..n)
        .into_par_iter()
        .map(compute)
        .collect::<Result<_, _>>()?;

    #[cfg(not(feature = "parallel"))]
    let deltas: Vec<WeatherDelta> = (0..n).map(compute).collect::<Result<_, _>>()?;

    for (i, delta) in deltas.into_iter().enumerate() {
        ensemble.mass_oil[i] -= delta.evaporated + delta.biodegraded;
        ensemble.mass_evaporated[i] += delta.evaporated;
        ensemble.mass_biodegraded[i] += delta.biodegraded;

        // Water content follows the updated emulsion fraction.
        let wf = delta.water_fraction.min(0.99);
        ensemble.mass_water[i] = if wf > 0.0 {
            ensemble.mass_oil[i] * wf / (1.0 - wf)
        } else {
            0.0
        };
    }
    Ok(())
}

/// Compute the weathering increments for element `i` without mutating state.
fn compute_delta(
    ensemble: &Ensemble,
    env: &Environment,
    config: &DriftConfig,
    time: DateTime<Utc>,
    dt: f64,
    i: usize,
) -> Result<WeatherDelta, EnvError> {
    let oil = ensemble.oil();
    let status = ensemble.status[i];
    let mass_oil = ensemble.mass_oil[i];
    let (lon, lat) = (ensemble.lon[i], ensemble.lat[i]);

    let mut evaporated = 0.0;
    if config.processes.evaporation && status != ElementStatus::Submerged {
        let pool =
            (oil.volatile_fraction * ensemble.initial_mass(i) - ensemble.mass_evaporated[i]).max(0.0);
        if pool > 0.0 {
            let temperature = env.sample(Variable::SeaWaterTemperature, time, lon, lat)?;
            // Rough doubling of volatility per 17 degC above the reference.
            let rate = oil.evaporation_rate * (0.04 * (temperature - 15.0)).exp();
            evaporated = (pool * (1.0 - (-rate * dt).exp())).min(mass_oil);
        }
    }

    let mut biodegraded = 0.0;
    if config.processes.biodegradation {
        let rate = match status {
            ElementStatus::Submerged => oil.biodegradation_rate_submerged,
            _ => oil.biodegradation_rate_surface,
        };
        biodegraded = mass_oil * (1.0 - (-rate * dt).exp());
    }

    // Never remove more than the element holds.
    let removed = evaporated + biodegraded;
    if removed > mass_oil && removed > 0.0 {
        let scale = mass_oil / removed;
        evaporated *= scale;
        biodegraded *= scale;
    }

    let mut water_fraction = ensemble.water_fraction(i);
    if config.processes.emulsification && status == ElementStatus::Surface {
        let hs = env.sample(Variable::SeaSurfaceWaveSignificantHeight, time, lon, lat)?;
        let uptake = EMULSIFICATION_RATE * (1.0 + hs.max(0.0));
        water_fraction += uptake * (oil.max_water_fraction - water_fraction).max(0.0) * dt;
        water_fraction = water_fraction.clamp(0.0, oil.max_water_fraction);
    }

    Ok(WeatherDelta {
        evaporated,
        biodegraded,
        water_fraction,
    })
}
