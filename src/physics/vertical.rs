//! Vertical processes: wave entrainment, mixed-layer mixing, resurfacing.
//!
//! Surface elements can be entrained into the water column by breaking waves
//! (the dispersion process). Submerged elements random-walk inside the mixed
//! layer on the configured sub-timestep and rise back with their buoyancy;
//! an element reaching the surface threshold rejoins the slick.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand_chacha::ChaChaRng;
use rand_distr::StandardNormal;

use crate::config::DriftConfig;
use crate::ensemble::{ElementStatus, Ensemble, SEAWATER_DENSITY};
use crate::env::{EnvError, Environment, Variable};

use super::{ENTRAINMENT_RATE, RISE_SPEED_SCALE, SURFACE_THRESHOLD, VERTICAL_DIFFUSIVITY};

/// Apply entrainment, vertical mixing and resurfacing for one step.
pub fn vertical_processes(
    ensemble: &mut Ensemble,
    env: &Environment,
    config: &DriftConfig,
    time: DateTime<Utc>,
    dt: f64,
    rng: &mut ChaChaRng,
) -> Result<(), EnvError> {
    for i in 0..ensemble.len() {
        match ensemble.status[i] {
            ElementStatus::Stranded => continue,
            ElementStatus::Surface => {
                if config.processes.dispersion {
                    entrain(ensemble, env, time, dt, i, rng)?;
                }
            }
            ElementStatus::Submerged => {
                mix_and_rise(ensemble, env, config, time, dt, i, rng)?;
            }
        }
    }
    Ok(())
}

/// Wave entrainment of a surface element.
fn entrain(
    ensemble: &mut Ensemble,
    env: &Environment,
    time: DateTime<Utc>,
    dt: f64,
    i: usize,
    rng: &mut ChaChaRng,
) -> Result<(), EnvError> {
    let hs = env.sample(
        Variable::SeaSurfaceWaveSignificantHeight,
        time,
        ensemble.lon[i],
        ensemble.lat[i],
    )?;
    if hs <= 0.0 {
        return Ok(());
    }

    let probability = 1.0 - (-ENTRAINMENT_RATE * hs * dt).exp();
    if rng.gen::<f64>() < probability {
        ensemble.status[i] = ElementStatus::Submerged;
        // Intrusion depth scales with the breaking wave height.
        ensemble.z[i] = -(0.5 + rng.gen::<f64>()) * 1.5 * hs;
    }
    Ok(())
}

/// Random-walk mixing and buoyant rise of a submerged element.
fn mix_and_rise(
    ensemble: &mut Ensemble,
    env: &Environment,
    config: &DriftConfig,
    time: DateTime<Utc>,
    dt: f64,
    i: usize,
    rng: &mut ChaChaRng,
) -> Result<(), EnvError> {
    let (lon, lat) = (ensemble.lon[i], ensemble.lat[i]);
    let mixed_layer = env
        .sample(Variable::OceanMixedLayerThickness, time, lon, lat)?
        .max(1.0);
    let w_ambient = env.sample(Variable::UpwardSeaWaterVelocity, time, lon, lat)?;

    // Buoyant rise speed from the density deficit of the emulsion.
    let buoyancy = (1.0 - ensemble.bulk_density(i) / SEAWATER_DENSITY).max(0.0);
    let w_rise = RISE_SPEED_SCALE * buoyancy;

    let mut z = ensemble.z[i];
    if config.vertical_mixing {
        let dt_sub = config.vertical_mixing_timestep.min(dt).max(0.1);
        let n_sub = (dt / dt_sub).ceil() as usize;
        let dt_sub = dt / n_sub as f64;
        let sigma = (2.0 * VERTICAL_DIFFUSIVITY * dt_sub).sqrt();

        for _ in 0..n_sub {
            let noise: f64 = rng.sample(StandardNormal);
            z += (w_ambient + w_rise) * dt_sub + sigma * noise;
            z = z.clamp(-mixed_layer, 0.0);
        }
    } else {
        z = (z + (w_ambient + w_rise) * dt).clamp(-mixed_layer, 0.0);
    }

    if z > -SURFACE_THRESHOLD {
        ensemble.status[i] = ElementStatus::Surface;
        ensemble.z[i] = 0.0;
    } else {
        ensemble.z[i] = z;
    }
    Ok(())
}
