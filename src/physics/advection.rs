//! Horizontal advection.
//!
//! Surface elements move with the current plus a wind-drift contribution and
//! the Stokes drift; submerged elements move with the current alone. The
//! configured current/wind uncertainty magnitudes add independent Gaussian
//! perturbations per element and step, giving the ensemble its spread.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand_chacha::ChaChaRng;
use rand_distr::StandardNormal;

use crate::config::DriftConfig;
use crate::ensemble::{ElementStatus, Ensemble};
use crate::env::{EnvError, Environment, Variable};
use crate::projection::displace;

/// Advance horizontal positions by one time step of `dt` seconds.
///
/// Stranded elements do not move. Samples are taken at each element's own
/// position, so elements in different grid cells feel different forcing.
pub fn advect_elements(
    ensemble: &mut Ensemble,
    env: &Environment,
    config: &DriftConfig,
    time: DateTime<Utc>,
    dt: f64,
    rng: &mut ChaChaRng,
) -> Result<(), EnvError> {
    for i in 0..ensemble.len() {
        if ensemble.status[i] == ElementStatus::Stranded {
            continue;
        }
        let (lon, lat) = (ensemble.lon[i], ensemble.lat[i]);

        let mut u = env.sample(Variable::XSeaWaterVelocity, time, lon, lat)?;
        let mut v = env.sample(Variable::YSeaWaterVelocity, time, lon, lat)?;

        if ensemble.status[i] == ElementStatus::Surface {
            let wdf = ensemble.wind_drift_factor[i];
            if wdf != 0.0 {
                let wind_u = env.sample(Variable::XWind, time, lon, lat)?;
                let wind_v = env.sample(Variable::YWind, time, lon, lat)?;
                u += wdf * wind_u;
                v += wdf * wind_v;

                if config.wind_uncertainty > 0.0 {
                    let nu: f64 = rng.sample(StandardNormal);
                    let nv: f64 = rng.sample(StandardNormal);
                    u += wdf * config.wind_uncertainty * nu;
                    v += wdf * config.wind_uncertainty * nv;
                }
            }

            u += env.sample(Variable::SeaSurfaceWaveStokesDriftXVelocity, time, lon, lat)?;
            v += env.sample(Variable::SeaSurfaceWaveStokesDriftYVelocity, time, lon, lat)?;
        }

        if config.current_uncertainty > 0.0 {
            let nu: f64 = rng.sample(StandardNormal);
            let nv: f64 = rng.sample(StandardNormal);
            u += config.current_uncertainty * nu;
            v += config.current_uncertainty * nv;
        }

        let (new_lon, new_lat) = displace(lon, lat, u * dt, v * dt);
        ensemble.lon[i] = new_lon;
        ensemble.lat[i] = new_lat;
    }
    Ok(())
}
