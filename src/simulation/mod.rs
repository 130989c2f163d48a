//! Simulation orchestrator.
//!
//! [`OilDriftSimulation`] owns the configuration, the provider registry, the
//! landmask and the ensemble, and enforces the setup sequence:
//!
//! 1. construct with a [`DriftConfig`] (configuration is immutable afterwards)
//! 2. register providers — landmask first, then the physical fields
//! 3. [`seed_elements`](OilDriftSimulation::seed_elements)
//! 4. [`run`](OilDriftSimulation::run)
//!
//! Seeding before the mandatory forcing variables are resolvable is an error,
//! as is running unseeded. `run` consumes the simulation: the time loop
//! mutates internal state irreversibly, so a re-run needs a fresh instance.
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use std::sync::Arc;
//! use drift_rs::config::DriftConfig;
//! use drift_rs::env::UniformFlowProvider;
//! use drift_rs::ensemble::SeedSpec;
//! use drift_rs::simulation::{OilDriftSimulation, RunParams};
//!
//! let start = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();
//! let mut sim = OilDriftSimulation::new(DriftConfig::default());
//! sim.register_provider(
//!     Arc::new(UniformFlowProvider::new(0.3, 0.1, 5.0, 2.0)),
//!     &drift_rs::env::Variable::MANDATORY,
//! ).unwrap();
//! sim.seed_elements(SeedSpec::new(89.5441, 21.4633, start, "GENERIC MEDIUM CRUDE")).unwrap();
//!
//! let params = RunParams::new(start + Duration::hours(6));
//! let result = sim.run(params).unwrap();
//! assert_eq!(result.n_outputs(), 7);
//! ```

mod result;

pub use result::{MassBudget, RunResult, Snapshot};

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::DriftConfig;
use crate::ensemble::{Ensemble, SeedSpec};
use crate::env::{EnvError, Environment, FieldProvider, Landmask, Variable};
use crate::oil::{OilError, OilType};
use crate::physics;

/// Error type for orchestration and runs.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Provider registration or field resolution failure
    #[error(transparent)]
    Env(#[from] EnvError),

    /// Unknown substance at seed time
    #[error(transparent)]
    Oil(#[from] OilError),

    /// Run attempted without a seeded ensemble
    #[error("run attempted before seeding any elements")]
    NotSeeded,

    /// Second seed call on the same simulation
    #[error("ensemble is already seeded")]
    AlreadySeeded,

    /// Seeding attempted before mandatory forcing was registered
    #[error("cannot seed: no provider or fallback for mandatory variable '{0}'")]
    MissingForcing(Variable),

    /// Ill-formed run parameters
    #[error("invalid run parameters: {0}")]
    InvalidRunParams(String),
}

/// Parameters of one run.
#[derive(Debug, Clone, Copy)]
pub struct RunParams {
    /// Absolute end time of the run
    pub end_time: DateTime<Utc>,
    /// Integration time step (s)
    pub time_step: f64,
    /// Output sampling interval (s); must be a multiple of the time step
    pub time_step_output: f64,
}

impl RunParams {
    /// Parameters with the default steps: 1800 s integration, hourly output.
    pub fn new(end_time: DateTime<Utc>) -> Self {
        Self {
            end_time,
            time_step: 1800.0,
            time_step_output: 3600.0,
        }
    }

    /// Set the integration time step in seconds.
    pub fn with_time_step(mut self, seconds: f64) -> Self {
        self.time_step = seconds;
        self
    }

    /// Set the output interval in seconds.
    pub fn with_time_step_output(mut self, seconds: f64) -> Self {
        self.time_step_output = seconds;
        self
    }

    /// Check step sizes: positive, and the output interval an exact multiple
    /// of the integration step.
    fn validate(&self) -> Result<(), SimulationError> {
        if !(self.time_step > 0.0) {
            return Err(SimulationError::InvalidRunParams(format!(
                "time step must be positive, got {}",
                self.time_step
            )));
        }
        if self.time_step_output < self.time_step {
            return Err(SimulationError::InvalidRunParams(format!(
                "output interval {} shorter than time step {}",
                self.time_step_output, self.time_step
            )));
        }
        let ratio = self.time_step_output / self.time_step;
        if (ratio - ratio.round()).abs() > 1e-9 {
            return Err(SimulationError::InvalidRunParams(format!(
                "time step {} does not divide output interval {}",
                self.time_step, self.time_step_output
            )));
        }
        Ok(())
    }
}

/// The drift simulation: configuration, environment, ensemble, time loop.
pub struct OilDriftSimulation {
    config: DriftConfig,
    env: Environment,
    landmask: Option<Arc<Landmask>>,
    ensemble: Option<Ensemble>,
    rng: ChaChaRng,
}

impl OilDriftSimulation {
    /// Create a simulation from a finished configuration.
    ///
    /// The configuration's fallback constants become the environment's
    /// fallback table; the RNG is seeded from the configuration so identical
    /// setups give identical trajectories.
    pub fn new(config: DriftConfig) -> Self {
        let mut env = Environment::new();
        env.set_fallbacks(config.fallbacks.clone());
        let rng = ChaChaRng::seed_from_u64(config.rng_seed);
        Self {
            config,
            env,
            landmask: None,
            ensemble: None,
            rng,
        }
    }

    /// The applied configuration.
    pub fn config(&self) -> &DriftConfig {
        &self.config
    }

    /// The provider registry.
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Attach the landmask used for stranding and register it as the
    /// `land_binary_mask` provider.
    ///
    /// Registered first by convention so later physical-field providers never
    /// shadow it. Takes an `Arc` so the caller can keep a handle for plotting
    /// after the run.
    pub fn set_landmask(&mut self, landmask: Arc<Landmask>) -> Result<(), SimulationError> {
        self.env
            .register(landmask.clone(), &[Variable::LandBinaryMask])?;
        self.landmask = Some(landmask);
        Ok(())
    }

    /// Register an environmental field provider restricted to `variables`.
    pub fn register_provider(
        &mut self,
        provider: Arc<dyn FieldProvider>,
        variables: &[Variable],
    ) -> Result<(), SimulationError> {
        self.env.register(provider, variables)?;
        Ok(())
    }

    /// Seed the initial particle ensemble.
    ///
    /// All mandatory forcing variables must be resolvable (registered provider
    /// or fallback constant) before seeding; this enforces the
    /// register-before-seed ordering.
    pub fn seed_elements(&mut self, spec: SeedSpec) -> Result<(), SimulationError> {
        if self.ensemble.is_some() {
            return Err(SimulationError::AlreadySeeded);
        }
        for v in Variable::MANDATORY {
            if !self.env.covers(v) {
                return Err(SimulationError::MissingForcing(v));
            }
        }
        let oil = OilType::by_name(&spec.oil_type)?;
        let ensemble = Ensemble::seed(&spec, oil, self.config.wind_drift_factor, &mut self.rng);
        info!(
            elements = ensemble.len(),
            oil = oil.name,
            lon = spec.lon,
            lat = spec.lat,
            "seeded ensemble"
        );
        self.ensemble = Some(ensemble);
        Ok(())
    }

    /// Variables the time loop will sample, given the configuration.
    fn required_variables(&self) -> Vec<Variable> {
        let mut required = Variable::MANDATORY.to_vec();
        required.push(Variable::SeaSurfaceWaveStokesDriftXVelocity);
        required.push(Variable::SeaSurfaceWaveStokesDriftYVelocity);
        if self.config.processes.evaporation {
            required.push(Variable::SeaWaterTemperature);
        }
        if self.config.processes.dispersion || self.config.processes.emulsification {
            required.push(Variable::SeaSurfaceWaveSignificantHeight);
        }
        if self.config.processes.dispersion {
            required.push(Variable::OceanMixedLayerThickness);
            required.push(Variable::UpwardSeaWaterVelocity);
        }
        required
    }

    /// Execute the time-stepped run.
    ///
    /// Blocking; consumes the simulation. The element state mutates in place
    /// each step, so there is no way to resume or re-run this instance.
    pub fn run(mut self, params: RunParams) -> Result<RunResult, SimulationError> {
        params.validate()?;
        let mut ensemble = self.ensemble.take().ok_or(SimulationError::NotSeeded)?;

        // Every variable the loop will touch must resolve now, not mid-run.
        self.env.validate(&self.required_variables())?;

        let start_time = ensemble.release_time();
        if params.end_time <= start_time {
            return Err(SimulationError::InvalidRunParams(format!(
                "end time {} not after start time {}",
                params.end_time, start_time
            )));
        }

        let dt = params.time_step;
        let steps_per_output = (params.time_step_output / dt).round() as usize;
        let total_seconds = (params.end_time - start_time).num_seconds() as f64;
        let n_steps = (total_seconds / dt).ceil() as usize;

        info!(
            elements = ensemble.len(),
            n_steps,
            dt,
            output_every = steps_per_output,
            start = %start_time,
            end = %params.end_time,
            "starting drift run"
        );

        let mut times = Vec::with_capacity(n_steps / steps_per_output + 2);
        let mut snapshots = Vec::with_capacity(n_steps / steps_per_output + 2);
        let mut budget = MassBudget::default();

        let mut record =
            |time: DateTime<Utc>, ensemble: &Ensemble, budget: &mut MassBudget| {
                times.push(time);
                snapshots.push(Snapshot::capture(ensemble));
                budget.push_sample(ensemble);
            };

        let mut time = start_time;
        record(time, &ensemble, &mut budget);

        let mut previous: Vec<(f64, f64)> = Vec::with_capacity(ensemble.len());

        for step in 1..=n_steps {
            // Clamp the final step to the end time.
            let remaining = (params.end_time - time).num_seconds() as f64;
            let dt_step = dt.min(remaining).max(0.0);
            if dt_step == 0.0 {
                break;
            }

            previous.clear();
            previous.extend(ensemble.lon.iter().copied().zip(ensemble.lat.iter().copied()));

            physics::advect_elements(
                &mut ensemble,
                &self.env,
                &self.config,
                time,
                dt_step,
                &mut self.rng,
            )?;
            physics::vertical_processes(
                &mut ensemble,
                &self.env,
                &self.config,
                time,
                dt_step,
                &mut self.rng,
            )?;
            physics::weather_elements(&mut ensemble, &self.env, &self.config, time, dt_step)?;

            if let Some(landmask) = &self.landmask {
                physics::apply_coastline(
                    &mut ensemble,
                    landmask,
                    self.config.coastline_action,
                    self.config.coastline_approximation_precision,
                    &previous,
                );
            }

            time += Duration::milliseconds((dt_step * 1000.0).round() as i64);

            if step % steps_per_output == 0 || time >= params.end_time {
                record(time, &ensemble, &mut budget);
                if time >= params.end_time {
                    break;
                }
            }
        }

        if ensemble.active_count() == 0 {
            warn!("all elements stranded before the end of the run");
        }
        info!(
            outputs = times.len(),
            active = ensemble.active_count(),
            "drift run finished"
        );

        let oil_name = ensemble.oil().name.to_string();
        Ok(RunResult::new(times, snapshots, budget, oil_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::UniformFlowProvider;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap()
    }

    fn seeded_sim() -> OilDriftSimulation {
        let mut sim = OilDriftSimulation::new(DriftConfig::default());
        sim.register_provider(
            Arc::new(UniformFlowProvider::new(0.3, 0.1, 5.0, 2.0)),
            &Variable::MANDATORY,
        )
        .unwrap();
        sim.seed_elements(SeedSpec::new(89.5441, 21.4633, start(), "GENERIC MEDIUM CRUDE"))
            .unwrap();
        sim
    }

    #[test]
    fn test_seed_requires_forcing() {
        let mut sim = OilDriftSimulation::new(DriftConfig::default());
        let err = sim
            .seed_elements(SeedSpec::new(0.0, 0.0, start(), "GENERIC MEDIUM CRUDE"))
            .unwrap_err();
        assert!(matches!(err, SimulationError::MissingForcing(_)));
    }

    #[test]
    fn test_double_seed_rejected() {
        let mut sim = seeded_sim();
        let err = sim
            .seed_elements(SeedSpec::new(0.0, 0.0, start(), "GENERIC MEDIUM CRUDE"))
            .unwrap_err();
        assert!(matches!(err, SimulationError::AlreadySeeded));
    }

    #[test]
    fn test_unknown_oil_rejected_at_seed() {
        let mut sim = OilDriftSimulation::new(DriftConfig::default());
        sim.register_provider(
            Arc::new(UniformFlowProvider::new(0.0, 0.0, 0.0, 0.0)),
            &Variable::MANDATORY,
        )
        .unwrap();
        let err = sim
            .seed_elements(SeedSpec::new(0.0, 0.0, start(), "OLIVE OIL"))
            .unwrap_err();
        assert!(matches!(err, SimulationError::Oil(_)));
    }

    #[test]
    fn test_run_without_seed_fails() {
        let sim = OilDriftSimulation::new(DriftConfig::default());
        let err = sim
            .run(RunParams::new(start() + Duration::hours(1)))
            .unwrap_err();
        assert!(matches!(err, SimulationError::NotSeeded));
    }

    #[test]
    fn test_step_must_divide_output_interval() {
        let sim = seeded_sim();
        let params = RunParams::new(start() + Duration::hours(1))
            .with_time_step(700.0)
            .with_time_step_output(3600.0);
        let err = sim.run(params).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidRunParams(_)));
    }

    #[test]
    fn test_end_before_start_rejected() {
        let sim = seeded_sim();
        let err = sim
            .run(RunParams::new(start() - Duration::hours(1)))
            .unwrap_err();
        assert!(matches!(err, SimulationError::InvalidRunParams(_)));
    }

    #[test]
    fn test_run_produces_expected_outputs() {
        let sim = seeded_sim();
        let result = sim.run(RunParams::new(start() + Duration::hours(6))).unwrap();

        // Initial snapshot plus one per hour
        assert_eq!(result.n_outputs(), 7);
        assert_eq!(result.snapshots.len(), 7);
        assert_eq!(result.budget.len(), 7);
        assert_eq!(result.oil_name(), "GENERIC MEDIUM CRUDE");

        // The current pushes everything northeast
        let last = result.snapshots.last().unwrap();
        assert!(last.lon.iter().all(|&lon| lon > 89.5441 - 1e-6));
    }

    #[test]
    fn test_budget_conserves_mass() {
        let sim = seeded_sim();
        let result = sim.run(RunParams::new(start() + Duration::hours(12))).unwrap();

        let total0 = result.budget.total_at(0);
        for i in 0..result.budget.len() {
            assert!((result.budget.total_at(i) - total0).abs() / total0 < 1e-9);
        }

        // Retained oil never grows
        let retained = result.budget.retained();
        for pair in retained.windows(2) {
            assert!(pair[1] <= pair[0] + 1e-9);
        }
    }
}
