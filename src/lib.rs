//! # drift-rs
//!
//! A Lagrangian oil-spill drift simulation: particles advected by ocean
//! currents, wind and waves, weathered by evaporation, emulsification and
//! biodegradation, stranded against a coastline mask.
//!
//! The crate is organized around four pieces:
//! - Configuration ([`config::DriftConfig`]): typed options with a validated
//!   dotted-key surface and fallback constants
//! - Environmental data ([`env`]): canonical variables, prioritized field
//!   providers (constants, gridded datasets, remote sources), landmask
//! - Simulation ([`simulation::OilDriftSimulation`]): configure, register
//!   providers, seed, run
//! - Output ([`output::Reporter`]): trajectory map, budget chart, animation
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use std::sync::Arc;
//! use drift_rs::config::DriftConfig;
//! use drift_rs::ensemble::SeedSpec;
//! use drift_rs::env::{UniformFlowProvider, Variable};
//! use drift_rs::simulation::{OilDriftSimulation, RunParams};
//!
//! let start = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();
//!
//! let mut config = DriftConfig::default();
//! config.set("drift:current_uncertainty", 0.1).unwrap();
//!
//! let mut sim = OilDriftSimulation::new(config);
//! sim.register_provider(
//!     Arc::new(UniformFlowProvider::new(0.3, 0.1, 5.0, 2.0)),
//!     &Variable::MANDATORY,
//! ).unwrap();
//! sim.seed_elements(SeedSpec::new(89.5441, 21.4633, start, "GENERIC MEDIUM CRUDE")).unwrap();
//!
//! let result = sim.run(RunParams::new(start + Duration::days(1))).unwrap();
//! assert!(result.budget.retained().last().unwrap() > &0.0);
//! ```
//!
//! Gridded dataset adapters and remote dataset access require the `netcdf`
//! feature; `parallel` switches the weathering loop to rayon.

pub mod config;
pub mod ensemble;
pub mod env;
pub mod oil;
pub mod output;
pub mod physics;
pub mod projection;
pub mod simulation;

// Re-export the main types for convenience
pub use config::{CoastlineAction, ConfigError, ConfigValue, DriftConfig};
pub use ensemble::{ElementStatus, Ensemble, SeedSpec};
pub use env::{
    ConstantProvider, EnvError, Environment, FieldProvider, Landmask, LandmaskError,
    UniformFlowProvider, Variable,
};
#[cfg(feature = "netcdf")]
pub use env::{Credentials, DatasetError, GriddedDataset, RemoteError, RemoteSource, VariableMapping};
pub use oil::{OilError, OilType};
pub use output::{AnimationError, OutputConfig, PlotError, ReportSummary, Reporter};
pub use projection::{GeoBoundingBox, LocalProjection};
pub use simulation::{MassBudget, OilDriftSimulation, RunParams, RunResult, SimulationError};
