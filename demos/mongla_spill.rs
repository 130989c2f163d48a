//! Mongla oil spill scenario, northern Bay of Bengal.
//!
//! A two-day drift of a medium crude released off the Mongla coast, driven
//! by three remote gridded products (currents, wind, waves) and a GSHHS
//! coastline mask.
//!
//! ## Run
//!
//! ```bash
//! export COPERNICUS_USERNAME=...
//! export COPERNICUS_PASSWORD=...
//! cargo run --release --features netcdf --example mongla_spill
//! ```
//!
//! ## Data
//!
//! - Remote: global ocean physics, wind and wave analysis products
//! - Local: `data/GSHHS_f_L1.shp` (coastline; optional, open water without it)
//!
//! Wave data is optional: if the wave product cannot be opened the run
//! degrades to the configured fallback constants. Currents and wind are
//! mandatory; a failed open aborts the run.

use std::error::Error;
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use tracing::{info, warn};

use drift_rs::config::DriftConfig;
use drift_rs::ensemble::SeedSpec;
use drift_rs::env::{
    ConstantProvider, Credentials, FieldProvider, Landmask, RemoteSource, Variable,
    VariableMapping,
};
use drift_rs::output::{OutputConfig, Reporter};
use drift_rs::projection::GeoBoundingBox;
use drift_rs::simulation::{OilDriftSimulation, RunParams};

// ============================================================================
// Scenario Parameters
// ============================================================================

/// Release longitude (degrees east)
const SPILL_LON: f64 = 89.5441;

/// Release latitude (degrees north)
const SPILL_LAT: f64 = 21.4633;

/// Substance released
const OIL_TYPE: &str = "GENERIC MEDIUM CRUDE";

/// Release rate (m3 of oil per hour)
const M3_PER_HOUR: f64 = 1500.0;

/// Number of elements representing the spill
const N_ELEMENTS: usize = 100;

/// Drift duration (days)
const DURATION_DAYS: i64 = 2;

// ============================================================================
// Remote Products
// ============================================================================

/// Hourly merged surface currents, global physics analysis
const CURRENT_DATASET: &str = "cmems_mod_glo_phy_anfc_merged-uv_PT1H-i";

/// Hourly 0.125 degree near-real-time wind analysis
const WIND_DATASET: &str = "cmems_obs-wind_glo_phy_nrt_l4_0.125deg_PT1H";

/// Three-hourly 0.2 degree global wave hindcast
const WAVE_DATASET: &str = "cmems_mod_glo_wav_my_0.2deg_PT3H-i";

/// Coastline shapefile (GSHHS full resolution, level 1)
const COASTLINE_FILE: &str = "data/GSHHS_f_L1.shp";

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Credentials first: a missing pair must halt before any network call.
    let credentials = Credentials::from_env()?;
    let source = RemoteSource::new(credentials).with_chunk_size_limit(0);

    let start_time = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();
    let end_time = start_time + Duration::days(DURATION_DAYS);

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------
    let mut config = DriftConfig::default();
    config.set("processes:dispersion", true)?;
    config.set("processes:evaporation", true)?;
    config.set("processes:emulsification", true)?;
    config.set("processes:biodegradation", true)?;
    config.set("drift:vertical_mixing", true)?;
    config.set("vertical_mixing:timestep", 5.0)?;

    config.set("environment:fallback:sea_surface_height", 0.4)?;
    config.set("environment:fallback:upward_sea_water_velocity", 0.1)?;
    config.set("environment:fallback:sea_surface_wave_significant_height", 1.0)?;
    config.set(
        "environment:fallback:sea_surface_wave_stokes_drift_x_velocity",
        -0.0302,
    )?;
    config.set(
        "environment:fallback:sea_surface_wave_stokes_drift_y_velocity",
        0.0898,
    )?;
    config.set("environment:fallback:ocean_mixed_layer_thickness", 20.0)?;

    config.set("drift:current_uncertainty", 0.1)?;
    config.set("drift:wind_uncertainty", 0.1)?;

    config.set("general:coastline_action", "stranding")?;
    config.set("general:coastline_approximation_precision", 0.001)?; // approx 100 m

    let mut sim = OilDriftSimulation::new(config);

    // ------------------------------------------------------------------
    // Providers: landmask first, then the physical fields
    // ------------------------------------------------------------------
    let domain = GeoBoundingBox::new(
        SPILL_LON - 2.5,
        SPILL_LAT - 2.5,
        SPILL_LON + 2.5,
        SPILL_LAT + 2.5,
    );
    let landmask = Arc::new(match Landmask::from_shapefile(COASTLINE_FILE, &domain) {
        Ok(mask) => {
            info!(polygons = mask.polygon_count(), "coastline loaded");
            mask
        }
        Err(e) => {
            warn!(error = %e, "coastline unavailable; treating the domain as open water");
            Landmask::all_water()
        }
    });
    sim.set_landmask(landmask.clone())?;

    // Scenario constants for water temperature and salinity.
    let scenario_constants = ConstantProvider::new("scenario_constants")
        .with(Variable::SeaWaterTemperature, 26.0)
        .with(Variable::SeaWaterSalinity, 35.0);
    sim.register_provider(
        Arc::new(scenario_constants),
        &[Variable::SeaWaterTemperature, Variable::SeaWaterSalinity],
    )?;

    // Currents and wind are mandatory: abort on failure.
    let currents = source.open_dataset(
        CURRENT_DATASET,
        VariableMapping::new()
            .map("uo", Variable::XSeaWaterVelocity)
            .map("vo", Variable::YSeaWaterVelocity),
    )?;
    info!("{}", currents.summary());
    sim.register_provider(
        Arc::new(currents),
        &[Variable::XSeaWaterVelocity, Variable::YSeaWaterVelocity],
    )?;

    let wind = source.open_dataset(
        WIND_DATASET,
        VariableMapping::new()
            .map("eastward_wind", Variable::XWind)
            .map("northward_wind", Variable::YWind),
    )?;
    info!("{}", wind.summary());
    sim.register_provider(Arc::new(wind), &[Variable::XWind, Variable::YWind])?;

    // Waves are secondary: degrade to the fallback constants on failure.
    match source.open_dataset(
        WAVE_DATASET,
        VariableMapping::new()
            .map("VSDX", Variable::SeaSurfaceWaveStokesDriftXVelocity)
            .map("VSDY", Variable::SeaSurfaceWaveStokesDriftYVelocity)
            .map("VHM0", Variable::SeaSurfaceWaveSignificantHeight)
            .map(
                "VTPK",
                Variable::SeaSurfaceWavePeriodAtVarianceSpectralDensityMaximum,
            )
            .map(
                "VTM02",
                Variable::SeaSurfaceWaveMeanPeriodFromVarianceSpectralDensitySecondFrequencyMoment,
            ),
    ) {
        Ok(waves) => {
            info!("{}", waves.summary());
            let vars = waves.offered_variables();
            sim.register_provider(Arc::new(waves), &vars)?;
        }
        Err(e) => {
            warn!(error = %e, "wave product unavailable; using fallback wave constants");
        }
    }

    // ------------------------------------------------------------------
    // Seed and run
    // ------------------------------------------------------------------
    sim.seed_elements(
        SeedSpec::new(SPILL_LON, SPILL_LAT, start_time, OIL_TYPE)
            .with_number(N_ELEMENTS)
            .with_m3_per_hour(M3_PER_HOUR)
            .with_wind_drift_factor(0.0),
    )?;

    let params = RunParams::new(end_time)
        .with_time_step(1800.0)
        .with_time_step_output(3600.0);
    let result = sim.run(params)?;

    // ------------------------------------------------------------------
    // Report
    // ------------------------------------------------------------------
    let budget = &result.budget;
    let last = budget.len() - 1;
    println!("{} drift, {} output steps", result.oil_name(), result.n_outputs());
    println!("  surface oil mass:     {:>12.1} kg", budget.mass_surface[last]);
    println!("  submerged oil mass:   {:>12.1} kg", budget.mass_submerged[last]);
    println!("  stranded oil mass:    {:>12.1} kg", budget.mass_stranded[last]);
    println!("  evaporated oil mass:  {:>12.1} kg", budget.mass_evaporated[last]);
    println!("  biodegraded oil mass: {:>12.1} kg", budget.mass_biodegraded[last]);
    println!("  max emulsion density: {:>12.2} kg/m3", budget.max_density());

    let reporter = Reporter::new(OutputConfig::default());
    let summary = reporter.write_all(&result, Some(&landmask))?;
    println!("wrote {}", summary.trajectory.display());
    println!("wrote {}", summary.budget.display());
    match summary.animation {
        Some(path) => println!("wrote {}", path.display()),
        None => println!("animation skipped (renderer unavailable)"),
    }

    Ok(())
}
