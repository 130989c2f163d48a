//! Integration tests for the orchestration contract.
//!
//! These tests verify:
//! 1. Configuration keys are validated before anything runs
//! 2. Provider registration ordering: all forcing registered before seeding
//! 3. Capability declarations are enforced at registration time
//! 4. Output artifacts exist even when animation rendering fails

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use drift_rs::config::{ConfigError, DriftConfig};
use drift_rs::ensemble::SeedSpec;
use drift_rs::env::{ConstantProvider, EnvError, Landmask, UniformFlowProvider, Variable};
use drift_rs::output::{OutputConfig, Reporter};
use drift_rs::simulation::{OilDriftSimulation, RunParams, SimulationError};

fn start() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap()
}

fn mongla_seed() -> SeedSpec {
    SeedSpec::new(89.5441, 21.4633, start(), "GENERIC MEDIUM CRUDE")
        .with_number(100)
        .with_m3_per_hour(1500.0)
}

// ============================================================================
// Configuration validation
// ============================================================================

#[test]
fn unknown_config_key_rejected_before_any_run() {
    let mut config = DriftConfig::default();
    let err = config.set("processes:sublimation", true).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownKey(_)));

    // Valid keys in all three shapes still apply
    config.set("processes:dispersion", false).unwrap();
    config.set("drift:current_uncertainty", 0.1).unwrap();
    config.set("general:coastline_action", "previous").unwrap();
}

#[test]
fn config_surface_covers_the_full_option_set() {
    let mut config = DriftConfig::default();
    for spec in drift_rs::config::KNOWN_KEYS {
        // Every recognized key must be both readable and writable
        let value = config.get(spec.key).expect(spec.key);
        config.set(spec.key, value).expect(spec.key);
    }
}

// ============================================================================
// Registration and seeding order
// ============================================================================

#[test]
fn seeding_before_forcing_registration_fails() {
    let mut sim = OilDriftSimulation::new(DriftConfig::default());
    let err = sim.seed_elements(mongla_seed()).unwrap_err();
    assert!(matches!(
        err,
        SimulationError::MissingForcing(v) if Variable::MANDATORY.contains(&v)
    ));
}

#[test]
fn full_registration_sequence_then_seed_succeeds() {
    let mut sim = OilDriftSimulation::new(DriftConfig::default());

    // Landmask first, then the physical fields
    sim.set_landmask(Arc::new(Landmask::all_water())).unwrap();
    sim.register_provider(
        Arc::new(UniformFlowProvider::new(0.3, 0.1, 4.0, 1.0)),
        &Variable::MANDATORY,
    )
    .unwrap();

    assert_eq!(sim.environment().provider_count(), 2);
    sim.seed_elements(mongla_seed()).unwrap();
}

#[test]
fn empty_capability_declaration_rejected() {
    let mut sim = OilDriftSimulation::new(DriftConfig::default());
    let provider = Arc::new(ConstantProvider::new("mute"));
    let err = sim.register_provider(provider, &[]).unwrap_err();
    assert!(matches!(
        err,
        SimulationError::Env(EnvError::EmptyRegistration(_))
    ));
}

#[test]
fn capability_declaration_must_be_offered() {
    let mut sim = OilDriftSimulation::new(DriftConfig::default());
    let provider =
        Arc::new(ConstantProvider::new("temp_only").with(Variable::SeaWaterTemperature, 26.0));
    let err = sim
        .register_provider(provider, &[Variable::XSeaWaterVelocity])
        .unwrap_err();
    assert!(matches!(
        err,
        SimulationError::Env(EnvError::NotOffered { .. })
    ));
}

#[test]
fn run_without_seeding_fails() {
    let mut sim = OilDriftSimulation::new(DriftConfig::default());
    sim.register_provider(
        Arc::new(UniformFlowProvider::new(0.0, 0.0, 0.0, 0.0)),
        &Variable::MANDATORY,
    )
    .unwrap();
    let err = sim
        .run(RunParams::new(start() + Duration::hours(1)))
        .unwrap_err();
    assert!(matches!(err, SimulationError::NotSeeded));
}

#[test]
fn time_step_must_divide_output_interval() {
    let mut sim = OilDriftSimulation::new(DriftConfig::default());
    sim.register_provider(
        Arc::new(UniformFlowProvider::new(0.1, 0.0, 0.0, 0.0)),
        &Variable::MANDATORY,
    )
    .unwrap();
    sim.seed_elements(mongla_seed()).unwrap();

    let params = RunParams::new(start() + Duration::hours(2))
        .with_time_step(1000.0)
        .with_time_step_output(3600.0);
    let err = sim.run(params).unwrap_err();
    assert!(matches!(err, SimulationError::InvalidRunParams(_)));
}

// ============================================================================
// Stranding against the landmask
// ============================================================================

#[test]
fn elements_strand_on_an_island_in_the_path() {
    let mut config = DriftConfig::default();
    config.set("seed:rng_seed", 7.0).unwrap();
    let mut sim = OilDriftSimulation::new(config);

    // Island directly east of the release; steady eastward current
    let landmask = Arc::new(Landmask::rectangle(89.60, 21.0, 89.80, 22.0));
    sim.set_landmask(landmask).unwrap();
    sim.register_provider(
        Arc::new(UniformFlowProvider::new(0.5, 0.0, 0.0, 0.0)),
        &Variable::MANDATORY,
    )
    .unwrap();
    sim.seed_elements(mongla_seed()).unwrap();

    let result = sim
        .run(RunParams::new(start() + Duration::hours(12)))
        .unwrap();

    let budget = &result.budget;
    let last = budget.len() - 1;
    assert!(
        budget.mass_stranded[last] > 0.0,
        "eastward drift into the island must strand oil"
    );

    // Stranded elements sit at the western island edge, not inside it
    let snapshot = result.snapshots.last().unwrap();
    for i in 0..snapshot.lon.len() {
        if snapshot.status[i] == drift_rs::ensemble::ElementStatus::Stranded {
            assert!(snapshot.lon[i] >= 89.60 - 1e-6 && snapshot.lon[i] < 89.61);
        }
    }
}

#[test]
fn previous_policy_keeps_elements_off_land() {
    let mut config = DriftConfig::default();
    config.set("general:coastline_action", "previous").unwrap();
    let mut sim = OilDriftSimulation::new(config);

    let landmask = Arc::new(Landmask::rectangle(89.60, 21.0, 89.80, 22.0));
    sim.set_landmask(landmask.clone()).unwrap();
    sim.register_provider(
        Arc::new(UniformFlowProvider::new(0.5, 0.0, 0.0, 0.0)),
        &Variable::MANDATORY,
    )
    .unwrap();
    sim.seed_elements(mongla_seed()).unwrap();

    let result = sim
        .run(RunParams::new(start() + Duration::hours(12)))
        .unwrap();

    let budget = &result.budget;
    assert_eq!(budget.mass_stranded[budget.len() - 1], 0.0);
    let snapshot = result.snapshots.last().unwrap();
    for i in 0..snapshot.lon.len() {
        assert!(
            !landmask.is_land(snapshot.lon[i], snapshot.lat[i]),
            "element {i} ended on land under the previous-position policy"
        );
    }
}

// ============================================================================
// Output artifacts
// ============================================================================

#[test]
fn plots_exist_even_when_animation_cannot_render() {
    let mut sim = OilDriftSimulation::new(DriftConfig::default());
    sim.register_provider(
        Arc::new(UniformFlowProvider::new(0.3, 0.1, 3.0, 1.0)),
        &Variable::MANDATORY,
    )
    .unwrap();
    sim.seed_elements(mongla_seed().with_number(20)).unwrap();
    let result = sim
        .run(RunParams::new(start() + Duration::hours(3)))
        .unwrap();

    let scratch = tempfile::tempdir().unwrap();
    let reporter = Reporter::new(
        OutputConfig::default()
            .with_directory(scratch.path().join("output"))
            .with_figure_size(200, 150),
    );

    let summary = reporter.write_all(&result, None).unwrap();
    assert!(summary.trajectory.exists());
    assert!(summary.budget.exists());
    // Animation may or may not exist depending on the host; either way the
    // plots above were written first.
}
