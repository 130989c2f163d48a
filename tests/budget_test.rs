//! Integration tests for the mass budget of a full drift run.
//!
//! Scenario from the Mongla case: 100 elements of medium crude released at
//! (89.5441 E, 21.4633 N) on 2024-07-15T12:00Z, 1500 m3/hour, two-day drift,
//! current/wind uncertainty 0.1 m/s.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use drift_rs::config::DriftConfig;
use drift_rs::ensemble::SeedSpec;
use drift_rs::env::{UniformFlowProvider, Variable};
use drift_rs::simulation::{OilDriftSimulation, RunParams, RunResult};

const TOL: f64 = 1e-9;

fn mongla_run(rng_seed: u64) -> RunResult {
    let start = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();

    let mut config = DriftConfig::default();
    config.set("drift:current_uncertainty", 0.1).unwrap();
    config.set("drift:wind_uncertainty", 0.1).unwrap();
    config
        .set("environment:fallback:sea_water_temperature", 26.0)
        .unwrap();
    config
        .set("environment:fallback:sea_surface_wave_significant_height", 1.0)
        .unwrap();
    config
        .set("environment:fallback:ocean_mixed_layer_thickness", 20.0)
        .unwrap();
    config.set("seed:rng_seed", rng_seed as f64).unwrap();

    let mut sim = OilDriftSimulation::new(config);
    sim.register_provider(
        Arc::new(UniformFlowProvider::new(0.3, 0.15, 6.0, 2.0)),
        &Variable::MANDATORY,
    )
    .unwrap();
    sim.seed_elements(
        SeedSpec::new(89.5441, 21.4633, start, "GENERIC MEDIUM CRUDE")
            .with_number(100)
            .with_m3_per_hour(1500.0),
    )
    .unwrap();

    sim.run(
        RunParams::new(start + Duration::days(2))
            .with_time_step(1800.0)
            .with_time_step_output(3600.0),
    )
    .unwrap()
}

#[test]
fn output_axis_matches_the_two_day_run() {
    let result = mongla_run(0);
    // Initial output plus one per hour over 48 hours
    assert_eq!(result.n_outputs(), 49);

    let hours = result.elapsed_hours();
    assert_eq!(hours[0], 0.0);
    assert!((hours[48] - 48.0).abs() < 1e-9);
    for pair in hours.windows(2) {
        assert!((pair[1] - pair[0] - 1.0).abs() < 1e-9);
    }
}

#[test]
fn retained_oil_is_monotonically_non_increasing() {
    let result = mongla_run(0);
    let retained = result.budget.retained();

    for (i, pair) in retained.windows(2).enumerate() {
        assert!(
            pair[1] <= pair[0] + TOL,
            "retained oil grew between outputs {i} and {}: {} -> {}",
            i + 1,
            pair[0],
            pair[1]
        );
    }

    // Two days of warm-water weathering must actually remove something
    assert!(retained[48] < retained[0]);
}

#[test]
fn weathered_compartments_are_monotonically_non_decreasing() {
    let result = mongla_run(0);
    let budget = &result.budget;

    for pair in budget.mass_evaporated.windows(2) {
        assert!(pair[1] + TOL >= pair[0]);
    }
    for pair in budget.mass_biodegraded.windows(2) {
        assert!(pair[1] + TOL >= pair[0]);
    }
    for pair in budget.mass_stranded.windows(2) {
        assert!(pair[1] + TOL >= pair[0]);
    }

    let last = budget.len() - 1;
    assert!(budget.mass_evaporated[last] > 0.0);
    assert!(budget.mass_biodegraded[last] > 0.0);
}

#[test]
fn total_mass_is_conserved_across_compartments() {
    let result = mongla_run(0);
    let budget = &result.budget;

    // 1500 m3 over one hour at 900 kg/m3
    let released = 1500.0 * 900.0;
    for i in 0..budget.len() {
        let total = budget.total_at(i);
        assert!(
            (total - released).abs() / released < 1e-9,
            "compartments sum to {total} at output {i}, released {released}"
        );
    }
}

#[test]
fn emulsification_raises_peak_density_above_fresh_oil() {
    let result = mongla_run(0);
    let budget = &result.budget;

    // Fresh medium crude is 900 kg/m3; water uptake pushes the peak up
    assert!(budget.max_density() > 900.0);
    assert!(budget.max_density() < 1025.0);

    // Density series never exceeds sea water
    for rho in &budget.oil_density {
        assert!(*rho >= 900.0 - TOL && *rho < 1025.0);
    }
}

#[test]
fn identical_configurations_reproduce_the_budget_exactly() {
    let a = mongla_run(12345);
    let b = mongla_run(12345);

    assert_eq!(a.budget.mass_surface, b.budget.mass_surface);
    assert_eq!(a.budget.mass_submerged, b.budget.mass_submerged);
    assert_eq!(a.budget.mass_evaporated, b.budget.mass_evaporated);
    assert_eq!(a.budget.mass_biodegraded, b.budget.mass_biodegraded);

    // Positions too: the seeded RNG drives every stochastic term
    let last_a = a.snapshots.last().unwrap();
    let last_b = b.snapshots.last().unwrap();
    assert_eq!(last_a.lon, last_b.lon);
    assert_eq!(last_a.lat, last_b.lat);
}

#[test]
fn different_seeds_give_different_trajectories() {
    let a = mongla_run(1);
    let b = mongla_run(2);

    let last_a = a.snapshots.last().unwrap();
    let last_b = b.snapshots.last().unwrap();
    assert_ne!(last_a.lon, last_b.lon);

    // But the released mass is identical either way
    assert!((a.budget.total_at(0) - b.budget.total_at(0)).abs() < TOL);
}

#[test]
fn uncertainty_spreads_the_ensemble_over_time() {
    let result = mongla_run(0);
    let first = result.snapshots.first().unwrap();
    let last = result.snapshots.last().unwrap();

    let spread = |lons: &[f64], lats: &[f64]| {
        let bbox = drift_rs::projection::GeoBoundingBox::from_points(
            lons.iter().copied().zip(lats.iter().copied()),
        )
        .unwrap();
        (bbox.max_lon - bbox.min_lon) + (bbox.max_lat - bbox.min_lat)
    };

    assert!(spread(&last.lon, &last.lat) > spread(&first.lon, &first.lat));
}
