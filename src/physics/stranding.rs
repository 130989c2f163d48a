//! Coastline interaction.
//!
//! After the horizontal step, each element's displacement segment is tested
//! against the landmask at the configured precision. Under the stranding
//! policy the element is fixed at the first land intersection; under the
//! previous-position policy it is put back where it started the step.

use tracing::debug;

use crate::config::CoastlineAction;
use crate::ensemble::{ElementStatus, Ensemble};
use crate::env::Landmask;

/// Apply the coastline policy to all elements that moved this step.
///
/// `previous` holds the (lon, lat) positions from before the horizontal step,
/// in element order. Returns the number of elements stranded by this call.
pub fn apply_coastline(
    ensemble: &mut Ensemble,
    landmask: &Landmask,
    action: CoastlineAction,
    precision_deg: f64,
    previous: &[(f64, f64)],
) -> usize {
    let mut stranded = 0;

    for i in 0..ensemble.len() {
        if ensemble.status[i] == ElementStatus::Stranded {
            continue;
        }
        let from = previous[i];
        let to = (ensemble.lon[i], ensemble.lat[i]);

        let crossing = landmask.first_land_crossing(from, to, precision_deg);
        let Some((lon, lat)) = crossing else {
            continue;
        };

        match action {
            CoastlineAction::Stranding => {
                ensemble.lon[i] = lon;
                ensemble.lat[i] = lat;
                ensemble.z[i] = 0.0;
                ensemble.status[i] = ElementStatus::Stranded;
                stranded += 1;
            }
            CoastlineAction::Previous => {
                ensemble.lon[i] = from.0;
                ensemble.lat[i] = from.1;
            }
        }
    }

    if stranded > 0 {
        debug!(stranded, "elements stranded on the coastline");
    }
    stranded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ensemble::SeedSpec;
    use crate::oil::OilType;
    use chrono::{TimeZone, Utc};
    use rand::SeedableRng;
    use rand_chacha::ChaChaRng;

    fn ensemble_at(lon: f64, lat: f64, n: usize) -> Ensemble {
        let t = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();
        let oil = OilType::by_name("GENERIC MEDIUM CRUDE").unwrap();
        let spec = SeedSpec::new(lon, lat, t, oil.name)
            .with_number(n)
            .with_radius(0.0);
        let mut rng = ChaChaRng::seed_from_u64(6);
        Ensemble::seed(&spec, oil, 0.02, &mut rng)
    }

    #[test]
    fn test_stranding_fixes_element_at_coast() {
        let landmask = Landmask::rectangle(10.0, 10.0, 11.0, 11.0);
        let mut ensemble = ensemble_at(9.5, 10.5, 1);
        let previous = vec![(9.5, 10.5)];

        // Step carried the element into the island
        ensemble.lon[0] = 10.5;

        let n = apply_coastline(
            &mut ensemble,
            &landmask,
            CoastlineAction::Stranding,
            0.001,
            &previous,
        );

        assert_eq!(n, 1);
        assert_eq!(ensemble.status[0], ElementStatus::Stranded);
        // Fixed at the waterline, not deep inside the island
        assert!(ensemble.lon[0] >= 10.0 && ensemble.lon[0] < 10.01);
    }

    #[test]
    fn test_previous_policy_restores_position() {
        let landmask = Landmask::rectangle(10.0, 10.0, 11.0, 11.0);
        let mut ensemble = ensemble_at(9.5, 10.5, 1);
        let previous = vec![(9.5, 10.5)];

        ensemble.lon[0] = 10.5;

        let n = apply_coastline(
            &mut ensemble,
            &landmask,
            CoastlineAction::Previous,
            0.001,
            &previous,
        );

        assert_eq!(n, 0);
        assert_eq!(ensemble.status[0], ElementStatus::Surface);
        assert_eq!(ensemble.lon[0], 9.5);
        assert_eq!(ensemble.lat[0], 10.5);
    }

    #[test]
    fn test_open_water_step_unaffected() {
        let landmask = Landmask::rectangle(10.0, 10.0, 11.0, 11.0);
        let mut ensemble = ensemble_at(9.0, 9.0, 1);
        let previous = vec![(9.0, 9.0)];

        ensemble.lon[0] = 9.2;

        let n = apply_coastline(
            &mut ensemble,
            &landmask,
            CoastlineAction::Stranding,
            0.001,
            &previous,
        );

        assert_eq!(n, 0);
        assert_eq!(ensemble.lon[0], 9.2);
        assert_eq!(ensemble.status[0], ElementStatus::Surface);
    }

    #[test]
    fn test_already_stranded_elements_skipped() {
        let landmask = Landmask::rectangle(10.0, 10.0, 11.0, 11.0);
        let mut ensemble = ensemble_at(10.5, 10.5, 1);
        ensemble.status[0] = ElementStatus::Stranded;
        let previous = vec![(10.5, 10.5)];

        let n = apply_coastline(
            &mut ensemble,
            &landmask,
            CoastlineAction::Stranding,
            0.001,
            &previous,
        );
        assert_eq!(n, 0);
    }
}
