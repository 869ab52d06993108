//! The four hazard calculators.
//!
//! Each calculator blends weighted sub-factors looked up in the zone tables,
//! then clamps into its own range. When the primary path cannot run (no fault
//! data, non-finite coordinates) a coarser band heuristic takes over.

mod earthquake;
mod fire;
mod flood;
mod landslide;

pub use earthquake::{earthquake_risk, fault_proximity};
pub use fire::{building_factor, fire_risk};
pub use flood::flood_risk;
pub use landslide::landslide_risk;

use tracing::warn;

use super::domain::{Coordinate, Hazard};

/// Reason the primary factor model could not be evaluated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FactorError {
    #[error("coordinate ({latitude}, {longitude}) is not finite")]
    NonFiniteCoordinate { latitude: f64, longitude: f64 },
    #[error("zone tables contain no fault zones")]
    MissingFaultZones,
}

pub(crate) fn ensure_finite(coordinate: Coordinate) -> Result<(), FactorError> {
    if coordinate.is_finite() {
        Ok(())
    } else {
        Err(FactorError::NonFiniteCoordinate {
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
        })
    }
}

/// Sum of `value * weight` pairs.
pub(crate) fn weighted(factors: &[(f64, f64)]) -> f64 {
    factors.iter().map(|(value, weight)| value * weight).sum()
}

pub(crate) fn clamp(hazard: Hazard, score: f64) -> f64 {
    let (low, high) = hazard.clamp_range();
    score.clamp(low, high)
}

/// Clamp the primary score, or log and substitute the fallback value.
pub(crate) fn resolve(
    hazard: Hazard,
    primary: Result<f64, FactorError>,
    fallback: impl FnOnce() -> f64,
) -> f64 {
    let score = match primary {
        Ok(score) => score,
        Err(err) => {
            warn!(%hazard, error = %err, "primary factor model unavailable, using fallback band");
            fallback()
        }
    };
    clamp(hazard, score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::fallback::FallbackMode;
    use crate::scoring::zones::ZoneTables;
    use proptest::prelude::*;

    fn in_range(hazard: Hazard, score: f64) -> bool {
        let (low, high) = hazard.clamp_range();
        (low..=high).contains(&score)
    }

    #[test]
    fn clamp_respects_hazard_bounds() {
        assert_eq!(clamp(Hazard::Fire, 5.0), 10.0);
        assert_eq!(clamp(Hazard::Fire, 99.0), 80.0);
        assert_eq!(clamp(Hazard::Landslide, 76.0), 75.0);
    }

    #[test]
    fn resolve_uses_fallback_on_error() {
        let score = resolve(Hazard::Flood, Err(FactorError::MissingFaultZones), || 30.0);
        assert_eq!(score, 30.0);
    }

    #[test]
    fn nan_coordinates_degrade_to_fallback_bands() {
        let zones = ZoneTables::turkey();
        let coordinate = Coordinate::new(f64::NAN, f64::NAN);
        let mode = FallbackMode::Midpoint;

        assert_eq!(earthquake_risk(&zones, coordinate, mode), 40.0);
        assert_eq!(flood_risk(&zones, coordinate, mode), 30.0);
        assert_eq!(fire_risk(&zones, coordinate, None, mode), 25.0);
        assert_eq!(landslide_risk(&zones, coordinate, mode), 17.5);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(2000))]

        #[test]
        fn scores_stay_within_clamp_ranges(
            latitude in -90.0f64..=90.0,
            longitude in -180.0f64..=180.0,
            building_age in proptest::option::of(0u32..300),
        ) {
            let zones = ZoneTables::turkey();
            let coordinate = Coordinate::new(latitude, longitude);

            for mode in [FallbackMode::Midpoint, FallbackMode::Random] {
                let earthquake = earthquake_risk(&zones, coordinate, mode);
                let flood = flood_risk(&zones, coordinate, mode);
                let fire = fire_risk(&zones, coordinate, building_age, mode);
                let landslide = landslide_risk(&zones, coordinate, mode);
                prop_assert!(in_range(Hazard::Earthquake, earthquake));
                prop_assert!(in_range(Hazard::Flood, flood));
                prop_assert!(in_range(Hazard::Fire, fire));
                prop_assert!(in_range(Hazard::Landslide, landslide));
            }
        }

        #[test]
        fn scores_stay_within_clamp_ranges_inside_turkey(
            latitude in 35.8f64..=42.1,
            longitude in 25.6f64..=44.8,
            building_age in proptest::option::of(0u32..150),
        ) {
            let zones = ZoneTables::turkey();
            let coordinate = Coordinate::new(latitude, longitude);
            let mode = FallbackMode::Midpoint;

            let earthquake = earthquake_risk(&zones, coordinate, mode);
            let flood = flood_risk(&zones, coordinate, mode);
            let fire = fire_risk(&zones, coordinate, building_age, mode);
            let landslide = landslide_risk(&zones, coordinate, mode);
            prop_assert!(in_range(Hazard::Earthquake, earthquake));
            prop_assert!(in_range(Hazard::Flood, flood));
            prop_assert!(in_range(Hazard::Fire, fire));
            prop_assert!(in_range(Hazard::Landslide, landslide));
        }

        #[test]
        fn fire_risk_never_drops_with_building_age(
            latitude in 35.8f64..=42.1,
            longitude in 25.6f64..=44.8,
            younger in 0u32..100,
            extra in 0u32..100,
        ) {
            let zones = ZoneTables::turkey();
            let coordinate = Coordinate::new(latitude, longitude);
            let mode = FallbackMode::Midpoint;

            let young = fire_risk(&zones, coordinate, Some(younger), mode);
            let old = fire_risk(&zones, coordinate, Some(younger + extra), mode);
            prop_assert!(old >= young);
        }
    }
}
