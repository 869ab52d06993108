use super::{ensure_finite, resolve, weighted, FactorError};
use crate::scoring::domain::{Coordinate, Hazard};
use crate::scoring::fallback::{Band, FallbackMode};
use crate::scoring::zones::{CityProfile, FactorKind, PopulationDensity, ZoneTables};

const CLIMATE_WEIGHT: f64 = 0.3;
const VEGETATION_WEIGHT: f64 = 0.25;
const BUILDING_WEIGHT: f64 = 0.25;
const INFRASTRUCTURE_WEIGHT: f64 = 0.2;

const DEFAULT_CLIMATE: f64 = 35.0;
const DEFAULT_VEGETATION: f64 = 30.0;
const DEFAULT_INFRASTRUCTURE: f64 = 40.0;

const BUILDING_BASE: f64 = 30.0;
const BUILDING_CAP: f64 = 75.0;
const DEFAULT_AVERAGE_AGE: u32 = 25;

const FALLBACK_BAND: Band = Band::new(15.0, 35.0);

pub fn fire_risk(
    zones: &ZoneTables,
    coordinate: Coordinate,
    building_age: Option<u32>,
    mode: FallbackMode,
) -> f64 {
    let score = primary(zones, coordinate, building_age);
    resolve(Hazard::Fire, score, || {
        mode.pick(FALLBACK_BAND) + fallback_age_bonus(building_age)
    })
}

fn primary(
    zones: &ZoneTables,
    coordinate: Coordinate,
    building_age: Option<u32>,
) -> Result<f64, FactorError> {
    ensure_finite(coordinate)?;
    let city = zones.city_at(coordinate);
    let climate = zones.factor_or(FactorKind::Climate, coordinate, DEFAULT_CLIMATE);
    let vegetation = zones.factor_or(FactorKind::Vegetation, coordinate, DEFAULT_VEGETATION);
    let building = building_factor(city, building_age);
    let infrastructure = city.map_or(DEFAULT_INFRASTRUCTURE, |city| city.base.fire);

    Ok(weighted(&[
        (climate, CLIMATE_WEIGHT),
        (vegetation, VEGETATION_WEIGHT),
        (building, BUILDING_WEIGHT),
        (infrastructure, INFRASTRUCTURE_WEIGHT),
    ]))
}

/// Building stock factor: age relative to the local average plus a density surcharge.
///
/// Coordinates outside every city profile are treated as low-density with a
/// 25 year average building age. A missing age adds no age surcharge.
pub fn building_factor(city: Option<&CityProfile>, building_age: Option<u32>) -> f64 {
    let (average_age, density) = match city {
        Some(city) => (city.average_building_age, city.density),
        None => (DEFAULT_AVERAGE_AGE, PopulationDensity::Low),
    };

    let mut factor = BUILDING_BASE;

    if let Some(age) = building_age {
        let excess = i64::from(age) - i64::from(average_age);
        if excess > 20 {
            factor += 25.0;
        } else if excess > 10 {
            factor += 15.0;
        }
    }

    factor += match density {
        PopulationDensity::High => 20.0,
        PopulationDensity::Medium => 10.0,
        PopulationDensity::Low => 0.0,
    };

    factor.min(BUILDING_CAP)
}

fn fallback_age_bonus(building_age: Option<u32>) -> f64 {
    match building_age {
        Some(age) if age > 50 => 20.0,
        Some(age) if age > 30 => 10.0,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISTANBUL: Coordinate = Coordinate::new(41.0082, 28.9784);

    #[test]
    fn older_buildings_raise_fire_risk() {
        let zones = ZoneTables::turkey();
        let new = fire_risk(&zones, ISTANBUL, Some(10), FallbackMode::Midpoint);
        let old = fire_risk(&zones, ISTANBUL, Some(60), FallbackMode::Midpoint);
        assert!(old >= new);
        assert!(
            old > new,
            "istanbul average is 35 so 60 years is well above it"
        );
    }

    #[test]
    fn building_factor_caps_at_seventy_five() {
        let zones = ZoneTables::turkey();
        let city = zones.city_at(ISTANBUL);
        // 30 + 25 (age) + 20 (high density) = 75
        assert_eq!(building_factor(city, Some(80)), 75.0);
        // 30 + 15 (age) + 20 (high density)
        assert_eq!(building_factor(city, Some(50)), 65.0);
        assert_eq!(building_factor(city, None), 50.0);
    }

    #[test]
    fn building_factor_defaults_outside_cities() {
        assert_eq!(building_factor(None, None), 30.0);
        assert_eq!(building_factor(None, Some(36)), 45.0);
        assert_eq!(building_factor(None, Some(46)), 55.0);
    }

    #[test]
    fn fallback_adds_original_age_bonus() {
        let zones = ZoneTables::turkey();
        let nan = Coordinate::new(f64::NAN, 0.0);
        let mode = FallbackMode::Midpoint;
        assert_eq!(fire_risk(&zones, nan, Some(60), mode), 45.0);
        assert_eq!(fire_risk(&zones, nan, Some(40), mode), 35.0);
        assert_eq!(fire_risk(&zones, nan, None, mode), 25.0);
    }
}
