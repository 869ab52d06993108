use super::{ensure_finite, resolve, weighted, FactorError};
use crate::scoring::domain::{Coordinate, Hazard};
use crate::scoring::fallback::{Band, FallbackMode};
use crate::scoring::zones::{FactorKind, ZoneTables};

const ELEVATION_WEIGHT: f64 = 0.3;
const WATER_WEIGHT: f64 = 0.3;
const PRECIPITATION_WEIGHT: f64 = 0.25;
const DRAINAGE_WEIGHT: f64 = 0.15;

const DEFAULT_ELEVATION: f64 = 25.0;
const DEFAULT_WATER: f64 = 20.0;
pub(crate) const DEFAULT_PRECIPITATION: f64 = 30.0;
const DEFAULT_DRAINAGE: f64 = 20.0;

const FALLBACK_BAND: Band = Band::new(15.0, 45.0);

pub fn flood_risk(zones: &ZoneTables, coordinate: Coordinate, mode: FallbackMode) -> f64 {
    resolve(Hazard::Flood, primary(zones, coordinate), || {
        mode.pick(FALLBACK_BAND)
    })
}

fn primary(zones: &ZoneTables, coordinate: Coordinate) -> Result<f64, FactorError> {
    ensure_finite(coordinate)?;
    let elevation = zones.factor_or(FactorKind::Elevation, coordinate, DEFAULT_ELEVATION);
    let water = zones.factor_or(FactorKind::WaterProximity, coordinate, DEFAULT_WATER);
    let precipitation = precipitation_factor(zones, coordinate);
    let drainage = zones
        .city_at(coordinate)
        .map_or(DEFAULT_DRAINAGE, |city| city.base.flood);

    Ok(weighted(&[
        (elevation, ELEVATION_WEIGHT),
        (water, WATER_WEIGHT),
        (precipitation, PRECIPITATION_WEIGHT),
        (drainage, DRAINAGE_WEIGHT),
    ]))
}

/// Regional precipitation value, shared with the landslide trigger factor.
pub(crate) fn precipitation_factor(zones: &ZoneTables, coordinate: Coordinate) -> f64 {
    zones.factor_or(FactorKind::Precipitation, coordinate, DEFAULT_PRECIPITATION)
}
