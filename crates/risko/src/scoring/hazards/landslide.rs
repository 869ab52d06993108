use super::flood::precipitation_factor;
use super::{ensure_finite, resolve, weighted, FactorError};
use crate::scoring::domain::{Coordinate, Hazard};
use crate::scoring::fallback::{Band, FallbackMode};
use crate::scoring::zones::{FactorKind, ZoneTables};

const SLOPE_WEIGHT: f64 = 0.4;
const GEOLOGY_WEIGHT: f64 = 0.3;
const TRIGGER_WEIGHT: f64 = 0.2;
const HUMAN_WEIGHT: f64 = 0.1;

const DEFAULT_SLOPE: f64 = 20.0;
const DEFAULT_GEOLOGY: f64 = 25.0;
const DEFAULT_HUMAN: f64 = 15.0;

/// Share of the regional precipitation value that acts as a slide trigger.
const TRIGGER_SCALE: f64 = 0.8;

pub fn landslide_risk(zones: &ZoneTables, coordinate: Coordinate, mode: FallbackMode) -> f64 {
    resolve(Hazard::Landslide, primary(zones, coordinate), || {
        mode.pick(fallback_band(coordinate))
    })
}

fn primary(zones: &ZoneTables, coordinate: Coordinate) -> Result<f64, FactorError> {
    ensure_finite(coordinate)?;
    let slope = zones.factor_or(FactorKind::TerrainSlope, coordinate, DEFAULT_SLOPE);
    let geology = zones.factor_or(FactorKind::Geology, coordinate, DEFAULT_GEOLOGY);
    let trigger = TRIGGER_SCALE * precipitation_factor(zones, coordinate);
    let human = zones
        .city_at(coordinate)
        .map_or(DEFAULT_HUMAN, |city| city.base.landslide);

    Ok(weighted(&[
        (slope, SLOPE_WEIGHT),
        (geology, GEOLOGY_WEIGHT),
        (trigger, TRIGGER_WEIGHT),
        (human, HUMAN_WEIGHT),
    ]))
}

fn fallback_band(coordinate: Coordinate) -> Band {
    let latitude = coordinate.latitude;
    if (37.0..=38.5).contains(&latitude) || (40.5..=42.0).contains(&latitude) {
        Band::new(40.0, 70.0)
    } else {
        Band::new(5.0, 30.0)
    }
}
