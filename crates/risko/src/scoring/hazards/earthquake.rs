use super::{ensure_finite, resolve, weighted, FactorError};
use crate::scoring::domain::{Coordinate, Hazard};
use crate::scoring::fallback::{Band, FallbackMode};
use crate::scoring::zones::{BoundingBox, FactorKind, ZoneTables};

const FAULT_WEIGHT: f64 = 0.5;
const HISTORY_WEIGHT: f64 = 0.3;
const SOIL_WEIGHT: f64 = 0.2;

const DEFAULT_HISTORY: f64 = 30.0;
const DEFAULT_SOIL: f64 = 35.0;

const MARMARA: BoundingBox = BoundingBox::new(40.0, 41.5, 27.0, 30.0);

pub fn earthquake_risk(zones: &ZoneTables, coordinate: Coordinate, mode: FallbackMode) -> f64 {
    resolve(Hazard::Earthquake, primary(zones, coordinate), || {
        mode.pick(fallback_band(coordinate))
    })
}

fn primary(zones: &ZoneTables, coordinate: Coordinate) -> Result<f64, FactorError> {
    ensure_finite(coordinate)?;
    let fault = fault_proximity(zones, coordinate)?;
    let history = zones.factor_or(FactorKind::HistoricalActivity, coordinate, DEFAULT_HISTORY);
    let soil = zones.factor_or(FactorKind::SoilAmplification, coordinate, DEFAULT_SOIL);

    Ok(weighted(&[
        (fault, FAULT_WEIGHT),
        (history, HISTORY_WEIGHT),
        (soil, SOIL_WEIGHT),
    ]))
}

/// Highest multiplier-scaled proximity value over every fault vertex.
pub fn fault_proximity(zones: &ZoneTables, coordinate: Coordinate) -> Result<f64, FactorError> {
    let mut best: Option<f64> = None;
    for zone in zones.fault_zones() {
        for vertex in &zone.vertices {
            let value = distance_band(coordinate.degree_distance(vertex)) * zone.multiplier;
            best = Some(best.map_or(value, |current| current.max(value)));
        }
    }
    best.ok_or(FactorError::MissingFaultZones)
}

fn distance_band(distance: f64) -> f64 {
    if distance < 0.5 {
        90.0
    } else if distance < 1.0 {
        70.0
    } else if distance < 2.0 {
        50.0
    } else {
        25.0
    }
}

fn fallback_band(coordinate: Coordinate) -> Band {
    if MARMARA.contains(coordinate) {
        Band::new(70.0, 95.0)
    } else if (38.0..=40.0).contains(&coordinate.latitude) {
        Band::new(60.0, 85.0)
    } else {
        Band::new(20.0, 60.0)
    }
}
