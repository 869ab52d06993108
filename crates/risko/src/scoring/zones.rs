//! Static geographic reference data consulted by every risk calculator.
//!
//! Zones are kept as one ordered list of tagged descriptors. Lookups scan the
//! list front to back and the first matching entry wins, so more specific
//! boxes must precede broader ones covering the same area.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::domain::Coordinate;

/// Inclusive latitude/longitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub const fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&coordinate.latitude)
            && (self.min_lon..=self.max_lon).contains(&coordinate.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopulationDensity {
    Low,
    Medium,
    High,
}

/// Sub-factor a bounding box contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    HistoricalActivity,
    SoilAmplification,
    Elevation,
    WaterProximity,
    Precipitation,
    Climate,
    Vegetation,
    TerrainSlope,
    Geology,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultZone {
    pub name: String,
    pub vertices: Vec<Coordinate>,
    pub multiplier: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseRisks {
    pub earthquake: f64,
    pub flood: f64,
    pub fire: f64,
    pub landslide: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityProfile {
    pub name: String,
    pub bounds: BoundingBox,
    pub density: PopulationDensity,
    pub average_building_age: u32,
    pub base: BaseRisks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxFactor {
    pub name: String,
    pub bounds: BoundingBox,
    pub factor: FactorKind,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ZoneDescriptor {
    FaultZone(FaultZone),
    CityProfile(CityProfile),
    BoundingBoxFactor(BoxFactor),
}

/// Immutable, ordered zone catalog shared read-only by all analyses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneTables {
    zones: Vec<ZoneDescriptor>,
}

impl ZoneTables {
    pub fn new(zones: Vec<ZoneDescriptor>) -> Self {
        Self { zones }
    }

    /// Load an override catalog from a JSON document shaped like `{"zones": [...]}`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ZoneTableError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ZoneTableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ZoneTableError> {
        let tables: Self = serde_json::from_reader(reader)?;
        Ok(tables)
    }

    pub fn zones(&self) -> &[ZoneDescriptor] {
        &self.zones
    }

    pub fn fault_zones(&self) -> impl Iterator<Item = &FaultZone> {
        self.zones.iter().filter_map(|zone| match zone {
            ZoneDescriptor::FaultZone(fault) => Some(fault),
            _ => None,
        })
    }

    pub fn city_at(&self, coordinate: Coordinate) -> Option<&CityProfile> {
        self.zones.iter().find_map(|zone| match zone {
            ZoneDescriptor::CityProfile(city) if city.bounds.contains(coordinate) => Some(city),
            _ => None,
        })
    }

    /// Value of the first box feeding `kind` that contains the coordinate.
    pub fn factor(&self, kind: FactorKind, coordinate: Coordinate) -> Option<f64> {
        self.zones.iter().find_map(|zone| match zone {
            ZoneDescriptor::BoundingBoxFactor(entry)
                if entry.factor == kind && entry.bounds.contains(coordinate) =>
            {
                Some(entry.value)
            }
            _ => None,
        })
    }

    pub fn factor_or(&self, kind: FactorKind, coordinate: Coordinate, default: f64) -> f64 {
        self.factor(kind, coordinate).unwrap_or(default)
    }

    /// Built-in catalog for Turkey.
    pub fn turkey() -> Self {
        let mut zones = Vec::new();
        zones.extend(fault_zones().into_iter().map(ZoneDescriptor::FaultZone));
        zones.extend(city_profiles().into_iter().map(ZoneDescriptor::CityProfile));
        zones.extend(
            box_factors()
                .into_iter()
                .map(ZoneDescriptor::BoundingBoxFactor),
        );
        Self { zones }
    }
}

impl Default for ZoneTables {
    fn default() -> Self {
        Self::turkey()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ZoneTableError {
    #[error("failed to read zone table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid zone table: {0}")]
    Parse(#[from] serde_json::Error),
}

fn fault(name: &str, multiplier: f64, vertices: &[(f64, f64)]) -> FaultZone {
    FaultZone {
        name: name.to_string(),
        vertices: vertices
            .iter()
            .map(|&(lat, lon)| Coordinate::new(lat, lon))
            .collect(),
        multiplier,
    }
}

fn fault_zones() -> Vec<FaultZone> {
    vec![
        fault(
            "North Anatolian Fault",
            1.0,
            &[
                (40.72, 27.60),
                (40.78, 29.20),
                (40.75, 31.60),
                (41.00, 34.00),
                (40.60, 36.60),
                (39.75, 39.50),
            ],
        ),
        fault(
            "East Anatolian Fault",
            0.95,
            &[
                (36.20, 36.16),
                (37.60, 37.00),
                (38.35, 38.30),
                (38.70, 39.90),
                (39.20, 41.00),
            ],
        ),
        fault(
            "Aegean Graben System",
            0.85,
            &[
                (38.45, 27.20),
                (37.85, 27.85),
                (38.95, 28.60),
                (37.90, 29.10),
            ],
        ),
    ]
}

fn city(
    name: &str,
    bounds: BoundingBox,
    density: PopulationDensity,
    average_building_age: u32,
    base: (f64, f64, f64, f64),
) -> CityProfile {
    let (earthquake, flood, fire, landslide) = base;
    CityProfile {
        name: name.to_string(),
        bounds,
        density,
        average_building_age,
        base: BaseRisks {
            earthquake,
            flood,
            fire,
            landslide,
        },
    }
}

fn city_profiles() -> Vec<CityProfile> {
    use PopulationDensity::{High, Low, Medium};

    vec![
        city(
            "Istanbul",
            BoundingBox::new(40.80, 41.35, 28.50, 29.45),
            High,
            35,
            (85.0, 55.0, 45.0, 35.0),
        ),
        city(
            "Ankara",
            BoundingBox::new(39.75, 40.10, 32.60, 33.05),
            High,
            28,
            (35.0, 30.0, 40.0, 25.0),
        ),
        city(
            "Izmir",
            BoundingBox::new(38.30, 38.55, 26.95, 27.30),
            High,
            30,
            (75.0, 40.0, 45.0, 20.0),
        ),
        city(
            "Bursa",
            BoundingBox::new(40.10, 40.30, 28.90, 29.20),
            Medium,
            27,
            (70.0, 35.0, 40.0, 30.0),
        ),
        city(
            "Kocaeli",
            BoundingBox::new(40.70, 40.90, 29.70, 30.10),
            Medium,
            26,
            (85.0, 45.0, 40.0, 30.0),
        ),
        city(
            "Antalya",
            BoundingBox::new(36.80, 37.00, 30.55, 30.85),
            Medium,
            20,
            (45.0, 35.0, 60.0, 25.0),
        ),
        city(
            "Adana",
            BoundingBox::new(36.95, 37.10, 35.20, 35.45),
            Medium,
            25,
            (55.0, 50.0, 50.0, 15.0),
        ),
        city(
            "Trabzon",
            BoundingBox::new(40.95, 41.05, 39.60, 39.85),
            Low,
            24,
            (40.0, 60.0, 30.0, 60.0),
        ),
    ]
}

fn factor(name: &str, factor: FactorKind, bounds: BoundingBox, value: f64) -> BoxFactor {
    BoxFactor {
        name: name.to_string(),
        bounds,
        factor,
        value,
    }
}

fn box_factors() -> Vec<BoxFactor> {
    use FactorKind::*;

    vec![
        factor(
            "Marmara seismic belt",
            HistoricalActivity,
            BoundingBox::new(40.0, 41.5, 27.0, 30.5),
            80.0,
        ),
        factor(
            "East Anatolian seismic belt",
            HistoricalActivity,
            BoundingBox::new(37.0, 39.5, 36.5, 41.0),
            75.0,
        ),
        factor(
            "Aegean seismic belt",
            HistoricalActivity,
            BoundingBox::new(37.0, 39.5, 26.0, 29.0),
            70.0,
        ),
        factor(
            "Istanbul alluvial basin",
            SoilAmplification,
            BoundingBox::new(40.80, 41.30, 28.50, 29.90),
            70.0,
        ),
        factor(
            "Izmir gulf sediments",
            SoilAmplification,
            BoundingBox::new(38.30, 38.60, 26.90, 27.40),
            65.0,
        ),
        factor(
            "Cukurova delta",
            Elevation,
            BoundingBox::new(36.60, 37.10, 34.80, 36.00),
            75.0,
        ),
        factor(
            "Black Sea coastal strip",
            Elevation,
            BoundingBox::new(40.90, 41.70, 30.00, 42.00),
            70.0,
        ),
        factor(
            "Marmara coast",
            Elevation,
            BoundingBox::new(40.70, 41.30, 28.00, 30.00),
            60.0,
        ),
        factor(
            "Izmir lowlands",
            Elevation,
            BoundingBox::new(38.30, 38.60, 26.90, 27.40),
            55.0,
        ),
        factor(
            "Bosphorus and Golden Horn",
            WaterProximity,
            BoundingBox::new(40.95, 41.25, 28.85, 29.15),
            70.0,
        ),
        factor(
            "Black Sea shoreline",
            WaterProximity,
            BoundingBox::new(40.90, 41.70, 30.00, 42.00),
            75.0,
        ),
        factor(
            "Meric-Ergene basin",
            WaterProximity,
            BoundingBox::new(40.60, 41.90, 26.00, 27.50),
            65.0,
        ),
        factor(
            "Seyhan-Ceyhan floodplain",
            WaterProximity,
            BoundingBox::new(36.60, 37.30, 34.80, 36.00),
            70.0,
        ),
        factor(
            "Eastern Black Sea",
            Precipitation,
            BoundingBox::new(40.50, 41.60, 36.50, 42.00),
            85.0,
        ),
        factor(
            "Western Black Sea",
            Precipitation,
            BoundingBox::new(40.80, 42.00, 30.00, 36.50),
            65.0,
        ),
        factor(
            "Marmara",
            Precipitation,
            BoundingBox::new(40.00, 41.60, 26.00, 30.00),
            50.0,
        ),
        factor(
            "Mediterranean coast",
            Precipitation,
            BoundingBox::new(36.00, 37.20, 29.50, 36.50),
            55.0,
        ),
        factor(
            "Mediterranean climate",
            Climate,
            BoundingBox::new(36.00, 37.50, 27.00, 36.50),
            75.0,
        ),
        factor(
            "Aegean climate",
            Climate,
            BoundingBox::new(37.50, 39.50, 26.00, 28.50),
            65.0,
        ),
        factor(
            "Central Anatolian steppe",
            Climate,
            BoundingBox::new(38.00, 40.50, 31.00, 36.00),
            45.0,
        ),
        factor(
            "Mediterranean forest belt",
            Vegetation,
            BoundingBox::new(36.20, 37.60, 28.00, 32.50),
            80.0,
        ),
        factor(
            "Aegean pine forests",
            Vegetation,
            BoundingBox::new(37.50, 39.20, 26.50, 28.50),
            65.0,
        ),
        factor(
            "Black Sea forests",
            Vegetation,
            BoundingBox::new(40.80, 41.70, 30.00, 42.00),
            50.0,
        ),
        factor(
            "Eastern Black Sea mountains",
            TerrainSlope,
            BoundingBox::new(40.30, 41.50, 36.50, 42.00),
            80.0,
        ),
        factor(
            "Taurus mountains",
            TerrainSlope,
            BoundingBox::new(36.50, 38.00, 30.00, 36.00),
            60.0,
        ),
        factor(
            "Eastern highlands",
            TerrainSlope,
            BoundingBox::new(38.00, 40.50, 40.00, 44.80),
            55.0,
        ),
        factor(
            "Istanbul hills",
            TerrainSlope,
            BoundingBox::new(40.90, 41.30, 28.50, 29.50),
            35.0,
        ),
        factor(
            "Black Sea flysch",
            Geology,
            BoundingBox::new(40.50, 41.80, 31.00, 42.00),
            75.0,
        ),
        factor(
            "Marmara clay formations",
            Geology,
            BoundingBox::new(40.70, 41.30, 28.00, 30.00),
            50.0,
        ),
    ]
}
