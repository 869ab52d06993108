use serde::{Deserialize, Serialize};

/// Geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// True when the pair is finite and inside the WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Euclidean distance measured directly in degree space.
    pub fn degree_distance(&self, other: &Coordinate) -> f64 {
        let d_lat = self.latitude - other.latitude;
        let d_lon = self.longitude - other.longitude;
        (d_lat * d_lat + d_lon * d_lon).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hazard {
    Earthquake,
    Flood,
    Fire,
    Landslide,
}

impl Hazard {
    pub const fn ordered() -> [Self; 4] {
        [Self::Earthquake, Self::Flood, Self::Fire, Self::Landslide]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Earthquake => "earthquake",
            Self::Flood => "flood",
            Self::Fire => "fire",
            Self::Landslide => "landslide",
        }
    }

    /// Inclusive score range each calculator clamps into.
    pub const fn clamp_range(self) -> (f64, f64) {
        match self {
            Self::Earthquake => (5.0, 95.0),
            Self::Flood => (5.0, 85.0),
            Self::Fire => (10.0, 80.0),
            Self::Landslide => (5.0, 75.0),
        }
    }

    /// Share of this hazard in the overall score.
    pub const fn weight(self) -> f64 {
        match self {
            Self::Earthquake => 0.4,
            Self::Flood => 0.25,
            Self::Fire => 0.2,
            Self::Landslide => 0.15,
        }
    }
}

impl std::fmt::Display for Hazard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Discrete classification of a 0-100 score, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Only produced for addresses that could not be resolved; ranks below `Low`.
    Unknown,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Thresholds are evaluated high-to-low; boundary values land in the higher band.
    pub fn from_score(score: f64) -> Self {
        if score >= 75.0 {
            Self::Critical
        } else if score >= 50.0 {
            Self::High
        } else if score >= 25.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskScoreSet {
    #[serde(rename = "earthquake_risk")]
    pub earthquake: f64,
    #[serde(rename = "flood_risk")]
    pub flood: f64,
    #[serde(rename = "fire_risk")]
    pub fire: f64,
    #[serde(rename = "landslide_risk")]
    pub landslide: f64,
}

impl RiskScoreSet {
    pub fn get(&self, hazard: Hazard) -> f64 {
        match hazard {
            Hazard::Earthquake => self.earthquake,
            Hazard::Flood => self.flood,
            Hazard::Fire => self.fire,
            Hazard::Landslide => self.landslide,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Hazard, f64)> + '_ {
        Hazard::ordered()
            .into_iter()
            .map(move |hazard| (hazard, self.get(hazard)))
    }
}

/// Terminal output of an address analysis, flattened for storage and display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(flatten)]
    pub scores: RiskScoreSet,
    pub overall_risk_score: f64,
    pub risk_level: RiskLevel,
    pub building_age: Option<u32>,
    pub error: Option<String>,
}

impl AnalysisResult {
    pub const UNRESOLVED_MESSAGE: &'static str = "Could not geocode address";

    /// Result returned when the address cannot be placed on the map.
    pub fn unresolved(address: impl Into<String>, building_age: Option<u32>) -> Self {
        Self {
            address: address.into(),
            latitude: None,
            longitude: None,
            scores: RiskScoreSet::default(),
            overall_risk_score: 0.0,
            risk_level: RiskLevel::Unknown,
            building_age,
            error: Some(Self::UNRESOLVED_MESSAGE.to_string()),
        }
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinate::new(latitude, longitude)),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.error.is_none()
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
