//! Persistence boundary for completed analyses and the aggregates built on it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{normalize_address, AnalysisResult, RiskLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisId(pub u64);

/// Stored analysis row keyed by owner and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: AnalysisId,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub result: AnalysisResult,
}

/// Storage abstraction so the service can be exercised without a database.
pub trait AnalysisRepository: Send + Sync {
    fn insert(
        &self,
        owner_id: &str,
        result: AnalysisResult,
        created_at: DateTime<Utc>,
    ) -> Result<AnalysisRecord, RepositoryError>;
    /// Records belonging to `owner_id`, newest first.
    fn for_owner(&self, owner_id: &str) -> Result<Vec<AnalysisRecord>, RepositoryError>;
    fn all(&self) -> Result<Vec<AnalysisRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Regional aggregate served to B2B clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskStatistics {
    pub region: String,
    pub average_earthquake_risk: f64,
    pub average_flood_risk: f64,
    pub average_fire_risk: f64,
    pub average_landslide_risk: f64,
    pub total_analyzed_addresses: usize,
    pub high_risk_percentage: f64,
    pub critical_risk_percentage: f64,
}

impl RiskStatistics {
    pub const DEFAULT_REGION: &'static str = "Turkey";

    /// Aggregate resolved records whose address mentions `region`.
    pub fn from_records(region: Option<&str>, records: &[AnalysisRecord]) -> Self {
        let needle = region
            .map(normalize_address)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let matching: Vec<&AnalysisResult> = records
            .iter()
            .map(|record| &record.result)
            .filter(|result| result.is_resolved())
            .filter(|result| match &needle {
                Some(needle) => normalize_address(&result.address).contains(needle.as_str()),
                None => true,
            })
            .collect();

        let total = matching.len();
        let average = |pick: fn(&AnalysisResult) -> f64| {
            if total == 0 {
                0.0
            } else {
                let sum: f64 = matching.iter().map(|result| pick(result)).sum();
                round1(sum / total as f64)
            }
        };
        let share = |level: RiskLevel| {
            if total == 0 {
                0.0
            } else {
                let count = matching
                    .iter()
                    .filter(|result| result.risk_level == level)
                    .count();
                round1(count as f64 * 100.0 / total as f64)
            }
        };

        Self {
            region: region
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .unwrap_or(Self::DEFAULT_REGION)
                .to_string(),
            average_earthquake_risk: average(|result| result.scores.earthquake),
            average_flood_risk: average(|result| result.scores.flood),
            average_fire_risk: average(|result| result.scores.fire),
            average_landslide_risk: average(|result| result.scores.landslide),
            total_analyzed_addresses: total,
            high_risk_percentage: share(RiskLevel::High),
            critical_risk_percentage: share(RiskLevel::Critical),
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
