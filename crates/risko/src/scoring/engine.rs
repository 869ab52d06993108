use std::sync::Arc;

use tracing::info;

use super::aggregate::overall;
use super::domain::{round2, AnalysisResult, Coordinate, Hazard, RiskScoreSet};
use super::fallback::FallbackMode;
use super::geocoder::{Geocoder, GeocodingProvider};
use super::hazards::{earthquake_risk, fire_risk, flood_risk, landslide_risk};
use super::zones::ZoneTables;

/// Address → coordinates → four hazard scores → overall score and level.
pub struct RiskEngine<P> {
    geocoder: Geocoder<P>,
    zones: Arc<ZoneTables>,
    fallback: FallbackMode,
}

impl<P> RiskEngine<P>
where
    P: GeocodingProvider,
{
    pub fn new(geocoder: Geocoder<P>, zones: Arc<ZoneTables>, fallback: FallbackMode) -> Self {
        Self {
            geocoder,
            zones,
            fallback,
        }
    }

    /// Run the full pipeline for one address.
    ///
    /// An address the geocoder cannot place yields `Ok` with the error field
    /// set; only calculator failures surface as `Err`.
    pub async fn analyze(
        &self,
        address: &str,
        building_age: Option<u32>,
    ) -> Result<AnalysisResult, AnalysisError> {
        let Some(resolved) = self.geocoder.geocode(address).await else {
            info!(address, "address could not be geocoded");
            return Ok(AnalysisResult::unresolved(address, building_age));
        };

        let coordinate = resolved.coordinate;
        let scores = self.score(coordinate, building_age)?;
        let (overall_risk_score, risk_level) = overall(&scores);

        info!(
            address,
            source = ?resolved.source,
            overall_risk_score,
            %risk_level,
            "address analysed"
        );

        Ok(AnalysisResult {
            address: address.to_string(),
            latitude: Some(coordinate.latitude),
            longitude: Some(coordinate.longitude),
            scores,
            overall_risk_score,
            risk_level,
            building_age,
            error: None,
        })
    }

    /// Score a known coordinate; each sub-score is rounded to two decimals.
    pub fn score(
        &self,
        coordinate: Coordinate,
        building_age: Option<u32>,
    ) -> Result<RiskScoreSet, AnalysisError> {
        let zones = self.zones.as_ref();
        let mode = self.fallback;

        let earthquake = earthquake_risk(zones, coordinate, mode);
        let flood = flood_risk(zones, coordinate, mode);
        let fire = fire_risk(zones, coordinate, building_age, mode);
        let landslide = landslide_risk(zones, coordinate, mode);

        Ok(RiskScoreSet {
            earthquake: checked(Hazard::Earthquake, earthquake)?,
            flood: checked(Hazard::Flood, flood)?,
            fire: checked(Hazard::Fire, fire)?,
            landslide: checked(Hazard::Landslide, landslide)?,
        })
    }
}

fn checked(hazard: Hazard, score: f64) -> Result<f64, AnalysisError> {
    if score.is_finite() {
        Ok(round2(score))
    } else {
        Err(AnalysisError::NonFiniteScore { hazard })
    }
}

/// Fatal failure while analysing a single address.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("{hazard} calculator produced a non-finite score")]
    NonFiniteScore { hazard: Hazard },
}
