use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value};

use crate::recommendations::{hazard_analysis, prevention_tips, recommendations_for, Recommendation};
use crate::scoring::{AnalysisResult, Hazard};

/// Premium report: scores plus guidance.
#[derive(Debug, Clone, Serialize)]
pub struct DetailedRiskReport {
    pub risk_score: AnalysisResult,
    pub recommendations: Vec<Recommendation>,
    pub analysis: BTreeMap<Hazard, &'static str>,
    pub prevention_tips: Vec<&'static str>,
}

impl DetailedRiskReport {
    pub fn new(result: AnalysisResult) -> Self {
        Self {
            recommendations: recommendations_for(&result.scores),
            analysis: hazard_analysis(&result.scores),
            prevention_tips: prevention_tips().to_vec(),
            risk_score: result,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatPoint {
    pub lat: f64,
    pub lon: f64,
    pub intensity: f64,
}

/// Map payload: a GeoJSON point plus one heat layer per hazard.
#[derive(Debug, Clone, Serialize)]
pub struct RiskVisualization {
    pub address: String,
    pub risk_map_data: Value,
    pub heat_map_layers: BTreeMap<Hazard, Vec<HeatPoint>>,
}

impl RiskVisualization {
    /// Returns `None` for results without a coordinate.
    pub fn from_result(result: &AnalysisResult) -> Option<Self> {
        let coordinate = result.coordinate()?;

        let risk_map_data = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [coordinate.longitude, coordinate.latitude],
                },
                "properties": {
                    "address": result.address,
                    "overall_risk": result.overall_risk_score,
                    "risk_level": result.risk_level,
                },
            }],
        });

        let heat_map_layers = result
            .scores
            .iter()
            .map(|(hazard, intensity)| {
                (
                    hazard,
                    vec![HeatPoint {
                        lat: coordinate.latitude,
                        lon: coordinate.longitude,
                        intensity,
                    }],
                )
            })
            .collect();

        Some(Self {
            address: result.address.clone(),
            risk_map_data,
            heat_map_layers,
        })
    }
}
