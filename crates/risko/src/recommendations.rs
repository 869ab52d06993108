//! Static guidance keyed by hazard and risk level.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::scoring::{Hazard, RiskLevel, RiskScoreSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub id: u32,
    pub risk_type: Hazard,
    pub risk_level: RiskLevel,
    pub title: &'static str,
    pub description: &'static str,
    pub priority: u8,
}

const fn entry(
    id: u32,
    risk_type: Hazard,
    risk_level: RiskLevel,
    title: &'static str,
    description: &'static str,
    priority: u8,
) -> Recommendation {
    Recommendation {
        id,
        risk_type,
        risk_level,
        title,
        description,
        priority,
    }
}

const CATALOG: &[Recommendation] = &[
    entry(
        1,
        Hazard::Earthquake,
        RiskLevel::Critical,
        "Urgent structural retrofit",
        "The building's earthquake resistance is critically low. Commission a structural retrofit as soon as possible.",
        1,
    ),
    entry(
        2,
        Hazard::Earthquake,
        RiskLevel::Critical,
        "Prepare an earthquake kit",
        "Keep an emergency bag with water, canned food and first-aid supplies in a safe, reachable place.",
        2,
    ),
    entry(
        3,
        Hazard::Earthquake,
        RiskLevel::High,
        "Order a structural inspection",
        "Have the building's earthquake resistance inspected and reinforce it where required.",
        1,
    ),
    entry(
        4,
        Hazard::Earthquake,
        RiskLevel::Medium,
        "Take out earthquake insurance",
        "Compulsory earthquake insurance (DASK) limits the financial impact of damage.",
        2,
    ),
    entry(
        5,
        Hazard::Flood,
        RiskLevel::Critical,
        "Install flood protection",
        "Waterproof basements and ground floors and install flood barriers.",
        1,
    ),
    entry(
        6,
        Hazard::Flood,
        RiskLevel::High,
        "Inspect the drainage system",
        "Have the building's drainage inspected and cleaned on a regular schedule.",
        2,
    ),
    entry(
        7,
        Hazard::Flood,
        RiskLevel::Medium,
        "Clear gutters",
        "Keep rain gutters and drains free of debris.",
        3,
    ),
    entry(
        8,
        Hazard::Fire,
        RiskLevel::Critical,
        "Install fire alarm and suppression",
        "A professionally installed fire alarm and suppression system is urgently needed.",
        1,
    ),
    entry(
        9,
        Hazard::Fire,
        RiskLevel::High,
        "Renew electrical wiring",
        "Replace ageing electrical installations and take out fire insurance.",
        1,
    ),
    entry(
        10,
        Hazard::Fire,
        RiskLevel::Medium,
        "Keep an extinguisher at hand",
        "Keep fire extinguishers at home and at work and learn how to use them.",
        2,
    ),
    entry(
        11,
        Hazard::Landslide,
        RiskLevel::Critical,
        "Start slope stabilisation works",
        "Retaining walls or a drainage system are required without delay.",
        1,
    ),
    entry(
        12,
        Hazard::Landslide,
        RiskLevel::High,
        "Commission a ground survey",
        "Assess landslide exposure with a soil and slope analysis.",
        1,
    ),
    entry(
        13,
        Hazard::Landslide,
        RiskLevel::Medium,
        "Check surface drainage",
        "Control water run-off on the plot and add drainage where needed.",
        2,
    ),
];

const PREVENTION_TIPS: [&str; 8] = [
    "Prepare an emergency bag and keep it somewhere easy to reach",
    "Create a family disaster plan and rehearse it regularly",
    "Keep building insurance up to date (DASK and fire insurance)",
    "Save emergency contact numbers where everyone can find them",
    "Agree on a mutual-aid plan with your neighbours",
    "Have the building inspected regularly and keep up with maintenance",
    "Follow disaster warnings issued by local authorities",
    "Take first-aid training and keep basic equipment at home",
];

/// Catalog entries matching each hazard's level, ordered by priority.
///
/// The sort is stable, so entries with equal priority keep hazard order.
pub fn recommendations_for(scores: &RiskScoreSet) -> Vec<Recommendation> {
    let mut selected: Vec<Recommendation> = scores
        .iter()
        .flat_map(|(hazard, score)| {
            let level = RiskLevel::from_score(score);
            CATALOG
                .iter()
                .filter(move |rec| rec.risk_type == hazard && rec.risk_level == level)
                .cloned()
        })
        .collect();
    selected.sort_by_key(|rec| rec.priority);
    selected
}

/// One sentence per hazard describing its current level.
pub fn hazard_analysis(scores: &RiskScoreSet) -> BTreeMap<Hazard, &'static str> {
    scores
        .iter()
        .map(|(hazard, score)| (hazard, analysis_text(hazard, RiskLevel::from_score(score))))
        .collect()
}

fn analysis_text(hazard: Hazard, level: RiskLevel) -> &'static str {
    match (hazard, level) {
        (Hazard::Earthquake, RiskLevel::Critical) => {
            "This area carries critical earthquake risk. Structural retrofitting is urgent."
        }
        (Hazard::Earthquake, RiskLevel::High) => {
            "High earthquake risk. A structural inspection should be carried out."
        }
        (Hazard::Earthquake, RiskLevel::Medium) => {
            "Moderate earthquake risk. Preventive measures are advised."
        }
        (Hazard::Earthquake, _) => "Low earthquake risk. Standard precautions are sufficient.",
        (Hazard::Flood, RiskLevel::Critical) => {
            "Critical flood risk. Waterproofing and drainage are urgently needed."
        }
        (Hazard::Flood, RiskLevel::High) => "High flood risk. Preventive measures are advised.",
        (Hazard::Flood, RiskLevel::Medium) => {
            "Moderate flood risk. A drainage check is recommended."
        }
        (Hazard::Flood, _) => "Low flood risk. Standard precautions are sufficient.",
        (Hazard::Fire, RiskLevel::Critical) => {
            "Critical fire risk. Professional fire safety systems should be installed."
        }
        (Hazard::Fire, RiskLevel::High) => {
            "High fire risk. Review electrical wiring and safety equipment."
        }
        (Hazard::Fire, RiskLevel::Medium) => {
            "Moderate fire risk. An extinguisher and smoke alarm are recommended."
        }
        (Hazard::Fire, _) => "Low fire risk. Basic precautions are sufficient.",
        (Hazard::Landslide, RiskLevel::Critical) => {
            "Critical landslide risk. Retaining works and an expert survey are urgently needed."
        }
        (Hazard::Landslide, RiskLevel::High) => {
            "High landslide risk. A ground survey should be commissioned."
        }
        (Hazard::Landslide, RiskLevel::Medium) => {
            "Moderate landslide risk. A drainage check is recommended."
        }
        (Hazard::Landslide, _) => "Low landslide risk. Standard precautions are sufficient.",
    }
}

pub fn prevention_tips() -> &'static [&'static str] {
    &PREVENTION_TIPS
}
