use super::domain::{round2, RiskLevel, RiskScoreSet};

/// Weighted overall score, rounded to two decimals, and its level.
pub fn overall(scores: &RiskScoreSet) -> (f64, RiskLevel) {
    let score = round2(
        scores
            .iter()
            .map(|(hazard, value)| value * hazard.weight())
            .sum(),
    );
    (score, RiskLevel::from_score(score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn applies_fixed_weights() {
        let scores = RiskScoreSet {
            earthquake: 80.0,
            flood: 60.0,
            fire: 40.0,
            landslide: 20.0,
        };
        let (score, level) = overall(&scores);
        assert!((score - 58.0).abs() < 1e-2);
        assert_eq!(level, RiskLevel::High);
    }

    #[test]
    fn boundary_values_classify_into_the_higher_band() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(24.99), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(25.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(50.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(75.0), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_score(100.0), RiskLevel::Critical);
    }

    proptest! {
        #[test]
        fn overall_matches_weighted_formula(
            earthquake in 0.0f64..=100.0,
            flood in 0.0f64..=100.0,
            fire in 0.0f64..=100.0,
            landslide in 0.0f64..=100.0,
        ) {
            let scores = RiskScoreSet { earthquake, flood, fire, landslide };
            let expected = 0.4 * earthquake + 0.25 * flood + 0.2 * fire + 0.15 * landslide;
            let (score, level) = overall(&scores);
            prop_assert!((score - expected).abs() <= 1e-2);
            prop_assert_eq!(level, RiskLevel::from_score(score));
        }

        #[test]
        fn classification_is_monotonic(a in 0.0f64..=100.0, b in 0.0f64..=100.0) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(RiskLevel::from_score(low) <= RiskLevel::from_score(high));
            prop_assert_ne!(RiskLevel::from_score(a), RiskLevel::Unknown);
        }
    }
}
