use super::common::*;

use crate::workflows::production::domain::LotStatus;
use crate::workflows::production::readiness::{
    compute_readiness, readiness_explanation, BottlingPolicy, FactorMark, ReadinessConfig,
    ReadinessEngine, ReadinessFactor, ScoringPolicy,
};

#[test]
fn ready_lot_scores_at_least_eighty() {
    // 50 + 10 volume + 10 abv + 20 status + 10 lab
    assert_eq!(compute_readiness(&ready_lot()), 100);
}

#[test]
fn fermenting_lot_bottoms_out() {
    // 50 - 30 volume - 20 abv + 0 status - 10 lab
    assert_eq!(compute_readiness(&fermenting_lot()), 0);
}

#[test]
fn status_bonus_is_graduated() {
    let mut lot = ready_lot();
    lot.current_volume_gallons = 5.0;
    let ready = compute_readiness(&lot);

    lot.status = LotStatus::Aging;
    let aging = compute_readiness(&lot);
    lot.status = LotStatus::Blending;
    let blending = compute_readiness(&lot);
    lot.status = LotStatus::Filtering;
    let filtering = compute_readiness(&lot);

    assert_eq!(ready, 60);
    assert_eq!(aging, 50);
    assert_eq!(blending, 45);
    assert_eq!(filtering, 40);
}

#[test]
fn named_container_adds_points() {
    let mut lot = ready_lot();
    lot.current_volume_gallons = 5.0;
    let without = compute_readiness(&lot);
    lot.container_name = Some("Tank 4".to_string());
    assert_eq!(compute_readiness(&lot), without + 5);

    lot.container_name = Some("   ".to_string());
    assert_eq!(compute_readiness(&lot), without);
}

#[test]
fn breakdown_follows_fixed_rule_order_with_glyphs() {
    let explanation = readiness_explanation(&aging_lot());

    assert_eq!(explanation.breakdown.len(), 5);
    assert!(explanation.breakdown[0].starts_with("✓ Volume"));
    assert!(explanation.breakdown[1].starts_with("✓ ABV"));
    assert!(explanation.breakdown[2].starts_with("○ Status Aging"));
    assert!(explanation.breakdown[3].starts_with("✓ Lab"));
    assert_eq!(explanation.breakdown[4], "✓ Stored in Barrel 12");
    assert_eq!(explanation.policy_version, 1);
    assert!(explanation.nearly_ready);
    assert!(!explanation.eligible);
}

#[test]
fn components_expose_factor_marks() {
    let engine = ReadinessEngine::default();
    let components = engine.components(&fermenting_lot());

    let factors: Vec<ReadinessFactor> = components.iter().map(|c| c.factor).collect();
    assert_eq!(
        factors,
        vec![
            ReadinessFactor::Volume,
            ReadinessFactor::Alcohol,
            ReadinessFactor::Status,
            ReadinessFactor::LabData,
            ReadinessFactor::Container,
        ]
    );
    assert_eq!(components[0].mark, FactorMark::Fail);
    assert_eq!(components[4].mark, FactorMark::Neutral);
}

#[test]
fn minimum_volume_is_configurable() {
    let config = ReadinessConfig {
        bottling: BottlingPolicy {
            min_volume_gallons: 60.0,
        },
        scoring: ScoringPolicy::v1(),
    };
    let engine = ReadinessEngine::new(config);

    let lot = ready_lot();
    assert!(!engine.is_eligible(&lot));
    assert_eq!(engine.score(&lot), 60);
    assert!(crate::workflows::production::is_lot_eligible(&lot));
}

#[test]
fn reweighted_policy_changes_score_and_version() {
    let scoring = ScoringPolicy {
        version: 2,
        status_ready_to_bottle: 0,
        ..ScoringPolicy::v1()
    };
    let engine = ReadinessEngine::new(ReadinessConfig {
        scoring,
        ..ReadinessConfig::default()
    });

    let mut lot = ready_lot();
    lot.current_volume_gallons = 5.0;
    assert_eq!(engine.score(&lot), 40);
    assert_eq!(engine.explain(&lot).policy_version, 2);
}
