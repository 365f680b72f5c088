use super::common::*;

use crate::workflows::production::aging::{
    aging_start_date, calendar_months_for_tests, compute_aging_months, AgingSource,
};
use crate::workflows::production::domain::{BarrelAssignment, Lot, LotStatus};

fn bare_lot() -> Lot {
    Lot::new("lot-1", owner(), "Block A", LotStatus::Aging, 60.0)
}

#[test]
fn explicit_aging_start_wins_over_other_dates() {
    let mut lot = bare_lot();
    lot.aging_start_date = Some(at(2024, 9, 1));
    lot.fermentation_end_date = Some(at(2024, 8, 1));
    lot.barrel_assignments = Some(vec![BarrelAssignment {
        assigned_at: at(2024, 7, 1),
        barrel_code: Some("B-7".to_string()),
    }]);

    let start = aging_start_date(&lot);
    assert_eq!(start.source, AgingSource::AgingStartDate);
    assert_eq!(start.date, Some(at(2024, 9, 1)));
    assert!(!start.is_unknown);
}

#[test]
fn earliest_barrel_assignment_precedes_fermentation_end() {
    let mut lot = bare_lot();
    lot.fermentation_end_date = Some(at(2024, 6, 1));
    lot.barrel_assignments = Some(vec![
        BarrelAssignment {
            assigned_at: at(2024, 10, 3),
            barrel_code: None,
        },
        BarrelAssignment {
            assigned_at: at(2024, 8, 20),
            barrel_code: Some("B-2".to_string()),
        },
    ]);

    let start = aging_start_date(&lot);
    assert_eq!(start.source, AgingSource::BarrelAssignment);
    assert_eq!(start.date, Some(at(2024, 8, 20)));
}

#[test]
fn empty_barrel_relation_falls_through_to_fermentation_end() {
    let mut lot = bare_lot();
    lot.barrel_assignments = Some(Vec::new());
    lot.fermentation_end_date = Some(at(2024, 10, 31));

    let start = aging_start_date(&lot);
    assert_eq!(start.source, AgingSource::FermentationEndDate);
    assert_eq!(compute_aging_months(&lot, now()), 8);
}

#[test]
fn lot_without_dates_is_unknown_with_zero_months() {
    let lot = bare_lot();

    let start = aging_start_date(&lot);
    assert!(start.is_unknown);
    assert_eq!(start.source, AgingSource::Unknown);
    assert_eq!(start.date, None);
    assert_eq!(compute_aging_months(&lot, now()), 0);
}

#[test]
fn months_use_calendar_difference_not_days() {
    assert_eq!(calendar_months_for_tests(at(2025, 1, 31), at(2025, 2, 1)), 1);
    assert_eq!(calendar_months_for_tests(at(2024, 12, 1), at(2025, 12, 31)), 12);
    assert_eq!(calendar_months_for_tests(at(2025, 6, 1), at(2025, 6, 30)), 0);
}

#[test]
fn future_start_floors_at_zero() {
    let mut lot = bare_lot();
    lot.aging_start_date = Some(at(2026, 1, 1));
    assert_eq!(compute_aging_months(&lot, now()), 0);
    assert!(!aging_start_date(&lot).is_unknown);
}
