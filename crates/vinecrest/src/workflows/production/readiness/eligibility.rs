use super::super::domain::{Lot, LotStatus};
use super::config::BottlingPolicy;
use serde::{Deserialize, Serialize};

/// Machine-readable tag for a failing bottling gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockerKind {
    Volume,
    Abv,
    Name,
    StatusProduction,
    StatusNearlyReady,
    Lab,
}

/// Remediation link the UI can offer next to a blocker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockerAction {
    pub label: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotBlocker {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: BlockerKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<BlockerAction>,
}

fn passes_material_gates(lot: &Lot, policy: &BottlingPolicy) -> bool {
    policy.volume_sufficient(lot.current_volume_gallons)
        && lot.measured_alcohol_pct().is_some()
        && lot.has_name()
}

/// Strict bottling gate. Only `ready_to_bottle` lots ever pass.
pub(crate) fn is_eligible(lot: &Lot, policy: &BottlingPolicy) -> bool {
    passes_material_gates(lot, policy) && lot.status == LotStatus::ReadyToBottle
}

/// Same material gates as [`is_eligible`], for lots still aging or blending.
pub(crate) fn is_nearly_ready(lot: &Lot, policy: &BottlingPolicy) -> bool {
    passes_material_gates(lot, policy) && lot.status.is_finishing()
}

pub(crate) fn blockers(lot: &Lot, policy: &BottlingPolicy) -> Vec<LotBlocker> {
    let mut blockers = Vec::new();
    let lot_path = format!("/production/lots/{}", lot.id);

    if !policy.volume_sufficient(lot.current_volume_gallons) {
        blockers.push(LotBlocker {
            message: format!(
                "Volume {:.1} gal is below the {:.0} gal bottling minimum",
                lot.current_volume_gallons, policy.min_volume_gallons
            ),
            kind: BlockerKind::Volume,
            action: Some(BlockerAction {
                label: "Update volume".to_string(),
                path: lot_path.clone(),
            }),
        });
    }

    if lot.measured_alcohol_pct().is_none() {
        blockers.push(LotBlocker {
            message: "Alcohol content has not been measured".to_string(),
            kind: BlockerKind::Abv,
            action: Some(BlockerAction {
                label: "Record lab analysis".to_string(),
                path: format!("/production/lab?lot={}", lot.id),
            }),
        });
    }

    if !lot.has_name() {
        blockers.push(LotBlocker {
            message: "Lot needs a name before bottling".to_string(),
            kind: BlockerKind::Name,
            action: Some(BlockerAction {
                label: "Name this lot".to_string(),
                path: lot_path.clone(),
            }),
        });
    }

    match lot.status {
        LotStatus::ReadyToBottle => {}
        LotStatus::Bottled => blockers.push(LotBlocker {
            message: "Lot has already been bottled".to_string(),
            kind: BlockerKind::StatusProduction,
            action: None,
        }),
        status if status.is_finishing() => blockers.push(LotBlocker {
            message: format!(
                "Lot is {}; mark it ready to bottle once finished",
                status.label().to_lowercase()
            ),
            kind: BlockerKind::StatusNearlyReady,
            action: Some(BlockerAction {
                label: "Mark ready to bottle".to_string(),
                path: lot_path.clone(),
            }),
        }),
        status => blockers.push(LotBlocker {
            message: format!(
                "Lot is still in production ({})",
                status.label().to_lowercase()
            ),
            kind: BlockerKind::StatusProduction,
            action: None,
        }),
    }

    if lot.status == LotStatus::ReadyToBottle && !lot.has_lab_data() {
        blockers.push(LotBlocker {
            message: "No pre-bottling lab panel on record (pH, TA, ABV)".to_string(),
            kind: BlockerKind::Lab,
            action: Some(BlockerAction {
                label: "Record lab analysis".to_string(),
                path: format!("/production/lab?lot={}", lot.id),
            }),
        });
    }

    blockers
}
