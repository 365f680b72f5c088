use super::normalizer::normalize_label;
use crate::workflows::ttb::transactions::TransactionKind;
use std::collections::HashMap;
use std::sync::OnceLock;

static KIND_ALIASES: OnceLock<HashMap<&'static str, TransactionKind>> = OnceLock::new();

/// Resolve a ledger "Type" cell. Canonical keys and common cellar shorthand
/// are both accepted.
pub(crate) fn kind_for_label(label: &str) -> Option<TransactionKind> {
    let normalized = normalize_label(label);
    if let Ok(kind) =
        serde_json::from_value::<TransactionKind>(serde_json::Value::String(normalized.clone()))
    {
        return Some(kind);
    }
    aliases().get(normalized.as_str()).copied()
}

fn aliases() -> &'static HashMap<&'static str, TransactionKind> {
    KIND_ALIASES.get_or_init(|| {
        const ALIASES: &[(&str, TransactionKind)] = &[
            ("fermentation", TransactionKind::ProducedByFermentation),
            ("crush", TransactionKind::ProducedByFermentation),
            ("produced", TransactionKind::ProducedByFermentation),
            ("sweetening", TransactionKind::ProducedBySweetening),
            ("amelioration", TransactionKind::ProducedByAmelioration),
            (
                "produced_by_addition_of_wine_spirits",
                TransactionKind::ProducedByWineSpirits,
            ),
            ("fortification", TransactionKind::ProducedByWineSpirits),
            ("received", TransactionKind::ReceivedInBond),
            ("inventory_gain", TransactionKind::BulkInventoryGain),
            ("inventory_gains", TransactionKind::BulkInventoryGain),
            ("bottling", TransactionKind::Bottled),
            ("removed_taxpaid", TransactionKind::RemovedTaxpaidBulk),
            ("taxpaid_removal", TransactionKind::RemovedTaxpaidBulk),
            ("transfer_in_bond", TransactionKind::TransferredInBondBulk),
            ("transfers_in_bond", TransactionKind::TransferredInBondBulk),
            ("distilling_material", TransactionKind::RemovedForDistillingMaterial),
            ("vinegar", TransactionKind::RemovedToVinegarPlant),
            ("testing", TransactionKind::UsedForTesting),
            ("inventory_loss", TransactionKind::BulkInventoryLoss),
            ("inventory_losses", TransactionKind::BulkInventoryLoss),
            ("loss", TransactionKind::BulkInventoryLoss),
            ("returned_to_bond", TransactionKind::TaxpaidReturnedToBond),
            ("case_goods_sold", TransactionKind::RemovedTaxpaidBottled),
            ("dump_to_bulk", TransactionKind::DumpedToBulk),
            ("tasting", TransactionKind::UsedForTasting),
            ("tasting_room", TransactionKind::UsedForTasting),
            ("export", TransactionKind::RemovedForExport),
            ("family_use", TransactionKind::RemovedForFamilyUse),
            ("broken", TransactionKind::Breakage),
            ("shortage", TransactionKind::BottledInventoryShortage),
        ];

        ALIASES.iter().copied().collect()
    })
}

#[cfg(test)]
pub(crate) fn lookup_for_tests(label: &str) -> Option<TransactionKind> {
    kind_for_label(label)
}
