use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::tax_class::{determine_tax_class, TaxClass, WineType};
use crate::workflows::production::domain::{LotId, OwnerId};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransactionId(pub String);

/// Ledger account on the wine premises report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Bulk,
    Bottled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Addition,
    Removal,
}

/// Form line a movement is posted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Posting {
    pub section: Section,
    pub direction: Direction,
    pub line: u8,
}

const fn bulk_in(line: u8) -> Posting {
    Posting {
        section: Section::Bulk,
        direction: Direction::Addition,
        line,
    }
}

const fn bulk_out(line: u8) -> Posting {
    Posting {
        section: Section::Bulk,
        direction: Direction::Removal,
        line,
    }
}

const fn bottled_in(line: u8) -> Posting {
    Posting {
        section: Section::Bottled,
        direction: Direction::Addition,
        line,
    }
}

const fn bottled_out(line: u8) -> Posting {
    Posting {
        section: Section::Bottled,
        direction: Direction::Removal,
        line,
    }
}

/// Movement type of a ledger entry. Bottling and dumping to bulk move wine
/// between the two accounts and therefore post twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    ProducedByFermentation,
    ProducedBySweetening,
    ProducedByWineSpirits,
    ProducedByBlending,
    ProducedByAmelioration,
    ReceivedInBond,
    BulkInventoryGain,
    OtherBulkAddition,
    Bottled,
    RemovedTaxpaidBulk,
    TransferredInBondBulk,
    RemovedForDistillingMaterial,
    RemovedToVinegarPlant,
    UsedForSweetening,
    UsedForWineSpirits,
    UsedForBlending,
    UsedForAmelioration,
    UsedForEffervescentWine,
    UsedForTesting,
    OtherBulkRemoval,
    BulkInventoryLoss,
    BottledReceivedInBond,
    TaxpaidReturnedToBond,
    OtherBottledAddition,
    RemovedTaxpaidBottled,
    TransferredInBondBottled,
    DumpedToBulk,
    UsedForTasting,
    RemovedForExport,
    RemovedForFamilyUse,
    BottledUsedForTesting,
    OtherBottledRemoval,
    Breakage,
    BottledInventoryShortage,
}

impl TransactionKind {
    pub const fn all() -> [Self; 34] {
        [
            Self::ProducedByFermentation,
            Self::ProducedBySweetening,
            Self::ProducedByWineSpirits,
            Self::ProducedByBlending,
            Self::ProducedByAmelioration,
            Self::ReceivedInBond,
            Self::BulkInventoryGain,
            Self::OtherBulkAddition,
            Self::Bottled,
            Self::RemovedTaxpaidBulk,
            Self::TransferredInBondBulk,
            Self::RemovedForDistillingMaterial,
            Self::RemovedToVinegarPlant,
            Self::UsedForSweetening,
            Self::UsedForWineSpirits,
            Self::UsedForBlending,
            Self::UsedForAmelioration,
            Self::UsedForEffervescentWine,
            Self::UsedForTesting,
            Self::OtherBulkRemoval,
            Self::BulkInventoryLoss,
            Self::BottledReceivedInBond,
            Self::TaxpaidReturnedToBond,
            Self::OtherBottledAddition,
            Self::RemovedTaxpaidBottled,
            Self::TransferredInBondBottled,
            Self::DumpedToBulk,
            Self::UsedForTasting,
            Self::RemovedForExport,
            Self::RemovedForFamilyUse,
            Self::BottledUsedForTesting,
            Self::OtherBottledRemoval,
            Self::Breakage,
            Self::BottledInventoryShortage,
        ]
    }

    pub fn postings(self) -> Vec<Posting> {
        match self {
            Self::ProducedByFermentation => vec![bulk_in(2)],
            Self::ProducedBySweetening => vec![bulk_in(3)],
            Self::ProducedByWineSpirits => vec![bulk_in(4)],
            Self::ProducedByBlending => vec![bulk_in(5)],
            Self::ProducedByAmelioration => vec![bulk_in(6)],
            Self::ReceivedInBond => vec![bulk_in(7)],
            Self::BulkInventoryGain => vec![bulk_in(9)],
            Self::OtherBulkAddition => vec![bulk_in(10)],
            Self::Bottled => vec![bulk_out(13), bottled_in(2)],
            Self::RemovedTaxpaidBulk => vec![bulk_out(14)],
            Self::TransferredInBondBulk => vec![bulk_out(15)],
            Self::RemovedForDistillingMaterial => vec![bulk_out(16)],
            Self::RemovedToVinegarPlant => vec![bulk_out(17)],
            Self::UsedForSweetening => vec![bulk_out(18)],
            Self::UsedForWineSpirits => vec![bulk_out(19)],
            Self::UsedForBlending => vec![bulk_out(20)],
            Self::UsedForAmelioration => vec![bulk_out(21)],
            Self::UsedForEffervescentWine => vec![bulk_out(22)],
            Self::UsedForTesting => vec![bulk_out(23)],
            Self::OtherBulkRemoval => vec![bulk_out(24)],
            Self::BulkInventoryLoss => vec![bulk_out(29)],
            Self::BottledReceivedInBond => vec![bottled_in(3)],
            Self::TaxpaidReturnedToBond => vec![bottled_in(4)],
            Self::OtherBottledAddition => vec![bottled_in(5)],
            Self::RemovedTaxpaidBottled => vec![bottled_out(8)],
            Self::TransferredInBondBottled => vec![bottled_out(9)],
            Self::DumpedToBulk => vec![bottled_out(10), bulk_in(8)],
            Self::UsedForTasting => vec![bottled_out(11)],
            Self::RemovedForExport => vec![bottled_out(12)],
            Self::RemovedForFamilyUse => vec![bottled_out(13)],
            Self::BottledUsedForTesting => vec![bottled_out(14)],
            Self::OtherBottledRemoval => vec![bottled_out(15)],
            Self::Breakage => vec![bottled_out(16)],
            Self::BottledInventoryShortage => vec![bottled_out(17)],
        }
    }

    /// Direction of the first posting, i.e. how the movement reads on the
    /// account it originates from.
    pub fn direction(self) -> Direction {
        self.postings()
            .first()
            .map(|posting| posting.direction)
            .unwrap_or(Direction::Addition)
    }
}

/// Single bulk or bottled wine movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub owner: OwnerId,
    pub lot_id: LotId,
    pub kind: TransactionKind,
    pub tax_class: TaxClass,
    pub gallons: f64,
    pub date: NaiveDate,
}

impl Transaction {
    /// Build a transaction whose tax class is derived from the wine itself.
    #[allow(clippy::too_many_arguments)]
    pub fn classified(
        id: impl Into<String>,
        owner: OwnerId,
        lot_id: LotId,
        kind: TransactionKind,
        wine_type: WineType,
        alcohol_pct: Option<f64>,
        gallons: f64,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: TransactionId(id.into()),
            owner,
            lot_id,
            kind,
            tax_class: determine_tax_class(wine_type, alcohol_pct),
            gallons,
            date,
        }
    }
}
