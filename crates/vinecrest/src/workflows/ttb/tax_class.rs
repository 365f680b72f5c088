use serde::{Deserialize, Serialize};

/// Revision of the classification rules below. Lots tagged under another
/// revision are retagged by the batch refresh.
pub const TAX_CLASS_RULES_VERSION: u32 = 1;

/// Upper ABV bound of the lowest still-wine band.
pub const TABLE_WINE_16_MAX_PCT: f64 = 16.0;
/// Upper ABV bound of the middle still-wine band.
pub const TABLE_WINE_21_MAX_PCT: f64 = 21.0;
/// Hard cider above this strength is taxed as still wine.
pub const HARD_CIDER_MAX_PCT: f64 = 8.5;

/// Column headings of TTB Form 5120.17, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxClass {
    #[serde(rename = "table_wine_16")]
    TableWine16,
    #[serde(rename = "table_wine_21")]
    TableWine21,
    #[serde(rename = "table_wine_24")]
    TableWine24,
    ArtificiallyCarbonated,
    SparklingBf,
    SparklingBp,
    HardCider,
}

impl TaxClass {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::TableWine16,
            Self::TableWine21,
            Self::TableWine24,
            Self::ArtificiallyCarbonated,
            Self::SparklingBf,
            Self::SparklingBp,
            Self::HardCider,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::TableWine16 => "table_wine_16",
            Self::TableWine21 => "table_wine_21",
            Self::TableWine24 => "table_wine_24",
            Self::ArtificiallyCarbonated => "artificially_carbonated",
            Self::SparklingBf => "sparkling_bf",
            Self::SparklingBp => "sparkling_bp",
            Self::HardCider => "hard_cider",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::TableWine16 => "Not over 16% alc/vol",
            Self::TableWine21 => "Over 16 to 21% alc/vol",
            Self::TableWine24 => "Over 21 to 24% alc/vol",
            Self::ArtificiallyCarbonated => "Artificially carbonated wine",
            Self::SparklingBf => "Sparkling wine (bottle fermented)",
            Self::SparklingBp => "Sparkling wine (bulk process)",
            Self::HardCider => "Hard cider",
        }
    }

    pub fn from_key(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|class| class.key() == normalized)
    }
}

/// Product style recorded on a lot; drives classification with ABV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WineType {
    Still,
    SparklingBottleFermented,
    SparklingBulkProcess,
    ArtificiallyCarbonated,
    HardCider,
}

impl WineType {
    pub fn from_key(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "still" | "table" | "red" | "white" | "rose" => Some(Self::Still),
            "sparkling_bottle_fermented" | "sparkling_bf" | "methode_champenoise" => {
                Some(Self::SparklingBottleFermented)
            }
            "sparkling_bulk_process" | "sparkling_bp" | "charmat" => {
                Some(Self::SparklingBulkProcess)
            }
            "artificially_carbonated" | "carbonated" => Some(Self::ArtificiallyCarbonated),
            "hard_cider" | "cider" => Some(Self::HardCider),
            _ => None,
        }
    }
}

/// Map a wine style and alcohol reading onto a TTB tax class.
///
/// An unmeasured (or non-positive) reading classifies into the lowest band.
/// Readings above 24% stay in the top still-wine band so their gallons are
/// never dropped from a report.
pub fn determine_tax_class(wine_type: WineType, alcohol_pct: Option<f64>) -> TaxClass {
    let abv = alcohol_pct.filter(|value| value.is_finite() && *value > 0.0);

    match wine_type {
        WineType::SparklingBottleFermented => TaxClass::SparklingBf,
        WineType::SparklingBulkProcess => TaxClass::SparklingBp,
        WineType::ArtificiallyCarbonated => TaxClass::ArtificiallyCarbonated,
        WineType::HardCider if abv.map_or(true, |pct| pct <= HARD_CIDER_MAX_PCT) => {
            TaxClass::HardCider
        }
        WineType::HardCider | WineType::Still => still_wine_band(abv),
    }
}

fn still_wine_band(abv: Option<f64>) -> TaxClass {
    match abv {
        None => TaxClass::TableWine16,
        Some(pct) if pct <= TABLE_WINE_16_MAX_PCT => TaxClass::TableWine16,
        Some(pct) if pct <= TABLE_WINE_21_MAX_PCT => TaxClass::TableWine21,
        Some(_) => TaxClass::TableWine24,
    }
}
