mod mapping;
mod normalizer;
mod parser;

use crate::workflows::production::domain::{LotId, OwnerId};
use crate::workflows::ttb::tax_class::{determine_tax_class, TaxClass, WineType};
use crate::workflows::ttb::transactions::{Transaction, TransactionId};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use parser::LedgerRecord;

/// Row-level problem found while importing a ledger export.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerRowError {
    UnknownType(String),
    InvalidDate(String),
    InvalidGallons(f64),
    UnknownTaxClass(String),
    UnknownWineType(String),
    MissingLot,
}

impl std::fmt::Display for LedgerRowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerRowError::UnknownType(raw) => write!(f, "unknown transaction type '{}'", raw),
            LedgerRowError::InvalidDate(raw) => write!(f, "unparseable date '{}'", raw),
            LedgerRowError::InvalidGallons(gallons) => {
                write!(f, "gallons must be a non-negative number, got {}", gallons)
            }
            LedgerRowError::UnknownTaxClass(raw) => write!(f, "unknown tax class '{}'", raw),
            LedgerRowError::UnknownWineType(raw) => write!(f, "unknown wine type '{}'", raw),
            LedgerRowError::MissingLot => write!(f, "lot is blank"),
        }
    }
}

#[derive(Debug)]
pub enum LedgerImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Row { line: usize, reason: LedgerRowError },
}

impl std::fmt::Display for LedgerImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerImportError::Io(err) => write!(f, "failed to read ledger export: {}", err),
            LedgerImportError::Csv(err) => write!(f, "invalid ledger CSV data: {}", err),
            LedgerImportError::Row { line, reason } => {
                write!(f, "ledger line {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for LedgerImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LedgerImportError::Io(err) => Some(err),
            LedgerImportError::Csv(err) => Some(err),
            LedgerImportError::Row { .. } => None,
        }
    }
}

impl From<std::io::Error> for LedgerImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for LedgerImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads cellar ledger exports (`Date,Lot,Type,Gallons[,Tax Class,Wine Type,Alcohol %,ID]`)
/// into owner-scoped transactions.
pub struct LedgerImporter;

impl LedgerImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        owner: &OwnerId,
    ) -> Result<Vec<Transaction>, LedgerImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, owner)
    }

    /// Zero-gallon rows are skipped; any malformed row aborts the import.
    ///
    /// Rows without an `ID` column get an id derived from their date, lot,
    /// type and gallons, so the same export always yields the same ids while
    /// different exports do not collide. Identical rows within one export are
    /// numbered in order of appearance.
    pub fn from_reader<R: Read>(
        reader: R,
        owner: &OwnerId,
    ) -> Result<Vec<Transaction>, LedgerImportError> {
        let mut transactions = Vec::new();
        let mut occurrences = HashMap::new();

        for record in parser::parse_records(reader)? {
            let line = record.line;
            match build_transaction(record, owner, &mut occurrences) {
                Ok(Some(transaction)) => transactions.push(transaction),
                Ok(None) => continue,
                Err(reason) => return Err(LedgerImportError::Row { line, reason }),
            }
        }

        Ok(transactions)
    }
}

fn build_transaction(
    record: LedgerRecord,
    owner: &OwnerId,
    occurrences: &mut HashMap<String, usize>,
) -> Result<Option<Transaction>, LedgerRowError> {
    if !record.gallons.is_finite() || record.gallons < 0.0 {
        return Err(LedgerRowError::InvalidGallons(record.gallons));
    }
    if record.gallons == 0.0 {
        return Ok(None);
    }

    let lot = record.lot.trim();
    if lot.is_empty() {
        return Err(LedgerRowError::MissingLot);
    }

    let kind = mapping::kind_for_label(&record.kind)
        .ok_or_else(|| LedgerRowError::UnknownType(record.kind.clone()))?;
    let date =
        parser::parse_date(&record.date).ok_or_else(|| LedgerRowError::InvalidDate(record.date))?;

    let tax_class = match record.tax_class {
        Some(raw) => TaxClass::from_key(&normalizer::normalize_label(&raw))
            .ok_or(LedgerRowError::UnknownTaxClass(raw))?,
        None => {
            let wine_type = match record.wine_type {
                Some(raw) => {
                    WineType::from_key(&raw).ok_or(LedgerRowError::UnknownWineType(raw))?
                }
                None => WineType::Still,
            };
            determine_tax_class(wine_type, record.alcohol_pct)
        }
    };

    let id = match record.id {
        Some(id) => id,
        None => {
            let base = format!(
                "{}-{}-{}-{}-{}",
                owner,
                date.format("%Y%m%d"),
                lot,
                normalizer::normalize_label(&record.kind),
                record.gallons
            );
            let seen = occurrences.entry(base.clone()).or_insert(0);
            *seen += 1;
            if *seen == 1 {
                base
            } else {
                format!("{}-{}", base, seen)
            }
        }
    };

    Ok(Some(Transaction {
        id: TransactionId(id),
        owner: owner.clone(),
        lot_id: LotId(lot.to_string()),
        kind,
        tax_class,
        gallons: record.gallons,
        date,
    }))
}
