use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use vinecrest::workflows::production::{
    Lot, LotId, LotRepository, LotStatus, OwnerId, RepositoryError, TaxClassUpdate,
};
use vinecrest::workflows::ttb::{
    ReportId, ReportRepository, StoredReport, Transaction, TransactionRepository, WineType,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn acquire<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("in-memory store poisoned".to_string()))
}

/// Lots keyed by owner and id. Reads always carry a loaded barrel relation.
#[derive(Default, Clone)]
pub(crate) struct InMemoryLotRepository {
    lots: Arc<Mutex<HashMap<(OwnerId, LotId), Lot>>>,
}

fn with_relations(mut lot: Lot) -> Lot {
    lot.barrel_assignments.get_or_insert_with(Vec::new);
    lot
}

impl LotRepository for InMemoryLotRepository {
    fn upsert(&self, lot: Lot) -> Result<Lot, RepositoryError> {
        let lot = with_relations(lot);
        acquire(&self.lots)?.insert((lot.owner.clone(), lot.id.clone()), lot.clone());
        Ok(lot)
    }

    fn fetch(&self, owner: &OwnerId, id: &LotId) -> Result<Option<Lot>, RepositoryError> {
        let guard = acquire(&self.lots)?;
        Ok(guard.get(&(owner.clone(), id.clone())).cloned())
    }

    fn list(&self, owner: &OwnerId) -> Result<Vec<Lot>, RepositoryError> {
        let guard = acquire(&self.lots)?;
        Ok(guard
            .values()
            .filter(|lot| &lot.owner == owner)
            .cloned()
            .collect())
    }

    fn update_status(
        &self,
        owner: &OwnerId,
        id: &LotId,
        status: LotStatus,
    ) -> Result<Lot, RepositoryError> {
        let mut guard = acquire(&self.lots)?;
        let lot = guard
            .get_mut(&(owner.clone(), id.clone()))
            .ok_or(RepositoryError::NotFound)?;
        lot.status = status;
        Ok(lot.clone())
    }

    fn update_tax_classes(
        &self,
        owner: &OwnerId,
        updates: &[TaxClassUpdate],
    ) -> Result<usize, RepositoryError> {
        let mut guard = acquire(&self.lots)?;
        let mut changed = 0;
        for update in updates {
            if let Some(lot) = guard.get_mut(&(owner.clone(), update.lot_id.clone())) {
                lot.tax_class = Some(update.tax_class);
                lot.tax_class_rules_version = Some(update.rules_version);
                changed += 1;
            }
        }
        Ok(changed)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryTransactionRepository {
    records: Arc<Mutex<Vec<Transaction>>>,
}

impl TransactionRepository for InMemoryTransactionRepository {
    fn insert(&self, transaction: Transaction) -> Result<Transaction, RepositoryError> {
        let mut guard = acquire(&self.records)?;
        if guard
            .iter()
            .any(|existing| existing.owner == transaction.owner && existing.id == transaction.id)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.push(transaction.clone());
        Ok(transaction)
    }

    fn insert_many(&self, transactions: Vec<Transaction>) -> Result<usize, RepositoryError> {
        let mut guard = acquire(&self.records)?;
        for (index, transaction) in transactions.iter().enumerate() {
            let same = |other: &Transaction| {
                other.owner == transaction.owner && other.id == transaction.id
            };
            if guard.iter().any(same) || transactions[..index].iter().any(same) {
                return Err(RepositoryError::Conflict);
            }
        }
        let count = transactions.len();
        guard.extend(transactions);
        Ok(count)
    }

    fn list_through(
        &self,
        owner: &OwnerId,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>, RepositoryError> {
        let guard = acquire(&self.records)?;
        Ok(guard
            .iter()
            .filter(|transaction| &transaction.owner == owner && transaction.date <= end)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryReportRepository {
    records: Arc<Mutex<HashMap<(OwnerId, ReportId), StoredReport>>>,
}

impl ReportRepository for InMemoryReportRepository {
    fn save(&self, record: StoredReport) -> Result<StoredReport, RepositoryError> {
        acquire(&self.records)?.insert(
            (record.report.owner.clone(), record.report.id.clone()),
            record.clone(),
        );
        Ok(record)
    }

    fn fetch(
        &self,
        owner: &OwnerId,
        id: &ReportId,
    ) -> Result<Option<StoredReport>, RepositoryError> {
        let guard = acquire(&self.records)?;
        Ok(guard.get(&(owner.clone(), id.clone())).cloned())
    }

    fn list(&self, owner: &OwnerId) -> Result<Vec<StoredReport>, RepositoryError> {
        let guard = acquire(&self.records)?;
        Ok(guard
            .values()
            .filter(|record| &record.report.owner == owner)
            .cloned()
            .collect())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_wine_type(raw: &str) -> Result<WineType, String> {
    WineType::from_key(raw).ok_or_else(|| {
        format!(
            "unknown wine type '{raw}' (expected still, sparkling_bf, sparkling_bp, \
             artificially_carbonated, or hard_cider)"
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> OwnerId {
        OwnerId("winery-1".to_string())
    }

    #[test]
    fn lot_repository_scopes_reads_by_owner() {
        let repository = InMemoryLotRepository::default();
        let lot = Lot::new("lot-1", owner(), "Block A", LotStatus::Aging, 40.0);
        repository.upsert(lot).expect("insert");

        let fetched = repository
            .fetch(&owner(), &LotId("lot-1".into()))
            .expect("fetch")
            .expect("present");
        assert_eq!(fetched.barrel_assignments, Some(Vec::new()));
        assert!(repository
            .fetch(&OwnerId("other".into()), &LotId("lot-1".into()))
            .expect("fetch")
            .is_none());
    }

    #[test]
    fn poisoned_store_reports_unavailable() {
        let repository = InMemoryTransactionRepository::default();
        let records = repository.records.clone();
        let _ = std::thread::spawn(move || {
            let _guard = records.lock().unwrap();
            panic!("poison the ledger");
        })
        .join();

        let error = repository
            .list_through(&owner(), NaiveDate::from_ymd_opt(2025, 1, 31).unwrap())
            .expect_err("poisoned");
        assert!(matches!(error, RepositoryError::Unavailable(_)));
    }

    fn bottling(id: &str) -> Transaction {
        Transaction {
            id: vinecrest::workflows::ttb::TransactionId(id.into()),
            owner: owner(),
            lot_id: LotId("lot-1".into()),
            kind: vinecrest::workflows::ttb::TransactionKind::Bottled,
            tax_class: vinecrest::workflows::ttb::TaxClass::TableWine16,
            gallons: 10.0,
            date: NaiveDate::from_ymd_opt(2025, 1, 4).unwrap(),
        }
    }

    fn stored_count(repository: &InMemoryTransactionRepository) -> usize {
        repository
            .list_through(&owner(), NaiveDate::from_ymd_opt(2025, 12, 31).unwrap())
            .expect("list")
            .len()
    }

    #[test]
    fn duplicate_transaction_ids_conflict() {
        let repository = InMemoryTransactionRepository::default();
        let transaction = bottling("t-1");
        repository.insert(transaction.clone()).expect("first insert");
        assert!(matches!(
            repository.insert(transaction),
            Err(RepositoryError::Conflict)
        ));
    }

    #[test]
    fn batch_with_repeated_id_stores_nothing() {
        let repository = InMemoryTransactionRepository::default();
        let batch = vec![bottling("a"), bottling("b"), bottling("a")];

        assert!(matches!(
            repository.insert_many(batch),
            Err(RepositoryError::Conflict)
        ));
        assert_eq!(stored_count(&repository), 0);
    }

    #[test]
    fn batch_clashing_with_stored_row_stores_nothing() {
        let repository = InMemoryTransactionRepository::default();
        repository.insert(bottling("b")).expect("seed");

        let result = repository.insert_many(vec![bottling("a"), bottling("b")]);
        assert!(matches!(result, Err(RepositoryError::Conflict)));
        assert_eq!(stored_count(&repository), 1);

        let mut other_owner = bottling("b");
        other_owner.owner = OwnerId("winery-2".into());
        assert_eq!(
            repository
                .insert_many(vec![bottling("a"), other_owner])
                .expect("distinct ids"),
            2
        );
        assert_eq!(stored_count(&repository), 2);
    }

    #[test]
    fn wine_type_parser_reports_choices() {
        assert_eq!(parse_wine_type("cider"), Ok(WineType::HardCider));
        let error = parse_wine_type("mead").expect_err("unknown");
        assert!(error.contains("hard_cider"));
    }
}
