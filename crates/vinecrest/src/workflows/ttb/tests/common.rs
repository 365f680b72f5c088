use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::production::domain::{LotId, OwnerId};
use crate::workflows::production::repository::RepositoryError;
use crate::workflows::ttb::report::ReportId;
use crate::workflows::ttb::repository::{ReportRepository, StoredReport, TransactionRepository};
use crate::workflows::ttb::tax_class::TaxClass;
use crate::workflows::ttb::transactions::{Transaction, TransactionId, TransactionKind};
use crate::workflows::ttb::{ttb_router, TtbReportService};

pub(super) fn owner() -> OwnerId {
    OwnerId("winery-1".to_string())
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn generated_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 3, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn tx(
    id: &str,
    kind: TransactionKind,
    tax_class: TaxClass,
    gallons: f64,
    on: NaiveDate,
) -> Transaction {
    Transaction {
        id: TransactionId(id.to_string()),
        owner: owner(),
        lot_id: LotId("lot-1".to_string()),
        kind,
        tax_class,
        gallons,
        date: on,
    }
}

/// January ledger: 100 gal fermented, 40 gal bottled, 12 gal sold from the
/// bottled account.
pub(super) fn january_ledger() -> Vec<Transaction> {
    vec![
        tx(
            "t-1",
            TransactionKind::ProducedByFermentation,
            TaxClass::TableWine16,
            100.0,
            date(2025, 1, 5),
        ),
        tx(
            "t-2",
            TransactionKind::Bottled,
            TaxClass::TableWine16,
            40.0,
            date(2025, 1, 20),
        ),
        tx(
            "t-3",
            TransactionKind::RemovedTaxpaidBottled,
            TaxClass::TableWine16,
            12.0,
            date(2025, 1, 28),
        ),
    ]
}

pub(super) type MemoryReportService = TtbReportService<MemoryTransactions, MemoryReports>;

pub(super) fn build_service(
    ledger: Vec<Transaction>,
) -> (MemoryReportService, Arc<MemoryTransactions>, Arc<MemoryReports>) {
    let transactions = Arc::new(MemoryTransactions::default());
    for transaction in ledger {
        transactions.insert(transaction).expect("seed transaction");
    }
    let reports = Arc::new(MemoryReports::default());
    let service = TtbReportService::new(transactions.clone(), reports.clone());
    (service, transactions, reports)
}

pub(super) fn router_with(ledger: Vec<Transaction>) -> axum::Router {
    let (service, _, _) = build_service(ledger);
    ttb_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[derive(Default, Clone)]
pub(super) struct MemoryTransactions {
    records: Arc<Mutex<Vec<Transaction>>>,
}

impl MemoryTransactions {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("ledger mutex poisoned").len()
    }
}

impl TransactionRepository for MemoryTransactions {
    fn insert(&self, transaction: Transaction) -> Result<Transaction, RepositoryError> {
        let mut guard = self.records.lock().expect("ledger mutex poisoned");
        if guard.iter().any(|existing| existing.id == transaction.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(transaction.clone());
        Ok(transaction)
    }

    fn insert_many(&self, transactions: Vec<Transaction>) -> Result<usize, RepositoryError> {
        let mut guard = self.records.lock().expect("ledger mutex poisoned");
        let mut ids: Vec<&TransactionId> = guard.iter().map(|existing| &existing.id).collect();
        for transaction in &transactions {
            if ids.contains(&&transaction.id) {
                return Err(RepositoryError::Conflict);
            }
            ids.push(&transaction.id);
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
        let guard = self.records.lock().expect("ledger mutex poisoned");
        Ok(guard
            .iter()
            .filter(|t| &t.owner == owner && t.date <= end)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryReports {
    records: Arc<Mutex<HashMap<(OwnerId, ReportId), StoredReport>>>,
}

impl ReportRepository for MemoryReports {
    fn save(&self, record: StoredReport) -> Result<StoredReport, RepositoryError> {
        let mut guard = self.records.lock().expect("report mutex poisoned");
        guard.insert(
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
        let guard = self.records.lock().expect("report mutex poisoned");
        Ok(guard.get(&(owner.clone(), id.clone())).cloned())
    }

    fn list(&self, owner: &OwnerId) -> Result<Vec<StoredReport>, RepositoryError> {
        let guard = self.records.lock().expect("report mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| &record.report.owner == owner)
            .cloned()
            .collect())
    }
}

pub(super) struct OfflineTransactions;

impl TransactionRepository for OfflineTransactions {
    fn insert(&self, _transaction: Transaction) -> Result<Transaction, RepositoryError> {
        Err(RepositoryError::Unavailable("ledger offline".to_string()))
    }

    fn insert_many(&self, _transactions: Vec<Transaction>) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("ledger offline".to_string()))
    }

    fn list_through(
        &self,
        _owner: &OwnerId,
        _end: NaiveDate,
    ) -> Result<Vec<Transaction>, RepositoryError> {
        Err(RepositoryError::Unavailable("ledger offline".to_string()))
    }
}
