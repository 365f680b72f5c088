use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::production::domain::{Lot, LotId, LotStatus, OwnerId};
use crate::workflows::production::readiness::ReadinessConfig;
use crate::workflows::production::repository::{LotRepository, RepositoryError, TaxClassUpdate};
use crate::workflows::production::{lot_router, LotService};
use crate::workflows::OWNER_HEADER;

pub(super) fn owner() -> OwnerId {
    OwnerId("winery-1".to_string())
}

pub(super) fn other_owner() -> OwnerId {
    OwnerId("winery-2".to_string())
}

pub(super) fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn now() -> DateTime<Utc> {
    at(2025, 6, 15)
}

/// Small fermenting lot with nothing measured.
pub(super) fn fermenting_lot() -> Lot {
    let mut lot = Lot::new("lot-ferment", owner(), "", LotStatus::Fermenting, 5.0);
    lot.current_alcohol_pct = Some(0.0);
    lot
}

/// Finished lot that clears every gate.
pub(super) fn ready_lot() -> Lot {
    let mut lot = Lot::new("lot-ready", owner(), "Block A", LotStatus::ReadyToBottle, 50.0);
    lot.current_alcohol_pct = Some(13.5);
    lot.current_ph = Some(3.4);
    lot
}

pub(super) fn aging_lot() -> Lot {
    let mut lot = Lot::new("lot-aging", owner(), "Estate Syrah", LotStatus::Aging, 120.0);
    lot.current_alcohol_pct = Some(14.2);
    lot.current_ta = Some(6.1);
    lot.container_name = Some("Barrel 12".to_string());
    lot.aging_start_date = Some(at(2024, 11, 2));
    lot
}

pub(super) fn build_service() -> (LotService<MemoryLotRepository>, Arc<MemoryLotRepository>) {
    let repository = Arc::new(MemoryLotRepository::default());
    let service = LotService::new(repository.clone(), ReadinessConfig::default());
    (service, repository)
}

pub(super) fn seeded_service(
    lots: Vec<Lot>,
) -> (LotService<MemoryLotRepository>, Arc<MemoryLotRepository>) {
    let (service, repository) = build_service();
    for lot in lots {
        repository.upsert(lot).expect("seed lot");
    }
    (service, repository)
}

pub(super) fn router_with(lots: Vec<Lot>) -> axum::Router {
    let (service, _) = seeded_service(lots);
    lot_router(Arc::new(service))
}

pub(super) fn get_request(uri: &str) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::get(uri)
        .header(OWNER_HEADER, owner().0)
        .body(axum::body::Body::empty())
        .unwrap()
}

pub(super) fn post_request(uri: &str) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post(uri)
        .header(OWNER_HEADER, owner().0)
        .body(axum::body::Body::empty())
        .unwrap()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[derive(Default, Clone)]
pub(super) struct MemoryLotRepository {
    lots: Arc<Mutex<HashMap<(OwnerId, LotId), Lot>>>,
    bulk_writes: Arc<Mutex<usize>>,
}

impl MemoryLotRepository {
    pub(super) fn bulk_writes(&self) -> usize {
        *self.bulk_writes.lock().expect("write counter poisoned")
    }

    pub(super) fn stored(&self, owner: &OwnerId, id: &str) -> Option<Lot> {
        self.lots
            .lock()
            .expect("repository mutex poisoned")
            .get(&(owner.clone(), LotId(id.to_string())))
            .cloned()
    }
}

fn loaded(mut lot: Lot) -> Lot {
    lot.barrel_assignments.get_or_insert_with(Vec::new);
    lot
}

impl LotRepository for MemoryLotRepository {
    fn upsert(&self, lot: Lot) -> Result<Lot, RepositoryError> {
        let mut guard = self.lots.lock().expect("repository mutex poisoned");
        guard.insert((lot.owner.clone(), lot.id.clone()), lot.clone());
        Ok(loaded(lot))
    }

    fn fetch(&self, owner: &OwnerId, id: &LotId) -> Result<Option<Lot>, RepositoryError> {
        let guard = self.lots.lock().expect("repository mutex poisoned");
        Ok(guard.get(&(owner.clone(), id.clone())).cloned().map(loaded))
    }

    fn list(&self, owner: &OwnerId) -> Result<Vec<Lot>, RepositoryError> {
        let guard = self.lots.lock().expect("repository mutex poisoned");
        let mut lots: Vec<Lot> = guard
            .values()
            .filter(|lot| &lot.owner == owner)
            .cloned()
            .map(loaded)
            .collect();
        lots.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(lots)
    }

    fn update_status(
        &self,
        owner: &OwnerId,
        id: &LotId,
        status: LotStatus,
    ) -> Result<Lot, RepositoryError> {
        let mut guard = self.lots.lock().expect("repository mutex poisoned");
        let lot = guard
            .get_mut(&(owner.clone(), id.clone()))
            .ok_or(RepositoryError::NotFound)?;
        lot.status = status;
        Ok(loaded(lot.clone()))
    }

    fn update_tax_classes(
        &self,
        owner: &OwnerId,
        updates: &[TaxClassUpdate],
    ) -> Result<usize, RepositoryError> {
        let mut guard = self.lots.lock().expect("repository mutex poisoned");
        *self.bulk_writes.lock().expect("write counter poisoned") += 1;
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

pub(super) struct UnavailableRepository;

impl LotRepository for UnavailableRepository {
    fn upsert(&self, _lot: Lot) -> Result<Lot, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _owner: &OwnerId, _id: &LotId) -> Result<Option<Lot>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _owner: &OwnerId) -> Result<Vec<Lot>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_status(
        &self,
        _owner: &OwnerId,
        _id: &LotId,
        _status: LotStatus,
    ) -> Result<Lot, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_tax_classes(
        &self,
        _owner: &OwnerId,
        _updates: &[TaxClassUpdate],
    ) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
