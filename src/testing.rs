//! In-memory `CourierApi` used by unit tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio::sync::Semaphore;

use crate::models::{Alert, Package, PackageStatus, PackageUpdate, SubmitReceipt};
use crate::network::api::CourierApi;
use crate::network::error::ApiError;

pub fn package(id: &str) -> Package {
    Package {
        record_id: None,
        package_id: id.to_string(),
        current_status: PackageStatus::InTransit,
        current_lat: None,
        current_lon: None,
        last_updated: Utc::now(),
        event_history: Vec::new(),
        eta: None,
        received_at: None,
        current_status_timestamp: None,
        is_stuck_alert_triggered: false,
    }
}

pub fn update(package_id: Option<&str>) -> PackageUpdate {
    PackageUpdate {
        package_id: package_id.map(str::to_string),
        status: PackageStatus::PickedUp,
        lat: None,
        lon: None,
        timestamp: Utc::now(),
        note: None,
    }
}

/// Records what was sent through the submit endpoints
#[derive(Debug, Clone, PartialEq)]
pub enum Submitted {
    Create(PackageUpdate),
    Update(String, PackageUpdate),
}

pub struct FakeApi {
    packages: Mutex<Result<Vec<Package>, ApiError>>,
    alerts: Mutex<Result<Vec<Alert>, ApiError>>,
    lookup: Mutex<Result<Option<Package>, ApiError>>,
    receipt: Mutex<Result<SubmitReceipt, ApiError>>,
    packages_gate: Mutex<Option<Arc<Semaphore>>>,
    submitted: Mutex<Vec<Submitted>>,
    package_calls: AtomicUsize,
    alert_calls: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        FakeApi {
            packages: Mutex::new(Ok(Vec::new())),
            alerts: Mutex::new(Ok(Vec::new())),
            lookup: Mutex::new(Ok(None)),
            receipt: Mutex::new(Ok(SubmitReceipt::default())),
            packages_gate: Mutex::new(None),
            submitted: Mutex::new(Vec::new()),
            package_calls: AtomicUsize::new(0),
            alert_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_packages(self, packages: Vec<Package>) -> Self {
        *self.packages.lock().unwrap() = Ok(packages);
        self
    }

    pub fn with_lookup(self, found: Option<Package>) -> Self {
        *self.lookup.lock().unwrap() = Ok(found);
        self
    }

    pub fn with_receipt(self, receipt: Result<SubmitReceipt, ApiError>) -> Self {
        *self.receipt.lock().unwrap() = receipt;
        self
    }

    pub fn fail_packages(&self, err: ApiError) {
        *self.packages.lock().unwrap() = Err(err);
    }

    pub fn fail_alerts(&self, err: ApiError) {
        *self.alerts.lock().unwrap() = Err(err);
    }

    /// Block `list_packages` until the returned semaphore gets a permit
    pub fn gate_packages(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.packages_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    /// (packages, alerts) fetch counts
    pub fn fetch_counts(&self) -> (usize, usize) {
        (
            self.package_calls.load(Ordering::SeqCst),
            self.alert_calls.load(Ordering::SeqCst),
        )
    }

    pub fn submitted(&self) -> Vec<Submitted> {
        self.submitted.lock().unwrap().clone()
    }
}

impl CourierApi for FakeApi {
    async fn list_packages(&self) -> Result<Vec<Package>, ApiError> {
        self.package_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.packages_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            let _permit = gate.acquire().await;
        }
        self.packages.lock().unwrap().clone()
    }

    async fn get_package(&self, _package_id: &str) -> Result<Option<Package>, ApiError> {
        self.lookup.lock().unwrap().clone()
    }

    async fn create_package(&self, update: &PackageUpdate) -> Result<SubmitReceipt, ApiError> {
        self.submitted
            .lock()
            .unwrap()
            .push(Submitted::Create(update.clone()));
        self.receipt.lock().unwrap().clone()
    }

    async fn update_package(
        &self,
        package_id: &str,
        update: &PackageUpdate,
    ) -> Result<SubmitReceipt, ApiError> {
        self.submitted
            .lock()
            .unwrap()
            .push(Submitted::Update(package_id.to_string(), update.clone()));
        self.receipt.lock().unwrap().clone()
    }

    async fn list_alerts(&self) -> Result<Vec<Alert>, ApiError> {
        self.alert_calls.fetch_add(1, Ordering::SeqCst);
        self.alerts.lock().unwrap().clone()
    }
}
