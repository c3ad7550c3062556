//! The backend operations the dashboard depends on.
//!
//! `ApiClient` implements this over HTTP; tests substitute an in-memory fake.

use std::future::Future;

use crate::models::{Alert, Package, PackageUpdate, SubmitReceipt};
use crate::network::error::ApiError;

pub trait CourierApi: Send + Sync + 'static {
    /// `GET /packages`
    fn list_packages(&self) -> impl Future<Output = Result<Vec<Package>, ApiError>> + Send;

    /// `GET /packages/:id`; the backend answers with zero or one package
    fn get_package(
        &self,
        package_id: &str,
    ) -> impl Future<Output = Result<Option<Package>, ApiError>> + Send;

    /// `POST /packages/new`
    fn create_package(
        &self,
        update: &PackageUpdate,
    ) -> impl Future<Output = Result<SubmitReceipt, ApiError>> + Send;

    /// `PUT /packages/:id`
    fn update_package(
        &self,
        package_id: &str,
        update: &PackageUpdate,
    ) -> impl Future<Output = Result<SubmitReceipt, ApiError>> + Send;

    /// `GET /alerts`
    fn list_alerts(&self) -> impl Future<Output = Result<Vec<Alert>, ApiError>> + Send;
}
