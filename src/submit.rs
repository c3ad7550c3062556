//! Submission flow - sends a package update and phrases the result for the form

use crate::models::{PackageUpdate, SubmitReceipt};
use crate::network::api::CourierApi;

/// Where a submission goes
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitTarget {
    /// `POST /packages/new`; the package id is optional
    Create,
    /// `PUT /packages/:id` for an existing package
    Update(String),
}

/// Result of a submission, already phrased for display
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    Accepted(String),
    Rejected(String),
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted(_))
    }

    pub fn message(&self) -> &str {
        match self {
            SubmitOutcome::Accepted(msg) | SubmitOutcome::Rejected(msg) => msg,
        }
    }
}

/// Submit `update` to `target`. Never fails: errors become a `Rejected` message.
pub async fn submit_update<A: CourierApi>(
    api: &A,
    target: &SubmitTarget,
    update: &PackageUpdate,
) -> SubmitOutcome {
    let result = match target {
        SubmitTarget::Create => api.create_package(update).await,
        SubmitTarget::Update(package_id) => api.update_package(package_id, update).await,
    };

    match result {
        Ok(receipt) => {
            tracing::info!(
                package_id = ?receipt.package_id,
                status = update.status.as_str(),
                "Submission accepted"
            );
            SubmitOutcome::Accepted(success_message(target, update, &receipt))
        }
        Err(e) => {
            tracing::error!(error = %e, "Submission failed");
            SubmitOutcome::Rejected(format!("Submission failed: {}", e))
        }
    }
}

/// New packages are announced by id; everything else is an update notice
pub fn success_message(
    target: &SubmitTarget,
    update: &PackageUpdate,
    receipt: &SubmitReceipt,
) -> String {
    if update.package_id.is_none() {
        if let Some(id) = receipt.package_id.as_deref().filter(|id| !id.is_empty()) {
            return format!("New package created: {}", id);
        }
    }

    if let Some(message) = receipt.message.as_deref().filter(|m| !m.trim().is_empty()) {
        return message.to_string();
    }

    match target {
        SubmitTarget::Create => "Package update submitted successfully!".to_string(),
        SubmitTarget::Update(id) => format!("Update recorded for {}", id),
    }
}
