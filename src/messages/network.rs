//! Network messages - communication between App and Network layers

use crate::models::{Package, PackageUpdate};
use crate::submit::{SubmitOutcome, SubmitTarget};

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Send a form submission to the backend
    Submit {
        id: u64,
        target: SubmitTarget,
        update: PackageUpdate,
    },
    /// Fetch the latest copy of one package for the detail view
    LookupPackage {
        id: u64,
        package_id: String,
    },
    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    /// Submission finished, successfully or not
    Submitted {
        id: u64,
        outcome: SubmitOutcome,
    },
    /// Package lookup finished; `Ok(None)` means the backend does not know it
    PackageLoaded {
        id: u64,
        package_id: String,
        result: Result<Option<Package>, String>,
    },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::Submitted { id, .. } => *id,
            NetworkResponse::PackageLoaded { id, .. } => *id,
        }
    }
}
