//! Polling data-sync layer - owns the client-side cache of packages and alerts
//!
//! The Sync actor refreshes on an interval, on window focus and on demand,
//! and publishes snapshots to the App layer.

pub mod actor;
pub mod cache;
pub mod liveness;

pub use actor::SyncActor;
pub use cache::{SyncCache, SyncSnapshot};
pub use liveness::{Liveness, LivenessToken};
