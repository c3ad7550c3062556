//! # Courier Dash
//!
//! A terminal dashboard for a courier tracking backend.
//!
//! ## Features
//! - Package list with id search and status filter
//! - Package details with event history, newest first
//! - Stuck-package alert banner
//! - Form to create packages or record status updates
//! - Background polling on an interval, on terminal focus and on demand
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Sync Layer (polling cache, single writer)
//! - Network Layer (Tokio runtime)

pub mod config;
pub mod constants;
pub mod models;
pub mod ui;
pub mod submit;
pub mod messages;
pub mod app;
pub mod network;
pub mod sync;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use models::{Alert, Package, PackageEvent, PackageStatus, PackageUpdate, SubmitReceipt};
pub use messages::{UiEvent, NetworkCommand, NetworkResponse, SyncCommand, RenderState};
pub use app::{AppState, AppActor};
pub use network::{ApiClient, ApiError, CourierApi, NetworkActor};
pub use sync::{SyncActor, SyncCache, SyncSnapshot};
