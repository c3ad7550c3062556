//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

use std::time::Duration;

/// Backend used when `COURIER_API_BASE_URL` is not set
pub const DEFAULT_API_BASE_URL: &str = "https://aamira-courier-server.vercel.app/api";

/// Interval between background refreshes of packages and alerts
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Delay before re-polling after a successful submission, so the backend
/// has applied the update when we read it back
pub const SUBMIT_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Log file written next to the working directory
pub const DEFAULT_LOG_FILE: &str = "courier-dash.log";

/// Header carrying the static API key
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Application name
pub const APP_NAME: &str = "Courier Dash";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
