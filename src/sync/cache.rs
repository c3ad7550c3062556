//! Client-side cache of packages and alerts - pure state, no I/O

use chrono::{DateTime, Utc};

use crate::models::{Alert, Package};
use crate::network::error::ApiError;

/// Immutable copy of the cache handed to the app layer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncSnapshot {
    pub packages: Vec<Package>,
    pub alerts: Vec<Alert>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_synced: Option<DateTime<Utc>>,
}

/// Cached packages and alerts plus the loading/error flags derived from
/// the packages fetch. Alerts never influence `loading` or `error`.
#[derive(Debug)]
pub struct SyncCache {
    packages: Vec<Package>,
    alerts: Vec<Alert>,
    loading: bool,
    error: Option<String>,
    last_synced: Option<DateTime<Utc>>,
}

impl Default for SyncCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncCache {
    pub fn new() -> Self {
        SyncCache {
            packages: Vec::new(),
            alerts: Vec::new(),
            loading: true,
            error: None,
            last_synced: None,
        }
    }

    #[cfg(test)]
    pub fn loading(&self) -> bool {
        self.loading
    }

    #[cfg(test)]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[cfg(test)]
    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// A forced refresh is the only thing that re-enters the loading state
    pub fn begin_forced_refresh(&mut self) {
        self.loading = true;
    }

    pub fn apply_packages(&mut self, result: Result<Vec<Package>, ApiError>) {
        match result {
            Ok(packages) => {
                tracing::debug!(count = packages.len(), "Packages refreshed");
                self.packages = packages;
                self.error = None;
                self.last_synced = Some(Utc::now());
            }
            Err(e) => {
                // previous packages stay visible to callers that want them
                tracing::error!(error = %e, "Failed to fetch packages");
                self.error = Some(format!("Failed to load packages: {}", e));
            }
        }
        self.loading = false;
    }

    /// Alerts are secondary: failures are logged and otherwise ignored
    pub fn apply_alerts(&mut self, result: Result<Vec<Alert>, ApiError>) {
        match result {
            Ok(alerts) => self.alerts = alerts,
            Err(e) => tracing::warn!(error = %e, "Failed to fetch alerts"),
        }
    }

    pub fn snapshot(&self) -> SyncSnapshot {
        SyncSnapshot {
            packages: self.packages.clone(),
            alerts: self.alerts.clone(),
            loading: self.loading,
            error: self.error.clone(),
            last_synced: self.last_synced,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::package;

    #[test]
    fn test_starts_loading() {
        let cache = SyncCache::new();
        assert!(cache.loading());
        assert!(cache.error().is_none());
        assert!(cache.snapshot().last_synced.is_none());
    }

    #[test]
    fn test_failure_keeps_previous_packages() {
        let mut cache = SyncCache::new();
        cache.apply_packages(Ok(vec![package("PKG-1"), package("PKG-2")]));
        cache.apply_packages(Err(ApiError::Transport("Connection failed: refused".into())));

        assert_eq!(cache.packages().len(), 2);
        assert_eq!(
            cache.error(),
            Some("Failed to load packages: Connection failed: refused")
        );
        assert!(!cache.loading());
    }

    #[test]
    fn test_success_clears_error() {
        let mut cache = SyncCache::new();
        cache.apply_packages(Err(ApiError::from_response(500, "")));
        assert!(cache.error().is_some());
        cache.apply_packages(Ok(vec![package("PKG-1")]));
        assert!(cache.error().is_none());
        assert!(cache.snapshot().last_synced.is_some());
    }

    #[test]
    fn test_alert_failure_is_silent() {
        let mut cache = SyncCache::new();
        cache.apply_alerts(Err(ApiError::from_response(503, "")));
        assert!(cache.loading());
        assert!(cache.error().is_none());
    }

    #[test]
    fn test_loading_only_reenters_on_forced_refresh() {
        let mut cache = SyncCache::new();
        cache.apply_packages(Err(ApiError::Decode("eof".into())));
        assert!(!cache.loading());

        cache.apply_alerts(Ok(Vec::new()));
        cache.apply_packages(Ok(Vec::new()));
        assert!(!cache.loading());

        cache.begin_forced_refresh();
        assert!(cache.loading());
        cache.apply_packages(Ok(Vec::new()));
        assert!(!cache.loading());
    }
}
