//! Sync messages - commands from the App layer to the Sync actor

use std::time::Duration;

/// Commands sent from App layer to the Sync actor
#[derive(Debug, Clone, PartialEq)]
pub enum SyncCommand {
    /// The terminal regained focus
    WindowFocused,
    /// Re-enter loading state and fetch immediately
    ForceRefresh,
    /// Force a refresh once the delay elapses; replaces any pending one
    ForceRefreshAfter(Duration),
    /// Stop polling and discard in-flight fetches
    Shutdown,
}
