//! App state - pure data structure with no I/O logic

use crate::app::filter::PackageFilter;
use crate::app::form::FormState;
use crate::messages::ui_events::View;
use crate::messages::RenderState;
use crate::models::Package;
use crate::sync::SyncSnapshot;

/// The package shown in the detail view
#[derive(Clone, Debug, PartialEq)]
pub struct DetailState {
    pub package_id: String,
    pub package: Option<Package>,
    pub loading: bool,
    pub error: Option<String>,
    pub scroll: u16,
}

/// Main application state - pure data, no I/O
pub struct AppState {
    pub view: View,

    // Latest copy of the sync cache
    pub sync: SyncSnapshot,

    // Package list
    pub filter: PackageFilter,
    pub search_active: bool,
    pub selected: usize,

    // Detail view
    pub detail: Option<DetailState>,
    pub pending_lookup: Option<u64>,

    // Update form
    pub form: FormState,
    pub form_return_view: View,
    pub pending_submit: Option<u64>,

    pub next_request_id: u64,

    // Popups
    pub show_help: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            view: View::List,
            sync: SyncSnapshot {
                loading: true,
                ..SyncSnapshot::default()
            },
            filter: PackageFilter::default(),
            search_active: false,
            selected: 0,
            detail: None,
            pending_lookup: None,
            form: FormState::create(),
            form_return_view: View::List,
            pending_submit: None,
            next_request_id: 1,
            show_help: false,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Packages passing the current search and status filter
    pub fn visible_packages(&self) -> Vec<&Package> {
        self.filter.apply(&self.sync.packages)
    }

    pub fn selected_package(&self) -> Option<&Package> {
        self.visible_packages().get(self.selected).copied()
    }

    /// Keep the selection inside the visible rows
    pub fn clamp_selection(&mut self) {
        let count = self.visible_packages().len();
        self.selected = self.selected.min(count.saturating_sub(1));
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            view: self.view,
            packages: self.visible_packages().into_iter().cloned().collect(),
            total_packages: self.sync.packages.len(),
            selected: self.selected,
            search: self.filter.search.clone(),
            search_active: self.search_active,
            status_filter: self.filter.status,
            alerts: self
                .sync
                .alerts
                .iter()
                .filter(|a| !a.resolved)
                .cloned()
                .collect(),
            loading: self.sync.loading,
            error: self.sync.error.clone(),
            last_synced: self.sync.last_synced,
            detail: self.detail.clone(),
            form: self.form.clone(),
            show_help: self.show_help,
        }
    }
}
