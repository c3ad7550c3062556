//! Render state - data structure sent from App layer to UI for rendering

use chrono::{DateTime, Utc};

use crate::app::filter::StatusFilter;
use crate::app::form::FormState;
use crate::app::state::DetailState;
use crate::messages::ui_events::{KeyContext, View};
use crate::models::{Alert, Package};

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    pub view: View,

    // Package list (already filtered)
    pub packages: Vec<Package>,
    pub total_packages: usize,
    pub selected: usize,
    pub search: String,
    pub search_active: bool,
    pub status_filter: StatusFilter,

    // Sync status
    pub alerts: Vec<Alert>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_synced: Option<DateTime<Utc>>,

    pub detail: Option<DetailState>,
    pub form: FormState,

    // Popups
    pub show_help: bool,
}

impl RenderState {
    /// What the key mapper needs to know about the current screen
    pub fn key_context(&self) -> KeyContext {
        KeyContext {
            view: self.view,
            search_active: self.search_active,
            status_field_active: self.form.active_field == crate::app::form::FormField::Status,
            show_help: self.show_help,
        }
    }
}

impl Default for RenderState {
    fn default() -> Self {
        RenderState {
            view: View::List,
            packages: Vec::new(),
            total_packages: 0,
            selected: 0,
            search: String::new(),
            search_active: false,
            status_filter: StatusFilter::All,
            alerts: Vec::new(),
            loading: true,
            error: None,
            last_synced: None,
            detail: None,
            form: FormState::create(),
            show_help: false,
        }
    }
}
