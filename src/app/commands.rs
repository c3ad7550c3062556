//! Command handlers - state transitions for UI events, network responses
//! and sync snapshots

use chrono::{DateTime, Utc};

use crate::app::form::FormState;
use crate::app::state::{AppState, DetailState};
use crate::constants::SUBMIT_SETTLE_DELAY;
use crate::messages::ui_events::View;
use crate::messages::{NetworkCommand, NetworkResponse, SyncCommand};
use crate::submit::SubmitOutcome;
use crate::sync::SyncSnapshot;

impl AppState {
    // ========================
    // Package list
    // ========================

    pub fn select_next(&mut self) {
        let count = self.visible_packages().len();
        if count > 0 {
            self.selected = (self.selected + 1) % count;
        }
    }

    pub fn select_prev(&mut self) {
        let count = self.visible_packages().len();
        if count > 0 {
            self.selected = self.selected.checked_sub(1).unwrap_or(count - 1);
        }
    }

    pub fn start_search(&mut self) {
        self.search_active = true;
    }

    pub fn stop_search(&mut self) {
        self.search_active = false;
    }

    pub fn search_char(&mut self, c: char) {
        self.filter.search.push(c);
        self.selected = 0;
    }

    pub fn search_backspace(&mut self) {
        self.filter.search.pop();
        self.clamp_selection();
    }

    pub fn cycle_status_filter(&mut self) {
        self.filter.status = self.filter.status.next();
        self.selected = 0;
    }

    // ========================
    // Detail view
    // ========================

    /// Show the selected package and ask the backend for its latest copy
    pub fn open_detail(&mut self) -> Option<NetworkCommand> {
        let package = self.selected_package()?.clone();
        self.detail = Some(DetailState {
            package_id: package.package_id.clone(),
            package: Some(package),
            loading: false,
            error: None,
            scroll: 0,
        });
        self.view = View::Detail;
        self.reload_package()
    }

    pub fn reload_package(&mut self) -> Option<NetworkCommand> {
        let id = self.next_id();
        let detail = self.detail.as_mut()?;
        detail.loading = true;
        detail.error = None;
        self.pending_lookup = Some(id);
        Some(NetworkCommand::LookupPackage {
            id,
            package_id: detail.package_id.clone(),
        })
    }

    pub fn back(&mut self) {
        self.view = View::List;
        self.detail = None;
        self.pending_lookup = None;
    }

    pub fn scroll_up(&mut self) {
        if let Some(detail) = self.detail.as_mut() {
            detail.scroll = detail.scroll.saturating_sub(1);
        }
    }

    pub fn scroll_down(&mut self) {
        if let Some(detail) = self.detail.as_mut() {
            detail.scroll = detail.scroll.saturating_add(1);
        }
    }

    // ========================
    // Update form
    // ========================

    pub fn open_create_form(&mut self) {
        if !self.form.submitting {
            self.form = FormState::create();
        }
        self.form_return_view = self.view;
        self.view = View::Form;
    }

    pub fn open_update_form(&mut self) {
        let Some(package) = self.detail.as_ref().and_then(|d| d.package.as_ref()) else {
            return;
        };
        if !self.form.submitting {
            self.form = FormState::update_for(package);
        }
        self.form_return_view = View::Detail;
        self.view = View::Form;
    }

    pub fn close_form(&mut self) {
        self.view = self.form_return_view;
    }

    /// Validate the form and hand the payload to the network layer.
    /// A second submit while one is in flight is ignored.
    pub fn submit_form(&mut self, now: DateTime<Utc>) -> Option<NetworkCommand> {
        if self.form.submitting {
            return None;
        }
        self.form.error = None;
        self.form.success = None;

        let update = match self.form.build_update(now) {
            Ok(update) => update,
            Err(msg) => {
                self.form.error = Some(msg);
                return None;
            }
        };

        let id = self.next_id();
        self.pending_submit = Some(id);
        self.form.submitting = true;
        Some(NetworkCommand::Submit {
            id,
            target: self.form.target.clone(),
            update,
        })
    }

    // ========================
    // Data sync
    // ========================

    /// Manual refresh; a no-op while a load is already in progress
    pub fn request_refresh(&self) -> Option<SyncCommand> {
        (!self.sync.loading).then_some(SyncCommand::ForceRefresh)
    }

    // ========================
    // Popups
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Inbound data
    // ========================

    /// Take a new cache snapshot; refreshes the detail copy when it is newer
    pub fn apply_snapshot(&mut self, snapshot: SyncSnapshot) {
        self.sync = snapshot;
        self.clamp_selection();

        if let Some(detail) = self.detail.as_mut() {
            let fresh = self
                .sync
                .packages
                .iter()
                .find(|p| p.package_id == detail.package_id);
            if let Some(fresh) = fresh {
                let newer = detail
                    .package
                    .as_ref()
                    .map_or(true, |current| fresh.last_updated >= current.last_updated);
                if newer {
                    detail.package = Some(fresh.clone());
                }
            }
        }
    }

    /// Apply a network response. Returns a sync command to issue, if any.
    pub fn handle_response(&mut self, response: NetworkResponse) -> Option<SyncCommand> {
        match response {
            NetworkResponse::Submitted { id, outcome } => {
                if self.pending_submit != Some(id) {
                    return None;
                }
                self.pending_submit = None;
                self.form.submitting = false;
                match outcome {
                    SubmitOutcome::Accepted(msg) => {
                        self.form.success = Some(msg);
                        Some(SyncCommand::ForceRefreshAfter(SUBMIT_SETTLE_DELAY))
                    }
                    SubmitOutcome::Rejected(msg) => {
                        self.form.error = Some(msg);
                        None
                    }
                }
            }
            NetworkResponse::PackageLoaded { id, package_id, result } => {
                if self.pending_lookup != Some(id) {
                    return None;
                }
                self.pending_lookup = None;
                let detail = self.detail.as_mut().filter(|d| d.package_id == package_id)?;
                detail.loading = false;
                match result {
                    Ok(Some(package)) => {
                        detail.package = Some(package);
                        detail.error = None;
                    }
                    Ok(None) => detail.error = Some("Package not found".to_string()),
                    Err(msg) => detail.error = Some(msg),
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Alert, PackageStatus, SubmitReceipt};
    use crate::submit::{success_message, SubmitTarget};
    use crate::testing::package;
    use chrono::Duration;

    fn state_with(ids: &[&str]) -> AppState {
        let mut state = AppState::new();
        state.apply_snapshot(SyncSnapshot {
            packages: ids.iter().map(|id| package(id)).collect(),
            ..SyncSnapshot::default()
        });
        state
    }

    #[test]
    fn test_selection_wraps_and_clamps() {
        let mut state = state_with(&["A-1", "A-2", "B-1"]);
        state.select_prev();
        assert_eq!(state.selected, 2);
        state.select_next();
        assert_eq!(state.selected, 0);

        state.selected = 2;
        state.search_char('a');
        assert_eq!(state.selected, 0);
        assert_eq!(state.visible_packages().len(), 2);

        state.selected = 1;
        state.apply_snapshot(SyncSnapshot {
            packages: vec![package("A-1")],
            ..SyncSnapshot::default()
        });
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_refresh_ignored_while_loading() {
        let mut state = AppState::new();
        assert!(state.sync.loading);
        assert_eq!(state.request_refresh(), None);

        state.apply_snapshot(SyncSnapshot::default());
        assert_eq!(state.request_refresh(), Some(SyncCommand::ForceRefresh));
    }

    #[test]
    fn test_open_detail_requests_lookup() {
        let mut state = state_with(&["PKG-1", "PKG-2"]);
        state.select_next();

        let cmd = state.open_detail().unwrap();
        assert_eq!(state.view, View::Detail);
        match cmd {
            NetworkCommand::LookupPackage { id, package_id } => {
                assert_eq!(package_id, "PKG-2");
                assert_eq!(state.pending_lookup, Some(id));
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert!(state.detail.as_ref().unwrap().loading);
    }

    #[test]
    fn test_open_detail_on_empty_list_does_nothing() {
        let mut state = state_with(&[]);
        assert!(state.open_detail().is_none());
        assert_eq!(state.view, View::List);
    }

    #[test]
    fn test_lookup_not_found() {
        let mut state = state_with(&["PKG-1"]);
        let Some(NetworkCommand::LookupPackage { id, .. }) = state.open_detail() else {
            panic!("expected lookup");
        };

        state.handle_response(NetworkResponse::PackageLoaded {
            id,
            package_id: "PKG-1".into(),
            result: Ok(None),
        });
        let detail = state.detail.as_ref().unwrap();
        assert_eq!(detail.error.as_deref(), Some("Package not found"));
        assert!(!detail.loading);
    }

    #[test]
    fn test_stale_lookup_is_ignored() {
        let mut state = state_with(&["PKG-1"]);
        state.open_detail();
        state.reload_package();

        let mut other = package("PKG-1");
        other.current_status = PackageStatus::Delivered;
        state.handle_response(NetworkResponse::PackageLoaded {
            id: 1,
            package_id: "PKG-1".into(),
            result: Ok(Some(other)),
        });
        let detail = state.detail.as_ref().unwrap();
        assert_eq!(detail.package.as_ref().unwrap().current_status, PackageStatus::InTransit);
    }

    #[test]
    fn test_snapshot_refreshes_detail_copy() {
        let mut state = state_with(&["PKG-1"]);
        state.open_detail();

        let mut moved = package("PKG-1");
        moved.current_status = PackageStatus::OutForDelivery;
        moved.last_updated = Utc::now() + Duration::minutes(5);
        state.apply_snapshot(SyncSnapshot {
            packages: vec![moved],
            ..SyncSnapshot::default()
        });

        let shown = state.detail.as_ref().unwrap().package.as_ref().unwrap();
        assert_eq!(shown.current_status, PackageStatus::OutForDelivery);
    }

    #[test]
    fn test_submit_success_schedules_refresh() {
        let mut state = state_with(&[]);
        state.open_create_form();
        assert_eq!(state.view, View::Form);

        let cmd = state.submit_form(Utc::now()).unwrap();
        let NetworkCommand::Submit { id, target, update } = cmd else {
            panic!("expected submit");
        };
        assert_eq!(target, SubmitTarget::Create);
        assert!(update.package_id.is_none());
        assert!(state.form.submitting);

        // double submit is ignored while in flight
        assert!(state.submit_form(Utc::now()).is_none());

        let msg = success_message(
            &target,
            &update,
            &SubmitReceipt {
                package_id: Some("X".into()),
                message: None,
            },
        );
        let follow_up = state.handle_response(NetworkResponse::Submitted {
            id,
            outcome: SubmitOutcome::Accepted(msg),
        });

        assert_eq!(follow_up, Some(SyncCommand::ForceRefreshAfter(SUBMIT_SETTLE_DELAY)));
        assert!(!state.form.submitting);
        assert!(state.form.success.as_deref().unwrap().contains("X"));
    }

    #[test]
    fn test_submit_failure_shows_error() {
        let mut state = state_with(&[]);
        state.open_create_form();
        let Some(NetworkCommand::Submit { id, .. }) = state.submit_form(Utc::now()) else {
            panic!("expected submit");
        };

        let follow_up = state.handle_response(NetworkResponse::Submitted {
            id,
            outcome: SubmitOutcome::Rejected("Submission failed: HTTP error 500".into()),
        });
        assert!(follow_up.is_none());
        assert_eq!(state.form.error.as_deref(), Some("Submission failed: HTTP error 500"));
        assert!(state.form.success.is_none());
    }

    #[test]
    fn test_invalid_form_sends_nothing() {
        let mut state = state_with(&[]);
        state.open_create_form();
        state.form.lat = "abc".into();
        assert!(state.submit_form(Utc::now()).is_none());
        assert!(state.form.error.is_some());
        assert!(!state.form.submitting);
    }

    #[test]
    fn test_update_form_from_detail() {
        let mut state = state_with(&["PKG-8"]);
        state.open_detail();
        state.open_update_form();
        assert_eq!(state.view, View::Form);
        assert_eq!(state.form.target, SubmitTarget::Update("PKG-8".into()));

        state.close_form();
        assert_eq!(state.view, View::Detail);
        state.back();
        assert_eq!(state.view, View::List);
        assert!(state.detail.is_none());
    }

    #[test]
    fn test_render_hides_resolved_alerts() {
        let mut state = state_with(&["PKG-1"]);
        let alert = |id: &str, resolved| Alert {
            id: id.into(),
            package_id: "PKG-1".into(),
            message: "No update for 30 minutes".into(),
            created_at: Utc::now(),
            resolved,
        };
        state.sync.alerts = vec![alert("a1", false), alert("a2", true)];

        let render = state.to_render_state();
        assert_eq!(render.alerts.len(), 1);
        assert_eq!(render.alerts[0].id, "a1");
        assert_eq!(render.total_packages, 1);
    }
}
