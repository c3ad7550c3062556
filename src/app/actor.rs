//! App actor - message loop processing UI events, network responses
//! and sync snapshots

use chrono::Utc;
use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, SyncCommand, UiEvent};
use crate::sync::SyncSnapshot;

/// App actor that owns the state and fans commands out to the other actors
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    sync_tx: mpsc::UnboundedSender<SyncCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        sync_tx: mpsc::UnboundedSender<SyncCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state: AppState::new(),
            network_tx,
            sync_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
        mut snapshot_rx: mpsc::UnboundedReceiver<SyncSnapshot>,
    ) {
        // Send initial render state
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        tracing::info!("Quit requested, shutting down actors");
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        let _ = self.sync_tx.send(SyncCommand::Shutdown);
                        break;
                    }
                }
                Some(response) = net_rx.recv() => {
                    tracing::debug!(request_id = response.id(), "Network response received");
                    if let Some(cmd) = self.state.handle_response(response) {
                        let _ = self.sync_tx.send(cmd);
                    }
                }
                Some(snapshot) = snapshot_rx.recv() => {
                    self.state.apply_snapshot(snapshot);
                }
                else => break,
            }
            let _ = self.render_tx.send(self.state.to_render_state());
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Package list
            UiEvent::SelectNext => self.state.select_next(),
            UiEvent::SelectPrev => self.state.select_prev(),
            UiEvent::OpenDetail => self.send_network(|s| s.open_detail()),
            UiEvent::StartSearch => self.state.start_search(),
            UiEvent::StopSearch => self.state.stop_search(),
            UiEvent::SearchChar(c) => self.state.search_char(c),
            UiEvent::SearchBackspace => self.state.search_backspace(),
            UiEvent::CycleStatusFilter => self.state.cycle_status_filter(),

            // Detail view
            UiEvent::Back => self.state.back(),
            UiEvent::ScrollUp => self.state.scroll_up(),
            UiEvent::ScrollDown => self.state.scroll_down(),
            UiEvent::ReloadPackage => self.send_network(|s| s.reload_package()),

            // Update form
            UiEvent::OpenCreateForm => self.state.open_create_form(),
            UiEvent::OpenUpdateForm => self.state.open_update_form(),
            UiEvent::FormNextField => self.state.form.next_field(),
            UiEvent::FormPrevField => self.state.form.prev_field(),
            UiEvent::FormChar(c) => self.state.form.enter_char(c),
            UiEvent::FormBackspace => self.state.form.delete_char(),
            UiEvent::FormNextStatus => self.state.form.next_status(),
            UiEvent::FormPrevStatus => self.state.form.prev_status(),
            UiEvent::SubmitForm => self.send_network(|s| s.submit_form(Utc::now())),
            UiEvent::CloseForm => self.state.close_form(),

            // Data sync
            UiEvent::ForceRefresh => match self.state.request_refresh() {
                Some(cmd) => {
                    let _ = self.sync_tx.send(cmd);
                }
                None => tracing::debug!("Refresh already in progress"),
            },
            UiEvent::WindowFocused => {
                let _ = self.sync_tx.send(SyncCommand::WindowFocused);
            }

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }

    fn send_network(&mut self, f: impl FnOnce(&mut AppState) -> Option<NetworkCommand>) {
        if let Some(cmd) = f(&mut self.state) {
            let _ = self.network_tx.send(cmd);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::ui_events::View;
    use crate::testing::package;

    struct Channels {
        ui_tx: mpsc::UnboundedSender<UiEvent>,
        net_tx: mpsc::UnboundedSender<NetworkResponse>,
        snapshot_tx: mpsc::UnboundedSender<SyncSnapshot>,
        network_rx: mpsc::UnboundedReceiver<NetworkCommand>,
        sync_rx: mpsc::UnboundedReceiver<SyncCommand>,
        render_rx: mpsc::UnboundedReceiver<RenderState>,
        handle: tokio::task::JoinHandle<()>,
    }

    fn spawn_actor() -> Channels {
        let (network_tx, network_rx) = mpsc::unbounded_channel();
        let (sync_tx, sync_rx) = mpsc::unbounded_channel();
        let (render_tx, render_rx) = mpsc::unbounded_channel();
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (net_tx, net_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = mpsc::unbounded_channel();

        let actor = AppActor::new(network_tx, sync_tx, render_tx);
        let handle = tokio::spawn(actor.run(ui_rx, net_rx, snapshot_rx));
        Channels {
            ui_tx,
            net_tx,
            snapshot_tx,
            network_rx,
            sync_rx,
            render_rx,
            handle,
        }
    }

    #[tokio::test]
    async fn test_quit_shuts_down_both_actors() {
        let mut ch = spawn_actor();
        ch.ui_tx.send(UiEvent::Quit).unwrap();
        ch.handle.await.unwrap();

        assert!(matches!(ch.network_rx.recv().await, Some(NetworkCommand::Shutdown)));
        assert_eq!(ch.sync_rx.recv().await, Some(SyncCommand::Shutdown));
    }

    #[tokio::test]
    async fn test_focus_and_refresh_are_forwarded() {
        let mut ch = spawn_actor();
        ch.render_rx.recv().await.unwrap();
        ch.snapshot_tx.send(SyncSnapshot::default()).unwrap();
        assert!(!ch.render_rx.recv().await.unwrap().loading);

        ch.ui_tx.send(UiEvent::WindowFocused).unwrap();
        ch.ui_tx.send(UiEvent::ForceRefresh).unwrap();

        assert_eq!(ch.sync_rx.recv().await, Some(SyncCommand::WindowFocused));
        assert_eq!(ch.sync_rx.recv().await, Some(SyncCommand::ForceRefresh));
        drop(ch.ui_tx);
    }

    #[tokio::test]
    async fn test_refresh_not_forwarded_while_loading() {
        let mut ch = spawn_actor();
        ch.ui_tx.send(UiEvent::ForceRefresh).unwrap();
        ch.ui_tx.send(UiEvent::WindowFocused).unwrap();

        assert_eq!(ch.sync_rx.recv().await, Some(SyncCommand::WindowFocused));
        assert!(ch.sync_rx.try_recv().is_err());
        drop(ch.ui_tx);
    }

    #[tokio::test]
    async fn test_snapshot_is_rendered() {
        let mut ch = spawn_actor();
        let initial = ch.render_rx.recv().await.unwrap();
        assert!(initial.loading);

        ch.snapshot_tx
            .send(SyncSnapshot {
                packages: vec![package("PKG-1")],
                ..SyncSnapshot::default()
            })
            .unwrap();
        let render = ch.render_rx.recv().await.unwrap();
        assert!(!render.loading);
        assert_eq!(render.packages.len(), 1);

        ch.ui_tx.send(UiEvent::OpenDetail).unwrap();
        let render = ch.render_rx.recv().await.unwrap();
        assert_eq!(render.view, View::Detail);
        assert!(matches!(
            ch.network_rx.recv().await,
            Some(NetworkCommand::LookupPackage { .. })
        ));
        drop(ch.net_tx);
    }
}
