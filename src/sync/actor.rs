//! Sync actor - keeps the package/alert cache fresh
//!
//! Fetches both lists on start, on every poll tick, on window focus and on
//! forced refreshes. The two fetches run as independent tasks and are
//! applied in completion order. Every cache change is published as a
//! [`SyncSnapshot`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tokio::time::{self, Instant, MissedTickBehavior, Sleep};

use crate::messages::SyncCommand;
use crate::models::{Alert, Package};
use crate::network::api::CourierApi;
use crate::network::error::ApiError;
use crate::sync::cache::{SyncCache, SyncSnapshot};
use crate::sync::liveness::Liveness;

/// Result of one fetch task, tagged with the refresh round that issued it
#[derive(Debug)]
enum Fetched {
    Packages(u64, Result<Vec<Package>, ApiError>),
    Alerts(u64, Result<Vec<Alert>, ApiError>),
}

pub struct SyncActor<A: CourierApi> {
    api: Arc<A>,
    cache: SyncCache,
    poll_interval: Duration,
    snapshot_tx: mpsc::UnboundedSender<SyncSnapshot>,
    liveness: Liveness,
    fetches: JoinSet<Option<Fetched>>,
    round: u64,
    // newest round applied per list; older results arriving late are dropped
    packages_round: u64,
    alerts_round: u64,
}

impl<A: CourierApi> SyncActor<A> {
    pub fn new(
        api: Arc<A>,
        poll_interval: Duration,
        snapshot_tx: mpsc::UnboundedSender<SyncSnapshot>,
    ) -> Self {
        SyncActor {
            api,
            cache: SyncCache::new(),
            poll_interval,
            snapshot_tx,
            liveness: Liveness::new(),
            fetches: JoinSet::new(),
            round: 0,
            packages_round: 0,
            alerts_round: 0,
        }
    }

    /// Run until `Shutdown` arrives or every command sender is dropped
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<SyncCommand>) {
        tracing::info!(interval_secs = self.poll_interval.as_secs(), "Starting package sync");
        self.publish();
        self.refresh("initial");

        let mut ticker = time::interval_at(Instant::now() + self.poll_interval, self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut settle: Option<Pin<Box<Sleep>>> = None;

        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(SyncCommand::WindowFocused) => self.refresh("focus"),
                        Some(SyncCommand::ForceRefresh) => self.force_refresh(),
                        Some(SyncCommand::ForceRefreshAfter(delay)) => {
                            settle = Some(Box::pin(time::sleep(delay)));
                        }
                        Some(SyncCommand::Shutdown) | None => break,
                    }
                }

                _ = ticker.tick() => self.refresh("interval"),

                _ = wait_optional(&mut settle) => {
                    settle = None;
                    self.force_refresh();
                }

                Some(joined) = self.fetches.join_next() => self.apply(joined),
            }
        }

        self.shutdown().await;
    }

    fn force_refresh(&mut self) {
        self.cache.begin_forced_refresh();
        self.publish();
        self.refresh("forced");
    }

    /// Spawn one packages fetch and one alerts fetch
    fn refresh(&mut self, reason: &'static str) {
        self.round += 1;
        let round = self.round;
        tracing::info!(reason, round, "Refreshing packages and alerts");

        let api = Arc::clone(&self.api);
        self.fetches.spawn(
            self.liveness
                .token()
                .run(async move { Fetched::Packages(round, api.list_packages().await) }),
        );

        let api = Arc::clone(&self.api);
        self.fetches.spawn(
            self.liveness
                .token()
                .run(async move { Fetched::Alerts(round, api.list_alerts().await) }),
        );
    }

    fn apply(&mut self, joined: Result<Option<Fetched>, JoinError>) {
        if !self.liveness.is_alive() {
            return;
        }
        match joined {
            Ok(Some(Fetched::Packages(round, result))) => {
                if round < self.packages_round {
                    tracing::debug!(round, "Dropping stale packages response");
                    return;
                }
                self.packages_round = round;
                self.cache.apply_packages(result);
                self.publish();
            }
            Ok(Some(Fetched::Alerts(round, result))) => {
                if round < self.alerts_round {
                    tracing::debug!(round, "Dropping stale alerts response");
                    return;
                }
                self.alerts_round = round;
                self.cache.apply_alerts(result);
                self.publish();
            }
            Ok(None) => {}
            Err(e) => tracing::error!(error = %e, "Fetch task failed"),
        }
    }

    fn publish(&self) {
        let _ = self.snapshot_tx.send(self.cache.snapshot());
    }

    /// Revoke liveness so in-flight fetches give up, then reap them without
    /// touching the cache
    async fn shutdown(mut self) {
        self.liveness.revoke();
        let mut abandoned = 0usize;
        while self.fetches.join_next().await.is_some() {
            abandoned += 1;
        }
        tracing::info!(abandoned, "Package sync stopped");
    }
}

/// Await the timer if one is armed, otherwise never resolve
fn wait_optional(timer: &mut Option<Pin<Box<Sleep>>>) -> impl Future<Output = ()> + '_ {
    async move {
        match timer.as_mut() {
            Some(sleep) => sleep.await,
            None => std::future::pending().await,
        }
    }
}
