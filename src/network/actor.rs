//! Network actor - runs one-shot backend requests in the Tokio runtime

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::api::CourierApi;
use crate::submit::submit_update;
use crate::sync::liveness::Liveness;

/// Network actor that processes submissions and package lookups
pub struct NetworkActor<A: CourierApi> {
    api: Arc<A>,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
    liveness: Liveness,
}

impl<A: CourierApi> NetworkActor<A> {
    pub fn new(api: Arc<A>, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            api,
            response_tx,
            active_requests: JoinSet::new(),
            liveness: Liveness::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Submit { id, target, update }) => {
                            let api = Arc::clone(&self.api);
                            let response_tx = self.response_tx.clone();
                            let token = self.liveness.token();

                            self.active_requests.spawn(async move {
                                tracing::info!(id, submit_target = ?target, "Submitting package update");
                                let outcome = token.run(submit_update(&*api, &target, &update)).await;
                                if let Some(outcome) = outcome {
                                    let _ = response_tx.send(NetworkResponse::Submitted { id, outcome });
                                }
                            });
                        }

                        Some(NetworkCommand::LookupPackage { id, package_id }) => {
                            let api = Arc::clone(&self.api);
                            let response_tx = self.response_tx.clone();
                            let token = self.liveness.token();

                            self.active_requests.spawn(async move {
                                tracing::info!(id, package_id = %package_id, "Looking up package");
                                let found = token.run(api.get_package(&package_id)).await;
                                if let Some(result) = found {
                                    if let Err(e) = &result {
                                        tracing::error!(id, error = %e, "Package lookup failed");
                                    }
                                    let _ = response_tx.send(NetworkResponse::PackageLoaded {
                                        id,
                                        package_id,
                                        result: result.map_err(|e| e.to_string()),
                                    });
                                }
                            });
                        }

                        Some(NetworkCommand::Shutdown) | None => break,
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_requests.join_next() => {}
            }
        }

        // Late answers must not reach the app after shutdown
        self.liveness.revoke();
        while self.active_requests.join_next().await.is_some() {}
        tracing::info!("Network actor stopped");
    }
}
