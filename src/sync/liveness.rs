//! Cooperative cancellation for in-flight fetches.
//!
//! The owner holds a [`Liveness`]; every spawned fetch gets a cloned
//! [`LivenessToken`]. Revoking (or dropping) the owner makes all tokens
//! report dead, and [`LivenessToken::run`] then discards whatever the
//! wrapped request produces.

use std::future::Future;

use tokio::sync::watch;

#[derive(Debug)]
pub struct Liveness {
    tx: watch::Sender<bool>,
}

#[derive(Debug, Clone)]
pub struct LivenessToken {
    rx: watch::Receiver<bool>,
}

impl Liveness {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(true);
        Liveness { tx }
    }

    pub fn token(&self) -> LivenessToken {
        LivenessToken {
            rx: self.tx.subscribe(),
        }
    }

    pub fn revoke(&self) {
        self.tx.send_replace(false);
    }

    pub fn is_alive(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

impl LivenessToken {
    pub fn is_alive(&self) -> bool {
        *self.rx.borrow() && self.rx.has_changed().is_ok()
    }

    /// Resolves once the owner revoked or went away
    pub async fn revoked(&mut self) {
        let _ = self.rx.wait_for(|alive| !*alive).await;
    }

    /// Drive `fut` unless the owner is revoked first. Output produced after
    /// revocation is dropped.
    pub async fn run<F: Future>(mut self, fut: F) -> Option<F::Output> {
        if !self.is_alive() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.revoked() => None,
            out = fut => self.is_alive().then_some(out),
        }
    }
}
