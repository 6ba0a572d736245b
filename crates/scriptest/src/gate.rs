//! Fulfill/wait gates
//!
//! A [`Gate`] bridges a completion that happens somewhere else (a callback
//! on a worker thread, a spawned task) back into the sequential flow of a
//! test body. Fulfilment is monotonic: once fulfilled, a gate stays
//! fulfilled, and extra calls to [`Gate::fulfill`] are no-ops.
//!
//! ```no_run
//! # async fn demo() -> Result<(), scriptest::GateError> {
//! use scriptest::gate::{expectation, wait};
//! use std::time::Duration;
//!
//! let loaded = expectation("config loaded");
//! let remote = loaded.clone();
//! std::thread::spawn(move || remote.fulfill());
//! wait(&loaded, Duration::from_secs(1)).await?;
//! # Ok(())
//! # }
//! ```

use crate::error::GateError;
use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// A one-way latch with a description
///
/// Clones share the same state, so a clone can be moved to whichever thread
/// or task will complete the work.
#[derive(Debug, Clone)]
pub struct Gate {
    inner: Arc<GateInner>,
}

#[derive(Debug)]
struct GateInner {
    description: String,
    fulfilled: watch::Sender<bool>,
}

/// Create a new, unfulfilled gate
pub fn expectation(description: impl Into<String>) -> Gate {
    Gate::new(description)
}

impl Gate {
    /// Create a new, unfulfilled gate
    pub fn new(description: impl Into<String>) -> Self {
        let (fulfilled, _) = watch::channel(false);
        Self {
            inner: Arc::new(GateInner {
                description: description.into(),
                fulfilled,
            }),
        }
    }

    /// Get the gate description
    pub fn description(&self) -> &str {
        &self.inner.description
    }

    /// Check if the gate has been fulfilled
    pub fn is_fulfilled(&self) -> bool {
        *self.inner.fulfilled.borrow()
    }

    /// Mark the gate fulfilled; callable from any thread
    pub fn fulfill(&self) {
        let changed = self.inner.fulfilled.send_if_modified(|fulfilled| {
            if *fulfilled {
                false
            } else {
                *fulfilled = true;
                true
            }
        });

        if changed {
            tracing::debug!(gate = %self.inner.description, "gate fulfilled");
        }
    }

    /// Wait until fulfilled or until `timeout` elapses
    pub async fn wait(&self, timeout: Duration) -> Result<(), GateError> {
        match tokio::time::timeout(timeout, self.fulfilled()).await {
            Ok(()) => Ok(()),
            Err(_) => {
                tracing::warn!(gate = %self.inner.description, ?timeout, "gate timed out");
                Err(GateError::TimedOut {
                    description: self.inner.description.clone(),
                })
            }
        }
    }

    /// Resolves once the flag is set
    async fn fulfilled(&self) {
        let mut rx = self.inner.fulfilled.subscribe();
        // `self` owns the sender, so the channel cannot close while we wait
        if rx.wait_for(|fulfilled| *fulfilled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Wait for a single gate
pub async fn wait(gate: &Gate, timeout: Duration) -> Result<(), GateError> {
    gate.wait(timeout).await
}

/// Wait until every gate is fulfilled, under one shared deadline
///
/// On timeout the error describes the gates that were still pending.
pub async fn wait_all(gates: &[Gate], timeout: Duration) -> Result<(), GateError> {
    let all = join_all(gates.iter().map(Gate::fulfilled));
    if tokio::time::timeout(timeout, all).await.is_ok() {
        return Ok(());
    }

    let mut pending: Vec<&str> = gates
        .iter()
        .filter(|gate| !gate.is_fulfilled())
        .map(Gate::description)
        .collect();
    if pending.is_empty() {
        pending = gates.iter().map(Gate::description).collect();
    }

    let description = pending.join(", ");
    tracing::warn!(gates = %description, ?timeout, "gates timed out");
    Err(GateError::TimedOut { description })
}
