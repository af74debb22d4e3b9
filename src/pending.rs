//! Pending-request table: request ID to single-use completion handle.

use std::collections::HashMap;

use tokio::sync::oneshot;
use tracing::{trace, warn};

use crate::message::CdpResponse;

/// Tracks in-flight requests by ID, matching each to a one-shot completion
/// handle that the caller awaiting the response holds the receiving end of.
#[derive(Debug, Default)]
pub struct PendingTable {
    entries: HashMap<u64, oneshot::Sender<CdpResponse>>,
}

impl PendingTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new pending request, returning the receiver half the
    /// caller should await.
    pub fn register(&mut self, id: u64) -> oneshot::Receiver<CdpResponse> {
        let (tx, rx) = oneshot::channel();
        self.entries.insert(id, tx);
        trace!(id, pending_count = self.entries.len(), "registered pending request");
        rx
    }

    /// Remove a pending entry without completing it, e.g. after a timeout
    /// fires and the caller is no longer waiting.
    pub fn cancel(&mut self, id: u64) {
        self.entries.remove(&id);
    }

    /// Complete the pending request for `response.id`, if one is
    /// outstanding. Logs and drops the response otherwise.
    pub fn fulfill(&mut self, response: CdpResponse) {
        let id = response.id;
        match self.entries.remove(&id) {
            Some(sender) => {
                let _ = sender.send(response);
            }
            None => warn!(id, "received response for unknown request ID"),
        }
    }

    /// Drain all pending entries, dropping their sender halves so every
    /// waiting caller observes a closed channel (translated by the caller
    /// into [`crate::error::CdpError::Disconnected`]).
    pub fn drain(&mut self) {
        let count = self.entries.len();
        if count > 0 {
            trace!(count, "draining pending requests on disconnect");
        }
        self.entries.clear();
    }

    /// Number of requests currently outstanding.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no requests outstanding.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests;
