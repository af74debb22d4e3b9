//! Inbound-frame dispatch: parse, then route to the pending table or the
//! subscription registry.

use tracing::{debug, error, trace, warn};

use crate::message::CdpMessage;
use crate::pending::PendingTable;
use crate::subscriptions::SubscriptionRegistry;

/// Parse one raw inbound frame and route it.
///
/// - Malformed JSON: logged and dropped.
/// - A response (`id` present): matched against `pending`. Orphan
///   responses (no matching outstanding request) are logged and dropped.
/// - An event (`method` present, no `id`): handed to `subscriptions` for
///   fan-out. An event frame that also carries a top-level `error` is
///   logged and dropped without notifying anyone, per the wire-format
///   invariant that such a frame indicates a malformed or pathological
///   push from the browser rather than a real event.
pub fn dispatch(raw: &str, pending: &mut PendingTable, subscriptions: &SubscriptionRegistry) {
    let message: CdpMessage = match serde_json::from_str(raw) {
        Ok(m) => m,
        Err(e) => {
            error!(error = %e, "failed to parse inbound CDP frame");
            return;
        }
    };

    match message {
        CdpMessage::Response(response) => {
            trace!(id = response.id, has_error = response.error.is_some(), "dispatching response");
            pending.fulfill(response);
        }
        CdpMessage::Event(event) => {
            if event.error.is_some() {
                warn!(method = %event.method, "dropping event frame with top-level error");
                return;
            }
            debug!(method = %event.method, "dispatching event");
            subscriptions.notify(&event);
        }
    }
}
