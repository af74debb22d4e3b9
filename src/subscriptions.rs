//! Subscription registry: persistent listeners, one-shot waiters, and the
//! catch-all sink.
//!
//! Persistent subscriptions are stored in a slab so that unsubscribing (via
//! dropping a [`SubscriptionHandle`] or calling
//! [`SubscriptionRegistry::unsubscribe`]) is O(1) and cannot race with a
//! concurrently-arriving event for the same slot: every handle carries the
//! generation the slot had when it was issued, and a slot whose generation
//! has moved on is simply treated as empty.

use std::sync::Mutex;

use tokio::sync::oneshot;
use tracing::{debug, trace};

use crate::message::CdpEvent;

/// A handle to a persistent event subscription.
///
/// Dropping the handle does not automatically unsubscribe; call
/// [`SubscriptionRegistry::unsubscribe`] explicitly. The handle is cheap to
/// clone-by-copy (it is `Copy`) since it is just a slot index and
/// generation stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionHandle {
    index: usize,
    generation: u64,
}

#[derive(Debug)]
struct Slot {
    generation: u64,
    entry: Option<Entry>,
}

#[derive(Debug)]
struct Entry {
    event_name: String,
    sender: tokio::sync::mpsc::UnboundedSender<CdpEvent>,
}

/// A one-shot waiter for the first event whose method matches any name in
/// a caller-supplied set.
#[derive(Debug)]
struct OnceAnyWaiter {
    event_names: Vec<String>,
    sender: Option<oneshot::Sender<CdpEvent>>,
}

#[derive(Default, Debug)]
struct Inner {
    slots: Vec<Slot>,
    free: Vec<usize>,
    once_any: Vec<OnceAnyWaiter>,
    sink: Option<tokio::sync::mpsc::UnboundedSender<CdpEvent>>,
}

/// Registry of everything interested in inbound CDP events.
#[derive(Default, Debug)]
pub struct SubscriptionRegistry {
    inner: Mutex<Inner>,
}

impl SubscriptionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a persistent subscription to events named `event_name`,
    /// returning the handle and the receiving end of the channel events
    /// will be delivered on.
    pub fn subscribe(
        &self,
        event_name: impl Into<String>,
    ) -> (SubscriptionHandle, tokio::sync::mpsc::UnboundedReceiver<CdpEvent>) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let event_name = event_name.into();
        let mut inner = self.inner.lock().unwrap();
        let entry = Entry {
            event_name: event_name.clone(),
            sender: tx,
        };
        let handle = if let Some(index) = inner.free.pop() {
            let slot = &mut inner.slots[index];
            slot.entry = Some(entry);
            SubscriptionHandle {
                index,
                generation: slot.generation,
            }
        } else {
            let index = inner.slots.len();
            inner.slots.push(Slot {
                generation: 0,
                entry: Some(entry),
            });
            SubscriptionHandle {
                index,
                generation: 0,
            }
        };
        debug!(event_name, index = handle.index, "subscribed to event");
        (handle, rx)
    }

    /// Remove a persistent subscription. A no-op if the handle's
    /// generation no longer matches (already unsubscribed).
    pub fn unsubscribe(&self, handle: SubscriptionHandle) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(slot) = inner.slots.get_mut(handle.index) {
            if slot.generation == handle.generation && slot.entry.is_some() {
                slot.entry = None;
                slot.generation = slot.generation.wrapping_add(1);
                inner.free.push(handle.index);
                trace!(index = handle.index, "unsubscribed");
            }
        }
    }

    /// Register a one-shot waiter that resolves with the first event whose
    /// method is in `event_names`.
    pub fn once_any(&self, event_names: Vec<String>) -> oneshot::Receiver<CdpEvent> {
        let (tx, rx) = oneshot::channel();
        let mut inner = self.inner.lock().unwrap();
        inner.once_any.push(OnceAnyWaiter {
            event_names,
            sender: Some(tx),
        });
        rx
    }

    /// Install (replacing any previous one) the catch-all sink that
    /// receives every event regardless of subscription state.
    pub fn set_sink(&self, sink: tokio::sync::mpsc::UnboundedSender<CdpEvent>) {
        self.inner.lock().unwrap().sink = Some(sink);
    }

    /// Remove the catch-all sink, if any.
    pub fn clear_sink(&self) {
        self.inner.lock().unwrap().sink = None;
    }

    /// Fan an inbound event out to every interested listener: every matching
    /// persistent subscription, then at most the first matching live
    /// one-shot waiter (consumed and removed), then the catch-all sink. Dead
    /// channels (receiver dropped) are pruned from their slot/vec as they're
    /// discovered.
    pub fn notify(&self, event: &CdpEvent) {
        let mut inner = self.inner.lock().unwrap();

        let mut newly_dead = Vec::new();
        for (index, slot) in inner.slots.iter_mut().enumerate() {
            let Some(entry) = &slot.entry else { continue };
            if entry.event_name != event.method {
                continue;
            }
            if entry.sender.send(event.clone()).is_err() {
                trace!(event_name = %entry.event_name, "pruning dead subscription");
                slot.entry = None;
                slot.generation = slot.generation.wrapping_add(1);
                newly_dead.push(index);
            }
        }
        inner.free.extend(newly_dead);

        // Prune waiters whose receiver was dropped, then resolve at most the
        // first remaining live waiter whose set contains this event — a
        // one-shot waiter resolves at most one of them, never all matching
        // waiters at once.
        inner.once_any.retain(|waiter| waiter.sender.as_ref().is_some_and(|s| !s.is_closed()));
        if let Some(index) = inner
            .once_any
            .iter()
            .position(|waiter| waiter.event_names.iter().any(|n| n == &event.method))
        {
            let mut waiter = inner.once_any.remove(index);
            if let Some(sender) = waiter.sender.take() {
                let _ = sender.send(event.clone());
            }
        }

        if let Some(sink) = &inner.sink {
            if sink.send(event.clone()).is_err() {
                inner.sink = None;
            }
        }
    }

    /// Number of live persistent subscriptions, for tests and diagnostics.
    pub fn subscription_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap()
            .slots
            .iter()
            .filter(|s| s.entry.is_some())
            .count()
    }

    /// Number of outstanding one-shot waiters, for tests and diagnostics.
    pub fn once_any_count(&self) -> usize {
        self.inner.lock().unwrap().once_any.len()
    }
}
