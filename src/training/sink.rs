//! `StatusSinkSlot` — the single registered inbound callback the host pushes
//! training events through.
//!
//! # Design
//!
//! The host side sees one function: [`StatusSinkSlot::push`], invoked
//! fire-and-forget with an untyped payload and no acknowledgement channel.
//! The consumer side registers exactly one subscriber at a time via
//! [`StatusSinkSlot::register`]; registering again **replaces** the previous
//! subscriber (its receiver goes dead) rather than stacking handlers.
//!
//! [`SinkRegistration`] deregisters on drop, so tearing down the consumer
//! leaves no dangling reference that could fire into a destroyed context.
//! A stale registration guard (one that has already been replaced) does
//! nothing on drop — it must not tear down its successor.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::training::TrainingStatus;

// ---------------------------------------------------------------------------
// StatusSinkSlot
// ---------------------------------------------------------------------------

struct SlotInner {
    tx: Option<mpsc::UnboundedSender<TrainingStatus>>,
    /// Incremented on every registration; lets a stale guard recognize that
    /// it has been replaced.
    epoch: u64,
}

/// Singleton registration slot for the host's training push channel.
///
/// Cheap to clone; the host environment holds one clone and the training
/// consumer another.
#[derive(Clone)]
pub struct StatusSinkSlot {
    inner: Arc<Mutex<SlotInner>>,
}

impl StatusSinkSlot {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SlotInner { tx: None, epoch: 0 })),
        }
    }

    /// Register the (single) subscriber.  Any previous registration is
    /// replaced — its receiver will see the channel close.
    pub fn register(&self) -> (SinkRegistration, mpsc::UnboundedReceiver<TrainingStatus>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock().unwrap();
        inner.epoch += 1;
        inner.tx = Some(tx);
        (
            SinkRegistration {
                inner: Arc::clone(&self.inner),
                epoch: inner.epoch,
            },
            rx,
        )
    }

    /// Host-facing entry point: decode and forward one raw push payload.
    ///
    /// Malformed payloads are dropped with a warning; events arriving with
    /// no subscriber registered are discarded — the host neither expects nor
    /// receives an acknowledgement.
    pub fn push(&self, payload: serde_json::Value) {
        let status = match TrainingStatus::from_payload(payload) {
            Ok(status) => status,
            Err(e) => {
                log::warn!("dropping malformed training event: {e}");
                return;
            }
        };

        let inner = self.inner.lock().unwrap();
        if let Some(tx) = &inner.tx {
            if tx.send(status).is_err() {
                log::debug!("training event dropped: subscriber receiver is gone");
            }
        } else {
            log::debug!("training event dropped: no subscriber registered");
        }
    }
}

impl Default for StatusSinkSlot {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// SinkRegistration
// ---------------------------------------------------------------------------

/// Guard for an active sink subscription.  Dropping it deregisters the
/// subscriber — unless a newer registration has already replaced it.
pub struct SinkRegistration {
    inner: Arc<Mutex<SlotInner>>,
    epoch: u64,
}

impl Drop for SinkRegistration {
    fn drop(&mut self) {
        let mut inner = self.inner.lock().unwrap();
        if inner.epoch == self.epoch {
            inner.tx = None;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn recording_event(word: &str, round: u32) -> serde_json::Value {
        serde_json::json!({
            "status": "recording",
            "word": word,
            "round": round,
            "totalRounds": 3
        })
    }

    #[tokio::test]
    async fn pushed_events_reach_the_subscriber() {
        let slot = StatusSinkSlot::new();
        let (_reg, mut rx) = slot.register();

        slot.push(recording_event("kubectl", 1));

        let status = rx.recv().await.unwrap();
        assert_eq!(status.word(), Some("kubectl"));
    }

    #[tokio::test]
    async fn push_without_subscriber_is_discarded() {
        let slot = StatusSinkSlot::new();
        // Must not panic or block.
        slot.push(recording_event("kubectl", 1));
    }

    #[tokio::test]
    async fn malformed_payload_is_dropped_not_delivered() {
        let slot = StatusSinkSlot::new();
        let (_reg, mut rx) = slot.register();

        slot.push(serde_json::json!({ "status": "nonsense" }));
        slot.push(recording_event("kubectl", 1));

        // Only the valid event comes through.
        let status = rx.recv().await.unwrap();
        assert_eq!(status.word(), Some("kubectl"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn second_registration_replaces_the_first() {
        let slot = StatusSinkSlot::new();
        let (_reg_a, mut rx_a) = slot.register();
        let (_reg_b, mut rx_b) = slot.register();

        slot.push(recording_event("kubectl", 1));

        // The replaced receiver sees a closed channel, not the event.
        assert!(rx_a.recv().await.is_none());
        assert_eq!(rx_b.recv().await.unwrap().word(), Some("kubectl"));
    }

    #[tokio::test]
    async fn dropping_registration_deregisters() {
        let slot = StatusSinkSlot::new();
        let (reg, mut rx) = slot.register();

        drop(reg);
        slot.push(recording_event("kubectl", 1));

        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn stale_guard_drop_does_not_kill_successor() {
        let slot = StatusSinkSlot::new();
        let (reg_a, _rx_a) = slot.register();
        let (_reg_b, mut rx_b) = slot.register();

        // reg_a was already replaced; dropping it must not deregister reg_b.
        drop(reg_a);
        slot.push(recording_event("kubectl", 1));

        assert_eq!(rx_b.recv().await.unwrap().word(), Some("kubectl"));
    }
}
