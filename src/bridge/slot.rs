//! `HostSlot` — write-once host handle plus the readiness handshake.
//!
//! # Design
//!
//! The host injects its capability object at an unpredictable point after UI
//! startup, and the environment's "ready" notification is unreliable in both
//! directions: it can fire before anyone is listening, and the object can
//! appear without a notification ever firing.  [`HostSlot::await_ready`]
//! therefore resolves on the **first** of three signals:
//!
//! ```text
//! await_ready()
//!     │
//!     ├── already installed ────────────────▶ resolve now
//!     │
//!     └── select! {
//!             ready notification ──────────▶ resolve
//!             100 ms poll tick, installed ─▶ resolve
//!             10 s deadline ───────────────▶ re-check once:
//!                                             installed → resolve
//!                                             absent    → Unavailable
//!         }
//! ```
//!
//! The deadline re-check treats the timeout race as advisory: a host that
//! appears at the last instant still wins.  Every call owns its own poll
//! interval and deadline future, so concurrent callers resolve independently
//! and no timer outlives its call.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tokio::sync::Notify;

use crate::bridge::{BridgeError, HostApi};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// How often `await_ready` re-checks the slot while waiting.
pub const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How long `await_ready` waits before giving up (after one final re-check).
pub const READY_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// HostSlot
// ---------------------------------------------------------------------------

/// The single owner of the host capability handle.
///
/// The handle is write-once: once [`install`](HostSlot::install) succeeds it
/// is never revoked for the lifetime of the UI process.  [`get`](HostSlot::get)
/// is lock-free after installation, so wrapped operations pay no
/// synchronization cost on the hot path.
pub struct HostSlot {
    api: OnceLock<Arc<dyn HostApi>>,
    ready: Notify,
}

impl HostSlot {
    /// Create an empty slot.  The host environment fills it later via
    /// [`install`](HostSlot::install).
    pub fn new() -> Self {
        Self {
            api: OnceLock::new(),
            ready: Notify::new(),
        }
    }

    /// Install the host capability object.  A second install is ignored with
    /// a warning — the handle is write-once.
    pub fn install(&self, api: Arc<dyn HostApi>) {
        if self.api.set(api).is_err() {
            log::warn!("host capability object installed twice; keeping the first");
        }
    }

    /// Fire the environment-level readiness notification, waking any
    /// `await_ready` callers.  Hosts normally call this right after
    /// [`install`](HostSlot::install), but `await_ready` does not rely on it.
    pub fn announce_ready(&self) {
        self.ready.notify_waiters();
    }

    /// The installed handle, if any.  Cheap; never blocks.
    pub fn get(&self) -> Option<Arc<dyn HostApi>> {
        self.api.get().cloned()
    }

    /// Resolve once the host capability object is observable.
    ///
    /// Resolves immediately when the object is already installed.  Otherwise
    /// waits on the first of {readiness notification, poll tick, deadline}
    /// as described in the module docs.  Safe to call concurrently: each
    /// call resolves exactly once and releases its timers on return.
    pub async fn await_ready(&self) -> Result<Arc<dyn HostApi>, BridgeError> {
        self.await_ready_with(READY_POLL_INTERVAL, READY_TIMEOUT).await
    }

    /// [`await_ready`](HostSlot::await_ready) with explicit poll interval and
    /// deadline.
    pub async fn await_ready_with(
        &self,
        poll_interval: Duration,
        deadline: Duration,
    ) -> Result<Arc<dyn HostApi>, BridgeError> {
        if let Some(api) = self.get() {
            return Ok(api);
        }

        let notified = self.ready.notified();
        tokio::pin!(notified);
        // Register interest before the re-check so an install+announce racing
        // this call cannot slip between the check and the subscription.
        notified.as_mut().enable();
        if let Some(api) = self.get() {
            return Ok(api);
        }

        let mut ticks = tokio::time::interval(poll_interval);
        // The first tick fires immediately; skip it, we just checked.
        ticks.tick().await;

        let timeout = tokio::time::sleep(deadline);
        tokio::pin!(timeout);

        loop {
            tokio::select! {
                _ = notified.as_mut() => {
                    if let Some(api) = self.get() {
                        return Ok(api);
                    }
                    // Notification without an installed object: keep waiting
                    // on a re-armed listener and the poll ticks.
                    notified.set(self.ready.notified());
                    notified.as_mut().enable();
                }
                _ = ticks.tick() => {
                    if let Some(api) = self.get() {
                        return Ok(api);
                    }
                }
                _ = &mut timeout => {
                    // Advisory timeout: one last direct check before failing.
                    return self.get().ok_or(BridgeError::Unavailable);
                }
            }
        }
    }
}

impl Default for HostSlot {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
