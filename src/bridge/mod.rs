//! Host-bridge module — the single point of contact with the native host.
//!
//! The settings front-end runs in a UI process that does **not** own
//! transcription, audio capture, or hotkey registration.  All of that lives
//! in a host process which injects a capability object into the UI runtime
//! at some point after startup — possibly never.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                    BridgeGateway                        │
//! │   per-operation fallbacks + bounded call timeouts      │
//! │                         │                              │
//! │                         ▼                              │
//! │                     HostSlot                           │
//! │   write-once Arc<dyn HostApi> + readiness handshake    │
//! │   (Notify signal ∥ 100 ms poll ∥ 10 s deadline)        │
//! │                         │                              │
//! │                         ▼                              │
//! │                 HostApi (trait)                        │
//! │   close_window · capture_hotkey · get_devices ·        │
//! │   get_config · save_config · get_config_options ·      │
//! │   get_dictionary · add/remove/update_word · train_word │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use dictation_settings::bridge::{BridgeGateway, HostSlot, WindowControl};
//!
//! struct NoopWindow;
//! impl WindowControl for NoopWindow {
//!     fn close(&self) {}
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let slot = Arc::new(HostSlot::new());
//!     let gateway = BridgeGateway::new(Arc::clone(&slot), Arc::new(NoopWindow));
//!
//!     // Somewhere else, the host environment calls:
//!     //     slot.install(api);
//!     //     slot.announce_ready();
//!
//!     match gateway.await_ready().await {
//!         Ok(_) => println!("host connected"),
//!         Err(e) => eprintln!("no host: {e}"),
//!     }
//! }
//! ```

use thiserror::Error;

pub mod gateway;
pub mod host;
pub mod slot;

// ---------------------------------------------------------------------------
// BridgeError
// ---------------------------------------------------------------------------

/// All errors that can arise at the host boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BridgeError {
    /// The host capability object never appeared within the readiness
    /// window, or an operation that requires it was invoked without it.
    #[error("host bridge unavailable — is the host process running?")]
    Unavailable,

    /// A host call did not complete within the bounded per-call timeout.
    #[error("host call '{0}' timed out")]
    CallTimeout(&'static str),

    /// The host returned an explicit failure payload, or the transport
    /// rejected the call.
    #[error("host call failed: {0}")]
    HostCallFailed(String),

    /// Host-side business validation rejected the request (e.g. duplicate
    /// word).  Delivered by the host as a `success = false` payload rather
    /// than a transport error.
    #[error("rejected by host: {0}")]
    ValidationRejected(String),

    /// An inbound push payload did not match the expected shape.
    #[error("malformed host payload: {0}")]
    MalformedPayload(String),

    /// A configuration operation was attempted before a snapshot was loaded.
    #[error("no configuration loaded")]
    NotLoaded,
}

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use gateway::{BridgeGateway, WindowControl, CALL_TIMEOUT, TRAIN_CALL_TIMEOUT};
pub use host::{
    AddWordOutcome, AudioDevice, DictionaryEntry, HostApi, RoundResult, SaveOutcome, TrainOutcome,
    UpdateWordOutcome,
};
pub use slot::{HostSlot, READY_POLL_INTERVAL, READY_TIMEOUT};

// test-only re-export so sibling test modules can import MockHost without
// `use dictation_settings::bridge::host::MockHost`.
#[cfg(test)]
pub use host::MockHost;
