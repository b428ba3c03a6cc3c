//! Training module — push-driven word-training state and dictionary
//! management.
//!
//! # Data flow
//!
//! ```text
//!                 push (fire-and-forget JSON)
//!   host ─────────────────────────────────────▶ StatusSinkSlot
//!                                                    │ mpsc (unbounded)
//!                                                    ▼
//!   host ◀──── train_word / get_dictionary ──── TrainingSession
//!              (via BridgeGateway)                   │
//!                                                    ▼
//!                                          latest TrainingStatus
//!                                          + dictionary entries
//! ```
//!
//! [`StatusSinkSlot`] is the single inbound callback the host pushes
//! [`TrainingStatus`] events through; [`TrainingSession`] consumes them with
//! a replace-in-place reduction and re-fetches the dictionary when a run
//! reaches a terminal state.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use dictation_settings::bridge::{BridgeGateway, HostSlot, WindowControl};
//! use dictation_settings::training::{StatusSinkSlot, TrainingSession};
//!
//! struct NoopWindow;
//! impl WindowControl for NoopWindow {
//!     fn close(&self) {}
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let gateway = Arc::new(BridgeGateway::new(
//!         Arc::new(HostSlot::new()),
//!         Arc::new(NoopWindow),
//!     ));
//!
//!     let sink = StatusSinkSlot::new();
//!     let (_registration, rx) = sink.register();
//!
//!     let session = TrainingSession::new(gateway);
//!     let consumer = {
//!         let session = session.clone();
//!         tokio::spawn(async move { session.run(rx).await })
//!     };
//!
//!     session.refresh_dictionary().await;
//!     if session.start_training("kubectl") {
//!         // progress arrives through the sink; session.status() tracks it
//!     }
//!     consumer.abort();
//! }
//! ```

pub mod session;
pub mod sink;
pub mod status;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use session::{TrainingSession, STATUS_CLEAR_DELAY};
pub use sink::{SinkRegistration, StatusSinkSlot};
pub use status::TrainingStatus;
