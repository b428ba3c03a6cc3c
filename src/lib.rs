//! Host-bridge synchronization layer for a dictation settings front-end.
//!
//! The settings UI runs embedded in a desktop host that injects a capability
//! object at an unpredictable moment after startup.  This crate owns the
//! awkward parts of that arrangement: discovering when the host is callable,
//! degrading sensibly when it never is, and keeping two stateful flows — the
//! configuration form and the word-training workflow — consistent with the
//! host as the single source of truth.
//!
//! # Architecture
//!
//! ```text
//!   host capability object          host push channel
//!          │                               │
//!          ▼                               ▼
//!      HostSlot ──▶ BridgeGateway     StatusSinkSlot
//!     (readiness)   (fallbacks,            │
//!          │         timeouts)             │
//!          │             │                 │
//!          │     ┌───────┴───────┐         │
//!          ▼     ▼               ▼         ▼
//!        ConfigSession       TrainingSession
//!        (load / edit /      (status reduction,
//!         dirty / save)       dictionary view)
//! ```
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`bridge`] | readiness handshake, typed host surface, per-operation fallbacks, call timeouts |
//! | [`config`] | working/baseline configuration copies, typed updates, dirty tracking, full-payload save |
//! | [`training`] | single-subscriber push sink, training status reduction, dictionary management |

pub mod bridge;
pub mod config;
pub mod training;
