//! Configuration module — the load/edit/dirty-tracking/save lifecycle.
//!
//! Provides [`DictationConfig`] (the host-persisted record), [`ConfigOptions`]
//! (static dropdown metadata), and [`ConfigSession`] (working/baseline copies,
//! typed field updates via [`ConfigUpdate`], and the save/dirty contract).
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use dictation_settings::bridge::{BridgeGateway, HostSlot, WindowControl};
//! use dictation_settings::config::{ConfigSession, ConfigUpdate};
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
//!     let mut session = ConfigSession::new(gateway);
//!     if session.load().await.is_ok() {
//!         session.update(ConfigUpdate::ModelSize("small".into()));
//!         assert!(session.is_dirty());
//!         let _ = session.save().await;
//!     }
//! }
//! ```

pub mod options;
pub mod session;
pub mod settings;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use options::ConfigOptions;
pub use session::{ConfigSession, ConfigUpdate};
pub use settings::DictationConfig;
