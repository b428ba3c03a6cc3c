//! `BridgeGateway` — the uniform call surface over the host capability
//! object, with graceful degradation when the host is absent.
//!
//! # Fallback matrix
//!
//! Absence of the host is not uniformly an error; each operation defines its
//! own no-host behavior:
//!
//! | Operation | No host |
//! |-----------|---------|
//! | `close_window` | direct [`WindowControl::close`] |
//! | `capture_hotkey` | `Ok(None)` + warning |
//! | `get_devices`, `get_dictionary` | empty `Vec`, never an error |
//! | `get_config`, `get_config_options` | [`BridgeError::Unavailable`] |
//! | `save_config`, `add_word`, `remove_word`, `update_word`, `train_word` | [`BridgeError::Unavailable`] |
//!
//! Passive reads degrade; user-initiated mutations never silently no-op.
//!
//! # Call timeouts
//!
//! The host offers no cancellation primitive, so every wrapped call is
//! bounded by [`CALL_TIMEOUT`] (and `train_word` by the longer
//! [`TRAIN_CALL_TIMEOUT`] — a run records and transcribes several rounds).
//! A call that outlives its bound yields [`BridgeError::CallTimeout`]
//! instead of pending forever.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::bridge::host::{AudioDevice, DictionaryEntry, TrainOutcome};
use crate::bridge::{BridgeError, HostApi, HostSlot};
use crate::config::{ConfigOptions, DictationConfig};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Upper bound for a single host call.
pub const CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound for `train_word`, which spans multiple recording rounds.
pub const TRAIN_CALL_TIMEOUT: Duration = Duration::from_secs(120);

// ---------------------------------------------------------------------------
// WindowControl
// ---------------------------------------------------------------------------

/// Direct window-close primitive, used when `close_window` cannot reach the
/// host.  The presentation layer supplies the implementation.
pub trait WindowControl: Send + Sync {
    fn close(&self);
}

// ---------------------------------------------------------------------------
// BridgeGateway
// ---------------------------------------------------------------------------

/// Typed wrapper operations over the host, with per-operation fallbacks.
///
/// Holds no state beyond the [`HostSlot`] handle and the window-close
/// fallback; all configuration and training state lives in the session
/// components built on top of it.
pub struct BridgeGateway {
    slot: Arc<HostSlot>,
    window: Arc<dyn WindowControl>,
    call_timeout: Duration,
    train_timeout: Duration,
}

impl BridgeGateway {
    pub fn new(slot: Arc<HostSlot>, window: Arc<dyn WindowControl>) -> Self {
        Self {
            slot,
            window,
            call_timeout: CALL_TIMEOUT,
            train_timeout: TRAIN_CALL_TIMEOUT,
        }
    }

    /// Override the call timeouts (useful for tests).
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self.train_timeout = timeout;
        self
    }

    /// Wait for the host capability object; see [`HostSlot::await_ready`].
    pub async fn await_ready(&self) -> Result<Arc<dyn HostApi>, BridgeError> {
        self.slot.await_ready().await
    }

    /// The slot this gateway reads from.
    pub fn slot(&self) -> &Arc<HostSlot> {
        &self.slot
    }

    async fn bounded<T>(
        &self,
        op: &'static str,
        limit: Duration,
        call: impl Future<Output = Result<T, BridgeError>>,
    ) -> Result<T, BridgeError> {
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(BridgeError::CallTimeout(op)),
        }
    }

    // -----------------------------------------------------------------------
    // Window / hotkey
    // -----------------------------------------------------------------------

    /// Close the settings window via the host, falling back to the direct
    /// window primitive when the host is absent or the call fails.  The
    /// window must close either way.
    pub async fn close_window(&self) {
        match self.slot.get() {
            Some(host) => {
                if let Err(e) = self
                    .bounded("close_window", self.call_timeout, host.close_window())
                    .await
                {
                    log::warn!("host close_window failed ({e}); closing directly");
                    self.window.close();
                }
            }
            None => self.window.close(),
        }
    }

    /// Capture a key combination interactively.  Best-effort: without a host
    /// this resolves to `Ok(None)` with a warning rather than failing.
    pub async fn capture_hotkey(&self, timeout_secs: u64) -> Result<Option<String>, BridgeError> {
        match self.slot.get() {
            Some(host) => {
                self.bounded(
                    "capture_hotkey",
                    self.call_timeout,
                    host.capture_hotkey(timeout_secs),
                )
                .await
            }
            None => {
                log::warn!("capture_hotkey: no host available, returning no combination");
                Ok(None)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Passive reads — degrade to empty collections
    // -----------------------------------------------------------------------

    /// List audio input devices.  Empty when the host is absent or the call
    /// fails — device enumeration is a passive read.
    pub async fn get_devices(&self) -> Vec<AudioDevice> {
        let Some(host) = self.slot.get() else {
            return Vec::new();
        };
        match self
            .bounded("get_devices", self.call_timeout, host.get_devices())
            .await
        {
            Ok(devices) => devices,
            Err(e) => {
                log::warn!("get_devices failed ({e}); returning empty list");
                Vec::new()
            }
        }
    }

    /// Fetch all dictionary entries.  Empty when the host is absent or the
    /// call fails.
    pub async fn get_dictionary(&self) -> Vec<DictionaryEntry> {
        let Some(host) = self.slot.get() else {
            return Vec::new();
        };
        match self
            .bounded("get_dictionary", self.call_timeout, host.get_dictionary())
            .await
        {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("get_dictionary failed ({e}); returning empty list");
                Vec::new()
            }
        }
    }

    // -----------------------------------------------------------------------
    // Required singleton reads
    // -----------------------------------------------------------------------

    /// Fetch the persisted configuration.  There is no meaningful default,
    /// so an absent host is an error.
    pub async fn get_config(&self) -> Result<DictationConfig, BridgeError> {
        let host = self.slot.get().ok_or(BridgeError::Unavailable)?;
        self.bounded("get_config", self.call_timeout, host.get_config())
            .await
    }

    /// Fetch static option metadata for the settings dropdowns.
    pub async fn get_config_options(&self) -> Result<ConfigOptions, BridgeError> {
        let host = self.slot.get().ok_or(BridgeError::Unavailable)?;
        self.bounded(
            "get_config_options",
            self.call_timeout,
            host.get_config_options(),
        )
        .await
    }

    // -----------------------------------------------------------------------
    // Mutations — never silently no-op
    // -----------------------------------------------------------------------

    /// Persist a full configuration record.  Returns the host-normalized
    /// config when the host echoes one back.
    pub async fn save_config(
        &self,
        config: &DictationConfig,
    ) -> Result<Option<DictationConfig>, BridgeError> {
        let host = self.slot.get().ok_or(BridgeError::Unavailable)?;
        let outcome = self
            .bounded(
                "save_config",
                self.call_timeout,
                host.save_config(config.clone()),
            )
            .await?;
        if outcome.success {
            Ok(outcome.config)
        } else {
            Err(BridgeError::ValidationRejected(
                outcome.error.unwrap_or_else(|| "save rejected".into()),
            ))
        }
    }

    /// Add (or upsert) a dictionary word.
    pub async fn add_word(
        &self,
        word: &str,
        phonetic: &str,
    ) -> Result<DictionaryEntry, BridgeError> {
        let host = self.slot.get().ok_or(BridgeError::Unavailable)?;
        let outcome = self
            .bounded("add_word", self.call_timeout, host.add_word(word, phonetic))
            .await?;
        if let Some(error) = outcome.error {
            return Err(BridgeError::ValidationRejected(error));
        }
        outcome
            .entry
            .ok_or_else(|| BridgeError::HostCallFailed("add_word returned no entry".into()))
    }

    /// Remove a dictionary word.  `Ok(false)` when the word was not present.
    pub async fn remove_word(&self, word: &str) -> Result<bool, BridgeError> {
        let host = self.slot.get().ok_or(BridgeError::Unavailable)?;
        self.bounded("remove_word", self.call_timeout, host.remove_word(word))
            .await
    }

    /// Rename a word and/or replace its phonetic hint.
    pub async fn update_word(
        &self,
        old_word: &str,
        new_word: &str,
        phonetic: &str,
    ) -> Result<(), BridgeError> {
        let host = self.slot.get().ok_or(BridgeError::Unavailable)?;
        let outcome = self
            .bounded(
                "update_word",
                self.call_timeout,
                host.update_word(old_word, new_word, phonetic),
            )
            .await?;
        if outcome.success {
            Ok(())
        } else {
            Err(BridgeError::ValidationRejected(
                outcome.error.unwrap_or_else(|| "update rejected".into()),
            ))
        }
    }

    /// Run a training session for `word`.  Intermediate progress arrives via
    /// the push channel; the returned outcome is the final summary.  As with
    /// the other mutations, a `success = false` payload maps to
    /// [`BridgeError::ValidationRejected`] — the host reports both input
    /// rejections and runtime faults (mic errors) through the same payload,
    /// without distinguishing them.  Transport failures stay
    /// [`BridgeError::HostCallFailed`].
    pub async fn train_word(&self, word: &str) -> Result<TrainOutcome, BridgeError> {
        let host = self.slot.get().ok_or(BridgeError::Unavailable)?;
        let outcome = self
            .bounded("train_word", self.train_timeout, host.train_word(word))
            .await?;
        if outcome.success {
            Ok(outcome)
        } else {
            Err(BridgeError::ValidationRejected(
                outcome.error.unwrap_or_else(|| "training failed".into()),
            ))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::MockHost;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Route `log` output through the test harness for the degraded-path
    /// tests; `RUST_LOG` works as usual.
    fn init_logs() {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
            .is_test(true)
            .try_init();
    }

    /// Records direct-close invocations.
    struct RecordingWindow {
        closes: AtomicU32,
    }

    impl RecordingWindow {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                closes: AtomicU32::new(0),
            })
        }
    }

    impl WindowControl for RecordingWindow {
        fn close(&self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn gateway_without_host() -> (BridgeGateway, Arc<RecordingWindow>) {
        let window = RecordingWindow::new();
        let gateway = BridgeGateway::new(Arc::new(HostSlot::new()), window.clone());
        (gateway, window)
    }

    fn gateway_with_host(host: MockHost) -> (BridgeGateway, Arc<MockHost>, Arc<RecordingWindow>) {
        let host = Arc::new(host);
        let slot = Arc::new(HostSlot::new());
        slot.install(host.clone() as Arc<dyn HostApi>);
        let window = RecordingWindow::new();
        let gateway = BridgeGateway::new(slot, window.clone());
        (gateway, host, window)
    }

    // ---- no-host fallbacks ---

    #[tokio::test]
    async fn no_host_collection_reads_return_empty() {
        let (gateway, _window) = gateway_without_host();

        assert!(gateway.get_devices().await.is_empty());
        assert!(gateway.get_dictionary().await.is_empty());
    }

    #[tokio::test]
    async fn no_host_config_reads_fail_with_unavailable() {
        let (gateway, _window) = gateway_without_host();

        assert_eq!(gateway.get_config().await.err(), Some(BridgeError::Unavailable));
        assert_eq!(
            gateway.get_config_options().await.err(),
            Some(BridgeError::Unavailable)
        );
    }

    #[tokio::test]
    async fn no_host_mutations_fail_with_unavailable() {
        let (gateway, _window) = gateway_without_host();
        let config = DictationConfig::default();

        assert_eq!(
            gateway.save_config(&config).await.err(),
            Some(BridgeError::Unavailable)
        );
        assert_eq!(
            gateway.add_word("kubectl", "").await.err(),
            Some(BridgeError::Unavailable)
        );
        assert_eq!(
            gateway.remove_word("kubectl").await.err(),
            Some(BridgeError::Unavailable)
        );
        assert_eq!(
            gateway.update_word("a", "b", "").await.err(),
            Some(BridgeError::Unavailable)
        );
        assert_eq!(
            gateway.train_word("kubectl").await.err(),
            Some(BridgeError::Unavailable)
        );
    }

    #[tokio::test]
    async fn no_host_close_falls_back_to_window_primitive() {
        let (gateway, window) = gateway_without_host();

        gateway.close_window().await;
        assert_eq!(window.closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn no_host_hotkey_capture_degrades_to_none() {
        init_logs();
        let (gateway, _window) = gateway_without_host();

        let combo = gateway.capture_hotkey(10).await.expect("best-effort");
        assert!(combo.is_none());
    }

    // ---- host present ---

    #[tokio::test]
    async fn close_prefers_host_over_window_primitive() {
        let (gateway, host, window) = gateway_with_host(MockHost::new());

        gateway.close_window().await;
        assert_eq!(host.close_calls(), 1);
        assert_eq!(window.closes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn hotkey_capture_returns_host_combination() {
        let (gateway, _host, _window) =
            gateway_with_host(MockHost::new().with_hotkey_response("ctrl+alt+d"));

        let combo = gateway.capture_hotkey(10).await.unwrap();
        assert_eq!(combo.as_deref(), Some("ctrl+alt+d"));
    }

    #[tokio::test]
    async fn save_rejection_surfaces_as_validation_error() {
        let (gateway, _host, _window) =
            gateway_with_host(MockHost::new().with_save_rejection("invalid hotkey"));

        let err = gateway
            .save_config(&DictationConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err, BridgeError::ValidationRejected("invalid hotkey".into()));
    }

    #[tokio::test]
    async fn save_success_echoes_persisted_config() {
        let (gateway, host, _window) = gateway_with_host(MockHost::new());

        let mut config = DictationConfig::default();
        config.model_size = "small".into();

        let echoed = gateway.save_config(&config).await.unwrap();
        assert_eq!(echoed, Some(config.clone()));
        assert_eq!(host.last_saved(), Some(config));
    }

    #[tokio::test]
    async fn add_word_empty_rejection_maps_to_validation_error() {
        let (gateway, _host, _window) = gateway_with_host(MockHost::new());

        let err = gateway.add_word("   ", "").await.unwrap_err();
        assert!(matches!(err, BridgeError::ValidationRejected(_)));
    }

    #[tokio::test]
    async fn train_failure_payload_maps_to_validation_rejection() {
        // Same classification as save_config/add_word/update_word: the host
        // reports the failure through a success=false payload.
        let host = MockHost::new().with_train_outcome(Ok(TrainOutcome {
            success: false,
            error: Some("Word is required".into()),
            ..TrainOutcome::default()
        }));
        let (gateway, _host, _window) = gateway_with_host(host);

        let err = gateway.train_word("   ").await.unwrap_err();
        assert_eq!(err, BridgeError::ValidationRejected("Word is required".into()));
    }

    // ---- timeout decorator ---

    /// A host whose calls never complete.
    struct StalledHost;

    #[async_trait::async_trait]
    impl HostApi for StalledHost {
        async fn close_window(&self) -> Result<(), BridgeError> {
            std::future::pending().await
        }
        async fn capture_hotkey(&self, _t: u64) -> Result<Option<String>, BridgeError> {
            std::future::pending().await
        }
        async fn get_devices(&self) -> Result<Vec<AudioDevice>, BridgeError> {
            std::future::pending().await
        }
        async fn get_config(&self) -> Result<DictationConfig, BridgeError> {
            std::future::pending().await
        }
        async fn save_config(
            &self,
            _c: DictationConfig,
        ) -> Result<crate::bridge::SaveOutcome, BridgeError> {
            std::future::pending().await
        }
        async fn get_config_options(&self) -> Result<ConfigOptions, BridgeError> {
            std::future::pending().await
        }
        async fn get_dictionary(&self) -> Result<Vec<DictionaryEntry>, BridgeError> {
            std::future::pending().await
        }
        async fn add_word(
            &self,
            _w: &str,
            _p: &str,
        ) -> Result<crate::bridge::AddWordOutcome, BridgeError> {
            std::future::pending().await
        }
        async fn remove_word(&self, _w: &str) -> Result<bool, BridgeError> {
            std::future::pending().await
        }
        async fn update_word(
            &self,
            _o: &str,
            _n: &str,
            _p: &str,
        ) -> Result<crate::bridge::UpdateWordOutcome, BridgeError> {
            std::future::pending().await
        }
        async fn train_word(&self, _w: &str) -> Result<TrainOutcome, BridgeError> {
            std::future::pending().await
        }
    }

    // The paused clock auto-advances to the timeout deadline, so these
    // complete instantly in real time.

    #[tokio::test(start_paused = true)]
    async fn stalled_call_times_out_with_typed_error() {
        let slot = Arc::new(HostSlot::new());
        slot.install(Arc::new(StalledHost));
        let gateway = BridgeGateway::new(slot, RecordingWindow::new());

        let result = gateway.get_config().await;
        assert_eq!(result.err(), Some(BridgeError::CallTimeout("get_config")));
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_collection_read_degrades_to_empty_after_timeout() {
        init_logs();
        let slot = Arc::new(HostSlot::new());
        slot.install(Arc::new(StalledHost));
        let gateway = BridgeGateway::new(slot, RecordingWindow::new());

        assert!(gateway.get_dictionary().await.is_empty());
    }
}
