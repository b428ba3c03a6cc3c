//! `ConfigSession` — load / edit / dirty-tracking / save lifecycle.
//!
//! # Save / dirty contract
//!
//! ```text
//! load()  ──▶ working = baseline = host snapshot
//!
//! update(…) ──▶ mutates working only
//! is_dirty() ⇔ working != baseline   (deep structural equality)
//!
//! save() ──▶ saving = true
//!            send FULL working copy
//!            ├─ ok:   baseline ← saved copy, dirty ⇒ false
//!            └─ err:  baseline untouched, dirty stays, error recorded
//!            saving = false  (both paths)
//! ```
//!
//! Concurrent saves are not coordinated here — callers must serialize
//! invocations, e.g. by disabling the save control while
//! [`is_saving`](ConfigSession::is_saving) is true.

use std::sync::Arc;

use crate::bridge::{AudioDevice, BridgeError, BridgeGateway};
use crate::config::{ConfigOptions, DictationConfig};

// ---------------------------------------------------------------------------
// ConfigUpdate
// ---------------------------------------------------------------------------

/// A single-field edit to the working copy.  One variant per configuration
/// field, so each edit is type-checked at the call boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigUpdate {
    Hotkey(String),
    ModelSize(String),
    InputDevice(Option<u32>),
    Language(String),
    SmartSpacing(bool),
    BulletMode(bool),
    EmailMode(bool),
    HotkeyMode(String),
    FormatMode(String),
    EmailTone(u8),
    PromptDetail(u8),
    OverlayPosition(String),
    AccentColor(String),
    BgColor(String),
}

impl ConfigUpdate {
    /// Replace exactly one field of `config`.
    fn apply(self, config: &mut DictationConfig) {
        match self {
            ConfigUpdate::Hotkey(v) => config.hotkey = v,
            ConfigUpdate::ModelSize(v) => config.model_size = v,
            ConfigUpdate::InputDevice(v) => config.input_device = v,
            ConfigUpdate::Language(v) => config.language = v,
            ConfigUpdate::SmartSpacing(v) => config.smart_spacing = v,
            ConfigUpdate::BulletMode(v) => config.bullet_mode = v,
            ConfigUpdate::EmailMode(v) => config.email_mode = v,
            ConfigUpdate::HotkeyMode(v) => config.hotkey_mode = v,
            ConfigUpdate::FormatMode(v) => config.format_mode = v,
            ConfigUpdate::EmailTone(v) => config.email_tone = v,
            ConfigUpdate::PromptDetail(v) => config.prompt_detail = v,
            ConfigUpdate::OverlayPosition(v) => config.overlay_position = v,
            ConfigUpdate::AccentColor(v) => config.accent_color = v,
            ConfigUpdate::BgColor(v) => config.bg_color = v,
        }
    }
}

// ---------------------------------------------------------------------------
// ConfigSession
// ---------------------------------------------------------------------------

/// Loaded snapshot state: working copy, baseline copy, and the static
/// metadata fetched alongside them.
struct LoadedState {
    working: DictationConfig,
    baseline: DictationConfig,
    options: ConfigOptions,
    devices: Vec<AudioDevice>,
}

/// Mediates between user edits and host-persisted configuration.
///
/// Owns the working and baseline copies exclusively; they are never shared
/// across sessions.  Until [`load`](ConfigSession::load) succeeds the
/// session is unloaded and every edit/save is refused.
pub struct ConfigSession {
    gateway: Arc<BridgeGateway>,
    loaded: Option<LoadedState>,
    saving: bool,
    last_error: Option<String>,
}

impl ConfigSession {
    pub fn new(gateway: Arc<BridgeGateway>) -> Self {
        Self {
            gateway,
            loaded: None,
            saving: false,
            last_error: None,
        }
    }

    // -----------------------------------------------------------------------
    // Load
    // -----------------------------------------------------------------------

    /// Await bridge readiness, then fetch the configuration snapshot, option
    /// metadata, and device list concurrently.
    ///
    /// On any fetch failure the session stays unloaded and the error is
    /// recorded for display.  On success the snapshot is captured as both
    /// working and baseline copy (distinct instances).
    pub async fn load(&mut self) -> Result<(), BridgeError> {
        if let Err(e) = self.gateway.await_ready().await {
            self.last_error = Some(e.to_string());
            return Err(e);
        }

        // The three fetches are independent; none may block the others.
        let result = tokio::try_join!(self.gateway.get_config(), self.gateway.get_config_options(), async {
            Ok::<_, BridgeError>(self.gateway.get_devices().await)
        });

        match result {
            Ok((config, options, devices)) => {
                self.loaded = Some(LoadedState {
                    baseline: config.clone(),
                    working: config,
                    options,
                    devices,
                });
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Edit / dirty
    // -----------------------------------------------------------------------

    /// Apply a single-field edit to the working copy.  Returns `false` (and
    /// does nothing) when no configuration is loaded.  Never touches the
    /// baseline.
    pub fn update(&mut self, update: ConfigUpdate) -> bool {
        match &mut self.loaded {
            Some(state) => {
                update.apply(&mut state.working);
                true
            }
            None => false,
        }
    }

    /// True iff the working copy differs structurally from the baseline in
    /// at least one field.
    pub fn is_dirty(&self) -> bool {
        self.loaded
            .as_ref()
            .is_some_and(|s| s.working != s.baseline)
    }

    // -----------------------------------------------------------------------
    // Save
    // -----------------------------------------------------------------------

    /// Persist the entire current working copy to the host.
    ///
    /// On success the baseline is replaced by a fresh copy of the saved
    /// state (the host-normalized record when one is echoed back), so the
    /// session becomes clean.  On failure the baseline is untouched — dirty
    /// stays set and no edit is lost — and a human-readable message is
    /// recorded.  The saving flag is cleared on every path.
    pub async fn save(&mut self) -> Result<(), BridgeError> {
        let working = match &self.loaded {
            Some(state) => state.working.clone(),
            None => return Err(BridgeError::NotLoaded),
        };

        self.saving = true;
        let result = self.gateway.save_config(&working).await;
        let outcome = match result {
            Ok(echoed) => {
                let persisted = echoed.unwrap_or(working);
                if let Some(state) = self.loaded.as_mut() {
                    state.working = persisted.clone();
                    state.baseline = persisted;
                }
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                log::warn!("save_config failed: {e}");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        };
        self.saving = false;
        outcome
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// The working copy, when loaded.
    pub fn config(&self) -> Option<&DictationConfig> {
        self.loaded.as_ref().map(|s| &s.working)
    }

    /// The last-persisted baseline, when loaded.
    pub fn baseline(&self) -> Option<&DictationConfig> {
        self.loaded.as_ref().map(|s| &s.baseline)
    }

    pub fn options(&self) -> Option<&ConfigOptions> {
        self.loaded.as_ref().map(|s| &s.options)
    }

    pub fn devices(&self) -> &[AudioDevice] {
        self.loaded.as_ref().map(|s| s.devices.as_slice()).unwrap_or(&[])
    }

    /// The most recent load/save error, for the error banner.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
