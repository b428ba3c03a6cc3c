//! The configuration record exchanged with the host.
//!
//! [`DictationConfig`] derives `PartialEq` — the deep structural equality
//! over every field that the session's dirty flag is built on.  Persistence
//! lives host-side; this layer only holds in-memory copies.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DictationConfig
// ---------------------------------------------------------------------------

/// Full application configuration as the host persists it.
///
/// Two live copies exist inside a
/// [`ConfigSession`](crate::config::ConfigSession): the *working copy* the
/// user edits and the *baseline copy* last known to be persisted.  Enum-like
/// fields (`model_size`, `hotkey_mode`, `format_mode`, `overlay_position`)
/// stay as strings because the valid sets are host-defined and arrive at
/// runtime via [`ConfigOptions`](crate::config::ConfigOptions).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DictationConfig {
    /// Global dictation hotkey, e.g. `"ctrl+shift+space"`.
    pub hotkey: String,
    /// Transcription model name (one of `ConfigOptions::models`).
    pub model_size: String,
    /// Audio input device index — `None` for the system default.
    pub input_device: Option<u32>,
    /// Speech language as an ISO-639-1 code.
    pub language: String,
    /// Insert spaces intelligently around injected text.
    pub smart_spacing: bool,
    /// Render dictation as bullet points.
    pub bullet_mode: bool,
    /// Legacy email formatting toggle (superseded by `format_mode`).
    pub email_mode: bool,
    /// How the hotkey behaves (one of `ConfigOptions::hotkey_modes`).
    pub hotkey_mode: String,
    /// Output formatting mode (key of `ConfigOptions::format_modes`).
    pub format_mode: String,
    /// Email tone, 1 (warm) – 5 (very formal).
    pub email_tone: u8,
    /// Prompt detail level, 1 (ultra-concise) – 5 (comprehensive).
    pub prompt_detail: u8,
    /// Recording-overlay placement (one of `ConfigOptions::overlay_positions`).
    pub overlay_position: String,
    /// UI accent color, `#rrggbb`.
    pub accent_color: String,
    /// UI background color, `#rrggbb`.
    pub bg_color: String,
}

impl Default for DictationConfig {
    fn default() -> Self {
        Self {
            hotkey: "ctrl+shift+space".into(),
            model_size: "base".into(),
            input_device: None,
            language: "en".into(),
            smart_spacing: true,
            bullet_mode: false,
            email_mode: false,
            hotkey_mode: "hold".into(),
            format_mode: "normal".into(),
            email_tone: 3,
            prompt_detail: 3,
            overlay_position: "top_center".into(),
            accent_color: "#ff4466".into(),
            bg_color: "#1a1a2e".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
