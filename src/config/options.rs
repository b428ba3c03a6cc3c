//! Static option metadata for the settings dropdowns.
//!
//! Fetched once per session via `get_config_options` and never merged into
//! the configuration record itself.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ConfigOptions
// ---------------------------------------------------------------------------

/// Valid values for the enum-like configuration fields, as defined by the
/// host.  Read-only after fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigOptions {
    /// Available transcription model names.
    #[serde(default)]
    pub models: Vec<String>,
    /// Supported languages: ISO code → display name.
    #[serde(default)]
    pub languages: BTreeMap<String, String>,
    /// Valid `hotkey_mode` values.
    #[serde(default)]
    pub hotkey_modes: Vec<String>,
    /// Valid `format_mode` values: key → display label.
    #[serde(default)]
    pub format_modes: BTreeMap<String, String>,
    /// Valid `overlay_position` values.
    #[serde(default)]
    pub overlay_positions: Vec<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
