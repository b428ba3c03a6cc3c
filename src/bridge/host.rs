//! The `HostApi` trait and the wire types exchanged with the host.
//!
//! # Overview
//!
//! [`HostApi`] is the typed boundary with the host capability object.  It is
//! object-safe and `Send + Sync` so it can be held behind an
//! `Arc<dyn HostApi>` inside [`HostSlot`](crate::bridge::HostSlot).
//!
//! Every operation is asynchronous request/response; training progress is
//! the one exception — intermediate events arrive via the push channel
//! ([`StatusSinkSlot`](crate::training::StatusSinkSlot)), not the
//! [`train_word`](HostApi::train_word) return value.
//!
//! [`MockHost`] (available under `#[cfg(test)]`) is a scriptable in-memory
//! stand-in used across the crate's unit tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::bridge::BridgeError;
use crate::config::{ConfigOptions, DictationConfig};

// ---------------------------------------------------------------------------
// AudioDevice
// ---------------------------------------------------------------------------

/// One audio input device as reported by the host.
///
/// The list is fetched once per session and is stale afterwards — there is
/// no live device refresh in this layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioDevice {
    /// Stable numeric index used as the `input_device` config value.
    pub index: u32,
    /// Human-readable device name.
    pub name: String,
    /// Whether this is the system default input.
    #[serde(default)]
    pub is_default: bool,
}

// ---------------------------------------------------------------------------
// DictionaryEntry
// ---------------------------------------------------------------------------

/// A custom-vocabulary entry.  Identity key is the word text; ordering is
/// whatever the host returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    /// The word or phrase to recognize.
    pub word: String,
    /// Phonetic hint — what the transcriber tends to hear instead.  Empty
    /// when none has been set or learned.
    #[serde(default)]
    pub phonetic: String,
    /// Whether a training run has completed for this word.
    #[serde(default)]
    pub trained: bool,
}

// ---------------------------------------------------------------------------
// Operation outcomes
// ---------------------------------------------------------------------------

/// Host response to `save_config`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveOutcome {
    /// Whether the host accepted and persisted the configuration.
    pub success: bool,
    /// The configuration as the host persisted it (the host may normalize
    /// values).  Absent on failure.
    #[serde(default)]
    pub config: Option<DictationConfig>,
    /// Human-readable rejection reason when `success` is false.
    #[serde(default)]
    pub error: Option<String>,
}

/// Host response to `add_word`.  Exactly one of `entry` / `error` is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddWordOutcome {
    /// The created (or upserted) entry on success.
    #[serde(default)]
    pub entry: Option<DictionaryEntry>,
    /// Validation message on failure (e.g. empty word).
    #[serde(default)]
    pub error: Option<String>,
}

/// Host response to `update_word`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateWordOutcome {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Per-round training result carried inside `round_done` / `done` payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    /// 1-based round number.
    pub round: u32,
    /// Normalized transcription for this round.
    pub transcribed: String,
    /// Whether the transcription matched the target word.
    pub success: bool,
}

/// Final host response to `train_word`.
///
/// This summarizes the whole run; per-round progress was already delivered
/// through the push channel.  `already_recognized` reflects the host's own
/// threshold (e.g. 2 of 3 rounds matched) and is reported as-is even when
/// individual rounds failed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainOutcome {
    /// Whether the training run completed (not whether recognition matched).
    pub success: bool,
    /// The word was transcribed correctly often enough without a hint.
    #[serde(default)]
    pub already_recognized: bool,
    /// Phonetic hint the host learned from consistent mishearings.
    #[serde(default)]
    pub learned_hint: Option<String>,
    /// Number of rounds whose transcription matched the word.
    #[serde(default)]
    pub match_count: u32,
    /// Total rounds in the run.
    #[serde(default)]
    pub total_rounds: u32,
    /// Per-round transcription results.
    #[serde(default)]
    pub results: Vec<RoundResult>,
    /// Error message when `success` is false.
    #[serde(default)]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// HostApi trait
// ---------------------------------------------------------------------------

/// The host capability object, as injected into the UI runtime.
///
/// Implementors must be `Send + Sync` so the handle can be shared across
/// tasks (wrapped in `Arc<dyn HostApi>`).  Transport-level failures map to
/// [`BridgeError::HostCallFailed`]; business rejections are carried inside
/// the outcome structs and classified by the gateway.
#[async_trait]
pub trait HostApi: Send + Sync {
    /// Close the settings window.
    async fn close_window(&self) -> Result<(), BridgeError>;

    /// Interactively capture a key combination, waiting up to
    /// `timeout_secs`.  `None` when the user cancelled or timed out.
    async fn capture_hotkey(&self, timeout_secs: u64) -> Result<Option<String>, BridgeError>;

    /// List available audio input devices.
    async fn get_devices(&self) -> Result<Vec<AudioDevice>, BridgeError>;

    /// Fetch the persisted configuration record.
    async fn get_config(&self) -> Result<DictationConfig, BridgeError>;

    /// Validate, persist, and apply a full configuration record.
    async fn save_config(&self, config: DictationConfig) -> Result<SaveOutcome, BridgeError>;

    /// Fetch static option metadata for the settings dropdowns.
    async fn get_config_options(&self) -> Result<ConfigOptions, BridgeError>;

    /// Fetch all dictionary entries, in host order.
    async fn get_dictionary(&self) -> Result<Vec<DictionaryEntry>, BridgeError>;

    /// Add (or upsert) a word with an optional phonetic hint.
    async fn add_word(&self, word: &str, phonetic: &str) -> Result<AddWordOutcome, BridgeError>;

    /// Remove a word.  `false` when the word was not present.
    async fn remove_word(&self, word: &str) -> Result<bool, BridgeError>;

    /// Rename a word and/or replace its phonetic hint.
    async fn update_word(
        &self,
        old_word: &str,
        new_word: &str,
        phonetic: &str,
    ) -> Result<UpdateWordOutcome, BridgeError>;

    /// Run a multi-round training session for `word`.  Progress events are
    /// pushed through the status sink while this call is in flight; the
    /// returned outcome is the final summary.
    async fn train_word(&self, word: &str) -> Result<TrainOutcome, BridgeError>;
}

// ---------------------------------------------------------------------------
// MockHost  (test-only)
// ---------------------------------------------------------------------------

/// A scriptable in-memory host used by unit tests.
///
/// Behaves like the real host's dictionary (case-insensitive upsert on add,
/// boolean remove) and counts `get_dictionary` calls so tests can assert the
/// re-fetch discipline.  Individual operations can be scripted to fail.
#[cfg(test)]
pub struct MockHost {
    state: std::sync::Mutex<MockHostState>,
}

#[cfg(test)]
struct MockHostState {
    config: DictationConfig,
    options: ConfigOptions,
    devices: Vec<AudioDevice>,
    dictionary: Vec<DictionaryEntry>,
    hotkey_response: Option<String>,
    train_outcome: Result<TrainOutcome, BridgeError>,
    save_error: Option<String>,
    get_config_error: bool,
    close_calls: u32,
    get_dictionary_calls: u32,
    save_calls: u32,
    last_saved: Option<DictationConfig>,
}

#[cfg(test)]
impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl MockHost {
    pub fn new() -> Self {
        Self {
            state: std::sync::Mutex::new(MockHostState {
                config: DictationConfig::default(),
                options: ConfigOptions::default(),
                devices: Vec::new(),
                dictionary: Vec::new(),
                hotkey_response: None,
                train_outcome: Ok(TrainOutcome {
                    success: true,
                    ..TrainOutcome::default()
                }),
                save_error: None,
                get_config_error: false,
                close_calls: 0,
                get_dictionary_calls: 0,
                save_calls: 0,
                last_saved: None,
            }),
        }
    }

    pub fn with_config(self, config: DictationConfig) -> Self {
        self.state.lock().unwrap().config = config;
        self
    }

    pub fn with_devices(self, devices: Vec<AudioDevice>) -> Self {
        self.state.lock().unwrap().devices = devices;
        self
    }

    pub fn with_hotkey_response(self, combo: &str) -> Self {
        self.state.lock().unwrap().hotkey_response = Some(combo.to_string());
        self
    }

    /// Script `save_config` to be rejected with `message`.
    pub fn with_save_rejection(self, message: &str) -> Self {
        self.state.lock().unwrap().save_error = Some(message.to_string());
        self
    }

    /// Script `get_config` to fail at the transport level.
    pub fn with_config_fetch_failure(self) -> Self {
        self.state.lock().unwrap().get_config_error = true;
        self
    }

    /// Script the final `train_word` outcome.
    pub fn with_train_outcome(self, outcome: Result<TrainOutcome, BridgeError>) -> Self {
        self.state.lock().unwrap().train_outcome = outcome;
        self
    }

    pub fn close_calls(&self) -> u32 {
        self.state.lock().unwrap().close_calls
    }

    pub fn get_dictionary_calls(&self) -> u32 {
        self.state.lock().unwrap().get_dictionary_calls
    }

    pub fn save_calls(&self) -> u32 {
        self.state.lock().unwrap().save_calls
    }

    /// The full payload of the most recent `save_config` call.
    pub fn last_saved(&self) -> Option<DictationConfig> {
        self.state.lock().unwrap().last_saved.clone()
    }

    pub fn dictionary_len(&self) -> usize {
        self.state.lock().unwrap().dictionary.len()
    }
}

#[cfg(test)]
#[async_trait]
impl HostApi for MockHost {
    async fn close_window(&self) -> Result<(), BridgeError> {
        self.state.lock().unwrap().close_calls += 1;
        Ok(())
    }

    async fn capture_hotkey(&self, _timeout_secs: u64) -> Result<Option<String>, BridgeError> {
        Ok(self.state.lock().unwrap().hotkey_response.clone())
    }

    async fn get_devices(&self) -> Result<Vec<AudioDevice>, BridgeError> {
        Ok(self.state.lock().unwrap().devices.clone())
    }

    async fn get_config(&self) -> Result<DictationConfig, BridgeError> {
        let state = self.state.lock().unwrap();
        if state.get_config_error {
            return Err(BridgeError::HostCallFailed("config store unreadable".into()));
        }
        Ok(state.config.clone())
    }

    async fn save_config(&self, config: DictationConfig) -> Result<SaveOutcome, BridgeError> {
        let mut state = self.state.lock().unwrap();
        state.save_calls += 1;
        state.last_saved = Some(config.clone());
        if let Some(msg) = &state.save_error {
            return Ok(SaveOutcome {
                success: false,
                config: None,
                error: Some(msg.clone()),
            });
        }
        state.config = config.clone();
        Ok(SaveOutcome {
            success: true,
            config: Some(config),
            error: None,
        })
    }

    async fn get_config_options(&self) -> Result<ConfigOptions, BridgeError> {
        Ok(self.state.lock().unwrap().options.clone())
    }

    async fn get_dictionary(&self) -> Result<Vec<DictionaryEntry>, BridgeError> {
        let mut state = self.state.lock().unwrap();
        state.get_dictionary_calls += 1;
        Ok(state.dictionary.clone())
    }

    async fn add_word(&self, word: &str, phonetic: &str) -> Result<AddWordOutcome, BridgeError> {
        let word = word.trim();
        let phonetic = phonetic.trim();
        if word.is_empty() {
            return Ok(AddWordOutcome {
                entry: None,
                error: Some("Word is required".into()),
            });
        }
        let mut state = self.state.lock().unwrap();
        let lower = word.to_lowercase();
        if let Some(existing) = state
            .dictionary
            .iter_mut()
            .find(|e| e.word.to_lowercase() == lower)
        {
            existing.phonetic = phonetic.to_string();
            let entry = existing.clone();
            return Ok(AddWordOutcome {
                entry: Some(entry),
                error: None,
            });
        }
        let entry = DictionaryEntry {
            word: word.to_string(),
            phonetic: phonetic.to_string(),
            trained: false,
        };
        state.dictionary.push(entry.clone());
        Ok(AddWordOutcome {
            entry: Some(entry),
            error: None,
        })
    }

    async fn remove_word(&self, word: &str) -> Result<bool, BridgeError> {
        let mut state = self.state.lock().unwrap();
        let lower = word.to_lowercase();
        let before = state.dictionary.len();
        state.dictionary.retain(|e| e.word.to_lowercase() != lower);
        Ok(state.dictionary.len() < before)
    }

    async fn update_word(
        &self,
        old_word: &str,
        new_word: &str,
        phonetic: &str,
    ) -> Result<UpdateWordOutcome, BridgeError> {
        if old_word.trim().is_empty() || new_word.trim().is_empty() {
            return Ok(UpdateWordOutcome {
                success: false,
                error: Some("Both old and new word are required".into()),
            });
        }
        let mut state = self.state.lock().unwrap();
        let lower = old_word.trim().to_lowercase();
        if let Some(entry) = state
            .dictionary
            .iter_mut()
            .find(|e| e.word.to_lowercase() == lower)
        {
            entry.word = new_word.trim().to_string();
            entry.phonetic = phonetic.trim().to_string();
            Ok(UpdateWordOutcome {
                success: true,
                error: None,
            })
        } else {
            Ok(UpdateWordOutcome {
                success: false,
                error: Some("Word not found".into()),
            })
        }
    }

    async fn train_word(&self, word: &str) -> Result<TrainOutcome, BridgeError> {
        let mut state = self.state.lock().unwrap();
        let outcome = state.train_outcome.clone();
        if matches!(&outcome, Ok(o) if o.success) {
            let lower = word.to_lowercase();
            if let Some(entry) = state
                .dictionary
                .iter_mut()
                .find(|e| e.word.to_lowercase() == lower)
            {
                entry.trained = true;
            }
        }
        outcome
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_api_is_object_safe() {
        let host: std::sync::Arc<dyn HostApi> = std::sync::Arc::new(MockHost::new());
        drop(host);
    }

    #[tokio::test]
    async fn mock_add_then_list_shows_untrained_entry() {
        let host = MockHost::new();
        host.add_word("Kubernetes", "koo-ber-net-eez").await.unwrap();

        let entries = host.get_dictionary().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].word, "Kubernetes");
        assert_eq!(entries[0].phonetic, "koo-ber-net-eez");
        assert!(!entries[0].trained);
    }

    #[tokio::test]
    async fn mock_add_is_case_insensitive_upsert() {
        let host = MockHost::new();
        host.add_word("kubectl", "").await.unwrap();
        host.add_word("Kubectl", "cube control").await.unwrap();

        let entries = host.get_dictionary().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].phonetic, "cube control");
    }

    #[tokio::test]
    async fn mock_remove_missing_word_is_falsy() {
        let host = MockHost::new();
        host.add_word("pytest", "").await.unwrap();

        assert!(!host.remove_word("nope").await.unwrap());
        assert_eq!(host.dictionary_len(), 1);
        assert!(host.remove_word("PYTEST").await.unwrap());
        assert_eq!(host.dictionary_len(), 0);
    }

    #[tokio::test]
    async fn mock_update_missing_word_reports_not_found() {
        let host = MockHost::new();
        let outcome = host.update_word("nope", "still_nope", "").await.unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Word not found"));
    }

    #[test]
    fn train_outcome_decodes_camel_case_wire_fields() {
        let json = serde_json::json!({
            "success": true,
            "alreadyRecognized": false,
            "learnedHint": "mackinaw",
            "matchCount": 1,
            "totalRounds": 3,
            "results": [
                { "round": 1, "transcribed": "mackinac", "success": true },
                { "round": 2, "transcribed": "mackinaw", "success": false },
                { "round": 3, "transcribed": "mackinaw", "success": false }
            ]
        });

        let outcome: TrainOutcome = serde_json::from_value(json).unwrap();
        assert!(outcome.success);
        assert!(!outcome.already_recognized);
        assert_eq!(outcome.learned_hint.as_deref(), Some("mackinaw"));
        assert_eq!(outcome.match_count, 1);
        assert_eq!(outcome.results.len(), 3);
        assert!(!outcome.results[1].success);
    }
}
