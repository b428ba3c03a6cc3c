//! `TrainingSession` — the dictionary-management consumer of the training
//! push channel.
//!
//! # Reduction policy
//!
//! The session is a replace-in-place reducer: it holds only the latest
//! received [`TrainingStatus`].  Per-round history, when the banner needs
//! it, rides inside the `done` payload — nothing is accumulated client-side.
//!
//! # Terminal handling
//!
//! On `done` or `error` the session:
//! 1. clears the "word currently training" marker so other entries become
//!    trainable again,
//! 2. re-fetches the full dictionary from the host (the terminal event is
//!    not trusted to carry a consistent post-mutation entry set), and
//! 3. schedules an auto-clear of the displayed status after
//!    [`STATUS_CLEAR_DELAY`]; starting a new run first cancels the pending
//!    clear via a generation counter.
//!
//! At most one word is in training at a time from the UI's perspective —
//! [`start_training`](TrainingSession::start_training) refuses a second word
//! — but the reducer itself tolerates events for any word; the exclusion is
//! presentation policy, not a channel guarantee.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;

use crate::bridge::{BridgeError, BridgeGateway, DictionaryEntry};
use crate::training::TrainingStatus;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// How long a terminal status banner stays visible before auto-clearing.
/// A UX choice, not a protocol requirement — override with
/// [`TrainingSession::with_clear_delay`].
pub const STATUS_CLEAR_DELAY: Duration = Duration::from_secs(4);

// ---------------------------------------------------------------------------
// TrainingSession
// ---------------------------------------------------------------------------

struct TrainingState {
    /// Latest received status; `None` between runs.
    status: Option<TrainingStatus>,
    /// The word currently in training, if any.
    training_word: Option<String>,
    /// Dictionary entries as of the last re-fetch.
    entries: Vec<DictionaryEntry>,
    /// Bumped on every run start; a pending auto-clear only fires when the
    /// generation it captured is still current.
    clear_generation: u64,
}

/// Consumes training push events and manages the dictionary view.
///
/// Cheap to clone — all state sits behind `Arc`.  Configuration state and
/// training state are disjoint domains, so host pushes may interleave freely
/// with an in-flight save.
#[derive(Clone)]
pub struct TrainingSession {
    gateway: Arc<BridgeGateway>,
    state: Arc<Mutex<TrainingState>>,
    clear_delay: Duration,
}

impl TrainingSession {
    pub fn new(gateway: Arc<BridgeGateway>) -> Self {
        Self {
            gateway,
            state: Arc::new(Mutex::new(TrainingState {
                status: None,
                training_word: None,
                entries: Vec::new(),
                clear_generation: 0,
            })),
            clear_delay: STATUS_CLEAR_DELAY,
        }
    }

    /// Override the terminal-status auto-clear delay.
    pub fn with_clear_delay(mut self, delay: Duration) -> Self {
        self.clear_delay = delay;
        self
    }

    // -----------------------------------------------------------------------
    // Event consumption
    // -----------------------------------------------------------------------

    /// Drain the push channel until it closes.  Spawn this alongside the
    /// registration returned by
    /// [`StatusSinkSlot::register`](crate::training::StatusSinkSlot::register).
    pub async fn run(&self, mut rx: mpsc::UnboundedReceiver<TrainingStatus>) {
        while let Some(status) = rx.recv().await {
            self.handle_event(status).await;
        }
    }

    /// Reduce one push event into the current status.
    pub async fn handle_event(&self, status: TrainingStatus) {
        let terminal = status.is_terminal();
        {
            let mut state = self.state.lock().unwrap();
            state.status = Some(status);
        }
        if terminal {
            self.finish_run().await;
        }
    }

    async fn finish_run(&self) {
        let generation = {
            let mut state = self.state.lock().unwrap();
            state.training_word = None;
            state.clear_generation
        };

        // The terminal event may have mutated the dictionary host-side
        // (learned hint, trained flag); the list is re-fetched as the source
        // of truth rather than patched from the payload.
        self.refresh_dictionary().await;

        let state = Arc::clone(&self.state);
        // Anchor the deadline here, not at the spawned task's first poll, so
        // the delay is measured from the terminal event itself.
        let deadline = tokio::time::Instant::now() + self.clear_delay;
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let mut state = state.lock().unwrap();
            if state.clear_generation == generation {
                state.status = None;
            }
        });
    }

    // -----------------------------------------------------------------------
    // Training initiation
    // -----------------------------------------------------------------------

    /// Begin a training run for `word`.
    ///
    /// Returns `false` without side effects when another word is already in
    /// training.  Otherwise marks the word, cancels any pending status
    /// auto-clear from a previous run, and fires the host call in the
    /// background; progress arrives through the push channel.  A call-level
    /// failure (no host, timeout, failed run) is folded into a terminal
    /// `Error` status rather than surfaced to the caller — the re-fetched
    /// dictionary is the source of truth either way.
    pub fn start_training(&self, word: &str) -> bool {
        {
            let mut state = self.state.lock().unwrap();
            if state.training_word.is_some() {
                return false;
            }
            state.training_word = Some(word.to_string());
            state.status = None;
            state.clear_generation += 1;
        }

        let session = self.clone();
        let word = word.to_string();
        tokio::spawn(async move {
            if let Err(e) = session.gateway.train_word(&word).await {
                let message = match e {
                    BridgeError::ValidationRejected(m) | BridgeError::HostCallFailed(m) => m,
                    other => other.to_string(),
                };
                log::warn!("training '{word}' failed: {message}");

                // The host pushes its own terminal error event when the run
                // fails host-side; synthesize one only when none arrived
                // (marker still set), so terminal handling runs exactly once.
                let unhandled = session.state.lock().unwrap().training_word.as_deref()
                    == Some(word.as_str());
                if unhandled {
                    session
                        .handle_event(TrainingStatus::Error { error: message })
                        .await;
                }
            }
        });
        true
    }

    // -----------------------------------------------------------------------
    // Dictionary operations
    // -----------------------------------------------------------------------

    /// Re-fetch the dictionary list from the host.  Absent host or a failed
    /// call yields an empty list (passive read).
    pub async fn refresh_dictionary(&self) {
        let entries = self.gateway.get_dictionary().await;
        self.state.lock().unwrap().entries = entries;
    }

    /// Add a word.  The full list is always re-fetched afterwards; failures
    /// are logged and reported as `false`, not raised — the list is the
    /// source of truth.
    pub async fn add_word(&self, word: &str, phonetic: &str) -> bool {
        let ok = match self.gateway.add_word(word, phonetic).await {
            Ok(_) => true,
            Err(e) => {
                log::warn!("add_word '{word}' failed: {e}");
                false
            }
        };
        self.refresh_dictionary().await;
        ok
    }

    /// Remove a word.  `false` when the word was not present or the call
    /// failed.
    pub async fn remove_word(&self, word: &str) -> bool {
        let ok = match self.gateway.remove_word(word).await {
            Ok(removed) => removed,
            Err(e) => {
                log::warn!("remove_word '{word}' failed: {e}");
                false
            }
        };
        self.refresh_dictionary().await;
        ok
    }

    /// Rename a word and/or replace its phonetic hint.
    pub async fn update_word(&self, old_word: &str, new_word: &str, phonetic: &str) -> bool {
        let ok = match self.gateway.update_word(old_word, new_word, phonetic).await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("update_word '{old_word}' failed: {e}");
                false
            }
        };
        self.refresh_dictionary().await;
        ok
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The latest training status, for the banner.
    pub fn status(&self) -> Option<TrainingStatus> {
        self.state.lock().unwrap().status.clone()
    }

    /// The word currently in training, if any.
    pub fn training_word(&self) -> Option<String> {
        self.state.lock().unwrap().training_word.clone()
    }

    /// True while a run is active — the UI disables training-initiation for
    /// all entries.
    pub fn is_training(&self) -> bool {
        self.state.lock().unwrap().training_word.is_some()
    }

    /// Dictionary entries as of the last re-fetch.
    pub fn entries(&self) -> Vec<DictionaryEntry> {
        self.state.lock().unwrap().entries.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
