//! `TrainingStatus` — the decoded shape of a host training push event.
//!
//! The host pushes untyped JSON through the status sink at its discretion;
//! each payload carries a `status` tag and camelCase fields.  Decoding is
//! strict on the tag and lenient on optional session-level fields, so a
//! malformed event is dropped (with a warning, by the sink) rather than
//! panicking or poisoning the current status.

use serde::{Deserialize, Serialize};

use crate::bridge::{BridgeError, RoundResult};

// ---------------------------------------------------------------------------
// TrainingStatus
// ---------------------------------------------------------------------------

/// One point in a training run, as pushed by the host.
///
/// Lifecycle per run: `Recording` → `Transcribing` → `RoundDone` (repeated
/// per round) → terminal `Done` or `Error`.  The consumer holds only the
/// latest event; per-round history for display rides inside the `Done`
/// payload (`results`), never assembled client-side.
///
/// `Done { already_recognized }` is the host's own aggregate judgement and
/// may coexist with failed rounds in `results`; it is exposed literally,
/// without client-side reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrainingStatus {
    /// The host is recording the user saying the word.
    Recording {
        word: String,
        round: u32,
        #[serde(rename = "totalRounds")]
        total_rounds: u32,
    },

    /// Recorded audio is being transcribed.
    Transcribing {
        word: String,
        round: u32,
        #[serde(rename = "totalRounds")]
        total_rounds: u32,
    },

    /// One round finished; more may follow.  Does not terminate the run.
    RoundDone {
        word: String,
        round: u32,
        #[serde(rename = "totalRounds")]
        total_rounds: u32,
        /// Normalized transcription for this round.
        transcribed: String,
        #[serde(rename = "roundSuccess")]
        round_success: bool,
    },

    /// Terminal: the run completed.
    Done {
        word: String,
        success: bool,
        #[serde(rename = "alreadyRecognized", default)]
        already_recognized: bool,
        #[serde(rename = "learnedHint", default)]
        learned_hint: Option<String>,
        #[serde(rename = "matchCount", default)]
        match_count: u32,
        #[serde(rename = "totalRounds", default)]
        total_rounds: u32,
        #[serde(default)]
        results: Vec<RoundResult>,
    },

    /// Terminal: the run failed.
    Error { error: String },
}

impl TrainingStatus {
    /// Decode a raw push payload.
    pub fn from_payload(payload: serde_json::Value) -> Result<Self, BridgeError> {
        serde_json::from_value(payload).map_err(|e| BridgeError::MalformedPayload(e.to_string()))
    }

    /// True for `Done` and `Error` — no further events are expected for
    /// this run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TrainingStatus::Done { .. } | TrainingStatus::Error { .. })
    }

    /// The word this event concerns.  `Error` events carry none.
    pub fn word(&self) -> Option<&str> {
        match self {
            TrainingStatus::Recording { word, .. }
            | TrainingStatus::Transcribing { word, .. }
            | TrainingStatus::RoundDone { word, .. }
            | TrainingStatus::Done { word, .. } => Some(word),
            TrainingStatus::Error { .. } => None,
        }
    }

    /// Short human-readable label for the status banner.
    pub fn label(&self) -> &'static str {
        match self {
            TrainingStatus::Recording { .. } => "Recording",
            TrainingStatus::Transcribing { .. } => "Transcribing",
            TrainingStatus::RoundDone { .. } => "Round done",
            TrainingStatus::Done { .. } => "Done",
            TrainingStatus::Error { .. } => "Error",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
