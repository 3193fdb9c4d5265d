//! Shared types used across all persona crates.

use serde::{Deserialize, Serialize};

// -----------------------------------------------------------------------------
// Dialogue: one attributed line of a transcript
// -----------------------------------------------------------------------------

/// One recorded line of dialogue with an attributed speaker.
///
/// Transcript records name the fields `role` and `dialogue`; any other fields on the
/// record (chapter, source, etc.) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    /// Speaker identifier (`role` on the wire).
    #[serde(rename = "role")]
    pub speaker: String,
    /// What was said (`dialogue` on the wire).
    #[serde(rename = "dialogue")]
    pub text: String,
}

impl Utterance {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
        }
    }

    /// True when this line was spoken by `speaker` (exact match, no normalisation).
    #[inline]
    pub fn is_spoken_by(&self, speaker: &str) -> bool {
        self.speaker == speaker
    }
}

// -----------------------------------------------------------------------------
// Supervised fine-tuning pairs
// -----------------------------------------------------------------------------

/// An (instruction, response) tuple extracted from a transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaPair {
    pub instruction: String,
    pub response: String,
}

impl QaPair {
    pub fn new(instruction: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            response: response.into(),
        }
    }
}

/// On-disk SFT record (Alpaca layout). `input` is always empty for transcript-derived pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub instruction: String,
    #[serde(default)]
    pub input: String,
    pub output: String,
}

impl From<&QaPair> for DatasetRecord {
    fn from(pair: &QaPair) -> Self {
        Self {
            instruction: pair.instruction.clone(),
            input: String::new(),
            output: pair.response.clone(),
        }
    }
}

impl From<QaPair> for DatasetRecord {
    fn from(pair: QaPair) -> Self {
        Self {
            instruction: pair.instruction,
            input: String::new(),
            output: pair.response,
        }
    }
}
