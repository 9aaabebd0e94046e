//! Shapes collaborator text and classifier signals into the chat reply.

use serde::{Deserialize, Serialize};

use crate::classifier::ClassificationSignals;

/// Reply used when the collaborator returns no usable text.
pub const FALLBACK_REPLY: &str = "I'm here to listen. Could you tell me more?";

/// Crisis severity reported to the chat UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrisisLevel {
    /// No crisis language detected.
    None,
    /// Crisis language detected; the UI shows hotline resources.
    Critical,
}

/// In-app coping features the UI may surface next to the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestions {
    /// Offer the breathing exercise.
    pub breathing_exercise: bool,
    /// Offer the mood journal.
    pub mood_journal: bool,
    /// Offer calming audio.
    pub calming_audio: bool,
}

/// Structured reply for one chat turn.
///
/// `crisis_detected` and `crisis_level` carry the same fact; both keys are
/// part of the wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyResult {
    /// Companion text shown to the student.
    pub content: String,
    /// Whether crisis language was detected in the latest user turn.
    pub crisis_detected: bool,
    /// Severity derived from `crisis_detected`.
    pub crisis_level: CrisisLevel,
    /// Coping feature suggestions.
    pub suggestions: Suggestions,
}

/// Merge completion text with classifier signals.
///
/// Absent, empty or whitespace-only text is replaced by [`FALLBACK_REPLY`].
pub fn shape(completion_text: Option<&str>, signals: ClassificationSignals) -> ReplyResult {
    let content = completion_text
        .filter(|text| !text.trim().is_empty())
        .unwrap_or(FALLBACK_REPLY)
        .to_owned();

    ReplyResult {
        content,
        crisis_detected: signals.crisis,
        crisis_level: if signals.crisis {
            CrisisLevel::Critical
        } else {
            CrisisLevel::None
        },
        suggestions: Suggestions {
            breathing_exercise: signals.breathing_need,
            mood_journal: signals.mood_journal_need,
            calming_audio: signals.calming_audio_need,
        },
    }
}
