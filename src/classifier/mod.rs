//! Keyword classifiers for a single chat turn.
//!
//! Each [`SignalKind`] owns a list of lowercase phrases. A signal fires when
//! any phrase of its list occurs as a substring of the case-folded message.
//! There is no word-boundary or negation handling: "I'm not going to hurt
//! myself" still fires the crisis signal. This is a known limitation.
//!
//! Kinds are evaluated independently; one message can raise several signals.

pub mod keywords;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::providers::{Message, Role};

/// The four independent classifier signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    /// Self-harm or suicidal language.
    Crisis,
    /// Anxiety or panic that a breathing exercise may help with.
    Breathing,
    /// Wanting to write down or track feelings.
    MoodJournal,
    /// Sleep trouble or wanting to relax.
    CalmingAudio,
}

impl SignalKind {
    /// Every kind, in evaluation order.
    pub const ALL: [SignalKind; 4] = [
        Self::Crisis,
        Self::Breathing,
        Self::MoodJournal,
        Self::CalmingAudio,
    ];

    /// Config key of the kind's phrase list.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Crisis => "crisis",
            Self::Breathing => "breathing",
            Self::MoodJournal => "mood_journal",
            Self::CalmingAudio => "calming_audio",
        }
    }
}

/// Phrase lists for every [`SignalKind`].
///
/// Phrases are normalised on construction (trimmed, lowercased, empties
/// dropped) so an empty config entry can never match every message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "KeywordOverrides")]
pub struct KeywordLists {
    crisis: Vec<String>,
    breathing: Vec<String>,
    mood_journal: Vec<String>,
    calming_audio: Vec<String>,
}

impl Default for KeywordLists {
    fn default() -> Self {
        Self {
            crisis: normalise(keywords::CRISIS.iter().copied()),
            breathing: normalise(keywords::BREATHING.iter().copied()),
            mood_journal: normalise(keywords::MOOD_JOURNAL.iter().copied()),
            calming_audio: normalise(keywords::CALMING_AUDIO.iter().copied()),
        }
    }
}

impl KeywordLists {
    /// Replace the list for `kind`, returning the updated set.
    pub fn with_list<I, S>(mut self, kind: SignalKind, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        *self.list_mut(kind) = normalise(phrases);
        self
    }

    /// The normalised phrases for `kind`.
    pub fn phrases(&self, kind: SignalKind) -> &[String] {
        match kind {
            SignalKind::Crisis => &self.crisis,
            SignalKind::Breathing => &self.breathing,
            SignalKind::MoodJournal => &self.mood_journal,
            SignalKind::CalmingAudio => &self.calming_audio,
        }
    }

    fn list_mut(&mut self, kind: SignalKind) -> &mut Vec<String> {
        match kind {
            SignalKind::Crisis => &mut self.crisis,
            SignalKind::Breathing => &mut self.breathing,
            SignalKind::MoodJournal => &mut self.mood_journal,
            SignalKind::CalmingAudio => &mut self.calming_audio,
        }
    }

    /// Whether `text` contains any phrase configured for `kind`.
    pub fn classify(&self, kind: SignalKind, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        self.hit(kind, &fold(text))
    }

    /// Evaluate all four kinds against one piece of text.
    pub fn signals(&self, text: &str) -> ClassificationSignals {
        if text.trim().is_empty() {
            return ClassificationSignals::default();
        }
        let folded = fold(text);
        ClassificationSignals {
            crisis: self.hit(SignalKind::Crisis, &folded),
            breathing_need: self.hit(SignalKind::Breathing, &folded),
            mood_journal_need: self.hit(SignalKind::MoodJournal, &folded),
            calming_audio_need: self.hit(SignalKind::CalmingAudio, &folded),
        }
    }

    // `folded` must already have gone through `fold`.
    fn hit(&self, kind: SignalKind, folded: &str) -> bool {
        self.phrases(kind)
            .iter()
            .any(|phrase| folded.contains(phrase.as_str()))
    }

    /// Classify the latest user turn of `history`.
    ///
    /// Earlier turns are never scanned. A history without user turns yields
    /// no signals.
    pub fn classify_latest(&self, history: &[Message]) -> ClassificationSignals {
        latest_user_message(history)
            .map(|msg| self.signals(&msg.content))
            .unwrap_or_default()
    }
}

/// Partial `[keywords]` table: absent lists keep their built-in defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct KeywordOverrides {
    crisis: Option<Vec<String>>,
    breathing: Option<Vec<String>>,
    mood_journal: Option<Vec<String>>,
    calming_audio: Option<Vec<String>>,
}

impl From<KeywordOverrides> for KeywordLists {
    fn from(overrides: KeywordOverrides) -> Self {
        let mut lists = Self::default();
        let pairs = [
            (SignalKind::Crisis, overrides.crisis),
            (SignalKind::Breathing, overrides.breathing),
            (SignalKind::MoodJournal, overrides.mood_journal),
            (SignalKind::CalmingAudio, overrides.calming_audio),
        ];
        for (kind, phrases) in pairs {
            if let Some(phrases) = phrases {
                lists = lists.with_list(kind, phrases);
                debug!(
                    list = kind.as_str(),
                    phrases = lists.phrases(kind).len(),
                    "keyword list overridden"
                );
            }
        }
        lists
    }
}

/// Per-turn classifier output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationSignals {
    /// Crisis language present.
    pub crisis: bool,
    /// Breathing exercise would help.
    pub breathing_need: bool,
    /// Mood journaling would help.
    pub mood_journal_need: bool,
    /// Calming audio would help.
    pub calming_audio_need: bool,
}

/// The most recent turn authored by the user, if any.
pub fn latest_user_message(history: &[Message]) -> Option<&Message> {
    history.iter().rev().find(|msg| msg.role == Role::User)
}

fn normalise<I, S>(phrases: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    phrases
        .into_iter()
        .map(|p| fold(p.as_ref().trim()))
        .filter(|p| !p.is_empty())
        .collect()
}

// Lowercase and map typographic apostrophes to ASCII so "can’t" from mobile
// keyboards matches "can't".
fn fold(text: &str) -> String {
    text.to_lowercase().replace(['\u{2019}', '\u{2018}'], "'")
}
