//! Built-in phrase lists, one per signal kind.
//!
//! All phrases are lowercase. Any list can be replaced from the `[keywords]`
//! table of `config.toml`.

/// Phrases that flag a message for crisis resources.
pub const CRISIS: &[&str] = &[
    "suicide",
    "suicidal",
    "kill myself",
    "end my life",
    "want to die",
    "self harm",
    "self-harm",
    "cut myself",
    "hurt myself",
    "no reason to live",
    "better off dead",
    "can't go on",
];

/// Phrases that suggest a guided breathing exercise.
pub const BREATHING: &[&str] = &[
    "anxious",
    "anxiety",
    "panic",
    "stressed",
    "overwhelmed",
    "nervous",
    "can't breathe",
    "cannot breathe",
    "heart racing",
    "heart is racing",
    "tense",
    "freaking out",
    "on edge",
];

/// Phrases that suggest writing a mood journal entry.
pub const MOOD_JOURNAL: &[&str] = &[
    "journal",
    "diary",
    "write down",
    "write it down",
    "my feelings",
    "track my mood",
    "mood swings",
    "keep track",
    "reflect",
    "need to vent",
    "process my thoughts",
    "don't know how i feel",
];

/// Phrases that suggest ambient calming audio.
pub const CALMING_AUDIO: &[&str] = &[
    "relax",
    "calm down",
    "can't sleep",
    "cannot sleep",
    "trouble sleeping",
    "fall asleep",
    "insomnia",
    "restless",
    "unwind",
    "quiet my mind",
    "racing thoughts",
    "peaceful",
    "soothing",
    "rain sounds",
    "music",
];
