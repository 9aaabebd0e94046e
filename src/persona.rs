//! Companion personas and their additive system-prompt fragments.

use serde::{Deserialize, Serialize};

/// Conversational style a student can pick for the companion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    /// Soft, validating, unhurried.
    Gentle,
    /// Brief and practical.
    Direct,
    /// Light humour where it fits.
    Humorous,
}

impl Persona {
    /// Every persona.
    pub const ALL: [Persona; 3] = [Self::Gentle, Self::Direct, Self::Humorous];

    /// Parse a persona id. Case and surrounding whitespace are ignored;
    /// anything else returns `None`.
    pub fn parse(id: &str) -> Option<Self> {
        match id.trim().to_ascii_lowercase().as_str() {
            "gentle" => Some(Self::Gentle),
            "direct" => Some(Self::Direct),
            "humorous" => Some(Self::Humorous),
            _ => None,
        }
    }

    /// Wire id of the persona.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gentle => "gentle",
            Self::Direct => "direct",
            Self::Humorous => "humorous",
        }
    }

    /// Instruction appended to the base system prompt.
    pub fn fragment(&self) -> &'static str {
        match self {
            Self::Gentle => {
                "\n\nPersona: Speak softly and warmly. Use gentle, validating language, \
                 let the student set the pace, and offer reassurance before any suggestion."
            }
            Self::Direct => {
                "\n\nPersona: Be clear and straightforward. Keep replies brief, name the \
                 issue plainly, and offer one concrete next step the student can take today."
            }
            Self::Humorous => {
                "\n\nPersona: Use light, kind humour where it eases tension and keep it \
                 supportive. Never joke about distress, self-harm, or anything crisis-related."
            }
        }
    }
}

/// Resolve an optional persona id to its prompt fragment.
///
/// Absent or unrecognised ids resolve to the empty string; this never fails.
pub fn resolve(id: Option<&str>) -> &'static str {
    id.and_then(Persona::parse).map_or("", |p| p.fragment())
}
