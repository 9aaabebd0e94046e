//! Mood journal: AI scoring, supportive insights and per-user persistence.
//!
//! The analysis and insight pipelines soft-fail. Any provider error, timeout
//! or unparseable answer degrades to a fixed neutral payload so journaling is
//! never blocked by an AI outage. The chat pipeline is the opposite and
//! hard-fails (see [`crate::chat`]).

pub mod analysis;
pub mod insight;
pub mod store;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::providers::{LlmProvider, ProviderError};

pub use self::analysis::JournalAnalysis;
pub use self::store::{JournalEntry, JournalStats, JournalStore, MoodPoint, NewJournalEntry};

/// Lowest mood score.
pub const MIN_SCORE: u8 = 1;
/// Highest mood score.
pub const MAX_SCORE: u8 = 10;
/// Score used whenever no trustworthy score is available.
pub const NEUTRAL_SCORE: u8 = 5;
/// Maximum number of emotion labels kept from an analysis.
pub const MAX_EMOTIONS: usize = 4;
/// Maximum journal entry size in bytes.
pub const MAX_CONTENT_SIZE: usize = 64 * 1024;

/// Insight used when the provider answered without usable text.
pub const EMPTY_INSIGHT: &str =
    "Thank you for sharing your thoughts. Journaling is a valuable tool for self-reflection.";
/// Insight used when the provider call failed.
pub const FALLBACK_INSIGHT: &str =
    "Thank you for journaling. This is a meaningful step in understanding yourself better.";

/// Coarse mood range used for labels and the journal legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodBand {
    /// Scores 1–3: significant distress.
    Low,
    /// Scores 4–6: some challenges.
    Neutral,
    /// Scores 7–10: positive outlook.
    Good,
}

impl MoodBand {
    /// Band for a score in `1..=10`. Out-of-range scores fall into the
    /// nearest band.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=3 => Self::Low,
            4..=6 => Self::Neutral,
            _ => Self::Good,
        }
    }

    /// Stored label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Neutral => "neutral",
            Self::Good => "good",
        }
    }
}

/// Errors from journal analysis and persistence.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    /// The provider call failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The provider did not answer in time.
    #[error("journal analysis timed out after {0:?}")]
    Timeout(Duration),

    /// The provider's answer was not the expected JSON object.
    #[error("unparseable analysis: {0}")]
    Parse(String),

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored JSON column could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Entry content was empty.
    #[error("journal entry content must not be empty")]
    EmptyContent,

    /// Content exceeds the maximum allowed size.
    #[error("content too large: {size} bytes exceeds {max} byte limit")]
    ContentTooLarge {
        /// Actual content size in bytes.
        size: usize,
        /// Maximum allowed size.
        max: usize,
    },

    /// Mood outside `1..=10`.
    #[error("mood must be between 1 and 10, got {0}")]
    InvalidMood(i64),
}

impl JournalError {
    /// Whether the caller sent a bad request.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyContent | Self::ContentTooLarge { .. } | Self::InvalidMood(_)
        )
    }
}

/// Analysis and insight pipelines bound to an injected provider.
#[derive(Clone)]
pub struct JournalPipeline {
    provider: Arc<dyn LlmProvider>,
    timeout: Duration,
}

impl std::fmt::Debug for JournalPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JournalPipeline")
            .field("model", &self.provider.model_id())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl JournalPipeline {
    /// Build a pipeline; every provider call is bounded by `timeout`.
    pub fn new(provider: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Score an entry. Never fails; see [`analysis::analyze`].
    pub async fn analyze(&self, content: &str) -> JournalAnalysis {
        analysis::analyze(self.provider.as_ref(), content, self.timeout).await
    }

    /// Supportive insight for an entry. Never fails; see [`insight::generate`].
    pub async fn insight(&self, content: &str, mood: Option<u8>) -> String {
        insight::generate(self.provider.as_ref(), content, mood, self.timeout).await
    }
}
