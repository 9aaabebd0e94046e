//! Journal entry scoring through the completion provider.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::providers::{CompletionRequest, LlmProvider, Message, ResponseFormat};

use super::{
    JournalError, EMPTY_INSIGHT, FALLBACK_INSIGHT, MAX_EMOTIONS, MAX_SCORE, MIN_SCORE,
    NEUTRAL_SCORE,
};

const ANALYSIS_SYSTEM_PROMPT: &str = "\
You are a compassionate mental health AI that analyzes journal entries.

Your task is to:
1. Analyze the emotional tone and content of the journal entry
2. Assign a mood score from 1-10 where:
   - 1-3: Very low mood, significant distress
   - 4-6: Moderate mood, some challenges
   - 7-10: Good to excellent mood, positive outlook
3. Identify 2-4 dominant emotions (e.g., \"anxious\", \"hopeful\", \"stressed\", \"grateful\")
4. Provide supportive insights using CBT/ACT principles (2-3 sentences)

Return your response in this EXACT JSON format:
{
  \"score\": <number 1-10>,
  \"emotions\": [\"emotion1\", \"emotion2\", ...],
  \"insights\": \"<your supportive insight>\"
}

Be empathetic, accurate, and therapeutically helpful.";

const ANALYSIS_MAX_TOKENS: u32 = 300;
const ANALYSIS_TEMPERATURE: f32 = 0.7;

/// Result of scoring one journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalAnalysis {
    /// Mood score, always within `1..=10`.
    pub score: u8,
    /// Up to four lowercase emotion labels.
    pub emotions: Vec<String>,
    /// Supportive insight text.
    pub insights: String,
}

impl JournalAnalysis {
    /// Neutral payload returned whenever analysis fails.
    pub fn fallback() -> Self {
        Self {
            score: NEUTRAL_SCORE,
            emotions: Vec::new(),
            insights: FALLBACK_INSIGHT.to_owned(),
        }
    }
}

/// Score `content`, degrading to [`JournalAnalysis::fallback`] on any failure.
pub async fn analyze(
    provider: &dyn LlmProvider,
    content: &str,
    timeout: Duration,
) -> JournalAnalysis {
    if content.trim().is_empty() {
        debug!("empty journal entry, skipping analysis");
        return JournalAnalysis::fallback();
    }

    match try_analyze(provider, content, timeout).await {
        Ok(analysis) => analysis,
        Err(err) => {
            warn!(error = %err, "journal analysis failed, returning neutral payload");
            JournalAnalysis::fallback()
        }
    }
}

/// Score `content`, surfacing every failure.
///
/// # Errors
///
/// Returns [`JournalError::Provider`], [`JournalError::Timeout`] or
/// [`JournalError::Parse`].
pub async fn try_analyze(
    provider: &dyn LlmProvider,
    content: &str,
    timeout: Duration,
) -> Result<JournalAnalysis, JournalError> {
    let request = CompletionRequest {
        system: Some(ANALYSIS_SYSTEM_PROMPT.to_owned()),
        messages: vec![Message::user(format!(
            "Analyze this journal entry:\n\n{content}"
        ))],
        max_tokens: Some(ANALYSIS_MAX_TOKENS),
        temperature: Some(ANALYSIS_TEMPERATURE),
        response_format: ResponseFormat::JsonObject,
    };

    let response = tokio::time::timeout(timeout, provider.complete(request))
        .await
        .map_err(|_| JournalError::Timeout(timeout))??;

    match response.text.as_deref() {
        Some(text) if !text.trim().is_empty() => parse_analysis(text),
        _ => Ok(JournalAnalysis {
            score: NEUTRAL_SCORE,
            emotions: Vec::new(),
            insights: EMPTY_INSIGHT.to_owned(),
        }),
    }
}

/// Parse a provider answer into a bounded analysis.
///
/// Tolerates prose or code fences around the JSON object. `score` is rounded
/// and clamped to `1..=10`; missing, zero or non-numeric scores become 5.
/// Numeric strings such as `"7"` are accepted.
///
/// # Errors
///
/// Returns [`JournalError::Parse`] when no JSON object can be extracted.
pub fn parse_analysis(raw: &str) -> Result<JournalAnalysis, JournalError> {
    let object = extract_json_object(raw)
        .ok_or_else(|| JournalError::Parse("no JSON object in response".to_owned()))?;
    let value: Value =
        serde_json::from_str(object).map_err(|e| JournalError::Parse(e.to_string()))?;
    if !value.is_object() {
        return Err(JournalError::Parse("response is not a JSON object".to_owned()));
    }

    let score = value.get("score").map_or(NEUTRAL_SCORE, clamp_score);

    let emotions = value
        .get("emotions")
        .and_then(Value::as_array)
        .map(|labels| {
            labels
                .iter()
                .filter_map(Value::as_str)
                .map(|label| label.trim().to_lowercase())
                .filter(|label| !label.is_empty())
                .take(MAX_EMOTIONS)
                .collect()
        })
        .unwrap_or_default();

    let insights = value
        .get("insights")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .unwrap_or(EMPTY_INSIGHT)
        .to_owned();

    Ok(JournalAnalysis {
        score,
        emotions,
        insights,
    })
}

/// Clamp an arbitrary JSON value to a score in `1..=10`.
pub fn clamp_score(value: &Value) -> u8 {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match raw {
        Some(n) if n.is_finite() && n != 0.0 => {
            let rounded = n.round().clamp(f64::from(MIN_SCORE), f64::from(MAX_SCORE));
            (MIN_SCORE..=MAX_SCORE)
                .find(|candidate| f64::from(*candidate) >= rounded)
                .unwrap_or(MAX_SCORE)
        }
        _ => NEUTRAL_SCORE,
    }
}

fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    raw.get(start..=end)
}
