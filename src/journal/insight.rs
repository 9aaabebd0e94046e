//! Short supportive insight for a journal entry.

use std::time::Duration;

use tracing::warn;

use crate::providers::{CompletionRequest, LlmProvider, Message, ResponseFormat};

use super::{JournalError, EMPTY_INSIGHT, FALLBACK_INSIGHT};

const INSIGHT_SYSTEM_PROMPT: &str = "\
You are a compassionate mental health AI that provides supportive insights on journal entries.

Your role is to:
- Acknowledge the user's feelings with empathy
- Identify positive patterns, strengths, or coping strategies mentioned
- Gently highlight any cognitive distortions (if present) using CBT principles
- Offer 1-2 actionable suggestions or reframing techniques
- Be encouraging and validating

Keep your response to 2-3 sentences. Be warm, supportive, and therapeutically meaningful.";

const INSIGHT_MAX_TOKENS: u32 = 200;
const INSIGHT_TEMPERATURE: f32 = 0.7;

/// Generate an insight, degrading to [`FALLBACK_INSIGHT`] on failure and to
/// [`EMPTY_INSIGHT`] when the provider returns no text.
pub async fn generate(
    provider: &dyn LlmProvider,
    content: &str,
    mood: Option<u8>,
    timeout: Duration,
) -> String {
    match try_generate(provider, content, mood, timeout).await {
        Ok(Some(text)) => text,
        Ok(None) => EMPTY_INSIGHT.to_owned(),
        Err(err) => {
            warn!(error = %err, "journal insight failed, returning fallback");
            FALLBACK_INSIGHT.to_owned()
        }
    }
}

/// Generate an insight, surfacing failures. `Ok(None)` means the provider
/// answered with no usable text.
///
/// # Errors
///
/// Returns [`JournalError::Provider`] or [`JournalError::Timeout`].
pub async fn try_generate(
    provider: &dyn LlmProvider,
    content: &str,
    mood: Option<u8>,
    timeout: Duration,
) -> Result<Option<String>, JournalError> {
    let request = CompletionRequest {
        system: Some(INSIGHT_SYSTEM_PROMPT.to_owned()),
        messages: vec![Message::user(user_prompt(content, mood))],
        max_tokens: Some(INSIGHT_MAX_TOKENS),
        temperature: Some(INSIGHT_TEMPERATURE),
        response_format: ResponseFormat::Text,
    };

    let response = tokio::time::timeout(timeout, provider.complete(request))
        .await
        .map_err(|_| JournalError::Timeout(timeout))??;

    Ok(response
        .text
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty()))
}

/// User turn sent for an insight request.
pub fn user_prompt(content: &str, mood: Option<u8>) -> String {
    let mood = mood.map_or_else(|| "unknown".to_owned(), |m| m.to_string());
    format!(
        "Journal Entry (Mood: {mood}/10):\n\n{content}\n\nProvide supportive insight on this journal entry."
    )
}
