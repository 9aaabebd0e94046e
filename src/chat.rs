//! Chat-turn pipeline.
//!
//! Validate the request, classify the latest user turn, assemble the prompt,
//! make one bounded call to the completion provider, shape the reply. The
//! provider call is the only suspend point and the only failure boundary.
//! A failed call is reported as an error, never as a synthesised reply.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{info, warn};

use crate::classifier::{latest_user_message, KeywordLists};
use crate::persona::{self, Persona};
use crate::prompt::{self, SamplingParams, BASE_SYSTEM_PROMPT};
use crate::providers::{LlmProvider, Message, ProviderError};
use crate::reply::{self, ReplyResult};

/// Upper bound on a single provider call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Inbound chat turn: full history plus optional caller context.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Conversation so far, oldest first, ending with the new user turn.
    pub messages: Vec<Message>,
    /// Optional caller context.
    #[serde(default)]
    pub user_context: Option<UserContext>,
}

/// Caller-supplied context. Every field is optional, unknown keys are
/// ignored, and values of an unexpected type are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserContext {
    /// Persona id (`gentle`, `direct`, `humorous`); anything else means none.
    #[serde(deserialize_with = "string_or_none")]
    pub persona: Option<String>,
    /// Display name. Not sent upstream.
    pub name: Option<Value>,
    /// Last self-reported mood, a number or a label. Not sent upstream.
    pub recent_mood: Option<Value>,
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_str().map(str::to_owned)))
}

impl ChatRequest {
    /// Persona id from the context, if any.
    pub fn persona_id(&self) -> Option<&str> {
        self.user_context
            .as_ref()
            .and_then(|ctx| ctx.persona.as_deref())
    }
}

/// Errors from the chat pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The request carried no messages.
    #[error("messages must not be empty")]
    EmptyHistory,
    /// The history holds no user turn to answer.
    #[error("messages must contain at least one user turn")]
    NoUserMessage,
    /// The provider call failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// The provider did not answer in time.
    #[error("completion timed out after {0:?}")]
    Timeout(Duration),
}

impl ChatError {
    /// Whether the caller sent a bad request.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::EmptyHistory | Self::NoUserMessage)
    }

    /// Whether retrying the same request later may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::Provider(err) => err.is_timeout(),
            Self::EmptyHistory | Self::NoUserMessage => false,
        }
    }
}

/// Chat pipeline bound to an injected provider.
#[derive(Clone)]
pub struct ChatPipeline {
    provider: Arc<dyn LlmProvider>,
    keywords: Arc<KeywordLists>,
    sampling: SamplingParams,
    timeout: Duration,
}

impl std::fmt::Debug for ChatPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatPipeline")
            .field("model", &self.provider.model_id())
            .field("sampling", &self.sampling)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ChatPipeline {
    /// Build a pipeline with default sampling and timeout.
    pub fn new(provider: Arc<dyn LlmProvider>, keywords: Arc<KeywordLists>) -> Self {
        Self {
            provider,
            keywords,
            sampling: SamplingParams::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override sampling parameters.
    pub fn with_sampling(mut self, sampling: SamplingParams) -> Self {
        self.sampling = sampling;
        self
    }

    /// Override the provider call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Answer one chat turn.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::EmptyHistory`] or [`ChatError::NoUserMessage`] for
    /// malformed input (before any classification), [`ChatError::Provider`]
    /// when the provider fails and [`ChatError::Timeout`] when it is too slow.
    pub async fn respond(&self, request: &ChatRequest) -> Result<ReplyResult, ChatError> {
        if request.messages.is_empty() {
            return Err(ChatError::EmptyHistory);
        }
        if latest_user_message(&request.messages).is_none() {
            return Err(ChatError::NoUserMessage);
        }

        let signals = self.keywords.classify_latest(&request.messages);
        let persona_id = request.persona_id();
        if let Some(id) = persona_id {
            if Persona::parse(id).is_none() {
                warn!(persona = id, "unknown persona, using base prompt only");
            }
        }

        let payload = prompt::assemble(
            BASE_SYSTEM_PROMPT,
            persona::resolve(persona_id),
            &request.messages,
        );
        let completion_request = payload.into_request(self.sampling);

        let completion =
            match tokio::time::timeout(self.timeout, self.provider.complete(completion_request))
                .await
            {
                Ok(result) => result?,
                Err(_) => return Err(ChatError::Timeout(self.timeout)),
            };

        info!(
            turns = request.messages.len(),
            crisis = signals.crisis,
            breathing = signals.breathing_need,
            mood_journal = signals.mood_journal_need,
            calming_audio = signals.calming_audio_need,
            "chat turn answered"
        );

        Ok(reply::shape(completion.text.as_deref(), signals))
    }
}
