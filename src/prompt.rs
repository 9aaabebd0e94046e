//! System prompt text and prompt assembly for the chat pipeline.

use crate::providers::{CompletionRequest, Message, ResponseFormat};

/// Base instruction sent with every chat turn.
pub const BASE_SYSTEM_PROMPT: &str = "\
You are a compassionate mental health companion for college students. Your role is to:

1. Listen actively and empathetically to students' concerns
2. Use evidence-based techniques from Cognitive Behavioral Therapy (CBT)
3. Help students identify and challenge negative thought patterns
4. Suggest healthy coping strategies
5. Validate their feelings while encouraging positive perspectives
6. Recognize when professional help may be needed

Guidelines:
- Be warm, non-judgmental, and supportive
- Ask open-ended questions to encourage reflection
- Normalize mental health struggles
- Suggest concrete coping strategies (breathing exercises, journaling, physical activity)
- If crisis indicators are detected, emphasize the importance of reaching out to professionals
- Keep responses concise and conversational (2-4 sentences typically)
- Use encouraging and hopeful language

Important: You are NOT a replacement for professional mental health services. \
Always encourage students to seek professional help when needed.";

/// Outbound payload for one chat turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPayload {
    /// Base instruction followed by the persona fragment.
    pub system_instruction: String,
    /// Full caller history, unmodified and in order.
    pub messages: Vec<Message>,
}

/// Sampling parameters attached to an assembled prompt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    /// Maximum completion tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            max_tokens: 1000,
            temperature: 0.7,
        }
    }
}

/// Concatenate `base` and `persona_fragment` into the system instruction and
/// attach the whole history after it.
///
/// No truncation or windowing is applied; identical inputs give identical
/// payloads.
pub fn assemble(base: &str, persona_fragment: &str, history: &[Message]) -> PromptPayload {
    let mut system_instruction =
        String::with_capacity(base.len().saturating_add(persona_fragment.len()));
    system_instruction.push_str(base);
    system_instruction.push_str(persona_fragment);

    PromptPayload {
        system_instruction,
        messages: history.to_vec(),
    }
}

impl PromptPayload {
    /// Convert into a provider request.
    pub fn into_request(self, params: SamplingParams) -> CompletionRequest {
        CompletionRequest {
            system: Some(self.system_instruction),
            messages: self.messages,
            max_tokens: Some(params.max_tokens),
            temperature: Some(params.temperature),
            response_format: ResponseFormat::Text,
        }
    }
}
