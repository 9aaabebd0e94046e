//! Prompt assembly.

use mindful::persona::{self, Persona};
use mindful::prompt::{assemble, SamplingParams, BASE_SYSTEM_PROMPT};
use mindful::providers::{Message, ResponseFormat, Role};

fn history() -> Vec<Message> {
    vec![
        Message::user("exams are next week"),
        Message::assistant("How are you feeling about them?"),
        Message::user("honestly pretty anxious"),
    ]
}

#[test]
fn system_instruction_is_base_then_fragment() {
    let fragment = Persona::Direct.fragment();
    let payload = assemble(BASE_SYSTEM_PROMPT, fragment, &history());
    assert_eq!(
        payload.system_instruction,
        format!("{BASE_SYSTEM_PROMPT}{fragment}")
    );
}

#[test]
fn history_is_forwarded_unchanged() {
    let turns = history();
    let payload = assemble(BASE_SYSTEM_PROMPT, "", &turns);
    assert_eq!(payload.messages, turns);
    let roles: Vec<Role> = payload.messages.iter().map(|m| m.role).collect();
    assert_eq!(roles, [Role::User, Role::Assistant, Role::User]);
}

#[test]
fn assembly_is_deterministic() {
    let fragment = persona::resolve(Some("gentle"));
    let first = assemble(BASE_SYSTEM_PROMPT, fragment, &history());
    let second = assemble(BASE_SYSTEM_PROMPT, fragment, &history());
    assert_eq!(first, second);
}

#[test]
fn request_carries_chat_sampling() {
    let request = assemble(BASE_SYSTEM_PROMPT, "", &history()).into_request(SamplingParams {
        max_tokens: 1000,
        temperature: 0.7,
    });
    assert_eq!(request.system.as_deref(), Some(BASE_SYSTEM_PROMPT));
    assert_eq!(request.messages.len(), 3);
    assert_eq!(request.max_tokens, Some(1000));
    assert_eq!(request.temperature, Some(0.7));
    assert_eq!(request.response_format, ResponseFormat::Text);
}
