//! Keyword classifier behaviour.

use mindful::classifier::{ClassificationSignals, KeywordLists, SignalKind};
use mindful::providers::Message;

#[test]
fn crisis_phrase_is_detected() {
    let lists = KeywordLists::default();
    let signals = lists.signals("I want to die");
    assert!(signals.crisis);
}

#[test]
fn neutral_message_raises_nothing() {
    let lists = KeywordLists::default();
    assert_eq!(
        lists.signals("I had a great day"),
        ClassificationSignals::default()
    );
}

#[test]
fn signals_are_independent() {
    let lists = KeywordLists::default();
    let signals = lists.signals("I feel anxious and need to relax");
    assert!(signals.breathing_need);
    assert!(signals.calming_audio_need);
    assert!(!signals.crisis);
}

#[test]
fn matching_ignores_case() {
    let lists = KeywordLists::default();
    assert!(lists.classify(SignalKind::Crisis, "I WANT TO DIE"));
    assert!(lists.classify(SignalKind::Breathing, "So Stressed about finals"));
}

#[test]
fn curly_apostrophes_match_straight_phrases() {
    let lists = KeywordLists::default();
    assert!(lists.classify(SignalKind::CalmingAudio, "I can\u{2019}t sleep at all"));
}

#[test]
fn empty_text_raises_nothing() {
    let lists = KeywordLists::default();
    for kind in SignalKind::ALL {
        assert!(!lists.classify(kind, ""));
        assert!(!lists.classify(kind, "   "));
    }
    assert_eq!(lists.signals(""), ClassificationSignals::default());
}

#[test]
fn substring_matching_has_no_word_boundaries() {
    let lists = KeywordLists::default();
    // "relaxing" contains "relax".
    assert!(lists.classify(SignalKind::CalmingAudio, "a relaxing walk"));
}

#[test]
fn classification_is_deterministic() {
    let lists = KeywordLists::default();
    let text = "overwhelmed, can't sleep, want to write it down";
    let first = lists.signals(text);
    for _ in 0..10 {
        assert_eq!(lists.signals(text), first);
    }
}

#[test]
fn only_latest_user_turn_is_scanned() {
    let lists = KeywordLists::default();
    let history = vec![
        Message::user("I want to die"),
        Message::assistant("I'm really glad you told me. Are you safe right now?"),
        Message::user("thanks, feeling a bit better now"),
    ];
    let signals = lists.classify_latest(&history);
    assert!(!signals.crisis);
}

#[test]
fn latest_user_turn_is_found_behind_assistant_turns() {
    let lists = KeywordLists::default();
    let history = vec![
        Message::user("I keep having panic attacks"),
        Message::assistant("That sounds frightening."),
    ];
    assert!(lists.classify_latest(&history).breathing_need);
}

#[test]
fn custom_lists_replace_defaults() {
    let lists = KeywordLists::default().with_list(SignalKind::Crisis, ["  Give Up ", ""]);
    assert_eq!(lists.phrases(SignalKind::Crisis), ["give up".to_owned()]);
    assert!(lists.classify(SignalKind::Crisis, "I just want to give up"));
    assert!(!lists.classify(SignalKind::Crisis, "I want to die"));
}

#[test]
fn keyword_table_overrides_only_named_lists() {
    let parsed = toml::from_str::<KeywordLists>(r#"breathing = ["hyperventilating"]"#);
    assert!(parsed.is_ok());
    let lists = match parsed {
        Ok(lists) => lists,
        Err(err) => panic!("keyword table should parse: {err}"),
    };
    assert!(lists.classify(SignalKind::Breathing, "I'm hyperventilating"));
    assert!(!lists.classify(SignalKind::Breathing, "so anxious"));
    assert!(lists.classify(SignalKind::Crisis, "want to die"));
}

#[test]
fn signals_serialize_with_camel_case_keys() {
    let signals = KeywordLists::default().signals("need to vent, can't sleep");
    let json = serde_json::to_value(signals).expect("signals should serialize");
    assert_eq!(json["crisis"], false);
    assert_eq!(json["moodJournalNeed"], true);
    assert_eq!(json["calmingAudioNeed"], true);
    assert_eq!(json["breathingNeed"], false);
}

#[test]
fn negated_crisis_phrase_still_flags_crisis() {
    let lists = KeywordLists::default();
    assert!(lists.signals("I'm not going to hurt myself").crisis);
}

#[test]
fn anxious_and_relax_raise_both_suggestions() {
    let lists = KeywordLists::default();
    let signals = lists.signals("I'm so anxious I can't take it anymore, need to relax");
    assert!(signals.breathing_need);
    assert!(signals.calming_audio_need);
}
