//! SQLite journal store.

use mindful::journal::{JournalError, JournalStore, NewJournalEntry};

async fn store() -> JournalStore {
    match JournalStore::in_memory().await {
        Ok(store) => store,
        Err(err) => panic!("in-memory store should open: {err}"),
    }
}

fn entry(user_id: &str, content: &str, mood: u8) -> NewJournalEntry {
    NewJournalEntry {
        user_id: user_id.to_owned(),
        content: content.to_owned(),
        mood,
        mood_label: None,
        emotions: vec!["calm".to_owned()],
        ai_insight: Some("Nice reflection.".to_owned()),
    }
}

#[tokio::test]
async fn create_then_list_newest_first() {
    let store = store().await;
    let first = store
        .create_entry(entry("alice", "first", 3))
        .await
        .expect("create should succeed");
    let second = store
        .create_entry(entry("alice", "second", 8))
        .await
        .expect("create should succeed");

    let listed = store.list_entries("alice").await.expect("list should succeed");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);
    assert_eq!(listed[1].emotions, ["calm"]);
    assert_eq!(listed[1].ai_insight.as_deref(), Some("Nice reflection."));
}

#[tokio::test]
async fn mood_label_defaults_to_band() {
    let store = store().await;
    let low = store
        .create_entry(entry("alice", "hard", 2))
        .await
        .expect("create should succeed");
    let good = store
        .create_entry(entry("alice", "great", 9))
        .await
        .expect("create should succeed");
    assert_eq!(low.mood_label.as_deref(), Some("low"));
    assert_eq!(good.mood_label.as_deref(), Some("good"));

    let labelled = store
        .create_entry(NewJournalEntry {
            mood_label: Some("content".to_owned()),
            ..entry("alice", "quiet", 6)
        })
        .await
        .expect("create should succeed");
    assert_eq!(labelled.mood_label.as_deref(), Some("content"));
}

#[tokio::test]
async fn entries_are_scoped_to_their_owner() {
    let store = store().await;
    let bobs = store
        .create_entry(entry("bob", "mine", 5))
        .await
        .expect("create should succeed");

    assert!(store
        .list_entries("alice")
        .await
        .expect("list should succeed")
        .is_empty());

    let deleted_by_other = store
        .delete_entry(&bobs.id, "alice")
        .await
        .expect("delete should run");
    assert!(!deleted_by_other);

    let deleted_by_owner = store
        .delete_entry(&bobs.id, "bob")
        .await
        .expect("delete should run");
    assert!(deleted_by_owner);
    assert_eq!(store.entry_count("bob").await.expect("count"), 0);
}

#[tokio::test]
async fn invalid_entries_are_rejected() {
    let store = store().await;

    let empty = store.create_entry(entry("alice", "  ", 5)).await;
    assert!(matches!(empty, Err(JournalError::EmptyContent)));

    let zero = store.create_entry(entry("alice", "text", 0)).await;
    assert!(matches!(zero, Err(JournalError::InvalidMood(0))));

    let high = store.create_entry(entry("alice", "text", 11)).await;
    assert!(matches!(high, Err(JournalError::InvalidMood(11))));

    let huge = "x".repeat(mindful::journal::MAX_CONTENT_SIZE.saturating_add(1));
    let too_large = store.create_entry(entry("alice", &huge, 5)).await;
    assert!(matches!(too_large, Err(JournalError::ContentTooLarge { .. })));
}

#[tokio::test]
async fn recent_entries_honours_limit() {
    let store = store().await;
    for mood in 1..=5 {
        store
            .create_entry(entry("alice", &format!("day {mood}"), mood))
            .await
            .expect("create should succeed");
    }
    let recent = store
        .recent_entries("alice", 2)
        .await
        .expect("recent should succeed");
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].mood, 5);
    assert_eq!(recent[1].mood, 4);
}

#[tokio::test]
async fn stats_for_empty_journal() {
    let store = store().await;
    let stats = store.stats("nobody").await.expect("stats should succeed");
    assert_eq!(stats.count, 0);
    assert!(stats.average_mood.abs() < f64::EPSILON);
    assert!(stats.trend.is_empty());
}

#[tokio::test]
async fn stats_average_and_trend() {
    let store = store().await;
    for mood in 1..=9 {
        store
            .create_entry(entry("alice", &format!("day {mood}"), mood))
            .await
            .expect("create should succeed");
    }
    let stats = store.stats("alice").await.expect("stats should succeed");
    assert_eq!(stats.count, 9);
    assert!((stats.average_mood - 5.0).abs() < 1e-9);

    // Last seven entries, oldest first.
    let moods: Vec<u8> = stats.trend.iter().map(|point| point.mood).collect();
    assert_eq!(moods, [3, 4, 5, 6, 7, 8, 9]);
    for point in &stats.trend {
        assert_eq!(point.date.len(), 10);
        assert_eq!(point.day.len(), 3);
    }
}
