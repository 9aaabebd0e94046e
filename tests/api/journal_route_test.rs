//! Journal routes over the router.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use mindful::journal::{JournalStore, FALLBACK_INSIGHT};

use crate::harness::{app, app_with_store, body_json, post_json, request};
use crate::support::{FailingProvider, ScriptedProvider};

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn analysis_returns_scored_payload() {
    let app = app(
        ScriptedProvider::replying(
            r#"{"score": 12, "emotions": ["relieved"], "insights": "You made it through."}"#,
        ),
        TIMEOUT,
    )
    .await;

    let response = app
        .oneshot(post_json(
            "/api/journal-analysis",
            &json!({"content": "Finally submitted my thesis draft."}),
        ))
        .await
        .expect("request should be served");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["score"], 10);
    assert_eq!(json["emotions"], json!(["relieved"]));
    assert_eq!(json["insights"], "You made it through.");
}

#[tokio::test]
async fn analysis_soft_fails_with_200() {
    let app = app(Arc::new(FailingProvider), TIMEOUT).await;
    let response = app
        .oneshot(post_json(
            "/api/journal-analysis",
            &json!({"content": "rough day"}),
        ))
        .await
        .expect("request should be served");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["score"], 5);
    assert_eq!(json["emotions"], json!([]));
    assert_eq!(json["insights"], FALLBACK_INSIGHT);
}

#[tokio::test]
async fn analysis_of_malformed_body_is_still_200() {
    let app = app(ScriptedProvider::replying("unused"), TIMEOUT).await;
    let response = app
        .oneshot(post_json("/api/journal-analysis", &json!([1, 2, 3])))
        .await
        .expect("request should be served");
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["score"], 5);
}

#[tokio::test]
async fn insights_soft_fail_with_200() {
    let app = app(Arc::new(FailingProvider), TIMEOUT).await;
    let response = app
        .oneshot(post_json(
            "/api/journal-insights",
            &json!({"content": "rough day", "mood": 3}),
        ))
        .await
        .expect("request should be served");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["insight"], FALLBACK_INSIGHT);
}

#[tokio::test]
async fn create_with_mood_stores_entry_as_given() {
    let provider = ScriptedProvider::replying("unused");
    let app = app(provider.clone(), TIMEOUT).await;

    let response = app
        .oneshot(post_json(
            "/api/users/alice/journal",
            &json!({"content": "Walked by the lake.", "mood": 8, "emotions": ["calm"]}),
        ))
        .await
        .expect("request should be served");

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["userId"], "alice");
    assert_eq!(json["mood"], 8);
    assert_eq!(json["moodLabel"], "good");
    assert_eq!(json["emotions"], json!(["calm"]));
    assert!(provider.requests().is_empty());
}

#[tokio::test]
async fn create_without_mood_analyses_first() {
    let provider = ScriptedProvider::replying(
        r#"{"score": 2, "emotions": ["lonely", "tired"], "insights": "Reaching out could help."}"#,
    );
    let app = app(provider.clone(), TIMEOUT).await;

    let response = app
        .oneshot(post_json(
            "/api/users/alice/journal",
            &json!({"content": "Nobody answered my messages today."}),
        ))
        .await
        .expect("request should be served");

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["mood"], 2);
    assert_eq!(json["moodLabel"], "low");
    assert_eq!(json["emotions"], json!(["lonely", "tired"]));
    assert_eq!(json["aiInsight"], "Reaching out could help.");
    assert_eq!(provider.requests().len(), 1);
}

#[tokio::test]
async fn create_rejects_empty_content_and_bad_mood() {
    let store = JournalStore::in_memory().await.expect("store should open");
    let provider = ScriptedProvider::replying("unused");

    let empty = app_with_store(provider.clone(), TIMEOUT, store.clone())
        .oneshot(post_json(
            "/api/users/alice/journal",
            &json!({"content": "   ", "mood": 5}),
        ))
        .await
        .expect("request should be served");
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);

    let bad_mood = app_with_store(provider, TIMEOUT, store)
        .oneshot(post_json(
            "/api/users/alice/journal",
            &json!({"content": "text", "mood": 0}),
        ))
        .await
        .expect("request should be served");
    assert_eq!(bad_mood.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_stats_and_delete_round_trip() {
    let store = JournalStore::in_memory().await.expect("store should open");
    let provider = ScriptedProvider::replying("unused");
    let router = || app_with_store(provider.clone(), TIMEOUT, store.clone());

    let mut ids = Vec::new();
    for (content, mood) in [("monday", 4), ("tuesday", 6), ("wednesday", 8)] {
        let response = router()
            .oneshot(post_json(
                "/api/users/alice/journal",
                &json!({"content": content, "mood": mood}),
            ))
            .await
            .expect("request should be served");
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        ids.push(json["id"].as_str().unwrap_or_default().to_owned());
    }

    let listed = router()
        .oneshot(request("GET", "/api/users/alice/journal?limit=2"))
        .await
        .expect("request should be served");
    assert_eq!(listed.status(), StatusCode::OK);
    let listed = body_json(listed).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(2));
    assert_eq!(listed[0]["content"], "wednesday");

    let stats = router()
        .oneshot(request("GET", "/api/users/alice/journal/stats"))
        .await
        .expect("request should be served");
    assert_eq!(stats.status(), StatusCode::OK);
    let stats = body_json(stats).await;
    assert_eq!(stats["count"], 3);
    assert_eq!(stats["averageMood"], 6.0);
    assert_eq!(stats["trend"].as_array().map(Vec::len), Some(3));
    assert_eq!(stats["trend"][0]["mood"], 4);

    let foreign = router()
        .oneshot(request("DELETE", &format!("/api/users/bob/journal/{}", ids[0])))
        .await
        .expect("request should be served");
    assert_eq!(foreign.status(), StatusCode::NOT_FOUND);

    let deleted = router()
        .oneshot(request("DELETE", &format!("/api/users/alice/journal/{}", ids[0])))
        .await
        .expect("request should be served");
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let remaining = router()
        .oneshot(request("GET", "/api/users/alice/journal"))
        .await
        .expect("request should be served");
    let remaining = body_json(remaining).await;
    assert_eq!(remaining.as_array().map(Vec::len), Some(2));
}
