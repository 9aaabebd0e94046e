//! Journal endpoints: analysis, insights and per-user entries.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::journal::{
    JournalAnalysis, JournalEntry, JournalStats, NewJournalEntry, FALLBACK_INSIGHT,
};

use super::error::ApiError;
use super::AppState;

/// Body of `POST /api/journal-analysis`.
#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    /// Entry text.
    #[serde(default)]
    pub content: String,
}

/// Body of `POST /api/journal-insights`.
#[derive(Debug, Deserialize)]
pub struct InsightRequest {
    /// Entry text.
    #[serde(default)]
    pub content: String,
    /// Self-reported mood.
    #[serde(default)]
    pub mood: Option<u8>,
}

/// Response of `POST /api/journal-insights`.
#[derive(Debug, Serialize, Deserialize)]
pub struct InsightResponse {
    /// Supportive insight text.
    pub insight: String,
}

/// Body of `POST /api/users/{user_id}/journal`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    /// Entry text.
    pub content: String,
    /// Mood score; when absent the entry is analysed first.
    #[serde(default)]
    pub mood: Option<u8>,
    /// Optional label.
    #[serde(default)]
    pub mood_label: Option<String>,
    /// Emotion labels (ignored when the entry is analysed).
    #[serde(default)]
    pub emotions: Option<Vec<String>>,
    /// Insight text (ignored when the entry is analysed).
    #[serde(default)]
    pub ai_insight: Option<String>,
}

/// Query of `GET /api/users/{user_id}/journal`.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Only the N most recent entries.
    pub limit: Option<usize>,
}

/// Score an entry. Always 200: malformed bodies and provider failures yield
/// the neutral payload.
pub async fn analysis_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Json<JournalAnalysis> {
    match payload {
        Ok(Json(request)) => Json(state.journal.analyze(&request.content).await),
        Err(rejection) => {
            debug!(error = %rejection, "malformed journal analysis request");
            Json(JournalAnalysis::fallback())
        }
    }
}

/// Insight for an entry. Always 200.
pub async fn insights_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<InsightRequest>, JsonRejection>,
) -> Json<InsightResponse> {
    let insight = match payload {
        Ok(Json(request)) => state.journal.insight(&request.content, request.mood).await,
        Err(rejection) => {
            debug!(error = %rejection, "malformed journal insight request");
            FALLBACK_INSIGHT.to_owned()
        }
    };
    Json(InsightResponse { insight })
}

/// Create an entry, analysing it first when no mood is given.
pub async fn create_entry_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    payload: Result<Json<CreateEntryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<JournalEntry>), ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    if request.content.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "journal entry content must not be empty".to_owned(),
        ));
    }

    let new_entry = match request.mood {
        Some(mood) => NewJournalEntry {
            user_id,
            content: request.content,
            mood,
            mood_label: request.mood_label,
            emotions: request.emotions.unwrap_or_default(),
            ai_insight: request.ai_insight,
        },
        None => {
            let analysis = state.journal.analyze(&request.content).await;
            let mut entry = NewJournalEntry::from_analysis(user_id, request.content, analysis);
            entry.mood_label = request.mood_label;
            entry
        }
    };

    let entry = state.store.create_entry(new_entry).await?;
    info!(entry_id = %entry.id, mood = entry.mood, "journal entry saved");
    Ok((StatusCode::CREATED, Json(entry)))
}

/// List entries newest first.
pub async fn list_entries_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<JournalEntry>>, ApiError> {
    let entries = match query.limit {
        Some(limit) => state.store.recent_entries(&user_id, limit).await?,
        None => state.store.list_entries(&user_id).await?,
    };
    Ok(Json(entries))
}

/// Delete an owned entry.
pub async fn delete_entry_handler(
    State(state): State<Arc<AppState>>,
    Path((user_id, entry_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    if state.store.delete_entry(&entry_id, &user_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("journal entry {entry_id} not found")))
    }
}

/// Count, average mood and trend for the dashboard.
pub async fn stats_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<JournalStats>, ApiError> {
    Ok(Json(state.store.stats(&user_id).await?))
}
