//! SQLite-backed journal persistence keyed by user id.
//!
//! Straight-line CRUD over a single `journal_entries` table. The schema in
//! `migrations/001_journal.sql` is applied on open and is idempotent.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::{JournalAnalysis, JournalError, MoodBand, MAX_CONTENT_SIZE, MAX_SCORE, MIN_SCORE};

const SCHEMA: &str = include_str!("../../migrations/001_journal.sql");

/// Entries shown on the dashboard mood chart.
pub const TREND_LENGTH: usize = 7;

/// Raw row: `(id, user_id, content, mood, mood_label, emotions, ai_insight, created_at)`.
type EntryRow = (
    String,
    String,
    String,
    i64,
    Option<String>,
    Option<String>,
    Option<String>,
    String,
);

const SELECT_COLUMNS: &str =
    "SELECT id, user_id, content, mood, mood_label, emotions, ai_insight, created_at \
     FROM journal_entries";

/// A stored journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    /// Entry id (UUID v4).
    pub id: String,
    /// Owner.
    pub user_id: String,
    /// Entry text.
    pub content: String,
    /// Mood score in `1..=10`.
    pub mood: u8,
    /// Human label for the mood.
    pub mood_label: Option<String>,
    /// Emotion labels.
    pub emotions: Vec<String>,
    /// AI insight stored with the entry.
    pub ai_insight: Option<String>,
    /// RFC 3339 UTC creation time.
    pub created_at: String,
}

/// Input for [`JournalStore::create_entry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJournalEntry {
    /// Owner.
    pub user_id: String,
    /// Entry text.
    pub content: String,
    /// Mood score in `1..=10`.
    pub mood: u8,
    /// Label; defaults to the [`MoodBand`] of `mood` when absent.
    pub mood_label: Option<String>,
    /// Emotion labels.
    pub emotions: Vec<String>,
    /// AI insight.
    pub ai_insight: Option<String>,
}

impl NewJournalEntry {
    /// Entry populated from an analysis result.
    pub fn from_analysis(user_id: String, content: String, analysis: JournalAnalysis) -> Self {
        Self {
            user_id,
            content,
            mood: analysis.score,
            mood_label: None,
            emotions: analysis.emotions,
            ai_insight: Some(analysis.insights),
        }
    }
}

/// One point of the dashboard mood chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodPoint {
    /// Calendar date (`YYYY-MM-DD`, UTC).
    pub date: String,
    /// Short weekday name (`Mon`).
    pub day: String,
    /// Mood score.
    pub mood: u8,
}

/// Aggregates for one user's journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalStats {
    /// Number of entries.
    pub count: u64,
    /// Mean mood; `0.0` when there are no entries.
    pub average_mood: f64,
    /// Latest entries, oldest first.
    pub trend: Vec<MoodPoint>,
}

/// Journal persistence over a SQLite pool.
#[derive(Debug, Clone)]
pub struct JournalStore {
    db: SqlitePool,
}

impl JournalStore {
    /// Open (creating if needed) the database at `path` and apply the schema.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::Database`] if the file cannot be opened or the
    /// schema fails to apply.
    pub async fn open(path: &Path) -> Result<Self, JournalError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(sqlx::Error::Io)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        info!(path = %path.display(), "journal database opened");
        Self::from_pool(pool).await
    }

    /// Private in-memory database, used by tests and `serve --in-memory`.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::Database`] if the schema fails to apply.
    pub async fn in_memory() -> Result<Self, JournalError> {
        let options: SqliteConnectOptions = "sqlite::memory:".parse()?;
        // One connection that never recycles: each connection would otherwise
        // see its own empty database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Self::from_pool(pool).await
    }

    /// Wrap an existing pool and apply the schema.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::Database`] if the schema fails to apply.
    pub async fn from_pool(db: SqlitePool) -> Result<Self, JournalError> {
        sqlx::raw_sql(SCHEMA).execute(&db).await?;
        Ok(Self { db })
    }

    /// Insert a new entry and return it as stored.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::EmptyContent`], [`JournalError::ContentTooLarge`]
    /// or [`JournalError::InvalidMood`] for invalid input, and
    /// [`JournalError::Database`] on write failure.
    pub async fn create_entry(&self, entry: NewJournalEntry) -> Result<JournalEntry, JournalError> {
        if entry.content.trim().is_empty() {
            return Err(JournalError::EmptyContent);
        }
        if entry.content.len() > MAX_CONTENT_SIZE {
            return Err(JournalError::ContentTooLarge {
                size: entry.content.len(),
                max: MAX_CONTENT_SIZE,
            });
        }
        if !(MIN_SCORE..=MAX_SCORE).contains(&entry.mood) {
            return Err(JournalError::InvalidMood(i64::from(entry.mood)));
        }

        let stored = JournalEntry {
            id: uuid::Uuid::new_v4().to_string(),
            mood_label: entry
                .mood_label
                .filter(|label| !label.trim().is_empty())
                .or_else(|| Some(MoodBand::from_score(entry.mood).as_str().to_owned())),
            user_id: entry.user_id,
            content: entry.content,
            mood: entry.mood,
            emotions: entry.emotions,
            ai_insight: entry.ai_insight,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        };

        let emotions_json = if stored.emotions.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&stored.emotions)?)
        };

        sqlx::query(
            "INSERT INTO journal_entries \
             (id, user_id, content, mood, mood_label, emotions, ai_insight, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&stored.id)
        .bind(&stored.user_id)
        .bind(&stored.content)
        .bind(i64::from(stored.mood))
        .bind(&stored.mood_label)
        .bind(&emotions_json)
        .bind(&stored.ai_insight)
        .bind(&stored.created_at)
        .execute(&self.db)
        .await?;

        debug!(entry_id = %stored.id, mood = stored.mood, "journal entry created");
        Ok(stored)
    }

    /// All entries for `user_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::Database`] on read failure.
    pub async fn list_entries(&self, user_id: &str) -> Result<Vec<JournalEntry>, JournalError> {
        // SQLite treats a negative LIMIT as "no limit".
        self.fetch_newest(user_id, -1).await
    }

    /// The `limit` most recent entries for `user_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::Database`] on read failure.
    pub async fn recent_entries(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<JournalEntry>, JournalError> {
        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        self.fetch_newest(user_id, limit_i64).await
    }

    async fn fetch_newest(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<JournalEntry>, JournalError> {
        let query = format!(
            "{SELECT_COLUMNS} WHERE user_id = ?1 ORDER BY created_at DESC, rowid DESC LIMIT ?2"
        );
        let rows: Vec<EntryRow> = sqlx::query_as(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.db)
            .await?;

        rows.into_iter().map(row_to_entry).collect()
    }

    /// Delete an entry owned by `user_id`.
    ///
    /// Returns `false` when no entry with that id belongs to the user.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::Database`] on write failure.
    pub async fn delete_entry(&self, entry_id: &str, user_id: &str) -> Result<bool, JournalError> {
        let result = sqlx::query("DELETE FROM journal_entries WHERE id = ?1 AND user_id = ?2")
            .bind(entry_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        let deleted = result.rows_affected() > 0;
        debug!(entry_id, deleted, "journal entry delete");
        Ok(deleted)
    }

    /// Number of entries for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::Database`] on read failure.
    pub async fn entry_count(&self, user_id: &str) -> Result<u64, JournalError> {
        let row: (i64,) = sqlx::query_as("SELECT count(*) FROM journal_entries WHERE user_id = ?1")
            .bind(user_id)
            .fetch_one(&self.db)
            .await?;
        Ok(u64::try_from(row.0).unwrap_or(0))
    }

    /// Mean mood for `user_id`, `0.0` when there are no entries.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::Database`] on read failure.
    pub async fn average_mood(&self, user_id: &str) -> Result<f64, JournalError> {
        let row: (Option<f64>,) =
            sqlx::query_as("SELECT AVG(mood) FROM journal_entries WHERE user_id = ?1")
                .bind(user_id)
                .fetch_one(&self.db)
                .await?;
        Ok(row.0.unwrap_or(0.0))
    }

    /// Count, average and the last [`TREND_LENGTH`] moods (oldest first).
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::Database`] on read failure.
    pub async fn stats(&self, user_id: &str) -> Result<JournalStats, JournalError> {
        let count = self.entry_count(user_id).await?;
        let average_mood = self.average_mood(user_id).await?;
        let mut recent = self.recent_entries(user_id, TREND_LENGTH).await?;
        recent.reverse();

        let trend = recent
            .into_iter()
            .map(|entry| mood_point(&entry.created_at, entry.mood))
            .collect();

        Ok(JournalStats {
            count,
            average_mood,
            trend,
        })
    }
}

fn row_to_entry(row: EntryRow) -> Result<JournalEntry, JournalError> {
    let (id, user_id, content, mood, mood_label, emotions, ai_insight, created_at) = row;
    let mood = u8::try_from(mood).map_err(|_| JournalError::InvalidMood(mood))?;
    let emotions = match emotions {
        Some(json) => serde_json::from_str(&json)?,
        None => Vec::new(),
    };
    Ok(JournalEntry {
        id,
        user_id,
        content,
        mood,
        mood_label,
        emotions,
        ai_insight,
        created_at,
    })
}

fn mood_point(created_at: &str, mood: u8) -> MoodPoint {
    match DateTime::parse_from_rfc3339(created_at) {
        Ok(ts) => {
            let ts = ts.with_timezone(&Utc);
            MoodPoint {
                date: ts.format("%Y-%m-%d").to_string(),
                day: ts.format("%a").to_string(),
                mood,
            }
        }
        Err(_) => MoodPoint {
            date: created_at.chars().take(10).collect(),
            day: String::new(),
            mood,
        },
    }
}
