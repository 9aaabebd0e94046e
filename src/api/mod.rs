//! HTTP surface: router composition, CORS and the serve loop.

pub mod chat;
pub mod error;
pub mod health;
pub mod journal;

use std::sync::Arc;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::chat::ChatPipeline;
use crate::journal::{JournalPipeline, JournalStore};

pub use self::error::ApiError;

/// Request body cap, above the journal content limit to leave room for JSON.
pub const MAX_BODY_BYTES: usize = 256 * 1024;

/// Shared state behind every handler.
#[derive(Debug)]
pub struct AppState {
    /// Chat turn pipeline.
    pub chat: ChatPipeline,
    /// Journal analysis and insight pipelines.
    pub journal: JournalPipeline,
    /// Journal persistence.
    pub store: JournalStore,
    /// Model name reported by the health endpoint.
    pub model: String,
}

/// All `/api` routes bound to `state`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        .route("/api/chat", post(chat::chat_handler))
        .route("/api/journal-analysis", post(journal::analysis_handler))
        .route("/api/journal-insights", post(journal::insights_handler))
        .route(
            "/api/users/{user_id}/journal",
            post(journal::create_entry_handler).get(journal::list_entries_handler),
        )
        .route(
            "/api/users/{user_id}/journal/stats",
            get(journal::stats_handler),
        )
        .route(
            "/api/users/{user_id}/journal/{entry_id}",
            delete(journal::delete_entry_handler),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS layer for the configured origins, or `None` when the list is empty.
///
/// `"*"` allows any origin. Unparseable origins are skipped with a warning.
pub fn cors_layer(allowed_origins: &[String]) -> Option<CorsLayer> {
    if allowed_origins.is_empty() {
        return None;
    }

    let allow_origin = if allowed_origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "skipping invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    Some(
        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]),
    )
}

/// Bind `bind_addr` and serve `app` until Ctrl-C or SIGTERM.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(app: Router, bind_addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received");
}
