//! Mindful CLI entry point.
//!
//! `serve` runs the HTTP API; `classify` runs the keyword classifiers over a
//! single message and prints the signals as JSON.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use mindful::api::{self, AppState};
use mindful::chat::ChatPipeline;
use mindful::config::Config;
use mindful::journal::{JournalPipeline, JournalStore};
use mindful::providers::openai::OpenAiProvider;
use mindful::providers::LlmProvider;

/// Mindful: supportive chat and mood journal API.
#[derive(Parser)]
#[command(name = "mindful", version, about)]
struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API.
    Serve {
        /// Config file (defaults to `$MINDFUL_CONFIG_PATH` or `./config.toml`).
        #[arg(long)]
        config: Option<PathBuf>,
        /// Keep journal entries in memory instead of the database file.
        #[arg(long)]
        in_memory: bool,
    },
    /// Classify one message and print the signals as JSON.
    Classify {
        /// Message text.
        text: String,
        /// Config file with keyword overrides.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config, in_memory } => handle_serve(config.as_deref(), in_memory).await,
        Command::Classify { text, config } => handle_classify(&text, config.as_deref()),
    }
}

/// Run the HTTP API until shutdown.
async fn handle_serve(config_path: Option<&Path>, in_memory: bool) -> anyhow::Result<()> {
    let config = Config::load(config_path).context("failed to load configuration")?;
    let _logging_guard = mindful::logging::init_production(
        Path::new(&config.logging.logs_dir),
        &config.logging.level,
    )?;

    let api_key = config.llm.api_key.clone().unwrap_or_default();
    if api_key.is_empty() {
        warn!(
            env = %config.llm.api_key_env,
            "no API key configured, completion calls will fail"
        );
    }
    let provider: Arc<dyn LlmProvider> = Arc::new(OpenAiProvider::new(
        config.llm.model.clone(),
        api_key,
        &config.llm.base_url,
        config.llm.timeout(),
    ));

    let chat = ChatPipeline::new(Arc::clone(&provider), Arc::new(config.keywords.clone()))
        .with_sampling(config.llm.sampling())
        .with_timeout(config.llm.timeout());
    let journal = JournalPipeline::new(Arc::clone(&provider), config.llm.timeout());

    let store = if in_memory {
        info!("journal entries kept in memory");
        JournalStore::in_memory().await?
    } else {
        JournalStore::open(Path::new(&config.journal.database_path))
            .await
            .with_context(|| {
                format!(
                    "failed to open journal database {}",
                    config.journal.database_path
                )
            })?
    };

    let state = Arc::new(AppState {
        chat,
        journal,
        store,
        model: config.llm.model.clone(),
    });

    let mut app = api::router(state);
    if let Some(cors) = api::cors_layer(&config.server.allowed_origins) {
        app = app.layer(cors);
    }

    info!(
        model = %config.llm.model,
        bind = %config.server.bind_addr,
        "mindful starting"
    );
    api::serve(app, &config.server.bind_addr).await
}

/// Print the classifier signals for `text`.
fn handle_classify(text: &str, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = Config::load(config_path).context("failed to load configuration")?;
    mindful::logging::init_cli(&config.logging.level);

    let signals = config.keywords.signals(text);
    println!("{}", serde_json::to_string(&signals)?);
    Ok(())
}
