//! Application state wiring the services together.
//!
//! `BotService` is generic over the key-value substrate; AppState pins it to
//! the SQLite implementation.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use personachat_core::llm::box_provider::BoxLlmProvider;
use personachat_core::service::bot::BotService;
use personachat_core::storage::bot_store::LocalBotStore;
use personachat_infra::config::{load_config, resolve_api_key, resolve_data_dir};
use personachat_infra::llm::create_provider;
use personachat_infra::sqlite::kv::SqliteKvStore;
use personachat_infra::sqlite::pool::{DatabasePool, database_url};
use personachat_types::config::AppConfig;

pub type ConcreteBotService = BotService<SqliteKvStore>;

/// Shared application state for CLI commands.
#[derive(Clone)]
pub struct AppState {
    pub bot_service: Arc<ConcreteBotService>,
    pub config: AppConfig,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let config = load_config(&data_dir).await?;

        let db_pool = DatabasePool::new(&database_url(&data_dir))
            .await
            .context("failed to open the local database")?;

        let store = LocalBotStore::new(SqliteKvStore::new(db_pool));
        let bot_service = BotService::new(store, config.share_base_url.clone());

        tracing::debug!(data_dir = %data_dir.display(), "application state initialized");

        Ok(Self {
            bot_service: Arc::new(bot_service),
            config,
            data_dir,
        })
    }

    /// Build the model provider from config and the API key in the environment.
    pub fn provider(&self) -> anyhow::Result<BoxLlmProvider> {
        let api_key = resolve_api_key(&self.config).with_context(|| {
            format!(
                "set {} to your API key, or point api_key_env in {} at another variable",
                self.config.api_key_env,
                self.data_dir.join("config.toml").display()
            )
        })?;
        Ok(create_provider(&self.config, api_key))
    }
}
