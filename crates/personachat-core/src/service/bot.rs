//! Bot management service.
//!
//! The creation flow: validate the form input, build a Bot, save it to the
//! local collection, and hand back its share token and link.

use chrono::Utc;
use tracing::info;
use url::form_urlencoded;

use personachat_types::bot::{Bot, BotId, CreateBotRequest};
use personachat_types::error::BotError;
use personachat_types::share::ShareToken;

use crate::share::{codec, link};
use crate::storage::bot_store::LocalBotStore;
use crate::storage::kv_store::KvStore;

/// A freshly created bot with everything needed to share it.
#[derive(Debug, Clone)]
pub struct CreatedBot {
    pub bot: Bot,
    pub token: ShareToken,
    pub link: String,
}

/// Generated avatar for bots created without one.
pub fn default_avatar_url(name: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(name.as_bytes()).collect();
    format!("https://ui-avatars.com/api/?name={encoded}&background=random")
}

/// Service orchestrating the user's own bots.
///
/// Generic over the key-value substrate to keep personachat-core free of
/// infrastructure dependencies.
pub struct BotService<K: KvStore> {
    store: LocalBotStore<K>,
    share_base_url: String,
}

impl<K: KvStore> BotService<K> {
    /// - `store`: the "my bots" collection
    /// - `share_base_url`: origin used for share links (e.g., http://localhost:3000)
    pub fn new(store: LocalBotStore<K>, share_base_url: impl Into<String>) -> Self {
        Self {
            store,
            share_base_url: share_base_url.into(),
        }
    }

    /// Create and save a bot.
    pub async fn create_bot(&self, request: CreateBotRequest) -> Result<CreatedBot, BotError> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(BotError::InvalidName("name cannot be empty".to_string()));
        }

        let persona = request.persona.trim().to_string();
        if persona.is_empty() {
            return Err(BotError::InvalidPersona(
                "persona cannot be empty".to_string(),
            ));
        }

        let avatar_url = request
            .avatar_url
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| default_avatar_url(&name));

        let bot = Bot {
            id: BotId::new(),
            name,
            persona,
            avatar_url,
            created_at: Utc::now(),
        };

        self.store
            .save(&bot)
            .await
            .map_err(|e| BotError::Storage(e.to_string()))?;

        let token = codec::encode(&bot);
        let link = link::build_share_link(&self.share_base_url, &token);

        info!(bot_id = %bot.id, name = %bot.name, "created bot");

        Ok(CreatedBot { bot, token, link })
    }

    /// All of the user's bots, oldest first.
    pub async fn list_bots(&self) -> Vec<Bot> {
        self.store.list().await
    }

    pub async fn get_bot(&self, id: &BotId) -> Result<Bot, BotError> {
        self.store.get(id).await.ok_or(BotError::NotFound)
    }

    /// Delete a bot by id. `NotFound` when nothing matched.
    pub async fn delete_bot(&self, id: &BotId) -> Result<(), BotError> {
        let removed = self
            .store
            .delete(id)
            .await
            .map_err(|e| BotError::Storage(e.to_string()))?;

        if removed == 0 {
            return Err(BotError::NotFound);
        }

        info!(bot_id = %id, removed, "deleted bot");
        Ok(())
    }

    /// Share link for one of the user's bots.
    pub async fn share_link(&self, id: &BotId) -> Result<String, BotError> {
        let bot = self.get_bot(id).await?;
        Ok(link::share_link_for(&self.share_base_url, &bot))
    }
}
