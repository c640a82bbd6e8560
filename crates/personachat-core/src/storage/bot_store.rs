//! The locally owned "my bots" collection.
//!
//! The whole collection lives as one JSON array under a single fixed key of
//! the substrate. There is no deduplication and no concurrency control: a
//! single local user is the only writer.

use tracing::{debug, warn};

use personachat_types::bot::{Bot, BotId};
use personachat_types::error::StoreError;

use super::kv_store::KvStore;

/// Substrate key holding the serialized collection.
pub const MY_BOTS_KEY: &str = "my_created_bots";

/// CRUD over the user's own bots.
pub struct LocalBotStore<K: KvStore> {
    kv: K,
}

impl<K: KvStore> LocalBotStore<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    /// Append a bot to the collection. Does not deduplicate by id.
    ///
    /// A corrupt collection is replaced rather than blocking the save.
    pub async fn save(&self, bot: &Bot) -> Result<(), StoreError> {
        let mut bots = match self.read_collection().await {
            Ok(bots) => bots,
            Err(StoreError::Corrupt(reason)) => {
                warn!(%reason, "stored bots are corrupt, starting a fresh collection");
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        bots.push(bot.clone());
        self.write_collection(&bots).await?;
        debug!(bot_id = %bot.id, count = bots.len(), "saved bot");
        Ok(())
    }

    /// All stored bots in insertion order.
    ///
    /// Fails closed: unreadable or malformed contents yield an empty list.
    pub async fn list(&self) -> Vec<Bot> {
        match self.read_collection().await {
            Ok(bots) => bots,
            Err(e) => {
                warn!(error = %e, "could not load stored bots, treating as empty");
                Vec::new()
            }
        }
    }

    /// First stored bot with the given id.
    pub async fn get(&self, id: &BotId) -> Option<Bot> {
        self.list().await.into_iter().find(|b| &b.id == id)
    }

    /// Remove every bot with the given id. Returns how many were removed;
    /// nothing is written when there was no match. Removing the last bot
    /// drops the key instead of storing an empty array.
    pub async fn delete(&self, id: &BotId) -> Result<usize, StoreError> {
        let bots = self.list().await;
        let before = bots.len();
        let remaining: Vec<Bot> = bots.into_iter().filter(|b| &b.id != id).collect();
        let removed = before - remaining.len();

        if removed == 0 {
            return Ok(0);
        }

        if remaining.is_empty() {
            self.kv
                .delete(MY_BOTS_KEY)
                .await
                .map_err(|e| StoreError::Write(e.to_string()))?;
        } else {
            self.write_collection(&remaining).await?;
        }
        debug!(bot_id = %id, removed, "deleted bot");
        Ok(removed)
    }

    async fn read_collection(&self) -> Result<Vec<Bot>, StoreError> {
        let raw = self
            .kv
            .get(MY_BOTS_KEY)
            .await
            .map_err(|e| StoreError::Read(e.to_string()))?;

        match raw {
            Some(json) => {
                serde_json::from_str(&json).map_err(|e| StoreError::Corrupt(e.to_string()))
            }
            None => Ok(Vec::new()),
        }
    }

    async fn write_collection(&self, bots: &[Bot]) -> Result<(), StoreError> {
        let json = serde_json::to_string(bots).map_err(|e| StoreError::Write(e.to_string()))?;
        self.kv
            .set(MY_BOTS_KEY, &json)
            .await
            .map_err(|e| StoreError::Write(e.to_string()))
    }
}
