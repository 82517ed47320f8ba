use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::domain::entities::guild_config::{GuildConfig, GuildConfigPatch};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type GuildConfigMap = BTreeMap<u64, GuildConfig>;

#[async_trait]
pub trait GuildConfigRepository: Send + Sync {
    /// Read the whole store. Missing or unreadable storage yields an empty map.
    async fn load(&self) -> GuildConfigMap;

    /// Entry for `guild_id`, or a zero-value config when there is none
    async fn get_guild_config(&self, guild_id: u64) -> GuildConfig {
        self.load().await.remove(&guild_id).unwrap_or_default()
    }

    /// Merge `patch` into the guild's entry and persist the whole store.
    async fn update_guild_config(
        &self,
        guild_id: u64,
        patch: GuildConfigPatch,
    ) -> Result<GuildConfig, RepositoryError>;
}
