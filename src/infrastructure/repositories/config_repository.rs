use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::domain::entities::guild_config::{GuildConfig, GuildConfigPatch};
use crate::domain::repositories::config_repository::{
    GuildConfigMap, GuildConfigRepository, RepositoryError,
};

/// In-memory implementation of GuildConfigRepository.
/// Useful for testing or for running without a writable disk.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct InMemoryGuildConfigRepository {
    guilds: Arc<RwLock<GuildConfigMap>>,
}

#[allow(dead_code)]
impl InMemoryGuildConfigRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_guild(guild_id: u64, config: GuildConfig) -> Self {
        let repo = Self::new();
        if let Ok(mut map) = repo.guilds.write() {
            map.insert(guild_id, config);
        }
        repo
    }
}

#[async_trait]
impl GuildConfigRepository for InMemoryGuildConfigRepository {
    async fn load(&self) -> GuildConfigMap {
        self.guilds
            .read()
            .map(|map| map.clone())
            .unwrap_or_default()
    }

    async fn update_guild_config(
        &self,
        guild_id: u64,
        patch: GuildConfigPatch,
    ) -> Result<GuildConfig, RepositoryError> {
        let mut map = self
            .guilds
            .write()
            .map_err(|_| std::io::Error::other("config map lock poisoned"))?;
        let entry = map.entry(guild_id).or_default();
        entry.apply(patch);
        Ok(entry.clone())
    }
}
