use crate::domain::entities::guild_config::GuildConfigPatch;
use crate::domain::entities::snapshot::RoleInfo;
use crate::domain::repositories::config_repository::{GuildConfigRepository, RepositoryError};
use crate::domain::value_objects::role_rank::RoleRank;
use std::sync::Arc;
use tracing::{info, warn};

/// Slots offered by `/add_role`.
pub const MAX_REWARD_ROLES: usize = 4;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Role <@&{role_id}> is not below the bot's highest role")]
    HierarchyViolation { role_id: u64 },
    #[error("{0}")]
    InvalidInput(String),
    #[error("Failed to save configuration: {0}")]
    Storage(#[from] RepositoryError),
}

#[derive(Clone)]
pub struct ConfigService {
    config_repo: Arc<dyn GuildConfigRepository>,
}

impl ConfigService {
    pub fn new(config_repo: Arc<dyn GuildConfigRepository>) -> Self {
        Self { config_repo }
    }

    pub async fn set_notification_channel(
        &self,
        guild_id: u64,
        channel_id: u64,
    ) -> Result<(), ConfigError> {
        if guild_id == 0 {
            return Err(ConfigError::InvalidInput("Invalid guild ID".to_string()));
        }

        if channel_id == 0 {
            return Err(ConfigError::InvalidInput("Invalid channel ID".to_string()));
        }

        self.config_repo
            .update_guild_config(guild_id, GuildConfigPatch::channel(channel_id))
            .await?;
        info!(guild_id, channel_id, "Notification channel set");
        Ok(())
    }

    /// Replace the guild's reward roles.
    ///
    /// Empty slots are dropped first; then every remaining role must rank
    /// strictly below `bot_top_role` or nothing is saved.
    pub async fn set_reward_roles(
        &self,
        guild_id: u64,
        bot_top_role: RoleRank,
        candidates: Vec<Option<RoleInfo>>,
    ) -> Result<Vec<u64>, ConfigError> {
        if candidates.len() > MAX_REWARD_ROLES {
            return Err(ConfigError::InvalidInput(format!(
                "At most {} roles can be configured at once",
                MAX_REWARD_ROLES
            )));
        }

        let roles: Vec<RoleInfo> = candidates.into_iter().flatten().collect();
        if roles.is_empty() {
            return Err(ConfigError::InvalidInput(
                "Select at least one role".to_string(),
            ));
        }

        if let Some(role) = roles.iter().find(|role| role.rank() >= bot_top_role) {
            warn!(
                guild_id,
                role_id = role.id,
                "Rejected reward role at or above the bot's highest role"
            );
            return Err(ConfigError::HierarchyViolation { role_id: role.id });
        }

        let role_ids: Vec<u64> = roles.iter().map(|role| role.id).collect();
        let saved = self
            .config_repo
            .update_guild_config(guild_id, GuildConfigPatch::roles(role_ids))
            .await?;
        info!(guild_id, roles = ?saved.role_ids, "Reward roles set");
        Ok(saved.role_ids)
    }

    pub async fn list_reward_roles(&self, guild_id: u64) -> Vec<u64> {
        self.config_repo.get_guild_config(guild_id).await.role_ids
    }

    pub async fn get_notification_channel(&self, guild_id: u64) -> Option<u64> {
        self.config_repo.get_guild_config(guild_id).await.channel_id
    }

    pub async fn validate_guild_context(&self, guild_id: Option<u64>) -> Result<u64, String> {
        guild_id.ok_or_else(|| "This command can only be used in a server".to_string())
    }
}
