use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Failure reported by the chat platform for a single call.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlatformError {
    #[error("role mutation rejected: {0}")]
    RoleMutation(String),
    #[error("message delivery failed: {0}")]
    Delivery(String),
}

/// Role grant/revoke capability of the platform session.
#[async_trait]
pub trait RoleMutator: Send + Sync {
    async fn add_role(&self, guild_id: u64, user_id: u64, role_id: u64)
    -> Result<(), PlatformError>;

    async fn remove_role(
        &self,
        guild_id: u64,
        user_id: u64,
        role_id: u64,
    ) -> Result<(), PlatformError>;
}

/// Rendered message, independent of the platform's embed builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Announcement {
    pub title: String,
    pub description: String,
    pub colour: u32,
    pub thumbnail_url: Option<String>,
    pub image_url: Option<String>,
    pub fields: Vec<(String, String)>,
    pub footer: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_message(
        &self,
        channel_id: u64,
        announcement: &Announcement,
    ) -> Result<(), PlatformError>;

    async fn send_direct_message(
        &self,
        user_id: u64,
        announcement: &Announcement,
    ) -> Result<(), PlatformError>;
}
