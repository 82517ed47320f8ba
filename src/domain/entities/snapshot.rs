use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::domain::value_objects::role_rank::RoleRank;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleInfo {
    pub id: u64,
    pub name: String,
    pub position: u16,
}

impl RoleInfo {
    pub fn new(id: u64, name: impl Into<String>, position: u16) -> Self {
        Self {
            id,
            name: name.into(),
            position,
        }
    }

    pub fn rank(&self) -> RoleRank {
        RoleRank::new(self.position, self.id)
    }
}

/// Point-in-time view of a guild member, detached from the platform client.
#[derive(Debug, Clone)]
pub struct MemberSnapshot {
    pub user_id: u64,
    pub name: String,
    pub avatar_url: Option<String>,
    pub premium_since: Option<DateTime<Utc>>,
    pub role_ids: Vec<u64>,
}

impl MemberSnapshot {
    pub fn mention(&self) -> String {
        format!("<@{}>", self.user_id)
    }

    pub fn holds_role(&self, role_id: u64) -> bool {
        self.role_ids.contains(&role_id)
    }
}

/// Point-in-time view of a guild: its live roles plus the cosmetic data the
/// announcements need.
#[derive(Debug, Clone)]
pub struct GuildSnapshot {
    pub id: u64,
    pub name: String,
    pub roles: HashMap<u64, RoleInfo>,
    /// Highest role held by the bot itself, `None` while its member is not cached.
    pub bot_top_role: Option<RoleRank>,
    pub banner_url: Option<String>,
    pub premium_tier: u8,
    pub premium_subscription_count: u64,
}

impl GuildSnapshot {
    pub fn role(&self, role_id: u64) -> Option<&RoleInfo> {
        self.roles.get(&role_id)
    }

    pub fn role_names(&self, role_ids: &[u64]) -> Vec<String> {
        role_ids
            .iter()
            .filter_map(|id| self.role(*id).map(|role| role.name.clone()))
            .collect()
    }
}
