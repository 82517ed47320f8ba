use serde::{Deserialize, Serialize};

/// Per-guild settings as persisted in the config store.
///
/// Role ids may point to roles that no longer exist on the guild; consumers
/// resolve them against the live role set and skip the missing ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<u64>,
    #[serde(default)]
    pub role_ids: Vec<u64>,
}

/// Fields to overwrite on an existing entry. `None` leaves the field untouched,
/// `Some` replaces it wholesale (role lists are never appended to).
#[derive(Debug, Clone, Default)]
pub struct GuildConfigPatch {
    pub channel_id: Option<u64>,
    pub role_ids: Option<Vec<u64>>,
}

impl GuildConfigPatch {
    pub fn channel(channel_id: u64) -> Self {
        Self {
            channel_id: Some(channel_id),
            role_ids: None,
        }
    }

    pub fn roles(role_ids: Vec<u64>) -> Self {
        Self {
            channel_id: None,
            role_ids: Some(role_ids),
        }
    }
}

impl GuildConfig {
    pub fn apply(&mut self, patch: GuildConfigPatch) {
        if let Some(channel_id) = patch.channel_id {
            self.channel_id = Some(channel_id);
        }
        if let Some(role_ids) = patch.role_ids {
            self.role_ids = dedup_preserving_order(role_ids);
        }
    }
}

fn dedup_preserving_order(ids: Vec<u64>) -> Vec<u64> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}
