use crate::domain::entities::boost::BoostTransition;
use crate::domain::entities::role_delta::{RoleDelta, RoleMutationFailure};
use crate::domain::entities::snapshot::{GuildSnapshot, MemberSnapshot};
use crate::domain::platform::RoleMutator;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Applies the reward-role set for a boost edge.
///
/// Roles that no longer exist on the guild are skipped. A rejected mutation is
/// recorded and the remaining roles are still attempted; nothing is retried.
#[derive(Clone)]
pub struct RoleReconciler {
    roles: Arc<dyn RoleMutator>,
}

impl RoleReconciler {
    pub fn new(roles: Arc<dyn RoleMutator>) -> Self {
        Self { roles }
    }

    pub async fn reconcile(
        &self,
        transition: BoostTransition,
        guild: &GuildSnapshot,
        member: &MemberSnapshot,
        reward_role_ids: &[u64],
    ) -> RoleDelta {
        match transition {
            BoostTransition::BoostStarted => self.grant(guild, member, reward_role_ids).await,
            BoostTransition::BoostEnded => self.revoke(guild, member, reward_role_ids).await,
            BoostTransition::NoChange => RoleDelta::default(),
        }
    }

    async fn grant(
        &self,
        guild: &GuildSnapshot,
        member: &MemberSnapshot,
        reward_role_ids: &[u64],
    ) -> RoleDelta {
        let mut delta = RoleDelta::default();

        for &role_id in reward_role_ids {
            if guild.role(role_id).is_none() {
                debug!(guild_id = guild.id, role_id, "Reward role no longer exists");
                continue;
            }

            match self.roles.add_role(guild.id, member.user_id, role_id).await {
                Ok(()) => delta.granted.push(role_id),
                Err(e) => {
                    warn!(
                        guild_id = guild.id,
                        user_id = member.user_id,
                        role_id,
                        "Failed to grant reward role: {}",
                        e
                    );
                    delta.attempted_but_failed.push(RoleMutationFailure {
                        role_id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            guild_id = guild.id,
            user_id = member.user_id,
            granted = ?delta.granted,
            failed = delta.attempted_but_failed.len(),
            "Boost rewards granted"
        );
        delta
    }

    async fn revoke(
        &self,
        guild: &GuildSnapshot,
        member: &MemberSnapshot,
        reward_role_ids: &[u64],
    ) -> RoleDelta {
        let mut delta = RoleDelta::default();

        for &role_id in reward_role_ids {
            if guild.role(role_id).is_none() || !member.holds_role(role_id) {
                continue;
            }

            match self
                .roles
                .remove_role(guild.id, member.user_id, role_id)
                .await
            {
                Ok(()) => delta.revoked.push(role_id),
                Err(e) => {
                    warn!(
                        guild_id = guild.id,
                        user_id = member.user_id,
                        role_id,
                        "Failed to revoke reward role: {}",
                        e
                    );
                    delta.attempted_but_failed.push(RoleMutationFailure {
                        role_id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            guild_id = guild.id,
            user_id = member.user_id,
            revoked = ?delta.revoked,
            failed = delta.attempted_but_failed.len(),
            "Boost rewards revoked"
        );
        delta
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domain::entities::snapshot::{GuildSnapshot, MemberSnapshot, RoleInfo};
    use crate::domain::platform::{PlatformError, RoleMutator};
    use crate::domain::value_objects::role_rank::RoleRank;
    use async_trait::async_trait;
    use std::collections::{BTreeSet, HashMap, HashSet};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Role store standing in for the platform; rejects mutations of `failing` roles.
    #[derive(Default)]
    pub struct FakeRoles {
        pub held: Mutex<BTreeSet<u64>>,
        pub failing: HashSet<u64>,
        pub calls: Mutex<Vec<(&'static str, u64)>>,
        pub add_delay: Option<Duration>,
    }

    impl FakeRoles {
        pub fn holding(role_ids: &[u64]) -> Self {
            Self {
                held: Mutex::new(role_ids.iter().copied().collect()),
                ..Self::default()
            }
        }

        pub fn failing_on(mut self, role_id: u64) -> Self {
            self.failing.insert(role_id);
            self
        }

        /// Slow down every grant, like a lagging API call.
        pub fn with_add_delay(mut self, delay: Duration) -> Self {
            self.add_delay = Some(delay);
            self
        }

        pub fn held(&self) -> Vec<u64> {
            self.held.lock().unwrap().iter().copied().collect()
        }

        pub fn calls(&self) -> Vec<(&'static str, u64)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RoleMutator for FakeRoles {
        async fn add_role(&self, _: u64, _: u64, role_id: u64) -> Result<(), PlatformError> {
            if let Some(delay) = self.add_delay {
                tokio::time::sleep(delay).await;
            }
            self.calls.lock().unwrap().push(("add", role_id));
            if self.failing.contains(&role_id) {
                return Err(PlatformError::RoleMutation("Missing Permissions".into()));
            }
            self.held.lock().unwrap().insert(role_id);
            Ok(())
        }

        async fn remove_role(&self, _: u64, _: u64, role_id: u64) -> Result<(), PlatformError> {
            self.calls.lock().unwrap().push(("remove", role_id));
            if self.failing.contains(&role_id) {
                return Err(PlatformError::RoleMutation("Missing Permissions".into()));
            }
            self.held.lock().unwrap().remove(&role_id);
            Ok(())
        }
    }

    pub fn guild_with_roles(role_ids: &[u64]) -> GuildSnapshot {
        let roles: HashMap<u64, RoleInfo> = role_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, RoleInfo::new(*id, format!("role-{}", id), i as u16 + 1)))
            .collect();

        GuildSnapshot {
            id: 1,
            name: "Test Guild".into(),
            roles,
            bot_top_role: Some(RoleRank::new(100, 999)),
            banner_url: None,
            premium_tier: 1,
            premium_subscription_count: 2,
        }
    }

    pub fn member(role_ids: &[u64]) -> MemberSnapshot {
        MemberSnapshot {
            user_id: 55,
            name: "ana".into(),
            avatar_url: Some("https://cdn.example/avatar.png".into()),
            premium_since: None,
            role_ids: role_ids.to_vec(),
        }
    }
}
