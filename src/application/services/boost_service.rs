use crate::application::services::notification_service::NotificationService;
use crate::application::services::role_reconciler::RoleReconciler;
use crate::domain::entities::boost::BoostTransition;
use crate::domain::entities::role_delta::BoostOutcome;
use crate::domain::entities::snapshot::{GuildSnapshot, MemberSnapshot};
use crate::domain::repositories::config_repository::GuildConfigRepository;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::Mutex;
use tracing::{debug, info};

type MemberKey = (u64, u64);

/// Operator-triggered stand-in for a real boost edge (`/test`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatedBoost {
    BoostStarted,
    BoostEnded,
}

impl SimulatedBoost {
    pub fn from_choice(value: &str) -> Option<Self> {
        match value {
            "boost" => Some(SimulatedBoost::BoostStarted),
            "unboost" => Some(SimulatedBoost::BoostEnded),
            _ => None,
        }
    }

    fn transition(self) -> BoostTransition {
        match self {
            SimulatedBoost::BoostStarted => BoostTransition::BoostStarted,
            SimulatedBoost::BoostEnded => BoostTransition::BoostEnded,
        }
    }
}

/// Member-update pipeline: detect the edge, reconcile roles, notify.
///
/// Events for the same `(guild, member)` run one at a time in arrival order;
/// different members proceed concurrently.
#[derive(Clone)]
pub struct BoostService {
    config_repo: Arc<dyn GuildConfigRepository>,
    reconciler: RoleReconciler,
    notifier: NotificationService,
    member_locks: Arc<StdMutex<HashMap<MemberKey, Arc<Mutex<()>>>>>,
}

impl BoostService {
    pub fn new(
        config_repo: Arc<dyn GuildConfigRepository>,
        reconciler: RoleReconciler,
        notifier: NotificationService,
    ) -> Self {
        Self {
            config_repo,
            reconciler,
            notifier,
            member_locks: Arc::new(StdMutex::new(HashMap::new())),
        }
    }

    pub async fn handle_member_update(
        &self,
        guild: GuildSnapshot,
        before: &MemberSnapshot,
        after: MemberSnapshot,
    ) -> Option<BoostOutcome> {
        let transition = BoostTransition::between(before, &after);
        if transition == BoostTransition::NoChange {
            debug!(guild_id = guild.id, user_id = after.user_id, "Member update without boost edge");
            return None;
        }

        info!(
            guild_id = guild.id,
            user_id = after.user_id,
            ?transition,
            "Boost state changed"
        );
        Some(self.process(transition, guild, after).await)
    }

    pub async fn simulate(
        &self,
        guild: GuildSnapshot,
        member: MemberSnapshot,
        kind: SimulatedBoost,
    ) -> BoostOutcome {
        info!(guild_id = guild.id, user_id = member.user_id, ?kind, "Simulating boost event");
        self.process(kind.transition(), guild, member).await
    }

    fn member_lock(&self, key: MemberKey) -> Arc<Mutex<()>> {
        let mut locks = self
            .member_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks.entry(key).or_default().clone()
    }

    /// Forget the member's lock once nobody else holds or waits on it.
    fn release_member_lock(&self, key: MemberKey) {
        let mut locks = self
            .member_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if locks
            .get(&key)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&key);
        }
    }

    async fn process(
        &self,
        transition: BoostTransition,
        guild: GuildSnapshot,
        member: MemberSnapshot,
    ) -> BoostOutcome {
        let key = (guild.id, member.user_id);
        let lock = self.member_lock(key);

        let outcome = {
            let _guard = lock.lock().await;
            self.process_in_order(transition, guild, member).await
        };

        drop(lock);
        self.release_member_lock(key);
        outcome
    }

    async fn process_in_order(
        &self,
        transition: BoostTransition,
        guild: GuildSnapshot,
        member: MemberSnapshot,
    ) -> BoostOutcome {
        let config = self.config_repo.get_guild_config(guild.id).await;

        let delta = self
            .reconciler
            .reconcile(transition, &guild, &member, &config.role_ids)
            .await;

        let outcome = BoostOutcome {
            transition,
            member,
            guild,
            delta,
        };
        self.notifier.notify(&outcome, config.channel_id).await;
        outcome
    }
}
