use crate::domain::entities::boost::BoostTransition;
use crate::domain::entities::snapshot::{GuildSnapshot, MemberSnapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleMutationFailure {
    pub role_id: u64,
    pub reason: String,
}

/// Role mutations actually applied for one transition, in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleDelta {
    pub granted: Vec<u64>,
    pub revoked: Vec<u64>,
    pub attempted_but_failed: Vec<RoleMutationFailure>,
}

impl RoleDelta {
    pub fn failed_role_ids(&self) -> Vec<u64> {
        self.attempted_but_failed.iter().map(|f| f.role_id).collect()
    }
}

/// Everything the notifier needs once reconciliation is done.
#[derive(Debug, Clone)]
pub struct BoostOutcome {
    pub transition: BoostTransition,
    pub member: MemberSnapshot,
    pub guild: GuildSnapshot,
    pub delta: RoleDelta,
}
