use std::cmp::{Ordering, Reverse};

/// Position of a role in a guild's hierarchy.
///
/// Higher positions rank higher; on equal positions the older role (lower id)
/// ranks higher, matching how Discord breaks ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleRank {
    pub position: u16,
    pub role_id: u64,
}

impl RoleRank {
    pub fn new(position: u16, role_id: u64) -> Self {
        Self { position, role_id }
    }

    /// Rank of the implicit `@everyone` role, whose id equals the guild id.
    pub fn everyone(guild_id: u64) -> Self {
        Self::new(0, guild_id)
    }

    /// Top rank among a member's roles.
    ///
    /// `None` when the member's roles are unknown; a member known to hold no
    /// roles ranks at `@everyone`.
    pub fn highest_held<I>(guild_id: u64, held: Option<I>) -> Option<Self>
    where
        I: IntoIterator<Item = RoleRank>,
    {
        let everyone = Self::everyone(guild_id);
        held.map(|ranks| ranks.into_iter().max().unwrap_or(everyone))
    }

    fn key(&self) -> (u16, Reverse<u64>) {
        (self.position, Reverse(self.role_id))
    }
}

impl Ord for RoleRank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl PartialOrd for RoleRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn higher_position_ranks_higher() {
        assert!(RoleRank::new(3, 100) > RoleRank::new(2, 1));
    }

    #[test]
    fn equal_position_older_role_ranks_higher() {
        assert!(RoleRank::new(2, 10) > RoleRank::new(2, 20));
        assert_eq!(RoleRank::new(2, 10), RoleRank::new(2, 10));
    }

    #[test]
    fn highest_held_picks_the_top_role() {
        let ranks = vec![RoleRank::new(2, 20), RoleRank::new(7, 70), RoleRank::new(4, 40)];
        assert_eq!(RoleRank::highest_held(1, Some(ranks)), Some(RoleRank::new(7, 70)));
    }

    #[test]
    fn highest_held_without_roles_is_everyone() {
        assert_eq!(
            RoleRank::highest_held(1, Some(Vec::new())),
            Some(RoleRank::everyone(1))
        );
    }

    #[test]
    fn highest_held_is_unknown_for_unknown_member() {
        assert_eq!(RoleRank::highest_held(1, None::<Vec<RoleRank>>), None);
    }

    #[test]
    fn everyone_is_bottom() {
        assert!(RoleRank::everyone(999) < RoleRank::new(1, 5000));
    }
}
