use chrono::{DateTime, Utc};

use crate::domain::entities::snapshot::MemberSnapshot;

/// Edge of a member's boosting state between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoostTransition {
    BoostStarted,
    BoostEnded,
    NoChange,
}

impl BoostTransition {
    /// Only the presence of `premium_since` matters; any other field change,
    /// including a different boost timestamp, is `NoChange`.
    pub fn detect(
        before: Option<DateTime<Utc>>,
        after: Option<DateTime<Utc>>,
    ) -> BoostTransition {
        match (before, after) {
            (None, Some(_)) => BoostTransition::BoostStarted,
            (Some(_), None) => BoostTransition::BoostEnded,
            _ => BoostTransition::NoChange,
        }
    }

    pub fn between(before: &MemberSnapshot, after: &MemberSnapshot) -> BoostTransition {
        Self::detect(before.premium_since, after.premium_since)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64) -> Option<DateTime<Utc>> {
        Some(Utc.timestamp_opt(secs, 0).unwrap())
    }

    #[test]
    fn detects_boost_started() {
        assert_eq!(
            BoostTransition::detect(None, ts(1_700_000_000)),
            BoostTransition::BoostStarted
        );
    }

    #[test]
    fn detects_boost_ended() {
        assert_eq!(
            BoostTransition::detect(ts(1_700_000_000), None),
            BoostTransition::BoostEnded
        );
    }

    #[test]
    fn everything_else_is_no_change() {
        assert_eq!(BoostTransition::detect(None, None), BoostTransition::NoChange);
        assert_eq!(
            BoostTransition::detect(ts(1), ts(1)),
            BoostTransition::NoChange
        );
        assert_eq!(
            BoostTransition::detect(ts(1), ts(2)),
            BoostTransition::NoChange
        );
    }

    #[test]
    fn compares_member_snapshots() {
        let before = MemberSnapshot {
            user_id: 1,
            name: "ana".into(),
            avatar_url: None,
            premium_since: None,
            role_ids: vec![5],
        };
        let after = MemberSnapshot {
            premium_since: ts(42),
            role_ids: vec![5, 6],
            ..before.clone()
        };

        assert_eq!(
            BoostTransition::between(&before, &after),
            BoostTransition::BoostStarted
        );
        assert_eq!(
            BoostTransition::between(&after, &before),
            BoostTransition::BoostEnded
        );
    }
}
