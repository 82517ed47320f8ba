use crate::domain::entities::boost::BoostTransition;
use crate::domain::entities::role_delta::BoostOutcome;
use crate::domain::platform::{Announcement, MessageSender};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, warn};

const BOOST_COLOUR: u32 = 0xf47fff;
const UNBOOST_COLOUR: u32 = 0xff4d4d;

/// Renders boost outcomes and delivers them. Delivery failures are logged and
/// dropped; role changes have already happened by the time this runs.
#[derive(Clone)]
pub struct NotificationService {
    sender: Arc<dyn MessageSender>,
}

impl NotificationService {
    pub fn new(sender: Arc<dyn MessageSender>) -> Self {
        Self { sender }
    }

    pub async fn notify(&self, outcome: &BoostOutcome, channel_id: Option<u64>) {
        match outcome.transition {
            BoostTransition::BoostStarted => {
                if let Some(channel_id) = channel_id {
                    self.send_channel(channel_id, &Self::boost_announcement(outcome))
                        .await;
                }
                self.send_dm(outcome.member.user_id, &Self::boost_thanks_dm(outcome))
                    .await;
            }
            BoostTransition::BoostEnded => {
                if let Some(channel_id) = channel_id {
                    self.send_channel(channel_id, &Self::unboost_notice(outcome))
                        .await;
                }
            }
            BoostTransition::NoChange => {}
        }
    }

    async fn send_channel(&self, channel_id: u64, announcement: &Announcement) {
        match self.sender.send_message(channel_id, announcement).await {
            Ok(()) => debug!(channel_id, "Boost announcement sent"),
            Err(e) => warn!(channel_id, "Failed to send boost announcement: {}", e),
        }
    }

    async fn send_dm(&self, user_id: u64, announcement: &Announcement) {
        if let Err(e) = self.sender.send_direct_message(user_id, announcement).await {
            warn!(user_id, "Failed to DM booster: {}", e);
        }
    }

    pub fn boost_announcement(outcome: &BoostOutcome) -> Announcement {
        let guild = &outcome.guild;
        let mut fields = Vec::new();

        let granted = guild.role_names(&outcome.delta.granted);
        if !granted.is_empty() {
            let lines: Vec<String> = granted.iter().map(|name| format!("✅ {}", name)).collect();
            fields.push(("🎁 Roles received".to_string(), lines.join("\n")));
        }

        Announcement {
            title: format!("🚀 {} has been boosted!", guild.name),
            description: format!(
                "Thank you **{}** for boosting our server! 💖",
                outcome.member.mention()
            ),
            colour: BOOST_COLOUR,
            thumbnail_url: outcome.member.avatar_url.clone(),
            image_url: guild.banner_url.clone(),
            fields,
            footer: Some(format!(
                "Level: {} • Boosts: {}",
                guild.premium_tier, guild.premium_subscription_count
            )),
            timestamp: Some(Utc::now()),
        }
    }

    pub fn boost_thanks_dm(outcome: &BoostOutcome) -> Announcement {
        Announcement {
            title: format!("Thanks for boosting {}! 🚀", outcome.guild.name),
            description: "Your special roles have been granted.".to_string(),
            colour: BOOST_COLOUR,
            ..Announcement::default()
        }
    }

    pub fn unboost_notice(outcome: &BoostOutcome) -> Announcement {
        let guild = &outcome.guild;

        let revoked = guild.role_names(&outcome.delta.revoked);
        let field = if revoked.is_empty() {
            ("♻️ Role status".to_string(), "No roles to take back".to_string())
        } else {
            let lines: Vec<String> = revoked.iter().map(|name| format!("❌ {}", name)).collect();
            ("♻️ Roles taken back".to_string(), lines.join("\n"))
        };

        Announcement {
            title: format!("🔴 {} removed their server boost", outcome.member.name),
            description: format!(
                "What a pity... **{}** has removed their boost 😢",
                outcome.member.mention()
            ),
            colour: UNBOOST_COLOUR,
            thumbnail_url: outcome.member.avatar_url.clone(),
            image_url: guild.banner_url.clone(),
            fields: vec![field],
            footer: Some(format!(
                "Level: {} • Remaining: {}",
                guild.premium_tier, guild.premium_subscription_count
            )),
            timestamp: Some(Utc::now()),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domain::platform::{Announcement, MessageSender, PlatformError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Sent {
        Channel(u64, Announcement),
        Direct(u64, Announcement),
    }

    #[derive(Default)]
    pub struct RecordingSender {
        pub sent: Mutex<Vec<Sent>>,
        pub fail_dm: bool,
        pub fail_channel: bool,
    }

    impl RecordingSender {
        pub fn sent(&self) -> Vec<Sent> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MessageSender for RecordingSender {
        async fn send_message(
            &self,
            channel_id: u64,
            announcement: &Announcement,
        ) -> Result<(), PlatformError> {
            if self.fail_channel {
                return Err(PlatformError::Delivery("Unknown Channel".into()));
            }
            self.sent
                .lock()
                .unwrap()
                .push(Sent::Channel(channel_id, announcement.clone()));
            Ok(())
        }

        async fn send_direct_message(
            &self,
            user_id: u64,
            announcement: &Announcement,
        ) -> Result<(), PlatformError> {
            if self.fail_dm {
                return Err(PlatformError::Delivery("Cannot send messages to this user".into()));
            }
            self.sent
                .lock()
                .unwrap()
                .push(Sent::Direct(user_id, announcement.clone()));
            Ok(())
        }
    }
}
