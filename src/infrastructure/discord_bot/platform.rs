use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serenity::all::{
    Cache, ChannelId, CreateEmbed, CreateEmbedFooter, CreateMessage, Guild, GuildId, Member,
    PremiumTier, RoleId, Timestamp, UserId,
};
use serenity::http::Http;
use std::sync::Arc;

use crate::domain::entities::snapshot::{GuildSnapshot, MemberSnapshot, RoleInfo};
use crate::domain::platform::{Announcement, MessageSender, PlatformError, RoleMutator};
use crate::domain::value_objects::role_rank::RoleRank;

const AUDIT_REASON: &str = "Server boost reward";

/// Serenity-backed implementation of the platform capabilities.
#[derive(Clone)]
pub struct SerenityPlatform {
    http: Arc<Http>,
}

impl SerenityPlatform {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl RoleMutator for SerenityPlatform {
    async fn add_role(
        &self,
        guild_id: u64,
        user_id: u64,
        role_id: u64,
    ) -> Result<(), PlatformError> {
        self.http
            .add_member_role(
                GuildId::new(guild_id),
                UserId::new(user_id),
                RoleId::new(role_id),
                Some(AUDIT_REASON),
            )
            .await
            .map_err(|e| PlatformError::RoleMutation(e.to_string()))
    }

    async fn remove_role(
        &self,
        guild_id: u64,
        user_id: u64,
        role_id: u64,
    ) -> Result<(), PlatformError> {
        self.http
            .remove_member_role(
                GuildId::new(guild_id),
                UserId::new(user_id),
                RoleId::new(role_id),
                Some(AUDIT_REASON),
            )
            .await
            .map_err(|e| PlatformError::RoleMutation(e.to_string()))
    }
}

#[async_trait]
impl MessageSender for SerenityPlatform {
    async fn send_message(
        &self,
        channel_id: u64,
        announcement: &Announcement,
    ) -> Result<(), PlatformError> {
        let msg = CreateMessage::new().embed(to_embed(announcement));

        ChannelId::new(channel_id)
            .send_message(&self.http, msg)
            .await
            .map_err(|e| {
                PlatformError::Delivery(format!("channel {}: {}", channel_id, e))
            })?;
        Ok(())
    }

    async fn send_direct_message(
        &self,
        user_id: u64,
        announcement: &Announcement,
    ) -> Result<(), PlatformError> {
        let user_id = UserId::new(user_id);

        let dm_channel = user_id
            .create_dm_channel(&self.http)
            .await
            .map_err(|e| PlatformError::Delivery(format!("DM channel for {}: {}", user_id, e)))?;

        let msg = CreateMessage::new().embed(to_embed(announcement));
        dm_channel
            .send_message(&self.http, msg)
            .await
            .map_err(|e| PlatformError::Delivery(format!("DM to {}: {}", user_id, e)))?;
        Ok(())
    }
}

pub fn to_embed(announcement: &Announcement) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title(&announcement.title)
        .description(&announcement.description)
        .colour(announcement.colour);

    if let Some(url) = &announcement.thumbnail_url {
        embed = embed.thumbnail(url);
    }
    if let Some(url) = &announcement.image_url {
        embed = embed.image(url);
    }
    for (name, value) in &announcement.fields {
        embed = embed.field(name, value, false);
    }
    if let Some(footer) = &announcement.footer {
        embed = embed.footer(CreateEmbedFooter::new(footer));
    }
    if let Some(ts) = announcement
        .timestamp
        .and_then(|t| Timestamp::from_unix_timestamp(t.timestamp()).ok())
    {
        embed = embed.timestamp(ts);
    }

    embed
}

fn to_utc(ts: Timestamp) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts.unix_timestamp(), 0)
}

pub fn member_snapshot(member: &Member) -> MemberSnapshot {
    MemberSnapshot {
        user_id: member.user.id.get(),
        name: member.display_name().to_string(),
        avatar_url: Some(member.face()),
        premium_since: member.premium_since.and_then(to_utc),
        role_ids: member.roles.iter().map(|id| id.get()).collect(),
    }
}

/// Build a detached snapshot from the cache. `None` when the guild is not cached.
pub fn guild_snapshot(cache: &Cache, guild_id: GuildId) -> Option<GuildSnapshot> {
    let bot_id = cache.current_user().id;
    let guild = cache.guild(guild_id)?;

    Some(GuildSnapshot {
        id: guild.id.get(),
        name: guild.name.clone(),
        roles: guild
            .roles
            .values()
            .map(|role| {
                let info = RoleInfo::new(role.id.get(), role.name.clone(), role.position);
                (info.id, info)
            })
            .collect(),
        bot_top_role: top_role_rank(&guild, bot_id),
        banner_url: banner_url(&guild),
        premium_tier: match guild.premium_tier {
            PremiumTier::Tier1 => 1,
            PremiumTier::Tier2 => 2,
            PremiumTier::Tier3 => 3,
            _ => 0,
        },
        premium_subscription_count: guild.premium_subscription_count.unwrap_or(0),
    })
}

/// Highest rank among the member's roles; `None` when the member is not cached.
pub fn top_role_rank(guild: &Guild, user_id: UserId) -> Option<RoleRank> {
    let held = guild.members.get(&user_id).map(|member| {
        member
            .roles
            .iter()
            .filter_map(|id| guild.roles.get(id))
            .map(|role| RoleRank::new(role.position, role.id.get()))
    });

    RoleRank::highest_held(guild.id.get(), held)
}

fn banner_url(guild: &Guild) -> Option<String> {
    guild.banner.as_ref().map(|hash| {
        let ext = if hash.starts_with("a_") { "gif" } else { "png" };
        format!(
            "https://cdn.discordapp.com/banners/{}/{}.{}?size=1024",
            guild.id, hash, ext
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embed_is_built_from_announcement() {
        let announcement = Announcement {
            title: "t".into(),
            description: "d".into(),
            colour: 0xf47fff,
            thumbnail_url: Some("https://cdn.example/a.png".into()),
            image_url: None,
            fields: vec![("f".into(), "v".into())],
            footer: Some("foot".into()),
            timestamp: Some(Utc::now()),
        };

        let json = serde_json::to_value(to_embed(&announcement)).unwrap();
        assert_eq!(json["title"], "t");
        assert_eq!(json["color"], 0xf47fff);
        assert_eq!(json["fields"][0]["name"], "f");
        assert_eq!(json["footer"]["text"], "foot");
        assert_eq!(json["thumbnail"]["url"], "https://cdn.example/a.png");
    }
}
