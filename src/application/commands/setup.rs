use crate::application::commands::utils::{
    defer_ephemeral, edit_reply, get_channel_option, has_admin_permission,
};
use crate::application::services::config_service::ConfigService;
use serenity::all::{
    ChannelId, ChannelType, CommandInteraction, CommandOptionType, CreateCommand,
    CreateCommandOption, GuildId, Permissions,
};
use serenity::prelude::*;
use std::sync::Arc;

/// Register the /setup command
pub fn register_setup_command() -> CreateCommand {
    CreateCommand::new("setup")
        .description("Set the channel for boost announcements (Admin only)")
        .default_member_permissions(Permissions::ADMINISTRATOR)
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::Channel,
                "channel",
                "Text channel that receives boost announcements",
            )
            .channel_types(vec![ChannelType::Text, ChannelType::News])
            .required(true),
        )
}

/// `None` when the cache cannot answer (guild, channel or bot member missing).
fn bot_can_send_in(ctx: &Context, guild_id: GuildId, channel_id: ChannelId) -> Option<bool> {
    let bot_id = ctx.cache.current_user().id;
    let guild = ctx.cache.guild(guild_id)?;
    let channel = guild.channels.get(&channel_id)?;
    let bot_member = guild.members.get(&bot_id)?;

    Some(
        guild
            .user_permissions_in(channel, bot_member)
            .send_messages(),
    )
}

pub async fn run_setup(ctx: &Context, command: &CommandInteraction, config_service: &Arc<ConfigService>) {
    if !defer_ephemeral(ctx, command).await {
        return;
    }

    if !has_admin_permission(command) {
        edit_reply(ctx, command, "❌ You need **administrator** permissions to use this command").await;
        return;
    }

    let guild_id = match config_service
        .validate_guild_context(command.guild_id.map(|gid| gid.get()))
        .await
    {
        Ok(gid) => gid,
        Err(error) => {
            edit_reply(ctx, command, format!("❌ {}", error)).await;
            return;
        }
    };

    let Some(channel_id) = get_channel_option(&command.data.options, "channel") else {
        edit_reply(ctx, command, "❌ Select a valid channel").await;
        return;
    };

    if bot_can_send_in(ctx, GuildId::new(guild_id), channel_id) == Some(false) {
        edit_reply(
            ctx,
            command,
            format!("❌ I don't have permission to send messages in <#{}>", channel_id),
        )
        .await;
        return;
    }

    match config_service
        .set_notification_channel(guild_id, channel_id.get())
        .await
    {
        Ok(()) => {
            edit_reply(
                ctx,
                command,
                format!("✅ Boost announcements will be sent in <#{}>", channel_id),
            )
            .await;
        }
        Err(error) => {
            edit_reply(ctx, command, format!("❌ Failed to set the channel: {}", error)).await;
        }
    }
}
