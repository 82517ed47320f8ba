use crate::application::commands::utils::{
    defer_ephemeral, edit_reply, has_admin_permission, role_mentions,
};
use crate::application::services::config_service::ConfigService;
use serenity::all::{CommandInteraction, CreateCommand, Permissions};
use serenity::prelude::*;
use std::sync::Arc;

pub fn register_list_roles_command() -> CreateCommand {
    CreateCommand::new("list_roles")
        .description("Show the boost announcement channel and reward roles (Admin only)")
        .default_member_permissions(Permissions::ADMINISTRATOR)
}

pub async fn run_list_roles(ctx: &Context, command: &CommandInteraction, config_service: &Arc<ConfigService>) {
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

    let channel = config_service
        .get_notification_channel(guild_id)
        .await
        .map(|id| format!("<#{}>", id))
        .unwrap_or_else(|| "_not set_".to_string());
    let role_ids = config_service.list_reward_roles(guild_id).await;
    let roles = if role_ids.is_empty() {
        "_none_".to_string()
    } else {
        role_mentions(&role_ids)
    };

    edit_reply(
        ctx,
        command,
        format!("**Announcement channel:** {}\n**Reward roles:**\n{}", channel, roles),
    )
    .await;
}
