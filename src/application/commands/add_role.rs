use crate::application::commands::utils::{
    defer_ephemeral, edit_reply, get_role_option, has_admin_permission, role_mentions,
};
use crate::application::services::config_service::{ConfigError, ConfigService, MAX_REWARD_ROLES};
use crate::domain::entities::snapshot::RoleInfo;
use crate::infrastructure::discord_bot::platform::guild_snapshot;
use serenity::all::{
    CommandInteraction, CommandOptionType, CreateCommand, CreateCommandOption, GuildId,
    Permissions,
};
use serenity::prelude::*;
use std::sync::Arc;
use tracing::error;

const ROLE_OPTIONS: [&str; MAX_REWARD_ROLES] = ["role1", "role2", "role3", "role4"];

fn register_roles_command(name: &str, description: &str) -> CreateCommand {
    let mut cmd = CreateCommand::new(name)
        .description(description)
        .default_member_permissions(Permissions::ADMINISTRATOR);

    for (i, option) in ROLE_OPTIONS.iter().enumerate() {
        cmd = cmd.add_option(
            CreateCommandOption::new(
                CommandOptionType::Role,
                *option,
                format!("Reward role #{}", i + 1),
            )
            .required(i == 0),
        );
    }
    cmd
}

/// Register the /add_role command
pub fn register_add_role_command() -> CreateCommand {
    register_roles_command("add_role", "Set the roles granted to boosters (Admin only)")
}

/// Register the /edit_role command; same behaviour as /add_role
pub fn register_edit_role_command() -> CreateCommand {
    register_roles_command("edit_role", "Replace the roles granted to boosters (Admin only)")
}

fn selected_roles(command: &CommandInteraction) -> Vec<Option<RoleInfo>> {
    ROLE_OPTIONS
        .iter()
        .map(|name| {
            let role_id = get_role_option(&command.data.options, name)?;
            let role = command.data.resolved.roles.get(&role_id)?;
            Some(RoleInfo::new(role.id.get(), role.name.clone(), role.position))
        })
        .collect()
}

pub async fn run_add_role(ctx: &Context, command: &CommandInteraction, config_service: &Arc<ConfigService>) {
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

    let Some(bot_top_role) =
        guild_snapshot(&ctx.cache, GuildId::new(guild_id)).and_then(|guild| guild.bot_top_role)
    else {
        edit_reply(ctx, command, "❌ Server data is not available yet, try again shortly").await;
        return;
    };

    match config_service
        .set_reward_roles(guild_id, bot_top_role, selected_roles(command))
        .await
    {
        Ok(role_ids) => {
            edit_reply(
                ctx,
                command,
                format!("✅ Reward roles saved:\n{}", role_mentions(&role_ids)),
            )
            .await;
        }
        Err(ConfigError::HierarchyViolation { role_id }) => {
            edit_reply(
                ctx,
                command,
                format!("❌ Role <@&{}> is higher than the bot's role!", role_id),
            )
            .await;
        }
        Err(error) => {
            error!(guild_id, "Failed to save reward roles: {}", error);
            edit_reply(ctx, command, format!("❌ {}", error)).await;
        }
    }
}
