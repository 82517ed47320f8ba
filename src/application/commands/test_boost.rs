use crate::application::commands::utils::{
    defer_ephemeral, edit_reply, get_string_option, has_admin_permission, role_mentions,
};
use crate::application::services::boost_service::{BoostService, SimulatedBoost};
use crate::infrastructure::discord_bot::platform::{guild_snapshot, member_snapshot};
use serenity::all::{
    CommandInteraction, CommandOptionType, CreateCommand, CreateCommandOption, Permissions,
};
use serenity::prelude::*;
use std::sync::Arc;

pub fn register_test_command() -> CreateCommand {
    CreateCommand::new("test")
        .description("Simulate a boost event on yourself (Admin only)")
        .default_member_permissions(Permissions::ADMINISTRATOR)
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                "action",
                "Event to simulate",
            )
            .required(true)
            .add_string_choice("🚀 Simulate boost", "boost")
            .add_string_choice("📉 Simulate unboost", "unboost"),
        )
}

pub async fn run_test(ctx: &Context, command: &CommandInteraction, boost_service: &Arc<BoostService>) {
    if !defer_ephemeral(ctx, command).await {
        return;
    }

    if !has_admin_permission(command) {
        edit_reply(ctx, command, "❌ You need **administrator** permissions to use this command").await;
        return;
    }

    let (Some(guild_id), Some(member)) = (command.guild_id, command.member.as_deref()) else {
        edit_reply(ctx, command, "❌ This command can only be used in a server").await;
        return;
    };

    let Some(kind) = get_string_option(&command.data.options, "action")
        .as_deref()
        .and_then(SimulatedBoost::from_choice)
    else {
        edit_reply(ctx, command, "❌ Unknown action").await;
        return;
    };

    let Some(guild) = guild_snapshot(&ctx.cache, guild_id) else {
        edit_reply(ctx, command, "❌ Server data is not available yet, try again shortly").await;
        return;
    };

    let outcome = boost_service
        .simulate(guild, member_snapshot(member), kind)
        .await;

    let (verb, changed) = match kind {
        SimulatedBoost::BoostStarted => ("granted", &outcome.delta.granted),
        SimulatedBoost::BoostEnded => ("revoked", &outcome.delta.revoked),
    };
    let mut summary = format!("✅ Simulation done. Roles {}: {}", verb, changed.len());
    if !changed.is_empty() {
        summary.push('\n');
        summary.push_str(&role_mentions(changed));
    }
    let failed = outcome.delta.failed_role_ids();
    if !failed.is_empty() {
        summary.push_str(&format!("\n⚠️ Failed:\n{}", role_mentions(&failed)));
    }

    edit_reply(ctx, command, summary).await;
}
