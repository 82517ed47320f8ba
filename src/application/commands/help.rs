use serenity::all::{
    CommandInteraction, CreateCommand, CreateEmbed, CreateInteractionResponse,
    CreateInteractionResponseMessage,
};
use serenity::prelude::*;
use tracing::error;

pub fn register_help_command() -> CreateCommand {
    CreateCommand::new("help").description("Show all commands and how to use them")
}

pub async fn run_help_command(ctx: &Context, command: &CommandInteraction) {
    let embed = CreateEmbed::new()
        .title("📘 Boost Bot guide")
        .description("Announces server boosts and hands out reward roles automatically")
        .colour(0x3498db)
        .field("⚙️ `/setup`", "Choose the channel for boost announcements", false)
        .field("🎖️ `/add_role`", "Choose up to four reward roles", false)
        .field("✏️ `/edit_role`", "Replace the reward roles", false)
        .field("📋 `/list_roles`", "Show the current configuration", false)
        .field("🧪 `/test`", "Simulate a boost or unboost on yourself", false);

    let builder = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::default()
            .embed(embed)
            .ephemeral(true),
    );

    if let Err(err) = command.create_response(&ctx.http, builder).await {
        error!("Error executing /help: {:?}", err);
    }
}
