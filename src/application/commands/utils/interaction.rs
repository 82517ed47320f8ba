use serenity::all::{
    CommandInteraction, CreateInteractionResponse, CreateInteractionResponseMessage,
    EditInteractionResponse,
};
use serenity::prelude::*;
use tracing::warn;

/// Whether the invoking member has the Administrator permission
pub fn has_admin_permission(command: &CommandInteraction) -> bool {
    command.member.as_ref().map_or(false, |member| {
        member
            .permissions
            .map_or(false, |perms| perms.administrator())
    })
}

/// Defer with an ephemeral "thinking" state. Returns false if Discord refused it.
pub async fn defer_ephemeral(ctx: &Context, command: &CommandInteraction) -> bool {
    let defer = CreateInteractionResponse::Defer(
        CreateInteractionResponseMessage::new().ephemeral(true),
    );

    match command.create_response(&ctx.http, defer).await {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to defer /{}: {}", command.data.name, e);
            false
        }
    }
}

/// Replace the deferred response
pub async fn edit_reply(ctx: &Context, command: &CommandInteraction, content: impl Into<String>) {
    if let Err(e) = command
        .edit_response(&ctx.http, EditInteractionResponse::new().content(content))
        .await
    {
        warn!("Failed to answer /{}: {}", command.data.name, e);
    }
}

pub fn role_mentions(role_ids: &[u64]) -> String {
    role_ids
        .iter()
        .map(|id| format!("<@&{}>", id))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mentions_one_per_line() {
        assert_eq!(role_mentions(&[10, 20]), "<@&10>\n<@&20>");
        assert_eq!(role_mentions(&[]), "");
    }
}
