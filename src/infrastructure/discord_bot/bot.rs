use crate::application::commands::{
    all_commands, run_add_role, run_help_command, run_list_roles, run_setup, run_test,
};
use crate::application::services::boost_service::BoostService;
use crate::application::services::config_service::ConfigService;
use crate::application::services::notification_service::NotificationService;
use crate::application::services::role_reconciler::RoleReconciler;
use crate::infrastructure::discord_bot::platform::{
    SerenityPlatform, guild_snapshot, member_snapshot,
};
use crate::infrastructure::repositories::json_config_repository::JsonGuildConfigRepository;
use crate::infrastructure::settings::Settings;

use serenity::all::{ActivityData, Guild, GuildMemberUpdateEvent, Interaction, Member, Ready};
use serenity::gateway::ChunkGuildFilter;
use serenity::http::Http;
use serenity::prelude::*;
use std::collections::HashSet;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tracing::{debug, error, info};

/// Services shared by every event, built once and kept across reconnects.
pub struct AppContext {
    pub config_service: Arc<ConfigService>,
    pub boost_service: Arc<BoostService>,
    pub presence_text: String,
    pub registered_guilds: RegisteredGuilds,
}

impl AppContext {
    pub fn build(settings: &Settings) -> Self {
        let config_repo = Arc::new(JsonGuildConfigRepository::new(&settings.config_file));
        let platform = Arc::new(SerenityPlatform::new(Arc::new(Http::new(&settings.token))));

        let boost_service = BoostService::new(
            config_repo.clone(),
            RoleReconciler::new(platform.clone()),
            NotificationService::new(platform),
        );

        Self {
            config_service: Arc::new(ConfigService::new(config_repo)),
            boost_service: Arc::new(boost_service),
            presence_text: settings.presence_text.clone(),
            registered_guilds: RegisteredGuilds::default(),
        }
    }
}

/// Guilds whose slash commands were registered during this process.
#[derive(Default)]
pub struct RegisteredGuilds {
    guilds: StdMutex<HashSet<u64>>,
}

impl RegisteredGuilds {
    /// Returns `true` the first time a guild is claimed.
    pub fn claim(&self, guild_id: u64) -> bool {
        self.guilds
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(guild_id)
    }

    /// Forget a guild so the next `GUILD_CREATE` tries again.
    pub fn release(&self, guild_id: u64) {
        self.guilds
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&guild_id);
    }
}

/// Large guilds arrive without their member list; without cached members the
/// first boost of each member has no "before" state to compare against.
pub fn needs_member_chunk(member_count: u64, cached_members: usize) -> bool {
    (cached_members as u64) < member_count
}

pub struct BoostHandler {
    pub app: Arc<AppContext>,
}

#[serenity::async_trait]
impl EventHandler for BoostHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("Bot ready as {}", ready.user.name);
        ctx.set_activity(Some(ActivityData::watching(&self.app.presence_text)));
    }

    // Fires for every guild at startup and for guilds joined later.
    async fn guild_create(&self, ctx: Context, guild: Guild, is_new: Option<bool>) {
        let guild_id = guild.id;
        debug!(guild_id = guild_id.get(), ?is_new, "Guild available");

        if needs_member_chunk(guild.member_count, guild.members.len()) {
            info!(
                guild_id = guild_id.get(),
                cached = guild.members.len(),
                total = guild.member_count,
                "Requesting guild members"
            );
            ctx.shard
                .chunk_guild(guild_id, None, false, ChunkGuildFilter::None, None);
        }

        if !self.app.registered_guilds.claim(guild_id.get()) {
            return;
        }
        match guild_id.set_commands(&ctx.http, all_commands()).await {
            Ok(_) => info!("Commands registered for guild {}", guild_id.get()),
            Err(err) => {
                self.app.registered_guilds.release(guild_id.get());
                error!("Error registering commands for guild {}: {}", guild_id, err);
            }
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        debug!("Received command interaction: {}", command.data.name);
        match command.data.name.as_str() {
            "help" => run_help_command(&ctx, &command).await,
            "setup" => run_setup(&ctx, &command, &self.app.config_service).await,
            "add_role" | "edit_role" => {
                run_add_role(&ctx, &command, &self.app.config_service).await
            }
            "list_roles" => run_list_roles(&ctx, &command, &self.app.config_service).await,
            "test" => run_test(&ctx, &command, &self.app.boost_service).await,
            _ => debug!("Command not recognized: {}", command.data.name),
        }
    }

    async fn guild_member_update(
        &self,
        ctx: Context,
        old_if_available: Option<Member>,
        new: Option<Member>,
        event: GuildMemberUpdateEvent,
    ) {
        let (Some(old), Some(new)) = (old_if_available, new) else {
            debug!(
                guild_id = event.guild_id.get(),
                user_id = event.user.id.get(),
                "Member update without cached state, skipping"
            );
            return;
        };

        let Some(guild) = guild_snapshot(&ctx.cache, event.guild_id) else {
            debug!(guild_id = event.guild_id.get(), "Guild not cached, skipping member update");
            return;
        };

        self.app
            .boost_service
            .handle_member_update(guild, &member_snapshot(&old), member_snapshot(&new))
            .await;
    }
}

/// Build a client and run one gateway session until it ends.
pub async fn run_bot(settings: &Settings, app: Arc<AppContext>) -> Result<(), serenity::Error> {
    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_MEMBERS;

    let handler = BoostHandler { app };

    let mut client = Client::builder(&settings.token, intents)
        .event_handler(handler)
        .await?;

    client.start().await?;
    Ok(())
}
