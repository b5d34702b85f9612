use std::sync::Arc;

use anyhow::Context as _;
use serenity::all::{
    Context, CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, EventHandler, Interaction, Ready,
};
use serenity::async_trait;
use serenity::prelude::TypeMapKey;
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::config::QuotaConfig;

/// Everything a command handler needs, built once in main and passed in.
pub struct AppState {
    pub pool: PgPool,
    pub config: QuotaConfig,
    pub guild_id: u64,
    pub log_channel_id: Option<u64>,
    /// Tally and reset hold the write side across read-then-clear; shift
    /// inserts and delete-last take the read side, so they stay concurrent
    /// with each other but never land inside a clear.
    pub table_lock: RwLock<()>,
}

pub struct Handler {
    state: Arc<AppState>,
}

impl Handler {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        tracing::info!("{} is connected", ready.user.name);
        {
            let mut data = ctx.data.write().await;
            data.insert::<StateKey>(self.state.clone());
        }

        if let Err(e) = crate::commands::register_commands(&ctx, &self.state).await {
            tracing::error!("failed to register commands: {e:#}");
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Command(cmd) = interaction {
            if let Err(e) = crate::commands::dispatch(&ctx, &cmd).await {
                tracing::error!(command = %cmd.data.name, "command failed: {e:#}");
                report_failure(&ctx, &cmd).await;
            }
        }
    }
}

/// Generic failure notice; the first attempt fails if the interaction was
/// already acknowledged (e.g. a deferred tally), so fall back to a followup.
async fn report_failure(ctx: &Context, cmd: &serenity::all::CommandInteraction) {
    const MSG: &str = "Something went wrong running that command.";
    let direct = cmd
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new().content(MSG).ephemeral(true),
            ),
        )
        .await;
    if direct.is_err() {
        let _ = cmd
            .create_followup(
                &ctx.http,
                CreateInteractionResponseFollowup::new().content(MSG).ephemeral(true),
            )
            .await;
    }
}

/* Context data access */
struct StateKey;
impl TypeMapKey for StateKey {
    type Value = Arc<AppState>;
}

pub async fn state_from_ctx(ctx: &Context) -> anyhow::Result<Arc<AppState>> {
    let data = ctx.data.read().await;
    data.get::<StateKey>().cloned().context("AppState missing from context data")
}
