mod commands;
mod config;
mod db;
mod error;
mod handlers;
mod quota;
mod shift_time;
mod ui;

use std::env;
use std::sync::Arc;

use dotenvy::dotenv;
use serenity::all::{Client, GatewayIntents};
use tokio::sync::RwLock;

use crate::config::QuotaConfig;
use crate::handlers::{AppState, Handler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let token = env::var("DISCORD_TOKEN").expect("DISCORD_TOKEN not set");
    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL not set");
    let guild_id: u64 = env::var("GUILD_ID")
        .expect("GUILD_ID not set")
        .parse()
        .expect("GUILD_ID must be a numeric id");
    let log_channel_id = env::var("LOG_CHANNEL_ID").ok().and_then(|s| s.parse().ok());

    let config = match env::var("QUOTA_CONFIG") {
        Ok(path) => QuotaConfig::load(&path)?,
        Err(_) => QuotaConfig::default(),
    };

    let pool = db::init_pool(&db_url).await?;

    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_MEMBERS;
    let state = Arc::new(AppState {
        pool,
        config,
        guild_id,
        log_channel_id,
        table_lock: RwLock::new(()),
    });

    let mut client = Client::builder(&token, intents)
        .event_handler(Handler::new(state))
        .await?;

    client.start().await?;
    Ok(())
}
