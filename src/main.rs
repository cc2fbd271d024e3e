// This is the entry point of the Discord bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (databases, APIs)
// - `discord/` = Discord-specific adapters (commands, events)
// - `config/` = Environment-driven settings
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Tear down cleanly on Ctrl-C

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "config/bot_config.rs"]
mod config;
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

use std::sync::Arc;

use anyhow::Context;
use poise::serenity_prelude as serenity;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing_subscriber::EnvFilter;

use crate::config::{BotConfig, CommandScope, RuntimeEnv};
use crate::core::search::SearchService;
use crate::core::warnings::WarningService;
use crate::discord::commands::all_commands;
use crate::discord::{dispatcher, events, Data};
use crate::infra::search::GoogleSearchClient;
use crate::infra::warnings::SqliteWarningStore;

/// Human-readable logs while developing, JSON lines in production.
fn init_tracing(config: &BotConfig) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match config.runtime_env {
        RuntimeEnv::Production => builder.json().init(),
        RuntimeEnv::Development | RuntimeEnv::Test => builder.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let config = Arc::new(BotConfig::from_env().context("Invalid bot configuration")?);
    init_tracing(&config);
    tracing::info!(?config, "Configuration loaded");

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // This is the "composition root" where we wire everything together.

    std::fs::create_dir_all(&config.data_dir).with_context(|| {
        format!(
            "Failed to create data directory {}",
            config.data_dir.display()
        )
    })?;

    let db_options = SqliteConnectOptions::new()
        .filename(config.database_path())
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(db_options)
        .await
        .context("Failed to open warnings database")?;

    let warning_store = SqliteWarningStore::new(pool.clone());
    warning_store
        .migrate()
        .await
        .context("Failed to migrate warnings database")?;
    let warnings = Arc::new(WarningService::new(
        warning_store,
        config.warning_retention_days,
    ));

    let search = match &config.google {
        Some(google) => Some(Arc::new(SearchService::new(
            GoogleSearchClient::new(google).context("Failed to create Google search client")?,
        ))),
        None => {
            tracing::info!("GOOGLE_API_KEY/GOOGLE_CSE_ID not set, /google is disabled");
            None
        }
    };

    let data = Data {
        config: Arc::clone(&config),
        warnings,
        search,
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    // Members are fetched over REST, so no privileged intents are needed.
    let intents = serenity::GatewayIntents::GUILDS;

    let command_scope = config.command_scope;
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: all_commands(),
            on_error: |error| Box::pin(dispatcher::on_error(error)),
            event_handler: |ctx, event, framework, data| {
                Box::pin(events::event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                let commands = &framework.options().commands;
                match command_scope {
                    CommandScope::Guild(guild_id) => {
                        poise::builtins::register_in_guild(
                            ctx,
                            commands,
                            serenity::GuildId::new(guild_id),
                        )
                        .await?;
                        tracing::info!(guild_id, count = commands.len(), "Registered guild commands");
                    }
                    CommandScope::Global => {
                        // Can take up to an hour to propagate
                        poise::builtins::register_globally(ctx, commands).await?;
                        tracing::info!(count = commands.len(), "Registered global commands");
                    }
                }

                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&config.token, intents)
        .framework(framework)
        .await
        .context("Error creating client")?;

    let shard_manager = Arc::clone(&client.shard_manager);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            return;
        }
        tracing::info!("Shutdown requested, stopping shards");
        shard_manager.shutdown_all().await;
    });

    let run_result = client.start().await;

    pool.close().await;
    tracing::info!("Database pool closed");

    run_result.context("Error running bot")
}
