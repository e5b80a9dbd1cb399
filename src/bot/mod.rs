//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the GiftBuddy application,
//! including all slash commands, autocomplete handlers, and bot context
//! management. Everything financial happens in `core`; this layer only
//! parses input and formats output.

/// Discord command implementations (gift, settle, preferences, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    config::AppConfig,
    errors::{Error, Result},
    sync::SheetClient,
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::info;

/// Shared data available to all bot commands.
/// This structure holds the database connection, the resolved configuration,
/// and the remote sheet client when one is configured.
pub struct BotData {
    /// Database connection for all local operations
    pub database: DatabaseConnection,
    /// Resolved application configuration
    pub config: Arc<AppConfig>,
    /// Remote sheet client; `None` in local-only mode
    pub remote: Option<SheetClient>,
}

impl BotData {
    /// Creates a new `BotData` instance for the command context.
    #[must_use]
    pub const fn new(
        database: DatabaseConnection,
        config: Arc<AppConfig>,
        remote: Option<SheetClient>,
    ) -> Self {
        Self {
            database,
            config,
            remote,
        }
    }
}

/// Command context alias used by every command
pub type Context<'a> = poise::Context<'a, BotData, Error>;

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            tracing::error!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("An error occurred: {error}")).await {
                tracing::error!("Failed to send error message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                tracing::error!("Error while handling error: {e}");
            }
        }
    }
}

/// Starts the Discord client and blocks until it shuts down.
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::refresh(),
                commands::gift(),
                commands::settle(),
                commands::set_sort(),
                commands::set_view(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await
        .map_err(Error::from)?;

    client.start().await.map_err(Error::from)?;
    Ok(())
}
