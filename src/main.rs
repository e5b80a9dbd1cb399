//! GiftBuddy binary entry point.

use dotenvy::dotenv;
use gift_buddy::{
    bot::{self, BotData},
    config,
    errors::{Error, Result},
    sync::{SheetClient, service},
};
use std::{env, sync::Arc};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok(); // Non-fatal, env vars can be set externally
    info!("Attempted to load .env file.");

    // 3. Load the application configuration (config.toml + env overrides)
    let app_config = config::settings::load_app_config()?;
    info!("Successfully processed application configuration.");

    // 4. Initialize the local database cache
    let db = config::database::create_connection(&app_config.database_url)
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    config::database::create_tables(&db)
        .await
        .inspect(|_| info!("Database tables ready."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Build the sheet client and pull the initial snapshot. A failed
    //    initial fetch is not fatal: the bot starts on the cached data and
    //    `/refresh` can retry later.
    let remote = match &app_config.sheet_api_url {
        Some(url) => Some(SheetClient::new(url.clone())?),
        None => None,
    };
    if let Some(client) = &remote {
        match service::refresh_from_remote(&db, client).await {
            Ok(count) => info!("Loaded {count} gifts from the sheet."),
            Err(e) => warn!("Initial sheet fetch failed, using cached data: {e}"),
        }
    }

    // 6. Run the bot
    // DISCORD_BOT_TOKEN is loaded here, directly before use, not stored in AppConfig
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    let data = BotData::new(db, Arc::new(app_config), remote);
    bot::run_bot(token, data).await?;

    Ok(())
}
