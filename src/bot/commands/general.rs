//! General Discord commands - ping, help, and remote refresh.
//! This module contains simple commands that provide basic bot
//! functionality, user assistance, and the manual re-sync entry point.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
        sync::service,
    };

    /// Responds with "Pong!" to test bot connectivity.
    ///
    /// This is a simple health check command that doesn't require any database operations.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    ///
    /// This command provides users with information about all available bot commands
    /// and their usage, helping them understand the bot's capabilities.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**GiftBuddy Help**\n\
        Here is a summary of all available commands for GiftBuddy.\n\n\
        **Gift Commands**\n\
        • `/gift add <title> <cost> <recipient> <payer> [occasion] [year] ...` - Records a new gift.\n\
        • `/gift edit <gift> [fields...]` - Edits an existing gift.\n\
        • `/gift list [recipient] [occasion] [year] [sort]` - Shows the gift list.\n\
        • `/gift toggle <gift> <flag>` - Flips received/split/returned/repaid/excluded.\n\
        • `/gift remove <gift>` - Hides a gift (it stays in the sheet as deleted).\n\n\
        **Reporting Commands**\n\
        • `/settle [recipient] [occasion] [year]` - Shows who owes whom.\n\n\
        **Utility Commands**\n\
        • `/refresh` - Re-fetches all gifts from the sheet.\n\
        • `/set_sort <criteria>` - Sets the default sort order.\n\
        • `/set_view <mode>` - Sets the default list layout.\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.\n\n\
        Recipients: Jacopo, Leonardo, Mary, Anna, Paolo, Altri. Payers: Paolo, Mary.";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Re-fetches the whole gift table from the remote sheet.
    ///
    /// Replaces the local cache wholesale; any rows the sheet cannot account
    /// for (missing id, unknown payer) are skipped with a logged warning.
    #[poise::command(slash_command, prefix_command)]
    pub async fn refresh(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let Some(remote) = &ctx.data().remote else {
            ctx.say("❌ No sheet endpoint configured; running local-only.")
                .await?;
            return Ok(());
        };

        // The sheet can take seconds to answer; acknowledge right away.
        ctx.defer().await?;

        let db = &ctx.data().database;
        match service::refresh_from_remote(db, remote).await {
            Ok(count) => {
                ctx.say(format!("✅ Refreshed {count} gifts from the sheet."))
                    .await?;
            }
            Err(e) => {
                ctx.say(format!("❌ Refresh failed: {e}")).await?;
            }
        }

        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
