//! Preference Discord commands - persisted sort order and list layout.
//!
//! Both settings live in the `system_state` table and survive restarts, so
//! `/gift list` keeps its shape without arguments.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::{
            filter::SortKey,
            preferences::{self, ViewMode},
        },
        errors::{Error, Result},
    };

    /// Sets the default sort order for `/gift list`.
    #[poise::command(slash_command, prefix_command)]
    pub async fn set_sort(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "date-desc, date-asc, price-desc, price-asc, title-asc, or recipient-asc"]
        criteria: String,
    ) -> Result<()> {
        let sort: SortKey = match criteria.parse() {
            Ok(s) => s,
            Err(e) => {
                ctx.say(format!("❌ {e}")).await?;
                return Ok(());
            }
        };

        preferences::save_sort_key(&ctx.data().database, sort).await?;
        ctx.say(format!("✅ Default sort order is now `{sort}`."))
            .await?;
        Ok(())
    }

    /// Sets the default layout for `/gift list`.
    #[poise::command(slash_command, prefix_command)]
    pub async fn set_view(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "grid, list, compact, or table"] mode: String,
    ) -> Result<()> {
        let mode: ViewMode = match mode.parse() {
            Ok(m) => m,
            Err(e) => {
                ctx.say(format!("❌ {e}")).await?;
                return Ok(());
            }
        };

        preferences::save_view_mode(&ctx.data().database, mode).await?;
        ctx.say(format!("✅ Default view mode is now `{mode}`."))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
