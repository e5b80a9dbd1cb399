//! Gift Discord commands - add, edit, list, toggle, and remove.
//!
//! This module contains commands that interact with the local store and the
//! remote sheet through the sync service to manage gift records. Parsing of
//! the closed recipient/payer/occasion sets happens here at the edge; the
//! core only ever sees typed values.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            filter::{GiftFilter, filter_and_sort},
            gift::{GiftDraft, GiftFlag},
            preferences::{self, ViewMode},
        },
        entities::{Occasion, Payer, Recipient, gift},
        errors::{Error, Result},
        sync::{WriteState, service},
    };
    use chrono::Datelike;
    use std::fmt::Write as _;

    /// How many list lines fit comfortably into one Discord message.
    const LIST_LIMIT: usize = 30;

    /// Manage the gift ledger.
    #[poise::command(
        slash_command,
        prefix_command,
        subcommands("add", "edit", "list", "toggle", "remove")
    )]
    pub async fn gift(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say(
            "Use a subcommand: `/gift add`, `/gift edit`, `/gift list`, \
             `/gift toggle`, or `/gift remove`. See `/help` for details.",
        )
        .await?;
        Ok(())
    }

    /// Records a new gift.
    ///
    /// The gift is saved locally right away and pushed to the sheet; if the
    /// sheet rejects it, the local save is rolled back and nothing changes.
    #[poise::command(slash_command, prefix_command)]
    #[allow(clippy::too_many_arguments)] // one parameter per sheet column
    pub async fn add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "What the gift is"] title: String,
        #[description = "Sticker price"] cost: f64,
        #[description = "Recipient (Jacopo, Leonardo, Mary, Anna, Paolo, Altri)"] recipient: String,
        #[description = "Payer (Paolo or Mary)"] payer: String,
        #[description = "Occasion (Natale, Compleanno, Anniversario, Altro)"] occasion: Option<
            String,
        >,
        #[description = "Calendar year (defaults to the current year)"] year: Option<i32>,
        #[description = "Store the gift was bought from"] source: Option<String>,
        #[description = "Split the cost 50/50 with the other payer"] split: Option<bool>,
        #[description = "Product page link"] product_url: Option<String>,
        #[description = "Product image link"] image_url: Option<String>,
    ) -> Result<()> {
        // Validate amount parameter
        if cost.is_nan() || cost.is_infinite() {
            ctx.say("❌ Invalid cost: must be a valid number").await?;
            return Ok(());
        }
        if cost < 0.0 {
            ctx.say("❌ Invalid cost: must not be negative").await?;
            return Ok(());
        }

        let recipient: Recipient = match recipient.parse() {
            Ok(r) => r,
            Err(e) => {
                ctx.say(format!("❌ {e}")).await?;
                return Ok(());
            }
        };
        let payer: Payer = match payer.parse() {
            Ok(p) => p,
            Err(e) => {
                ctx.say(format!("❌ {e}")).await?;
                return Ok(());
            }
        };
        let occasion: Occasion = match occasion.as_deref() {
            Some(value) => match value.parse() {
                Ok(o) => o,
                Err(e) => {
                    ctx.say(format!("❌ {e}")).await?;
                    return Ok(());
                }
            },
            None => Occasion::Altro,
        };

        let year = year.unwrap_or_else(|| chrono::Local::now().year());

        let mut draft = GiftDraft::new(title, cost, recipient, payer, occasion, year);
        draft.source = source.unwrap_or_default();
        draft.is_split = split.unwrap_or(false);
        draft.product_url = product_url;
        draft.image_url = image_url;

        let data = ctx.data();
        let result = service::create_gift(&data.database, data.remote.as_ref(), draft).await?;

        match result {
            (created, WriteState::Confirmed) => {
                ctx.say(format!(
                    "✅ Added '{}' for {} - €{:.2} paid by {} (id: {})",
                    created.title, created.recipient, created.cost, created.payer, created.id
                ))
                .await?;
            }
            (created, _) => {
                ctx.say(format!(
                    "❌ Cloud sync failed; '{}' was not saved.",
                    created.title
                ))
                .await?;
            }
        }

        Ok(())
    }

    /// Edits an existing gift. Only the fields you pass change.
    #[poise::command(slash_command, prefix_command)]
    #[allow(clippy::too_many_arguments)] // one parameter per sheet column
    #[allow(clippy::too_many_lines)] // straight-line field merging
    pub async fn edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Gift to edit (title or id)"]
        #[autocomplete = "autocomplete::autocomplete_gift_title"]
        gift: String,
        #[description = "New title"] title: Option<String>,
        #[description = "New sticker price"] cost: Option<f64>,
        #[description = "New recipient"] recipient: Option<String>,
        #[description = "New payer"] payer: Option<String>,
        #[description = "New occasion"] occasion: Option<String>,
        #[description = "New year"] year: Option<i32>,
        #[description = "New store name"] source: Option<String>,
        #[description = "New product page link"] product_url: Option<String>,
        #[description = "New product image link"] image_url: Option<String>,
        #[description = "New shipment tracking link"] tracking_url: Option<String>,
        #[description = "New order detail link"] order_detail_url: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let db = &data.database;

        let existing = match crate::core::gift::find_gift(db, &gift).await {
            Ok(g) => g,
            Err(Error::GiftNotFound { reference }) => {
                ctx.say(format!(
                    "❌ Gift '{reference}' not found. Use `/gift list` to see the ledger."
                ))
                .await?;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        if let Some(value) = cost {
            if value.is_nan() || value.is_infinite() || value < 0.0 {
                ctx.say("❌ Invalid cost: must be a non-negative number")
                    .await?;
                return Ok(());
            }
        }

        let recipient = match recipient.as_deref().map(str::parse) {
            Some(Ok(r)) => r,
            Some(Err(e)) => {
                ctx.say(format!("❌ {e}")).await?;
                return Ok(());
            }
            None => existing.recipient,
        };
        let payer = match payer.as_deref().map(str::parse) {
            Some(Ok(p)) => p,
            Some(Err(e)) => {
                ctx.say(format!("❌ {e}")).await?;
                return Ok(());
            }
            None => existing.payer,
        };
        let occasion = match occasion.as_deref().map(str::parse) {
            Some(Ok(o)) => o,
            Some(Err(e)) => {
                ctx.say(format!("❌ {e}")).await?;
                return Ok(());
            }
            None => existing.occasion,
        };

        let draft = GiftDraft {
            title: title.unwrap_or_else(|| existing.title.clone()),
            source: source.unwrap_or_else(|| existing.source.clone()),
            cost: cost.unwrap_or(existing.cost),
            recipient,
            payer,
            occasion,
            year: year.unwrap_or(existing.year),
            is_received: existing.is_received,
            is_split: existing.is_split,
            is_returned: existing.is_returned,
            is_repaid: existing.is_repaid,
            is_excluded: existing.is_excluded,
            image_url: image_url.or_else(|| existing.image_url.clone()),
            product_url: product_url.or_else(|| existing.product_url.clone()),
            tracking_url: tracking_url.or_else(|| existing.tracking_url.clone()),
            order_detail_url: order_detail_url.or_else(|| existing.order_detail_url.clone()),
        };

        let result =
            service::edit_gift(db, data.remote.as_ref(), &existing.id, draft).await?;

        match result {
            (updated, WriteState::Confirmed) => {
                ctx.say(format!("✅ Updated '{}' (id: {})", updated.title, updated.id))
                    .await?;
            }
            (updated, _) => {
                ctx.say(format!(
                    "❌ Cloud sync failed; '{}' was rolled back to its previous state.",
                    updated.title
                ))
                .await?;
            }
        }

        Ok(())
    }

    /// Shows the gift list, filtered and sorted.
    ///
    /// Sort and layout default to the persisted preferences; any filter you
    /// pass narrows the list further. Deleted gifts never appear.
    #[poise::command(slash_command, prefix_command)]
    pub async fn list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Only this recipient"] recipient: Option<String>,
        #[description = "Only this occasion"] occasion: Option<String>,
        #[description = "Only this year"]
        #[autocomplete = "autocomplete::autocomplete_year"]
        year: Option<i32>,
        #[description = "Sort order (date-desc, date-asc, price-desc, price-asc, title-asc, recipient-asc)"]
        sort: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let db = &data.database;

        let mut filter = GiftFilter::default();
        if let Some(value) = recipient.as_deref() {
            match value.parse() {
                Ok(r) => filter.recipient = Some(r),
                Err(e) => {
                    ctx.say(format!("❌ {e}")).await?;
                    return Ok(());
                }
            }
        }
        if let Some(value) = occasion.as_deref() {
            match value.parse() {
                Ok(o) => filter.occasion = Some(o),
                Err(e) => {
                    ctx.say(format!("❌ {e}")).await?;
                    return Ok(());
                }
            }
        }
        filter.year = year;

        let prefs = preferences::load_preferences(db).await?;
        let sort_key = match sort.as_deref() {
            Some(value) => match value.parse() {
                Ok(s) => s,
                Err(e) => {
                    ctx.say(format!("❌ {e}")).await?;
                    return Ok(());
                }
            },
            None => prefs.sort_key,
        };

        let gifts = crate::core::gift::get_all_active_gifts(db).await?;
        let visible = filter_and_sort(&gifts, &filter, sort_key);

        if visible.is_empty() {
            ctx.say("📦 No gifts found.").await?;
            return Ok(());
        }

        let mut message = String::new();
        writeln!(
            &mut message,
            "**🎁 Gifts** ({} shown, sorted by {})",
            visible.len(),
            sort_key
        )?;
        if prefs.view_mode == ViewMode::Table {
            writeln!(&mut message, "`title | recipient | cost | payer | occasion`")?;
        }
        for gift in visible.iter().take(LIST_LIMIT) {
            writeln!(&mut message, "{}", format_gift_line(gift, prefs.view_mode))?;
        }
        if visible.len() > LIST_LIMIT {
            writeln!(&mut message, "…and {} more.", visible.len() - LIST_LIMIT)?;
        }

        ctx.say(message).await?;
        Ok(())
    }

    /// Flips one status flag on a gift.
    #[poise::command(slash_command, prefix_command)]
    pub async fn toggle(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Gift to change (title or id)"]
        #[autocomplete = "autocomplete::autocomplete_gift_title"]
        gift: String,
        #[description = "Flag to flip: received, split, returned, repaid, or excluded"]
        flag: String,
    ) -> Result<()> {
        let flag: GiftFlag = match flag.parse() {
            Ok(f) => f,
            Err(e) => {
                ctx.say(format!("❌ {e}")).await?;
                return Ok(());
            }
        };

        let data = ctx.data();
        let result =
            match service::toggle_gift_flag(&data.database, data.remote.as_ref(), &gift, flag)
                .await
            {
                Ok(r) => r,
                Err(Error::GiftNotFound { reference }) => {
                    ctx.say(format!("❌ Gift '{reference}' not found.")).await?;
                    return Ok(());
                }
                Err(e) => return Err(e),
            };

        match result {
            (updated, WriteState::Confirmed) => {
                let value = match flag {
                    GiftFlag::Received => updated.is_received,
                    GiftFlag::Split => updated.is_split,
                    GiftFlag::Returned => updated.is_returned,
                    GiftFlag::Repaid => updated.is_repaid,
                    GiftFlag::Excluded => updated.is_excluded,
                };
                ctx.say(format!(
                    "✅ '{}' is now {}{}",
                    updated.title,
                    if value { "" } else { "not " },
                    flag
                ))
                .await?;
            }
            (updated, _) => {
                ctx.say(format!(
                    "❌ Cloud sync failed; '{}' was rolled back.",
                    updated.title
                ))
                .await?;
            }
        }

        Ok(())
    }

    /// Hides a gift from every view. The row stays in the sheet, marked
    /// deleted, so nothing is ever lost.
    #[poise::command(slash_command, prefix_command)]
    pub async fn remove(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Gift to hide (title or id)"]
        #[autocomplete = "autocomplete::autocomplete_gift_title"]
        gift: String,
    ) -> Result<()> {
        let data = ctx.data();
        let result =
            match service::delete_gift(&data.database, data.remote.as_ref(), &gift).await {
                Ok(r) => r,
                Err(Error::GiftNotFound { reference }) => {
                    ctx.say(format!("❌ Gift '{reference}' not found.")).await?;
                    return Ok(());
                }
                Err(e) => return Err(e),
            };

        match result {
            (deleted, WriteState::Confirmed) => {
                ctx.say(format!(
                    "✅ Hid '{}'. It stays in the sheet marked as deleted.",
                    deleted.title
                ))
                .await?;
            }
            (deleted, _) => {
                ctx.say(format!(
                    "❌ Cloud sync failed; '{}' is still visible.",
                    deleted.title
                ))
                .await?;
            }
        }

        Ok(())
    }

    /// Renders one gift as a list line for the chosen layout.
    ///
    /// Returned and excluded gifts stay in the list but are struck through,
    /// mirroring the dimmed cards of the original UI.
    fn format_gift_line(gift: &gift::Model, mode: ViewMode) -> String {
        let title = if gift.is_returned || gift.is_excluded {
            format!("~~{}~~", gift.title)
        } else {
            format!("**{}**", gift.title)
        };

        let mut badges = String::new();
        if gift.is_received {
            badges.push_str(" `received`");
        }
        if gift.is_split {
            badges.push_str(" `split`");
        }
        if gift.is_repaid {
            badges.push_str(" `repaid`");
        }
        if gift.is_returned {
            badges.push_str(" `returned`");
        }
        if gift.is_excluded {
            badges.push_str(" `excluded`");
        }

        match mode {
            ViewMode::Compact => format!("• {title} — €{:.2}", gift.cost),
            ViewMode::Table => format!(
                "`{} | {} | €{:.2} | {} | {} {}`",
                gift.title, gift.recipient, gift.cost, gift.payer, gift.occasion, gift.year
            ),
            ViewMode::Grid | ViewMode::List => format!(
                "• {title} → {} — €{:.2} paid by {} — {} {}{badges}",
                gift.recipient, gift.cost, gift.payer, gift.occasion, gift.year
            ),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::test_utils::gift_model;

        #[test]
        fn test_format_gift_line_full() {
            let gift = gift_model("g1", 49.9, Payer::Paolo, Recipient::Jacopo, |g| {
                g.title = "Lego set".to_string();
                g.is_split = true;
            });

            let line = format_gift_line(&gift, ViewMode::List);
            assert!(line.contains("**Lego set**"));
            assert!(line.contains("€49.90"));
            assert!(line.contains("`split`"));
            assert!(!line.contains("`received`"));
        }

        #[test]
        fn test_format_gift_line_strikes_returned() {
            let gift = gift_model("g1", 20.0, Payer::Mary, Recipient::Anna, |g| {
                g.title = "Scarf".to_string();
                g.is_returned = true;
            });

            let line = format_gift_line(&gift, ViewMode::List);
            assert!(line.contains("~~Scarf~~"));
            assert!(line.contains("`returned`"));
        }

        #[test]
        fn test_format_gift_line_compact() {
            let gift = gift_model("g1", 20.0, Payer::Mary, Recipient::Anna, |g| {
                g.title = "Scarf".to_string();
            });

            let line = format_gift_line(&gift, ViewMode::Compact);
            assert_eq!(line, "• **Scarf** — €20.00");
        }
    }
}

// Re-export all commands
pub use inner::*;
