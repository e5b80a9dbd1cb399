//! Settlement Discord command - who owes whom.
//!
//! Runs the gift list through the filter stage and the settlement engine
//! and renders the result as an embed: overall totals, per-payer outlay,
//! outstanding split debts, the net verdict, and the per-recipient
//! breakdown.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            filter::{GiftFilter, SortKey, filter_and_sort},
            settlement::{self, compute_summary},
        },
        errors::{Error, Result},
    };
    use std::fmt::Write as _;

    /// Shows the financial settlement between Paolo and Mary.
    ///
    /// Optional filters narrow the computation to one recipient, occasion,
    /// or year; deleted gifts are always out, returned and excluded gifts
    /// count for nothing.
    #[poise::command(slash_command, prefix_command)]
    pub async fn settle(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Only this recipient"] recipient: Option<String>,
        #[description = "Only this occasion"] occasion: Option<String>,
        #[description = "Only this year"]
        #[autocomplete = "autocomplete::autocomplete_year"]
        year: Option<i32>,
    ) -> Result<()> {
        use poise::serenity_prelude as serenity;

        let db = &ctx.data().database;

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

        let gifts = crate::core::gift::get_all_active_gifts(db).await?;
        let visible = filter_and_sort(&gifts, &filter, SortKey::DateDesc);

        if visible.is_empty() {
            ctx.say("📦 No gifts match, nothing to settle.").await?;
            return Ok(());
        }

        let summary = compute_summary(&visible);

        let mut totals = String::new();
        writeln!(
            &mut totals,
            "**Total spent:** {}",
            settlement::format_amount(summary.total_spent)
        )?;
        writeln!(
            &mut totals,
            "**Paolo paid:** {}",
            settlement::format_amount(summary.total_paolo_paid)
        )?;
        writeln!(
            &mut totals,
            "**Mary paid:** {}",
            settlement::format_amount(summary.total_mary_paid)
        )?;

        let mut debts = String::new();
        writeln!(
            &mut debts,
            "**Mary owes Paolo:** {}",
            settlement::format_amount(summary.mary_owes_paolo)
        )?;
        writeln!(
            &mut debts,
            "**Paolo owes Mary:** {}",
            settlement::format_amount(summary.paolo_owes_mary)
        )?;

        let mut breakdown = String::new();
        for stat in &summary.recipient_stats {
            writeln!(
                &mut breakdown,
                "{}: {} gift{} — {}",
                stat.recipient,
                stat.count,
                if stat.count == 1 { "" } else { "s" },
                settlement::format_amount(stat.value)
            )?;
        }

        let embed = serenity::CreateEmbed::default()
            .title("💶 Settlement")
            .description(format!(
                "**{}**",
                settlement::format_settlement_verdict(&summary)
            ))
            .color(0x0034_98DB) // Blue color
            .fields(vec![
                ("Totals", totals, true),
                ("Outstanding", debts, true),
                ("By recipient", breakdown, false),
            ])
            .footer(serenity::CreateEmbedFooter::new(format!(
                "GiftBuddy v0.2.0 | {} gift{} considered",
                visible.len(),
                if visible.len() == 1 { "" } else { "s" }
            )));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;

        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
