//! Autocomplete handlers for Discord slash command parameters.
//!
//! This module provides autocomplete functionality for gift references and
//! the year filter, improving the user experience by suggesting valid
//! options as the user types.

use crate::{
    bot::BotData,
    core::{filter, gift},
    errors::Error,
};
use chrono::Datelike;

/// Provides autocomplete suggestions for gift titles.
///
/// Queries the active (non-deleted) gifts whose title contains the partial
/// input, case-insensitively, and returns up to 25 titles. Commands accept
/// either a title or an id, so picking a suggestion always resolves.
///
/// # Arguments
/// * `ctx` - The poise context containing the database connection
/// * `partial` - The partial string the user has typed so far
///
/// # Returns
/// A vector of gift titles that match the partial input
pub async fn autocomplete_gift_title(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;

    let Ok(gifts) = gift::get_all_active_gifts(db).await else {
        return Vec::new();
    };

    let partial_lower = partial.to_lowercase();

    let mut matching: Vec<String> = gifts
        .into_iter()
        .filter(|g| g.title.to_lowercase().contains(&partial_lower))
        .map(|g| g.title)
        .take(25) // Discord autocomplete limit
        .collect();

    // Sort alphabetically for consistent UX; duplicate titles collapse.
    matching.sort();
    matching.dedup();
    matching
}

/// Provides autocomplete suggestions for the year filter.
///
/// Offers the current calendar year plus every year present among active
/// gifts, newest first - the same set the year dropdown of a UI would show.
pub async fn autocomplete_year(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<poise::serenity_prelude::AutocompleteChoice> {
    let db = &ctx.data().database;

    let Ok(gifts) = gift::get_all_active_gifts(db).await else {
        return Vec::new();
    };

    let current_year = chrono::Local::now().year();
    filter::available_years(&gifts, current_year)
        .into_iter()
        .filter(|y| y.to_string().starts_with(partial.trim()))
        .take(25) // Discord autocomplete limit
        .map(|y| poise::serenity_prelude::AutocompleteChoice::new(y.to_string(), y))
        .collect()
}
