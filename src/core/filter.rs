//! Filter/sort stage - narrows and orders the gift list for display.
//!
//! Soft-deleted records are dropped unconditionally; the three filter
//! dimensions (recipient, occasion, year) are optional and `None` means
//! "all". Sorting is stable, so records with equal keys keep their input
//! order and results are deterministic.

use crate::entities::{Occasion, Recipient, gift};
use crate::errors::Error;
use std::cmp::Ordering;

/// Active filter over the gift list. `None` in a dimension matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GiftFilter {
    /// Only gifts for this recipient
    pub recipient: Option<Recipient>,
    /// Only gifts for this occasion
    pub occasion: Option<Occasion>,
    /// Only gifts of this year
    pub year: Option<i32>,
}

impl GiftFilter {
    /// Whether a gift matches every active dimension.
    #[must_use]
    pub fn matches(&self, gift: &gift::Model) -> bool {
        self.recipient.is_none_or(|r| gift.recipient == r)
            && self.occasion.is_none_or(|o| gift.occasion == o)
            && self.year.is_none_or(|y| gift.year == y)
    }
}

/// The closed set of sort orders for the gift list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Newest first (the default)
    #[default]
    DateDesc,
    /// Oldest first
    DateAsc,
    /// Most expensive first
    PriceDesc,
    /// Cheapest first
    PriceAsc,
    /// Title A-Z, case-insensitive
    TitleAsc,
    /// Recipient A-Z, case-insensitive
    RecipientAsc,
}

impl SortKey {
    /// All sort keys with their wire tokens, for help text and choices.
    pub const ALL: [(Self, &'static str); 6] = [
        (Self::DateDesc, "date-desc"),
        (Self::DateAsc, "date-asc"),
        (Self::PriceDesc, "price-desc"),
        (Self::PriceAsc, "price-asc"),
        (Self::TitleAsc, "title-asc"),
        (Self::RecipientAsc, "recipient-asc"),
    ];

    /// The persisted token for this sort key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DateDesc => "date-desc",
            Self::DateAsc => "date-asc",
            Self::PriceDesc => "price-desc",
            Self::PriceAsc => "price-asc",
            Self::TitleAsc => "title-asc",
            Self::RecipientAsc => "recipient-asc",
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date-desc" => Ok(Self::DateDesc),
            "date-asc" => Ok(Self::DateAsc),
            "price-desc" => Ok(Self::PriceDesc),
            "price-asc" => Ok(Self::PriceAsc),
            "title-asc" => Ok(Self::TitleAsc),
            "recipient-asc" => Ok(Self::RecipientAsc),
            other => Err(Error::Validation {
                message: format!("Unknown sort criteria: {other}"),
            }),
        }
    }
}

/// Filters and orders the gift list for display.
///
/// Soft-deleted gifts never survive this stage, whatever the filter says.
/// Returned and excluded gifts do survive it: they stay visible in the list
/// (dimmed by the presentation layer) and are only dropped later by the
/// settlement engine.
#[must_use]
pub fn filter_and_sort(
    gifts: &[gift::Model],
    filter: &GiftFilter,
    sort: SortKey,
) -> Vec<gift::Model> {
    let mut result: Vec<gift::Model> = gifts
        .iter()
        .filter(|g| !g.is_deleted && filter.matches(g))
        .cloned()
        .collect();

    // Vec::sort_by is stable: equal keys keep input order.
    result.sort_by(|a, b| compare(a, b, sort));
    result
}

fn compare(a: &gift::Model, b: &gift::Model, sort: SortKey) -> Ordering {
    match sort {
        SortKey::DateDesc => b.created_at.cmp(&a.created_at),
        SortKey::DateAsc => a.created_at.cmp(&b.created_at),
        SortKey::PriceDesc => b.cost.total_cmp(&a.cost),
        SortKey::PriceAsc => a.cost.total_cmp(&b.cost),
        SortKey::TitleAsc => a
            .title
            .to_lowercase()
            .cmp(&b.title.to_lowercase()),
        SortKey::RecipientAsc => a
            .recipient
            .to_string()
            .to_lowercase()
            .cmp(&b.recipient.to_string().to_lowercase()),
    }
}

/// Derives the selectable years for the year filter.
///
/// The current calendar year is always present, plus every distinct year
/// among non-deleted gifts, sorted descending.
#[must_use]
pub fn available_years(gifts: &[gift::Model], current_year: i32) -> Vec<i32> {
    let mut years: Vec<i32> = gifts
        .iter()
        .filter(|g| !g.is_deleted)
        .map(|g| g.year)
        .chain(std::iter::once(current_year))
        .collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}
