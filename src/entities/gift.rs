//! Gift entity - Represents one gift record in the ledger.
//!
//! Each gift has a sticker price, exactly one payer out of two, a recipient
//! and occasion from fixed sets, and six independent status flags. The
//! `recipient`/`payer`/`occasion` columns are string-valued active enums so
//! that settlement and filtering can match on them exhaustively.

use crate::errors::Error;
use sea_orm::{DeriveDisplay, entity::prelude::*};
use serde::{Deserialize, Serialize};

/// Who a gift is for. The set is fixed; `Altri` ("others") is the catch-all.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, DeriveDisplay, Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Recipient {
    /// Jacopo
    #[sea_orm(string_value = "Jacopo")]
    Jacopo,
    /// Leonardo
    #[sea_orm(string_value = "Leonardo")]
    Leonardo,
    /// Mary
    #[sea_orm(string_value = "Mary")]
    Mary,
    /// Anna
    #[sea_orm(string_value = "Anna")]
    Anna,
    /// Paolo
    #[sea_orm(string_value = "Paolo")]
    Paolo,
    /// Everyone else
    #[sea_orm(string_value = "Altri")]
    Altri,
}

impl Recipient {
    /// Parses a sheet cell, bucketing anything unrecognized into [`Recipient::Altri`].
    /// Ingest is coercing, not validating.
    #[must_use]
    pub fn lenient(value: &str) -> Self {
        value.parse().unwrap_or(Self::Altri)
    }
}

impl std::str::FromStr for Recipient {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jacopo" => Ok(Self::Jacopo),
            "leonardo" => Ok(Self::Leonardo),
            "mary" => Ok(Self::Mary),
            "anna" => Ok(Self::Anna),
            "paolo" => Ok(Self::Paolo),
            "altri" => Ok(Self::Altri),
            other => Err(Error::Validation {
                message: format!("Unknown recipient: {other}"),
            }),
        }
    }
}

/// Who fronted the cash. This is a two-party ledger; there is no third payer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, DeriveDisplay, Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
pub enum Payer {
    /// Paolo
    #[sea_orm(string_value = "Paolo")]
    Paolo,
    /// Mary
    #[sea_orm(string_value = "Mary")]
    Mary,
}

impl Payer {
    /// The other payer.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Paolo => Self::Mary,
            Self::Mary => Self::Paolo,
        }
    }
}

impl std::str::FromStr for Payer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paolo" => Ok(Self::Paolo),
            "mary" => Ok(Self::Mary),
            other => Err(Error::Validation {
                message: format!("Unknown payer: {other}"),
            }),
        }
    }
}

/// The occasion a gift was bought for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, DeriveDisplay, Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Occasion {
    /// Christmas
    #[sea_orm(string_value = "Natale")]
    Natale,
    /// Birthday
    #[sea_orm(string_value = "Compleanno")]
    Compleanno,
    /// Anniversary
    #[sea_orm(string_value = "Anniversario")]
    Anniversario,
    /// Anything else
    #[sea_orm(string_value = "Altro")]
    Altro,
}

impl Occasion {
    /// Parses a sheet cell, bucketing anything unrecognized into [`Occasion::Altro`].
    #[must_use]
    pub fn lenient(value: &str) -> Self {
        value.parse().unwrap_or(Self::Altro)
    }
}

impl std::str::FromStr for Occasion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "natale" => Ok(Self::Natale),
            "compleanno" => Ok(Self::Compleanno),
            "anniversario" => Ok(Self::Anniversario),
            "altro" => Ok(Self::Altro),
            other => Err(Error::Validation {
                message: format!("Unknown occasion: {other}"),
            }),
        }
    }
}

/// Gift database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "gifts")]
pub struct Model {
    /// Opaque unique identifier, assigned at creation, never reused
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// What the gift is
    pub title: String,
    /// Store the gift was bought from
    pub source: String,
    /// Sticker price (non-negative; currency-agnostic)
    pub cost: f64,
    /// Who the gift is for
    pub recipient: Recipient,
    /// Who fronted the cash
    pub payer: Payer,
    /// What the gift was bought for
    pub occasion: Occasion,
    /// Calendar year the gift belongs to
    pub year: i32,
    /// When the record was created; drives date ordering
    pub created_at: DateTimeUtc,
    /// Whether the gift has arrived
    pub is_received: bool,
    /// Whether the cost is nominally shared 50/50 between the two payers
    pub is_split: bool,
    /// Whether the gift was returned (drops out of all financial totals)
    pub is_returned: bool,
    /// Whether the counterpart already reimbursed their share in cash
    pub is_repaid: bool,
    /// Whether the gift is manually excluded from financial totals
    pub is_excluded: bool,
    /// Soft delete flag - hidden from every view, kept in the store for audit
    pub is_deleted: bool,
    /// Optional product image
    pub image_url: Option<String>,
    /// Optional product page link
    pub product_url: Option<String>,
    /// Optional shipment tracking link
    pub tracking_url: Option<String>,
    /// Optional order detail page link
    pub order_detail_url: Option<String>,
}

/// Gifts have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
