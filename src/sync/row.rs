//! Wire row shape of the remote sheet store.
//!
//! The remote store is a spreadsheet fronted by a web app: every cell comes
//! back as whatever the sheet holds, so booleans arrive as `true`, `"TRUE"`,
//! or `1`, and numbers sometimes arrive as strings. Ingest coerces rather
//! than validates: malformed numerics become 0, unknown recipients and
//! occasions fall into their catch-all buckets. The one thing that is not
//! coerced is the payer, because a two-party ledger cannot absorb a third
//! payer; rows with an unknown payer fail conversion and get skipped
//! upstream.

use crate::{
    entities::{Occasion, Payer, Recipient, gift},
    errors::{Error, Result},
};
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One row of the remote sheet, in its 19-column contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GiftRow {
    /// Unique row id; rows without one are dropped on fetch
    #[serde(deserialize_with = "stringish")]
    pub id: String,
    /// Gift title
    #[serde(deserialize_with = "stringish")]
    pub title: String,
    /// Store name
    #[serde(deserialize_with = "stringish")]
    pub source: String,
    /// Sticker price; malformed or negative cells coerce to 0
    #[serde(deserialize_with = "lenient_cost")]
    pub cost: f64,
    /// Recipient cell; unknown values bucket into `Altri` on conversion
    #[serde(deserialize_with = "stringish")]
    pub recipient: String,
    /// Payer cell; must parse into one of the two payers
    #[serde(deserialize_with = "stringish")]
    pub payer: String,
    /// Occasion cell; unknown values bucket into `Altro` on conversion
    #[serde(deserialize_with = "stringish")]
    pub occasion: String,
    /// Calendar year
    #[serde(deserialize_with = "lenient_year")]
    pub year: i32,
    /// Creation time in epoch milliseconds; missing cells read as 0
    #[serde(deserialize_with = "lenient_millis")]
    pub created_at: i64,
    /// Received flag
    #[serde(deserialize_with = "truthy")]
    pub is_received: bool,
    /// Split flag
    #[serde(deserialize_with = "truthy")]
    pub is_split: bool,
    /// Returned flag
    #[serde(deserialize_with = "truthy")]
    pub is_returned: bool,
    /// Repaid flag
    #[serde(deserialize_with = "truthy")]
    pub is_repaid: bool,
    /// Excluded flag
    #[serde(deserialize_with = "truthy")]
    pub is_excluded: bool,
    /// Soft-delete flag
    #[serde(deserialize_with = "truthy")]
    pub is_deleted: bool,
    /// Product image URL, empty when absent
    #[serde(deserialize_with = "stringish")]
    pub image_url: String,
    /// Product page URL, empty when absent
    #[serde(deserialize_with = "stringish")]
    pub product_url: String,
    /// Shipment tracking URL, empty when absent
    #[serde(deserialize_with = "stringish")]
    pub tracking_url: String,
    /// Order detail URL, empty when absent
    #[serde(deserialize_with = "stringish")]
    pub order_detail_url: String,
}

/// Any JSON scalar a sheet cell can produce.
#[derive(Deserialize)]
#[serde(untagged)]
enum Cell {
    Bool(bool),
    Num(f64),
    Str(String),
}

fn truthy<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let cell = Option::<Cell>::deserialize(deserializer)?;
    Ok(match cell {
        Some(Cell::Bool(b)) => b,
        #[allow(clippy::float_cmp)] // exact sentinel written by the sheet
        Some(Cell::Num(n)) => n == 1.0,
        Some(Cell::Str(s)) => {
            let s = s.trim();
            s.eq_ignore_ascii_case("true") || s == "1"
        }
        None => false,
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let cell = Option::<Cell>::deserialize(deserializer)?;
    Ok(match cell {
        Some(Cell::Num(n)) if n.is_finite() => n,
        Some(Cell::Str(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

fn lenient_cost<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    // Negative costs cannot exist in the ledger; treat them as malformed.
    lenient_f64(deserializer).map(|v| v.max(0.0))
}

#[allow(clippy::cast_possible_truncation)] // years fit comfortably in i32
fn lenient_year<'de, D>(deserializer: D) -> std::result::Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_f64(deserializer).map(|v| v as i32)
}

#[allow(clippy::cast_possible_truncation)] // epoch millis fit in i64
fn lenient_millis<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_f64(deserializer).map(|v| v as i64)
}

fn stringish<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let cell = Option::<Cell>::deserialize(deserializer)?;
    Ok(match cell {
        Some(Cell::Str(s)) => s.trim().to_string(),
        #[allow(clippy::cast_possible_truncation)] // integral sheet cells
        Some(Cell::Num(n)) => {
            if n.fract() == 0.0 {
                (n as i64).to_string()
            } else {
                n.to_string()
            }
        }
        Some(Cell::Bool(b)) => b.to_string(),
        None => String::new(),
    })
}

fn none_if_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

impl TryFrom<GiftRow> for gift::Model {
    type Error = Error;

    fn try_from(row: GiftRow) -> Result<Self> {
        if row.id.is_empty() {
            return Err(Error::MalformedRow {
                message: "row has no id".to_string(),
            });
        }

        let payer: Payer = row.payer.parse().map_err(|_| Error::MalformedRow {
            message: format!("unknown payer '{}' in row {}", row.payer, row.id),
        })?;

        let created_at = Utc
            .timestamp_millis_opt(row.created_at)
            .single()
            .unwrap_or_default();

        Ok(Self {
            id: row.id,
            title: row.title,
            source: row.source,
            cost: row.cost,
            recipient: Recipient::lenient(&row.recipient),
            payer,
            occasion: Occasion::lenient(&row.occasion),
            year: row.year,
            created_at,
            is_received: row.is_received,
            is_split: row.is_split,
            is_returned: row.is_returned,
            is_repaid: row.is_repaid,
            is_excluded: row.is_excluded,
            is_deleted: row.is_deleted,
            image_url: none_if_empty(row.image_url),
            product_url: none_if_empty(row.product_url),
            tracking_url: none_if_empty(row.tracking_url),
            order_detail_url: none_if_empty(row.order_detail_url),
        })
    }
}

impl From<gift::Model> for GiftRow {
    fn from(model: gift::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            source: model.source,
            cost: model.cost,
            recipient: model.recipient.to_string(),
            payer: model.payer.to_string(),
            occasion: model.occasion.to_string(),
            year: model.year,
            created_at: model.created_at.timestamp_millis(),
            is_received: model.is_received,
            is_split: model.is_split,
            is_returned: model.is_returned,
            is_repaid: model.is_repaid,
            is_excluded: model.is_excluded,
            is_deleted: model.is_deleted,
            image_url: model.image_url.unwrap_or_default(),
            product_url: model.product_url.unwrap_or_default(),
            tracking_url: model.tracking_url.unwrap_or_default(),
            order_detail_url: model.order_detail_url.unwrap_or_default(),
        }
    }
}
