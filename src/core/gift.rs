//! Gift business logic - Handles all gift-record operations.
//!
//! Provides functions for creating, retrieving, updating, and managing gift
//! records in the local store. Edits are full-record overwrites rather than
//! partial patches, mirroring how the remote sheet stores rows. Soft delete
//! is the only removal: the row stays in place with `is_deleted` set.

use crate::{
    entities::{Gift, Occasion, Payer, Recipient, gift},
    errors::{Error, Result},
};
use rand::Rng;
use sea_orm::{QueryOrder, Set, prelude::*};

/// Characters used for generated gift ids (base-36, lowercase).
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
/// Length of generated gift ids.
const ID_LEN: usize = 9;

/// The user-editable fields of a gift, everything except identity and the
/// soft-delete flag. Used for both creation and full-record updates.
#[derive(Debug, Clone, PartialEq)]
pub struct GiftDraft {
    /// What the gift is
    pub title: String,
    /// Store the gift was bought from
    pub source: String,
    /// Sticker price
    pub cost: f64,
    /// Who the gift is for
    pub recipient: Recipient,
    /// Who fronted the cash
    pub payer: Payer,
    /// What the gift was bought for
    pub occasion: Occasion,
    /// Calendar year the gift belongs to
    pub year: i32,
    /// Whether the gift has arrived
    pub is_received: bool,
    /// Whether the cost is shared 50/50
    pub is_split: bool,
    /// Whether the gift was returned
    pub is_returned: bool,
    /// Whether the counterpart already reimbursed their share
    pub is_repaid: bool,
    /// Whether the gift is excluded from financial totals
    pub is_excluded: bool,
    /// Optional product image
    pub image_url: Option<String>,
    /// Optional product page link
    pub product_url: Option<String>,
    /// Optional shipment tracking link
    pub tracking_url: Option<String>,
    /// Optional order detail page link
    pub order_detail_url: Option<String>,
}

impl GiftDraft {
    /// Creates a draft with all flags false and no links.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        cost: f64,
        recipient: Recipient,
        payer: Payer,
        occasion: Occasion,
        year: i32,
    ) -> Self {
        Self {
            title: title.into(),
            source: String::new(),
            cost,
            recipient,
            payer,
            occasion,
            year,
            is_received: false,
            is_split: false,
            is_returned: false,
            is_repaid: false,
            is_excluded: false,
            image_url: None,
            product_url: None,
            tracking_url: None,
            order_detail_url: None,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation {
                message: "Gift title cannot be empty".to_string(),
            });
        }
        if !self.cost.is_finite() || self.cost < 0.0 {
            return Err(Error::InvalidAmount { amount: self.cost });
        }
        Ok(())
    }
}

/// The five user-toggleable status flags of a gift.
///
/// `is_deleted` is deliberately absent: deletion goes through
/// [`soft_delete_gift`] so it cannot be flipped back by a stray toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GiftFlag {
    /// The gift has arrived
    Received,
    /// The cost is shared 50/50
    Split,
    /// The gift was returned
    Returned,
    /// The counterpart reimbursed their share
    Repaid,
    /// Excluded from financial totals
    Excluded,
}

impl std::str::FromStr for GiftFlag {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "received" => Ok(Self::Received),
            "split" => Ok(Self::Split),
            "returned" => Ok(Self::Returned),
            "repaid" => Ok(Self::Repaid),
            "excluded" => Ok(Self::Excluded),
            other => Err(Error::Validation {
                message: format!("Unknown flag: {other}"),
            }),
        }
    }
}

impl std::fmt::Display for GiftFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Received => "received",
            Self::Split => "split",
            Self::Returned => "returned",
            Self::Repaid => "repaid",
            Self::Excluded => "excluded",
        };
        f.write_str(name)
    }
}

/// Generates a fresh 9-character base-36 gift id.
///
/// With 36^9 possible ids, collisions inside a two-person ledger are not a
/// practical concern; the id column's primary-key constraint backstops it.
#[must_use]
pub fn generate_gift_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// Retrieves all non-deleted gifts, newest first.
///
/// This is the record set every view starts from; the filter stage narrows
/// it further and the settlement engine consumes its output.
pub async fn get_all_active_gifts(db: &DatabaseConnection) -> Result<Vec<gift::Model>> {
    Gift::find()
        .filter(gift::Column::IsDeleted.eq(false))
        .order_by_desc(gift::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a gift by its unique id, deleted or not.
pub async fn get_gift_by_id(db: &DatabaseConnection, id: &str) -> Result<Option<gift::Model>> {
    Gift::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Resolves a user-supplied reference to an active gift.
///
/// Tries the reference as an id first, then as an exact title match
/// (case-insensitive) among non-deleted gifts. Commands accept either, so
/// users can pick from title autocomplete or paste an id.
pub async fn find_gift(db: &DatabaseConnection, reference: &str) -> Result<gift::Model> {
    if let Some(gift) = get_gift_by_id(db, reference.trim()).await? {
        if !gift.is_deleted {
            return Ok(gift);
        }
    }

    let wanted = reference.trim().to_lowercase();
    let by_title = get_all_active_gifts(db)
        .await?
        .into_iter()
        .find(|g| g.title.to_lowercase() == wanted);

    by_title.ok_or_else(|| Error::GiftNotFound {
        reference: reference.to_string(),
    })
}

/// Creates a new gift record from a draft.
///
/// Assigns a fresh id and creation timestamp; `is_deleted` starts false.
/// The draft is validated first: empty titles and negative or non-finite
/// costs are rejected.
pub async fn create_gift(db: &DatabaseConnection, draft: GiftDraft) -> Result<gift::Model> {
    draft.validate()?;

    let model = gift::ActiveModel {
        id: Set(generate_gift_id()),
        title: Set(draft.title.trim().to_string()),
        source: Set(draft.source),
        cost: Set(draft.cost),
        recipient: Set(draft.recipient),
        payer: Set(draft.payer),
        occasion: Set(draft.occasion),
        year: Set(draft.year),
        created_at: Set(chrono::Utc::now()),
        is_received: Set(draft.is_received),
        is_split: Set(draft.is_split),
        is_returned: Set(draft.is_returned),
        is_repaid: Set(draft.is_repaid),
        is_excluded: Set(draft.is_excluded),
        is_deleted: Set(false),
        image_url: Set(draft.image_url),
        product_url: Set(draft.product_url),
        tracking_url: Set(draft.tracking_url),
        order_detail_url: Set(draft.order_detail_url),
    };

    model.insert(db).await.map_err(Into::into)
}

/// Overwrites the editable fields of an existing gift with a draft.
///
/// `id`, `created_at`, and `is_deleted` are preserved; everything else is
/// replaced, matching the full-record upsert semantics of the remote row.
pub async fn update_gift(
    db: &DatabaseConnection,
    id: &str,
    draft: GiftDraft,
) -> Result<gift::Model> {
    draft.validate()?;

    let existing = get_gift_by_id(db, id).await?.ok_or_else(|| Error::GiftNotFound {
        reference: id.to_string(),
    })?;
    if existing.is_deleted {
        return Err(Error::GiftNotFound {
            reference: id.to_string(),
        });
    }

    let model = gift::ActiveModel {
        id: Set(existing.id),
        title: Set(draft.title.trim().to_string()),
        source: Set(draft.source),
        cost: Set(draft.cost),
        recipient: Set(draft.recipient),
        payer: Set(draft.payer),
        occasion: Set(draft.occasion),
        year: Set(draft.year),
        created_at: Set(existing.created_at),
        is_received: Set(draft.is_received),
        is_split: Set(draft.is_split),
        is_returned: Set(draft.is_returned),
        is_repaid: Set(draft.is_repaid),
        is_excluded: Set(draft.is_excluded),
        is_deleted: Set(existing.is_deleted),
        image_url: Set(draft.image_url),
        product_url: Set(draft.product_url),
        tracking_url: Set(draft.tracking_url),
        order_detail_url: Set(draft.order_detail_url),
    };

    model.update(db).await.map_err(Into::into)
}

/// Sets one status flag on an active gift to an explicit value.
pub async fn set_flag(
    db: &DatabaseConnection,
    id: &str,
    flag: GiftFlag,
    value: bool,
) -> Result<gift::Model> {
    let existing = get_gift_by_id(db, id).await?.ok_or_else(|| Error::GiftNotFound {
        reference: id.to_string(),
    })?;
    if existing.is_deleted {
        return Err(Error::GiftNotFound {
            reference: id.to_string(),
        });
    }

    let mut model: gift::ActiveModel = existing.into();
    match flag {
        GiftFlag::Received => model.is_received = Set(value),
        GiftFlag::Split => model.is_split = Set(value),
        GiftFlag::Returned => model.is_returned = Set(value),
        GiftFlag::Repaid => model.is_repaid = Set(value),
        GiftFlag::Excluded => model.is_excluded = Set(value),
    }

    model.update(db).await.map_err(Into::into)
}

/// Flips one status flag on an active gift and returns the updated record.
pub async fn toggle_flag(db: &DatabaseConnection, id: &str, flag: GiftFlag) -> Result<gift::Model> {
    let existing = get_gift_by_id(db, id).await?.ok_or_else(|| Error::GiftNotFound {
        reference: id.to_string(),
    })?;
    if existing.is_deleted {
        return Err(Error::GiftNotFound {
            reference: id.to_string(),
        });
    }

    let current = match flag {
        GiftFlag::Received => existing.is_received,
        GiftFlag::Split => existing.is_split,
        GiftFlag::Returned => existing.is_returned,
        GiftFlag::Repaid => existing.is_repaid,
        GiftFlag::Excluded => existing.is_excluded,
    };

    set_flag(db, id, flag, !current).await
}

/// Logically deletes a gift: the row stays in the store with `is_deleted`
/// set, disappears from every view, and its id is never reused.
pub async fn soft_delete_gift(db: &DatabaseConnection, id: &str) -> Result<gift::Model> {
    let existing = get_gift_by_id(db, id).await?.ok_or_else(|| Error::GiftNotFound {
        reference: id.to_string(),
    })?;

    let mut model: gift::ActiveModel = existing.into();
    model.is_deleted = Set(true);
    model.update(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::{create_test_gift, setup_test_db, test_draft};
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[test]
    fn test_generate_gift_id_shape() {
        let id = generate_gift_id();
        assert_eq!(id.len(), ID_LEN);
        assert!(id.bytes().all(|b| ID_ALPHABET.contains(&b)));

        // Two fresh ids virtually never collide.
        assert_ne!(generate_gift_id(), generate_gift_id());
    }

    #[tokio::test]
    async fn test_create_gift_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        // Empty title
        let mut draft = test_draft("  ");
        let result = create_gift(&db, draft).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { message: _ }
        ));

        // Negative cost
        draft = test_draft("Lego");
        draft.cost = -5.0;
        let result = create_gift(&db, draft).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidAmount { amount: -5.0 }
        ));

        // Non-finite cost
        draft = test_draft("Lego");
        draft.cost = f64::NAN;
        let result = create_gift(&db, draft).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_gift_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let gift = create_test_gift(&db, "Lego set", 49.9, Payer::Paolo).await?;

        assert_eq!(gift.title, "Lego set");
        assert_eq!(gift.cost, 49.9);
        assert_eq!(gift.payer, Payer::Paolo);
        assert_eq!(gift.id.len(), ID_LEN);
        assert!(!gift.is_deleted);
        assert!(!gift.is_split);
        assert!(!gift.is_received);

        // Title is trimmed on insert.
        let trimmed = create_gift(&db, test_draft("  Scarf  ")).await?;
        assert_eq!(trimmed.title, "Scarf");

        Ok(())
    }

    #[tokio::test]
    async fn test_get_all_active_gifts_newest_first() -> Result<()> {
        let db = setup_test_db().await?;

        let first = create_test_gift(&db, "First", 10.0, Payer::Paolo).await?;
        let second = create_test_gift(&db, "Second", 20.0, Payer::Mary).await?;
        soft_delete_gift(&db, &first.id).await?;

        let active = get_all_active_gifts(&db).await?;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, second.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_find_gift_by_id_and_title() -> Result<()> {
        let db = setup_test_db().await?;

        let gift = create_test_gift(&db, "Lego set", 49.9, Payer::Paolo).await?;

        let by_id = find_gift(&db, &gift.id).await?;
        assert_eq!(by_id.id, gift.id);

        let by_title = find_gift(&db, "lego SET").await?;
        assert_eq!(by_title.id, gift.id);

        let missing = find_gift(&db, "nothing here").await;
        assert!(matches!(
            missing.unwrap_err(),
            Error::GiftNotFound { reference: _ }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_find_gift_skips_deleted() -> Result<()> {
        let db = setup_test_db().await?;

        let gift = create_test_gift(&db, "Hidden", 10.0, Payer::Mary).await?;
        soft_delete_gift(&db, &gift.id).await?;

        assert!(find_gift(&db, &gift.id).await.is_err());
        assert!(find_gift(&db, "Hidden").await.is_err());

        Ok(())
    }

    #[tokio::test]
    async fn test_update_gift_preserves_identity() -> Result<()> {
        let db = setup_test_db().await?;

        let gift = create_test_gift(&db, "Lego set", 49.9, Payer::Paolo).await?;

        let mut draft = test_draft("Bigger Lego set");
        draft.cost = 89.9;
        draft.recipient = Recipient::Leonardo;
        draft.is_split = true;
        let updated = update_gift(&db, &gift.id, draft).await?;

        assert_eq!(updated.id, gift.id);
        assert_eq!(updated.created_at, gift.created_at);
        assert_eq!(updated.title, "Bigger Lego set");
        assert_eq!(updated.cost, 89.9);
        assert_eq!(updated.recipient, Recipient::Leonardo);
        assert!(updated.is_split);
        assert!(!updated.is_deleted);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_gift_fails() -> Result<()> {
        let db = setup_test_db().await?;

        let result = update_gift(&db, "zzzzzzzzz", test_draft("Nope")).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::GiftNotFound { reference: _ }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_toggle_flags() -> Result<()> {
        let db = setup_test_db().await?;

        let gift = create_test_gift(&db, "Scarf", 25.0, Payer::Mary).await?;

        let toggled = toggle_flag(&db, &gift.id, GiftFlag::Excluded).await?;
        assert!(toggled.is_excluded);

        let toggled_back = toggle_flag(&db, &gift.id, GiftFlag::Excluded).await?;
        assert!(!toggled_back.is_excluded);

        let received = set_flag(&db, &gift.id, GiftFlag::Received, true).await?;
        assert!(received.is_received);
        // Other flags untouched.
        assert!(!received.is_split);
        assert!(!received.is_returned);

        Ok(())
    }

    #[tokio::test]
    async fn test_soft_delete_keeps_row() -> Result<()> {
        let db = setup_test_db().await?;

        let gift = create_test_gift(&db, "Scarf", 25.0, Payer::Mary).await?;
        let deleted = soft_delete_gift(&db, &gift.id).await?;
        assert!(deleted.is_deleted);

        // Row is still there, just flagged.
        let raw = get_gift_by_id(&db, &gift.id).await?;
        assert!(raw.is_some());
        assert!(raw.unwrap().is_deleted);

        // But gone from the active list.
        assert!(get_all_active_gifts(&db).await?.is_empty());

        Ok(())
    }

    #[test]
    fn test_flag_names_round_trip() {
        for flag in [
            GiftFlag::Received,
            GiftFlag::Split,
            GiftFlag::Returned,
            GiftFlag::Repaid,
            GiftFlag::Excluded,
        ] {
            let parsed: GiftFlag = flag.to_string().parse().expect("known flag");
            assert_eq!(parsed, flag);
        }
        assert!("deleted".parse::<GiftFlag>().is_err());
    }
}
