//! Optimistic synchronization between the local cache and the remote store.
//!
//! Every mutation follows the same discipline: snapshot the current local
//! state, apply the change locally so the UI sees it immediately, then push
//! it to the remote store. A write is `Pending` between those two steps and
//! ends `Confirmed` or, if the remote push fails, `RolledBack` with the
//! local state restored to the snapshot. Running without a configured
//! remote confirms writes immediately.

use crate::{
    core::gift::{GiftDraft, GiftFlag},
    entities::{Gift, gift},
    errors::Result,
    sync::{client::RemoteStore, row::GiftRow},
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, TransactionTrait};
use tracing::{info, warn};

/// Lifecycle of one optimistic write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteState {
    /// Applied locally, remote push still in flight
    Pending,
    /// The remote store accepted the write
    Confirmed,
    /// The remote push failed and the local change was reverted
    RolledBack,
}

/// Replaces the entire local gift cache with the remote table.
///
/// Rows that cannot be converted (no id, unknown payer) are skipped with a
/// warning; everything else lands in one transaction so readers never see a
/// half-replaced cache. Returns the number of rows loaded.
pub async fn refresh_from_remote<S: RemoteStore>(
    db: &DatabaseConnection,
    store: &S,
) -> Result<usize> {
    let rows = store.fetch_all().await?;
    let total = rows.len();

    let mut models = Vec::with_capacity(total);
    for row in rows {
        match gift::Model::try_from(row) {
            Ok(model) => models.push(model),
            Err(e) => warn!("Skipping sheet row: {e}"),
        }
    }

    let skipped = total - models.len();
    let loaded = models.len();

    let txn = db.begin().await?;
    Gift::delete_many().exec(&txn).await?;
    for model in models {
        model.into_active_model().reset_all().insert(&txn).await?;
    }
    txn.commit().await?;

    info!("Refreshed {loaded} gifts from remote ({skipped} rows skipped)");
    Ok(loaded)
}

/// Creates a gift locally and pushes it to the remote store.
///
/// On remote failure the freshly inserted row is removed again; it never
/// existed remotely, so removing the optimistic copy is the rollback.
pub async fn create_gift<S: RemoteStore>(
    db: &DatabaseConnection,
    store: Option<&S>,
    draft: GiftDraft,
) -> Result<(gift::Model, WriteState)> {
    let created = crate::core::gift::create_gift(db, draft).await?;
    let state = push_upsert(db, store, &created, None).await?;
    Ok((created, state))
}

/// Overwrites a gift's editable fields locally and pushes the result.
pub async fn edit_gift<S: RemoteStore>(
    db: &DatabaseConnection,
    store: Option<&S>,
    id: &str,
    draft: GiftDraft,
) -> Result<(gift::Model, WriteState)> {
    let snapshot = crate::core::gift::find_gift(db, id).await?;
    let updated = crate::core::gift::update_gift(db, &snapshot.id, draft).await?;
    let state = push_upsert(db, store, &updated, Some(snapshot)).await?;
    Ok((updated, state))
}

/// Flips one status flag locally and pushes the result.
pub async fn toggle_gift_flag<S: RemoteStore>(
    db: &DatabaseConnection,
    store: Option<&S>,
    id: &str,
    flag: GiftFlag,
) -> Result<(gift::Model, WriteState)> {
    let snapshot = crate::core::gift::find_gift(db, id).await?;
    let updated = crate::core::gift::toggle_flag(db, &snapshot.id, flag).await?;
    let state = push_upsert(db, store, &updated, Some(snapshot)).await?;
    Ok((updated, state))
}

/// Soft-deletes a gift locally and pushes the tombstone.
pub async fn delete_gift<S: RemoteStore>(
    db: &DatabaseConnection,
    store: Option<&S>,
    id: &str,
) -> Result<(gift::Model, WriteState)> {
    let snapshot = crate::core::gift::find_gift(db, id).await?;
    let deleted = crate::core::gift::soft_delete_gift(db, &snapshot.id).await?;

    // The write is Pending from here until the remote answers.
    let Some(store) = store else {
        return Ok((deleted, WriteState::Confirmed));
    };

    let state = match store.soft_delete(&GiftRow::from(deleted.clone())).await {
        Ok(()) => WriteState::Confirmed,
        Err(e) => {
            warn!("Remote delete failed for {}, rolling back: {e}", deleted.id);
            restore_snapshot(db, snapshot).await?;
            WriteState::RolledBack
        }
    };

    Ok((deleted, state))
}

/// Pushes an upserted gift to the remote store, rolling the local cache back
/// to `snapshot` on failure. `None` snapshot means the gift was just created.
async fn push_upsert<S: RemoteStore>(
    db: &DatabaseConnection,
    store: Option<&S>,
    current: &gift::Model,
    snapshot: Option<gift::Model>,
) -> Result<WriteState> {
    // The write is Pending from here until the remote answers.
    let Some(store) = store else {
        return Ok(WriteState::Confirmed);
    };

    let state = match store.upsert(&GiftRow::from(current.clone())).await {
        Ok(()) => WriteState::Confirmed,
        Err(e) => {
            warn!("Remote save failed for {}, rolling back: {e}", current.id);
            match snapshot {
                Some(previous) => restore_snapshot(db, previous).await?,
                None => {
                    Gift::delete_by_id(current.id.clone()).exec(db).await?;
                }
            }
            WriteState::RolledBack
        }
    };

    Ok(state)
}

/// Restores a full row to its last known-good state.
async fn restore_snapshot(db: &DatabaseConnection, snapshot: gift::Model) -> Result<()> {
    snapshot.into_active_model().reset_all().update(db).await?;
    Ok(())
}
