//! Shared test utilities for `GiftBuddy`.
//!
//! This module provides common helper functions for setting up test
//! databases, building gift records with sensible defaults, and a mock
//! remote store for exercising the optimistic sync paths without a network.

use crate::{
    core::gift::{GiftDraft, create_gift},
    entities::{Occasion, Payer, Recipient, gift},
    errors::{Error, Result},
    sync::{GiftRow, RemoteStore},
};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use sea_orm::DatabaseConnection;
use std::sync::Mutex;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds an in-memory gift model for the pure settlement/filter tests.
///
/// # Defaults
/// * `title`: the id
/// * `occasion`: `Natale`
/// * `year`: 2025
/// * `created_at`: epoch
/// * all flags false, no links
///
/// The closure customizes whatever a test cares about.
pub fn gift_model(
    id: &str,
    cost: f64,
    payer: Payer,
    recipient: Recipient,
    customize: impl FnOnce(&mut gift::Model),
) -> gift::Model {
    let mut model = gift::Model {
        id: id.to_string(),
        title: id.to_string(),
        source: String::new(),
        cost,
        recipient,
        payer,
        occasion: Occasion::Natale,
        year: 2025,
        created_at: Utc.timestamp_millis_opt(0).single().expect("epoch is valid"),
        is_received: false,
        is_split: false,
        is_returned: false,
        is_repaid: false,
        is_excluded: false,
        is_deleted: false,
        image_url: None,
        product_url: None,
        tracking_url: None,
        order_detail_url: None,
    };
    customize(&mut model);
    model
}

/// Builds a draft with sensible defaults for CRUD tests.
///
/// # Defaults
/// * `cost`: 10.0
/// * `recipient`: Jacopo, `payer`: Paolo, `occasion`: Natale, `year`: 2025
#[must_use]
pub fn test_draft(title: &str) -> GiftDraft {
    GiftDraft::new(
        title,
        10.0,
        Recipient::Jacopo,
        Payer::Paolo,
        Occasion::Natale,
        2025,
    )
}

/// Creates a test gift in the database with custom cost and payer.
pub async fn create_test_gift(
    db: &DatabaseConnection,
    title: &str,
    cost: f64,
    payer: Payer,
) -> Result<gift::Model> {
    let mut draft = test_draft(title);
    draft.cost = cost;
    draft.payer = payer;
    create_gift(db, draft).await
}

/// In-memory [`RemoteStore`] recording every call, optionally failing all
/// writes to drive the rollback paths.
#[derive(Default)]
pub struct MockRemote {
    fail: bool,
    rows: Mutex<Vec<GiftRow>>,
    saved: Mutex<Vec<GiftRow>>,
    deleted: Mutex<Vec<GiftRow>>,
}

impl MockRemote {
    /// A remote whose every call fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Sets the rows the next `fetch_all` returns.
    pub fn seed_rows(&self, rows: Vec<GiftRow>) {
        *self.rows.lock().expect("lock") = rows;
    }

    /// Rows received through `upsert`, in call order.
    #[must_use]
    pub fn saved_rows(&self) -> Vec<GiftRow> {
        self.saved.lock().expect("lock").clone()
    }

    /// Rows received through `soft_delete`, in call order.
    #[must_use]
    pub fn deleted_rows(&self) -> Vec<GiftRow> {
        self.deleted.lock().expect("lock").clone()
    }

    fn check(&self) -> Result<()> {
        if self.fail {
            return Err(Error::Config {
                message: "mock remote failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for MockRemote {
    async fn fetch_all(&self) -> Result<Vec<GiftRow>> {
        self.check()?;
        Ok(self.rows.lock().expect("lock").clone())
    }

    async fn upsert(&self, row: &GiftRow) -> Result<()> {
        self.check()?;
        self.saved.lock().expect("lock").push(row.clone());
        Ok(())
    }

    async fn soft_delete(&self, row: &GiftRow) -> Result<()> {
        self.check()?;
        self.deleted.lock().expect("lock").push(row.clone());
        Ok(())
    }
}
