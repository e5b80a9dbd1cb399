//! HTTP client for the spreadsheet-backed remote store.
//!
//! The store is an Apps-Script-style web app: GET returns the whole table as
//! a JSON array of rows, POST takes `{"action": "save"|"delete", "data": row}`
//! and upserts the row by id. Delete is an upsert too, with the soft-delete
//! flag set; the remote never physically removes a row.

use crate::{errors::Result, sync::row::GiftRow};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Request timeout for sheet calls. Apps Script cold starts are slow.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The remote tabular store, as seen by the sync service.
///
/// Abstracting this behind a trait keeps the optimistic-update logic
/// testable without a network.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetches every row of the store, dropping rows without an id.
    async fn fetch_all(&self) -> Result<Vec<GiftRow>>;

    /// Inserts or replaces one row, matched by id.
    async fn upsert(&self, row: &GiftRow) -> Result<()>;

    /// Marks one row as deleted in the store. The row stays for audit.
    async fn soft_delete(&self, row: &GiftRow) -> Result<()>;
}

/// POST body of the sheet web app.
#[derive(Serialize)]
struct SheetCommand<'a> {
    action: &'a str,
    data: &'a GiftRow,
}

/// Concrete [`RemoteStore`] over the sheet web app endpoint.
#[derive(Debug, Clone)]
pub struct SheetClient {
    http: reqwest::Client,
    endpoint: String,
}

impl SheetClient {
    /// Builds a client for the given web app URL.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    /// The configured endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, action: &str, row: &GiftRow) -> Result<()> {
        debug!("Sheet {action} for row {}", row.id);
        self.http
            .post(&self.endpoint)
            .json(&SheetCommand { action, data: row })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for SheetClient {
    async fn fetch_all(&self) -> Result<Vec<GiftRow>> {
        // Cache-busting parameter: the web app caches GET responses.
        let url = format!(
            "{}?t={}",
            self.endpoint,
            chrono::Utc::now().timestamp_millis()
        );
        let rows: Vec<GiftRow> = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(rows.into_iter().filter(|r| !r.id.is_empty()).collect())
    }

    async fn upsert(&self, row: &GiftRow) -> Result<()> {
        self.post("save", row).await
    }

    async fn soft_delete(&self, row: &GiftRow) -> Result<()> {
        // The remote marks the row deleted on "delete", but sending the flag
        // explicitly keeps the payload self-describing.
        let mut tombstone = row.clone();
        tombstone.is_deleted = true;
        self.post("delete", &tombstone).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_command_payload_shape() {
        let row = GiftRow {
            id: "abc123xyz".to_string(),
            title: "Lego set".to_string(),
            payer: "Paolo".to_string(),
            ..GiftRow::default()
        };

        let value =
            serde_json::to_value(SheetCommand {
                action: "save",
                data: &row,
            })
            .expect("serializes");

        assert_eq!(value["action"], "save");
        assert_eq!(value["data"]["id"], "abc123xyz");
        assert_eq!(value["data"]["title"], "Lego set");
        assert_eq!(value["data"]["isDeleted"], false);
    }

    #[test]
    fn test_client_keeps_endpoint() {
        let client = SheetClient::new("https://example.com/exec").expect("builds");
        assert_eq!(client.endpoint(), "https://example.com/exec");
    }
}
