//! Remote store synchronization.
//!
//! The local SQLite database is a cache of the remote sheet: [`service`]
//! refreshes it wholesale and pushes every mutation with an optimistic
//! write-then-rollback discipline, [`client`] speaks the sheet web app
//! protocol, and [`row`] is the wire shape with its ingest coercions.

/// HTTP client and the `RemoteStore` trait
pub mod client;
/// Wire row shape and coercions
pub mod row;
/// Optimistic update service over the local cache
pub mod service;

pub use client::{RemoteStore, SheetClient};
pub use row::GiftRow;
pub use service::WriteState;
