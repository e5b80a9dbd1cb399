//! Unified error handling for `GiftBuddy`.
//!
//! A single `thiserror` enum covers every layer: configuration, the local
//! database, the remote sheet store, and the Discord framework. The core
//! settlement and filter functions are total and never construct an error.

use thiserror::Error;

/// Application-wide error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration loading or parsing failed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// A gift lookup by id or title found nothing
    #[error("Gift not found: {reference}")]
    GiftNotFound {
        /// The id or title that was searched for
        reference: String,
    },

    /// A monetary amount was negative, NaN, or infinite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The offending value
        amount: f64,
    },

    /// User input failed a structural check (empty title, unknown flag name, ...)
    #[error("Validation error: {message}")]
    Validation {
        /// What went wrong
        message: String,
    },

    /// A remote sheet row could not be converted into a gift record
    #[error("Malformed sheet row: {message}")]
    MalformedRow {
        /// What went wrong
        message: String,
    },

    /// `SeaORM` database error
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// HTTP error talking to the remote sheet store
    #[error("Remote store error: {0}")]
    Remote(#[from] reqwest::Error),

    /// JSON (de)serialization error at the remote boundary
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable missing or malformed
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// String formatting error (embed building)
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    /// Numeric conversion error
    #[error("Conversion error: {0}")]
    TryFromInt(#[from] std::num::TryFromIntError),

    /// Serenity/Poise framework error
    #[error("Discord framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
