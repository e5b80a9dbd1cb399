//! Application settings loading.
//!
//! Settings come from an optional `config.toml` next to the binary, with
//! environment variables taking precedence. Nothing here is required: with
//! no file and no environment the app runs against a local `SQLite` file
//! and no remote sheet (local-only mode).

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Fallback local database location.
const DEFAULT_DATABASE_URL: &str = "sqlite://data/gift_buddy.sqlite?mode=rwc";

/// Shape of the optional `config.toml` file.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    /// Database URL override
    pub database_url: Option<String>,
    /// Remote sheet web app URL
    pub sheet_api_url: Option<String>,
}

/// Resolved application configuration, injected at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Where the local cache lives
    pub database_url: String,
    /// Remote sheet web app URL; `None` runs local-only
    pub sheet_api_url: Option<String>,
}

/// Parses a `config.toml` file.
pub fn load_file_config<P: AsRef<Path>>(path: P) -> Result<FileConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the application configuration.
///
/// Resolution order per setting: environment variable, then `config.toml`,
/// then the built-in default. A missing `config.toml` is fine; a present
/// but unparsable one is an error, since silently ignoring it would mask
/// typos.
pub fn load_app_config() -> Result<AppConfig> {
    let file = if Path::new("config.toml").exists() {
        load_file_config("config.toml")?
    } else {
        FileConfig::default()
    };

    let database_url = std::env::var("DATABASE_URL")
        .ok()
        .or(file.database_url)
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

    let sheet_api_url = std::env::var("SHEET_API_URL").ok().or(file.sheet_api_url);

    if sheet_api_url.is_none() {
        info!("No sheet endpoint configured, running local-only");
    }

    Ok(AppConfig {
        database_url,
        sheet_api_url,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_file_config() {
        let toml_str = r#"
            database_url = "sqlite://elsewhere.sqlite"
            sheet_api_url = "https://script.google.com/macros/s/abc/exec"
        "#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.database_url.as_deref(),
            Some("sqlite://elsewhere.sqlite")
        );
        assert_eq!(
            config.sheet_api_url.as_deref(),
            Some("https://script.google.com/macros/s/abc/exec")
        );
    }

    #[test]
    fn test_parse_empty_file_config() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert!(config.database_url.is_none());
        assert!(config.sheet_api_url.is_none());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = load_file_config("definitely/not/here.toml");
        assert!(matches!(
            result.unwrap_err(),
            Error::Config { message: _ }
        ));
    }
}
