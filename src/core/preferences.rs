//! Persisted presentation preferences.
//!
//! View mode and sort criteria survive restarts in the `system_state`
//! key-value table. They are loaded once at startup and written back when
//! changed by a command; unknown or missing values fall back to defaults
//! rather than erroring, so a stale value can never brick the bot.

use crate::{
    core::filter::SortKey,
    entities::{SystemState, system_state},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};
use tracing::debug;

/// Key under which the preferred view mode is stored.
pub const VIEW_MODE_KEY: &str = "view_mode";
/// Key under which the preferred sort criteria is stored.
pub const SORT_CRITERIA_KEY: &str = "sort_criteria";

/// How the gift list is laid out by the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    /// Card grid (the default)
    #[default]
    Grid,
    /// One gift per line
    List,
    /// Dense grid
    Compact,
    /// Tabular rows
    Table,
}

impl ViewMode {
    /// The persisted token for this view mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::List => "list",
            Self::Compact => "compact",
            Self::Table => "table",
        }
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ViewMode {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" => Ok(Self::Grid),
            "list" => Ok(Self::List),
            "compact" => Ok(Self::Compact),
            "table" => Ok(Self::Table),
            other => Err(Error::Validation {
                message: format!("Unknown view mode: {other}"),
            }),
        }
    }
}

/// The preferences bundle injected into the presentation layer at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preferences {
    /// Preferred list layout
    pub view_mode: ViewMode,
    /// Preferred sort order
    pub sort_key: SortKey,
}

/// Reads a raw value from the `system_state` table.
pub async fn get_value(db: &DatabaseConnection, key: &str) -> Result<Option<String>> {
    let row = SystemState::find()
        .filter(system_state::Column::Key.eq(key))
        .one(db)
        .await?;
    Ok(row.map(|r| r.value))
}

/// Writes a value into the `system_state` table, updating in place when the
/// key already exists.
pub async fn set_value(db: &DatabaseConnection, key: &str, value: &str) -> Result<()> {
    let existing = SystemState::find()
        .filter(system_state::Column::Key.eq(key))
        .one(db)
        .await?;

    match existing {
        Some(row) => {
            let mut model: system_state::ActiveModel = row.into();
            model.value = Set(value.to_string());
            model.updated_at = Set(chrono::Utc::now());
            model.update(db).await?;
        }
        None => {
            let model = system_state::ActiveModel {
                key: Set(key.to_string()),
                value: Set(value.to_string()),
                updated_at: Set(chrono::Utc::now()),
                ..Default::default()
            };
            model.insert(db).await?;
        }
    }

    debug!("Persisted preference {key} = {value}");
    Ok(())
}

/// Loads both preferences, defaulting anything missing or unparsable.
pub async fn load_preferences(db: &DatabaseConnection) -> Result<Preferences> {
    let view_mode = get_value(db, VIEW_MODE_KEY)
        .await?
        .and_then(|v| v.parse().ok())
        .unwrap_or_default();
    let sort_key = get_value(db, SORT_CRITERIA_KEY)
        .await?
        .and_then(|v| v.parse().ok())
        .unwrap_or_default();

    Ok(Preferences {
        view_mode,
        sort_key,
    })
}

/// Persists the preferred view mode.
pub async fn save_view_mode(db: &DatabaseConnection, mode: ViewMode) -> Result<()> {
    set_value(db, VIEW_MODE_KEY, mode.as_str()).await
}

/// Persists the preferred sort criteria.
pub async fn save_sort_key(db: &DatabaseConnection, sort: SortKey) -> Result<()> {
    set_value(db, SORT_CRITERIA_KEY, sort.as_str()).await
}
