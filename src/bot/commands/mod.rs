//! Discord command implementations.

/// Gift management commands (add, edit, list, toggle, remove)
pub mod gift;
/// General utility commands (ping, help, refresh)
pub mod general;
/// Presentation preference commands (sort order, view mode)
pub mod preferences;
/// Settlement reporting command
pub mod settle;

pub use gift::*;
pub use general::*;
pub use preferences::*;
pub use settle::*;
