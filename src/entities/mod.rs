//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod gift;
pub mod system_state;

// Re-export specific types to avoid conflicts
pub use gift::{
    Column as GiftColumn, Entity as Gift, Model as GiftModel, Occasion, Payer, Recipient,
};
pub use system_state::{
    Column as SystemStateColumn, Entity as SystemState, Model as SystemStateModel,
};
