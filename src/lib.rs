//! Position-indexed inventory of antibody samples.
//!
//! Samples live in the grid positions of named storage containers. The
//! [`Inventory`] owns the in-memory database and persists it to a key-value
//! slot after every change; `logic` holds the pure queries (remaining
//! quantity, search, low-stock warnings) that a view layer renders.

pub mod config;
pub mod error;
pub mod inventory;
pub mod logic;
pub mod model;
pub mod store;

pub use config::AppConfig;
pub use error::{InventoryError, Result};
pub use inventory::{Inventory, Snapshot};
pub use logic::{
    assess, compute_remaining, count_by_name, format_quantity, list_warnings, search, Measure,
    NameStock, QuantityStatus, SearchMatch, Warning,
};
pub use model::*;
pub use store::{FileSlots, MemorySlots, PersistenceGateway, SlotStore};

/// Install the `env_logger` backend with an `info` default. Safe to call
/// more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
