use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::config::{StorageConfig, DEFAULT_DATABASE_KEY, DEFAULT_OPTIONS_KEY};
use crate::error::InventoryError;
use crate::model::{CustomOptions, Database};
use crate::store::traits::SlotStore;

/// Reads and writes the whole database (and the custom dropdown lists) to
/// their key-value slots.
#[derive(Debug)]
pub struct PersistenceGateway<S> {
    slots: S,
    database_key: String,
    options_key: String,
}

impl<S: SlotStore> PersistenceGateway<S> {
    pub fn new(slots: S) -> Self {
        Self::with_keys(slots, DEFAULT_DATABASE_KEY, DEFAULT_OPTIONS_KEY)
    }

    pub fn with_keys(slots: S, database_key: impl Into<String>, options_key: impl Into<String>) -> Self {
        Self {
            slots,
            database_key: database_key.into(),
            options_key: options_key.into(),
        }
    }

    pub fn from_config(slots: S, config: &StorageConfig) -> Self {
        Self::with_keys(slots, &config.database_key, &config.options_key)
    }

    pub fn slots(&self) -> &S {
        &self.slots
    }

    /// The persisted database, normalized.
    ///
    /// Never fails: a missing or unreadable slot yields an empty database.
    /// When normalization changed anything the result is written back.
    pub fn load(&self) -> Database {
        let bytes = match self.slots.read_slot(&self.database_key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Database::new(),
            Err(e) => {
                log::warn!("Could not read slot '{}': {:#}", self.database_key, e);
                return Database::new();
            }
        };

        let mut database = match serde_json::from_slice::<Database>(&bytes) {
            Ok(database) => database,
            Err(e) => {
                log::warn!(
                    "Slot '{}' does not hold a readable database, starting empty: {}",
                    self.database_key,
                    e
                );
                return Database::new();
            }
        };

        if database.normalize() {
            log::info!("Normalized legacy records in '{}'", self.database_key);
            if let Err(e) = self.save(&database) {
                log::warn!("Could not write back normalized database: {:#}", e);
            }
        }
        database
    }

    /// Serialize `database` and overwrite the slot
    pub fn save(&self, database: &Database) -> Result<()> {
        let bytes = export_snapshot(database)?;
        self.slots
            .write_slot(&self.database_key, &bytes)
            .with_context(|| format!("saving database to slot '{}'", self.database_key))
    }

    /// Remembered dropdown values; unreadable content reads as none
    pub fn load_custom_options(&self) -> CustomOptions {
        match self.slots.read_slot(&self.options_key) {
            Ok(Some(bytes)) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                log::warn!("Ignoring unreadable slot '{}': {}", self.options_key, e);
                CustomOptions::default()
            }),
            Ok(None) => CustomOptions::default(),
            Err(e) => {
                log::warn!("Could not read slot '{}': {:#}", self.options_key, e);
                CustomOptions::default()
            }
        }
    }

    pub fn save_custom_options(&self, options: &CustomOptions) -> Result<()> {
        let bytes = serde_json::to_vec(options).context("serializing custom options")?;
        self.slots
            .write_slot(&self.options_key, &bytes)
            .with_context(|| format!("saving custom options to slot '{}'", self.options_key))
    }
}

/// Whole-database bytes, identical to what `save` writes
pub fn export_snapshot(database: &Database) -> Result<Vec<u8>> {
    serde_json::to_vec(database).context("serializing database")
}

/// Parse an imported snapshot. The top-level container map is required (the
/// legacy `boxes` key is accepted too) and every container must have a usable
/// grid once legacy records are migrated.
pub fn parse_snapshot(bytes: &[u8]) -> Result<Database, InventoryError> {
    let value: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|e| InventoryError::deserialization(format!("snapshot is not valid JSON: {}", e)))?;

    let has_containers = value
        .as_object()
        .map(|root| root.contains_key("containers") || root.contains_key("boxes"))
        .unwrap_or(false);
    if !has_containers {
        return Err(InventoryError::deserialization(
            "snapshot has no top-level 'containers' map",
        ));
    }

    let mut database: Database = serde_json::from_value(value)
        .map_err(|e| InventoryError::deserialization(format!("snapshot is malformed: {}", e)))?;
    for container in database.containers.values_mut() {
        container.normalize_legacy();
    }
    if let Some(id) = database.containers_without_grid().first() {
        return Err(InventoryError::deserialization(format!(
            "container '{}' has no usable grid",
            id
        )));
    }
    database.normalize();
    Ok(database)
}

/// Download name for a snapshot taken on `date`
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("Antibody_Storage_Backup_{}.json", date.format("%Y-%m-%d"))
}
