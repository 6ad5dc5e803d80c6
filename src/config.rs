use serde::{Deserialize, Serialize};

use crate::store::{FileSlots, MemorySlots, SlotStore};

pub const DEFAULT_DATABASE_KEY: &str = "antibody_storage_v1_db";
pub const DEFAULT_OPTIONS_KEY: &str = "antibody_dropdown_custom_options_v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub inventory: InventoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one file per slot. In-memory slots when unset.
    pub data_dir: Option<String>,
    pub database_key: String,
    pub options_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Maximum number of remembered custom values per dropdown field
    pub custom_option_limit: usize,
    /// A name held in this many positions or fewer is flagged as running low
    pub low_stock_count: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            inventory: InventoryConfig::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            database_key: DEFAULT_DATABASE_KEY.to_string(),
            options_key: DEFAULT_OPTIONS_KEY.to_string(),
        }
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            custom_option_limit: 50,
            low_stock_count: 3,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, an optional `inventory` config file
    /// and `ABINV__*` environment variables
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = config::Config::builder();

        config = config.add_source(config::Config::try_from(&AppConfig::default())?);

        config = config.add_source(config::File::with_name("inventory").required(false));

        config = config.add_source(
            config::Environment::with_prefix("ABINV")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = config.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        Ok(app_config)
    }

    /// Build the slot backend selected by `storage.data_dir`
    pub fn slot_store(&self) -> anyhow::Result<Box<dyn SlotStore>> {
        match &self.storage.data_dir {
            Some(dir) => Ok(Box::new(FileSlots::open(dir)?)),
            None => Ok(Box::new(MemorySlots::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_use_legacy_storage_keys() {
        let config = AppConfig::default();
        assert_eq!(config.storage.database_key, "antibody_storage_v1_db");
        assert_eq!(
            config.storage.options_key,
            "antibody_dropdown_custom_options_v1"
        );
        assert_eq!(config.inventory.custom_option_limit, 50);
        assert_eq!(config.inventory.low_stock_count, 3);
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn test_load_applies_environment_overrides() {
        std::env::set_var("ABINV__INVENTORY__LOW_STOCK_COUNT", "7");
        std::env::set_var("ABINV__STORAGE__DATABASE_KEY", "lab_b_db");
        let config = AppConfig::load();
        std::env::remove_var("ABINV__INVENTORY__LOW_STOCK_COUNT");
        std::env::remove_var("ABINV__STORAGE__DATABASE_KEY");

        let config = config.unwrap();
        assert_eq!(config.inventory.low_stock_count, 7);
        assert_eq!(config.storage.database_key, "lab_b_db");
        assert_eq!(config.inventory.custom_option_limit, 50);
        assert_eq!(config.storage.options_key, DEFAULT_OPTIONS_KEY);
    }

    #[test]
    fn test_slot_store_uses_data_dir_when_set() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.storage.data_dir = Some(dir.path().to_string_lossy().into_owned());

        let slots = config.slot_store().unwrap();
        slots.write_slot("probe", b"{}").unwrap();
        assert!(dir.path().join("probe.json").exists());
    }
}
