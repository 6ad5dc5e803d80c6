use std::collections::BTreeSet;

use crate::config::{AppConfig, InventoryConfig};
use crate::error::{InventoryError, Result};
use crate::logic::{self, NameStock, SearchMatch, Warning};
use crate::model::{
    generate_container_id, Container, CustomOptions, Database, Id, OptionField, Position, Sample,
    Selection,
};
use crate::store::{backup_file_name, export_snapshot, parse_snapshot, PersistenceGateway, SlotStore};

/// An exported database ready to be offered as a download
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// The single owning context for inventory state.
///
/// Holds the in-memory database, the active container and the current
/// selection. Every mutating operation validates first, applies its change
/// to a staged copy, persists that copy and only then swaps it in, so a
/// rejected or failed operation leaves both memory and storage untouched.
pub struct Inventory<S: SlotStore> {
    gateway: PersistenceGateway<S>,
    database: Database,
    options: CustomOptions,
    settings: InventoryConfig,
    active: Option<Id>,
    selection: Selection,
}

impl Inventory<Box<dyn SlotStore>> {
    /// Open the inventory described by `config`
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let slots = config.slot_store()?;
        let gateway = PersistenceGateway::from_config(slots, &config.storage);
        Ok(Self::with_settings(gateway, config.inventory.clone()))
    }
}

impl<S: SlotStore> Inventory<S> {
    pub fn open(gateway: PersistenceGateway<S>) -> Self {
        Self::with_settings(gateway, InventoryConfig::default())
    }

    pub fn with_settings(gateway: PersistenceGateway<S>, settings: InventoryConfig) -> Self {
        let database = gateway.load();
        let options = gateway.load_custom_options();
        log::info!(
            "Opened inventory with {} container(s), {} sample(s)",
            database.containers.len(),
            database.sample_count()
        );
        Self {
            gateway,
            database,
            options,
            settings,
            active: None,
            selection: Selection::new(),
        }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn gateway(&self) -> &PersistenceGateway<S> {
        &self.gateway
    }

    pub fn container(&self, id: &str) -> Result<&Container> {
        self.database
            .container(id)
            .ok_or_else(|| InventoryError::not_found(format!("container '{}'", id)))
    }

    // ------------------------------------------------------------------
    // Container lifecycle
    // ------------------------------------------------------------------

    /// Create an empty container and return its id. The caller decides
    /// whether to make it active.
    pub fn create_container(&mut self, name: &str, rows: u32, cols: u32) -> Result<Id> {
        let name = name.trim();
        if name.is_empty() {
            return Err(InventoryError::validation("container name is required"));
        }
        if rows == 0 || cols == 0 {
            return Err(InventoryError::validation(format!(
                "grid must have positive rows and columns, got {}x{}",
                rows, cols
            )));
        }

        let mut id = generate_container_id();
        while self.database.containers.contains_key(&id) {
            id = generate_container_id();
        }

        let container = Container::new(name.to_string(), rows, cols);
        self.commit(|db| {
            db.containers.insert(id.clone(), container);
        })?;
        log::info!("Created container '{}' ({}x{}) as {}", name, rows, cols, id);
        Ok(id)
    }

    /// Delete a container with everything in it. Clears the active container
    /// and selection when it was the active one.
    pub fn delete_container(&mut self, id: &str) -> Result<Container> {
        let removed = self.container(id)?.clone();
        self.commit(|db| {
            db.containers.remove(id);
        })?;
        if self.active.as_deref() == Some(id) {
            self.active = None;
            self.selection.clear();
        }
        log::info!(
            "Deleted container '{}' ({}) with {} sample(s)",
            removed.name,
            id,
            removed.occupied_count()
        );
        Ok(removed)
    }

    pub fn rename_container(&mut self, id: &str, new_name: &str) -> Result<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(InventoryError::validation("container name is required"));
        }
        self.container(id)?;
        self.commit(|db| {
            if let Some(container) = db.containers.get_mut(id) {
                container.name = new_name.to_string();
            }
        })?;
        log::info!("Renamed container {} to '{}'", id, new_name);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Sample placement
    // ------------------------------------------------------------------

    /// Write a full copy of `data` into every listed position, replacing
    /// whatever was there. Fields absent from `data` do not survive.
    pub fn assign_batch(&mut self, id: &str, positions: &BTreeSet<Position>, data: &Sample) -> Result<()> {
        if positions.is_empty() {
            return Err(InventoryError::validation("no positions selected"));
        }
        if !data.is_occupied() {
            return Err(InventoryError::validation("sample name is required"));
        }
        self.check_positions(id, positions.iter().copied())?;

        let record = Sample {
            name: data.name.trim().to_string(),
            ..data.clone()
        };
        self.commit(|db| {
            if let Some(container) = db.containers.get_mut(id) {
                for pos in positions {
                    container.slots.insert(*pos, record.clone());
                }
            }
        })?;
        log::info!(
            "Assigned '{}' to {} position(s) in {}",
            record.name,
            positions.len(),
            id
        );
        Ok(())
    }

    /// Empty every listed position; already-empty positions are skipped.
    pub fn clear_batch(&mut self, id: &str, positions: &BTreeSet<Position>) -> Result<()> {
        if positions.is_empty() {
            return Err(InventoryError::validation("no positions selected"));
        }
        self.check_positions(id, positions.iter().copied())?;

        self.commit(|db| {
            if let Some(container) = db.containers.get_mut(id) {
                for pos in positions {
                    container.slots.remove(pos);
                }
            }
        })?;
        log::info!("Cleared {} position(s) in {}", positions.len(), id);
        Ok(())
    }

    /// Relocate the sample at `from` to the empty position `to`.
    ///
    /// Rejected with a conflict when `to` is occupied or equals `from`.
    pub fn move_sample(&mut self, id: &str, from: Position, to: Position) -> Result<()> {
        self.check_positions(id, [from, to])?;
        if from == to {
            return Err(InventoryError::conflict(format!(
                "cannot move {} onto itself",
                from
            )));
        }
        let container = self.container(id)?;
        if container.sample_at(from).is_none() {
            return Err(InventoryError::not_found(format!("no sample at {} in {}", from, id)));
        }
        if container.is_occupied(to) {
            return Err(InventoryError::conflict(format!(
                "position {} is already occupied",
                to
            )));
        }

        self.commit(|db| {
            if let Some(container) = db.containers.get_mut(id) {
                if let Some(sample) = container.slots.remove(&from) {
                    container.slots.insert(to, sample);
                }
            }
        })?;
        if self.active.as_deref() == Some(id) && self.selection.contains(from) {
            self.selection.clear();
        }
        log::info!("Moved sample in {} from {} to {}", id, from, to);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Active container and selection
    // ------------------------------------------------------------------

    pub fn active_container(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Make `id` the active container and drop the selection
    pub fn switch_container(&mut self, id: &str) -> Result<()> {
        self.container(id)?;
        self.active = Some(id.to_string());
        self.selection.clear();
        Ok(())
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Toggle `pos` in the active container's selection
    pub fn toggle_selection(&mut self, pos: Position) -> Result<bool> {
        let id = self.require_active()?;
        self.check_positions(&id, [pos])?;
        Ok(self.selection.toggle(pos))
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// The sample at the single selected position, for editing
    pub fn selected_sample(&self) -> Option<&Sample> {
        let id = self.active.as_deref()?;
        let pos = self.selection.single()?;
        self.database.container(id)?.sample_at(pos)
    }

    /// `assign_batch` over the selection, which is cleared on success
    pub fn assign_selected(&mut self, data: &Sample) -> Result<()> {
        let id = self.require_active()?;
        let positions = self.selection.positions().clone();
        self.assign_batch(&id, &positions, data)?;
        self.selection.clear();
        Ok(())
    }

    /// `clear_batch` over the selection, which is cleared on success
    pub fn clear_selected(&mut self) -> Result<()> {
        let id = self.require_active()?;
        let positions = self.selection.positions().clone();
        self.clear_batch(&id, &positions)?;
        self.selection.clear();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn search(&self, query: &str) -> Vec<SearchMatch> {
        logic::search(&self.database, query)
    }

    pub fn warnings(&self) -> Vec<Warning> {
        logic::list_warnings(&self.database)
    }

    pub fn count_by_name(&self, name: &str) -> usize {
        logic::count_by_name(&self.database, name)
    }

    pub fn name_stock(&self, name: &str) -> NameStock {
        logic::name_stock(&self.database, name, self.settings.low_stock_count)
    }

    // ------------------------------------------------------------------
    // Custom dropdown values
    // ------------------------------------------------------------------

    pub fn custom_options(&self) -> &CustomOptions {
        &self.options
    }

    pub fn option_choices(&self, field: OptionField) -> Vec<String> {
        self.options.choices(field)
    }

    /// Remember a user-entered dropdown value for next time
    pub fn remember_option(&mut self, field: OptionField, value: &str) -> Result<()> {
        let mut next = self.options.clone();
        if !next.remember(field, value, self.settings.custom_option_limit) {
            return Ok(());
        }
        self.gateway.save_custom_options(&next)?;
        self.options = next;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Snapshots
    // ------------------------------------------------------------------

    pub fn export_snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            file_name: backup_file_name(chrono::Local::now().date_naive()),
            bytes: export_snapshot(&self.database)?,
        })
    }

    /// Replace the whole database with an imported snapshot. On any error
    /// the current database is kept as is.
    pub fn import_snapshot(&mut self, bytes: &[u8]) -> Result<()> {
        let imported = parse_snapshot(bytes)?;
        self.gateway.save(&imported)?;
        self.database = imported;
        self.selection.clear();
        if let Some(active) = &self.active {
            if !self.database.containers.contains_key(active) {
                self.active = None;
            }
        }
        log::info!(
            "Imported snapshot with {} container(s), {} sample(s)",
            self.database.containers.len(),
            self.database.sample_count()
        );
        Ok(())
    }

    // ------------------------------------------------------------------

    fn require_active(&self) -> Result<Id> {
        self.active
            .clone()
            .ok_or_else(|| InventoryError::validation("no container selected"))
    }

    fn check_positions(&self, id: &str, positions: impl IntoIterator<Item = Position>) -> Result<()> {
        let container = self.container(id)?;
        for pos in positions {
            if !container.contains(pos) {
                return Err(InventoryError::validation(format!(
                    "position {} is outside the {}x{} grid of '{}'",
                    pos, container.rows, container.cols, container.name
                )));
            }
        }
        Ok(())
    }

    /// Apply `change` to a copy, persist the copy, then adopt it
    fn commit(&mut self, change: impl FnOnce(&mut Database)) -> Result<()> {
        let mut next = self.database.clone();
        change(&mut next);
        self.gateway.save(&next)?;
        self.database = next;
        Ok(())
    }
}
