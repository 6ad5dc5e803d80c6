use anyhow::Result;
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::store::traits::SlotStore;

/// Process-local slots, lost when the process exits
#[derive(Debug, Default)]
pub struct MemorySlots {
    slots: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStore for MemorySlots {
    fn read_slot(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.slots.read().get(key).cloned())
    }

    fn write_slot(&self, key: &str, bytes: &[u8]) -> Result<()> {
        self.slots.write().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn remove_slot(&self, key: &str) -> Result<bool> {
        Ok(self.slots.write().remove(key).is_some())
    }
}
