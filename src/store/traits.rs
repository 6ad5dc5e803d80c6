use anyhow::Result;

/// A byte-string key-value slot store. Each write replaces the whole slot.
pub trait SlotStore: Send + Sync {
    /// Contents of `key`, or `None` when the slot was never written
    fn read_slot(&self, key: &str) -> Result<Option<Vec<u8>>>;
    /// Overwrite `key` with `bytes`
    fn write_slot(&self, key: &str, bytes: &[u8]) -> Result<()>;
    /// Remove `key`; returns whether it existed
    fn remove_slot(&self, key: &str) -> Result<bool>;
}

impl<T: SlotStore + ?Sized> SlotStore for Box<T> {
    fn read_slot(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).read_slot(key)
    }

    fn write_slot(&self, key: &str, bytes: &[u8]) -> Result<()> {
        (**self).write_slot(key, bytes)
    }

    fn remove_slot(&self, key: &str) -> Result<bool> {
        (**self).remove_slot(key)
    }
}
