use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::store::traits::SlotStore;

/// Slots kept as `<key>.json` files in one directory.
///
/// Writes land in a temporary file first and are renamed over the target, so
/// a slot is always either the old or the new content.
#[derive(Debug, Clone)]
pub struct FileSlots {
    root: PathBuf,
}

impl FileSlots {
    /// Use `root` as the slot directory, creating it if needed
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .with_context(|| format!("creating slot directory {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(anyhow!("invalid slot key '{}'", key));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }
}

impl SlotStore for FileSlots {
    fn read_slot(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.slot_path(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    fn write_slot(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.slot_path(key)?;
        let tmp = self.root.join(format!(".{}.json.tmp", key));
        fs::write(&tmp, bytes).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("replacing {} with {}", path.display(), tmp.display()))?;
        Ok(())
    }

    fn remove_slot(&self, key: &str) -> Result<bool> {
        let path = self.slot_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("removing {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_slots_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let slots = FileSlots::open(dir.path().join("data")).unwrap();

        assert!(slots.read_slot("antibody_storage_v1_db").unwrap().is_none());
        slots.write_slot("antibody_storage_v1_db", b"{\"containers\":{}}").unwrap();
        assert_eq!(
            slots.read_slot("antibody_storage_v1_db").unwrap().unwrap(),
            b"{\"containers\":{}}".to_vec()
        );
        assert!(slots.root().join("antibody_storage_v1_db.json").exists());
        assert!(!slots.root().join(".antibody_storage_v1_db.json.tmp").exists());

        assert!(slots.remove_slot("antibody_storage_v1_db").unwrap());
        assert!(!slots.remove_slot("antibody_storage_v1_db").unwrap());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let slots = FileSlots::open(dir.path()).unwrap();
        assert!(slots.write_slot("../escape", b"x").is_err());
        assert!(slots.write_slot("", b"x").is_err());
        assert!(slots.read_slot(".hidden").is_err());
    }
}
