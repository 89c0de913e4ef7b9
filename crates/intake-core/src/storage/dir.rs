//! File-per-key backend: each key is one JSON document under a directory.

use std::fs;
use std::path::{Path, PathBuf};

use super::{StorageBackend, StorageError};

/// Directory-backed storage area. No cross-context notifications; a second
/// process sees writes only on its next load.
#[derive(Debug, Clone)]
pub struct DirStorage {
    root: PathBuf,
}

impl DirStorage {
    /// Open a storage area rooted at `root`, creating the directory if it
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Write`] if the root cannot be created.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StorageError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    // Keys carry `:` separators, so map them onto a flat file name.
    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        self.root.join(format!("{name}.json"))
    }
}

impl StorageBackend for DirStorage {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::write(self.path_for(key), value)?;
        Ok(())
    }
}
