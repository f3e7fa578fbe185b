//! # Filesystem-backed key-value store
//!
//! [`FileStore`] keeps each slot in its own file so the session survives app
//! restarts on desktop and mobile.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! ├── authToken      # raw token string
//! └── user           # serialised user profile (JSON)
//! ```
//!
//! Use `dirs::data_dir()` to obtain a platform-appropriate base, e.g.
//! `~/.local/share/<app>/` on Linux.

use std::path::{Path, PathBuf};

use crate::kv::{KeyValueStore, StoreError};

/// Filesystem-backed KeyValueStore for desktop and mobile persistence.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        // Keys are fixed configuration names; keep them from escaping the base.
        let name: String = key
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.base.join(name)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.slot_path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.base).map_err(|e| StoreError::Storage(e.to_string()))?;
        std::fs::write(self.slot_path(key), value).map_err(|e| StoreError::Storage(e.to_string()))
    }

    fn remove(&self, key: &str) {
        let _ = std::fs::remove_file(self.slot_path(key));
    }
}
