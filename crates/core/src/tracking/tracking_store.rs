//! Flat-file window store.
//!
//! The full window map is held as one JSON document keyed by window key,
//! matching the record shape in `tracking_model`. Historical windows stay
//! in the file indefinitely; only an explicit clear removes one.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{Result, StoreError};
use crate::tracking::tracking_model::TradingWindow;
use crate::tracking::tracking_traits::WindowStoreTrait;

/// Mapping of window key to tracking record.
pub type WindowMap = HashMap<String, TradingWindow>;

/// JSON-file-backed window store.
pub struct FileWindowStore {
    path: PathBuf,
}

impl FileWindowStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WindowStoreTrait for FileWindowStore {
    fn load(&self) -> Result<WindowMap> {
        if !self.path.exists() {
            return Ok(WindowMap::new());
        }
        let contents = fs::read_to_string(&self.path)
            .map_err(|e| StoreError::ReadFailed(format!("{}: {}", self.path.display(), e)))?;
        let windows = serde_json::from_str(&contents)
            .map_err(|e| StoreError::Corrupted(format!("{}: {}", self.path.display(), e)))?;
        Ok(windows)
    }

    fn save(&self, windows: &WindowMap) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| StoreError::WriteFailed(format!("{}: {}", parent.display(), e)))?;
            }
        }
        let contents = serde_json::to_string_pretty(windows)
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        fs::write(&self.path, contents)
            .map_err(|e| StoreError::WriteFailed(format!("{}: {}", self.path.display(), e)))?;
        Ok(())
    }
}
