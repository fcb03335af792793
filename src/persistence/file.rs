//! JSON file store
//!
//! One `<key>.json` file per record in a data directory. Writes go to a
//! temporary sibling first and are renamed into place, so a crash mid-write
//! leaves the previous file intact.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{Envelope, Key, Store, StoreError};

const APP_DIR: &str = "pepper-rush";

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store in the user's local data directory
    pub fn open_default() -> Result<Self, StoreError> {
        let dir = dirs::data_local_dir().ok_or(StoreError::NoDataDir)?.join(APP_DIR);
        log::info!("Using data directory {:?}", dir);
        Ok(Self::new(dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: Key) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }
}

impl Store for JsonFileStore {
    fn read(&self, key: Key) -> Result<Option<Value>, StoreError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)?;
        let envelope = Envelope::from_json(&contents)?;
        log::debug!("Loaded {:?}", path);
        Ok(Some(envelope.data))
    }

    fn write(&mut self, key: Key, value: Value) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let json = Envelope::wrap(value).to_json()?;

        if let Err(e) = fs::write(&tmp, json) {
            log::warn!("Failed to write {:?}: {}", tmp, e);
            return Err(e.into());
        }
        fs::rename(&tmp, &path)?;
        log::debug!("Saved {:?}", path);
        Ok(())
    }
}
