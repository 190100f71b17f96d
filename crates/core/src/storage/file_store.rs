use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::validate_storage_key;
use crate::errors::CoreError;

use super::traits::KeyValueStore;

/// Stores each key as `<dir>/<key>.json` (native only).
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write leaves the previous record intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Use `dir` as the storage root. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage root.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path backing `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, CoreError> {
        validate_storage_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), bytes = value.len(), "Record written");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool, CoreError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
