//! Persistence of archive blobs

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::debug;

use crate::error::{ArchiveError, Result};

/// Key-value blob storage for archives
pub trait ArchiveStore: Send + Sync {
    /// Loads the blob stored under `key`, `None` if nothing was saved yet
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replaces the blob stored under `key`
    fn save(&self, key: &str, bytes: &[u8]) -> Result<()>;
}

/// In-process store, for tests and short-lived control points
#[derive(Debug, Default)]
pub struct MemoryArchiveStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryArchiveStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArchiveStore for MemoryArchiveStore {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.blobs.lock().get(key).cloned())
    }

    fn save(&self, key: &str, bytes: &[u8]) -> Result<()> {
        self.blobs.lock().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// Stores each key as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileArchiveStore {
    dir: PathBuf,
}

impl FileArchiveStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under the platform cache directory, e.g. `~/.cache/avcontrol`
    pub fn in_cache_dir() -> Result<Self> {
        default_archive_dir()
            .map(Self::new)
            .ok_or(ArchiveError::NoStoreLocation)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl ArchiveStore for FileArchiveStore {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ArchiveError::Store { path, source }),
        }
    }

    fn save(&self, key: &str, bytes: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|source| ArchiveError::Store {
            path: self.dir.clone(),
            source,
        })?;

        // Write then rename so a crash never leaves a half-written archive
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, bytes).map_err(|source| ArchiveError::Store {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| ArchiveError::Store {
            path: path.clone(),
            source,
        })?;

        debug!("Saved {} byte archive to {:?}", bytes.len(), path);
        Ok(())
    }
}

/// Platform cache directory for archives
pub fn default_archive_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("avcontrol"))
}
