//! Result persistence: a narrow key-value interface plus the ledger that
//! records clearing results under one well-known key.

pub mod ledger;

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from a result store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failure at '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("store backend failure: {0}")]
    Backend(String),
}

/// A durable key-value facility for result records.
///
/// The clearing engine itself never touches storage; its caller writes the
/// serialized result through this interface and reads it back later. The
/// interface is injected rather than ambient, so tests can swap in an
/// in-memory store or a deliberately failing one.
pub trait ResultStore {
    /// Fetch the bytes stored under `key`, or `None` if nothing has ever
    /// been stored there.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Overwrite the bytes stored under `key`.
    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError>;
}

/// Volatile in-process store. The default for tests and one-shot runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

/// File-backed store: one file per key under a root directory. This is what
/// the CLI uses so that a solve survives the process.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl ResultStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.key_path(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io {
                path: path.display().to_string(),
                source: e,
            }),
        }
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).map_err(|e| StoreError::Io {
            path: self.root.display().to_string(),
            source: e,
        })?;
        // Stage to a sibling file and rename over the key path, so a write
        // that dies midway cannot truncate the previously stored record.
        let path = self.key_path(key);
        let staging = self.root.join(format!("{}.tmp", key));
        fs::write(&staging, value).map_err(|e| StoreError::Io {
            path: staging.display().to_string(),
            source: e,
        })?;
        fs::rename(&staging, &path).map_err(|e| StoreError::Io {
            path: path.display().to_string(),
            source: e,
        })
    }
}
