//! File-backed key-value store.
//!
//! One JSON file per key under a root directory. Writes land in a
//! sibling temp file first and are renamed into place so readers never
//! observe a torn blob; an `fs2` exclusive lock on the target file
//! serializes writers across processes.

use crate::{KvStore, StoreError};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Key-value store rooted at a directory, one file per key.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Opens a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            key: root.display().to_string(),
            source,
        })?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are flat names; path separators are flattened so a key
        // can never escape the root.
        let safe: String = key
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.root.join(format!("{safe}.json"))
    }
}

impl KvStore for JsonFileStore {
    fn load_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        let mut file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    key: key.to_string(),
                    source,
                })
            }
        };
        file.lock_shared().map_err(|source| StoreError::Io {
            key: key.to_string(),
            source,
        })?;
        let mut raw = String::new();
        let read = file.read_to_string(&mut raw);
        let _ = file.unlock();
        read.map_err(|source| StoreError::Io {
            key: key.to_string(),
            source,
        })?;
        Ok(Some(raw))
    }

    fn save_raw(&self, key: &str, value: String) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");

        let io_err = |source| StoreError::Io {
            key: key.to_string(),
            source,
        };

        // Lock the destination for the whole replace so concurrent
        // writers of the same key cannot interleave.
        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&path)
            .map_err(io_err)?;
        lock_file.lock_exclusive().map_err(|source| StoreError::Io {
            key: key.to_string(),
            source,
        })?;

        let result = (|| {
            let mut out = File::create(&tmp)?;
            out.write_all(value.as_bytes())?;
            out.sync_all()?;
            fs::rename(&tmp, &path)
        })();

        let _ = lock_file.unlock();
        result.map_err(|source| StoreError::Io {
            key: key.to_string(),
            source,
        })?;
        debug!(key, bytes = value.len(), "blob written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}
