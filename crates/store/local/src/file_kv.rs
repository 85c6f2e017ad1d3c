//! File-backed key-value store, one plain-text file per key.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use store_core::{KvError, KvStore};

/// Persists each key as a file under a data directory.
///
/// Values are plain text blobs with no versioning; format changes upstream
/// are breaking by contract.
pub struct FileKv {
    root: PathBuf,
}

impl FileKv {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, KvError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl KvStore for FileKv {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), KvError> {
        fs::write(self.path_for(key), value)?;
        Ok(())
    }
}
