//! A filesystem store.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{validate_key, BlobStore, StoreError};

/// A blob store mapping keys to files under a base directory.
///
/// Key `nested/0.0` resolves to `<base>/nested/0.0`. Keys are validated
/// before touching the filesystem, so a key can never resolve outside the
/// base directory.
#[derive(Debug)]
pub struct FilesystemStore {
    base_directory: PathBuf,
    read_only: bool,
}

impl FilesystemStore {
    /// Open a store rooted at `base_directory`.
    ///
    /// A read-only store requires an existing directory. A writable store
    /// creates the directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the directory is missing (read-only) or
    /// cannot be created (writable).
    pub fn new(base_directory: impl AsRef<Path>, read_only: bool) -> Result<Self, StoreError> {
        let base_directory = base_directory.as_ref().to_path_buf();
        if read_only {
            if !base_directory.is_dir() {
                return Err(StoreError::Other(format!(
                    "store directory {} does not exist",
                    base_directory.display()
                )));
            }
        } else {
            fs::create_dir_all(&base_directory)?;
        }
        Ok(Self {
            base_directory,
            read_only,
        })
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        if !validate_key(key) {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.base_directory.join(key))
    }
}

impl BlobStore for FilesystemStore {
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.key_path(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(StoreError::KeyNotFound(key.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        let path = self.key_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, value)?;
        Ok(())
    }

    fn contains(&self, key: &str) -> bool {
        self.key_path(key).map_or(false, |path| path.is_file())
    }

    fn read_only(&self) -> bool {
        self.read_only
    }
}
